//! Pure parsing of response header metadata.
//!
//! Turns raw `Content-Type` and `Content-Disposition` header values into
//! structured [`HeaderMetadata`]. The parser holds no state and performs no
//! I/O; callers guard how often it runs. Unknown or malformed headers are
//! ignored, never fatal.

use percent_encoding::percent_decode_str;
use reqwest::header::{HeaderMap, CONTENT_DISPOSITION, CONTENT_TYPE};
use std::collections::HashMap;

/// A parameter value from a `Content-Disposition` header.
///
/// RFC 2231 allows parameters such as `filename*` to carry a charset and
/// language tag alongside the percent-encoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispositionValue {
    /// A plain (possibly quoted) parameter value.
    Plain(String),
    /// An extended `param*=charset'language'value` parameter, already decoded.
    Extended {
        charset: String,
        language: String,
        value: String,
    },
}

impl DispositionValue {
    /// The decoded textual value, regardless of form.
    pub fn as_str(&self) -> &str {
        match self {
            DispositionValue::Plain(v) => v,
            DispositionValue::Extended { value, .. } => value,
        }
    }
}

/// Structured metadata extracted from response headers.
///
/// Owned exclusively by the transfer that parsed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMetadata {
    /// Lower-cased media type, e.g. `text` in `text/html`.
    pub media_type: String,
    /// Lower-cased media subtype, e.g. `html` in `text/html`.
    pub media_subtype: String,
    /// Media type parameters such as `charset`.
    pub media_type_params: HashMap<String, String>,
    /// Disposition type, e.g. `attachment` or `inline`.
    pub disposition_type: Option<String>,
    /// Disposition parameters, keyed verbatim (`filename`, `filename*`, ...).
    pub disposition_params: HashMap<String, DispositionValue>,
}

impl HeaderMetadata {
    /// Parses the `Content-Type` and `Content-Disposition` entries of a
    /// header map. Missing or unreadable headers simply leave their fields
    /// empty.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut metadata = HeaderMetadata::default();
        if let Some(value) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
            let (media_type, media_subtype, params) = parse_content_type(value);
            metadata.media_type = media_type;
            metadata.media_subtype = media_subtype;
            metadata.media_type_params = params;
        }
        if let Some(value) = headers
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
        {
            let (disposition_type, params) = parse_content_disposition(value);
            metadata.disposition_type = disposition_type;
            metadata.disposition_params = params;
        }
        metadata
    }

    /// The filename suggested by the server, if any.
    ///
    /// The RFC 2231 extended `filename*` parameter takes precedence over the
    /// plain `filename`. Empty suggestions count as absent.
    pub fn filename(&self) -> Option<&str> {
        self.disposition_params
            .get("filename*")
            .or_else(|| self.disposition_params.get("filename"))
            .map(DispositionValue::as_str)
            .filter(|name| !name.is_empty())
    }
}

/// Parses a `Content-Type` value into lower-cased type, subtype, and
/// parameters.
pub fn parse_content_type(value: &str) -> (String, String, HashMap<String, String>) {
    let mut segments = value.split(';');
    let mime = segments.next().unwrap_or_default().trim().to_lowercase();
    let (media_type, media_subtype) = match mime.split_once('/') {
        Some((t, s)) => (t.to_string(), s.to_string()),
        None => (mime, String::new()),
    };
    let mut params = HashMap::new();
    for segment in segments {
        if let Some((key, val)) = segment.split_once('=') {
            params.insert(key.trim().to_lowercase(), unquote(val.trim()).to_string());
        }
    }
    (media_type, media_subtype, params)
}

/// Parses a `Content-Disposition` value into a disposition type and a
/// parameter map.
///
/// Parameters without an `=` sign are skipped; `param*` extended values are
/// decoded per RFC 2231. Decoding failures degrade to the raw value rather
/// than dropping the parameter.
pub fn parse_content_disposition(
    value: &str,
) -> (Option<String>, HashMap<String, DispositionValue>) {
    let mut segments = value.split(';');
    let disposition_type = segments
        .next()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());
    let mut params = HashMap::new();
    for segment in segments {
        let Some((key, val)) = segment.split_once('=') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let val = val.trim();
        if key.ends_with('*') {
            params.insert(key, parse_extended_value(val));
        } else {
            params.insert(key, DispositionValue::Plain(unquote(val).to_string()));
        }
    }
    (disposition_type, params)
}

/// Decodes an RFC 2231 extended value of the form
/// `charset'language'percent-encoded-text`.
fn parse_extended_value(raw: &str) -> DispositionValue {
    let mut parts = raw.splitn(3, '\'');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(charset), Some(language), Some(encoded)) => DispositionValue::Extended {
            charset: charset.to_lowercase(),
            language: language.to_string(),
            value: percent_decode_str(encoded)
                .decode_utf8()
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| encoded.to_string()),
        },
        _ => DispositionValue::Plain(unquote(raw).to_string()),
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
