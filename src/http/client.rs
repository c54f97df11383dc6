//! HTTP client setup and middleware configuration.
//!
//! Builds the single client shared by all transfers of a session: tracing
//! middleware, redirect following with a bounded hop count, transfer and
//! connect timeouts, optional proxy, and default headers. Everything below
//! the request level (TLS, tunnelling, decompression) is reqwest's business.

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{redirect, Proxy};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use std::time::Duration;

/// Identifies this tool to servers unless the caller overrides it.
const DEFAULT_USER_AGENT: &str = concat!("fetchmux/", env!("CARGO_PKG_VERSION"));

/// Hard cap on a whole transfer.
const TRANSFER_TIMEOUT: Duration = Duration::from_secs(1200);
/// Cap on connection establishment.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(60);
/// Redirect hops followed before giving up.
const MAX_REDIRECTS: usize = 10;

/// Configuration for HTTP client setup.
#[derive(Debug, Clone, Default)]
pub struct HttpClientConfig {
    /// Optional proxy applied to every request.
    pub proxy: Option<Proxy>,
    /// Extra headers applied to every request.
    pub headers: Option<HeaderMap>,
}

/// Creates the HTTP client shared by a session's transfers.
pub fn create_http_client(config: HttpClientConfig) -> Result<ClientWithMiddleware, reqwest::Error> {
    let mut headers = config.headers.unwrap_or_default();
    if !headers.contains_key(USER_AGENT) {
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    }

    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .redirect(redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(TRANSFER_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT);

    if let Some(proxy) = config.proxy {
        builder = builder.proxy(proxy);
    }

    let inner = builder.build()?;

    // Trace HTTP requests. See the tracing crate to make use of these traces.
    let client = ClientBuilder::new(inner)
        .with(TracingMiddleware::default())
        .build();

    Ok(client)
}
