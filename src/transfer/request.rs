//! The file-writing transfer kind.
//!
//! A [`FileTransfer`] streams one HTTP body to disk. The output file is
//! created lazily on the first delivered chunk, once the response headers can
//! name it: the `Content-Disposition` filename wins, then the last URL path
//! segment (query string excluded), then `index.html`. Both the file and the
//! parsed header metadata are created at most once, guarded by their own
//! presence.

use crate::headers::HeaderMetadata;
use crate::transfer::{ResponseInfo, TransferHandler, TransferOutcome};

use reqwest::Url;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Fallback output name for URLs without a usable path segment.
const DEFAULT_FILENAME: &str = "index.html";

/// One in-flight (or completed) download writing to a local file.
#[derive(Debug)]
pub struct FileTransfer {
    url: Url,
    effective_url: Option<Url>,
    directory: PathBuf,
    resume_from: u64,
    metadata: Option<HeaderMetadata>,
    output: Option<File>,
    output_name: Option<String>,
    bytes_written: u64,
}

impl FileTransfer {
    /// Creates a transfer for `url`, writing into `directory`.
    pub fn new(url: Url, directory: PathBuf) -> Self {
        Self {
            url,
            effective_url: None,
            directory,
            resume_from: 0,
            metadata: None,
            output: None,
            output_name: None,
            bytes_written: 0,
        }
    }

    /// Sets the byte offset to resume from.
    pub fn resume(mut self, offset: u64) -> Self {
        self.resume_from = offset;
        self
    }

    /// The final URL after redirects, known once the transfer completed.
    pub fn effective_url(&self) -> Option<&Url> {
        self.effective_url.as_ref()
    }

    /// The resolved output filename, known once the file was created.
    pub fn output_name(&self) -> Option<&str> {
        self.output_name.as_deref()
    }

    /// Body bytes written to the file so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// The parsed header metadata, known once the first chunk arrived.
    pub fn metadata(&self) -> Option<&HeaderMetadata> {
        self.metadata.as_ref()
    }

    /// Resolves the output filename from parsed metadata and the URL.
    ///
    /// Precedence: disposition filename (itself basenamed, so a server cannot
    /// point outside the output directory) > URL path basename > the default.
    fn resolve_filename(&self) -> String {
        if let Some(name) = self
            .metadata
            .as_ref()
            .and_then(HeaderMetadata::filename)
            .map(basename)
            .filter(|name| !name.is_empty())
        {
            return name;
        }
        // Url::path_segments never includes the query string.
        let segment = self
            .url
            .path_segments()
            .and_then(|mut s| s.next_back())
            .unwrap_or_default();
        let name: String = form_urlencoded::parse(segment.as_bytes())
            .map(|(key, val)| [key, val].concat())
            .collect();
        if name.is_empty() {
            DEFAULT_FILENAME.to_string()
        } else {
            name
        }
    }

    /// Opens the output file, printing the `Downloading` line on success.
    async fn open_output(&mut self, name: String) -> bool {
        let path = self.directory.join(&name);
        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .await
        {
            Ok(file) => {
                println!("Downloading {} -> {}", self.url, name);
                self.output = Some(file);
                self.output_name = Some(name);
                true
            }
            Err(e) => {
                warn!(url = %self.url, path = %path.display(), error = %e, "cannot create output file");
                false
            }
        }
    }
}

impl TransferHandler for FileTransfer {
    fn target_url(&self) -> &Url {
        &self.url
    }

    fn resume_from(&self) -> u64 {
        self.resume_from
    }

    async fn on_data(&mut self, response: &ResponseInfo, chunk: &[u8]) -> usize {
        if chunk.is_empty() {
            return 0;
        }
        if !response.status.is_success() {
            debug!(url = %self.url, status = %response.status, "discarding chunk of failed response");
            return 0;
        }
        if self.output.is_none() {
            if self.metadata.is_none() {
                self.metadata = Some(HeaderMetadata::from_headers(&response.headers));
            }
            let name = self.resolve_filename();
            if !self.open_output(name).await {
                return 0;
            }
        }
        let Some(file) = self.output.as_mut() else {
            return 0;
        };
        match file.write_all(chunk).await {
            Ok(()) => {
                self.bytes_written += chunk.len() as u64;
                chunk.len()
            }
            Err(e) => {
                warn!(url = %self.url, error = %e, "write failed");
                0
            }
        }
    }

    async fn on_complete(&mut self, outcome: &TransferOutcome) {
        self.effective_url = Some(outcome.effective_url().clone());
        if !outcome.is_success() {
            // A partial file, if any, is left as-is.
            println!("FAILED: {} {}", outcome.status_code(), self.url);
            return;
        }
        // Nothing was ever written for a zero-byte success.
        let Some(mut file) = self.output.take() else {
            return;
        };
        if let Err(e) = file.flush().await {
            warn!(url = %self.url, error = %e, "flush failed on close");
        }
        // The file handle closes on drop, exactly once thanks to take().
    }
}

/// Strips any path components from a server-supplied filename.
fn basename(name: &str) -> String {
    Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
