//! Core fetcher implementation: the pump loop.
//!
//! The [`Fetcher`] keeps the session fed while enforcing the parallelism
//! bound: prime one transfer, then repeatedly drive the session one step,
//! collect finished transfers, and admit pending URLs while slots are free.
//! The loop terminates when nothing is active and nothing was admitted, or
//! when the cancellation flag is observed.

use super::config::FetcherConfig;
use crate::error::Result;
use crate::http::{create_http_client, HttpClientConfig};
use crate::session::Session;
use crate::transfer::{FileTransfer, TransferOutcome};

use reqwest::header::HeaderMap;
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound on one wait step, so cancellation is observed promptly even on
/// an idle network.
const DRIVE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Represents the download controller.
///
/// Created via its builder:
///
/// ```rust
/// use fetchmux::FetcherBuilder;
///
/// let fetcher = FetcherBuilder::new().parallel(2).build();
/// ```
#[derive(Debug, Clone)]
pub struct Fetcher {
    config: FetcherConfig,
}

impl Fetcher {
    /// Creates a new fetcher with the given configuration.
    pub(crate) fn new(config: FetcherConfig) -> Self {
        Self { config }
    }

    /// Gets the directory where output files are created.
    pub fn directory(&self) -> &PathBuf {
        &self.config.directory
    }

    /// Gets the parallelism bound.
    pub fn parallel(&self) -> usize {
        self.config.parallel
    }

    /// Gets the extra headers.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.config.headers.as_ref()
    }

    /// Gets the cancellation flag shared with this fetcher.
    pub fn cancel_flag(&self) -> &super::CancelFlag {
        &self.config.cancel
    }

    /// Downloads the given URLs, at most `parallel` at a time.
    ///
    /// Returns one outcome per finished transfer. URLs that fail to parse are
    /// logged and dropped without an outcome; an empty input is a no-op
    /// success. Per-transfer failures never abort the run. On cancellation
    /// the loop stops without draining transfers still in flight; their
    /// partial files are left as-is.
    ///
    /// The only fatal error is failure to construct the HTTP client.
    pub async fn fetch(&self, urls: &[String]) -> Result<Vec<TransferOutcome>> {
        let mut queue: Vec<String> = urls.to_vec();
        let mut outcomes = Vec::with_capacity(queue.len());
        if queue.is_empty() {
            debug!("nothing to do");
            return Ok(outcomes);
        }

        let client = create_http_client(HttpClientConfig {
            proxy: self.config.proxy.clone(),
            headers: self.config.headers.clone(),
        })?;
        let mut session: Session<FileTransfer> = Session::new(client);

        // Prime the pump with a single transfer.
        self.admit_one(&mut session, &mut queue);

        while !self.config.cancel.is_cancelled() {
            // One drive step: a session that just dropped to zero active
            // transfers will not signal through the wait primitive, so it is
            // polled directly in that case.
            let active = session.advance();
            if active > 0 {
                session.wait(DRIVE_TIMEOUT).await;
            }
            for (transfer, outcome) in session.drain_completions() {
                debug!(
                    url = %outcome.url(),
                    status = outcome.status_code(),
                    bytes = transfer.bytes_written(),
                    success = outcome.is_success(),
                    "transfer finished"
                );
                outcomes.push(outcome);
            }

            let mut admitted = 0;
            while session.active_count() < self.config.parallel {
                if !self.admit_one(&mut session, &mut queue) {
                    break;
                }
                admitted += 1;
            }
            if session.active_count() == 0 && admitted == 0 {
                // Nothing running and nothing left to admit.
                break;
            }
        }

        session.close();
        Ok(outcomes)
    }

    /// Admits the next pending URL, skipping entries that fail to parse.
    /// Returns false once the queue is exhausted.
    fn admit_one(&self, session: &mut Session<FileTransfer>, queue: &mut Vec<String>) -> bool {
        while let Some(raw) = queue.pop() {
            match Url::parse(&raw) {
                Ok(url) => {
                    println!("Requesting {}", url);
                    session.register(FileTransfer::new(url, self.config.directory.clone()));
                    return true;
                }
                Err(e) => {
                    warn!(url = %raw, error = %e, "dropping unparseable URL");
                }
            }
        }
        false
    }
}
