//! Configuration for the fetcher.
//!
//! All settings are explicit values constructed once at startup and passed
//! down; nothing is read from ambient global state.

use reqwest::header::HeaderMap;
use reqwest::Proxy;
use std::env::current_dir;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// Cooperative cancellation flag, checked once per pump loop iteration.
///
/// Cancelling stops new admissions and the loop itself promptly; transfers
/// already in flight are abandoned at session close, not severed mid-chunk.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    token: CancellationToken,
}

impl CancelFlag {
    /// Creates a flag in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the flag has been set.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes when the flag is set. Used to wire signal handlers.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }
}

/// Configuration structure for the fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Directory where output files are created.
    pub directory: PathBuf,
    /// Maximum number of concurrently active transfers.
    pub parallel: usize,
    /// Optional proxy for all transfers.
    pub proxy: Option<Proxy>,
    /// Extra HTTP headers for all transfers.
    pub headers: Option<HeaderMap>,
    /// Cancellation flag shared with the caller.
    pub cancel: CancelFlag,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            directory: current_dir().unwrap_or_default(),
            parallel: 1,
            proxy: None,
            headers: None,
            cancel: CancelFlag::new(),
        }
    }
}
