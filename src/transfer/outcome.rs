//! Per-transfer result reporting.
//!
//! A [`TransferOutcome`] is produced by the session for every finished
//! transfer, exactly once, and carries the resolved effective URL, the final
//! HTTP status, the byte count, and a success/failure state.

use reqwest::{StatusCode, Url};

/// Terminal state of a transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferStatus {
    /// The transfer finished and its body was fully consumed.
    Success,
    /// The transfer failed with a reason; partial output is left as-is.
    Fail(String),
}

impl TransferStatus {
    /// Whether this is the success state.
    pub fn is_success(&self) -> bool {
        matches!(self, TransferStatus::Success)
    }
}

/// Outcome of one finished transfer.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    /// URL the transfer was created for.
    url: Url,
    /// Final URL after redirects.
    effective_url: Url,
    /// HTTP status, `None` when the transport failed before a response.
    status: Option<StatusCode>,
    /// Body bytes streamed to the handler.
    bytes: u64,
    /// Terminal state.
    state: TransferStatus,
}

impl TransferOutcome {
    /// Creates an outcome in the success state.
    pub fn new(url: Url, effective_url: Url, status: Option<StatusCode>, bytes: u64) -> Self {
        Self {
            url,
            effective_url,
            status,
            bytes,
            state: TransferStatus::Success,
        }
    }

    /// Marks the outcome as failed with a reason.
    pub fn fail(self, reason: impl std::fmt::Display) -> Self {
        Self {
            state: TransferStatus::Fail(reason.to_string()),
            ..self
        }
    }

    /// The URL the transfer was created for.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The final URL after redirects.
    pub fn effective_url(&self) -> &Url {
        &self.effective_url
    }

    /// The final HTTP status, if a response was received.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// The status as a number, `0` when no response was received.
    pub fn status_code(&self) -> u16 {
        self.status.map(|s| s.as_u16()).unwrap_or(0)
    }

    /// Body bytes delivered to the handler.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// The terminal state.
    pub fn state(&self) -> &TransferStatus {
        &self.state
    }

    /// Whether the transfer succeeded.
    pub fn is_success(&self) -> bool {
        self.state.is_success()
    }
}
