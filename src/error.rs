//! Error handling for the fetchmux library.
//!
//! Only fatal conditions surface through this module: anything that must stop
//! the whole run. Per-transfer failures never unwind past their request; they
//! are reported through [`TransferOutcome`](crate::transfer::TransferOutcome)
//! instead.

use thiserror::Error;

/// Errors that terminate a whole fetch run.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from the underlying URL parser or the expected URL format.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Error from the reqwest client, including client construction failures.
    #[error("Reqwest error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },
}

/// Result type alias for operations that can fail with a fetchmux error.
pub type Result<T> = std::result::Result<T, Error>;
