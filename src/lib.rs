//! Fetchmux downloads many files asynchronously via HTTP(S), multiplexing
//! all transfers over a single event loop with a caller-bounded degree of
//! parallelism.
//!
//! Each transfer streams its body to disk as chunks arrive. The output
//! filename is taken from the server's `Content-Disposition` header when
//! present, falling back to the last URL path segment and finally to
//! `index.html`. One failed transfer never aborts the others.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fetchmux::{Error, FetcherBuilder};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Error> {
//! let fetcher = FetcherBuilder::new().parallel(4).build();
//! let urls = vec![
//!     "https://example.com/a.zip".to_string(),
//!     "https://example.com/b.pdf".to_string(),
//! ];
//! let outcomes = fetcher.fetch(&urls).await?;
//! for outcome in outcomes {
//!     println!("{} -> {:?}", outcome.url(), outcome.status());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`fetcher`] - The `Fetcher` and `FetcherBuilder` pump loop driving admission
//! - [`session`] - The transfer multiplexer owning all in-flight transfers
//! - [`transfer`] - Per-transfer lifecycle, callbacks, and outcomes
//! - [`headers`] - Pure response header metadata parsing
//! - [`http`] - HTTP client construction and middleware
//! - [`error`] - Centralized error handling with the `Error` enum

pub mod error;
pub mod fetcher;
pub mod headers;
pub mod http;
pub mod session;
pub mod transfer;

pub use error::{Error, Result};
pub use fetcher::{CancelFlag, Fetcher, FetcherBuilder};
pub use headers::{parse_content_disposition, parse_content_type, HeaderMetadata};
pub use http::{create_http_client, HttpClientConfig};
pub use session::Session;
pub use transfer::{FileTransfer, ResponseInfo, TransferHandler, TransferOutcome, TransferStatus};
