//! Per-transfer lifecycle: the callback interface invoked by the session,
//! the file-writing transfer kind, and the per-transfer outcome.
//!
//! - `handler` - The [`TransferHandler`] interface and [`ResponseInfo`]
//! - `request` - [`FileTransfer`], the transfer kind that streams to disk
//! - `outcome` - [`TransferOutcome`] and [`TransferStatus`] reporting

pub mod handler;
pub mod outcome;
pub mod request;

pub use handler::{ResponseInfo, TransferHandler};
pub use outcome::{TransferOutcome, TransferStatus};
pub use request::FileTransfer;
