//! The callback interface between the session and a transfer.
//!
//! A transfer kind implements [`TransferHandler`] and is driven entirely by
//! the session: zero or more [`on_data`](TransferHandler::on_data) calls,
//! strictly followed by exactly one
//! [`on_complete`](TransferHandler::on_complete). Only one concrete kind
//! exists in this crate ([`FileTransfer`](crate::transfer::FileTransfer)),
//! but the session never depends on it.

use crate::transfer::TransferOutcome;
use reqwest::header::HeaderMap;
use reqwest::{StatusCode, Url};
use std::future::Future;

/// Response metadata captured once, before any body chunk is delivered.
#[derive(Debug, Clone)]
pub struct ResponseInfo {
    /// HTTP status of the response whose body is being streamed.
    pub status: StatusCode,
    /// Raw response headers, available for lazy parsing.
    pub headers: HeaderMap,
}

/// A single in-flight (or completed) transfer, as seen by the session.
pub trait TransferHandler: Send + 'static {
    /// The URL this transfer was created for.
    fn target_url(&self) -> &Url;

    /// Byte offset to resume from. A non-zero value becomes a `Range` header
    /// on the request.
    fn resume_from(&self) -> u64 {
        0
    }

    /// Called once per received body chunk, before completion. Returns the
    /// number of bytes consumed; consuming fewer bytes than offered tells the
    /// session to stop reading this body. Empty chunks are no-ops.
    fn on_data(
        &mut self,
        response: &ResponseInfo,
        chunk: &[u8],
    ) -> impl Future<Output = usize> + Send;

    /// Called exactly once after the transport reports the transfer finished,
    /// on success and failure alike.
    fn on_complete(&mut self, outcome: &TransferOutcome) -> impl Future<Output = ()> + Send;
}
