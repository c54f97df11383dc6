//! The transfer multiplexer.
//!
//! A [`Session`] owns the shared HTTP client and every in-flight transfer,
//! advancing all of them on one event loop. Each registered handler is moved
//! into its driving future and handed back, together with its
//! [`TransferOutcome`], through [`drain_completions`](Session::drain_completions);
//! every finished transfer appears there exactly once.
//!
//! The intended drive step is: [`advance`](Session::advance); if it reports
//! zero active transfers, drain immediately (a set that just emptied will not
//! signal through the wait primitive); otherwise [`wait`](Session::wait) with
//! a bounded timeout, then drain.

use crate::transfer::{ResponseInfo, TransferHandler, TransferOutcome};

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use reqwest::header::RANGE;
use reqwest_middleware::ClientWithMiddleware;
use std::time::Duration;
use tracing::{debug, warn};

/// Multiplexes many independent transfers over one event loop.
pub struct Session<H: TransferHandler> {
    client: ClientWithMiddleware,
    active: FuturesUnordered<BoxFuture<'static, (H, TransferOutcome)>>,
    finished: Vec<(H, TransferOutcome)>,
}

impl<H: TransferHandler> Session<H> {
    /// Creates a session around a shared HTTP client.
    pub fn new(client: ClientWithMiddleware) -> Self {
        Self {
            client,
            active: FuturesUnordered::new(),
            finished: Vec::new(),
        }
    }

    /// Registers a transfer and starts driving it.
    ///
    /// The handler is owned by the session until the transfer finishes and is
    /// returned from [`drain_completions`](Session::drain_completions).
    pub fn register(&mut self, handler: H) {
        let client = self.client.clone();
        self.active.push(run_transfer(client, handler).boxed());
    }

    /// Performs one non-blocking progress step: collects every transfer that
    /// already finished and returns the number still active.
    pub fn advance(&mut self) -> usize {
        while let Some(Some(done)) = self.active.next().now_or_never() {
            self.finished.push(done);
        }
        self.active.len()
    }

    /// Number of transfers currently in flight.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Blocks until the next transfer finishes or `timeout` elapses,
    /// whichever comes first. Never blocks indefinitely; returns immediately
    /// when nothing is active.
    pub async fn wait(&mut self, timeout: Duration) {
        if self.active.is_empty() {
            return;
        }
        if let Ok(Some(done)) = tokio::time::timeout(timeout, self.active.next()).await {
            self.finished.push(done);
        }
    }

    /// Hands back the transfers that finished since the last call, each with
    /// its outcome and exactly once.
    pub fn drain_completions(&mut self) -> Vec<(H, TransferOutcome)> {
        std::mem::take(&mut self.finished)
    }

    /// Terminates the session, abandoning any transfer still in flight.
    ///
    /// Dropping a driving future drops its handler, which closes any open
    /// output file. Files of abandoned transfers may be left partial.
    pub fn close(self) {
        if !self.active.is_empty() {
            warn!(abandoned = self.active.len(), "closing session with transfers in flight");
        }
    }
}

/// Drives one transfer to completion: sends the request, streams body chunks
/// into the handler, and invokes the completion callback exactly once, on
/// success and failure alike.
async fn run_transfer<H: TransferHandler>(
    client: ClientWithMiddleware,
    mut handler: H,
) -> (H, TransferOutcome) {
    let url = handler.target_url().clone();
    debug!(url = %url, "starting transfer");

    let mut request = client.get(url.clone());
    if handler.resume_from() > 0 {
        request = request.header(RANGE, format!("bytes={}-", handler.resume_from()));
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            let outcome = TransferOutcome::new(url.clone(), url, None, 0).fail(e);
            handler.on_complete(&outcome).await;
            return (handler, outcome);
        }
    };

    let effective_url = response.url().clone();
    let info = ResponseInfo {
        status: response.status(),
        headers: response.headers().clone(),
    };

    let mut bytes = 0u64;
    let mut stream_error: Option<String> = None;
    let mut aborted = false;
    let mut stream = response.bytes_stream();
    while let Some(item) = stream.next().await {
        match item {
            Ok(chunk) => {
                let consumed = handler.on_data(&info, &chunk).await;
                bytes += consumed as u64;
                if consumed < chunk.len() {
                    aborted = true;
                    break;
                }
            }
            Err(e) => {
                stream_error = Some(e.to_string());
                break;
            }
        }
    }

    let outcome = TransferOutcome::new(url, effective_url, Some(info.status), bytes);
    let outcome = if let Some(reason) = stream_error {
        outcome.fail(reason)
    } else if !info.status.is_success() {
        outcome.fail(format!("HTTP status {}", info.status.as_u16()))
    } else if aborted {
        outcome.fail("transfer aborted while writing")
    } else {
        outcome
    };

    handler.on_complete(&outcome).await;
    (handler, outcome)
}
