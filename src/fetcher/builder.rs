//! Builder pattern implementation for creating [`Fetcher`] instances.
//!
//! ```rust
//! use fetchmux::FetcherBuilder;
//! use std::path::PathBuf;
//!
//! let fetcher = FetcherBuilder::new()
//!     .directory(PathBuf::from("./downloads"))
//!     .parallel(4)
//!     .build();
//! ```

use super::{config::FetcherConfig, fetcher::Fetcher};
use crate::fetcher::CancelFlag;

use reqwest::header::{HeaderMap, HeaderValue, IntoHeaderName};
use reqwest::Proxy;
use std::path::PathBuf;

/// A builder used to create a [`Fetcher`].
#[derive(Default)]
pub struct FetcherBuilder {
    config: FetcherConfig,
}

impl FetcherBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        FetcherBuilder::default()
    }

    /// Sets the directory where output files are created.
    pub fn directory(mut self, directory: PathBuf) -> Self {
        self.config.directory = directory;
        self
    }

    /// Sets the parallelism bound. Values below 1 are raised to 1.
    pub fn parallel(mut self, parallel: usize) -> Self {
        self.config.parallel = parallel.max(1);
        self
    }

    /// Sets a proxy for all transfers.
    pub fn proxy(mut self, proxy: Proxy) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Shares a cancellation flag with the fetcher.
    pub fn cancel(mut self, cancel: CancelFlag) -> Self {
        self.config.cancel = cancel;
        self
    }

    fn new_header(&self) -> HeaderMap {
        match self.config.headers {
            Some(ref h) => h.to_owned(),
            _ => HeaderMap::new(),
        }
    }

    /// Adds HTTP headers applied to every request.
    ///
    /// Can be called multiple times; all maps are merged into one. See also
    /// [`header()`](FetcherBuilder::header).
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut new = self.new_header();
        new.extend(headers);

        self.config.headers = Some(new);
        self
    }

    /// Adds a single HTTP header applied to every request.
    ///
    /// ```
    /// use reqwest::header::{self, HeaderValue};
    /// use fetchmux::FetcherBuilder;
    ///
    /// let ua = HeaderValue::from_static("curl/7.87");
    /// let fetcher = FetcherBuilder::new().header(header::USER_AGENT, ua).build();
    /// ```
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        let mut new = self.new_header();
        new.insert(name, value);

        self.config.headers = Some(new);
        self
    }

    /// Creates the [`Fetcher`] with the specified options.
    pub fn build(self) -> Fetcher {
        Fetcher::new(self.config)
    }
}
