//! The pump loop: admission control and clean termination.
//!
//! - `fetcher` - the [`Fetcher`] driving the session until the queue drains
//! - `builder` - [`FetcherBuilder`] for flexible configuration
//! - `config` - [`FetcherConfig`] and the [`CancelFlag`] cancellation token

pub mod builder;
pub mod config;
pub mod fetcher;

pub use builder::FetcherBuilder;
pub use config::{CancelFlag, FetcherConfig};
pub use fetcher::Fetcher;
