//! Command-line frontend for fetchmux.
//!
//! Arguments follow a `key=value` scheme: `verbose=1|0`, `proxy=<url>`,
//! `parallel=<n>`, plus one or more `http://`/`https://` URLs.

use fetchmux::{CancelFlag, Error, FetcherBuilder, Result};

use reqwest::Proxy;
use tracing_subscriber::EnvFilter;

struct Args {
    urls: Vec<String>,
    verbose: bool,
    proxy: Option<String>,
    parallel: usize,
}

fn parse_args(argv: impl Iterator<Item = String>) -> Args {
    let mut args = Args {
        urls: Vec::new(),
        verbose: false,
        proxy: None,
        parallel: 1,
    };
    for arg in argv {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            args.urls.push(arg);
        } else if let Some(value) = arg.strip_prefix("verbose=") {
            args.verbose = value == "1";
        } else if let Some(value) = arg.strip_prefix("proxy=") {
            args.proxy = Some(value.to_string());
        } else if let Some(value) = arg.strip_prefix("parallel=") {
            // Non-numeric values keep the previous setting.
            if let Ok(n) = value.parse::<usize>() {
                args.parallel = n;
            }
        }
    }
    args
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = parse_args(std::env::args().skip(1));

    if args.urls.is_empty() {
        println!("Usage: fetchmux [verbose=1|0] [proxy=<proxy>] [parallel=<n>] url1 url2 ...");
        return Ok(());
    }

    let default_filter = if args.verbose { "fetchmux=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let cancel = CancelFlag::new();
    let watcher = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\nInterrupted");
            watcher.cancel();
        }
    });

    let mut builder = FetcherBuilder::new()
        .parallel(args.parallel)
        .cancel(cancel);
    if let Some(proxy) = args.proxy {
        let proxy = Proxy::all(&proxy).map_err(|e| Error::InvalidUrl(format!("{proxy}: {e}")))?;
        builder = builder.proxy(proxy);
    }

    let fetcher = builder.build();
    fetcher.fetch(&args.urls).await?;

    Ok(())
}
