use std::io;
use std::path::Path;
use tracing_appender::rolling;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Console filter used when `RUST_LOG` is not set.
pub const DEFAULT_CONSOLE_FILTER: &str = "info,llm_request=info,cache=warn";
pub const FILE_FILTER: &str = "llm_request=debug,info";

/// Installs the global subscriber: stderr plus a daily rolling file in `log_dir`.
pub fn configure_logging(log_dir: impl AsRef<Path>) {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_CONSOLE_FILTER));

    // Console log configuration; stdout is reserved for the digest output
    let console_log = fmt::layer()
        .with_writer(io::stderr)
        .with_filter(console_filter);

    // File log configuration
    let file_appender = rolling::daily(log_dir.as_ref(), "briefing.log");
    let file_log = fmt::layer()
        .with_ansi(false)
        .with_writer(file_appender)
        .with_filter(EnvFilter::new(FILE_FILTER));

    tracing_subscriber::Registry::default()
        .with(console_log)
        .with(file_log)
        .init();
}
