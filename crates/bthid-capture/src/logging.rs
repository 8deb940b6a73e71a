//! Tracing setup shared by the adapter binaries.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialises structured logging. Level is overridden by `RUST_LOG`; when a
/// log path is configured, output goes to that file instead of stderr.
///
/// The returned guard must be held for the life of the process or buffered
/// log lines are lost.
pub fn init(log_path: Option<&str>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_path {
        Some(path) => {
            let path = Path::new(path);
            let appender = tracing_appender::rolling::never(
                path.parent().unwrap_or_else(|| Path::new(".")),
                path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("bthid.log")),
            );
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    }
}
