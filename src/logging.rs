use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default filter when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "rentdesk=info,tower_http=info";

/// Initializes logging: human-readable output on stdout, plus JSON lines in
/// a daily-rotated file when `log_dir` is given.
///
/// The returned guard flushes the file writer when dropped, so the caller
/// keeps it alive for the life of the process.
pub fn init_logging(log_dir: Option<&str>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match log_dir {
        Some(dir) => {
            if let Err(e) = fs::create_dir_all(dir) {
                eprintln!("Could not create log directory {}: {}", dir, e);
            }
            let file_appender = tracing_appender::rolling::daily(dir, "rentdesk.log");
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = fmt::layer().json().with_writer(writer);

            tracing_subscriber::registry()
                .with(filter)
                .with(file_layer)
                .with(fmt::layer().with_writer(std::io::stdout))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stdout))
                .init();
            None
        }
    }
}
