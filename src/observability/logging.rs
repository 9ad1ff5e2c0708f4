use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "hazard_map=info";

/// Initializes the logging system with both console and file output.
///
/// Console lines are human readable; the daily rotated file under `log_dir`
/// gets JSON. `RUST_LOG` overrides the default `hazard_map=info` filter.
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init_logging(log_dir: impl AsRef<Path>) -> WorkerGuard {
    let log_dir = log_dir.as_ref();
    // Ensure logs directory exists
    let _ = fs::create_dir_all(log_dir);

    let file_appender = tracing_appender::rolling::daily(log_dir, "hazard_map.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);
    let console_layer = fmt::layer().with_writer(std::io::stderr);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    // try_init so a second call (tests, embedding apps) does not panic
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_creates_dir_and_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");

        let _first = init_logging(&log_dir);
        let _second = init_logging(&log_dir);

        assert!(log_dir.is_dir());
    }
}
