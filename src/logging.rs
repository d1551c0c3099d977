use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config;

/// Initialize the process-wide tracing subscriber: stdout plus two rotating
/// file sinks under the configured log directory, a combined log at INFO and
/// above and an error-only log.
///
/// The returned guards must be held for the lifetime of the process; dropping
/// them stops the background writer threads and loses buffered lines.
pub fn init() -> Vec<WorkerGuard> {
    let log_dir = &config::config().logging.dir;
    std::fs::create_dir_all(log_dir).expect("failed to create log directory");

    let combined = rolling::daily(log_dir, "combined.log");
    let (combined_writer, combined_guard) = tracing_appender::non_blocking(combined);

    let errors = rolling::daily(log_dir, "error.log");
    let (error_writer, error_guard) = tracing_appender::non_blocking(errors);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(combined_writer))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(error_writer)
                .with_filter(LevelFilter::ERROR),
        )
        .init();

    vec![combined_guard, error_guard]
}
