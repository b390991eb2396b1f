use std::fs::OpenOptions;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Keeps the log writer alive. Dropping it flushes pending lines.
#[derive(Debug)]
pub struct TelemetryGuard {
    _guard: Option<WorkerGuard>,
}

impl TelemetryGuard {
    fn disabled() -> Self {
        Self { _guard: None }
    }
}

/// Sends tracing output to `log_file`.
///
/// The game owns the terminal, so there is no stderr fallback: without a log
/// file no subscriber is installed and events are dropped.
pub fn init_tracing(log_file: Option<&Path>, default_level: &str) -> TelemetryGuard {
    let Some(path) = log_file else {
        return TelemetryGuard::disabled();
    };

    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Warning: failed to open log file {}: {}", path.display(), err);
            return TelemetryGuard::disabled();
        }
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let (writer, guard) = tracing_appender::non_blocking(file);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer);

    if subscriber.try_init().is_err() {
        return TelemetryGuard::disabled();
    }

    TelemetryGuard { _guard: Some(guard) }
}
