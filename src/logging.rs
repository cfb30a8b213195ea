//! Logging setup: timestamped lines to stdout and to a file under `logs/`.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

const LOG_DIR: &str = "logs";

/// Initialises the global tracing subscriber.
///
/// Lines are written both to stdout and to `logs/<file_name>`; the `logs/`
/// directory is created if absent. The returned guard must be held for the
/// lifetime of the process so buffered log lines are flushed on exit.
pub fn init(file_name: &str) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(LOG_DIR)?;

    let appender = tracing_appender::rolling::never(LOG_DIR, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "wdbc_api=info".into()),
        )
        .with_ansi(false)
        .with_writer(file_writer.and(std::io::stdout))
        .init();

    Ok(guard)
}
