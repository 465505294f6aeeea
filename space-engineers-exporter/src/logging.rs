use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};
use tokio::task;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter, Layer, Registry};

const LOG_MAX_AGE: Duration = Duration::from_secs(60 * 60 * 24 * 3);
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Line format of every log output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable `key=value` lines
    #[default]
    #[serde(alias = "logfmt")]
    #[value(alias = "logfmt")]
    Text,
    /// One JSON object per line
    Json,
}

/// Keeps the file writer alive. Drop it only at shutdown.
#[allow(dead_code)]
pub struct LoggerGuard(Option<WorkerGuard>);

/// Map a configured level onto a filter, falling back to `info`.
pub fn parse_level(level: &str) -> (LevelFilter, bool) {
    match level.to_ascii_lowercase().as_str() {
        "trace" => (LevelFilter::TRACE, true),
        "debug" => (LevelFilter::DEBUG, true),
        "info" => (LevelFilter::INFO, true),
        "warn" => (LevelFilter::WARN, true),
        "error" => (LevelFilter::ERROR, true),
        _ => (LevelFilter::INFO, false),
    }
}

/// Console output, plus a daily rolling file when `log_dir` is given.
/// `RUST_LOG` refines the level.
///
/// Must be called from inside a tokio runtime; old log files are pruned by a
/// background task.
pub fn init_logging(
    log_dir: Option<&Path>,
    prefix: &str,
    level: &str,
    format: LogFormat,
) -> anyhow::Result<LoggerGuard> {
    let (default_level, valid) = parse_level(level);
    let (layers, guard) = build_layers(log_dir, prefix, default_level, format)?;

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    if !valid {
        tracing::warn!("Invalid log level '{}', defaulting to 'info'", level);
    }

    match log_dir {
        Some(dir) => start_log_cleanup_task(dir.to_path_buf(), prefix.to_string()),
        None => tracing::debug!("File logging disabled"),
    }

    Ok(LoggerGuard(guard))
}

fn build_layers(
    log_dir: Option<&Path>,
    prefix: &str,
    default_level: LevelFilter,
    format: LogFormat,
) -> anyhow::Result<(Vec<BoxedLayer>, Option<WorkerGuard>)> {
    let builder = EnvFilter::builder().with_default_directive(default_level.into());
    let rust_log = std::env::var("RUST_LOG").unwrap_or_default();

    let mut layers = vec![fmt_layer(std::io::stdout, true, format)
        .with_filter(builder.clone().parse_lossy(&rust_log))
        .boxed()];

    let Some(log_dir) = log_dir else {
        return Ok((layers, None));
    };

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to create log file appender in {}: {}",
                log_dir.display(),
                e
            )
        })?;
    let (non_blocking, guard) = NonBlocking::new(file_appender);

    layers.push(
        fmt_layer(non_blocking, false, format)
            .with_filter(builder.parse_lossy(&rust_log))
            .boxed(),
    );

    Ok((layers, Some(guard)))
}

fn fmt_layer<W>(writer: W, ansi: bool, format: LogFormat) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Text => fmt::layer().with_writer(writer).with_ansi(ansi).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
    }
}

fn start_log_cleanup_task(log_dir: PathBuf, prefix: String) {
    task::spawn(async move {
        loop {
            if let Err(e) = cleanup_old_logs(&log_dir, &prefix, LOG_MAX_AGE) {
                tracing::warn!("Failed to delete old log file: {}", e);
            }
            tokio::time::sleep(CLEANUP_INTERVAL).await;
        }
    });
}

/// Remove `<prefix>*.log` files in `log_dir` older than `max_age`.
fn cleanup_old_logs(log_dir: &Path, prefix: &str, max_age: Duration) -> std::io::Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !(file_name.starts_with(prefix) && file_name.ends_with(".log")) {
            continue;
        }

        let modified = fs::metadata(&path)?.modified()?;
        if now.duration_since(modified).unwrap_or_default() > max_age {
            fs::remove_file(&path)?;
            tracing::info!("Old log file deleted: {}", file_name);
            removed += 1;
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), (LevelFilter::DEBUG, true));
        assert_eq!(parse_level("WARN"), (LevelFilter::WARN, true));
        assert_eq!(parse_level("verbose"), (LevelFilter::INFO, false));
    }

    #[test]
    fn test_cleanup_only_touches_old_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        let fresh = dir.path().join("space-engineers-exporter.2026-10-16.log");
        let other = dir.path().join("unrelated.log");
        fs::write(&fresh, "x").unwrap();
        fs::write(&other, "y").unwrap();

        let removed =
            cleanup_old_logs(dir.path(), "space-engineers-exporter", LOG_MAX_AGE).unwrap();
        assert_eq!(removed, 0);
        assert!(fresh.exists());

        // A zero max age makes every matching file stale
        std::thread::sleep(Duration::from_millis(20));
        let removed =
            cleanup_old_logs(dir.path(), "space-engineers-exporter", Duration::ZERO).unwrap();
        assert_eq!(removed, 1);
        assert!(!fresh.exists());
        assert!(other.exists());
    }

    #[test]
    fn test_console_only_without_log_dir() {
        let (layers, guard) =
            build_layers(None, "space-engineers-exporter", LevelFilter::INFO, LogFormat::Text)
                .unwrap();
        assert_eq!(layers.len(), 1);
        assert!(guard.is_none());
    }

    #[test]
    fn test_file_layer_with_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let (layers, guard) = build_layers(
            Some(dir.path()),
            "space-engineers-exporter",
            LevelFilter::DEBUG,
            LogFormat::Json,
        )
        .unwrap();
        assert_eq!(layers.len(), 2);
        assert!(guard.is_some());
    }
}
