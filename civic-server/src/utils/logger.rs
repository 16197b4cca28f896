//! Logging Infrastructure
//!
//! - Console output (pretty in development, JSON when requested)
//! - Daily rotating application logs, deleted after 14 days
//! - Daily rotating audit and security logs, never deleted

use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Days an application log file is kept
const APP_LOG_RETENTION_DAYS: i64 = 14;

fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Daily appender writing `<prefix>.YYYY-MM-DD.log` under `dir`
fn daily_appender(dir: &Path, prefix: &str) -> anyhow::Result<RollingFileAppender> {
    fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(dir)?;
    Ok(appender)
}

fn file_layer(
    dir: &Path,
    prefix: &str,
    json_format: bool,
    keep: fn(&str) -> bool,
) -> anyhow::Result<BoxedLayer> {
    let writer = std::sync::Mutex::new(daily_appender(dir, prefix)?);
    let filter = tracing_subscriber::filter::filter_fn(move |meta| keep(meta.target()));

    let layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_writer(writer)
            .with_filter(filter)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(filter)
            .boxed()
    };
    Ok(layer)
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - default level when `RUST_LOG` is unset (e.g. "info")
/// * `json_format` - JSON lines instead of human-readable output
/// * `log_dir` - optional directory for rolling log files
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_filter(level_filter(level))
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(level_filter(level))
            .boxed()
    };
    layers.push(console);

    if let Some(dir) = log_dir {
        let log_dir = Path::new(dir);
        layers.push(file_layer(&log_dir.join("app"), "app", json_format, |t| {
            t != "audit" && t != "security"
        })?);
        layers.push(file_layer(&log_dir.join("audit"), "audit", json_format, |t| {
            t == "audit"
        })?);
        layers.push(file_layer(
            &log_dir.join("security"),
            "security",
            json_format,
            |t| t == "security",
        )?);

        tokio::spawn(periodic_cleanup(log_dir.to_path_buf()));
    }

    tracing_subscriber::registry().with(layers).try_init()?;
    Ok(())
}

/// Console-only logging
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}

/// Delete application log files older than the retention window
///
/// Audit and security logs are left alone.
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<usize> {
    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let cutoff = (chrono::Utc::now() - chrono::Duration::days(APP_LOG_RETENTION_DAYS)).date_naive();
    let mut removed = 0;

    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(date) = name
            .strip_prefix("app.")
            .and_then(|d| d.strip_suffix(".log"))
            .and_then(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        else {
            continue;
        };
        if date < cutoff {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
            removed += 1;
        }
    }

    Ok(removed)
}

/// Runs every hour to clean old logs
async fn periodic_cleanup(log_dir: PathBuf) {
    use tokio::time::{Duration, sleep};

    loop {
        sleep(Duration::from_secs(3600)).await;

        if let Err(e) = cleanup_old_logs(&log_dir) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }
    }
}
