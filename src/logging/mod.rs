use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

use crate::config::APP_DIR_NAME;

const LOG_FILE_PREFIX: &str = "sink-switch.log";

/// Logging configuration
pub struct LoggingConfig {
    pub level: Level,
    pub file_output: bool,
    pub console_output: bool,
    pub log_dir: Option<PathBuf>,
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            file_output: false,
            console_output: true,
            log_dir: None,
            json_format: false,
        }
    }
}

/// Build the filter directive; `RUST_LOG` wins when set
fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("sink_switch={}", level.as_str().to_lowercase()))
    })
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Output layers for `config`, plus the file writer guard and log directory
fn build_layers(
    config: &LoggingConfig,
) -> Result<(Vec<BoxedLayer>, Option<WorkerGuard>, Option<PathBuf>)> {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = None;

    // stdout is reserved for command output
    if config.console_output {
        let console_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_target(true)
                .with_writer(std::io::stderr)
                .boxed()
        } else {
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr)
                .boxed()
        };
        layers.push(console_layer);
    }

    let log_dir = if config.file_output {
        let dir = match config.log_dir.clone() {
            Some(dir) => dir,
            None => default_log_dir()?,
        };
        std::fs::create_dir_all(&dir)?;

        let file_appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);

        let file_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(non_blocking)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_writer(non_blocking)
                .boxed()
        };
        layers.push(file_layer);

        Some(dir)
    } else {
        None
    };

    Ok((layers, guard, log_dir))
}

/// Initialize logging: stderr console output plus an optional daily-rotated file
///
/// Returns a tuple of (WorkerGuard, log_dir). The guard must be held until exit
/// so buffered file output is flushed.
pub fn initialize_logging(config: LoggingConfig) -> Result<(Option<WorkerGuard>, Option<PathBuf>)> {
    let (layers, guard, log_dir) = build_layers(&config)?;

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter(config.level))
        .init();

    Ok((guard, log_dir))
}

/// Get the default log directory path
pub fn default_log_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Failed to get local data directory"))?;
    Ok(data_dir.join(APP_DIR_NAME).join("logs"))
}

/// Remove rotated log files older than `keep_days`. Returns how many were removed.
pub fn cleanup_old_logs(log_dir: &Path, keep_days: u64) -> Result<usize> {
    use std::time::{Duration, SystemTime};

    let cutoff_time = SystemTime::now() - Duration::from_secs(60 * 60 * 24 * keep_days);

    if !log_dir.exists() {
        return Ok(0);
    }

    let mut cleaned_count = 0;
    for entry in std::fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();

        let is_log = path.is_file()
            && path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(LOG_FILE_PREFIX));
        if !is_log {
            continue;
        }

        let modified = entry.metadata().and_then(|m| m.modified());
        if let Ok(modified) = modified {
            if modified < cutoff_time {
                match std::fs::remove_file(&path) {
                    Ok(()) => {
                        cleaned_count += 1;
                        tracing::debug!("Removed old log file: {}", path.display());
                    }
                    Err(e) => {
                        tracing::warn!("Failed to remove old log file {}: {}", path.display(), e)
                    }
                }
            }
        }
    }

    if cleaned_count > 0 {
        tracing::info!(
            "Cleaned up {} old log files from {}",
            cleaned_count,
            log_dir.display()
        );
    }

    Ok(cleaned_count)
}
