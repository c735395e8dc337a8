use anyhow::{Context, Result};
use core_types::config::LoggingConfig;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILE: &str = "moviehub.log";

/// Install the global subscriber with default settings (console only).
pub fn init_tracing() -> Result<Option<WorkerGuard>> {
    init_tracing_with_config(&LoggingConfig::default())
}

/// Install the global subscriber: stderr output plus an optional daily-rolling file.
///
/// `RUST_LOG` overrides the configured level. Keep the returned guard alive for
/// as long as file output should be flushed.
pub fn init_tracing_with_config(cfg: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match cfg.file.as_deref().filter(|f| !f.trim().is_empty()) {
        Some(file) => {
            let (dir, name) = split_log_path(Path::new(file));
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(&dir, &name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = if cfg.json {
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .boxed()
            } else {
                fmt::layer().with_ansi(false).with_writer(writer).boxed()
            };
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let console = fmt::layer().with_target(false).with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console)
        .with(env_filter(&cfg.level))
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(guard)
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Split a configured log file into the directory and file-name prefix the appender wants.
fn split_log_path(path: &Path) -> (PathBuf, String) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let name = path
        .file_name()
        .map_or_else(|| DEFAULT_LOG_FILE.to_string(), |n| n.to_string_lossy().into_owned());
    (dir, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_splits_into_dir_and_prefix() {
        let (dir, name) = split_log_path(Path::new("logs/app/moviehub.log"));
        assert_eq!(dir, PathBuf::from("logs/app"));
        assert_eq!(name, "moviehub.log");
    }

    #[test]
    fn bare_file_name_lands_in_working_dir() {
        let (dir, name) = split_log_path(Path::new("movies.log"));
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, "movies.log");
    }

    #[test]
    fn directory_only_path_gets_default_name() {
        let (dir, name) = split_log_path(Path::new("/"));
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, DEFAULT_LOG_FILE);
    }
}
