use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Name of the per-user state directory under `$HOME`.
const APP_DIR: &str = ".gamestats";

/// Log file used by the dashboard when no `--log-file` is given.
const DASHBOARD_LOG: &str = "gamestats.log";

// ── Directory bootstrap ────────────────────────────────────────────────────────

fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Ensure `~/.gamestats/` and `~/.gamestats/logs/` exist.
pub fn ensure_directories() -> anyhow::Result<()> {
    let dir = app_dir();
    std::fs::create_dir_all(&dir)?;
    std::fs::create_dir_all(dir.join("logs"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name onto an [`EnvFilter`] directive.
fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        other => other.to_lowercase(),
    }
}

/// Where log lines end up for a given run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// An explicit `log_file` always wins. The dashboard owns the terminal, so
/// without one it logs under `app_dir/logs`.
pub fn log_target(log_file: Option<&Path>, dashboard: bool, app_dir: &Path) -> LogTarget {
    match log_file {
        Some(path) => LogTarget::File(path.to_path_buf()),
        None if dashboard => LogTarget::File(app_dir.join("logs").join(DASHBOARD_LOG)),
        None => LogTarget::Stderr,
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Unrecognised level strings fall back to `info`.
pub fn setup_logging(
    log_level: &str,
    log_file: Option<&PathBuf>,
    dashboard: bool,
) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    match log_target(log_file.map(PathBuf::as_path), dashboard, &app_dir()) {
        LogTarget::Stderr => {
            let layer = fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()?;
        }
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()?;
        }
    }

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
