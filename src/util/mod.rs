//! Path utilities for traceplay data directories

use std::path::PathBuf;
use std::sync::OnceLock;

/// Global storage for a custom data directory path
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Initialize the data directory with an optional custom path.
/// Call early in main() before any other path functions are used.
/// If `custom_path` is None, uses the default ~/.traceplay location.
pub fn init_data_dir(custom_path: Option<PathBuf>) {
    let path = custom_path.unwrap_or_else(default_data_dir);
    if DATA_DIR.set(path.clone()).is_err() {
        let existing = DATA_DIR
            .get()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        tracing::debug!(
            path = %path.display(),
            existing = %existing,
            "Data directory already initialized"
        );
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".traceplay"))
        .unwrap_or_else(|| PathBuf::from(".traceplay"))
}

/// Base traceplay data directory (custom if set, otherwise ~/.traceplay)
pub fn data_dir() -> PathBuf {
    DATA_DIR.get().cloned().unwrap_or_else(default_data_dir)
}

/// Directory of persisted run documents (~/.traceplay/runs)
pub fn runs_dir() -> PathBuf {
    data_dir().join("runs")
}

/// Log directory (~/.traceplay/logs)
pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Log file path (~/.traceplay/logs/traceplay.log)
pub fn log_file_path() -> PathBuf {
    logs_dir().join("traceplay.log")
}
