use std::path::PathBuf;

pub const APP_DIR: &str = "taskdeck";
pub const IDENTITY_FILE: &str = "identity.json";
pub const CONFIG_FILE: &str = "config.yaml";

/// Resolve the durable data directory.
///
/// Priority:
/// 1. `TASKDECK_DATA_DIR` env var
/// 2. Platform data dir (e.g. `~/.local/share/taskdeck`)
///
/// Returns `None` when neither resolves; callers fall back to a
/// non-persistent identity store.
pub fn data_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("TASKDECK_DATA_DIR") {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir));
        }
    }
    dirs::data_dir().map(|d| d.join(APP_DIR))
}

/// Resolve the config directory (e.g. `~/.config/taskdeck`).
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("TASKDECK_CONFIG_DIR") {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir));
        }
    }
    dirs::config_dir().map(|d| d.join(APP_DIR))
}

pub fn identity_path() -> Option<PathBuf> {
    data_dir().map(|d| d.join(IDENTITY_FILE))
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join(CONFIG_FILE))
}
