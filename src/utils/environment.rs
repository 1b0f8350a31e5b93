use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "GH_EXPLORER_DATA_DIR";

const APP_DIR_NAME: &str = "github-repo-explorer";

/// Get the directory holding search history, exports and logs.
///
/// `GH_EXPLORER_DATA_DIR` wins when set and non-empty; otherwise the platform
/// data directory is used:
/// - macOS: `~/Library/Application Support/github-repo-explorer/`
/// - Linux: `~/.local/share/github-repo-explorer/`
/// - Windows: `%APPDATA%\github-repo-explorer\`
pub fn get_data_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    let base = dirs::data_dir().context("Failed to get platform data directory")?;
    Ok(base.join(APP_DIR_NAME))
}
