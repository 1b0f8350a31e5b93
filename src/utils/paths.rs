use std::borrow::Cow;
use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Write a file atomically (temp file + rename), creating parent directories
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let file_name = path
        .file_name()
        .with_context(|| format!("Not a file path: {}", path.display()))?;
    let mut temp_name = file_name.to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, contents)
        .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;
    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to {}", path.display()))?;

    Ok(())
}

/// Formats a path with ~ substitution for the home directory
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use github_repo_explorer::utils::format_path_with_tilde;
///
/// let path = PathBuf::from("/Users/alice/.local/share/github-repo-explorer");
/// // Returns "~/.local/share/github-repo-explorer" if HOME=/Users/alice
/// let formatted = format_path_with_tilde(&path);
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

/// Internal helper for path formatting with optional home override (for testing)
pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref()).filter(|h| !h.is_empty());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && let Some(rest) = path_str.strip_prefix(home)
        && (rest.is_empty() || rest.starts_with('/'))
    {
        return format!("~{}", rest);
    }

    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}
