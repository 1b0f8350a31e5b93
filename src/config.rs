//! Runtime configuration
//!
//! Everything has a default; environment variables override:
//!
//! | Variable                   | Default                                   |
//! |----------------------------|-------------------------------------------|
//! | `GH_EXPLORER_API_URL`      | `https://api.github.com`                  |
//! | `GH_EXPLORER_DATA_DIR`     | platform data dir + `github-repo-explorer` |
//! | `GH_EXPLORER_TIMEOUT_SECS` | `15`                                      |

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::utils::get_data_dir;

pub const API_URL_ENV: &str = "GH_EXPLORER_API_URL";
pub const TIMEOUT_ENV: &str = "GH_EXPLORER_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const LOG_FILENAME: &str = "explorer.log";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_base_url = env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let request_timeout = match env::var(TIMEOUT_ENV) {
            Ok(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{} must be a whole number of seconds", TIMEOUT_ENV))?;
                Duration::from_secs(secs)
            }
            Err(_) => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            api_base_url,
            user_agent: default_user_agent(),
            request_timeout,
            data_dir: get_data_dir()?,
        })
    }

    /// Config rooted at an explicit data directory, other values default
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            user_agent: default_user_agent(),
            request_timeout: DEFAULT_TIMEOUT,
            data_dir: data_dir.into(),
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILENAME)
    }
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
