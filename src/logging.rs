//! Logger setup
//!
//! `RUST_LOG` controls the filter (default `warn`). One-shot commands log to
//! stderr; the interactive TUI owns the terminal, so its logs go to a file.

use std::fs::{self, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};

const DEFAULT_FILTER: &str = "warn";

pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
}

pub fn init(target: LogTarget<'_>) -> Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));

    match target {
        LogTarget::Stderr => {
            builder.target(Target::Stderr);
        }
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            builder.target(Target::Pipe(Box::new(file))).write_style(env_logger::WriteStyle::Never);
        }
    }

    // A logger may already be installed (tests, embedding); keep it
    let _ = builder.try_init();
    Ok(())
}
