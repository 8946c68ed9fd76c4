use std::{fs::OpenOptions, path::Path, str::FromStr, sync::Mutex};

use tracing::Level;

use crate::error::{BoardError, Result};

pub const LOG_FILE: &str = "taskboard.log";

pub fn parse_level(level: &str) -> Result<Level> {
    Level::from_str(level.trim())
        .map_err(|_| BoardError::Config(format!("invalid log level '{level}'")))
}

/// Sends tracing output to `<dir>/taskboard.log`; the terminal belongs to
/// the board. A second call is a no-op.
pub fn init(dir: &Path, level: &str) -> Result<()> {
    let level = parse_level(level)?;
    std::fs::create_dir_all(dir).map_err(|source| BoardError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| BoardError::Io { path, source })?;
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}
