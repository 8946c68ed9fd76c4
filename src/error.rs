use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("stored task data is corrupt: {0}")]
    CorruptStore(#[source] serde_json::Error),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("unknown status '{0}'")]
    UnknownStatus(String),

    #[error("title is required")]
    EmptyTitle,
}

pub type Result<T> = std::result::Result<T, BoardError>;
