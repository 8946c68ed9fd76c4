use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};
use crate::layout::Column;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub board: BoardConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BoardConfig {
    pub columns: Vec<Column>,
    pub default_status: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: Column::defaults(),
            default_status: "todo".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "taskboard")
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|p| p.config_dir().join("config.toml"))
}

impl Config {
    /// Reads `path`, or the default location when `None`. A missing file
    /// gives the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };
        let data = match std::fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(BoardError::Io { path, source }),
        };
        Self::parse(&data).map_err(|err| match err {
            BoardError::Config(msg) => BoardError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    pub fn parse(data: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(data).map_err(|err| BoardError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let columns = &self.board.columns;
        if columns.is_empty() {
            return Err(BoardError::Config("board.columns must not be empty".to_owned()));
        }
        for (i, column) in columns.iter().enumerate() {
            if column.id.trim().is_empty() {
                return Err(BoardError::Config(format!("column #{} has an empty id", i + 1)));
            }
            if columns[..i].iter().any(|c| c.id == column.id) {
                return Err(BoardError::Config(format!("duplicate column id '{}'", column.id)));
            }
        }
        if !columns.iter().any(|c| c.id == self.board.default_status) {
            return Err(BoardError::Config(format!(
                "board.default_status '{}' is not a column id",
                self.board.default_status
            )));
        }
        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.storage.data_dir {
            return dir.clone();
        }
        project_dirs()
            .map(|p| p.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn has_status(&self, status: &str) -> bool {
        self.board.columns.iter().any(|c| c.id == status)
    }

    pub fn check_status(&self, status: &str) -> Result<()> {
        if self.has_status(status) {
            Ok(())
        } else {
            Err(BoardError::UnknownStatus(status.to_owned()))
        }
    }
}
