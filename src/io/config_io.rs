use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::FocusConfig;

pub const CONFIG_FILE: &str = "focus.toml";

/// Error type for reading focus.toml
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Read focus.toml from the data directory. A missing file gives the defaults.
pub fn read_config(data_dir: &Path) -> Result<FocusConfig, ConfigError> {
    let config_path = data_dir.join(CONFIG_FILE);
    let config_text = match fs::read_to_string(&config_path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(FocusConfig::default()),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: config_path,
                source: e,
            });
        }
    };
    toml::from_str(&config_text).map_err(|e| ConfigError::ParseError {
        path: config_path,
        source: e,
    })
}

/// Like `read_config`, but falls back to the defaults and returns the error
/// as a warning for the caller to surface.
pub fn read_config_or_default(data_dir: &Path) -> (FocusConfig, Option<ConfigError>) {
    match read_config(data_dir) {
        Ok(config) => (config, None),
        Err(e) => (FocusConfig::default(), Some(e)),
    }
}

/// The data directory named on the command line, or the working directory
pub fn resolve_data_dir(dir: Option<&str>) -> io::Result<PathBuf> {
    match dir {
        Some(d) => Ok(PathBuf::from(d)),
        None => std::env::current_dir(),
    }
}

/// Resolved file locations for a data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub dir: PathBuf,
    pub tasks: PathBuf,
    pub log: PathBuf,
}

impl DataPaths {
    pub fn resolve(data_dir: &Path, config: &FocusConfig) -> Self {
        DataPaths {
            dir: data_dir.to_path_buf(),
            tasks: data_dir.join(&config.files.tasks),
            log: data_dir.join(&config.files.log),
        }
    }
}
