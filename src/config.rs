//! Configuration de l'application
//!
//! Le fichier de configuration est au format JSON :
//!
//! ```json
//! {
//!     "token": "...",
//!     "app_id": 123456789012345678,
//!     "permissions": 277025459264,
//!     "data_dir": "database",
//!     "log_level": "info"
//! }
//! ```

use std::{fmt, path::{Path, PathBuf}};

use log::LevelFilter;
use serde::Deserialize;

#[derive(Debug)]
pub enum Error {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, serde_json::Error),
    InvalidLogLevel(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(path, e) => write!(f, "Unable to read file {}: {}", path.to_string_lossy(), e),
            Error::Parse(path, e) => write!(f, "Unable to parse {}: {}", path.to_string_lossy(), e),
            Error::InvalidLogLevel(level) => write!(f, "Invalid log level: {}", level),
        }
    }
}

impl std::error::Error for Error {}

fn default_data_dir() -> PathBuf {
    PathBuf::from("database")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub token: String,
    pub app_id: u64,
    /// Permissions demandées dans le lien d'invitation
    #[serde(default)]
    pub permissions: u64,
    /// Dossier des bases de données des composants
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Config {
    pub fn read_file<P: AsRef<Path>>(filepath: P) -> Result<Self, Error> {
        let filepath = filepath.as_ref();
        let str_config = std::fs::read_to_string(filepath)
            .map_err(|e| Error::Io(filepath.to_path_buf(), e))?;
        serde_json::from_str(&str_config)
            .map_err(|e| Error::Parse(filepath.to_path_buf(), e))
    }
    pub fn log_level(&self) -> Result<Option<LevelFilter>, Error> {
        match &self.log_level {
            Some(level) => level.parse::<LevelFilter>()
                .map(Some)
                .map_err(|_| Error::InvalidLogLevel(level.clone())),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config() {
        let config: Config = serde_json::from_str(r#"{"token": "abc", "app_id": 42}"#).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("database"));
        assert_eq!(config.permissions, 0);
        assert_eq!(config.log_level().unwrap(), None);
    }

    #[test]
    fn log_level() {
        let config: Config = serde_json::from_str(r#"{
            "token": "abc",
            "app_id": 42,
            "log_level": "warn"
        }"#).unwrap();
        assert_eq!(config.log_level().unwrap(), Some(LevelFilter::Warn));

        let config: Config = serde_json::from_str(r#"{"token": "abc", "app_id": 42, "log_level": "bavard"}"#).unwrap();
        assert!(matches!(config.log_level(), Err(Error::InvalidLogLevel(level)) if level == "bavard"));
    }

    #[test]
    fn missing_file() {
        let err = Config::read_file("./does-not-exist.json").unwrap_err();
        assert!(err.to_string().starts_with("Unable to read file"));
    }
}
