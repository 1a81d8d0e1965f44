//! Core runtime configuration.
//!
//! # Responsibility
//! - Describe where the store lives and how logging is set up.
//! - Load settings from JSON with environment overrides on top.
//!
//! # Invariants
//! - `log_level` is always one of `trace|debug|info|warn|error` after `validate()`.
//! - `log_dir`, when set, is absolute.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "GENEU_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "GENEU_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "GENEU_LOG_DIR";

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Settings consumed by `open_db_from_config` and `init_logging`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// SQLite file. `None` keeps the store in memory.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Rolling log directory. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Parses a JSON document; missing keys fall back to defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()
    }

    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Defaults overridden by `GENEU_*` process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`; blank values are ignored.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(path) = read(ENV_DB_PATH) {
            self.db_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(dir.trim()));
        }
        self.validate()
    }

    /// Normalizes the log level and checks the log directory.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        self.log_level = normalize_level(&self.log_level)
            .map_err(ConfigError::Invalid)?
            .to_string();
        if let Some(dir) = &self.log_dir {
            let text = dir
                .to_str()
                .ok_or_else(|| ConfigError::Invalid("log_dir must be valid UTF-8".to_string()))?;
            normalize_log_dir(text).map_err(ConfigError::Invalid)?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, ENV_DB_PATH, ENV_LOG_LEVEL};
    use std::path::PathBuf;

    #[test]
    fn empty_document_uses_defaults() {
        let config = CoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert!(config.db_path.is_none());
    }

    #[test]
    fn json_values_are_normalized() {
        let config =
            CoreConfig::from_json_str(r#"{"db_path": "/tmp/geneu.db", "log_level": "WARNING"}"#)
                .unwrap();
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/geneu.db")));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let err = CoreConfig::from_json_str(r#"{"log_dir": "logs"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(message) if message.contains("absolute")));
    }

    #[test]
    fn overrides_replace_values_and_skip_blanks() {
        let config = CoreConfig::default()
            .with_overrides(|key| match key {
                ENV_DB_PATH => Some("/var/lib/geneu.db".to_string()),
                ENV_LOG_LEVEL => Some("  ".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.db_path, Some(PathBuf::from("/var/lib/geneu.db")));
        assert_eq!(config.log_level, CoreConfig::default().log_level);
    }

    #[test]
    fn unknown_level_override_fails() {
        let err = CoreConfig::default()
            .with_overrides(|key| (key == ENV_LOG_LEVEL).then(|| "loud".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
