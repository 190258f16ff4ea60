//! Runtime configuration.
//!
//! Sources, highest priority first:
//! 1. `DAYTASK_*` environment variables (`DAYTASK_DB_PATH` -> `db_path`)
//! 2. Built-in defaults
//!
//! Front ends may override individual fields after loading.

use crate::logging::{default_log_level, normalize_level};
use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_PREFIX: &str = "DAYTASK_";

const DEFAULT_DB_FILE_NAME: &str = "daytask.sqlite3";

/// Configuration load or validation failure.
#[derive(Debug)]
pub enum ConfigError {
    Figment(figment::Error),
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Figment(err) => write!(f, "configuration error: {err}"),
            Self::InvalidValue { field, reason } => {
                write!(f, "invalid configuration value for `{field}`: {reason}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Figment(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(value: figment::Error) -> Self {
        Self::Figment(value)
    }
}

/// Resolved settings for one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite file holding the snapshot slot.
    pub db_path: PathBuf,
    pub log_level: String,
    /// File logging is disabled when unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Defaults overlaid with the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Provider chain behind `load`, exposed so callers can layer more
    /// providers on top.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "db_path",
                reason: "path is empty".to_string(),
            });
        }
        normalize_level(&self.log_level).map_err(|err| ConfigError::InvalidValue {
            field: "log_level",
            reason: err.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError};
    use figment::Jail;
    use std::path::PathBuf;

    #[test]
    fn defaults_apply_without_environment() {
        Jail::expect_with(|_jail| {
            let config: AppConfig = AppConfig::figment().extract()?;
            assert_eq!(config, AppConfig::default());
            assert_eq!(config.log_dir, None);
            Ok(())
        });
    }

    #[test]
    fn prefixed_environment_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("DAYTASK_DB_PATH", "/tmp/custom.sqlite3");
            jail.set_env("DAYTASK_LOG_DIR", "/var/log/daytask");
            jail.set_env("OTHER_LOG_LEVEL", "trace");

            let config: AppConfig = AppConfig::figment().extract()?;
            assert_eq!(config.db_path, PathBuf::from("/tmp/custom.sqlite3"));
            assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/daytask")));
            assert_eq!(config.log_level, AppConfig::default().log_level);
            Ok(())
        });
    }

    #[test]
    fn unknown_log_level_is_rejected_on_load() {
        Jail::expect_with(|jail| {
            jail.set_env("DAYTASK_LOG_LEVEL", "verbose");

            let err = AppConfig::load().unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidValue {
                    field: "log_level",
                    ..
                }
            ));
            Ok(())
        });
    }
}
