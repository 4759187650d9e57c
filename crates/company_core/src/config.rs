//! Runtime configuration for binaries embedding company core.
//!
//! # Responsibility
//! - Provide defaults for database location and logging.
//! - Apply `COMPANY_*` environment overrides.
//!
//! # Invariants
//! - Blank override values are ignored.
//! - Loading configuration never touches the database or the logger.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "COMPANY_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "COMPANY_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "COMPANY_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "company.db";

/// Settings needed to open the database and start logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files. `None` disables file logs.
    pub log_dir: Option<PathBuf>,
}

impl Default for CompanyConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CompanyConfig {
    /// Loads defaults overridden by process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads defaults overridden by values returned from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(path) = non_blank(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = non_blank(LOG_LEVEL_ENV) {
            config.log_level = level;
        }
        if let Some(dir) = non_blank(LOG_DIR_ENV) {
            config.log_dir = Some(PathBuf::from(dir));
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::{CompanyConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn defaults_point_at_company_db_without_file_logs() {
        let config = CompanyConfig::from_lookup(|_| None);
        assert_eq!(config.db_path, PathBuf::from("company.db"));
        assert_eq!(config.log_level, default_log_level());
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn overrides_replace_defaults_and_blank_values_are_ignored() {
        let env: HashMap<&str, &str> = HashMap::from([
            (DB_PATH_ENV, "/tmp/hr.db"),
            (LOG_LEVEL_ENV, "  "),
            (LOG_DIR_ENV, "/var/log/company"),
        ]);

        let config = CompanyConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.db_path, PathBuf::from("/tmp/hr.db"));
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/company")));
    }
}
