//! Bootstrap configuration
//!
//! Defaults match the hosted deployment (`RENDER`, `DATABASE_URL`, `.env`).
//! A TOML file may override any of them under `[database]`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BootstrapError, Result};

/// Marker variable set by the hosting platform
pub const DEFAULT_HOSTED_MARKER: &str = "RENDER";

/// Variable holding the PostgreSQL connection string
pub const DEFAULT_DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Local env file, relative to the working directory
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Default maximum connections for the pool.
/// Kept low; the backend is a single small service.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Knobs for [`crate::Bootstrap`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub hosted_marker: String,
    pub database_url_var: String,
    pub env_file: PathBuf,
    pub max_connections: u32,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            hosted_marker: DEFAULT_HOSTED_MARKER.to_string(),
            database_url_var: DEFAULT_DATABASE_URL_VAR.to_string(),
            env_file: PathBuf::from(DEFAULT_ENV_FILE),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

/// On-disk layout: everything lives under an optional `[database]` table
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    database: BootstrapConfig,
}

impl BootstrapConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| BootstrapError::config(format!("invalid TOML: {}", e)))?;
        file.database.validate()?;
        Ok(file.database)
    }

    /// Read and parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject values the bootstrap cannot work with.
    ///
    /// Call again after overriding fields by hand.
    pub fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            return Err(BootstrapError::config("max_connections must be at least 1"));
        }
        if self.database_url_var.trim().is_empty() {
            return Err(BootstrapError::config("database_url_var must not be empty"));
        }
        if self.hosted_marker.trim().is_empty() {
            return Err(BootstrapError::config("hosted_marker must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BootstrapConfig::default();
        assert_eq!(config.hosted_marker, "RENDER");
        assert_eq!(config.database_url_var, "DATABASE_URL");
        assert_eq!(config.env_file, PathBuf::from(".env"));
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn empty_document_keeps_defaults() {
        let config = BootstrapConfig::from_toml_str("").unwrap();
        assert_eq!(config, BootstrapConfig::default());
    }

    #[test]
    fn partial_database_table() {
        let config = BootstrapConfig::from_toml_str(
            r#"
            [database]
            max_connections = 12
            env_file = "config/dev.env"
            "#,
        )
        .unwrap();

        assert_eq!(config.max_connections, 12);
        assert_eq!(config.env_file, PathBuf::from("config/dev.env"));
        assert_eq!(config.database_url_var, "DATABASE_URL");
    }

    #[test]
    fn rejects_zero_connections() {
        let err = BootstrapConfig::from_toml_str("[database]\nmax_connections = 0\n").unwrap_err();
        assert!(matches!(err, BootstrapError::Config { .. }));
    }

    #[test]
    fn validate_catches_hand_edited_fields() {
        let mut config = BootstrapConfig::default();
        assert!(config.validate().is_ok());

        config.database_url_var = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("database_url_var must not be empty"));

        config.database_url_var = "DATABASE_URL".to_string();
        config.hosted_marker = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todoctl.toml");
        fs::write(&path, "[database]\nhosted_marker = \"DEPLOYED\"\n").unwrap();

        let config = BootstrapConfig::load(&path).unwrap();
        assert_eq!(config.hosted_marker, "DEPLOYED");
    }

    #[test]
    fn rejects_invalid_toml() {
        let err = BootstrapConfig::from_toml_str("[database\n").unwrap_err();
        assert!(err.to_string().contains("invalid TOML"));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = BootstrapConfig::load(&dir.path().join("todoctl.toml")).unwrap_err();
        assert!(matches!(err, BootstrapError::Io { .. }));
    }
}
