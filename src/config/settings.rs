//! User settings for commitments-cli
//!
//! Manages the storage backend choice, listing preferences and the defaults
//! applied to new headers.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::paths::AppPaths;
use crate::error::CommitmentError;

/// Which persistence adapter holds header and record data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON files under the per-user data directory (default)
    #[default]
    Local,
    /// SQLite database with headers/records/record_items tables
    Sqlite,
    /// Read from local files, write to both local files and SQLite
    Mirrored,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Local => write!(f, "local"),
            StorageBackend::Sqlite => write!(f, "sqlite"),
            StorageBackend::Mirrored => write!(f, "mirrored"),
        }
    }
}

/// User settings for commitments-cli
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Persistence adapter for header and records
    #[serde(default)]
    pub backend: StorageBackend,

    /// Rows per page in record listings
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Number of records written to each generated fixture
    #[serde(default = "default_fixture_count")]
    pub fixture_record_count: usize,
}

fn default_schema_version() -> u32 {
    1
}

fn default_page_size() -> usize {
    20
}

fn default_fixture_count() -> usize {
    300
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            backend: StorageBackend::default(),
            page_size: default_page_size(),
            fixture_record_count: default_fixture_count(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &AppPaths) -> Result<Self, CommitmentError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                CommitmentError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                CommitmentError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &AppPaths) -> Result<(), CommitmentError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            CommitmentError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            CommitmentError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.backend, StorageBackend::Local);
        assert_eq!(settings.page_size, 20);
        assert_eq!(settings.fixture_record_count, 300);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.backend = StorageBackend::Sqlite;
        settings.page_size = 50;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.backend, StorageBackend::Sqlite);
        assert_eq!(loaded.page_size, 50);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"backend": "mirrored"}"#).unwrap();
        assert_eq!(settings.backend, StorageBackend::Mirrored);
        assert_eq!(settings.page_size, 20);
        assert_eq!(settings.schema_version, 1);
    }
}
