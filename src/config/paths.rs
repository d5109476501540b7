//! Path management for commitments-cli
//!
//! Resolves where configuration, account data and per-user record data live.
//!
//! ## Path Resolution Order
//!
//! 1. `COMMITMENTS_CLI_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory (`~/.config/commitments-cli` on
//!    Linux, `%APPDATA%\commitments-cli` on Windows)

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::CommitmentError;
use crate::models::UserId;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "COMMITMENTS_CLI_DATA_DIR";

/// Manages all paths used by commitments-cli
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Base directory for all commitments-cli data
    base_dir: PathBuf,
}

impl AppPaths {
    /// Resolve the base directory from the environment or the platform default
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, CommitmentError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            let dirs = BaseDirs::new().ok_or_else(|| {
                CommitmentError::Config("Could not determine home directory".into())
            })?;
            dirs.config_dir().join("commitments-cli")
        };

        Ok(Self { base_dir })
    }

    /// Create AppPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (`<base>/data/`)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Directory holding one user's header, records and prefill flag
    pub fn user_dir(&self, user_id: UserId) -> PathBuf {
        self.data_dir().join("users").join(user_id.as_uuid().to_string())
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// SQLite database used by the relational backend
    pub fn database_file(&self) -> PathBuf {
        self.data_dir().join("commitments.db")
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    pub fn admin_file(&self) -> PathBuf {
        self.data_dir().join("admin.json")
    }

    pub fn session_file(&self) -> PathBuf {
        self.data_dir().join("session.json")
    }

    pub fn activity_file(&self) -> PathBuf {
        self.data_dir().join("activity.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), CommitmentError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| CommitmentError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| CommitmentError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if the tool has been initialized (admin credentials exist)
    pub fn is_initialized(&self) -> bool {
        self.admin_file().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(
            paths.database_file(),
            temp_dir.path().join("data").join("commitments.db")
        );
    }

    #[test]
    fn test_user_dir_is_per_user() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());

        let a = UserId::new();
        let b = UserId::new();
        assert_ne!(paths.user_dir(a), paths.user_dir(b));
        assert!(paths.user_dir(a).starts_with(paths.data_dir()));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(!paths.is_initialized());
    }
}
