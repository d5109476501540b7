//! Configuration module for commitments-cli
//!
//! This module provides configuration management including:
//! - data directory resolution
//! - user settings persistence

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{Settings, StorageBackend};
