//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod activity;
pub mod export;
pub mod fixtures;
pub mod header;
pub mod record;
pub mod sequence;
pub mod session;
pub mod user;
pub mod xml;

pub use activity::{handle_activity_command, handle_dashboard_command};
pub use export::{handle_export_command, ExportCommands};
pub use fixtures::{handle_fixtures_command, FixturesCommands};
pub use header::{handle_header_command, HeaderCommands};
pub use record::{handle_record_command, RecordCommands};
pub use sequence::{handle_sequence_command, SequenceCommands};
pub use session::{
    handle_admin_command, handle_admin_login, handle_login, handle_logout, handle_whoami,
    AdminCommands,
};
pub use user::{handle_user_command, UserCommands};
pub use xml::{handle_xml_command, XmlCommands};

use crate::config::Settings;
use crate::error::{CommitmentError, CommitmentResult};
use crate::services::activity::UserActivityLog;
use crate::services::auth::AuthService;
use crate::services::workspace::Workspace;
use crate::storage::{open_store, Storage};

/// Open the logged-in user's workspace on the configured backend
pub fn open_workspace<'a>(storage: &'a Storage, settings: &Settings) -> CommitmentResult<Workspace<'a>> {
    let user = AuthService::new(storage).require_user()?;
    let store = open_store(settings.backend, storage.paths(), user.id)?;
    Workspace::open(store, Box::new(UserActivityLog::new(storage, user)))
}

/// Prompt for a password (hidden input)
pub(crate) fn prompt_password(prompt: &str) -> CommitmentResult<String> {
    rpassword::prompt_password(prompt)
        .map_err(|e| CommitmentError::Io(format!("Failed to read password: {}", e)))
}

/// Use the given password or prompt for one
pub(crate) fn password_or_prompt(password: Option<String>) -> CommitmentResult<String> {
    match password {
        Some(password) => Ok(password),
        None => prompt_password("Password: "),
    }
}
