//! Activity log and dashboard commands

use crate::display::{format_activity_list, format_dashboard};
use crate::error::{CommitmentError, CommitmentResult};
use crate::models::Session;
use crate::services::activity::ActivityService;
use crate::services::auth::AuthService;
use crate::storage::Storage;

/// Users see their own months; the admin sees everyone's
pub fn handle_activity_command(storage: &Storage, all: bool) -> CommitmentResult<()> {
    let service = ActivityService::new(storage);

    let entries = match AuthService::new(storage).current_session()? {
        Some(Session::Admin { .. }) => service.all_entries()?,
        Some(Session::User { .. }) if all => {
            return Err(CommitmentError::Forbidden(
                "--all requires an admin login".into(),
            ))
        }
        Some(Session::User { .. }) => {
            let user = AuthService::new(storage).require_user()?;
            service.entries_for(user.id)?
        }
        None => return Err(CommitmentError::NotLoggedIn),
    };

    print!("{}", format_activity_list(&entries));
    Ok(())
}

pub fn handle_dashboard_command(storage: &Storage) -> CommitmentResult<()> {
    AuthService::new(storage).require_admin()?;
    let dashboard = ActivityService::new(storage).dashboard()?;
    print!("{}", format_dashboard(&dashboard));
    Ok(())
}
