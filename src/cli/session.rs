//! Login, logout and admin credential commands

use clap::Subcommand;

use super::{password_or_prompt, prompt_password};
use crate::error::{CommitmentError, CommitmentResult};
use crate::models::{Credentials, Session};
use crate::services::auth::AuthService;
use crate::storage::Storage;

/// Admin subcommands
#[derive(Subcommand)]
pub enum AdminCommands {
    /// Change the admin username and password
    SetCredentials {
        /// New admin username
        username: String,
        /// New password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
}

/// Log in as a regular user
pub fn handle_login(
    storage: &Storage,
    username: String,
    password: Option<String>,
) -> CommitmentResult<()> {
    let auth = AuthService::new(storage);
    let password = password_or_prompt(password)?;

    match auth.authenticate_user(&Credentials::new(username, password))? {
        Some(user) => {
            println!("Logged in as {}", user.username);
            auth.set_session(&Session::User { user })?;
            Ok(())
        }
        None => Err(CommitmentError::LoginFailed),
    }
}

pub fn handle_admin_login(
    storage: &Storage,
    username: String,
    password: Option<String>,
) -> CommitmentResult<()> {
    let auth = AuthService::new(storage);
    let password = password_or_prompt(password)?;

    if !auth.authenticate_admin(&Credentials::new(username.clone(), password))? {
        return Err(CommitmentError::LoginFailed);
    }
    auth.set_session(&Session::Admin {
        username: username.clone(),
    })?;
    println!("Logged in as admin {}", username);
    Ok(())
}

pub fn handle_logout(storage: &Storage) -> CommitmentResult<()> {
    let auth = AuthService::new(storage);
    match auth.current_session()? {
        Some(session) => {
            auth.logout()?;
            println!("Logged out {}", session.username());
        }
        None => println!("Not logged in."),
    }
    Ok(())
}

pub fn handle_whoami(storage: &Storage) -> CommitmentResult<()> {
    match AuthService::new(storage).current_session()? {
        Some(Session::Admin { username }) => println!("{} (admin)", username),
        Some(Session::User { user }) => println!("{} ({})", user.username, user.email),
        None => println!("Not logged in."),
    }
    Ok(())
}

pub fn handle_admin_command(storage: &Storage, cmd: AdminCommands) -> CommitmentResult<()> {
    let auth = AuthService::new(storage);
    auth.require_admin()?;

    match cmd {
        AdminCommands::SetCredentials { username, password } => {
            let password = match password {
                Some(password) => password,
                None => {
                    let first = prompt_password("New password: ")?;
                    let second = prompt_password("Confirm password: ")?;
                    if first != second {
                        return Err(CommitmentError::InvalidInput(
                            "Passwords do not match".into(),
                        ));
                    }
                    first
                }
            };

            auth.update_admin_credentials(&Credentials::new(username.clone(), password))?;
            auth.set_session(&Session::Admin {
                username: username.clone(),
            })?;
            println!("Admin credentials updated. Logged in as {}", username);
        }
    }

    Ok(())
}
