//! Authentication service
//!
//! Plaintext credential checks for the admin account and regular users, and
//! the persisted session that later commands read.

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{CommitmentError, CommitmentResult};
use crate::models::{Credentials, Session, User};
use crate::storage::Storage;

pub const BOOTSTRAP_ADMIN_USERNAME: &str = "admin";
pub const BOOTSTRAP_ADMIN_PASSWORD: &str = "changeme";

pub struct AuthService<'a> {
    storage: &'a Storage,
}

impl<'a> AuthService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Write bootstrap admin credentials and an empty user list if absent
    ///
    /// Returns `true` when the admin credentials were created.
    pub fn initialize(&self) -> CommitmentResult<bool> {
        let mut created = false;
        if !self.storage.admin.exists() {
            self.storage.admin.save(&Credentials::new(
                BOOTSTRAP_ADMIN_USERNAME,
                BOOTSTRAP_ADMIN_PASSWORD,
            ))?;
            info!("created bootstrap admin credentials");
            created = true;
        }
        if !self.storage.users.exists_on_disk() {
            self.storage.users.save()?;
        }
        Ok(created)
    }

    pub fn authenticate_admin(&self, credentials: &Credentials) -> CommitmentResult<bool> {
        let admin = self.storage.admin.load()?;
        let ok = admin.username == credentials.username && admin.password == credentials.password;
        debug!(username = %credentials.username, ok, "admin authentication");
        Ok(ok)
    }

    /// Active user with a matching password; records the login time
    pub fn authenticate_user(&self, credentials: &Credentials) -> CommitmentResult<Option<User>> {
        let user = match self.storage.users.get_by_username(&credentials.username)? {
            Some(user) if user.is_active() => user,
            _ => {
                debug!(username = %credentials.username, "no active user");
                return Ok(None);
            }
        };
        if user.password != credentials.password {
            debug!(username = %credentials.username, "password mismatch");
            return Ok(None);
        }

        let mut user = user;
        user.last_login = Some(Utc::now());
        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;
        info!(username = %user.username, "user logged in");
        Ok(Some(user))
    }

    pub fn update_admin_credentials(&self, credentials: &Credentials) -> CommitmentResult<()> {
        if credentials.username.trim().is_empty() || credentials.password.is_empty() {
            return Err(CommitmentError::InvalidInput(
                "Admin username and password cannot be empty".into(),
            ));
        }
        self.storage.admin.save(credentials)?;
        info!(username = %credentials.username, "admin credentials updated");
        Ok(())
    }

    pub fn current_session(&self) -> CommitmentResult<Option<Session>> {
        self.storage.session.load()
    }

    pub fn set_session(&self, session: &Session) -> CommitmentResult<()> {
        self.storage.session.save(session)
    }

    pub fn logout(&self) -> CommitmentResult<()> {
        self.storage.session.clear()
    }

    /// The session must belong to the admin
    pub fn require_admin(&self) -> CommitmentResult<String> {
        match self.current_session()? {
            Some(Session::Admin { username }) => Ok(username),
            Some(Session::User { .. }) => Err(CommitmentError::Forbidden(
                "this command requires an admin login".into(),
            )),
            None => Err(CommitmentError::NotLoggedIn),
        }
    }

    /// The session must belong to a user who is still active
    ///
    /// Returns the current stored copy of the user.
    pub fn require_user(&self) -> CommitmentResult<User> {
        let session_user = match self.current_session()? {
            Some(Session::User { user }) => user,
            Some(Session::Admin { .. }) => {
                return Err(CommitmentError::Forbidden(
                    "records belong to user accounts; log in as a user".into(),
                ))
            }
            None => return Err(CommitmentError::NotLoggedIn),
        };

        match self.storage.users.get(session_user.id)? {
            Some(user) if user.is_active() => Ok(user),
            _ => {
                self.logout()?;
                Err(CommitmentError::NotLoggedIn)
            }
        }
    }
}
