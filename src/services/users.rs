//! User management service
//!
//! Admin-side CRUD for user accounts. New accounts trigger a welcome notice
//! through a [`WelcomeNotifier`].

use tracing::{info, warn};

use crate::error::{CommitmentError, CommitmentResult};
use crate::models::{User, UserRole, UserStatus, UserUpdate};
use crate::storage::Storage;

use super::password::{check_password_strength, generate_password, DEFAULT_PASSWORD_LENGTH};

/// Delivers login details to a newly created user
pub trait WelcomeNotifier {
    /// Returns whether the notice was delivered
    fn send_welcome(&self, user: &User, password: &str) -> bool;
}

/// Writes the welcome notice to the log instead of sending mail
pub struct LogNotifier;

impl WelcomeNotifier for LogNotifier {
    fn send_welcome(&self, user: &User, _password: &str) -> bool {
        info!(
            to = %user.email,
            username = %user.username,
            "welcome notice (simulated delivery)"
        );
        true
    }
}

/// Input for [`UserService::create`]
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    /// Generated when `None`
    pub password: Option<String>,
    pub budget_user_id: String,
    pub treasury: String,
    pub role: UserRole,
    pub status: UserStatus,
}

/// A freshly created user together with the password that was set
#[derive(Debug, Clone)]
pub struct CreatedUser {
    pub user: User,
    pub password: String,
    pub generated: bool,
    pub notified: bool,
}

pub struct UserService<'a> {
    storage: &'a Storage,
    notifier: Box<dyn WelcomeNotifier + 'a>,
}

fn check_email(email: &str) -> CommitmentResult<()> {
    if email.contains('@') {
        Ok(())
    } else {
        Err(CommitmentError::InvalidInput(format!(
            "Invalid email address: {}",
            email
        )))
    }
}

impl<'a> UserService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self::with_notifier(storage, Box::new(LogNotifier))
    }

    pub fn with_notifier(storage: &'a Storage, notifier: Box<dyn WelcomeNotifier + 'a>) -> Self {
        Self { storage, notifier }
    }

    fn ensure_unique_username(&self, username: &str, except: Option<&User>) -> CommitmentResult<()> {
        match self.storage.users.get_by_username(username)? {
            Some(existing) if except.map(|u| u.id) != Some(existing.id) => {
                Err(CommitmentError::Duplicate {
                    entity_type: "User",
                    identifier: username.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    pub fn create(&self, new_user: NewUser) -> CommitmentResult<CreatedUser> {
        let username = new_user.username.trim();
        if username.is_empty() {
            return Err(CommitmentError::InvalidInput(
                "Username cannot be empty".into(),
            ));
        }
        let email = new_user.email.trim();
        check_email(email)?;
        self.ensure_unique_username(username, None)?;

        let (password, generated) = match new_user.password {
            Some(password) if !password.is_empty() => (password, false),
            _ => (generate_password(DEFAULT_PASSWORD_LENGTH), true),
        };
        let strength = check_password_strength(&password);
        if !strength.is_strong() {
            warn!(username, problems = ?strength.problems, "weak password accepted");
        }

        let mut user = User::new(username, email, password.clone());
        user.budget_user_id = new_user.budget_user_id;
        user.treasury = new_user.treasury;
        user.role = new_user.role;
        user.status = new_user.status;

        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;
        info!(username = %user.username, id = %user.id, "user created");

        let notified = self.notifier.send_welcome(&user, &password);
        Ok(CreatedUser {
            user,
            password,
            generated,
            notified,
        })
    }

    pub fn list(&self) -> CommitmentResult<Vec<User>> {
        self.storage.users.get_all()
    }

    /// Find by username or id
    pub fn find(&self, identifier: &str) -> CommitmentResult<User> {
        self.storage
            .users
            .find(identifier)?
            .ok_or_else(|| CommitmentError::user_not_found(identifier))
    }

    pub fn update(&self, identifier: &str, update: &UserUpdate) -> CommitmentResult<User> {
        let mut user = self.find(identifier)?;

        if let Some(username) = &update.username {
            if username.trim().is_empty() {
                return Err(CommitmentError::InvalidInput(
                    "Username cannot be empty".into(),
                ));
            }
            self.ensure_unique_username(username, Some(&user))?;
        }
        if let Some(email) = &update.email {
            check_email(email)?;
        }

        update.apply(&mut user);
        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;
        info!(username = %user.username, "user updated");
        Ok(user)
    }

    pub fn set_status(&self, identifier: &str, status: UserStatus) -> CommitmentResult<User> {
        self.update(
            identifier,
            &UserUpdate {
                status: Some(status),
                ..Default::default()
            },
        )
    }

    pub fn delete(&self, identifier: &str) -> CommitmentResult<User> {
        let user = self.find(identifier)?;
        self.storage.users.delete(user.id)?;
        self.storage.users.save()?;
        info!(username = %user.username, "user deleted");
        Ok(user)
    }
}
