//! User accounts, admin credentials and the login session
//!
//! Credentials are stored and compared as plaintext.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::User => write!(f, "user"),
        }
    }
}

/// Only active users may log in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Pending,
    Suspended,
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Pending => write!(f, "pending"),
            UserStatus::Suspended => write!(f, "suspended"),
        }
    }
}

/// A user account managed by the admin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub budget_user_id: String,
    #[serde(default)]
    pub treasury: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_display_name: Option<String>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            email: email.into(),
            password: password.into(),
            budget_user_id: String::new(),
            treasury: String::new(),
            role: UserRole::User,
            status: UserStatus::Active,
            created_at: Utc::now(),
            last_login: None,
            pdf_display_name: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.username)
    }
}

/// Optional replacements for user fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub budget_user_id: Option<String>,
    pub treasury: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub pdf_display_name: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply(&self, user: &mut User) {
        if let Some(v) = &self.username {
            user.username = v.clone();
        }
        if let Some(v) = &self.email {
            user.email = v.clone();
        }
        if let Some(v) = &self.password {
            user.password = v.clone();
        }
        if let Some(v) = &self.budget_user_id {
            user.budget_user_id = v.clone();
        }
        if let Some(v) = &self.treasury {
            user.treasury = v.clone();
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(status) = self.status {
            user.status = status;
        }
        if let Some(v) = &self.pdf_display_name {
            user.pdf_display_name = if v.is_empty() { None } else { Some(v.clone()) };
        }
    }
}

/// Username/password pair used for logins and the admin account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// The principal of the current CLI session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Session {
    Admin { username: String },
    User { user: User },
}

impl Session {
    pub fn is_admin(&self) -> bool {
        matches!(self, Session::Admin { .. })
    }

    pub fn username(&self) -> &str {
        match self {
            Session::Admin { username } => username,
            Session::User { user } => &user.username,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_active() {
        let user = User::new("ana", "ana@example.com", "Secret123");
        assert!(user.is_active());
        assert_eq!(user.role, UserRole::User);
        assert!(user.last_login.is_none());
    }

    #[test]
    fn test_update_applies_present_fields() {
        let mut user = User::new("ana", "ana@example.com", "Secret123");
        let update = UserUpdate {
            status: Some(UserStatus::Suspended),
            treasury: Some("T-01".into()),
            ..Default::default()
        };
        update.apply(&mut user);

        assert_eq!(user.status, UserStatus::Suspended);
        assert_eq!(user.treasury, "T-01");
        assert_eq!(user.email, "ana@example.com");
    }

    #[test]
    fn test_session_serialization_is_tagged() {
        let session = Session::Admin {
            username: "admin".into(),
        };
        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"kind\":\"admin\""));
        let back: Session = serde_json::from_str(&json).unwrap();
        assert!(back.is_admin());
        assert_eq!(back.username(), "admin");
    }

    #[test]
    fn test_status_display() {
        assert_eq!(UserStatus::Pending.to_string(), "pending");
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }
}
