//! User repository for JSON storage
//!
//! Manages loading and saving user accounts to users.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::error::{CommitmentError, CommitmentResult};
use crate::models::{User, UserId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UserData {
    users: Vec<User>,
}

pub struct UserRepository {
    path: PathBuf,
    data: RwLock<HashMap<UserId, User>>,
}

impl UserRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> CommitmentResult<RwLockReadGuard<'_, HashMap<UserId, User>>> {
        self.data
            .read()
            .map_err(|e| CommitmentError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> CommitmentResult<RwLockWriteGuard<'_, HashMap<UserId, User>>> {
        self.data
            .write()
            .map_err(|e| CommitmentError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    pub fn exists_on_disk(&self) -> bool {
        self.path.exists()
    }

    /// Replace the in-memory users with the contents of users.json
    pub fn load(&self) -> CommitmentResult<()> {
        let file_data: UserData = read_json(&self.path)?;
        let mut data = self.write()?;
        data.clear();
        data.extend(file_data.users.into_iter().map(|u| (u.id, u)));
        Ok(())
    }

    /// Write users to disk, oldest first
    pub fn save(&self) -> CommitmentResult<()> {
        let file_data = UserData {
            users: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: UserId) -> CommitmentResult<Option<User>> {
        Ok(self.read()?.get(&id).cloned())
    }

    /// All users ordered by creation time
    pub fn get_all(&self) -> CommitmentResult<Vec<User>> {
        let mut users: Vec<_> = self.read()?.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.username.cmp(&b.username)));
        Ok(users)
    }

    /// Exact username match
    pub fn get_by_username(&self, username: &str) -> CommitmentResult<Option<User>> {
        Ok(self
            .read()?
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    /// Look up by username, then by id (full, short or prefix)
    pub fn find(&self, identifier: &str) -> CommitmentResult<Option<User>> {
        if let Some(user) = self.get_by_username(identifier)? {
            return Ok(Some(user));
        }
        Ok(self
            .read()?
            .values()
            .find(|u| u.id.matches(identifier))
            .cloned())
    }

    pub fn upsert(&self, user: User) -> CommitmentResult<()> {
        self.write()?.insert(user.id, user);
        Ok(())
    }

    pub fn delete(&self, id: UserId) -> CommitmentResult<bool> {
        Ok(self.write()?.remove(&id).is_some())
    }

    pub fn count(&self) -> CommitmentResult<usize> {
        Ok(self.read()?.len())
    }
}
