//! Admin credentials and the persisted login session

use std::path::PathBuf;

use crate::error::CommitmentResult;
use crate::models::{Credentials, Session};

use super::file_io::{read_json, read_json_required, remove_if_exists, write_json_atomic};

/// admin.json
pub struct AdminRepository {
    path: PathBuf,
}

impl AdminRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> CommitmentResult<Credentials> {
        read_json_required(&self.path)
    }

    pub fn save(&self, credentials: &Credentials) -> CommitmentResult<()> {
        write_json_atomic(&self.path, credentials)
    }
}

/// session.json; absent means logged out
pub struct SessionRepository {
    path: PathBuf,
}

impl SessionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> CommitmentResult<Option<Session>> {
        read_json(&self.path)
    }

    pub fn save(&self, session: &Session) -> CommitmentResult<()> {
        write_json_atomic(&self.path, session)
    }

    pub fn clear(&self) -> CommitmentResult<()> {
        remove_if_exists(&self.path)
    }
}
