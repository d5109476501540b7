//! Activity repository for JSON storage
//!
//! Monthly activity entries live in activity.json.

use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::{CommitmentError, CommitmentResult};
use crate::models::{MonthlyActivity, UserId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ActivityData {
    entries: Vec<MonthlyActivity>,
}

pub struct ActivityRepository {
    path: PathBuf,
    data: RwLock<Vec<MonthlyActivity>>,
}

impl ActivityRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    pub fn load(&self) -> CommitmentResult<()> {
        let file_data: ActivityData = read_json(&self.path)?;
        let mut data = self.data.write().map_err(|e| {
            CommitmentError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *data = file_data.entries;
        Ok(())
    }

    pub fn save(&self) -> CommitmentResult<()> {
        let file_data = ActivityData {
            entries: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get_all(&self) -> CommitmentResult<Vec<MonthlyActivity>> {
        let data = self.data.read().map_err(|e| {
            CommitmentError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.clone())
    }

    /// Entries for one user, newest activity first
    pub fn get_by_user(&self, user_id: UserId) -> CommitmentResult<Vec<MonthlyActivity>> {
        let mut entries: Vec<_> = self
            .get_all()?
            .into_iter()
            .filter(|e| e.user_id == user_id)
            .collect();
        entries.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        Ok(entries)
    }

    /// Apply `update` to the entry for (user, month, year), creating it with
    /// `create` when missing
    pub fn upsert_with(
        &self,
        user_id: UserId,
        month: &str,
        year: i32,
        create: impl FnOnce() -> MonthlyActivity,
        update: impl FnOnce(&mut MonthlyActivity),
    ) -> CommitmentResult<MonthlyActivity> {
        let mut data = self.data.write().map_err(|e| {
            CommitmentError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let index = match data.iter().position(|e| e.is_for(user_id, month, year)) {
            Some(index) => index,
            None => {
                data.push(create());
                data.len() - 1
            }
        };
        update(&mut data[index]);
        Ok(data[index].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn test_upsert_creates_then_updates() {
        let temp_dir = TempDir::new().unwrap();
        let repo = ActivityRepository::new(temp_dir.path().join("activity.json"));
        let user_id = UserId::new();

        for _ in 0..2 {
            repo.upsert_with(
                user_id,
                "May",
                2025,
                || MonthlyActivity::new(user_id, "ana", "May", 2025),
                |e| e.accumulate(1, 0, 10.0, Utc::now()),
            )
            .unwrap();
        }
        repo.save().unwrap();

        let reloaded = ActivityRepository::new(temp_dir.path().join("activity.json"));
        reloaded.load().unwrap();
        let entries = reloaded.get_by_user(user_id).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].records_created, 2);
        assert_eq!(entries[0].total_amount, 20.0);
    }
}
