//! Monthly activity log and admin dashboard

use chrono::{DateTime, Datelike, Local, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::CommitmentResult;
use crate::models::{MonthlyActivity, User, UserId};
use crate::storage::Storage;

/// Receives record counts from the workspace after each mutation
pub trait ActivitySink {
    fn log(&self, created: u64, modified: u64, amount: f64) -> CommitmentResult<()>;
}

/// Discards activity
pub struct NoActivity;

impl ActivitySink for NoActivity {
    fn log(&self, _created: u64, _modified: u64, _amount: f64) -> CommitmentResult<()> {
        Ok(())
    }
}

/// Totals shown on the admin dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub total_users: usize,
    pub active_users: usize,
    pub month: String,
    pub year: i32,
    pub records_created: u64,
    pub records_modified: u64,
    pub total_amount: f64,
}

fn month_name(at: &DateTime<Local>) -> String {
    at.format("%B").to_string()
}

pub struct ActivityService<'a> {
    storage: &'a Storage,
}

impl<'a> ActivityService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add counts to the user's entry for the current month
    pub fn log(
        &self,
        user: &User,
        created: u64,
        modified: u64,
        amount: f64,
    ) -> CommitmentResult<MonthlyActivity> {
        self.log_at(user, created, modified, amount, Local::now())
    }

    pub fn log_at(
        &self,
        user: &User,
        created: u64,
        modified: u64,
        amount: f64,
        at: DateTime<Local>,
    ) -> CommitmentResult<MonthlyActivity> {
        let month = month_name(&at);
        let year = at.year();
        let entry = self.storage.activity.upsert_with(
            user.id,
            &month,
            year,
            || MonthlyActivity::new(user.id, user.username.clone(), month.clone(), year),
            |entry| entry.accumulate(created, modified, amount, at.with_timezone(&Utc)),
        )?;
        self.storage.activity.save()?;
        debug!(user = %user.username, created, modified, amount, "activity logged");
        Ok(entry)
    }

    pub fn entries_for(&self, user_id: UserId) -> CommitmentResult<Vec<MonthlyActivity>> {
        self.storage.activity.get_by_user(user_id)
    }

    /// Every entry, newest year and month first
    pub fn all_entries(&self) -> CommitmentResult<Vec<MonthlyActivity>> {
        let mut entries = self.storage.activity.get_all()?;
        entries.sort_by(|a, b| {
            b.year
                .cmp(&a.year)
                .then(b.last_activity.cmp(&a.last_activity))
        });
        Ok(entries)
    }

    pub fn dashboard(&self) -> CommitmentResult<Dashboard> {
        self.dashboard_at(Local::now())
    }

    pub fn dashboard_at(&self, at: DateTime<Local>) -> CommitmentResult<Dashboard> {
        let users = self.storage.users.get_all()?;
        let month = month_name(&at);
        let year = at.year();

        let mut dashboard = Dashboard {
            total_users: users.len(),
            active_users: users.iter().filter(|u| u.is_active()).count(),
            month: month.clone(),
            year,
            records_created: 0,
            records_modified: 0,
            total_amount: 0.0,
        };
        for entry in self
            .storage
            .activity
            .get_all()?
            .iter()
            .filter(|e| e.month == month && e.year == year)
        {
            dashboard.records_created += entry.records_created;
            dashboard.records_modified += entry.records_modified;
            dashboard.total_amount += entry.total_amount;
        }
        Ok(dashboard)
    }
}

/// Activity sink bound to one user
pub struct UserActivityLog<'a> {
    service: ActivityService<'a>,
    user: User,
}

impl<'a> UserActivityLog<'a> {
    pub fn new(storage: &'a Storage, user: User) -> Self {
        Self {
            service: ActivityService::new(storage),
            user,
        }
    }
}

impl ActivitySink for UserActivityLog<'_> {
    fn log(&self, created: u64, modified: u64, amount: f64) -> CommitmentResult<()> {
        self.service.log(&self.user, created, modified, amount)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppPaths;
    use crate::models::UserStatus;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn at(month: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, month, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_log_accumulates_within_month() {
        let (_temp_dir, storage) = create_test_storage();
        let user = User::new("ana", "ana@example.com", "pw");
        let service = ActivityService::new(&storage);

        service.log_at(&user, 2, 0, 300.0, at(3)).unwrap();
        let entry = service.log_at(&user, 0, 1, 0.0, at(3)).unwrap();
        service.log_at(&user, 1, 0, 50.0, at(4)).unwrap();

        assert_eq!(entry.month, "March");
        assert_eq!(entry.records_created, 2);
        assert_eq!(entry.records_modified, 1);
        assert_eq!(service.entries_for(user.id).unwrap().len(), 2);
    }

    #[test]
    fn test_dashboard_counts_current_month() {
        let (_temp_dir, storage) = create_test_storage();
        let ana = User::new("ana", "ana@example.com", "pw");
        let mut marko = User::new("marko", "marko@example.com", "pw");
        marko.status = UserStatus::Suspended;
        storage.users.upsert(ana.clone()).unwrap();
        storage.users.upsert(marko.clone()).unwrap();

        let service = ActivityService::new(&storage);
        service.log_at(&ana, 3, 1, 100.0, at(5)).unwrap();
        service.log_at(&marko, 1, 0, 25.0, at(5)).unwrap();
        service.log_at(&ana, 9, 9, 999.0, at(4)).unwrap();

        let dashboard = service.dashboard_at(at(5)).unwrap();
        assert_eq!(dashboard.total_users, 2);
        assert_eq!(dashboard.active_users, 1);
        assert_eq!(dashboard.records_created, 4);
        assert_eq!(dashboard.records_modified, 1);
        assert_eq!(dashboard.total_amount, 125.0);
    }
}
