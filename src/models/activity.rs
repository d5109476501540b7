//! Monthly activity model
//!
//! One entry per user per calendar month, accumulating record counts and the
//! total amount entered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ActivityId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyActivity {
    pub id: ActivityId,
    pub user_id: UserId,
    pub username: String,
    /// English month name, e.g. "March"
    pub month: String,
    pub year: i32,
    pub records_created: u64,
    pub records_modified: u64,
    pub last_activity: DateTime<Utc>,
    pub total_amount: f64,
}

impl MonthlyActivity {
    pub fn new(user_id: UserId, username: impl Into<String>, month: impl Into<String>, year: i32) -> Self {
        Self {
            id: ActivityId::new(),
            user_id,
            username: username.into(),
            month: month.into(),
            year,
            records_created: 0,
            records_modified: 0,
            last_activity: Utc::now(),
            total_amount: 0.0,
        }
    }

    pub fn is_for(&self, user_id: UserId, month: &str, year: i32) -> bool {
        self.user_id == user_id && self.month == month && self.year == year
    }

    /// Add counts and amount to this entry and bump `last_activity`
    pub fn accumulate(&mut self, created: u64, modified: u64, amount: f64, at: DateTime<Utc>) {
        self.records_created += created;
        self.records_modified += modified;
        self.total_amount += amount;
        self.last_activity = at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate() {
        let user_id = UserId::new();
        let mut entry = MonthlyActivity::new(user_id, "ana", "March", 2025);
        let now = Utc::now();
        entry.accumulate(2, 0, 150.5, now);
        entry.accumulate(0, 3, 0.0, now);

        assert_eq!(entry.records_created, 2);
        assert_eq!(entry.records_modified, 3);
        assert_eq!(entry.total_amount, 150.5);
        assert!(entry.is_for(user_id, "March", 2025));
        assert!(!entry.is_for(user_id, "April", 2025));
    }
}
