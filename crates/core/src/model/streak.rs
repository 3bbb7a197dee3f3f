use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Count of consecutive active days, with a 2-day grace window.
///
/// Governs presentation only, never scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StreakInfo {
    pub current: u32,
    pub last_activity: Option<DateTime<Utc>>,
}

impl StreakInfo {
    /// Apply one activity event to the streak.
    ///
    /// First-ever activity sets the streak to 1. A gap of 1 or 2 whole days
    /// since the last activity increments it (the 2-day gap is the grace
    /// window); longer gaps reset it to 1. Within the same day nothing
    /// changes, and `last_activity` keeps its original value.
    pub fn record_activity(&mut self, now: DateTime<Utc>) {
        let Some(last) = self.last_activity else {
            self.current = 1;
            self.last_activity = Some(now);
            return;
        };

        let gap_days = (now - last).num_days();
        if gap_days <= 0 {
            // Same-day activity leaves the record untouched.
        } else if gap_days <= 2 {
            self.current += 1;
            self.last_activity = Some(now);
        } else {
            self.current = 1;
            self.last_activity = Some(now);
        }
    }
}
