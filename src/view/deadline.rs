//! Deadline urgency classification.

use chrono::{DateTime, TimeZone, Utc};
use std::fmt;

/// How close a deadline is, at day granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeadlineUrgency {
    Overdue,
    Today,
    /// Due within the next three days.
    Soon,
    Normal,
}

impl DeadlineUrgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::Today => "today",
            Self::Soon => "soon",
            Self::Normal => "normal",
        }
    }
}

impl fmt::Display for DeadlineUrgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const SOON_WITHIN_DAYS: i64 = 3;

/// Classify `deadline` relative to `now`.
///
/// Both instants are reduced to their calendar date in `now`'s timezone before
/// differencing, so a deadline later on the current day is `Today`, never
/// `Overdue`.
pub fn classify<Tz: TimeZone>(deadline: &DateTime<Utc>, now: &DateTime<Tz>) -> DeadlineUrgency {
    let today = now.date_naive();
    let due = deadline.with_timezone(&now.timezone()).date_naive();
    let diff_days = (due - today).num_days();

    if diff_days < 0 {
        DeadlineUrgency::Overdue
    } else if diff_days == 0 {
        DeadlineUrgency::Today
    } else if diff_days <= SOON_WITHIN_DAYS {
        DeadlineUrgency::Soon
    } else {
        DeadlineUrgency::Normal
    }
}
