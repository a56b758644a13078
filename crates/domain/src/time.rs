//! Time helpers: the UTC timestamp type shared by schedules and execution logs.

use chrono::{DateTime, Timelike, Utc};

/// UTC timestamp used for execution start/end times and schedules.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Drop seconds and sub-second precision; cron schedules fire on whole minutes.
#[must_use]
pub fn truncate_to_minute(ts: Timestamp) -> Option<Timestamp> {
    ts.with_second(0)?.with_nanosecond(0)
}
