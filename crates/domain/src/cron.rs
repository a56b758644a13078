//! Five-field cron expressions (`minute hour day month weekday`).
//!
//! Only the numeric dialect is accepted: each field is `*`, an integer, a
//! comma list, a range `a-b` or a step `x/y` (`*/y`, `a/y`, `a-b/y`). Named
//! tokens such as `JAN` or `MON` are rejected.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, Days, Duration, NaiveDate, Timelike};

use crate::time::{Timestamp, truncate_to_minute};

/// Upper bound on the number of days scanned by [`CronExpression::next_after`].
const MAX_SCAN_DAYS: u64 = 4 * 366;

/// One of the five positional cron fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CronField {
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
}

impl CronField {
    /// Fields in positional order.
    pub const ALL: [Self; 5] = [
        Self::Minute,
        Self::Hour,
        Self::DayOfMonth,
        Self::Month,
        Self::DayOfWeek,
    ];

    /// 1-based position of the field in the expression.
    #[must_use]
    pub fn position(self) -> usize {
        match self {
            Self::Minute => 1,
            Self::Hour => 2,
            Self::DayOfMonth => 3,
            Self::Month => 4,
            Self::DayOfWeek => 5,
        }
    }

    /// Inclusive bounds of the field. Weekday accepts both 0 and 7 for Sunday.
    #[must_use]
    pub fn bounds(self) -> (u32, u32) {
        match self {
            Self::Minute => (0, 59),
            Self::Hour => (0, 23),
            Self::DayOfMonth => (1, 31),
            Self::Month => (1, 12),
            Self::DayOfWeek => (0, 7),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::DayOfMonth => "day",
            Self::Month => "month",
            Self::DayOfWeek => "weekday",
        }
    }
}

impl fmt::Display for CronField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "part {} ({})", self.position(), self.name())
    }
}

/// Reason a cron expression was rejected.
///
/// The `Display` text is user-facing and names the offending field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CronError {
    #[error("Cron expression is required")]
    Empty,
    #[error(
        "Cron expression must have exactly 5 parts (minute hour day month weekday), found {found}"
    )]
    WrongArity { found: usize },
    #[error("Cron expression {field} contains invalid characters: {value}")]
    InvalidCharacters { field: CronField, value: String },
    #[error("Value {value} is out of range for cron expression {field}, allowed {min}-{max}")]
    OutOfRange {
        field: CronField,
        value: String,
        min: u32,
        max: u32,
    },
    #[error("Invalid range {value} in cron expression {field}")]
    InvalidRange { field: CronField, value: String },
    #[error("Invalid step value {value} in cron expression {field}")]
    InvalidStep { field: CronField, value: String },
    #[error("Invalid value '{value}' in cron expression {field}")]
    InvalidValue { field: CronField, value: String },
}

/// A parsed, range-checked cron schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronExpression {
    source: String,
    minutes: BTreeSet<u32>,
    hours: BTreeSet<u32>,
    days_of_month: BTreeSet<u32>,
    months: BTreeSet<u32>,
    days_of_week: BTreeSet<u32>,
    day_of_month_restricted: bool,
    day_of_week_restricted: bool,
}

impl CronExpression {
    /// Parse and validate a five-field expression.
    ///
    /// # Errors
    ///
    /// Returns the first [`CronError`] found, scanning fields left to right.
    pub fn parse(expr: &str) -> Result<Self, CronError> {
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Err(CronError::Empty);
        }
        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        if parts.len() != CronField::ALL.len() {
            return Err(CronError::WrongArity { found: parts.len() });
        }

        let mut sets = Vec::with_capacity(parts.len());
        for (field, text) in CronField::ALL.into_iter().zip(&parts) {
            sets.push(parse_field(field, text)?);
        }
        let mut sets = sets.into_iter();
        let mut next = || sets.next().unwrap_or_default();

        Ok(Self {
            source: parts.join(" "),
            minutes: next(),
            hours: next(),
            days_of_month: next(),
            months: next(),
            days_of_week: next(),
            day_of_month_restricted: !parts[2].starts_with('*'),
            day_of_week_restricted: !parts[4].starts_with('*'),
        })
    }

    /// Hours (0-23) at which the schedule may fire.
    #[must_use]
    pub fn hours(&self) -> &BTreeSet<u32> {
        &self.hours
    }

    /// Minutes (0-59) at which the schedule may fire.
    #[must_use]
    pub fn minutes(&self) -> &BTreeSet<u32> {
        &self.minutes
    }

    /// Whether the schedule fires during the minute containing `ts`.
    #[must_use]
    pub fn matches(&self, ts: Timestamp) -> bool {
        self.minutes.contains(&ts.minute())
            && self.hours.contains(&ts.hour())
            && self.matches_day(ts.date_naive())
    }

    /// Next firing time strictly after `from`, truncated to the minute.
    ///
    /// Returns `None` when nothing matches within roughly four years
    /// (e.g. `0 0 31 2 *`).
    #[must_use]
    pub fn next_after(&self, from: Timestamp) -> Option<Timestamp> {
        let start = truncate_to_minute(from)? + Duration::minutes(1);
        let first_day = start.date_naive();

        for offset in 0..MAX_SCAN_DAYS {
            let date = first_day.checked_add_days(Days::new(offset))?;
            if !self.matches_day(date) {
                continue;
            }
            for &hour in &self.hours {
                for &minute in &self.minutes {
                    let candidate = date.and_hms_opt(hour, minute, 0)?.and_utc();
                    if candidate >= start {
                        return Some(candidate);
                    }
                }
            }
        }
        None
    }

    fn matches_day(&self, date: NaiveDate) -> bool {
        if !self.months.contains(&date.month()) {
            return false;
        }
        let dom = self.days_of_month.contains(&date.day());
        let dow = self
            .days_of_week
            .contains(&date.weekday().num_days_from_sunday());
        if self.day_of_month_restricted && self.day_of_week_restricted {
            dom || dow
        } else {
            dom && dow
        }
    }
}

impl fmt::Display for CronExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for CronExpression {
    type Err = CronError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_field(field: CronField, text: &str) -> Result<BTreeSet<u32>, CronError> {
    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '*' | ',' | '-' | '/'))
    {
        return Err(CronError::InvalidCharacters {
            field,
            value: text.to_string(),
        });
    }

    let (min, max) = field.bounds();
    let mut values = BTreeSet::new();
    for item in text.split(',') {
        let (lo, hi, step) = if let Some((base, step)) = item.split_once('/') {
            let step = match step.parse::<u32>() {
                Ok(step) if step > 0 => step,
                _ => {
                    return Err(CronError::InvalidStep {
                        field,
                        value: item.to_string(),
                    });
                }
            };
            let (lo, hi) = if base == "*" {
                (min, max)
            } else if base.contains('-') {
                parse_range(field, base)?
            } else {
                (parse_value(field, base)?, max)
            };
            (lo, hi, step)
        } else if item == "*" {
            (min, max, 1)
        } else if item.contains('-') {
            let (lo, hi) = parse_range(field, item)?;
            (lo, hi, 1)
        } else {
            let value = parse_value(field, item)?;
            (value, value, 1)
        };

        values.extend((lo..=hi).step_by(step as usize));
    }

    // 7 and 0 both denote Sunday.
    if field == CronField::DayOfWeek && values.remove(&7) {
        values.insert(0);
    }
    Ok(values)
}

fn parse_value(field: CronField, text: &str) -> Result<u32, CronError> {
    let (min, max) = field.bounds();
    let out_of_range = || CronError::OutOfRange {
        field,
        value: text.to_string(),
        min,
        max,
    };
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(CronError::InvalidValue {
            field,
            value: text.to_string(),
        });
    }
    let value = text.parse::<u32>().map_err(|_| out_of_range())?;
    if value < min || value > max {
        return Err(out_of_range());
    }
    Ok(value)
}

fn parse_range(field: CronField, text: &str) -> Result<(u32, u32), CronError> {
    let invalid = || CronError::InvalidRange {
        field,
        value: text.to_string(),
    };
    let (start, end) = text.split_once('-').ok_or_else(invalid)?;
    let numeric = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !numeric(start) || !numeric(end) {
        return Err(invalid());
    }
    let start = parse_value(field, start)?;
    let end = parse_value(field, end)?;
    if start > end {
        return Err(invalid());
    }
    Ok((start, end))
}
