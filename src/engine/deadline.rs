//! Deadline resolution.
//!
//! A task's deadline is derived from its due date plus an optional "HH:mm"
//! time of day; without a time the deadline is the end of that calendar day
//! (23:59:59.999). Resolution works on the date's own local calendar day,
//! with no timezone conversion.

use crate::types::Task;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Parse a "HH:mm" string into (hour, minute).
///
/// Returns `None` for anything malformed or out of range; callers fall back
/// to end-of-day rather than producing a bogus deadline hour.
pub fn parse_due_time(s: &str) -> Option<(u32, u32)> {
    let (h, m) = s.split_once(':')?;
    let hour: u32 = h.trim().parse().ok()?;
    let minute: u32 = m.trim().parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Compute the deadline instant for a due date and optional due time.
///
/// `None` when there is no due date. With a valid due time the deadline is
/// that hour and minute, seconds zeroed; otherwise 23:59:59.999 of the same
/// day.
pub fn resolve_deadline(
    due_date: Option<NaiveDate>,
    due_time: Option<&str>,
) -> Option<NaiveDateTime> {
    let date = due_date?;
    let time = match due_time.and_then(parse_due_time) {
        Some((hour, minute)) => NaiveTime::from_hms_opt(hour, minute, 0)?,
        None => NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?,
    };
    Some(date.and_time(time))
}

/// Deadline as epoch milliseconds in the local timezone, for comparison
/// against stored timestamps.
pub fn resolve_deadline_ms(due_date: Option<NaiveDate>, due_time: Option<&str>) -> Option<i64> {
    let naive = resolve_deadline(due_date, due_time)?;
    // A DST gap can make a local time nonexistent; interpret it as UTC then.
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .or_else(|| Some(naive.and_utc().timestamp_millis()))
}

impl Task {
    /// Derived deadline instant, if the task has a due date.
    pub fn deadline(&self) -> Option<NaiveDateTime> {
        resolve_deadline(self.due_date, self.due_time.as_deref())
    }

    /// Derived deadline as epoch milliseconds.
    pub fn deadline_ms(&self) -> Option<i64> {
        resolve_deadline_ms(self.due_date, self.due_time.as_deref())
    }
}
