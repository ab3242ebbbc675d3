//! Date parsing and deadline predicates.
//!
//! Event dates arrive as loosely formatted strings from the backend. They are
//! parsed leniently and anything unparseable is treated as "no date": the
//! predicates here are total and never fail.
//!
//! Accepted inputs:
//! - RFC 3339 timestamps (`2024-03-01T10:00:00-03:00`)
//! - naive date-times (`2024-03-01T10:00` or `2024-03-01T10:00:00`), read as UTC
//! - calendar dates (`2024-03-01`), read as UTC midnight

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a date string, returning `None` when absent or malformed.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

/// Parse an optional date field.
pub fn parse_optional(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(parse_date)
}

/// True iff `end_date` parses and lies strictly before `now`.
pub fn is_overdue(end_date: Option<&str>, now: DateTime<Utc>) -> bool {
    parse_optional(end_date).is_some_and(|end| end < now)
}

/// Percentage of the `[start, end]` interval that has elapsed at `now`.
///
/// Returns `0.0` when either date is missing or malformed, or when
/// `end <= start`. The result is not clamped: overdue intervals exceed 100
/// and intervals that have not started yet are negative.
pub fn elapsed_percentage(
    start_date: Option<&str>,
    end_date: Option<&str>,
    now: DateTime<Utc>,
) -> f64 {
    let (Some(start), Some(end)) = (parse_optional(start_date), parse_optional(end_date)) else {
        return 0.0;
    };
    if end <= start {
        return 0.0;
    }

    let total = (end - start).num_milliseconds() as f64;
    let elapsed = (now - start).num_milliseconds() as f64;
    elapsed / total * 100.0
}
