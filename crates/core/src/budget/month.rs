//! Month canonicalization.
//!
//! Budgets are keyed by calendar month, stored as a first-of-month date.
//! `normalize_month` accepts the formats callers actually send (`YYYY-MM`,
//! `YYYY-MM-DD`, full ISO timestamps) and canonicalizes them to
//! `YYYY-MM-01`. Input it cannot make sense of passes through unchanged;
//! the strict `parse_month` on the write path is the backstop.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use super::error::PayloadError;

/// Returns true when `s` is exactly `YYYY-MM` with digit year and month.
fn is_year_month(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 7
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
}

/// Returns true when `s` starts with a `YYYY-MM-DD` date prefix.
fn has_date_prefix(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 10
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[7] == b'-'
        && b[8..10].iter().all(u8::is_ascii_digit)
}

/// Canonicalizes a month value to `YYYY-MM-01`.
///
/// Rule precedence:
/// 1. `YYYY-MM` gets `-01` appended.
/// 2. Anything starting with `YYYY-MM-DD` is truncated to the year-month
///    and gets `-01` appended (so `YYYY-MM-01` comes back as-is).
/// 3. Otherwise generic date parsing is attempted and the result is
///    reformatted.
/// 4. Unparseable input is returned unchanged.
///
/// Digit-shape matching is deliberately permissive: `2025-13` becomes
/// `2025-13-01`, which is not a date. `parse_month` rejects it where it
/// matters.
#[must_use]
pub fn normalize_month(input: &str) -> String {
    let s = input.trim();

    if is_year_month(s) {
        return format!("{s}-01");
    }

    if has_date_prefix(s) {
        return format!("{}-01", &s[..7]);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return format!("{:04}-{:02}-01", dt.year(), dt.month());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return format!("{:04}-{:02}-01", dt.year(), dt.month());
    }

    input.to_string()
}

/// Normalizes and strictly parses a month value into a first-of-month date.
///
/// Inputs the digit-shape normalizer misses (non-zero-padded dates like
/// `2025-3-17`) can still parse to a mid-month date, so the parsed result
/// is snapped to day 1.
///
/// # Errors
///
/// Returns `PayloadError::InvalidMonth` when the normalized value is not a
/// real calendar date.
pub fn parse_month(input: &str) -> Result<NaiveDate, PayloadError> {
    let normalized = normalize_month(input);

    let date = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .map_err(|_| PayloadError::InvalidMonth(input.to_string()))?;

    Ok(date.with_day(1).unwrap_or(date))
}

/// First day of the month containing `today`. Anchor for the
/// current/past/upcoming status filter.
#[must_use]
pub fn current_month_start(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}
