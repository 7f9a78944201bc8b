//! Date normalization.
//!
//! Every date-like input resolves to a [`DateTime<FixedOffset>`]. Absent or
//! unparseable input falls back to the current time of the supplied [`Clock`],
//! so normalization never fails.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::entity::DateLike;

/// Naive datetime layouts accepted in addition to RFC 3339. Interpreted as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current point in time.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// [`Clock`] backed by the system wall clock (UTC).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().fixed_offset()
    }
}

/// [`Clock`] that always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Normalize a date-like value.
///
/// Returns `clock.now()` when `value` is `None` or cannot be parsed.
pub fn normalize(value: Option<&DateLike>, clock: &dyn Clock) -> DateTime<FixedOffset> {
    let Some(value) = value else {
        return clock.now();
    };

    match parse(value) {
        Some(parsed) => parsed,
        None => {
            tracing::debug!(?value, "Unparseable date, using current time");
            clock.now()
        }
    }
}

/// Normalize the first present candidate.
///
/// Only presence decides which candidate is used: a present but malformed
/// value falls back to the current time rather than to the next candidate.
pub fn first_present(
    candidates: &[Option<&DateLike>],
    clock: &dyn Clock,
) -> DateTime<FixedOffset> {
    normalize(candidates.iter().flatten().copied().next(), clock)
}

/// Format a timestamp as ISO-8601 with an explicit offset, e.g.
/// `2024-01-01T00:00:00+00:00`.
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, false)
}

fn parse(value: &DateLike) -> Option<DateTime<FixedOffset>> {
    match value {
        DateLike::Millis(ms) => DateTime::from_timestamp_millis(*ms).map(|dt| dt.fixed_offset()),
        DateLike::Float(ms) => parse_float_millis(*ms),
        DateLike::Text(text) => parse_text(text.trim()),
        DateLike::Unrecognized(_) => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn parse_float_millis(ms: f64) -> Option<DateTime<FixedOffset>> {
    if !ms.is_finite() {
        return None;
    }
    // Saturates outside the i64 range, which chrono then rejects.
    DateTime::from_timestamp_millis(ms.round() as i64).map(|dt| dt.fixed_offset())
}

fn parse_text(text: &str) -> Option<DateTime<FixedOffset>> {
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}
