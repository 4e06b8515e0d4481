//! Time range resolution from query parameters

use crate::error::ApiError;
use chrono::{DateTime, Duration, Utc};
use storage::TimeRange;

/// Resolve an optional `(start, end)` parameter pair into a validated range.
///
/// Bounds are RFC 3339 timestamps. A missing `end` defaults to `now`; a
/// missing `start` defaults to `end` minus `default_window` (last 24 hours
/// with the stock configuration). Pure function of its inputs.
pub fn resolve(
    start: Option<&str>,
    end: Option<&str>,
    now: DateTime<Utc>,
    default_window: Duration,
) -> Result<TimeRange, ApiError> {
    let end = match end {
        Some(raw) => parse_timestamp(raw)?,
        None => now,
    };
    let start = match start {
        Some(raw) => parse_timestamp(raw)?,
        None => end - default_window,
    };

    TimeRange::new(start, end).ok_or_else(|| {
        ApiError::InvalidArgument(format!(
            "Invalid time range: start {} is after end {}",
            start, end
        ))
    })
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| ApiError::InvalidArgument(format!("Invalid timestamp {:?}: {}", raw, e)))
}
