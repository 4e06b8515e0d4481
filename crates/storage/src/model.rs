//! Data model for sensor telemetry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata describing a registered sensor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SensorMetadata {
    pub sensor_id: i64,
    pub sensor_name: String,
    pub sensor_type: String,
    pub location: String,
    pub unit_id: i64,
}

/// A single timestamped reading.
///
/// `value` is `None` when the sensor reported no usable reading at that
/// instant; it serializes as JSON `null`, never as a non-finite float.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SensorDataPoint {
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
}

/// Metadata describing a measurement unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnitMetadata {
    pub unit_id: i64,
    pub name: String,
    pub symbol: String,
}

/// A closed time interval with `start <= end`.
///
/// Construction goes through [`TimeRange::new`], which rejects inverted
/// bounds; once built the range is immutable for the rest of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        if start > end {
            None
        } else {
            Some(Self { start, end })
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether `t` falls within the range (inclusive on both ends).
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t <= self.end
    }
}
