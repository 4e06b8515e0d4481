//! Storage Layer
//!
//! Sensor/unit metadata and time-series point storage behind a repository
//! pattern (in-memory implementation).

mod model;
mod repository;

pub use model::{SensorDataPoint, SensorMetadata, TimeRange, UnitMetadata};
pub use repository::{SensorFilter, SensorStore, UnitStore};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Sensor of id {0} does not exist")]
    SensorNotFound(i64),
    #[error("Unit of id {0} does not exist")]
    UnitNotFound(i64),
    #[error("Store error: {0}")]
    StoreError(String),
}
