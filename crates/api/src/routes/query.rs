//! Query Routes
//!
//! `/genesis/query/*`: sensor and unit metadata lookups.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use storage::{SensorFilter, SensorMetadata, UnitMetadata};

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SensorIdQuery {
    pub sensor_id: i64,
}

/// Metadata for one sensor, or a 400 naming the missing id
pub async fn sensor_metadata(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SensorIdQuery>,
) -> Result<Json<SensorMetadata>, ApiError> {
    Ok(Json(state.sensors.get_sensor_metadata(params.sensor_id)?))
}

/// All registered sensors
pub async fn sensor_list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SensorMetadata>>, ApiError> {
    Ok(Json(state.sensors.list_sensors()?))
}

/// Optional, combinable exact-match filters
#[derive(Debug, Deserialize)]
pub struct SensorFindQuery {
    pub sensor_type: Option<String>,
    pub sensor_name: Option<String>,
    pub location: Option<String>,
}

/// Sensors matching every present filter; no match is an empty list
pub async fn find_sensors(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SensorFindQuery>,
) -> Result<Json<Vec<SensorMetadata>>, ApiError> {
    let filter = SensorFilter {
        sensor_type: params.sensor_type,
        sensor_name: params.sensor_name,
        location: params.location,
    };
    Ok(Json(state.sensors.find_sensors(&filter)?))
}

#[derive(Debug, Deserialize)]
pub struct UnitIdQuery {
    pub unit_id: i64,
}

/// Metadata for one unit, or a 400 naming the missing id
pub async fn unit_metadata(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UnitIdQuery>,
) -> Result<Json<UnitMetadata>, ApiError> {
    Ok(Json(state.units.get_unit_metadata(params.unit_id)?))
}

/// All registered units
pub async fn unit_list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UnitMetadata>>, ApiError> {
    Ok(Json(state.units.list_units()?))
}
