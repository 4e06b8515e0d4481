//! Data Routes
//!
//! `/genesis/data/*`: raw series, composed reports, interactive figures,
//! report downloads and point insertion.

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::SensorDataPoint;

use crate::error::ApiError;
use crate::report::{Report, SensorSummary};
use crate::strict_json::StrictJson;
use crate::{timerange, AppState};
use render::FigureDescription;

/// Query parameters shared by the data endpoints
#[derive(Debug, Deserialize)]
pub struct TimedSensorQuery {
    pub sensor_id: i64,
    /// RFC 3339 lower bound; defaults to `end` minus the configured window
    pub start: Option<String>,
    /// RFC 3339 upper bound; defaults to now
    pub end: Option<String>,
}

impl TimedSensorQuery {
    fn resolve_range(&self, state: &AppState) -> Result<storage::TimeRange, ApiError> {
        timerange::resolve(
            self.start.as_deref(),
            self.end.as_deref(),
            Utc::now(),
            state.default_window,
        )
    }
}

/// Get raw metadata + series for a sensor
pub async fn sensor_data(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TimedSensorQuery>,
) -> Result<Json<SensorSummary>, ApiError> {
    let range = params.resolve_range(&state)?;
    Ok(Json(state.reports.summary(params.sensor_id, range)?))
}

/// Get the composed report (preview image + interactive figure + link)
pub async fn data_report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TimedSensorQuery>,
) -> Result<StrictJson<Report>, ApiError> {
    let range = params.resolve_range(&state)?;
    Ok(StrictJson(state.reports.report(params.sensor_id, range)?))
}

/// Get only the interactive chart description
pub async fn interactive_report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TimedSensorQuery>,
) -> Result<StrictJson<FigureDescription>, ApiError> {
    let range = params.resolve_range(&state)?;
    Ok(StrictJson(
        state.reports.interactive(params.sensor_id, range)?,
    ))
}

/// Download the report in the requested format.
///
/// The converted file's ownership moves into the response body stream; the
/// transport layer releases it once the body is written (or abandoned).
pub async fn download_report(
    State(state): State<Arc<AppState>>,
    Path(format): Path<String>,
    Query(params): Query<TimedSensorQuery>,
) -> Result<Response, ApiError> {
    let range = params.resolve_range(&state)?;
    let file = state.reports.download(params.sensor_id, range, &format)?;

    // JSON-quoting escapes any special characters in the sensor name
    let disposition = format!(
        "attachment; filename={}",
        serde_json::to_string(file.filename()).map_err(|e| ApiError::Internal(e.to_string()))?
    );
    let content_type = file.content_type();
    let stream = file
        .into_stream()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from_stream(stream))
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// Body for point insertion
#[derive(Debug, Deserialize)]
pub struct InsertPointBody {
    pub sensor_id: i64,
    pub timestamp: DateTime<Utc>,
    /// `null` records a missing reading
    pub value: Option<f64>,
}

/// Insert acknowledgement
#[derive(Debug, Serialize)]
pub struct InsertResponse {
    pub status: &'static str,
}

/// Insert a new point for a sensor
pub async fn insert_sensor_data(
    State(state): State<Arc<AppState>>,
    Json(body): Json<InsertPointBody>,
) -> Result<Json<InsertResponse>, ApiError> {
    if let Some(value) = body.value {
        // Non-finite readings would poison strict serialization downstream
        if !value.is_finite() {
            return Err(ApiError::InvalidArgument(
                "value must be finite or null".to_string(),
            ));
        }
    }

    state.sensors.insert_point(
        body.sensor_id,
        SensorDataPoint {
            timestamp: body.timestamp,
            value: body.value,
        },
    )?;

    Ok(Json(InsertResponse { status: "ok" }))
}
