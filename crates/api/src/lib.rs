//! Genesis Telemetry API Server
//!
//! HTTP surface exposing sensor telemetry and derived report artifacts
//! under `/genesis`.

use axum::routing::{get, post};
use axum::Router;
use chrono::Duration;
use std::sync::Arc;
use storage::{SensorStore, UnitStore};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod config;
mod error;
mod report;
mod routes;
mod seed;
mod strict_json;
mod timerange;

pub use config::ServerConfig;
pub use error::ApiError;
pub use report::{Report, ReportService, SensorSummary};
pub use seed::seed_demo_data;
pub use strict_json::StrictJson;

/// Application state shared across handlers
pub struct AppState {
    /// Sensor metadata and time-series store
    pub sensors: Arc<SensorStore>,
    /// Unit metadata store
    pub units: Arc<UnitStore>,
    /// Report orchestration
    pub reports: ReportService,
    /// Window applied when a request omits time bounds
    pub default_window: Duration,
}

impl AppState {
    /// Create new application state over the given stores
    pub fn new(sensors: Arc<SensorStore>, units: Arc<UnitStore>, default_window_hours: i64) -> Self {
        let reports = ReportService::new(Arc::clone(&sensors), Arc::clone(&units));
        Self {
            sensors,
            units,
            reports,
            default_window: Duration::hours(default_window_hours),
        }
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/genesis/data/sensor", get(routes::data::sensor_data))
        .route("/genesis/data/report", get(routes::data::data_report))
        .route(
            "/genesis/data/report/interactive",
            get(routes::data::interactive_report),
        )
        .route(
            "/genesis/data/report/download/:format",
            get(routes::data::download_report),
        )
        .route(
            "/genesis/data/sensor/insert",
            post(routes::data::insert_sensor_data),
        )
        .route("/genesis/query/sensor", get(routes::query::sensor_metadata))
        .route("/genesis/query/sensor/list", get(routes::query::sensor_list))
        .route("/genesis/query/sensor/find", get(routes::query::find_sensors))
        .route("/genesis/query/unit", get(routes::query::unit_metadata))
        .route("/genesis/query/unit/list", get(routes::query::unit_list))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Run the server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let sensors = Arc::new(SensorStore::new());
    let units = Arc::new(UnitStore::new());
    seed_demo_data(&sensors, &units)?;

    let state = Arc::new(AppState::new(sensors, units, config.default_window_hours));
    let app = create_router(state);

    let addr = config.bind_addr();
    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
