//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{error, warn};

use crate::error::RouterError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", post(register_stations))
        .route("/stations/:index", get(get_station))
        .route("/table", post(compute_table))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Replace the station registry.
async fn register_stations(
    State(state): State<AppState>,
    Json(req): Json<RegisterStationsRequest>,
) -> Result<Json<RegisterStationsResponse>, AppError> {
    let summary = state.router.register_stations(&req.coordinates).await?;
    Ok(Json(summary.into()))
}

/// Look up one registered station.
async fn get_station(
    State(state): State<AppState>,
    Path(index): Path<i64>,
) -> Result<Json<StationResponse>, AppError> {
    let station = state.router.station(index).await?;
    Ok(Json(station.into()))
}

/// Compute durations from an origin to a selection of stations.
async fn compute_table(
    State(state): State<AppState>,
    Json(req): Json<TableQueryRequest>,
) -> Result<Json<TableQueryResponse>, AppError> {
    let durations = state
        .router
        .compute_table_indexed(req.lon, req.lat, &req.indices)
        .await?;
    Ok(Json(TableQueryResponse { durations }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl From<RouterError> for AppError {
    fn from(e: RouterError) -> Self {
        let message = e.to_string();
        match e {
            RouterError::InvalidCoordinate(_) => AppError::BadRequest { message },
            RouterError::OutOfRange { .. } => AppError::NotFound { message },
            RouterError::Engine(_) | RouterError::Decode(_) => AppError::BadGateway { message },
            RouterError::EngineInit(_) => AppError::Internal { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
