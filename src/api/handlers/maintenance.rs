use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::CreateMaintenanceRequest;
use crate::domain::models::maintenance::MaintenanceWindow;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_maintenance(
    State(state): State<Arc<AppState>>,
    Path(court_id): Path<String>,
    Json(payload): Json<CreateMaintenanceRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.court_repo.find_by_id(&court_id).await?
        .ok_or(AppError::NotFound("Court not found".into()))?;

    if payload.duration_min <= 0 {
        return Err(AppError::Validation("duration_min must be positive".into()));
    }

    let window = MaintenanceWindow::new(court_id, payload.starts_at, payload.duration_min, payload.reason);
    let created = state.maintenance_repo.create(&window).await?;
    info!("Maintenance window scheduled: {} on court {}", created.id, created.court_id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_maintenance(
    State(state): State<Arc<AppState>>,
    Path(court_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let windows = state.maintenance_repo.list_by_court(&court_id).await?;
    Ok(Json(windows))
}

pub async fn cancel_maintenance(
    State(state): State<Arc<AppState>>,
    Path(window_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let cancelled = state.maintenance_repo.cancel(&window_id).await?;
    info!("Maintenance window cancelled: {}", cancelled.id);
    Ok(Json(cancelled))
}
