use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use chrono_tz::Tz;
use tracing::info;

use crate::api::dtos::requests::{CreateCenterRequest, UpdateScheduleRequest};
use crate::domain::models::center::Center;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_center(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateCenterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.slug.trim().is_empty() {
        return Err(AppError::Validation("Slug must not be empty".into()));
    }
    if payload.timezone.parse::<Tz>().is_err() {
        return Err(AppError::Validation("Invalid timezone".into()));
    }

    let center = Center::new(payload.name, payload.slug, payload.timezone, &payload.schedule);
    let created = state.center_repo.create(&center).await?;
    info!("Center created: {} ({})", created.name, created.slug);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_center(
    State(state): State<Arc<AppState>>,
    Path(center_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let center = state.center_repo.find_by_id(&center_id).await?
        .ok_or(AppError::NotFound("Center not found".into()))?;
    Ok(Json(center))
}

pub async fn list_centers(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let centers = state.center_repo.list().await?;
    Ok(Json(centers))
}

pub async fn update_schedule(
    State(state): State<Arc<AppState>>,
    Path(center_id): Path<String>,
    Json(payload): Json<UpdateScheduleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let schedule_json = serde_json::to_string(&payload.schedule)
        .map_err(|_| AppError::Validation("Invalid schedule".into()))?;
    let updated = state.center_repo.update_schedule(&center_id, &schedule_json).await?;
    info!("Schedule replaced for center {}", center_id);
    Ok(Json(updated))
}
