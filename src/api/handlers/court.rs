use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateCourtRequest, UpdateCourtRequest};
use crate::domain::models::court::{Court, NewCourtParams};
use crate::error::AppError;
use crate::state::AppState;

fn validate_sports(primary: &str, allowed: &[String]) -> Result<(), AppError> {
    if primary.trim().is_empty() {
        return Err(AppError::Validation("primary_sport must not be empty".into()));
    }
    if allowed.iter().any(|s| s == primary) {
        return Err(AppError::Validation(
            "primary_sport must not appear in allowed_sports".into(),
        ));
    }
    Ok(())
}

pub async fn create_court(
    State(state): State<Arc<AppState>>,
    Path(center_id): Path<String>,
    Json(payload): Json<CreateCourtRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.center_repo.find_by_id(&center_id).await?
        .ok_or(AppError::NotFound("Center not found".into()))?;

    let allowed = payload.allowed_sports.unwrap_or_default();
    validate_sports(&payload.primary_sport, &allowed)?;
    if payload.hourly_rate < 0.0 {
        return Err(AppError::Validation("hourly_rate must not be negative".into()));
    }

    let court = Court::new(NewCourtParams {
        center_id,
        name: payload.name,
        primary_sport: payload.primary_sport,
        allowed_sports: allowed,
        hourly_rate: payload.hourly_rate,
    });

    let created = state.court_repo.create(&court).await?;
    info!("Court created: {} ({})", created.name, created.primary_sport);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_courts(
    State(state): State<Arc<AppState>>,
    Path(center_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let courts = state.court_repo.list_by_center(&center_id).await?;
    Ok(Json(courts))
}

pub async fn get_court(
    State(state): State<Arc<AppState>>,
    Path(court_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let court = state.court_repo.find_by_id(&court_id).await?
        .ok_or(AppError::NotFound("Court not found".into()))?;
    Ok(Json(court))
}

pub async fn update_court(
    State(state): State<Arc<AppState>>,
    Path(court_id): Path<String>,
    Json(payload): Json<UpdateCourtRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut court = state.court_repo.find_by_id(&court_id).await?
        .ok_or(AppError::NotFound("Court not found".into()))?;

    if let Some(name) = payload.name { court.name = name; }
    if let Some(primary) = payload.primary_sport { court.primary_sport = primary; }
    if let Some(allowed) = payload.allowed_sports {
        court.allowed_sports_json = serde_json::to_string(&allowed)
            .map_err(|_| AppError::Validation("Invalid allowed_sports".into()))?;
        court.is_multiuse = !allowed.is_empty();
    }
    if let Some(active) = payload.is_active { court.is_active = active; }
    if let Some(rate) = payload.hourly_rate {
        if rate < 0.0 {
            return Err(AppError::Validation("hourly_rate must not be negative".into()));
        }
        court.hourly_rate = rate;
    }

    validate_sports(&court.primary_sport, &court.sports().allowed)?;

    let updated = state.court_repo.update(&court).await?;
    info!("Court updated: {}", updated.id);
    Ok(Json(updated))
}
