use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use chrono::{Timelike, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::api::dtos::requests::CreateReservationRequest;
use crate::api::extractors::auth::AuthUser;
use crate::api::handlers::payment::payment_processor;
use crate::domain::models::reservation::{NewReservationParams, Reservation};
use crate::domain::services::schedule::resolve_open_intervals;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_reservation(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let court = state.court_repo.find_by_id(&payload.court_id).await?
        .ok_or(AppError::NotFound("Court not found".into()))?;

    if !court.is_active {
        return Err(AppError::Validation("Court is not active".into()));
    }

    let sports = court.sports();
    if sports.role_of(&payload.sport).is_none() {
        return Err(AppError::Validation(format!(
            "{} is not offered on this court", payload.sport
        )));
    }

    if payload.end_time <= payload.start_time {
        return Err(AppError::Validation("End time must be after start time".into()));
    }
    let duration_min = (payload.end_time - payload.start_time).num_minutes();
    if duration_min > 1440 {
        return Err(AppError::Validation("Reservation cannot span more than one day".into()));
    }
    if payload.start_time < Utc::now() {
        return Err(AppError::Validation("Cannot book in the past".into()));
    }

    let center = state.center_repo.find_by_id(&court.center_id).await?
        .ok_or(AppError::InternalWithMsg(format!("Center {} missing for court {}", court.center_id, court.id)))?;

    // The slot must sit inside the center's open hours for its local date.
    let tz: Tz = center.timezone.parse().unwrap_or(chrono_tz::UTC);
    let start_local = payload.start_time.with_timezone(&tz);
    let date = start_local.date_naive();
    let start_min = (start_local.hour() * 60 + start_local.minute()) as i64;
    let end_min = start_min + duration_min;

    let intervals = resolve_open_intervals(&center.schedule(), date);
    let within_hours = intervals.iter().any(|iv| {
        start_min >= iv.start_min as i64 && end_min <= iv.end_min as i64
    });
    if !within_hours {
        warn!(
            "Reservation rejected: {}-{} outside open hours of center {} on {}",
            payload.start_time, payload.end_time, center.id, date
        );
        return Err(AppError::Conflict("Requested time is outside opening hours".into()));
    }

    let reservation = Reservation::new(NewReservationParams {
        court_id: court.id.clone(),
        user_id: user.id.clone(),
        sport: payload.sport,
        start: payload.start_time,
        end: payload.end_time,
        total_price: court.price_for_minutes(duration_min),
    });

    let created = state.reservation_repo.create_if_available(&reservation, &sports).await?;
    info!("Reservation created: {} on court {} ({})", created.id, court.id, created.sport);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_reservation(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(reservation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = state.reservation_repo.find_by_id(&reservation_id).await?
        .ok_or(AppError::NotFound("Reservation not found".into()))?;
    if reservation.user_id != user.id {
        return Err(AppError::Forbidden("Reservation belongs to another user".into()));
    }
    Ok(Json(reservation))
}

pub async fn list_my_reservations(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let reservations = state.reservation_repo.list_by_user(&user.id).await?;
    Ok(Json(reservations))
}

pub async fn cancel_reservation(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(reservation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let cancelled = payment_processor(&state)
        .cancel_reservation(&reservation_id, &user.id)
        .await?;
    info!("Reservation cancelled: {}", cancelled.id);
    Ok(Json(cancelled))
}

pub async fn mark_no_show(
    State(state): State<Arc<AppState>>,
    Path(reservation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.reservation_repo
        .transition_status(&reservation_id, &["PAID", "IN_PROGRESS"], "NO_SHOW")
        .await?;
    info!("Reservation marked no-show: {}", updated.id);
    Ok(Json(updated))
}
