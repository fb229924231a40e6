use axum::{extract::{Path, State}, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::dtos::requests::PayReservationRequest;
use crate::api::extractors::auth::AuthUser;
use crate::domain::services::payment::PaymentProcessor;
use crate::error::AppError;
use crate::state::AppState;

pub fn payment_processor(state: &Arc<AppState>) -> PaymentProcessor {
    PaymentProcessor::new(
        state.reservation_repo.clone(),
        state.payment_repo.clone(),
        state.wallet_repo.clone(),
        state.promotion_repo.clone(),
        state.payment_gateway.clone(),
    )
}

pub async fn pay_reservation(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(reservation_id): Path<String>,
    Json(payload): Json<PayReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.idempotency_key.trim().is_empty() {
        return Err(AppError::Validation("idempotency_key is required".into()));
    }

    let outcome = payment_processor(&state)
        .process_payment(
            &reservation_id,
            &payload.payment_method,
            payload.amount,
            &user.id,
            &payload.idempotency_key,
            payload.applied_promo.as_deref(),
        )
        .await?;

    Ok(Json(outcome))
}
