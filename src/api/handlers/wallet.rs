use axum::{extract::{Query, State}, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{LedgerQuery, TopupRequest};
use crate::api::dtos::responses::{LedgerPageResponse, WalletResponse};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::wallet::NewLedgerEntry;
use crate::error::AppError;
use crate::state::AppState;

pub const REASON_TOPUP: &str = "TOPUP";

pub async fn get_wallet(
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(WalletResponse {
        user_id: user.id,
        credits_balance: user.credits_balance,
    }))
}

pub async fn list_ledger(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<LedgerQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let entries = state.wallet_repo.list_entries(&user.id, per_page, offset).await?;
    let total = state.wallet_repo.count_entries(&user.id).await?;

    Ok(Json(LedgerPageResponse { entries, page, per_page, total }))
}

pub async fn topup(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<TopupRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.credits <= 0.0 {
        return Err(AppError::Validation("Top-up credits must be positive".into()));
    }
    if payload.idempotency_key.trim().is_empty() {
        return Err(AppError::Validation("idempotency_key is required".into()));
    }

    let entry = NewLedgerEntry::credit(&user.id, REASON_TOPUP, payload.credits, &payload.idempotency_key);
    let created = state.wallet_repo.apply_entry(&entry).await?;
    info!("Wallet top-up for user {}: +{} credits", user.id, created.credits);
    Ok(Json(created))
}
