use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use chrono::Utc;
use tracing::info;

use crate::api::dtos::requests::{ApplyPromotionRequest, CreatePromotionRequest};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::promotion::{NewPromotionParams, Promotion, RewardSpec};
use crate::domain::services::promotion::PromotionEngine;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_promotion(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreatePromotionRequest>,
) -> Result<impl IntoResponse, AppError> {
    match payload.promo_kind.as_str() {
        "SIGNUP_BONUS" | "REFERRAL_BONUS" | "TOPUP_BONUS" | "DISCOUNT" => {}
        _ => return Err(AppError::Validation("Invalid promo_kind".into())),
    }

    let value = match &payload.rewards {
        RewardSpec::FixedCredits { value, .. }
        | RewardSpec::PercentageBonus { value, .. }
        | RewardSpec::DiscountPercentage { value, .. }
        | RewardSpec::DiscountFixed { value, .. } => *value,
    };
    if value <= 0.0 {
        return Err(AppError::Validation("Reward value must be positive".into()));
    }
    if let RewardSpec::DiscountPercentage { value, .. } = &payload.rewards
        && *value > 100.0 {
        return Err(AppError::Validation("Discount percentage cannot exceed 100".into()));
    }

    if let Some(limit) = payload.usage_limit
        && limit <= 0 {
        return Err(AppError::Validation("usage_limit must be positive when set".into()));
    }

    let valid_from = payload.valid_from.unwrap_or_else(Utc::now);
    if let Some(valid_to) = payload.valid_to
        && valid_to < valid_from {
        return Err(AppError::Validation("valid_to must be after valid_from".into()));
    }

    let promotion = Promotion::new(NewPromotionParams {
        code: payload.code,
        promo_kind: payload.promo_kind,
        valid_from,
        valid_to: payload.valid_to,
        usage_limit: payload.usage_limit,
        rewards: payload.rewards,
        conditions: payload.conditions.unwrap_or_default(),
    });

    let created = state.promotion_repo.create(&promotion).await?;
    info!("Promotion created: {} ({})", created.code, created.promo_kind);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_active_promotions(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let promotions = state.promotion_repo.list_active(Utc::now()).await?;
    Ok(Json(promotions))
}

pub async fn apply_promotion(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(promotion_id): Path<String>,
    Json(payload): Json<ApplyPromotionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = PromotionEngine::new(state.promotion_repo.clone())
        .apply(&promotion_id, &user.id, payload.amount, payload.metadata)
        .await?;
    Ok(Json(outcome))
}
