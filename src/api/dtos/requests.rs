use crate::domain::models::center::CenterSchedule;
use crate::domain::models::promotion::{PromotionConditions, RewardSpec};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateCenterRequest {
    pub name: String,
    pub slug: String,
    pub timezone: String,
    pub schedule: CenterSchedule,
}

#[derive(Deserialize)]
pub struct UpdateScheduleRequest {
    pub schedule: CenterSchedule,
}

#[derive(Deserialize)]
pub struct CreateCourtRequest {
    pub name: String,
    pub primary_sport: String,
    pub allowed_sports: Option<Vec<String>>,
    pub hourly_rate: f64,
}

#[derive(Deserialize)]
pub struct UpdateCourtRequest {
    pub name: Option<String>,
    pub primary_sport: Option<String>,
    pub allowed_sports: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub hourly_rate: Option<f64>,
}

#[derive(Deserialize)]
pub struct CreateMaintenanceRequest {
    pub starts_at: DateTime<Utc>,
    pub duration_min: i32,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
    pub duration: i64,
    pub sport: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateReservationRequest {
    pub court_id: String,
    pub sport: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct PayReservationRequest {
    pub payment_method: String,
    pub amount: f64,
    pub idempotency_key: String,
    pub applied_promo: Option<String>,
}

#[derive(Deserialize)]
pub struct TopupRequest {
    pub credits: f64,
    pub idempotency_key: String,
}

#[derive(Deserialize)]
pub struct LedgerQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreatePromotionRequest {
    pub code: String,
    pub promo_kind: String,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
    pub usage_limit: Option<i32>,
    pub rewards: RewardSpec,
    pub conditions: Option<PromotionConditions>,
}

#[derive(Deserialize)]
pub struct ApplyPromotionRequest {
    pub amount: Option<f64>,
    pub metadata: Option<serde_json::Value>,
}
