use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Reservation {
    pub id: String,
    pub court_id: String,
    pub user_id: String,
    pub sport: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub total_price: f64,
    pub paid_amount: Option<f64>,
    pub created_at: DateTime<Utc>,
}

pub struct NewReservationParams {
    pub court_id: String,
    pub user_id: String,
    pub sport: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub total_price: f64,
}

impl Reservation {
    pub fn new(params: NewReservationParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            court_id: params.court_id,
            user_id: params.user_id,
            sport: params.sport,
            start_time: params.start,
            end_time: params.end,
            status: "PENDING".to_string(),
            payment_status: "UNPAID".to_string(),
            payment_method: None,
            total_price: params.total_price,
            paid_amount: None,
            created_at: Utc::now(),
        }
    }

    /// PENDING, PAID and IN_PROGRESS reservations occupy their slot;
    /// terminal states free it again.
    pub fn is_blocking(&self) -> bool {
        matches!(self.status.as_str(), "PENDING" | "PAID" | "IN_PROGRESS")
    }

    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && self.end_time > start
    }
}
