use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct MaintenanceWindow {
    pub id: String,
    pub court_id: String,
    pub starts_at: DateTime<Utc>,
    pub duration_min: i32,
    pub status: String,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MaintenanceWindow {
    pub fn new(court_id: String, starts_at: DateTime<Utc>, duration_min: i32, reason: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            court_id,
            starts_at,
            duration_min,
            status: "SCHEDULED".to_string(),
            reason,
            created_at: Utc::now(),
        }
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.starts_at + Duration::minutes(self.duration_min as i64)
    }

    /// SCHEDULED and IN_PROGRESS windows block slots; COMPLETED and
    /// CANCELLED do not.
    pub fn is_active(&self) -> bool {
        matches!(self.status.as_str(), "SCHEDULED" | "IN_PROGRESS")
    }
}
