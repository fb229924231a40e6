use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::models::wallet::round2;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Court {
    pub id: String,
    pub center_id: String,
    pub name: String,
    pub primary_sport: String,
    pub allowed_sports_json: String,
    pub is_multiuse: bool,
    pub is_active: bool,
    pub hourly_rate: f64,
    pub created_at: DateTime<Utc>,
}

pub struct NewCourtParams {
    pub center_id: String,
    pub name: String,
    pub primary_sport: String,
    pub allowed_sports: Vec<String>,
    pub hourly_rate: f64,
}

impl Court {
    pub fn new(params: NewCourtParams) -> Self {
        let is_multiuse = !params.allowed_sports.is_empty();
        Self {
            id: Uuid::new_v4().to_string(),
            center_id: params.center_id,
            name: params.name,
            primary_sport: params.primary_sport,
            allowed_sports_json: serde_json::to_string(&params.allowed_sports)
                .unwrap_or_else(|_| "[]".to_string()),
            is_multiuse,
            is_active: true,
            hourly_rate: params.hourly_rate,
            created_at: Utc::now(),
        }
    }

    pub fn sports(&self) -> CourtSports {
        let allowed: Vec<String> = serde_json::from_str(&self.allowed_sports_json).unwrap_or_default();
        CourtSports {
            primary: self.primary_sport.clone(),
            allowed,
        }
    }

    pub fn price_for_minutes(&self, minutes: i64) -> f64 {
        round2(self.hourly_rate * minutes as f64 / 60.0)
    }
}

/// How a sport relates to a court: the primary sport occupies the court
/// exclusively, secondary sports may share time with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SportRole {
    Primary,
    Secondary,
}

/// A court's capability set. `role_of` checks the primary sport first, so
/// a primary sport accidentally listed as secondary still resolves Primary.
#[derive(Debug, Clone)]
pub struct CourtSports {
    pub primary: String,
    pub allowed: Vec<String>,
}

impl CourtSports {
    pub fn role_of(&self, sport: &str) -> Option<SportRole> {
        if sport == self.primary {
            Some(SportRole::Primary)
        } else if self.allowed.iter().any(|s| s == sport) {
            Some(SportRole::Secondary)
        } else {
            None
        }
    }
}
