use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Promotion {
    pub id: String,
    pub code: String,
    pub promo_kind: String,
    pub status: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
    pub usage_limit: Option<i32>,
    pub usage_count: i32,
    pub rewards_json: String,
    pub conditions_json: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewPromotionParams {
    pub code: String,
    pub promo_kind: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
    pub usage_limit: Option<i32>,
    pub rewards: RewardSpec,
    pub conditions: PromotionConditions,
}

impl Promotion {
    pub fn new(params: NewPromotionParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            code: params.code,
            promo_kind: params.promo_kind,
            status: "ACTIVE".to_string(),
            valid_from: params.valid_from,
            valid_to: params.valid_to,
            usage_limit: params.usage_limit,
            usage_count: 0,
            rewards_json: serde_json::to_string(&params.rewards)
                .unwrap_or_else(|_| "{}".to_string()),
            conditions_json: serde_json::to_string(&params.conditions)
                .unwrap_or_else(|_| "{}".to_string()),
            created_at: Utc::now(),
        }
    }

    pub fn rewards(&self) -> Result<RewardSpec, AppError> {
        serde_json::from_str(&self.rewards_json)
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid rewards spec for promotion {}: {}", self.id, e)))
    }

    pub fn conditions(&self) -> PromotionConditions {
        serde_json::from_str(&self.conditions_json).unwrap_or_default()
    }

    /// Signup and referral bonuses may be claimed once per user.
    pub fn is_one_time(&self) -> bool {
        matches!(self.promo_kind.as_str(), "SIGNUP_BONUS" | "REFERRAL_BONUS")
    }
}

/// Closed set of reward kinds. The bonus kinds mint wallet credits; the
/// discount kinds reprice a reservation at payment time and never touch
/// the ledger directly.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RewardSpec {
    FixedCredits {
        value: f64,
        #[serde(default)]
        max_reward_amount: Option<f64>,
    },
    PercentageBonus {
        value: f64,
        #[serde(default)]
        max_reward_amount: Option<f64>,
    },
    DiscountPercentage {
        value: f64,
        #[serde(default)]
        max_reward_amount: Option<f64>,
    },
    DiscountFixed {
        value: f64,
        #[serde(default)]
        max_reward_amount: Option<f64>,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct TimeOfDayWindow {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct PromotionConditions {
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub day_of_week: Option<Vec<String>>,
    pub time_of_day: Option<TimeOfDayWindow>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct PromotionApplication {
    pub id: String,
    pub promotion_id: String,
    pub user_id: String,
    pub credits_awarded: f64,
    pub metadata_json: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PromotionApplication {
    pub fn new(promotion_id: String, user_id: String, credits_awarded: f64, metadata: Option<serde_json::Value>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            promotion_id,
            user_id,
            credits_awarded,
            metadata_json: metadata.map(|m| m.to_string()),
            created_at: Utc::now(),
        }
    }
}
