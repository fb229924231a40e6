use std::sync::Arc;
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::domain::models::promotion::{Promotion, PromotionApplication, PromotionConditions, RewardSpec};
use crate::domain::models::wallet::{round2, NewLedgerEntry};
use crate::domain::ports::PromotionRepository;
use crate::error::AppError;

pub const REASON_PROMOTION: &str = "PROMOTION";

/// Evaluates eligibility and reward for bonus promotions and records their
/// application through the wallet ledger.
pub struct PromotionEngine {
    promotions: Arc<dyn PromotionRepository>,
}

#[derive(Debug, Serialize)]
pub struct PromotionOutcome {
    pub credits_awarded: f64,
    pub new_balance: f64,
    pub promotion: Promotion,
}

impl PromotionEngine {
    pub fn new(promotions: Arc<dyn PromotionRepository>) -> Self {
        Self { promotions }
    }

    pub async fn apply(
        &self,
        promotion_id: &str,
        user_id: &str,
        amount: Option<f64>,
        metadata: Option<serde_json::Value>,
    ) -> Result<PromotionOutcome, AppError> {
        let promotion = self.promotions.find_by_id(promotion_id).await?
            .ok_or(AppError::NotFound("Promotion not found".into()))?;

        let now = Utc::now();
        check_eligibility(&promotion, now)?;

        if promotion.is_one_time()
            && self.promotions.count_applications(promotion_id, user_id).await? > 0 {
            return Err(AppError::AlreadyUsed);
        }

        check_conditions(&promotion.conditions(), amount, now)?;

        let reward = compute_reward(&promotion.rewards()?, amount)?;
        if reward <= 0.0 {
            return Err(AppError::Validation("Computed reward is zero".into()));
        }

        let key = derive_idempotency_key(promotion_id, user_id, now);
        let application = PromotionApplication::new(
            promotion.id.clone(),
            user_id.to_string(),
            reward,
            metadata,
        );
        let entry = NewLedgerEntry::credit(user_id, REASON_PROMOTION, reward, &key)
            .with_metadata(serde_json::json!({ "promotion_id": promotion.id }));

        let (_, ledger) = self.promotions
            .apply(&application, &entry, promotion.is_one_time())
            .await?;

        info!("Promotion {} applied for user {}: +{} credits", promotion.code, user_id, reward);

        Ok(PromotionOutcome {
            credits_awarded: reward,
            new_balance: ledger.balance_after,
            promotion,
        })
    }
}

pub fn check_eligibility(promotion: &Promotion, now: DateTime<Utc>) -> Result<(), AppError> {
    if promotion.status != "ACTIVE" {
        return Err(AppError::InvalidState("Promotion is not active".into()));
    }
    if now < promotion.valid_from {
        return Err(AppError::PromotionExpired);
    }
    if let Some(valid_to) = promotion.valid_to
        && now > valid_to {
        return Err(AppError::PromotionExpired);
    }
    if let Some(limit) = promotion.usage_limit
        && promotion.usage_count >= limit {
        return Err(AppError::UsageLimitExceeded);
    }
    Ok(())
}

pub fn check_conditions(
    conditions: &PromotionConditions,
    amount: Option<f64>,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    if let Some(min) = conditions.min_amount {
        let amount = amount.ok_or(AppError::MissingAmount)?;
        if amount < min {
            return Err(AppError::Validation(format!("Amount below promotion minimum of {}", min)));
        }
    }
    if let Some(max) = conditions.max_amount {
        let amount = amount.ok_or(AppError::MissingAmount)?;
        if amount > max {
            return Err(AppError::Validation(format!("Amount above promotion maximum of {}", max)));
        }
    }
    if let Some(ref days) = conditions.day_of_week {
        // chrono renders weekdays as "Mon".."Sun"; accept both that short
        // form and full names like "MONDAY" in the configuration.
        let today = now.weekday().to_string().to_uppercase();
        let matched = days.iter().any(|d| {
            let d = d.to_uppercase();
            d == today || d.starts_with(&today)
        });
        if !matched {
            return Err(AppError::Validation("Promotion not valid on this weekday".into()));
        }
    }
    if let Some(ref window) = conditions.time_of_day {
        let minute = (now.hour() * 60 + now.minute()) as i64;
        let in_window = match (parse_minute(&window.start), parse_minute(&window.end)) {
            (Some(start), Some(end)) => minute >= start && minute < end,
            _ => true,
        };
        if !in_window {
            return Err(AppError::Validation("Promotion not valid at this time of day".into()));
        }
    }
    Ok(())
}

fn parse_minute(value: &str) -> Option<i64> {
    let (h, m) = value.split_once(':')?;
    let h: i64 = h.parse().ok()?;
    let m: i64 = m.parse().ok()?;
    Some(h * 60 + m)
}

/// Reward in credits for the bonus kinds. Discount kinds reprice a
/// reservation instead of minting credits, so applying one here is a
/// state error.
pub fn compute_reward(spec: &RewardSpec, amount: Option<f64>) -> Result<f64, AppError> {
    let (raw, cap) = match spec {
        RewardSpec::FixedCredits { value, max_reward_amount } => (*value, *max_reward_amount),
        RewardSpec::PercentageBonus { value, max_reward_amount } => {
            let amount = amount.ok_or(AppError::MissingAmount)?;
            (amount * value / 100.0, *max_reward_amount)
        }
        RewardSpec::DiscountPercentage { .. } | RewardSpec::DiscountFixed { .. } => {
            return Err(AppError::InvalidState("Discount promotions do not award credits".into()));
        }
    };
    let clamped = match cap {
        Some(max) => raw.min(max),
        None => raw,
    };
    Ok(round2(clamped))
}

/// Final price of a reservation under a discount reward; None for the
/// bonus kinds. The discount magnitude is clamped to max_reward_amount
/// and the result never goes below zero.
pub fn discounted_price(spec: &RewardSpec, base_price: f64) -> Option<f64> {
    let (discount, cap) = match spec {
        RewardSpec::DiscountPercentage { value, max_reward_amount } => {
            (base_price * value / 100.0, *max_reward_amount)
        }
        RewardSpec::DiscountFixed { value, max_reward_amount } => (*value, *max_reward_amount),
        _ => return None,
    };
    let discount = match cap {
        Some(max) => discount.min(max),
        None => discount,
    };
    Some(round2((base_price - discount).max(0.0)))
}

/// Stable per-attempt key so a retried application cannot double-credit.
pub fn derive_idempotency_key(promotion_id: &str, user_id: &str, at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(promotion_id.as_bytes());
    hasher.update(user_id.as_bytes());
    hasher.update(at.timestamp_millis().to_be_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::promotion::{NewPromotionParams, TimeOfDayWindow};
    use chrono::Duration;

    fn promo(params: NewPromotionParams) -> Promotion {
        Promotion::new(params)
    }

    fn fixed(value: f64) -> RewardSpec {
        RewardSpec::FixedCredits { value, max_reward_amount: None }
    }

    #[test]
    fn fixed_credits_reward_is_the_value() {
        assert_eq!(compute_reward(&fixed(5.0), None).unwrap(), 5.0);
    }

    #[test]
    fn percentage_bonus_requires_an_amount() {
        let spec = RewardSpec::PercentageBonus { value: 10.0, max_reward_amount: None };
        assert!(matches!(compute_reward(&spec, None), Err(AppError::MissingAmount)));
        assert_eq!(compute_reward(&spec, Some(200.0)).unwrap(), 20.0);
    }

    #[test]
    fn reward_is_clamped_to_max() {
        let spec = RewardSpec::PercentageBonus { value: 50.0, max_reward_amount: Some(100.0) };
        assert_eq!(compute_reward(&spec, Some(1000.0)).unwrap(), 100.0);
    }

    #[test]
    fn reward_is_rounded_to_cents() {
        let spec = RewardSpec::PercentageBonus { value: 33.0, max_reward_amount: None };
        assert_eq!(compute_reward(&spec, Some(10.0)).unwrap(), 3.3);
        let spec = RewardSpec::PercentageBonus { value: 3.333, max_reward_amount: None };
        assert_eq!(compute_reward(&spec, Some(100.0)).unwrap(), 3.33);
    }

    #[test]
    fn discount_kinds_do_not_mint_credits() {
        let spec = RewardSpec::DiscountPercentage { value: 100.0, max_reward_amount: None };
        assert!(matches!(compute_reward(&spec, Some(10.0)), Err(AppError::InvalidState(_))));
    }

    #[test]
    fn discounted_price_percentage_and_fixed() {
        let pct = RewardSpec::DiscountPercentage { value: 25.0, max_reward_amount: None };
        assert_eq!(discounted_price(&pct, 40.0), Some(30.0));

        let fixed = RewardSpec::DiscountFixed { value: 15.0, max_reward_amount: None };
        assert_eq!(discounted_price(&fixed, 10.0), Some(0.0));

        let capped = RewardSpec::DiscountPercentage { value: 50.0, max_reward_amount: Some(5.0) };
        assert_eq!(discounted_price(&capped, 40.0), Some(35.0));
    }

    #[test]
    fn bonus_kinds_have_no_discounted_price() {
        assert_eq!(discounted_price(&fixed(5.0), 40.0), None);
    }

    #[test]
    fn eligibility_rejects_exhausted_and_expired() {
        let now = Utc::now();
        let mut p = promo(NewPromotionParams {
            code: "X".to_string(),
            promo_kind: "TOPUP_BONUS".to_string(),
            valid_from: now - Duration::days(1),
            valid_to: None,
            usage_limit: Some(1),
            rewards: fixed(5.0),
            conditions: Default::default(),
        });
        assert!(check_eligibility(&p, now).is_ok());

        p.usage_count = 1;
        assert!(matches!(check_eligibility(&p, now), Err(AppError::UsageLimitExceeded)));

        p.usage_count = 0;
        p.valid_to = Some(now - Duration::hours(1));
        assert!(matches!(check_eligibility(&p, now), Err(AppError::PromotionExpired)));

        p.valid_to = None;
        p.valid_from = now + Duration::hours(1);
        assert!(matches!(check_eligibility(&p, now), Err(AppError::PromotionExpired)));

        p.valid_from = now - Duration::days(1);
        p.status = "INACTIVE".to_string();
        assert!(matches!(check_eligibility(&p, now), Err(AppError::InvalidState(_))));
    }

    #[test]
    fn conditions_check_amount_bounds() {
        let conditions = PromotionConditions {
            min_amount: Some(10.0),
            max_amount: Some(100.0),
            ..Default::default()
        };
        let now = Utc::now();
        assert!(check_conditions(&conditions, Some(50.0), now).is_ok());
        assert!(check_conditions(&conditions, Some(5.0), now).is_err());
        assert!(check_conditions(&conditions, Some(500.0), now).is_err());
        assert!(matches!(check_conditions(&conditions, None, now), Err(AppError::MissingAmount)));
    }

    #[test]
    fn time_of_day_window_is_enforced() {
        let conditions = PromotionConditions {
            time_of_day: Some(TimeOfDayWindow { start: "00:00".to_string(), end: "23:59".to_string() }),
            ..Default::default()
        };
        assert!(check_conditions(&conditions, None, Utc::now()).is_ok());
    }

    #[test]
    fn idempotency_key_is_stable_per_attempt() {
        let at = Utc::now();
        let a = derive_idempotency_key("p1", "u1", at);
        let b = derive_idempotency_key("p1", "u1", at);
        let c = derive_idempotency_key("p1", "u2", at);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
