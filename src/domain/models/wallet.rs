use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const ENTRY_CREDIT: &str = "CREDIT";
pub const ENTRY_DEBIT: &str = "DEBIT";

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Immutable, append-only record of a single balance change. The signed
/// running sum over a user's entries always equals `balance_after` of the
/// latest entry and the user's current `credits_balance`.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct LedgerEntry {
    pub id: String,
    pub user_id: String,
    pub entry_type: String,
    pub reason: String,
    pub credits: f64,
    pub balance_after: f64,
    pub idempotency_key: String,
    pub metadata_json: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn signed_credits(&self) -> f64 {
        if self.entry_type == ENTRY_DEBIT {
            -self.credits
        } else {
            self.credits
        }
    }
}

/// Input for one ledger application. `credits` is a positive magnitude;
/// direction comes from `entry_type`.
#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    pub id: String,
    pub user_id: String,
    pub entry_type: String,
    pub reason: String,
    pub credits: f64,
    pub idempotency_key: String,
    pub metadata_json: Option<String>,
}

impl NewLedgerEntry {
    pub fn credit(user_id: &str, reason: &str, credits: f64, idempotency_key: &str) -> Self {
        Self::build(user_id, ENTRY_CREDIT, reason, credits, idempotency_key)
    }

    pub fn debit(user_id: &str, reason: &str, credits: f64, idempotency_key: &str) -> Self {
        Self::build(user_id, ENTRY_DEBIT, reason, credits, idempotency_key)
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata_json = Some(metadata.to_string());
        self
    }

    fn build(user_id: &str, entry_type: &str, reason: &str, credits: f64, idempotency_key: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            entry_type: entry_type.to_string(),
            reason: reason.to_string(),
            credits: round2(credits),
            idempotency_key: idempotency_key.to_string(),
            metadata_json: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_truncates_to_cents() {
        assert_eq!(round2(10.005), 10.01);
        assert_eq!(round2(10.004), 10.0);
        assert_eq!(round2(33.333333), 33.33);
    }

    #[test]
    fn signed_credits_negates_debits() {
        let entry = LedgerEntry {
            id: "e1".to_string(),
            user_id: "u1".to_string(),
            entry_type: ENTRY_DEBIT.to_string(),
            reason: "RESERVATION_PAYMENT".to_string(),
            credits: 12.5,
            balance_after: 7.5,
            idempotency_key: "k1".to_string(),
            metadata_json: None,
            created_at: Utc::now(),
        };
        assert_eq!(entry.signed_credits(), -12.5);
    }
}
