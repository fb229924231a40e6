use std::collections::BTreeMap;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::models::wallet::LedgerEntry;
use crate::domain::services::conflict::SlotStatus;

#[derive(Serialize)]
pub struct AvailabilitySlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: SlotStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub court_id: String,
    pub date: String,
    pub sport: String,
    pub slots: Vec<AvailabilitySlot>,
    pub summary: BTreeMap<&'static str, usize>,
}

#[derive(Serialize)]
pub struct WalletResponse {
    pub user_id: String,
    pub credits_balance: f64,
}

#[derive(Serialize)]
pub struct LedgerPageResponse {
    pub entries: Vec<LedgerEntry>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}
