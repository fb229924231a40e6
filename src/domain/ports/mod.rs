use crate::domain::models::{
    center::Center,
    court::{Court, CourtSports},
    maintenance::MaintenanceWindow,
    promotion::{Promotion, PromotionApplication},
    reservation::Reservation,
    user::User,
    wallet::{LedgerEntry, NewLedgerEntry},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait CenterRepository: Send + Sync {
    async fn create(&self, center: &Center) -> Result<Center, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Center>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Center>, AppError>;
    async fn list(&self) -> Result<Vec<Center>, AppError>;
    async fn update_schedule(&self, id: &str, schedule_json: &str) -> Result<Center, AppError>;
}

#[async_trait]
pub trait CourtRepository: Send + Sync {
    async fn create(&self, court: &Court) -> Result<Court, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Court>, AppError>;
    async fn list_by_center(&self, center_id: &str) -> Result<Vec<Court>, AppError>;
    async fn update(&self, court: &Court) -> Result<Court, AppError>;
}

#[async_trait]
pub trait MaintenanceRepository: Send + Sync {
    async fn create(&self, window: &MaintenanceWindow) -> Result<MaintenanceWindow, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<MaintenanceWindow>, AppError>;
    async fn list_by_court(&self, court_id: &str) -> Result<Vec<MaintenanceWindow>, AppError>;
    async fn list_active_for_range(&self, court_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<MaintenanceWindow>, AppError>;
    async fn cancel(&self, id: &str) -> Result<MaintenanceWindow, AppError>;
    async fn advance_lifecycle(&self, now: DateTime<Utc>) -> Result<u64, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Inserts a PENDING reservation after re-running the conflict check
    /// against the court's overlapping rows inside the same transaction.
    async fn create_if_available(&self, reservation: &Reservation, sports: &CourtSports) -> Result<Reservation, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>, AppError>;
    async fn list_blocking_for_range(&self, court_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Reservation>, AppError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Reservation>, AppError>;
    /// Guarded transition: NotFound if absent, InvalidState if the current
    /// status is not in `from`.
    async fn transition_status(&self, id: &str, from: &[&str], to: &str) -> Result<Reservation, AppError>;
    async fn expire_stale_pending(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError>;
    async fn advance_lifecycle(&self, now: DateTime<Utc>) -> Result<u64, AppError>;
}

#[async_trait]
pub trait WalletRepository: Send + Sync {
    /// Applies one balance change atomically: idempotency-key replay
    /// returns the stored entry, a DEBIT past the balance fails with
    /// InsufficientCredits, and the user row and ledger append commit
    /// together or not at all.
    async fn apply_entry(&self, entry: &NewLedgerEntry) -> Result<LedgerEntry, AppError>;
    async fn find_by_key(&self, idempotency_key: &str) -> Result<Option<LedgerEntry>, AppError>;
    async fn list_entries(&self, user_id: &str, limit: i64, offset: i64) -> Result<Vec<LedgerEntry>, AppError>;
    async fn count_entries(&self, user_id: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Ledger DEBIT plus reservation settlement in one transaction.
    async fn settle_with_credits(&self, reservation_id: &str, entry: &NewLedgerEntry) -> Result<(Reservation, LedgerEntry), AppError>;
    /// Marks a zero-cost reservation paid without touching the ledger.
    async fn settle_free(&self, reservation_id: &str) -> Result<Reservation, AppError>;
    /// Ledger CREDIT plus cancellation of a paid reservation in one
    /// transaction.
    async fn refund_to_credits(&self, reservation_id: &str, entry: &NewLedgerEntry) -> Result<(Reservation, LedgerEntry), AppError>;
}

#[async_trait]
pub trait PromotionRepository: Send + Sync {
    async fn create(&self, promotion: &Promotion) -> Result<Promotion, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Promotion>, AppError>;
    async fn list_active(&self, now: DateTime<Utc>) -> Result<Vec<Promotion>, AppError>;
    async fn count_applications(&self, promotion_id: &str, user_id: &str) -> Result<i64, AppError>;
    /// Application insert, guarded usage_count increment and ledger CREDIT
    /// in one transaction.
    async fn apply(&self, application: &PromotionApplication, entry: &NewLedgerEntry, one_time: bool) -> Result<(PromotionApplication, LedgerEntry), AppError>;
}

/// External card processor. Called after the reservation is durably
/// PENDING, never inside a database transaction.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout(&self, reservation: &Reservation, amount: f64) -> Result<String, AppError>;
}
