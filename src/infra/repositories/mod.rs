pub mod postgres_center_repo;
pub mod postgres_court_repo;
pub mod postgres_maintenance_repo;
pub mod postgres_payment_repo;
pub mod postgres_promotion_repo;
pub mod postgres_reservation_repo;
pub mod postgres_user_repo;
pub mod postgres_wallet_repo;
pub mod sqlite_center_repo;
pub mod sqlite_court_repo;
pub mod sqlite_maintenance_repo;
pub mod sqlite_payment_repo;
pub mod sqlite_promotion_repo;
pub mod sqlite_reservation_repo;
pub mod sqlite_user_repo;
pub mod sqlite_wallet_repo;
