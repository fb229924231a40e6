use std::sync::Arc;
use crate::domain::ports::{
    CenterRepository, CourtRepository, MaintenanceRepository, PaymentGateway,
    PaymentRepository, PromotionRepository, ReservationRepository,
    UserRepository, WalletRepository,
};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub center_repo: Arc<dyn CenterRepository>,
    pub court_repo: Arc<dyn CourtRepository>,
    pub maintenance_repo: Arc<dyn MaintenanceRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub reservation_repo: Arc<dyn ReservationRepository>,
    pub wallet_repo: Arc<dyn WalletRepository>,
    pub payment_repo: Arc<dyn PaymentRepository>,
    pub promotion_repo: Arc<dyn PromotionRepository>,
    pub payment_gateway: Arc<dyn PaymentGateway>,
}
