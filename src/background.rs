use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::time::sleep;
use tracing::{error, info};
use crate::state::AppState;

const SWEEP_INTERVAL_SECS: u64 = 30;

/// Periodic housekeeping: unpaid PENDING reservations past their TTL are
/// cancelled so their slots free up, and maintenance windows and paid
/// reservations advance through their time-based lifecycle states.
pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Starting background lifecycle worker...");

    loop {
        let now = Utc::now();
        let cutoff = now - chrono::Duration::minutes(state.config.pending_ttl_minutes);

        match state.reservation_repo.expire_stale_pending(cutoff).await {
            Ok(expired) if expired > 0 => {
                info!("Expired {} stale pending reservations", expired);
            }
            Ok(_) => {}
            Err(e) => error!("Failed to expire stale pending reservations: {:?}", e),
        }

        match state.reservation_repo.advance_lifecycle(now).await {
            Ok(advanced) if advanced > 0 => {
                info!("Advanced {} reservations through their lifecycle", advanced);
            }
            Ok(_) => {}
            Err(e) => error!("Failed to advance reservation lifecycle: {:?}", e),
        }

        match state.maintenance_repo.advance_lifecycle(now).await {
            Ok(advanced) if advanced > 0 => {
                info!("Advanced {} maintenance windows", advanced);
            }
            Ok(_) => {}
            Err(e) => error!("Failed to advance maintenance windows: {:?}", e),
        }

        sleep(Duration::from_secs(SWEEP_INTERVAL_SECS)).await;
    }
}
