use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::infra::payments::http_payment_gateway::HttpPaymentGateway;
use crate::infra::repositories::{
    postgres_center_repo::PostgresCenterRepo, postgres_court_repo::PostgresCourtRepo,
    postgres_maintenance_repo::PostgresMaintenanceRepo, postgres_payment_repo::PostgresPaymentRepo,
    postgres_promotion_repo::PostgresPromotionRepo, postgres_reservation_repo::PostgresReservationRepo,
    postgres_user_repo::PostgresUserRepo, postgres_wallet_repo::PostgresWalletRepo,
    sqlite_center_repo::SqliteCenterRepo, sqlite_court_repo::SqliteCourtRepo,
    sqlite_maintenance_repo::SqliteMaintenanceRepo, sqlite_payment_repo::SqlitePaymentRepo,
    sqlite_promotion_repo::SqlitePromotionRepo, sqlite_reservation_repo::SqliteReservationRepo,
    sqlite_user_repo::SqliteUserRepo, sqlite_wallet_repo::SqliteWalletRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let payment_gateway = Arc::new(HttpPaymentGateway::new(
        config.payment_service_url.clone(),
        config.payment_service_token.clone(),
    ));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        AppState {
            config: config.clone(),
            center_repo: Arc::new(PostgresCenterRepo::new(pool.clone())),
            court_repo: Arc::new(PostgresCourtRepo::new(pool.clone())),
            maintenance_repo: Arc::new(PostgresMaintenanceRepo::new(pool.clone())),
            user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
            reservation_repo: Arc::new(PostgresReservationRepo::new(pool.clone())),
            wallet_repo: Arc::new(PostgresWalletRepo::new(pool.clone())),
            payment_repo: Arc::new(PostgresPaymentRepo::new(pool.clone())),
            promotion_repo: Arc::new(PostgresPromotionRepo::new(pool.clone())),
            payment_gateway,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        AppState {
            config: config.clone(),
            center_repo: Arc::new(SqliteCenterRepo::new(pool.clone())),
            court_repo: Arc::new(SqliteCourtRepo::new(pool.clone())),
            maintenance_repo: Arc::new(SqliteMaintenanceRepo::new(pool.clone())),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            reservation_repo: Arc::new(SqliteReservationRepo::new(pool.clone())),
            wallet_repo: Arc::new(SqliteWalletRepo::new(pool.clone())),
            payment_repo: Arc::new(SqlitePaymentRepo::new(pool.clone())),
            promotion_repo: Arc::new(SqlitePromotionRepo::new(pool.clone())),
            payment_gateway,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
