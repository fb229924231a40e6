use crate::domain::{models::maintenance::MaintenanceWindow, ports::MaintenanceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresMaintenanceRepo {
    pool: PgPool,
}

impl PostgresMaintenanceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MaintenanceRepository for PostgresMaintenanceRepo {
    async fn create(&self, window: &MaintenanceWindow) -> Result<MaintenanceWindow, AppError> {
        sqlx::query_as::<_, MaintenanceWindow>("INSERT INTO maintenance_windows (id, court_id, starts_at, duration_min, status, reason, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *")
            .bind(&window.id).bind(&window.court_id).bind(window.starts_at).bind(window.duration_min)
            .bind(&window.status).bind(&window.reason).bind(window.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<MaintenanceWindow>, AppError> {
        sqlx::query_as::<_, MaintenanceWindow>("SELECT * FROM maintenance_windows WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_court(&self, court_id: &str) -> Result<Vec<MaintenanceWindow>, AppError> {
        sqlx::query_as::<_, MaintenanceWindow>("SELECT * FROM maintenance_windows WHERE court_id = $1 ORDER BY starts_at ASC").bind(court_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_active_for_range(&self, court_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<MaintenanceWindow>, AppError> {
        let candidates = sqlx::query_as::<_, MaintenanceWindow>(
            "SELECT * FROM maintenance_windows WHERE court_id = $1 AND status IN ('SCHEDULED', 'IN_PROGRESS') AND starts_at < $2"
        )
            .bind(court_id).bind(end)
            .fetch_all(&self.pool).await.map_err(AppError::Database)?;
        Ok(candidates.into_iter().filter(|w| w.ends_at() > start).collect())
    }
    async fn cancel(&self, id: &str) -> Result<MaintenanceWindow, AppError> {
        let cancelled = sqlx::query_as::<_, MaintenanceWindow>("UPDATE maintenance_windows SET status = 'CANCELLED' WHERE id = $1 AND status IN ('SCHEDULED', 'IN_PROGRESS') RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?;
        match cancelled {
            Some(window) => Ok(window),
            None => match self.find_by_id(id).await? {
                Some(_) => Err(AppError::InvalidState("Maintenance window is not active".into())),
                None => Err(AppError::NotFound("Maintenance window not found".into())),
            },
        }
    }
    async fn advance_lifecycle(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let active = sqlx::query_as::<_, MaintenanceWindow>("SELECT * FROM maintenance_windows WHERE status IN ('SCHEDULED', 'IN_PROGRESS')")
            .fetch_all(&self.pool).await.map_err(AppError::Database)?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut changed = 0u64;
        for window in active {
            let target = if window.ends_at() <= now {
                Some("COMPLETED")
            } else if window.status == "SCHEDULED" && window.starts_at <= now {
                Some("IN_PROGRESS")
            } else {
                None
            };
            if let Some(status) = target {
                sqlx::query("UPDATE maintenance_windows SET status = $1 WHERE id = $2")
                    .bind(status).bind(&window.id)
                    .execute(&mut *tx).await.map_err(AppError::Database)?;
                changed += 1;
            }
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(changed)
    }
}
