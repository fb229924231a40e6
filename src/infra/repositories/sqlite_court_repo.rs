use crate::domain::{models::court::Court, ports::CourtRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteCourtRepo {
    pool: SqlitePool,
}

impl SqliteCourtRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourtRepository for SqliteCourtRepo {
    async fn create(&self, court: &Court) -> Result<Court, AppError> {
        sqlx::query_as::<_, Court>(
            "INSERT INTO courts (id, center_id, name, primary_sport, allowed_sports_json, is_multiuse, is_active, hourly_rate, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&court.id).bind(&court.center_id).bind(&court.name).bind(&court.primary_sport)
            .bind(&court.allowed_sports_json).bind(court.is_multiuse).bind(court.is_active)
            .bind(court.hourly_rate).bind(court.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Court>, AppError> {
        sqlx::query_as::<_, Court>("SELECT * FROM courts WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_center(&self, center_id: &str) -> Result<Vec<Court>, AppError> {
        sqlx::query_as::<_, Court>("SELECT * FROM courts WHERE center_id = ? ORDER BY name ASC").bind(center_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update(&self, court: &Court) -> Result<Court, AppError> {
        sqlx::query_as::<_, Court>(
            "UPDATE courts SET name = ?, primary_sport = ?, allowed_sports_json = ?, is_multiuse = ?, is_active = ?, hourly_rate = ?
             WHERE id = ?
             RETURNING *"
        )
            .bind(&court.name).bind(&court.primary_sport).bind(&court.allowed_sports_json)
            .bind(court.is_multiuse).bind(court.is_active).bind(court.hourly_rate)
            .bind(&court.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
