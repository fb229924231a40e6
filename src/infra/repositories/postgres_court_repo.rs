use crate::domain::{models::court::Court, ports::CourtRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresCourtRepo {
    pool: PgPool,
}

impl PostgresCourtRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourtRepository for PostgresCourtRepo {
    async fn create(&self, court: &Court) -> Result<Court, AppError> {
        sqlx::query_as::<_, Court>("INSERT INTO courts (id, center_id, name, primary_sport, allowed_sports_json, is_multiuse, is_active, hourly_rate, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *")
            .bind(&court.id).bind(&court.center_id).bind(&court.name).bind(&court.primary_sport)
            .bind(&court.allowed_sports_json).bind(court.is_multiuse).bind(court.is_active)
            .bind(court.hourly_rate).bind(court.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Court>, AppError> {
        sqlx::query_as::<_, Court>("SELECT * FROM courts WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_center(&self, center_id: &str) -> Result<Vec<Court>, AppError> {
        sqlx::query_as::<_, Court>("SELECT * FROM courts WHERE center_id = $1 ORDER BY name ASC").bind(center_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update(&self, court: &Court) -> Result<Court, AppError> {
        sqlx::query_as::<_, Court>("UPDATE courts SET name = $1, primary_sport = $2, allowed_sports_json = $3, is_multiuse = $4, is_active = $5, hourly_rate = $6 WHERE id = $7 RETURNING *")
            .bind(&court.name).bind(&court.primary_sport).bind(&court.allowed_sports_json)
            .bind(court.is_multiuse).bind(court.is_active).bind(court.hourly_rate)
            .bind(&court.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
