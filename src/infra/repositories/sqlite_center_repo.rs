use crate::domain::{models::center::Center, ports::CenterRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteCenterRepo {
    pool: SqlitePool,
}

impl SqliteCenterRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CenterRepository for SqliteCenterRepo {
    async fn create(&self, center: &Center) -> Result<Center, AppError> {
        sqlx::query_as::<_, Center>(
            "INSERT INTO centers (id, name, slug, timezone, schedule_json, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&center.id).bind(&center.name).bind(&center.slug).bind(&center.timezone)
            .bind(&center.schedule_json).bind(center.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Center>, AppError> {
        sqlx::query_as::<_, Center>("SELECT * FROM centers WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Center>, AppError> {
        sqlx::query_as::<_, Center>("SELECT * FROM centers WHERE slug = ?").bind(slug).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self) -> Result<Vec<Center>, AppError> {
        sqlx::query_as::<_, Center>("SELECT * FROM centers ORDER BY name ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update_schedule(&self, id: &str, schedule_json: &str) -> Result<Center, AppError> {
        let updated = sqlx::query_as::<_, Center>("UPDATE centers SET schedule_json = ? WHERE id = ? RETURNING *")
            .bind(schedule_json).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?;
        updated.ok_or(AppError::NotFound("Center not found".into()))
    }
}
