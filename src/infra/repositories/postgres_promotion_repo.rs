use crate::domain::{
    models::{promotion::{Promotion, PromotionApplication}, wallet::{LedgerEntry, NewLedgerEntry}},
    ports::PromotionRepository,
};
use crate::error::AppError;
use crate::infra::repositories::postgres_wallet_repo::apply_entry_tx;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresPromotionRepo {
    pool: PgPool,
}

impl PostgresPromotionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PromotionRepository for PostgresPromotionRepo {
    async fn create(&self, promotion: &Promotion) -> Result<Promotion, AppError> {
        sqlx::query_as::<_, Promotion>(
            "INSERT INTO promotions (id, code, promo_kind, status, valid_from, valid_to, usage_limit, usage_count, rewards_json, conditions_json, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING *"
        )
            .bind(&promotion.id).bind(&promotion.code).bind(&promotion.promo_kind).bind(&promotion.status)
            .bind(promotion.valid_from).bind(promotion.valid_to).bind(promotion.usage_limit).bind(promotion.usage_count)
            .bind(&promotion.rewards_json).bind(&promotion.conditions_json).bind(promotion.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Promotion>, AppError> {
        sqlx::query_as::<_, Promotion>("SELECT * FROM promotions WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_active(&self, now: DateTime<Utc>) -> Result<Vec<Promotion>, AppError> {
        sqlx::query_as::<_, Promotion>("SELECT * FROM promotions WHERE status = 'ACTIVE' AND valid_from <= $1 AND (valid_to IS NULL OR valid_to >= $2) ORDER BY created_at DESC").bind(now).bind(now).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn count_applications(&self, promotion_id: &str, user_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM promotion_applications WHERE promotion_id = $1 AND user_id = $2").bind(promotion_id).bind(user_id).fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn apply(&self, application: &PromotionApplication, entry: &NewLedgerEntry, one_time: bool) -> Result<(PromotionApplication, LedgerEntry), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        if one_time {
            let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM promotion_applications WHERE promotion_id = $1 AND user_id = $2")
                .bind(&application.promotion_id).bind(&application.user_id)
                .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
            if existing > 0 {
                return Err(AppError::AlreadyUsed);
            }
        }

        let bumped = sqlx::query("UPDATE promotions SET usage_count = usage_count + 1 WHERE id = $1 AND status = 'ACTIVE' AND (usage_limit IS NULL OR usage_count < usage_limit)")
            .bind(&application.promotion_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        if bumped.rows_affected() == 0 {
            return Err(AppError::UsageLimitExceeded);
        }

        let created = sqlx::query_as::<_, PromotionApplication>(
            "INSERT INTO promotion_applications (id, promotion_id, user_id, credits_awarded, metadata_json, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *"
        )
            .bind(&application.id).bind(&application.promotion_id).bind(&application.user_id)
            .bind(application.credits_awarded).bind(&application.metadata_json).bind(application.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        let (ledger, _) = apply_entry_tx(&mut tx, entry).await?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok((created, ledger))
    }
}
