use crate::domain::{models::wallet::{round2, LedgerEntry, NewLedgerEntry, ENTRY_DEBIT}, ports::WalletRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgConnection, PgPool};

pub struct PostgresWalletRepo {
    pool: PgPool,
}

impl PostgresWalletRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Postgres twin of the SQLite ledger choke point. The user row is locked
/// with FOR UPDATE so concurrent entries for one user serialize on the
/// balance read.
pub(crate) async fn apply_entry_tx(
    tx: &mut PgConnection,
    entry: &NewLedgerEntry,
) -> Result<(LedgerEntry, bool), AppError> {
    let existing = sqlx::query_as::<_, LedgerEntry>("SELECT * FROM wallet_ledger WHERE idempotency_key = $1")
        .bind(&entry.idempotency_key)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Database)?;
    if let Some(existing) = existing {
        return Ok((existing, true));
    }

    if entry.credits <= 0.0 {
        return Err(AppError::Validation("Ledger credits must be a positive amount".into()));
    }

    let balance: Option<f64> = sqlx::query_scalar("SELECT credits_balance FROM users WHERE id = $1 FOR UPDATE")
        .bind(&entry.user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Database)?;
    let balance = balance.ok_or(AppError::NotFound("User not found".into()))?;

    let new_balance = if entry.entry_type == ENTRY_DEBIT {
        if entry.credits > balance {
            return Err(AppError::InsufficientCredits);
        }
        round2(balance - entry.credits)
    } else {
        round2(balance + entry.credits)
    };

    sqlx::query("UPDATE users SET credits_balance = $1 WHERE id = $2")
        .bind(new_balance)
        .bind(&entry.user_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

    let created = sqlx::query_as::<_, LedgerEntry>(
        "INSERT INTO wallet_ledger (id, user_id, entry_type, reason, credits, balance_after, idempotency_key, metadata_json, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING *"
    )
        .bind(&entry.id).bind(&entry.user_id).bind(&entry.entry_type).bind(&entry.reason)
        .bind(entry.credits).bind(new_balance).bind(&entry.idempotency_key).bind(&entry.metadata_json)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

    Ok((created, false))
}

#[async_trait]
impl WalletRepository for PostgresWalletRepo {
    async fn apply_entry(&self, entry: &NewLedgerEntry) -> Result<LedgerEntry, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let (created, _) = apply_entry_tx(&mut tx, entry).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }
    async fn find_by_key(&self, idempotency_key: &str) -> Result<Option<LedgerEntry>, AppError> {
        sqlx::query_as::<_, LedgerEntry>("SELECT * FROM wallet_ledger WHERE idempotency_key = $1").bind(idempotency_key).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_entries(&self, user_id: &str, limit: i64, offset: i64) -> Result<Vec<LedgerEntry>, AppError> {
        sqlx::query_as::<_, LedgerEntry>("SELECT * FROM wallet_ledger WHERE user_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3").bind(user_id).bind(limit).bind(offset).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn count_entries(&self, user_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM wallet_ledger WHERE user_id = $1").bind(user_id).fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
