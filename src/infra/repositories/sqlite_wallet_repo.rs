use crate::domain::{models::wallet::{round2, LedgerEntry, NewLedgerEntry, ENTRY_DEBIT}, ports::WalletRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

pub struct SqliteWalletRepo {
    pool: SqlitePool,
}

impl SqliteWalletRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Applies one ledger entry against an open transaction. Every credit and
/// debit path (top-up, payment, refund, promotion) funnels through here so
/// the balance write and the ledger append always commit together.
///
/// Returns the entry plus a flag telling the caller whether the key was
/// replayed (entry already existed, nothing re-applied).
pub(crate) async fn apply_entry_tx(
    tx: &mut SqliteConnection,
    entry: &NewLedgerEntry,
) -> Result<(LedgerEntry, bool), AppError> {
    let existing = sqlx::query_as::<_, LedgerEntry>("SELECT * FROM wallet_ledger WHERE idempotency_key = ?")
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

    let balance: Option<f64> = sqlx::query_scalar("SELECT credits_balance FROM users WHERE id = ?")
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

    sqlx::query("UPDATE users SET credits_balance = ? WHERE id = ?")
        .bind(new_balance)
        .bind(&entry.user_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

    let created = sqlx::query_as::<_, LedgerEntry>(
        "INSERT INTO wallet_ledger (id, user_id, entry_type, reason, credits, balance_after, idempotency_key, metadata_json, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
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
impl WalletRepository for SqliteWalletRepo {
    async fn apply_entry(&self, entry: &NewLedgerEntry) -> Result<LedgerEntry, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let (created, _) = apply_entry_tx(&mut tx, entry).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }
    async fn find_by_key(&self, idempotency_key: &str) -> Result<Option<LedgerEntry>, AppError> {
        sqlx::query_as::<_, LedgerEntry>("SELECT * FROM wallet_ledger WHERE idempotency_key = ?").bind(idempotency_key).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_entries(&self, user_id: &str, limit: i64, offset: i64) -> Result<Vec<LedgerEntry>, AppError> {
        sqlx::query_as::<_, LedgerEntry>("SELECT * FROM wallet_ledger WHERE user_id = ? ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?").bind(user_id).bind(limit).bind(offset).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn count_entries(&self, user_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM wallet_ledger WHERE user_id = ?").bind(user_id).fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
