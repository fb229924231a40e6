use crate::domain::{
    models::{reservation::Reservation, wallet::{LedgerEntry, NewLedgerEntry}},
    ports::PaymentRepository,
};
use crate::error::AppError;
use crate::infra::repositories::sqlite_wallet_repo::apply_entry_tx;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqlitePaymentRepo {
    pool: SqlitePool,
}

impl SqlitePaymentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for SqlitePaymentRepo {
    async fn settle_with_credits(&self, reservation_id: &str, entry: &NewLedgerEntry) -> Result<(Reservation, LedgerEntry), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let (ledger, replayed) = apply_entry_tx(&mut tx, entry).await?;

        let settled = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = 'PAID', payment_status = 'PAID', payment_method = 'CREDITS', paid_amount = ? WHERE id = ? AND status = 'PENDING' RETURNING *"
        )
            .bind(ledger.credits).bind(reservation_id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;

        let reservation = match settled {
            Some(r) => r,
            // The entry was a key replay and the reservation is already
            // settled; surface the original result.
            None if replayed => {
                sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = ?")
                    .bind(reservation_id)
                    .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
                    .ok_or(AppError::NotFound("Reservation not found".into()))?
            }
            None => {
                return Err(AppError::InvalidState("Reservation is no longer payable".into()));
            }
        };

        tx.commit().await.map_err(AppError::Database)?;
        Ok((reservation, ledger))
    }
    async fn settle_free(&self, reservation_id: &str) -> Result<Reservation, AppError> {
        let settled = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = 'PAID', payment_status = 'PAID', payment_method = 'FREE', paid_amount = 0 WHERE id = ? AND status = 'PENDING' RETURNING *"
        )
            .bind(reservation_id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?;
        settled.ok_or(AppError::InvalidState("Reservation is no longer payable".into()))
    }
    async fn refund_to_credits(&self, reservation_id: &str, entry: &NewLedgerEntry) -> Result<(Reservation, LedgerEntry), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let (ledger, replayed) = apply_entry_tx(&mut tx, entry).await?;

        let cancelled = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = 'CANCELLED', payment_status = 'REFUNDED' WHERE id = ? AND status = 'PAID' RETURNING *"
        )
            .bind(reservation_id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;

        let reservation = match cancelled {
            Some(r) => r,
            None if replayed => {
                sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = ?")
                    .bind(reservation_id)
                    .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
                    .ok_or(AppError::NotFound("Reservation not found".into()))?
            }
            None => {
                return Err(AppError::InvalidState("Reservation is not refundable".into()));
            }
        };

        tx.commit().await.map_err(AppError::Database)?;
        Ok((reservation, ledger))
    }
}
