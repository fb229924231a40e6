use crate::domain::{
    models::{court::CourtSports, maintenance::MaintenanceWindow, reservation::Reservation},
    ports::ReservationRepository,
    services::conflict::{SlotContext, SlotStatus},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteReservationRepo {
    pool: SqlitePool,
}

impl SqliteReservationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationRepository for SqliteReservationRepo {
    async fn create_if_available(&self, reservation: &Reservation, sports: &CourtSports) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Re-check conflicts against the rows visible to this write
        // transaction; SQLite's single-writer WAL lock serializes racing
        // creations.
        let overlapping = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE court_id = ? AND start_time < ? AND end_time > ? AND status IN ('PENDING', 'PAID', 'IN_PROGRESS')"
        )
            .bind(&reservation.court_id).bind(reservation.end_time).bind(reservation.start_time)
            .fetch_all(&mut *tx).await.map_err(AppError::Database)?;

        let windows = sqlx::query_as::<_, MaintenanceWindow>(
            "SELECT * FROM maintenance_windows WHERE court_id = ? AND status IN ('SCHEDULED', 'IN_PROGRESS') AND starts_at < ?"
        )
            .bind(&reservation.court_id).bind(reservation.end_time)
            .fetch_all(&mut *tx).await.map_err(AppError::Database)?;

        let ctx = SlotContext {
            sports,
            reservations: &overlapping,
            maintenance: &windows,
            requesting_user: None,
            now: Utc::now(),
        };
        let decision = ctx.resolve(reservation.start_time, reservation.end_time, &reservation.sport);
        match decision.status {
            SlotStatus::Available => {}
            SlotStatus::Maintenance => {
                return Err(AppError::Conflict("Slot overlaps a maintenance window".into()));
            }
            SlotStatus::Booked | SlotStatus::UserBooked => {
                return Err(AppError::Conflict(
                    decision.message.unwrap_or_else(|| "Slot is already reserved".to_string()),
                ));
            }
            SlotStatus::Past => {
                return Err(AppError::Validation("Cannot book in the past".into()));
            }
            SlotStatus::Unavailable => {
                return Err(AppError::Validation(
                    decision.message.unwrap_or_else(|| "Slot is unavailable".to_string()),
                ));
            }
        }

        let created = sqlx::query_as::<_, Reservation>(
            "INSERT INTO reservations (id, court_id, user_id, sport, start_time, end_time, status, payment_status, payment_method, total_price, paid_amount, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&reservation.id).bind(&reservation.court_id).bind(&reservation.user_id).bind(&reservation.sport)
            .bind(reservation.start_time).bind(reservation.end_time).bind(&reservation.status).bind(&reservation.payment_status)
            .bind(&reservation.payment_method).bind(reservation.total_price).bind(reservation.paid_amount).bind(reservation.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_blocking_for_range(&self, court_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE court_id = ? AND start_time < ? AND end_time > ? AND status IN ('PENDING', 'PAID', 'IN_PROGRESS')").bind(court_id).bind(end).bind(start).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE user_id = ? ORDER BY start_time DESC").bind(user_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn transition_status(&self, id: &str, from: &[&str], to: &str) -> Result<Reservation, AppError> {
        let current = self.find_by_id(id).await?
            .ok_or(AppError::NotFound("Reservation not found".into()))?;
        if !from.contains(&current.status.as_str()) {
            return Err(AppError::InvalidState(format!(
                "Cannot move reservation from {} to {}", current.status, to
            )));
        }
        let updated = sqlx::query_as::<_, Reservation>("UPDATE reservations SET status = ? WHERE id = ? AND status = ? RETURNING *")
            .bind(to).bind(id).bind(&current.status)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?;
        updated.ok_or(AppError::Conflict("Reservation was modified concurrently".into()))
    }
    async fn expire_stale_pending(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE reservations SET status = 'CANCELLED' WHERE status = 'PENDING' AND payment_status = 'UNPAID' AND created_at < ?").bind(cutoff).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
    async fn advance_lifecycle(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let started = sqlx::query("UPDATE reservations SET status = 'IN_PROGRESS' WHERE status = 'PAID' AND start_time <= ? AND end_time > ?").bind(now).bind(now).execute(&self.pool).await.map_err(AppError::Database)?;
        let finished = sqlx::query("UPDATE reservations SET status = 'COMPLETED' WHERE status = 'IN_PROGRESS' AND end_time <= ?").bind(now).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(started.rows_affected() + finished.rows_affected())
    }
}
