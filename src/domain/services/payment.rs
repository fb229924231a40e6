use std::sync::Arc;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::models::reservation::Reservation;
use crate::domain::models::wallet::NewLedgerEntry;
use crate::domain::ports::{PaymentGateway, PaymentRepository, PromotionRepository, ReservationRepository, WalletRepository};
use crate::domain::services::promotion::discounted_price;
use crate::error::AppError;

pub const AMOUNT_TOLERANCE: f64 = 0.01;
pub const REASON_RESERVATION_PAYMENT: &str = "RESERVATION_PAYMENT";
pub const REASON_REFUND: &str = "REFUND";

pub const METHOD_CREDITS: &str = "CREDITS";
pub const METHOD_CARD: &str = "CARD";
pub const METHOD_FREE: &str = "FREE";

#[derive(Debug, Serialize)]
pub struct PaymentOutcome {
    pub reservation_id: String,
    pub payment_method: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits_used: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_after: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

/// Validates a payment request against the reservation's state and price,
/// then drives the wallet ledger (credits), marks the reservation free, or
/// hands off to the external card processor.
pub struct PaymentProcessor {
    reservations: Arc<dyn ReservationRepository>,
    payments: Arc<dyn PaymentRepository>,
    wallet: Arc<dyn WalletRepository>,
    promotions: Arc<dyn PromotionRepository>,
    gateway: Arc<dyn PaymentGateway>,
}

impl PaymentProcessor {
    pub fn new(
        reservations: Arc<dyn ReservationRepository>,
        payments: Arc<dyn PaymentRepository>,
        wallet: Arc<dyn WalletRepository>,
        promotions: Arc<dyn PromotionRepository>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self { reservations, payments, wallet, promotions, gateway }
    }

    pub async fn process_payment(
        &self,
        reservation_id: &str,
        payment_method: &str,
        amount: f64,
        user_id: &str,
        idempotency_key: &str,
        applied_promotion: Option<&str>,
    ) -> Result<PaymentOutcome, AppError> {
        let reservation = self.reservations.find_by_id(reservation_id).await?
            .ok_or(AppError::NotFound("Reservation not found".into()))?;

        if reservation.user_id != user_id {
            return Err(AppError::Forbidden("Reservation belongs to another user".into()));
        }

        // Retry with the same key replays the original result without a
        // second financial effect.
        if let Some(existing) = self.wallet.find_by_key(idempotency_key).await?
            && existing.user_id == user_id {
            info!("Replaying settled payment for reservation {} (key {})", reservation_id, idempotency_key);
            return Ok(PaymentOutcome {
                reservation_id: reservation.id,
                payment_method: METHOD_CREDITS.to_string(),
                amount: existing.credits,
                credits_used: Some(existing.credits),
                balance_after: Some(existing.balance_after),
                redirect_url: None,
            });
        }
        if reservation.status == "PAID"
            && reservation.payment_method.as_deref() == Some(METHOD_FREE)
            && payment_method == METHOD_FREE {
            return Ok(PaymentOutcome {
                reservation_id: reservation.id,
                payment_method: METHOD_FREE.to_string(),
                amount: 0.0,
                credits_used: None,
                balance_after: None,
                redirect_url: None,
            });
        }

        if reservation.status != "PENDING" || reservation.payment_status == "PAID" {
            return Err(AppError::InvalidState(format!(
                "Reservation cannot be paid in status {}",
                reservation.status
            )));
        }

        let promo_spec = match applied_promotion {
            Some(promo_id) => {
                let promotion = self.promotions.find_by_id(promo_id).await?
                    .ok_or(AppError::NotFound("Promotion not found".into()))?;
                Some(promotion.rewards()?)
            }
            None => None,
        };

        let expected = promo_spec
            .as_ref()
            .and_then(|spec| discounted_price(spec, reservation.total_price))
            .unwrap_or(reservation.total_price);

        match payment_method {
            METHOD_CREDITS => {
                validate_amount(expected, amount)?;
                let entry = NewLedgerEntry::debit(user_id, REASON_RESERVATION_PAYMENT, amount, idempotency_key)
                    .with_metadata(serde_json::json!({ "reservation_id": reservation.id }));
                let (settled, ledger) = self.payments.settle_with_credits(&reservation.id, &entry).await?;
                info!("Reservation {} paid with {} credits", settled.id, ledger.credits);
                Ok(PaymentOutcome {
                    reservation_id: settled.id,
                    payment_method: METHOD_CREDITS.to_string(),
                    amount,
                    credits_used: Some(ledger.credits),
                    balance_after: Some(ledger.balance_after),
                    redirect_url: None,
                })
            }
            METHOD_FREE => {
                if amount.abs() > AMOUNT_TOLERANCE {
                    return Err(AppError::AmountMismatch { expected: 0.0, provided: amount });
                }
                if expected > AMOUNT_TOLERANCE {
                    return Err(AppError::Validation(
                        "Free payment requires a promotion covering the full price".into(),
                    ));
                }
                let settled = self.payments.settle_free(&reservation.id).await?;
                info!("Reservation {} settled as free", settled.id);
                Ok(PaymentOutcome {
                    reservation_id: settled.id,
                    payment_method: METHOD_FREE.to_string(),
                    amount: 0.0,
                    credits_used: None,
                    balance_after: None,
                    redirect_url: None,
                })
            }
            METHOD_CARD => {
                validate_amount(expected, amount)?;
                // The gateway call happens with no transaction open; the
                // reservation stays PENDING until the processor confirms.
                let redirect_url = self.gateway.create_checkout(&reservation, amount).await?;
                info!("Card checkout created for reservation {}", reservation.id);
                Ok(PaymentOutcome {
                    reservation_id: reservation.id,
                    payment_method: METHOD_CARD.to_string(),
                    amount,
                    credits_used: None,
                    balance_after: None,
                    redirect_url: Some(redirect_url),
                })
            }
            other => {
                warn!("Rejected unsupported payment method {}", other);
                Err(AppError::Validation(format!("Unsupported payment method: {}", other)))
            }
        }
    }

    /// Cancels a reservation, refunding credit payments through the
    /// ledger. The refund key is derived from the reservation id, so a
    /// retried cancellation can never refund twice.
    pub async fn cancel_reservation(&self, reservation_id: &str, user_id: &str) -> Result<Reservation, AppError> {
        let reservation = self.reservations.find_by_id(reservation_id).await?
            .ok_or(AppError::NotFound("Reservation not found".into()))?;

        if reservation.user_id != user_id {
            return Err(AppError::Forbidden("Reservation belongs to another user".into()));
        }

        match reservation.status.as_str() {
            "PENDING" => {
                self.reservations.transition_status(&reservation.id, &["PENDING"], "CANCELLED").await
            }
            "PAID" => {
                if reservation.payment_method.as_deref() == Some(METHOD_CREDITS) {
                    let refund = reservation.paid_amount.unwrap_or(reservation.total_price);
                    let key = format!("refund-{}", reservation.id);
                    let entry = NewLedgerEntry::credit(user_id, REASON_REFUND, refund, &key)
                        .with_metadata(serde_json::json!({ "reservation_id": reservation.id }));
                    let (cancelled, ledger) = self.payments.refund_to_credits(&reservation.id, &entry).await?;
                    info!("Reservation {} cancelled, {} credits refunded", cancelled.id, ledger.credits);
                    Ok(cancelled)
                } else {
                    self.reservations.transition_status(&reservation.id, &["PAID"], "CANCELLED").await
                }
            }
            other => Err(AppError::InvalidState(format!(
                "Reservation cannot be cancelled in status {}",
                other
            ))),
        }
    }
}

pub fn validate_amount(expected: f64, provided: f64) -> Result<(), AppError> {
    if (expected - provided).abs() > AMOUNT_TOLERANCE {
        Err(AppError::AmountMismatch { expected, provided })
    } else {
        Ok(())
    }
}
