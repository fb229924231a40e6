use crate::domain::models::reservation::Reservation;
use crate::domain::ports::PaymentGateway;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Card payments run through an external checkout service: we create a
/// session and redirect the customer; confirmation arrives asynchronously
/// on the processor's side.
pub struct HttpPaymentGateway {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpPaymentGateway {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }
}

#[derive(Serialize)]
struct CheckoutPayload {
    reference: String,
    amount: f64,
    currency: String,
    description: String,
}

#[derive(Deserialize)]
struct CheckoutResponse {
    redirect_url: String,
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_checkout(&self, reservation: &Reservation, amount: f64) -> Result<String, AppError> {
        let payload = CheckoutPayload {
            reference: reservation.id.clone(),
            amount,
            currency: "credits".to_string(),
            description: format!("Court reservation {}", reservation.id),
        };

        let res = self.client.post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Payment service connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Payment service failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        let body: CheckoutResponse = res.json().await.map_err(|e| {
            let msg = format!("Payment service returned invalid body: {}", e);
            error!("{}", msg);
            AppError::InternalWithMsg(msg)
        })?;

        Ok(body.redirect_url)
    }
}
