use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Insufficient credits")]
    InsufficientCredits,
    #[error("Amount mismatch: expected {expected}, got {provided}")]
    AmountMismatch { expected: f64, provided: f64 },
    #[error("Promotion usage limit exceeded")]
    UsageLimitExceeded,
    #[error("Promotion already used")]
    AlreadyUsed,
    #[error("Promotion is not valid at this time")]
    PromotionExpired,
    #[error("Amount is required for this promotion")]
    MissingAmount,
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    // 23505 = PostgreSQL Unique Violation
                    if code == "2067" || code == "23505" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({ "error": "Resource already exists (duplicate entry)" }))
                        ).into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InvalidState(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InsufficientCredits => (StatusCode::PAYMENT_REQUIRED, "Insufficient credits".to_string()),
            AppError::AmountMismatch { expected, provided } => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "Amount mismatch",
                        "expected": expected,
                        "provided": provided,
                    }))
                ).into_response();
            }
            AppError::UsageLimitExceeded => (StatusCode::BAD_REQUEST, "Promotion usage limit exceeded".to_string()),
            AppError::AlreadyUsed => (StatusCode::BAD_REQUEST, "Promotion already used".to_string()),
            AppError::PromotionExpired => (StatusCode::BAD_REQUEST, "Promotion is not valid at this time".to_string()),
            AppError::MissingAmount => (StatusCode::BAD_REQUEST, "Amount is required for this promotion".to_string()),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
