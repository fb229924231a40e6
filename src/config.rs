use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub payment_service_url: String,
    pub payment_service_token: String,
    pub slot_step_minutes: u16,
    pub pending_ttl_minutes: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            payment_service_url: env::var("PAYMENT_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8100/api/v1/checkout".to_string()),
            payment_service_token: env::var("PAYMENT_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            slot_step_minutes: env::var("SLOT_STEP_MINUTES").unwrap_or_else(|_| "30".to_string()).parse().expect("SLOT_STEP_MINUTES must be a number"),
            pending_ttl_minutes: env::var("PENDING_TTL_MINUTES").unwrap_or_else(|_| "15".to_string()).parse().expect("PENDING_TTL_MINUTES must be a number"),
        }
    }
}
