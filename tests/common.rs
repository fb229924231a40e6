use court_booking_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::repositories::{
        sqlite_center_repo::SqliteCenterRepo,
        sqlite_court_repo::SqliteCourtRepo,
        sqlite_maintenance_repo::SqliteMaintenanceRepo,
        sqlite_payment_repo::SqlitePaymentRepo,
        sqlite_promotion_repo::SqlitePromotionRepo,
        sqlite_reservation_repo::SqliteReservationRepo,
        sqlite_user_repo::SqliteUserRepo,
        sqlite_wallet_repo::SqliteWalletRepo,
    },
    domain::models::reservation::Reservation,
    domain::ports::PaymentGateway,
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

pub struct MockPaymentGateway;

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_checkout(&self, reservation: &Reservation, _amount: f64) -> Result<String, AppError> {
        Ok(format!("https://pay.test/checkout/{}", reservation.id))
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            payment_service_url: "http://localhost".to_string(),
            payment_service_token: "token".to_string(),
            slot_step_minutes: 30,
            pending_ttl_minutes: 15,
        };

        let state = Arc::new(AppState {
            config,
            center_repo: Arc::new(SqliteCenterRepo::new(pool.clone())),
            court_repo: Arc::new(SqliteCourtRepo::new(pool.clone())),
            maintenance_repo: Arc::new(SqliteMaintenanceRepo::new(pool.clone())),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            reservation_repo: Arc::new(SqliteReservationRepo::new(pool.clone())),
            wallet_repo: Arc::new(SqliteWalletRepo::new(pool.clone())),
            payment_repo: Arc::new(SqlitePaymentRepo::new(pool.clone())),
            promotion_repo: Arc::new(SqlitePromotionRepo::new(pool.clone())),
            payment_gateway: Arc::new(MockPaymentGateway),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn request(&self, method: &str, uri: &str, user_id: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user_id) = user_id {
            builder = builder.header("X-User-Id", user_id);
        }
        let request = if let Some(body) = body {
            builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap()
        } else {
            builder.body(Body::empty()).unwrap()
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn create_user(&self, name: &str) -> String {
        let (status, body) = self.request(
            "POST",
            "/api/v1/users",
            None,
            Some(json!({ "name": name, "email": format!("{}@test.com", name) })),
        ).await;
        assert_eq!(status, StatusCode::CREATED, "user setup failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn create_center(&self, schedule: Value) -> String {
        let slug = format!("center-{}", Uuid::new_v4());
        let (status, body) = self.request(
            "POST",
            "/api/v1/centers",
            None,
            Some(json!({ "name": "Test Center", "slug": slug, "timezone": "UTC", "schedule": schedule })),
        ).await;
        assert_eq!(status, StatusCode::CREATED, "center setup failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn create_court(&self, center_id: &str, primary: &str, allowed: &[&str], hourly_rate: f64) -> String {
        let (status, body) = self.request(
            "POST",
            &format!("/api/v1/centers/{}/courts", center_id),
            None,
            Some(json!({
                "name": "Court 1",
                "primary_sport": primary,
                "allowed_sports": allowed,
                "hourly_rate": hourly_rate,
            })),
        ).await;
        assert_eq!(status, StatusCode::CREATED, "court setup failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn topup(&self, user_id: &str, credits: f64) {
        let (status, body) = self.request(
            "POST",
            "/api/v1/wallet/topup",
            Some(user_id),
            Some(json!({ "credits": credits, "idempotency_key": format!("topup-{}", Uuid::new_v4()) })),
        ).await;
        assert_eq!(status, StatusCode::OK, "topup failed: {}", body);
    }

    pub async fn create_reservation(&self, user_id: &str, court_id: &str, sport: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> (StatusCode, Value) {
        self.request(
            "POST",
            "/api/v1/reservations",
            Some(user_id),
            Some(json!({
                "court_id": court_id,
                "sport": sport,
                "start_time": start.to_rfc3339(),
                "end_time": end.to_rfc3339(),
            })),
        ).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

/// Weekly schedule with the same slots every day of the week.
#[allow(dead_code)]
pub fn full_week_schedule(start: &str, end: &str) -> Value {
    let day = json!({ "closed": false, "slots": [{ "start": start, "end": end }] });
    json!({
        "weekly": {
            "monday": day.clone(), "tuesday": day.clone(), "wednesday": day.clone(),
            "thursday": day.clone(), "friday": day.clone(), "saturday": day.clone(),
            "sunday": day,
        }
    })
}

/// A date far enough out that slots are never in the past.
#[allow(dead_code)]
pub fn future_date(days: i64) -> NaiveDate {
    (Utc::now() + Duration::days(days)).date_naive()
}

#[allow(dead_code)]
pub fn at(date: NaiveDate, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(hour, min, 0).unwrap())
}
