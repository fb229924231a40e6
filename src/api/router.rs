use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{availability, center, court, health, maintenance, payment, promotion, reservation, user, wallet};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Users
        .route("/api/v1/users", post(user::create_user))
        .route("/api/v1/users/{user_id}", get(user::get_user))

        // Centers & schedules
        .route("/api/v1/centers", post(center::create_center).get(center::list_centers))
        .route("/api/v1/centers/{center_id}", get(center::get_center))
        .route("/api/v1/centers/{center_id}/schedule", put(center::update_schedule))

        // Courts
        .route("/api/v1/centers/{center_id}/courts", post(court::create_court).get(court::list_courts))
        .route("/api/v1/courts/{court_id}", get(court::get_court).put(court::update_court))

        // Maintenance
        .route("/api/v1/courts/{court_id}/maintenance", post(maintenance::create_maintenance).get(maintenance::list_maintenance))
        .route("/api/v1/maintenance/{window_id}/cancel", post(maintenance::cancel_maintenance))

        // Availability
        .route("/api/v1/courts/{court_id}/availability", get(availability::get_availability))

        // Reservations & payment
        .route("/api/v1/reservations", post(reservation::create_reservation).get(reservation::list_my_reservations))
        .route("/api/v1/reservations/{reservation_id}", get(reservation::get_reservation))
        .route("/api/v1/reservations/{reservation_id}/pay", post(payment::pay_reservation))
        .route("/api/v1/reservations/{reservation_id}/cancel", post(reservation::cancel_reservation))
        .route("/api/v1/reservations/{reservation_id}/no-show", post(reservation::mark_no_show))

        // Promotions
        .route("/api/v1/promotions", post(promotion::create_promotion))
        .route("/api/v1/promotions/active", get(promotion::list_active_promotions))
        .route("/api/v1/promotions/{promotion_id}/apply", post(promotion::apply_promotion))

        // Wallet
        .route("/api/v1/wallet", get(wallet::get_wallet))
        .route("/api/v1/wallet/ledger", get(wallet::list_ledger))
        .route("/api/v1/wallet/topup", post(wallet::topup))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
