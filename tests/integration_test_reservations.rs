mod common;

use axum::http::StatusCode;
use common::{at, full_week_schedule, future_date, TestApp};
use serde_json::json;
use uuid::Uuid;

async fn multiuse_court(app: &TestApp) -> String {
    let center = app.create_center(full_week_schedule("08:00", "22:00")).await;
    app.create_court(&center, "Fútbol", &["Voleibol", "Básquet"], 30.0).await
}

#[tokio::test]
async fn create_pending_reservation() {
    let app = TestApp::new().await;
    let court = multiuse_court(&app).await;
    let user = app.create_user("alice").await;
    let date = future_date(7);

    let (status, body) = app.create_reservation(&user, &court, "Fútbol", at(date, 10, 0), at(date, 11, 0)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "PENDING");
    assert_eq!(body["payment_status"], "UNPAID");
    assert_eq!(body["total_price"], json!(30.0));
    assert_eq!(body["sport"], "Fútbol");
}

#[tokio::test]
async fn paid_primary_blocks_overlapping_secondary() {
    // A paid Fútbol reservation 10:00-11:00 exists; Voleibol 10:30-11:30
    // on the same court must be rejected.
    let app = TestApp::new().await;
    let court = multiuse_court(&app).await;
    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;
    let date = future_date(7);

    let (status, reservation) = app.create_reservation(&alice, &court, "Fútbol", at(date, 10, 0), at(date, 11, 0)).await;
    assert_eq!(status, StatusCode::CREATED);

    app.topup(&alice, 100.0).await;
    let (status, _) = app.request(
        "POST",
        &format!("/api/v1/reservations/{}/pay", reservation["id"].as_str().unwrap()),
        Some(&alice),
        Some(json!({ "payment_method": "CREDITS", "amount": 30.0, "idempotency_key": Uuid::new_v4().to_string() })),
    ).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.create_reservation(&bob, &court, "Voleibol", at(date, 10, 30), at(date, 11, 30)).await;
    assert_eq!(status, StatusCode::CONFLICT, "expected 409, got {}", body);
}

#[tokio::test]
async fn secondary_sports_share_the_same_slot() {
    // No Fútbol reservation: Voleibol and Básquet 10:00-11:00 both succeed.
    let app = TestApp::new().await;
    let court = multiuse_court(&app).await;
    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;
    let date = future_date(7);

    let (status, _) = app.create_reservation(&alice, &court, "Voleibol", at(date, 10, 0), at(date, 11, 0)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.create_reservation(&bob, &court, "Básquet", at(date, 10, 0), at(date, 11, 0)).await;
    assert_eq!(status, StatusCode::CREATED, "secondary pair rejected: {}", body);
}

#[tokio::test]
async fn same_secondary_sport_can_share_too() {
    let app = TestApp::new().await;
    let court = multiuse_court(&app).await;
    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;
    let date = future_date(7);

    let (status, _) = app.create_reservation(&alice, &court, "Voleibol", at(date, 10, 0), at(date, 11, 0)).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app.create_reservation(&bob, &court, "Voleibol", at(date, 10, 0), at(date, 11, 0)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn primary_request_cannot_share_with_pending_secondary() {
    let app = TestApp::new().await;
    let court = multiuse_court(&app).await;
    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;
    let date = future_date(7);

    let (status, _) = app.create_reservation(&alice, &court, "Voleibol", at(date, 10, 0), at(date, 11, 0)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.create_reservation(&bob, &court, "Fútbol", at(date, 10, 30), at(date, 11, 30)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn unsupported_sport_is_rejected() {
    let app = TestApp::new().await;
    let court = multiuse_court(&app).await;
    let user = app.create_user("alice").await;
    let date = future_date(7);

    let (status, _) = app.create_reservation(&user, &court, "Tenis", at(date, 10, 0), at(date, 11, 0)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn booking_outside_opening_hours_conflicts() {
    let app = TestApp::new().await;
    let center = app.create_center(full_week_schedule("09:00", "12:00")).await;
    let court = app.create_court(&center, "Fútbol", &[], 30.0).await;
    let user = app.create_user("alice").await;
    let date = future_date(7);

    let (status, _) = app.create_reservation(&user, &court, "Fútbol", at(date, 14, 0), at(date, 15, 0)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Crossing the closing boundary is also out.
    let (status, _) = app.create_reservation(&user, &court, "Fútbol", at(date, 11, 30), at(date, 12, 30)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn booking_in_the_past_is_rejected() {
    let app = TestApp::new().await;
    let court = multiuse_court(&app).await;
    let user = app.create_user("alice").await;
    let date = (chrono::Utc::now() - chrono::Duration::days(7)).date_naive();

    let (status, _) = app.create_reservation(&user, &court, "Fútbol", at(date, 10, 0), at(date, 11, 0)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn maintenance_window_rejects_creation() {
    let app = TestApp::new().await;
    let court = multiuse_court(&app).await;
    let user = app.create_user("alice").await;
    let date = future_date(7);

    app.request(
        "POST",
        &format!("/api/v1/courts/{}/maintenance", court),
        None,
        Some(json!({ "starts_at": at(date, 10, 0).to_rfc3339(), "duration_min": 120 })),
    ).await;

    let (status, _) = app.create_reservation(&user, &court, "Voleibol", at(date, 11, 0), at(date, 12, 0)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn owner_can_fetch_their_reservation_others_cannot() {
    let app = TestApp::new().await;
    let court = multiuse_court(&app).await;
    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;
    let date = future_date(7);

    let (_, created) = app.create_reservation(&alice, &court, "Fútbol", at(date, 10, 0), at(date, 11, 0)).await;
    let id = created["id"].as_str().unwrap();

    let (status, _) = app.request("GET", &format!("/api/v1/reservations/{}", id), Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.request("GET", &format!("/api/v1/reservations/{}", id), Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn anonymous_creation_is_unauthorized() {
    let app = TestApp::new().await;
    let court = multiuse_court(&app).await;
    let date = future_date(7);

    let (status, _) = app.request(
        "POST",
        "/api/v1/reservations",
        None,
        Some(json!({
            "court_id": court,
            "sport": "Fútbol",
            "start_time": at(date, 10, 0).to_rfc3339(),
            "end_time": at(date, 11, 0).to_rfc3339(),
        })),
    ).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
