mod common;

use axum::http::StatusCode;
use common::{at, full_week_schedule, future_date, TestApp};
use serde_json::{json, Value};

async fn setup(app: &TestApp) -> (String, String) {
    let center = app.create_center(full_week_schedule("08:00", "22:00")).await;
    let court = app.create_court(&center, "Fútbol", &[], 30.0).await;
    let user = app.create_user("alice").await;
    (court, user)
}

async fn paid_reservation(app: &TestApp, user: &str, court: &str) -> Value {
    let date = future_date(7);
    let (status, reservation) = app.create_reservation(user, court, "Fútbol", at(date, 10, 0), at(date, 11, 0)).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app.request(
        "POST",
        &format!("/api/v1/reservations/{}/pay", reservation["id"].as_str().unwrap()),
        Some(user),
        Some(json!({ "payment_method": "CREDITS", "amount": 30.0, "idempotency_key": "pay-1" })),
    ).await;
    assert_eq!(status, StatusCode::OK);
    reservation
}

#[tokio::test]
async fn pending_reservation_cancels_without_refund() {
    let app = TestApp::new().await;
    let (court, user) = setup(&app).await;
    let date = future_date(7);

    let (_, reservation) = app.create_reservation(&user, &court, "Fútbol", at(date, 10, 0), at(date, 11, 0)).await;
    let id = reservation["id"].as_str().unwrap();

    let (status, body) = app.request("POST", &format!("/api/v1/reservations/{}/cancel", id), Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "CANCELLED");

    let (_, ledger) = app.request("GET", "/api/v1/wallet/ledger", Some(&user), None).await;
    assert_eq!(ledger["total"], json!(0));
}

#[tokio::test]
async fn cancelling_a_credit_payment_refunds_through_the_ledger() {
    let app = TestApp::new().await;
    let (court, user) = setup(&app).await;
    app.topup(&user, 100.0).await;
    let reservation = paid_reservation(&app, &user, &court).await;
    let id = reservation["id"].as_str().unwrap();

    let (status, body) = app.request("POST", &format!("/api/v1/reservations/{}/cancel", id), Some(&user), None).await;
    assert_eq!(status, StatusCode::OK, "cancel failed: {}", body);
    assert_eq!(body["status"], "CANCELLED");
    assert_eq!(body["payment_status"], "REFUNDED");

    let (_, wallet) = app.request("GET", "/api/v1/wallet", Some(&user), None).await;
    assert_eq!(wallet["credits_balance"], json!(100.0));

    let (_, ledger) = app.request("GET", "/api/v1/wallet/ledger", Some(&user), None).await;
    // Top-up, payment debit, refund credit.
    assert_eq!(ledger["total"], json!(3));
    assert_eq!(ledger["entries"][0]["reason"], "REFUND");
    assert_eq!(ledger["entries"][0]["entry_type"], "CREDIT");
}

#[tokio::test]
async fn cancelled_reservation_cannot_cancel_again() {
    let app = TestApp::new().await;
    let (court, user) = setup(&app).await;
    app.topup(&user, 100.0).await;
    let reservation = paid_reservation(&app, &user, &court).await;
    let id = reservation["id"].as_str().unwrap();

    let (status, _) = app.request("POST", &format!("/api/v1/reservations/{}/cancel", id), Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.request("POST", &format!("/api/v1/reservations/{}/cancel", id), Some(&user), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Still exactly one refund on the books.
    let (_, wallet) = app.request("GET", "/api/v1/wallet", Some(&user), None).await;
    assert_eq!(wallet["credits_balance"], json!(100.0));
}

#[tokio::test]
async fn cancellation_frees_the_slot() {
    let app = TestApp::new().await;
    let (court, user) = setup(&app).await;
    let bob = app.create_user("bob").await;
    let date = future_date(7);

    let (_, reservation) = app.create_reservation(&user, &court, "Fútbol", at(date, 10, 0), at(date, 11, 0)).await;
    let id = reservation["id"].as_str().unwrap();

    let (status, _) = app.create_reservation(&bob, &court, "Fútbol", at(date, 10, 0), at(date, 11, 0)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    app.request("POST", &format!("/api/v1/reservations/{}/cancel", id), Some(&user), None).await;

    let (status, _) = app.create_reservation(&bob, &court, "Fútbol", at(date, 10, 0), at(date, 11, 0)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn only_the_owner_can_cancel() {
    let app = TestApp::new().await;
    let (court, user) = setup(&app).await;
    let mallory = app.create_user("mallory").await;
    let date = future_date(7);

    let (_, reservation) = app.create_reservation(&user, &court, "Fútbol", at(date, 10, 0), at(date, 11, 0)).await;
    let id = reservation["id"].as_str().unwrap();

    let (status, _) = app.request("POST", &format!("/api/v1/reservations/{}/cancel", id), Some(&mallory), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn paid_reservation_can_be_marked_no_show() {
    let app = TestApp::new().await;
    let (court, user) = setup(&app).await;
    app.topup(&user, 100.0).await;
    let reservation = paid_reservation(&app, &user, &court).await;
    let id = reservation["id"].as_str().unwrap();

    let (status, body) = app.request("POST", &format!("/api/v1/reservations/{}/no-show", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "NO_SHOW");

    // No refund for a no-show.
    let (_, wallet) = app.request("GET", "/api/v1/wallet", Some(&user), None).await;
    assert_eq!(wallet["credits_balance"], json!(70.0));
}

#[tokio::test]
async fn pending_reservation_cannot_be_no_show() {
    let app = TestApp::new().await;
    let (court, user) = setup(&app).await;
    let date = future_date(7);

    let (_, reservation) = app.create_reservation(&user, &court, "Fútbol", at(date, 10, 0), at(date, 11, 0)).await;
    let id = reservation["id"].as_str().unwrap();

    let (status, _) = app.request("POST", &format!("/api/v1/reservations/{}/no-show", id), None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
