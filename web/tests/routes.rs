//! Integration tests for the HTTP routes
//!
//! Drives the full router with `oneshot` against the demo ledger; telemetry
//! is delivered inline into a recording sink.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use banking_testing::TestBank;
use banking_web::{AppState, CORRELATION_ID_HEADER, SESSION_HEADER, build_router};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

fn app(bank: &TestBank) -> Router {
    build_router(AppState::new(bank.service.clone()), None)
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(bank: &TestBank, request: Request<Body>) -> Response {
    app(bank).oneshot(request).await.unwrap()
}

fn post_json(uri: &str, session: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(session) = session {
        builder = builder.header(SESSION_HEADER, session);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(session) = session {
        builder = builder.header(SESSION_HEADER, session);
    }
    builder.body(Body::empty()).unwrap()
}

async fn login(bank: &TestBank, username: &str) -> String {
    let response = send(
        bank,
        post_json(
            "/login",
            None,
            &json!({ "username": username, "password": "password123" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["sessionId"]
        .as_str()
        .unwrap()
        .to_string()
}

// ============================================================================
// Public routes
// ============================================================================

#[tokio::test]
async fn test_health_and_banner() {
    let bank = TestBank::new();

    let response = send(&bank, get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"ok");

    let response = send(&bank, get("/", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_every_response_carries_correlation_id() {
    let bank = TestBank::new();
    let supplied = Uuid::new_v4().to_string();

    let request = Request::builder()
        .uri("/balance")
        .header(CORRELATION_ID_HEADER, &supplied)
        .body(Body::empty())
        .unwrap();
    let response = send(&bank, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers()[CORRELATION_ID_HEADER].to_str().unwrap(),
        supplied
    );
    assert_eq!(
        bank.sink.events()[0].correlation_id.as_deref(),
        Some(supplied.as_str())
    );
}

#[tokio::test]
async fn test_static_directory_fallback() {
    let bank = TestBank::new();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>bank</h1>").unwrap();

    let router = build_router(AppState::new(bank.service.clone()), Some(dir.path()));
    let response = router.oneshot(get("/index.html", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_login_returns_session_and_user_without_password() {
    let bank = TestBank::new();
    let response = send(
        &bank,
        post_json(
            "/login",
            None,
            &json!({ "username": "jane_smith", "password": "password123" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(Uuid::parse_str(body["sessionId"].as_str().unwrap()).is_ok());
    assert_eq!(body["user"]["name"], "Jane Smith");
    assert_eq!(body["user"]["accounts"]["checking"]["balance"], 3000.0);
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn test_bad_credentials_are_unauthorized() {
    let bank = TestBank::new();
    let response = send(
        &bank,
        post_json(
            "/login",
            None,
            &json!({ "username": "john_doe", "password": "nope" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    let bank = TestBank::new();
    let cases = [
        get("/balance", None),
        get("/transactions", Some("garbage")),
        get("/balance", Some(&Uuid::new_v4().to_string())),
        post_json("/logout", None, &json!({})),
        post_json("/transfer", None, &json!({ "amount": 1, "toAccount": "savings" })),
    ];

    for request in cases {
        let response = send(&bank, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], "UNAUTHENTICATED");
    }

    assert!(
        bank.sink
            .event_types()
            .iter()
            .all(|event_type| event_type == "session_rejected")
    );
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let bank = TestBank::new();
    let session = login(&bank, "john_doe").await;

    let response = send(&bank, post_json("/logout", Some(&session), &json!({}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);

    let response = send(&bank, get("/balance", Some(&session))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Banking
// ============================================================================

#[tokio::test]
async fn test_transfer_scenario_end_to_end() {
    let bank = TestBank::new();
    let session = login(&bank, "john_doe").await;

    let response = send(
        &bank,
        post_json(
            "/transfer",
            Some(&session),
            &json!({ "amount": 100, "fromAccount": "checking", "toAccount": "savings" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let transfer_correlation = response.headers()[CORRELATION_ID_HEADER]
        .to_str()
        .unwrap()
        .to_string();
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["newBalance"], 4900.0);
    assert_eq!(body["toAccountName"], "High Yield Savings");

    let response = send(&bank, get("/balance?account=savings", Some(&session))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["balance"], 10100.0);
    assert_eq!(body["accountType"], "savings");

    let response = send(&bank, get("/transactions", Some(&session))).await;
    let body = body_json(response).await;
    let records = body["transactions"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["amount"], 100.0);
    assert_eq!(records[0]["from"], "checking");
    assert_eq!(records[0]["to"], "savings");
    assert_eq!(records[0]["correlationId"], transfer_correlation.as_str());
}

#[tokio::test]
async fn test_transfer_validation_errors() {
    let bank = TestBank::new();
    let session = login(&bank, "john_doe").await;

    let cases = [
        (json!({ "amount": 0, "toAccount": "savings" }), "INVALID_AMOUNT"),
        (json!({ "amount": 10, "toAccount": "brokerage" }), "INVALID_DESTINATION_ACCOUNT"),
        (
            json!({ "amount": 10, "fromAccount": "brokerage", "toAccount": "savings" }),
            "INVALID_SOURCE_ACCOUNT",
        ),
        (json!({ "amount": 999_999, "toAccount": "savings" }), "INSUFFICIENT_FUNDS"),
    ];

    for (body, code) in cases {
        let response = send(&bank, post_json("/transfer", Some(&session), &body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = body_json(response).await;
        assert_eq!(error["code"], code);
        assert!(error["message"].as_str().is_some_and(|m| !m.is_empty()));
    }
}

#[tokio::test]
async fn test_balance_defaults_to_checking_and_rejects_unknown() {
    let bank = TestBank::new();
    let session = login(&bank, "jane_smith").await;

    let response = send(&bank, get("/balance", Some(&session))).await;
    let body = body_json(response).await;
    assert_eq!(body["accountType"], "checking");
    assert_eq!(body["balance"], 3000.0);

    let response = send(&bank, get("/balance?account=brokerage", Some(&session))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_ACCOUNT");
}

#[tokio::test]
async fn test_transactions_filters_from_query() {
    let bank = TestBank::new();
    let session = login(&bank, "john_doe").await;

    for (amount, from, to) in [(10, "checking", "savings"), (20, "savings", "checking")] {
        let response = send(
            &bank,
            post_json(
                "/transfer",
                Some(&session),
                &json!({ "amount": amount, "fromAccount": from, "toAccount": to }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Fixed clock stamps every record at 2025-01-01T00:00:00Z.
    let response = send(
        &bank,
        get(
            "/transactions?accountType=savings&startDate=2025-01-01&endDate=2025-01-01",
            Some(&session),
        ),
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["transactions"].as_array().unwrap().len(), 2);

    let response = send(
        &bank,
        get("/transactions?startDate=2025-01-02", Some(&session)),
    )
    .await;
    let body = body_json(response).await;
    assert!(body["transactions"].as_array().unwrap().is_empty());

    let response = send(
        &bank,
        get("/transactions?startDate=whenever", Some(&session)),
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["transactions"].as_array().unwrap().len(), 2);
}
