//! Integration tests for event collector delivery
//!
//! Uses a wiremock collector to check the exact request the sink sends and
//! that collector failures never escape the hub.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use banking_telemetry::{
    Actor, DeliveryOutcome, Dispatch, HecConfig, HecSink, PAYLOAD_CORRELATION_KEY,
    TelemetryError, TelemetryEvent, TelemetryHub, TelemetrySink,
};
use banking_testing::{CapturedLogs, RecordingSink};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COLLECTOR_PATH: &str = "/services/collector/event";

fn fixed_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn event() -> TelemetryEvent {
    TelemetryEvent::new("transfer_success", fixed_time())
        .with_actor(Actor::identified("1", "john_doe", "John Doe"))
        .with_correlation_id("request-correlation")
        .with_field("amount", 100)
}

fn sink_for(server: &MockServer) -> HecSink {
    HecSink::new(
        HecConfig::new(format!("{}{COLLECTOR_PATH}", server.uri()), "secret-token")
            .with_index("banking")
            .with_host("test-host")
            .with_app("banking-app", "test")
            .with_timeout(Duration::from_secs(2)),
    )
    .unwrap()
}

async fn received_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "exactly one POST per event");
    serde_json::from_slice(&requests[0].body).unwrap()
}

#[tokio::test]
async fn test_envelope_posted_with_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COLLECTOR_PATH))
        .and(header("authorization", "Splunk secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"text":"Success","code":0}"#))
        .expect(1)
        .mount(&server)
        .await;

    let sink = sink_for(&server);
    assert!(sink.is_configured());
    assert_eq!(sink.deliver(&event()).await, DeliveryOutcome::Delivered { status: 200 });

    let body = received_body(&server).await;
    assert_eq!(body["host"], "test-host");
    assert_eq!(body["source"], "banking-app");
    assert_eq!(body["sourcetype"], "_json");
    assert_eq!(body["index"], "banking");
    assert_eq!(
        body["time"].as_f64().unwrap(),
        1_735_689_600.0,
        "unix seconds of the event timestamp"
    );

    let inner = &body["event"];
    assert_eq!(inner["event_type"], "transfer_success");
    assert_eq!(inner["user_id"], "1");
    assert_eq!(inner["user_name"], "John Doe");
    assert_eq!(inner["data"]["amount"], 100);
    assert_eq!(inner["app"], "banking-app");
    assert_eq!(inner["environment"], "test");
    assert_eq!(inner["correlation_id"], "request-correlation");
}

#[tokio::test]
async fn test_payload_correlation_id_is_echoed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let event = event().with_field(PAYLOAD_CORRELATION_KEY, "caller-supplied-id");
    sink_for(&server).send(&event).await.unwrap();

    let body = received_body(&server).await;
    assert_eq!(body["event"]["correlation_id"], "caller-supplied-id");
}

#[tokio::test]
async fn test_non_success_status_is_reported_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("invalid token"))
        .expect(1)
        .mount(&server)
        .await;

    let sink = sink_for(&server);
    let result = sink.send(&event()).await;
    assert_eq!(
        result,
        Err(TelemetryError::Rejected {
            status: 403,
            body: "invalid token".to_string()
        })
    );
}

#[tokio::test]
async fn test_collector_failure_does_not_block_other_sinks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let recording = Arc::new(RecordingSink::new());
    let sinks: Vec<Arc<dyn TelemetrySink>> = vec![Arc::new(sink_for(&server)), recording.clone()];
    let hub = TelemetryHub::new(sinks).with_dispatch(Dispatch::Inline);

    hub.emit(event()).await;

    assert_eq!(recording.event_types(), vec!["transfer_success"]);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unconfigured_sink_logs_locally_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let logs = CapturedLogs::new();
    let _guard = tracing::subscriber::set_default(logs.subscriber());

    let sink = HecSink::new(HecConfig::new(format!("{}{COLLECTOR_PATH}", server.uri()), " ")).unwrap();
    assert!(!sink.is_configured());

    sink.send(&TelemetryEvent::new("balance_check", fixed_time()))
        .await
        .unwrap();

    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(logs.contents().contains("balance_check"));
}
