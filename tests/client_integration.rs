//! End-to-end tests for both clients against a local mock of the provider API.

use std::time::Duration;

use shwary::{ErrorKind, PaymentStatus, Shwary, ShwaryAsync, ShwaryConfig, ShwaryError};

mod common;

use common::{
    config_for, payment_body, transaction_body, MockResponse, MockServer, DRC_PHONE, MERCHANT_ID,
    MERCHANT_KEY,
};

#[test]
fn test_blocking_payment_success() {
    let server = MockServer::start(vec![MockResponse::json(200, &payment_body("tx-1", "pending"))]);
    let client = Shwary::new(&config_for(&server)).unwrap();

    let payment = client
        .initiate_payment("DRC", 5000.0, "0972345678", Some("https://shop.example/hooks"))
        .unwrap();

    assert_eq!(payment.id, "tx-1");
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert!(payment.is_sandbox);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/v1/merchants/payment/sandbox/DRC");
    assert_eq!(request.header("x-merchant-id"), Some(MERCHANT_ID));
    assert_eq!(request.header("x-merchant-key"), Some(MERCHANT_KEY));
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert!(request
        .header("user-agent")
        .is_some_and(|ua| ua.starts_with("shwary-rust/")));

    let body = request.json();
    assert_eq!(body["amount"], 5000.0);
    assert_eq!(body["clientPhoneNumber"], DRC_PHONE);
    assert_eq!(body["country"], "DRC");
    assert_eq!(body["callbackUrl"], "https://shop.example/hooks");
}

#[test]
fn test_blocking_production_route() {
    let server = MockServer::start(vec![MockResponse::json(200, &payment_body("tx-2", "pending"))]);
    let config = config_for(&server).with_sandbox(false);
    let client = Shwary::new(&config).unwrap();

    client.initiate_payment("DRC", 2900.0, DRC_PHONE, None).unwrap();

    let request = &server.requests()[0];
    assert_eq!(request.path, "/api/v1/merchants/payment/DRC");
    assert!(request.json().get("callbackUrl").is_none());
}

#[test]
fn test_blocking_retries_503_then_succeeds() {
    let server = MockServer::start(vec![
        MockResponse::text(503, "upstream unavailable"),
        MockResponse::json(200, &transaction_body("tx-3", "completed")),
    ]);
    let client = Shwary::new(&config_for(&server)).unwrap();

    let tx = client.get_transaction("tx-3").unwrap();

    assert_eq!(tx.status, PaymentStatus::Completed);
    assert_eq!(tx.amount.as_u64(), Some(5000));
    assert_eq!(tx.recipient_phone_number.as_deref(), Some(DRC_PHONE));
    assert_eq!(server.request_count(), 2);
    assert!(server
        .requests()
        .iter()
        .all(|r| r.method == "GET" && r.path == "/api/v1/merchants/transactions/tx-3"));
}

#[test]
fn test_blocking_401_is_authentication() {
    let server = MockServer::start(vec![MockResponse::json(
        401,
        r#"{"message":"Invalid merchant credentials"}"#,
    )]);
    let client = Shwary::new(&config_for(&server)).unwrap();

    let err = client.initiate_payment("DRC", 5000.0, DRC_PHONE, None).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.response().unwrap().message, "Invalid merchant credentials");
    assert_eq!(server.request_count(), 1);
}

#[test]
fn test_blocking_local_validation_sends_nothing() {
    let server = MockServer::start(vec![]);
    let client = Shwary::new(&config_for(&server)).unwrap();

    let err = client.initiate_payment("DRC", 100.0, DRC_PHONE, None).unwrap_err();
    assert!(err.is_local());

    let err = client.initiate_payment("KE", 100.0, DRC_PHONE, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = client.get_transaction("").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert_eq!(server.request_count(), 0);
    client.close();
}

#[test]
fn test_blocking_timeout_then_success() {
    let server = MockServer::start(vec![
        MockResponse::json(200, &transaction_body("slow", "pending")).delayed(Duration::from_millis(1_500)),
        MockResponse::json(200, &transaction_body("tx-6", "completed")),
    ]);
    let client = Shwary::new(&config_for(&server)).unwrap();

    let tx = client.get_transaction("tx-6").unwrap();

    assert_eq!(tx.id, "tx-6");
    assert_eq!(tx.status, PaymentStatus::Completed);
    assert_eq!(server.request_count(), 2);
}

#[test]
fn test_invalid_config_is_rejected_at_construction() {
    let config = ShwaryConfig::new("merchant", "");
    assert!(Shwary::new(&config).is_err());
    assert!(ShwaryAsync::new(&config).is_err());
}

#[tokio::test]
async fn test_async_transaction_success() {
    let server = MockServer::start(vec![MockResponse::json(
        200,
        &transaction_body("c0fdfe50-24be-4de1-9f66-84608fd45a5f", "pending"),
    )]);
    let client = ShwaryAsync::new(&config_for(&server)).unwrap();

    let tx = client
        .get_transaction("c0fdfe50-24be-4de1-9f66-84608fd45a5f")
        .await
        .unwrap();

    assert_eq!(tx.id, "c0fdfe50-24be-4de1-9f66-84608fd45a5f");
    assert_eq!(tx.created_at.as_deref(), Some("2026-01-01T10:00:00Z"));
    assert_eq!(
        server.requests()[0].path,
        "/api/v1/merchants/transactions/c0fdfe50-24be-4de1-9f66-84608fd45a5f"
    );
}

#[tokio::test]
async fn test_async_rate_limit_is_retried() {
    let server = MockServer::start(vec![
        MockResponse::json(429, r#"{"message":"Too many requests"}"#).with_header("Retry-After", "0"),
        MockResponse::json(200, &payment_body("tx-4", "pending")),
    ]);
    let client = ShwaryAsync::new(&config_for(&server)).unwrap();

    let payment = client
        .initiate_payment("DRC", 5000.0, DRC_PHONE, None)
        .await
        .unwrap();

    assert_eq!(payment.id, "tx-4");
    assert_eq!(server.request_count(), 2);
}

#[tokio::test]
async fn test_async_400_is_not_retried() {
    let server = MockServer::start(vec![
        MockResponse::json(400, r#"{"message":["clientPhoneNumber must be valid"]}"#),
        MockResponse::json(200, &payment_body("never", "pending")),
    ]);
    let client = ShwaryAsync::new(&config_for(&server)).unwrap();

    let err = client
        .initiate_payment("DRC", 5000.0, DRC_PHONE, None)
        .await
        .unwrap_err();

    match &err {
        ShwaryError::Validation { message, response } => {
            assert_eq!(message, "clientPhoneNumber must be valid");
            assert_eq!(response.as_ref().map(|r| r.status), Some(400));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(server.request_count(), 1);
}

#[tokio::test]
async fn test_async_server_errors_exhaust_attempts() {
    let server = MockServer::start(vec![
        MockResponse::text(500, "boom 1"),
        MockResponse::text(502, "boom 2"),
        MockResponse::text(500, "boom 3"),
        MockResponse::json(200, &payment_body("late", "pending")),
    ]);
    let client = ShwaryAsync::new(&config_for(&server)).unwrap();

    let err = client
        .initiate_payment("DRC", 5000.0, DRC_PHONE, None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.raw_body(), Some("boom 3"));
    assert_eq!(server.request_count(), 3);
}

#[tokio::test]
async fn test_async_timeout_then_success() {
    let server = MockServer::start(vec![
        MockResponse::json(200, &payment_body("slow", "pending")).delayed(Duration::from_millis(1_500)),
        MockResponse::json(200, &payment_body("fast", "pending")),
    ]);
    let client = ShwaryAsync::new(&config_for(&server)).unwrap();

    let payment = client
        .initiate_payment("DRC", 5000.0, DRC_PHONE, None)
        .await
        .unwrap();

    assert_eq!(payment.id, "fast");
    assert_eq!(server.request_count(), 2);
}

#[tokio::test]
async fn test_async_connection_refused_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut config = ShwaryConfig::new(MERCHANT_ID, MERCHANT_KEY)
        .with_base_url(format!("http://{addr}/api/v1/merchants"));
    config.retry.base_delay_ms = 1;
    config.retry.max_delay_ms = 5;
    let client = ShwaryAsync::new(&config).unwrap();

    let err = client.get_transaction("tx-5").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    assert!(matches!(err, ShwaryError::Transport(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_async_clones_run_concurrently() {
    let server = MockServer::start(vec![
        MockResponse::json(200, &transaction_body("tx-a", "completed")),
        MockResponse::json(200, &transaction_body("tx-b", "completed")),
    ]);
    let client = ShwaryAsync::new(&config_for(&server)).unwrap();
    let other = client.clone();

    let (a, b) = tokio::join!(client.get_transaction("tx-a"), other.get_transaction("tx-b"));

    assert!(a.is_ok());
    assert!(b.is_ok());
    assert_eq!(server.request_count(), 2);
}
