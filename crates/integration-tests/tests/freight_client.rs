//! Integration tests for the freight quote client against a local stub.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{Json, Router, http::StatusCode, routing::post};
use serde_json::json;
use tradeyard_core::QuoteStatus;
use tradeyard_integration_tests::{freight_config, spawn_stub};
use tradeyard_storefront::freight::{
    FreightClient, FreightQuoteRequest, QuoteError, QuoteErrorKind, format_quotes,
};

fn request() -> FreightQuoteRequest {
    FreightQuoteRequest {
        origin_postal_code: "60632".to_string(),
        destination_postal_code: "10001".to_string(),
        total_weight_lbs: 90.0,
        items: Vec::new(),
    }
}

fn slow_router(delay: Duration) -> Router {
    Router::new().route(
        "/quotes",
        post(move || async move {
            tokio::time::sleep(delay).await;
            Json(json!([{ "id": "late", "carrier": "Estes", "price": "10.00" }]))
        }),
    )
}

#[tokio::test]
async fn test_quotes_parsed_in_order() {
    let router = Router::new().route(
        "/quotes",
        post(|| async {
            Json(json!([
                { "id": "a", "carrier": "R+L Carriers", "price": "210.00", "estimated_days": 1 },
                { "id": 2, "carrier": "  ", "price": "99.99" }
            ]))
        }),
    );
    let client = FreightClient::new(&freight_config(
        spawn_stub(router).await,
        Duration::from_secs(5),
    ));

    let quotes = client.request_quotes(&request()).await.expect("quotes");
    let options = format_quotes(&quotes);

    assert_eq!(options.len(), 2);
    assert_eq!(options[0].label, "R+L Carriers - $210.00 (1 business day)");
    assert_eq!(options[1].id, "2");
    assert_eq!(options[1].label, "Unknown carrier - $99.99 (N/A)");
}

#[tokio::test]
async fn test_timeout_reports_timeout_kind() {
    let client = FreightClient::new(&freight_config(
        spawn_stub(slow_router(Duration::from_secs(5))).await,
        Duration::from_millis(100),
    ));

    let err = client
        .request_quotes(&request())
        .await
        .expect_err("should time out");

    assert_eq!(err.kind(), QuoteErrorKind::Timeout);
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_internal_server_error_is_request_failure() {
    let router = Router::new().route(
        "/quotes",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "rating engine crashed") }),
    );
    let client = FreightClient::new(&freight_config(
        spawn_stub(router).await,
        Duration::from_secs(5),
    ));

    let err = client
        .request_quotes(&request())
        .await
        .expect_err("should fail");

    assert_eq!(err.kind(), QuoteErrorKind::RequestFailed);
    assert!(!err.is_timeout());
    assert!(matches!(
        err,
        QuoteError::Status { status, .. } if status.as_u16() == 500
    ));
}

#[tokio::test]
async fn test_non_success_status_is_request_failure() {
    let router = Router::new().route(
        "/quotes",
        post(|| async { (StatusCode::BAD_GATEWAY, "upstream carrier unavailable") }),
    );
    let client = FreightClient::new(&freight_config(
        spawn_stub(router).await,
        Duration::from_secs(5),
    ));

    let err = client
        .request_quotes(&request())
        .await
        .expect_err("should fail");

    assert_eq!(err.kind(), QuoteErrorKind::RequestFailed);
    match err {
        QuoteError::Status { status, body } => {
            assert_eq!(status.as_u16(), 502);
            assert_eq!(body, "upstream carrier unavailable");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_loosely_typed_quote_keeps_the_others() {
    let router = Router::new().route(
        "/quotes",
        post(|| async {
            Json(json!([
                { "id": "a", "carrier": "Estes", "price": "125.50", "estimatedDays": 3 },
                { "id": "b", "carrier": "Saia", "price": "N/A", "estimatedDays": "3-5" },
                { "id": "c", "carrier": "ABF", "price": 80, "estimated_days": 2, "estimatedDays": 2 }
            ]))
        }),
    );
    let client = FreightClient::new(&freight_config(
        spawn_stub(router).await,
        Duration::from_secs(5),
    ));

    let quotes = client.request_quotes(&request()).await.expect("quotes");
    let options = format_quotes(&quotes);

    assert_eq!(options.len(), 3);
    assert_eq!(options[0].label, "Estes - $125.50 (3 business days)");
    assert_eq!(options[1].label, "Saia - N/A (N/A)");
    assert_eq!(options[2].label, "ABF - $80.00 (2 business days)");
}

#[tokio::test]
async fn test_malformed_body_is_request_failure() {
    let router = Router::new().route(
        "/quotes",
        post(|| async { Json(json!({ "quotes": "soon" })) }),
    );
    let client = FreightClient::new(&freight_config(
        spawn_stub(router).await,
        Duration::from_secs(5),
    ));

    let err = client
        .request_quotes(&request())
        .await
        .expect_err("should fail");
    assert!(matches!(err, QuoteError::InvalidResponse(_)));
    assert_eq!(err.kind(), QuoteErrorKind::RequestFailed);
}

#[tokio::test]
async fn test_connection_refused_is_request_failure() {
    let client = FreightClient::new(&freight_config(
        url::Url::parse("http://127.0.0.1:9/quotes").expect("url"),
        Duration::from_secs(5),
    ));

    let err = client
        .request_quotes(&request())
        .await
        .expect_err("should fail");
    assert_eq!(err.kind(), QuoteErrorKind::RequestFailed);
}

#[tokio::test]
async fn test_cancel_aborts_in_flight_request() {
    let client = FreightClient::new(&freight_config(
        spawn_stub(slow_router(Duration::from_secs(5))).await,
        Duration::from_secs(30),
    ));

    let task = client.spawn_quote(request());
    tokio::time::sleep(Duration::from_millis(50)).await;
    task.cancel();

    let err = tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("cancelled task settles promptly")
        .expect_err("cancelled");
    assert_eq!(err.kind(), QuoteErrorKind::Cancelled);
}

#[tokio::test]
async fn test_each_attempt_is_independent() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let router = Router::new().route(
        "/quotes",
        post(move || {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    (StatusCode::SERVICE_UNAVAILABLE, Json(json!([])))
                } else {
                    (
                        StatusCode::OK,
                        Json(json!([{ "id": "x", "carrier": "Saia", "price": "55.00" }])),
                    )
                }
            }
        }),
    );
    let client = FreightClient::new(&freight_config(
        spawn_stub(router).await,
        Duration::from_secs(5),
    ));

    let status = match client.request_quotes(&request()).await {
        Ok(_) => QuoteStatus::Success,
        Err(_) => QuoteStatus::Error,
    };
    assert_eq!(status, QuoteStatus::Error);
    assert!(status.is_settled());

    // No automatic retry happened; the second attempt is the caller's
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let quotes = client.spawn_quote(request()).await.expect("second attempt");
    assert_eq!(quotes.len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
