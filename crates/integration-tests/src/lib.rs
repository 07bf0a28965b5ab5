//! Integration tests for Tradeyard.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tradeyard-integration-tests
//! ```
//!
//! Nothing external is required. The storefront router is driven in-process
//! with `tower::ServiceExt::oneshot`, and the freight quoting service is
//! replaced by a local axum stub bound to an ephemeral port.
//!
//! # Test Categories
//!
//! - `storefront_api` - JSON API over in-memory storage
//! - `freight_client` - Timeout, failure and cancellation against the stub
//! - `persistence` - Store hydration from files on disk

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;
use tradeyard_storefront::catalog::Catalog;
use tradeyard_storefront::config::{FreightConfig, StorefrontConfig};
use tradeyard_storefront::state::AppState;
use tradeyard_storefront::storage::{MemoryStorage, Storage};
use url::Url;

/// Serve `router` on an ephemeral local port and return the quote endpoint.
pub async fn spawn_stub(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr = listener.local_addr().expect("Stub has no local address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Url::parse(&format!("http://{addr}/quotes")).expect("Invalid stub URL")
}

/// Freight configuration pointing at `endpoint`.
#[must_use]
pub fn freight_config(endpoint: Url, timeout: Duration) -> FreightConfig {
    let mut config = FreightConfig::with_endpoint(endpoint);
    config.timeout = timeout;
    config
}

/// Storefront configuration for tests. Nothing is bound or written to disk.
#[must_use]
pub fn storefront_config(freight: FreightConfig) -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        data_dir: std::env::temp_dir(),
        freight,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Test harness wrapping the full storefront router.
pub struct TestContext {
    pub app: Router,
    pub storage: Arc<dyn Storage>,
}

impl TestContext {
    /// Storefront over fresh in-memory storage.
    #[must_use]
    pub fn new(freight: FreightConfig) -> Self {
        Self::with_storage(freight, Arc::new(MemoryStorage::new()))
    }

    #[must_use]
    pub fn with_storage(freight: FreightConfig, storage: Arc<dyn Storage>) -> Self {
        let catalog = Catalog::seeded().expect("Seeded catalog is invalid");
        let state = AppState::new(storefront_config(freight), catalog, &storage);
        Self {
            app: tradeyard_storefront::app(state),
            storage,
        }
    }

    /// Send a request and return the status with the raw response.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible")
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        json_response(self.request(Method::GET, uri, None).await).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        json_response(self.request(Method::POST, uri, Some(body)).await).await
    }
}

/// Split a response into status and parsed JSON body (`Null` when empty).
pub async fn json_response(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response is not JSON")
    };
    (status, value)
}

/// Endpoint that refuses connections, for tests that never quote.
#[must_use]
pub fn unreachable_freight() -> FreightConfig {
    freight_config(
        Url::parse("http://127.0.0.1:9/quotes").expect("Invalid URL"),
        Duration::from_secs(1),
    )
}
