//! Freight quote client.
//!
//! # Architecture
//!
//! - One `POST` per quote attempt; no retry, the caller decides whether to
//!   try again
//! - Each attempt owns its own timeout (default 180 seconds)
//! - [`FreightClient::spawn_quote`] returns a [`QuoteTask`] future that can be
//!   cancelled explicitly; dropping it cancels as well
//!
//! # Example
//!
//! ```rust,ignore
//! use tradeyard_storefront::freight::{FreightClient, FreightQuoteRequest, format_quotes};
//!
//! let client = FreightClient::new(&config.freight);
//! let request = FreightQuoteRequest::from_cart(&session.cart, "60632", "10001");
//!
//! let task = client.spawn_quote(request);
//! // task.cancel() aborts the request if the shopper navigates away
//! let options = format_quotes(&task.await?);
//! ```

mod types;

pub use types::*;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::instrument;
use url::Url;

use crate::config::FreightConfig;

/// Errors that can occur when requesting freight quotes.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// No response arrived within the configured window.
    #[error("Freight quote timed out after {} seconds", .0.as_secs_f64())]
    Timeout(Duration),

    /// Connection or transport failure.
    #[error("Freight quote request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Freight quote service returned HTTP {status}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body was not a list of quotes.
    #[error("Invalid freight quote response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    /// The attempt was cancelled before it settled.
    #[error("Freight quote request cancelled")]
    Cancelled,

    /// The task running the attempt panicked.
    #[error("Freight quote task failed: {0}")]
    TaskFailed(String),
}

/// Coarse classification of a [`QuoteError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteErrorKind {
    Timeout,
    RequestFailed,
    Cancelled,
}

impl QuoteError {
    #[must_use]
    pub const fn kind(&self) -> QuoteErrorKind {
        match self {
            Self::Timeout(_) => QuoteErrorKind::Timeout,
            Self::Cancelled => QuoteErrorKind::Cancelled,
            Self::Network(_) | Self::Status { .. } | Self::InvalidResponse(_) | Self::TaskFailed(_) => {
                QuoteErrorKind::RequestFailed
            }
        }
    }

    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

// =============================================================================
// FreightClient
// =============================================================================

/// Client for the external freight quoting service.
#[derive(Clone)]
pub struct FreightClient {
    inner: Arc<FreightClientInner>,
}

struct FreightClientInner {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
    api_key: Option<SecretString>,
}

impl FreightClient {
    /// Create a new freight quote client.
    #[must_use]
    pub fn new(config: &FreightConfig) -> Self {
        Self {
            inner: Arc::new(FreightClientInner {
                client: reqwest::Client::new(),
                endpoint: config.endpoint.clone(),
                timeout: config.timeout,
                api_key: config.api_key.clone(),
            }),
        }
    }

    /// Configured per-attempt timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    /// Request quotes once, waiting at most the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::Timeout`] if no response arrives in time, and a
    /// request-failure variant for transport errors, non-2xx statuses, or
    /// unparseable bodies.
    #[instrument(skip(self, request), fields(
        destination = %request.destination_postal_code,
        lines = request.items.len(),
    ))]
    pub async fn request_quotes(
        &self,
        request: &FreightQuoteRequest,
    ) -> Result<Vec<FreightQuote>, QuoteError> {
        let timeout = self.inner.timeout;

        if let Ok(result) = tokio::time::timeout(timeout, self.send(request)).await {
            result
        } else {
            tracing::warn!(
                timeout_secs = timeout.as_secs_f64(),
                "Freight quote request timed out"
            );
            Err(QuoteError::Timeout(timeout))
        }
    }

    /// Start a quote attempt in the background.
    ///
    /// Await the returned task for the result, or call
    /// [`QuoteTask::cancel`] to abort the in-flight request.
    #[must_use]
    pub fn spawn_quote(&self, request: FreightQuoteRequest) -> QuoteTask {
        let client = self.clone();
        let handle = tokio::spawn(async move { client.request_quotes(&request).await });
        QuoteTask { handle }
    }

    async fn send(&self, request: &FreightQuoteRequest) -> Result<Vec<FreightQuote>, QuoteError> {
        let mut builder = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .json(request);
        if let Some(api_key) = &self.inner.api_key {
            builder = builder.bearer_auth(api_key.expose_secret());
        }

        let response = builder.send().await?;
        let status = response.status();

        // Body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Freight quote service returned non-success status"
            );
            return Err(QuoteError::Status {
                status,
                body: response_text.chars().take(200).collect(),
            });
        }

        let quotes: Vec<FreightQuote> = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse freight quote response"
            );
            QuoteError::InvalidResponse(e)
        })?;

        tracing::debug!(quotes = quotes.len(), "Freight quotes received");
        Ok(quotes)
    }
}

// =============================================================================
// QuoteTask
// =============================================================================

/// A quote attempt running on the runtime.
///
/// Resolves to the attempt's result, or [`QuoteError::Cancelled`] after
/// [`cancel`](Self::cancel). Dropping the task also aborts the request.
pub struct QuoteTask {
    handle: JoinHandle<Result<Vec<FreightQuote>, QuoteError>>,
}

impl QuoteTask {
    /// Abort the in-flight request. No-op if the attempt already settled.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Future for QuoteTask {
    type Output = Result<Vec<FreightQuote>, QuoteError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle).poll(cx).map(|joined| match joined {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(QuoteError::Cancelled),
            Err(e) => Err(QuoteError::TaskFailed(e.to_string())),
        })
    }
}

impl Drop for QuoteTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            QuoteError::Timeout(Duration::from_secs(180)).kind(),
            QuoteErrorKind::Timeout
        );
        assert_eq!(
            QuoteError::Status {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: String::new(),
            }
            .kind(),
            QuoteErrorKind::RequestFailed
        );
        assert_eq!(QuoteError::Cancelled.kind(), QuoteErrorKind::Cancelled);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            QuoteError::Timeout(Duration::from_secs(180)).to_string(),
            "Freight quote timed out after 180 seconds"
        );
        assert_eq!(
            QuoteError::Status {
                status: reqwest::StatusCode::BAD_GATEWAY,
                body: String::new(),
            }
            .to_string(),
            "Freight quote service returned HTTP 502 Bad Gateway"
        );
    }
}
