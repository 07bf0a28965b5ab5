//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::freight::{QuoteError, QuoteErrorKind};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Freight quote attempt failed.
    #[error("Freight quote error: {0}")]
    Quote(#[from] QuoteError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Quote(err) => match err.kind() {
                QuoteErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
                QuoteErrorKind::RequestFailed => StatusCode::BAD_GATEWAY,
                QuoteErrorKind::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to show to the client.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Quote(err) => match err.kind() {
                QuoteErrorKind::Timeout => "Freight quote timed out, please try again".to_string(),
                QuoteErrorKind::RequestFailed => "Freight quote service unavailable".to_string(),
                QuoteErrorKind::Cancelled => "Freight quote cancelled".to_string(),
            },
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture upstream failures to Sentry
        if matches!(self, Self::Quote(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();
        let message = self.public_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "101")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product pallet-jack".to_string());
        assert_eq!(err.to_string(), "Not found: product pallet-jack");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Quote(QuoteError::Cancelled)),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(AppError::Quote(QuoteError::Timeout(Duration::from_secs(1)))),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            get_status(AppError::Quote(QuoteError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: String::new(),
            })),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_upstream_details_hidden() {
        let err = AppError::Quote(QuoteError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "stack trace at rater.go:88".to_string(),
        });
        assert_eq!(err.public_message(), "Freight quote service unavailable");
    }
}
