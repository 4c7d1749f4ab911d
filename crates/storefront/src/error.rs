//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`; business errors from `juniper-core` convert into it
//! and map onto the HTTP status codes the frontend expects: `NotFound` kinds
//! become 404, invalid input becomes 400.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use juniper_core::address::AddressError;
use juniper_core::cart::CartError;
use juniper_core::order::OrderError;

use crate::db::RepositoryError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Cart operation rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Address book operation rejected.
    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    /// Order history operation rejected.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// A requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(&'static str),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(RepositoryError::NotFound)
            | Self::Cart(CartError::NotFound(_))
            | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Cart(CartError::InvalidInput(_))
            | Self::Address(AddressError::InvalidIndex(_))
            | Self::Order(OrderError::InvalidIndex(_))
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(RepositoryError::NotFound) => "User not found".to_string(),
            Self::Database(_) => "Internal server error".to_string(),
            Self::Cart(CartError::NotFound(_)) => "Product not found in cart".to_string(),
            Self::NotFound(what) => (*what).to_string(),
            Self::Cart(CartError::InvalidInput(msg)) => msg.clone(),
            Self::Address(AddressError::InvalidIndex(_)) => "Invalid address index".to_string(),
            Self::Order(OrderError::InvalidIndex(_)) => "Invalid order index".to_string(),
            Self::BadRequest(msg) => msg.clone(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl AppError {
    /// Whether this error is the server's fault and worth a Sentry event.
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(RepositoryError::Database(_) | RepositoryError::DataCorruption(_))
        )
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use juniper_core::ProductId;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::Cart(CartError::NotFound(ProductId::from("17")));
        assert_eq!(err.to_string(), "Cart error: product 17 not found in cart");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_missing_cart_line_maps_to_404() {
        assert_eq!(
            get_status(AppError::Cart(CartError::NotFound(ProductId::from("x")))),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_missing_catalog_product_maps_to_404() {
        let err = AppError::NotFound("Product not found");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_missing_user_maps_to_404() {
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_invalid_input_maps_to_400() {
        assert_eq!(
            get_status(AppError::Cart(CartError::InvalidInput("bad".to_owned()))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Address(AddressError::InvalidIndex(-1))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Order(OrderError::InvalidIndex(9))),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_database_failure_maps_to_500() {
        assert_eq!(
            get_status(AppError::Database(RepositoryError::Database(
                sqlx::Error::PoolClosed
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::DataCorruption(
                "bad cart".to_owned()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
