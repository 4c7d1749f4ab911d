//! Order history route handlers.
//!
//! Checkout completion posts the final cart summary here; the handler stamps
//! it with the current time and appends it to the user's history. Orders are
//! immutable afterwards, except for deletion by index.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use juniper_core::order::{Order, OrderHistory};

use crate::db::UserStore;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Response wrapper for every order endpoint.
#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub orders: Vec<Order>,
}

impl OrdersResponse {
    fn new(message: Option<&'static str>, history: OrderHistory) -> Self {
        Self {
            message,
            orders: history.orders().to_vec(),
        }
    }
}

/// Delete order request body.
#[derive(Debug, Deserialize)]
pub struct OrderIndexBody {
    pub index: i64,
}

/// List the user's order history.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<OrdersResponse>> {
    let store = UserStore::new(state.pool());
    let history = store.load_orders(user.id).await?;

    Ok(Json(OrdersResponse::new(None, history)))
}

/// Record a completed checkout as a frozen order snapshot.
///
/// The body carries `{ items, totalAmount, tax, shipping }` from the final
/// cart summary; the order date is stamped server-side.
#[instrument(skip(state, order), fields(user_id = %user.id))]
pub async fn store(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(order): Json<Order>,
) -> Result<Json<OrdersResponse>> {
    validate_order(&order)?;

    let store = UserStore::new(state.pool());
    let mut history = store.load_orders(user.id).await?;

    history.record(order);
    store.save_orders(user.id, &history).await?;

    Ok(Json(OrdersResponse::new(
        Some("Order stored successfully"),
        history,
    )))
}

/// Reject snapshots with negative amounts; the body is untrusted input.
fn validate_order(order: &Order) -> Result<()> {
    use rust_decimal::Decimal;

    if order.total_amount < Decimal::ZERO
        || order.tax < Decimal::ZERO
        || order.shipping < Decimal::ZERO
    {
        return Err(crate::error::AppError::BadRequest(
            "order amounts must not be negative".to_owned(),
        ));
    }
    Ok(())
}

/// Delete the order at `index`.
#[instrument(skip(state), fields(user_id = %user.id, index = body.index))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<OrderIndexBody>,
) -> Result<Json<OrdersResponse>> {
    let store = UserStore::new(state.pool());
    let mut history = store.load_orders(user.id).await?;

    history.delete(body.index)?;
    store.save_orders(user.id, &history).await?;

    Ok(Json(OrdersResponse::new(
        Some("Order deleted successfully"),
        history,
    )))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_order_rejects_negative_amounts() {
        let order: Order = serde_json::from_str(
            r#"{"items":[],"totalAmount":-76.0,"tax":6.0,"shipping":10.0}"#,
        )
        .unwrap();
        assert!(validate_order(&order).is_err());
    }

    #[test]
    fn test_validate_order_accepts_zero_total() {
        let order: Order =
            serde_json::from_str(r#"{"items":[],"totalAmount":0,"tax":0,"shipping":0}"#).unwrap();
        assert!(validate_order(&order).is_ok());
    }
}
