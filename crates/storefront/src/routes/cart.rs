//! Cart route handlers.
//!
//! Each handler is a thin adapter: authenticate, load the persisted cart,
//! invoke the ledger in `juniper_core::cart`, persist the result, and return
//! the recomputed summary. All cart arithmetic lives in the ledger; nothing
//! here touches quantities or prices directly.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use juniper_core::ProductId;
use juniper_core::cart::{CartSummary, NewLineItem};

use crate::db::UserStore;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Response wrapper for every cart endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub cart_summary: CartSummary,
}

/// Add to cart request body.
///
/// `price` is the unit price the client is currently displaying; the ledger
/// extends it by quantity (and re-extends an existing line with it).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartBody {
    pub product_id: ProductId,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    pub price: Decimal,
    pub quantity: i64,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartBody {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartBody {
    pub product_id: ProductId,
}

/// Fetch the user's cart summary.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CartResponse>> {
    let store = UserStore::new(state.pool());
    let cart = store.load_cart(user.id).await?;

    Ok(Json(CartResponse {
        message: None,
        cart_summary: cart.summarize(),
    }))
}

/// Add an item to the cart, or increment an existing line.
#[instrument(skip(state, body), fields(user_id = %user.id, product_id = %body.product_id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddToCartBody>,
) -> Result<Json<CartResponse>> {
    let store = UserStore::new(state.pool());
    let mut cart = store.load_cart(user.id).await?;

    let message = if cart.contains(&body.product_id) {
        "Item quantity updated in cart"
    } else {
        "Item added to cart"
    };

    let summary = cart.add_or_increment(NewLineItem {
        product_id: body.product_id,
        title: body.title,
        image: body.image,
        unit_price: body.price,
        quantity: body.quantity,
    })?;
    store.save_cart(user.id, &cart).await?;

    Ok(Json(CartResponse {
        message: Some(message),
        cart_summary: summary,
    }))
}

/// Set the quantity of an existing cart line.
///
/// A requested quantity of zero or less is clamped to 1 by the ledger rather
/// than rejected.
#[instrument(skip(state, body), fields(user_id = %user.id, product_id = %body.product_id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<UpdateCartBody>,
) -> Result<Json<CartResponse>> {
    let store = UserStore::new(state.pool());
    let mut cart = store.load_cart(user.id).await?;

    let summary = cart.set_quantity(&body.product_id, body.quantity)?;
    store.save_cart(user.id, &cart).await?;

    Ok(Json(CartResponse {
        message: Some("Cart updated successfully"),
        cart_summary: summary,
    }))
}

/// Remove a single line from the cart.
#[instrument(skip(state, body), fields(user_id = %user.id, product_id = %body.product_id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<RemoveFromCartBody>,
) -> Result<Json<CartResponse>> {
    let store = UserStore::new(state.pool());
    let mut cart = store.load_cart(user.id).await?;

    let summary = cart.remove(&body.product_id)?;
    store.save_cart(user.id, &cart).await?;

    Ok(Json(CartResponse {
        message: Some("Item removed from cart"),
        cart_summary: summary,
    }))
}

/// Empty the whole cart.
#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CartResponse>> {
    let store = UserStore::new(state.pool());
    let mut cart = store.load_cart(user.id).await?;

    let summary = cart.clear();
    store.save_cart(user.id, &cart).await?;

    Ok(Json(CartResponse {
        message: Some("Cart cleared successfully"),
        cart_summary: summary,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_add_body_accepts_numeric_and_string_product_ids() {
        // The catalog page posts the raw numeric ID; older clients send it
        // as a string. Both must deserialize and address the same line.
        let numeric: AddToCartBody = serde_json::from_str(
            r#"{"productId":17,"title":"Mug","price":20.0,"quantity":3,"image":"m.jpg"}"#,
        )
        .unwrap();
        let string: AddToCartBody = serde_json::from_str(
            r#"{"productId":"17","title":"Mug","price":20.0,"quantity":3,"image":"m.jpg"}"#,
        )
        .unwrap();
        assert_eq!(numeric.product_id, ProductId::from("17"));
        assert_eq!(numeric.product_id, string.product_id);
        assert_eq!(numeric.quantity, 3);
    }

    #[test]
    fn test_add_body_missing_required_field_is_rejected() {
        let result: std::result::Result<AddToCartBody, _> =
            serde_json::from_str(r#"{"title":"Mug","price":20.0,"quantity":3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_cart_response_omits_message_when_absent() {
        let response = CartResponse {
            message: None,
            cart_summary: juniper_core::cart::Cart::new().summarize(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("message").is_none());
        assert!(json.get("cartSummary").is_some());
    }
}
