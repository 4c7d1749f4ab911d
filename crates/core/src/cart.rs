//! The cart ledger: line pricing and whole-cart aggregation.
//!
//! A cart is an ordered list of line items, unique by product ID. Each line
//! stores its extended price (`price` on the wire) rather than a per-unit
//! price; the stored extended price is the authoritative value the
//! aggregation step consumes, and the effective unit price is only
//! recoverable by dividing it by the current quantity.
//!
//! Two behaviors here are deliberate and load-bearing:
//!
//! - **Latest price wins on increment.** Adding a product that is already in
//!   the cart re-extends the whole line using the unit price supplied by the
//!   incoming request, not the price the line was first inserted at. If the
//!   displayed catalog price changed between requests the line silently
//!   adopts the new price. Callers rely on this; do not "fix" it here.
//! - **Quantity updates clamp, adds reject.** `set_quantity` silently turns a
//!   zero or negative request into 1, while `add_or_increment` rejects a
//!   non-positive quantity as invalid input.
//!
//! All aggregates are rounded to two decimal places half away from zero, and
//! each aggregate is rounded before the next one is computed from it
//! (round-then-sum), so a recomputed summary matches displayed values exactly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CURRENCY_USD, ProductId, round_cents};

/// Sales tax applied to the rounded subtotal (10%).
fn tax_rate() -> Decimal {
    Decimal::new(10, 2)
}

/// Flat shipping charge for any non-empty cart.
fn flat_shipping() -> Decimal {
    Decimal::new(1000, 2)
}

/// Errors produced by cart operations.
///
/// Both variants are local, recoverable conditions surfaced synchronously to
/// the caller. Cart mutations are not safe to blindly retry (`add_or_increment`
/// accumulates), so callers must not treat these as transient.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Quantity or price outside the allowed range, or a missing field.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The operation targeted a product that is not in the cart.
    #[error("product {0} not found in cart")]
    NotFound(ProductId),
}

/// A single cart line.
///
/// `line_total` is stored, not derived on read: it equals
/// `unit price × quantity` as of the last write. The per-unit price is not
/// persisted separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Opaque catalog identifier, unique within one cart.
    pub product_id: ProductId,
    /// Display title, opaque to the ledger.
    pub title: String,
    /// Display image URL, opaque to the ledger.
    #[serde(default)]
    pub image: Option<String>,
    /// Units of this product in the cart, always at least 1.
    pub quantity: u32,
    /// Extended price for the line: unit price × quantity at last write.
    ///
    /// Named `price` on the wire; the frontend reads `item.price` off cart
    /// and order lines even though the value is the extended total.
    #[serde(rename = "price")]
    pub line_total: Decimal,
    /// Carried but never used in arithmetic; fixed at "usd".
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    CURRENCY_USD.to_owned()
}

/// Input for [`Cart::add_or_increment`].
///
/// `unit_price` is the catalog price displayed to the client at the time of
/// the request; `quantity` is signed because request bodies are untrusted and
/// a non-positive value must be rejected rather than coerced.
#[derive(Debug, Clone)]
pub struct NewLineItem {
    pub product_id: ProductId,
    pub title: String,
    pub image: Option<String>,
    pub unit_price: Decimal,
    pub quantity: i64,
}

/// An ordered cart, unique by product ID.
///
/// Created empty when a user account is created and mutated in place by the
/// operations below. Persistence is the caller's concern; the cart itself
/// performs no I/O.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

/// Aggregates computed from a cart. Never persisted; recomputed per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    /// The cart's line items, unmodified.
    pub items: Vec<LineItem>,
    /// Sum of all line totals, rounded to cents.
    pub sub_total: Decimal,
    /// 10% of the rounded subtotal, rounded to cents.
    pub tax: Decimal,
    /// Flat 10.00 for a non-empty cart, 0 otherwise.
    pub shipping: Decimal,
    /// Subtotal + tax + shipping, rounded to cents.
    pub total_amount: Decimal,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The cart's line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has a line for `product_id`.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.position(product_id).is_some()
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product_id == *product_id)
    }

    /// Add a product to the cart, or increment its existing line.
    ///
    /// If the product is already present, the existing line's quantity grows
    /// by `quantity` and the line total is re-extended from the unit price
    /// supplied in *this* call (latest price wins). Otherwise a new line is
    /// inserted with `line_total = unit_price × quantity`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidInput`] if `quantity < 1` or
    /// `unit_price < 0`.
    pub fn add_or_increment(&mut self, new_item: NewLineItem) -> Result<CartSummary, CartError> {
        if new_item.quantity < 1 {
            return Err(CartError::InvalidInput(format!(
                "quantity must be at least 1, got {}",
                new_item.quantity
            )));
        }
        if new_item.unit_price < Decimal::ZERO {
            return Err(CartError::InvalidInput(format!(
                "unit price must not be negative, got {}",
                new_item.unit_price
            )));
        }
        let quantity = u32::try_from(new_item.quantity)
            .map_err(|_| CartError::InvalidInput("quantity out of range".to_owned()))?;

        if let Some(index) = self.position(&new_item.product_id) {
            if let Some(line) = self.items.get_mut(index) {
                line.quantity = line.quantity.saturating_add(quantity);
                // Re-extend from the incoming unit price, not the price the
                // line was inserted at.
                line.line_total = new_item.unit_price * Decimal::from(line.quantity);
            }
        } else {
            self.items.push(LineItem {
                product_id: new_item.product_id,
                title: new_item.title,
                image: new_item.image,
                quantity,
                line_total: new_item.unit_price * Decimal::from(quantity),
                currency: default_currency(),
            });
        }

        Ok(self.summarize())
    }

    /// Set the quantity of an existing line.
    ///
    /// A requested quantity of zero or less is silently clamped to 1. The
    /// line's effective unit price is reconstructed as
    /// `line_total / current_quantity` and the line total re-extended from it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotFound`] if the product is not in the cart, and
    /// [`CartError::InvalidInput`] if the stored line has zero quantity and
    /// therefore no recoverable unit price.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        requested_quantity: i64,
    ) -> Result<CartSummary, CartError> {
        let index = self
            .position(product_id)
            .ok_or_else(|| CartError::NotFound(product_id.clone()))?;

        let new_quantity = u32::try_from(requested_quantity.max(1)).unwrap_or(u32::MAX);

        if let Some(line) = self.items.get_mut(index) {
            // A persisted line can carry quantity 0 (written by an earlier
            // backend); the unit price is then unrecoverable by division.
            if line.quantity == 0 {
                return Err(CartError::InvalidInput(format!(
                    "stored line for product {} has zero quantity",
                    line.product_id
                )));
            }
            let unit_price = line.line_total / Decimal::from(line.quantity);
            line.quantity = new_quantity;
            line.line_total = unit_price * Decimal::from(new_quantity);
        }

        Ok(self.summarize())
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotFound`] if the product is not in the cart; the
    /// cart is left unchanged.
    pub fn remove(&mut self, product_id: &ProductId) -> Result<CartSummary, CartError> {
        let index = self
            .position(product_id)
            .ok_or_else(|| CartError::NotFound(product_id.clone()))?;
        self.items.remove(index);
        Ok(self.summarize())
    }

    /// Unconditionally empty the cart.
    pub fn clear(&mut self) -> CartSummary {
        self.items.clear();
        self.summarize()
    }

    /// Compute the cart's aggregates without mutating it.
    ///
    /// Idempotent: calling this twice on an unchanged cart yields identical
    /// output, including rounding. Each aggregate is rounded before the next
    /// is computed from it.
    #[must_use]
    pub fn summarize(&self) -> CartSummary {
        let sub_total = round_cents(self.items.iter().map(|item| item.line_total).sum());
        let tax = round_cents(sub_total * tax_rate());
        let shipping = if self.items.is_empty() {
            Decimal::ZERO
        } else {
            flat_shipping()
        };
        let total_amount = round_cents(sub_total + tax + shipping);

        CartSummary {
            items: self.items.clone(),
            sub_total,
            tax,
            shipping,
            total_amount,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn new_item(product_id: &str, unit_price: &str, quantity: i64) -> NewLineItem {
        NewLineItem {
            product_id: ProductId::from(product_id),
            title: format!("Product {product_id}"),
            image: Some(format!("https://cdn.example.com/{product_id}.jpg")),
            unit_price: dec(unit_price),
            quantity,
        }
    }

    #[test]
    fn test_add_on_empty_cart_creates_single_line() {
        let mut cart = Cart::new();
        let summary = cart.add_or_increment(new_item("17", "20.00", 3)).unwrap();

        assert_eq!(cart.len(), 1);
        let line = cart.items().first().unwrap();
        assert_eq!(line.quantity, 3);
        assert_eq!(line.line_total, dec("60.00"));
        assert_eq!(line.currency, "usd");
        assert_eq!(summary.sub_total, dec("60.00"));
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add_or_increment(new_item("17", "20.00", 0)),
            Err(CartError::InvalidInput(_))
        ));
        assert!(matches!(
            cart.add_or_increment(new_item("17", "20.00", -2)),
            Err(CartError::InvalidInput(_))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_rejects_negative_unit_price() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add_or_increment(new_item("17", "-0.01", 1)),
            Err(CartError::InvalidInput(_))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_accepts_zero_unit_price() {
        let mut cart = Cart::new();
        let summary = cart.add_or_increment(new_item("free", "0", 2)).unwrap();
        assert_eq!(summary.sub_total, dec("0.00"));
        // Non-empty cart still pays flat shipping.
        assert_eq!(summary.shipping, dec("10.00"));
    }

    #[test]
    fn test_repeated_add_accumulates_quantity_and_latest_price_wins() {
        // Documented fragility: the second call's unit price re-extends the
        // whole line. 2 + 1 units at the latest price of 25.00 is 75.00, not
        // 40.00 + 25.00 = 65.00.
        let mut cart = Cart::new();
        cart.add_or_increment(new_item("17", "20.00", 2)).unwrap();
        let summary = cart.add_or_increment(new_item("17", "25.00", 1)).unwrap();

        assert_eq!(cart.len(), 1);
        let line = cart.items().first().unwrap();
        assert_eq!(line.quantity, 3);
        assert_eq!(line.line_total, dec("75.00"));
        assert_eq!(summary.sub_total, dec("75.00"));
    }

    #[test]
    fn test_add_two_distinct_products_keeps_order() {
        let mut cart = Cart::new();
        cart.add_or_increment(new_item("a", "15.00", 1)).unwrap();
        cart.add_or_increment(new_item("b", "45.00", 1)).unwrap();

        let ids: Vec<&str> = cart.items().iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_set_quantity_clamps_to_one() {
        let mut cart = Cart::new();
        cart.add_or_increment(new_item("17", "20.00", 3)).unwrap();

        for requested in [0, -1, -100] {
            cart.set_quantity(&ProductId::from("17"), requested).unwrap();
            assert_eq!(cart.items().first().unwrap().quantity, 1);
            assert_eq!(cart.items().first().unwrap().line_total, dec("20.00"));
        }
    }

    #[test]
    fn test_set_quantity_reconstructs_unit_price_by_division() {
        let mut cart = Cart::new();
        cart.add_or_increment(new_item("17", "20.00", 3)).unwrap();

        let summary = cart.set_quantity(&ProductId::from("17"), 5).unwrap();
        let line = cart.items().first().unwrap();
        assert_eq!(line.quantity, 5);
        assert_eq!(line.line_total, dec("100.00"));
        assert_eq!(summary.sub_total, dec("100.00"));
    }

    #[test]
    fn test_set_quantity_unknown_product_is_not_found() {
        let mut cart = Cart::new();
        cart.add_or_increment(new_item("17", "20.00", 1)).unwrap();

        let err = cart.set_quantity(&ProductId::from("99"), 2).unwrap_err();
        assert_eq!(err, CartError::NotFound(ProductId::from("99")));
    }

    #[test]
    fn test_remove_unknown_product_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        cart.add_or_increment(new_item("17", "20.00", 2)).unwrap();
        let before = cart.clone();

        let err = cart.remove(&ProductId::from("99")).unwrap_err();
        assert_eq!(err, CartError::NotFound(ProductId::from("99")));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_existing_product() {
        let mut cart = Cart::new();
        cart.add_or_increment(new_item("a", "15.00", 1)).unwrap();
        cart.add_or_increment(new_item("b", "45.00", 1)).unwrap();

        let summary = cart.remove(&ProductId::from("a")).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(summary.sub_total, dec("45.00"));
    }

    #[test]
    fn test_summarize_empty_cart_is_all_zero() {
        let summary = Cart::new().summarize();
        assert_eq!(summary.sub_total, Decimal::ZERO);
        assert_eq!(summary.tax, Decimal::ZERO);
        assert_eq!(summary.shipping, Decimal::ZERO);
        assert_eq!(summary.total_amount, Decimal::ZERO);
        assert!(summary.items.is_empty());
    }

    #[test]
    fn test_summarize_concrete_single_line() {
        let mut cart = Cart::new();
        cart.add_or_increment(new_item("17", "20.00", 3)).unwrap();

        let summary = cart.summarize();
        assert_eq!(summary.sub_total, dec("60.00"));
        assert_eq!(summary.tax, dec("6.00"));
        assert_eq!(summary.shipping, dec("10.00"));
        assert_eq!(summary.total_amount, dec("76.00"));
    }

    #[test]
    fn test_summarize_two_lines_matches_single_line_totals() {
        let mut cart = Cart::new();
        cart.add_or_increment(new_item("a", "15.00", 1)).unwrap();
        cart.add_or_increment(new_item("b", "45.00", 1)).unwrap();

        let summary = cart.summarize();
        assert_eq!(summary.sub_total, dec("60.00"));
        assert_eq!(summary.tax, dec("6.00"));
        assert_eq!(summary.shipping, dec("10.00"));
        assert_eq!(summary.total_amount, dec("76.00"));
    }

    #[test]
    fn test_summarize_rounds_each_aggregate_before_the_next() {
        // 0.335 × 3 = 1.005 raw; the subtotal rounds up to 1.01 first, and
        // tax is computed from the rounded subtotal.
        let mut cart = Cart::new();
        cart.add_or_increment(new_item("17", "0.335", 3)).unwrap();

        let summary = cart.summarize();
        assert_eq!(summary.sub_total, dec("1.01"));
        assert_eq!(summary.tax, dec("0.10"));
        assert_eq!(summary.total_amount, dec("11.11"));
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let mut cart = Cart::new();
        cart.add_or_increment(new_item("17", "19.99", 7)).unwrap();

        let first = cart.summarize();
        let second = cart.summarize();
        assert_eq!(first, second);
        // Bit-identical on the wire too, not merely value-equal.
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_clear_then_summarize_is_all_zero() {
        let mut cart = Cart::new();
        cart.add_or_increment(new_item("17", "20.00", 3)).unwrap();
        cart.add_or_increment(new_item("18", "5.50", 2)).unwrap();

        let summary = cart.clear();
        assert!(cart.is_empty());
        assert_eq!(summary.sub_total, Decimal::ZERO);
        assert_eq!(summary.tax, Decimal::ZERO);
        assert_eq!(summary.shipping, Decimal::ZERO);
        assert_eq!(summary.total_amount, Decimal::ZERO);
    }

    #[test]
    fn test_line_total_invariant_after_every_mutation() {
        // The stored extended price must equal effective unit price ×
        // quantity after each step; the multiplier is never applied to an
        // already-extended total.
        let mut cart = Cart::new();
        cart.add_or_increment(new_item("17", "12.50", 2)).unwrap();
        assert_eq!(cart.items().first().unwrap().line_total, dec("25.00"));

        cart.set_quantity(&ProductId::from("17"), 4).unwrap();
        assert_eq!(cart.items().first().unwrap().line_total, dec("50.00"));

        cart.add_or_increment(new_item("17", "12.50", 1)).unwrap();
        assert_eq!(cart.items().first().unwrap().line_total, dec("62.50"));
    }

    #[test]
    fn test_summary_wire_shape_is_camel_case() {
        let mut cart = Cart::new();
        cart.add_or_increment(new_item("17", "20.00", 3)).unwrap();

        let json = serde_json::to_value(cart.summarize()).unwrap();
        assert!(json.get("subTotal").is_some());
        assert!(json.get("totalAmount").is_some());
        let line = json.get("items").unwrap().get(0).unwrap();
        assert!(line.get("productId").is_some());
        // The extended total travels as `price`; the Rust field name never
        // reaches the wire.
        assert_eq!(line.get("price").unwrap(), 60.0);
        assert!(line.get("lineTotal").is_none());
        assert_eq!(line.get("currency").unwrap(), "usd");
    }

    #[test]
    fn test_line_item_deserializes_from_frontend_wire_shape() {
        // Cart and order lines echo back from the client exactly as served:
        // numeric productId, extended total under `price`.
        let line: LineItem = serde_json::from_str(
            r#"{"productId":17,"title":"Mug","price":60.0,"quantity":3,"image":"m.jpg"}"#,
        )
        .unwrap();
        assert_eq!(line.product_id, ProductId::from("17"));
        assert_eq!(line.line_total, dec("60"));
        assert_eq!(line.currency, "usd");
    }

    #[test]
    fn test_set_quantity_on_zero_quantity_stored_line_is_rejected() {
        // quantity 0 can only arrive from an old persisted document, never
        // from the operations here; the update must fail cleanly, not divide
        // by zero.
        let mut cart: Cart = serde_json::from_str(
            r#"[{"productId":"17","title":"Mug","price":0.0,"quantity":0}]"#,
        )
        .unwrap();

        let err = cart.set_quantity(&ProductId::from("17"), 2).unwrap_err();
        assert!(matches!(err, CartError::InvalidInput(_)));
        assert_eq!(cart.items().first().unwrap().quantity, 0);
    }

    #[test]
    fn test_cart_round_trips_through_persistence_format() {
        let mut cart = Cart::new();
        cart.add_or_increment(new_item("17", "20.00", 3)).unwrap();

        let stored = serde_json::to_string(&cart).unwrap();
        let loaded: Cart = serde_json::from_str(&stored).unwrap();
        assert_eq!(loaded, cart);
    }
}
