//! Frozen order snapshots and per-user order history.
//!
//! An order is created once at successful checkout completion and is
//! immutable afterwards; the only permitted mutation of the history is
//! deletion by index.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{CartSummary, LineItem};

/// Errors produced by order history operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// The requested index does not address an order in the history.
    #[error("invalid order index: {0}")]
    InvalidIndex(i64),
}

/// A frozen snapshot of a completed checkout.
///
/// The amounts are copied from the cart summary at checkout time; they are
/// never recomputed from `items` afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub items: Vec<LineItem>,
    pub total_amount: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
}

impl Order {
    /// Freeze a cart summary into an order dated now.
    #[must_use]
    pub fn from_summary(summary: CartSummary) -> Self {
        Self {
            items: summary.items,
            total_amount: summary.total_amount,
            tax: summary.tax,
            shipping: summary.shipping,
            date: Utc::now(),
        }
    }
}

/// A user's order history, newest last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderHistory {
    orders: Vec<Order>,
}

impl OrderHistory {
    /// The recorded orders, in recording order.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Append a completed order.
    pub fn record(&mut self, order: Order) {
        self.orders.push(order);
    }

    /// Delete the order at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::InvalidIndex`] if `index` is negative or past the
    /// end of the history.
    pub fn delete(&mut self, index: i64) -> Result<(), OrderError> {
        let idx = usize::try_from(index).map_err(|_| OrderError::InvalidIndex(index))?;
        if idx >= self.orders.len() {
            return Err(OrderError::InvalidIndex(index));
        }
        self.orders.remove(idx);
        Ok(())
    }
}
