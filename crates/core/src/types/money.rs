//! Monetary helpers shared by the cart ledger and order snapshots.
//!
//! All money is represented as [`rust_decimal::Decimal`] in the currency's
//! standard unit (dollars, not cents). Aggregates are rounded to two decimal
//! places, half away from zero, at each aggregation step; callers must round
//! each component before summing rather than summing raw values and rounding
//! once, so that recomputing a summary always reproduces the displayed values.

use rust_decimal::{Decimal, RoundingStrategy};

/// The only currency carried in this version. Stored on each cart line and
/// order item but never used in arithmetic.
pub const CURRENCY_USD: &str = "usd";

/// Round a monetary amount to two decimal places, half away from zero.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
