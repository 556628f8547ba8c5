//! Money formatting helpers over decimal arithmetic.
//!
//! Catalog prices and cart totals are plain [`Decimal`] amounts in USD.
//! Arithmetic stays exact (no float rounding in totals); formatting rounds
//! to cents for display only.

use rust_decimal::Decimal;

/// Format a decimal amount as a USD price string (e.g., `"$34.00"`).
#[must_use]
pub fn format_usd(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}
