//! Price-level and ledger amount helpers.
//!
//! Consensus prices are normalized to `[0, 1]`. Ledger amounts arrive as
//! integer base units and are scaled down by the token's decimals.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Number of decimal places a price level is bucketed to.
pub const PRICE_DECIMALS: u32 = 3;

/// Round a price level to the display bucket (3 dp, half away from zero).
pub fn round_price_level(price: Decimal) -> Decimal {
    price.round_dp_with_strategy(PRICE_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert an integer ledger amount (e.g. e8s) into a `Decimal`.
///
/// Returns `None` when the amount does not fit the 96-bit mantissa.
pub fn nat_to_decimal(amount: u128, decimals: u32) -> Option<Decimal> {
    let mantissa = i128::try_from(amount).ok()?;
    Decimal::try_from_i128_with_scale(mantissa, decimals).ok()
}
