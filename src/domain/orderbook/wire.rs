//! Wire types for limit-order queries.

use crate::shared::serde_util::nat_string;
use crate::shared::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default ledger token decimals (e8s).
pub const DEFAULT_TOKEN_DECIMALS: u32 = 8;

/// A resting order as returned by `get_limit_orders`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LimitOrderEntry {
    pub side: Side,
    /// Consensus price level, `[0, 1]`.
    pub consensus: Decimal,
    /// Ledger base units.
    #[serde(with = "nat_string")]
    pub amount: u128,
    #[serde(default)]
    pub owner: Option<String>,
}
