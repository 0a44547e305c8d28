//! Wire → domain conversion for limit orders.

use super::wire::LimitOrderEntry;
use super::LimitOrder;
use crate::error::SdkError;
use crate::shared::nat_to_decimal;

impl LimitOrderEntry {
    /// Scale the ledger amount by `decimals` and validate the price range.
    pub fn to_order(&self, decimals: u32) -> Result<LimitOrder, SdkError> {
        let amount = nat_to_decimal(self.amount, decimals).ok_or_else(|| {
            SdkError::Validation(format!("amount {} out of range", self.amount))
        })?;
        LimitOrder::new(self.side, self.consensus, amount)
    }
}

/// Convert a whole response, failing on the first bad entry.
pub(crate) fn to_orders(
    entries: &[LimitOrderEntry],
    decimals: u32,
) -> Result<Vec<LimitOrder>, SdkError> {
    entries.iter().map(|e| e.to_order(decimals)).collect()
}
