//! Orderbook domain: limit orders and the cumulative depth ladders built
//! from them.

pub mod client;
mod convert;
pub mod depth;
pub mod wire;

pub use depth::aggregate;

use crate::error::SdkError;
use crate::shared::Side;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// One resting order at a consensus price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LimitOrder {
    pub side: Side,
    /// Normalized consensus in `[0, 1]`.
    pub price_level: Decimal,
    pub amount: Decimal,
}

impl LimitOrder {
    pub fn new(side: Side, price_level: Decimal, amount: Decimal) -> Result<Self, SdkError> {
        if price_level < Decimal::ZERO || price_level > Decimal::ONE {
            return Err(SdkError::Validation(format!(
                "price level {} outside [0, 1]",
                price_level
            )));
        }
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(SdkError::Validation(format!("negative amount {}", amount)));
        }
        Ok(Self {
            side,
            price_level,
            amount,
        })
    }
}

/// One aggregated price level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DepthRow {
    pub price_level: Decimal,
    pub amount: Decimal,
    pub cumulative_total: Decimal,
}

/// Rows for one side, highest price first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepthLadder {
    pub side: Side,
    pub rows: Vec<DepthRow>,
}

impl DepthLadder {
    pub fn empty(side: Side) -> Self {
        Self {
            side,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Largest cumulative total on this side; zero when empty.
    pub fn max_total(&self) -> Decimal {
        self.rows
            .iter()
            .map(|r| r.cumulative_total)
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    /// Sum of all amounts on this side.
    pub fn total_amount(&self) -> Decimal {
        self.rows.iter().map(|r| r.amount).sum()
    }

    /// `row`'s cumulative total as a percentage of this side's maximum.
    pub fn depth_pct(&self, row: &DepthRow) -> f64 {
        pct_of(row.cumulative_total, self.max_total())
    }

    pub fn depth_pcts(&self) -> Vec<f64> {
        let max = self.max_total();
        self.rows
            .iter()
            .map(|r| pct_of(r.cumulative_total, max))
            .collect()
    }
}

/// Both sides of a market.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepthLadders {
    pub bids: DepthLadder,
    pub asks: DepthLadder,
}

impl Default for DepthLadders {
    fn default() -> Self {
        Self {
            bids: DepthLadder::empty(Side::Bid),
            asks: DepthLadder::empty(Side::Ask),
        }
    }
}

impl DepthLadders {
    pub fn side(&self, side: Side) -> &DepthLadder {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    /// Shared scale for drawing both sides against each other.
    pub fn max_total(&self) -> Decimal {
        self.bids.max_total().max(self.asks.max_total())
    }

    /// Percentage against the shared scale; zero when both sides are empty.
    pub fn depth_pct(&self, row: &DepthRow) -> f64 {
        pct_of(row.cumulative_total, self.max_total())
    }

    /// Highest bid, where the bid ladder's running total starts.
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.rows.first().map(|r| r.price_level)
    }

    /// Lowest ask, where the ask ladder's running total starts.
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.rows.last().map(|r| r.price_level)
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

fn pct_of(value: Decimal, max: Decimal) -> f64 {
    if max.is_zero() {
        return 0.0;
    }
    ((value / max) * Decimal::ONE_HUNDRED).to_f64().unwrap_or(0.0)
}
