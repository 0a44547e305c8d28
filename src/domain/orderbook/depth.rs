//! Depth aggregation: pure, synchronous, recomputed from the full order list.

use super::{DepthLadder, DepthLadders, DepthRow, LimitOrder};
use crate::shared::{round_price_level, Side};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Build both depth ladders from a flat order list.
///
/// Prices are bucketed to 3 dp and amounts at the same bucket are summed.
/// Both ladders list rows highest price first. The bid running total starts
/// at the highest bid and grows downward; the ask running total starts at
/// the lowest ask and grows upward.
pub fn aggregate(orders: &[LimitOrder]) -> DepthLadders {
    let mut bids: BTreeMap<Decimal, Decimal> = BTreeMap::new();
    let mut asks: BTreeMap<Decimal, Decimal> = BTreeMap::new();

    for order in orders {
        let book = match order.side {
            Side::Bid => &mut bids,
            Side::Ask => &mut asks,
        };
        *book
            .entry(round_price_level(order.price_level))
            .or_insert(Decimal::ZERO) += order.amount;
    }

    DepthLadders {
        bids: DepthLadder {
            side: Side::Bid,
            rows: accumulate(bids.into_iter().rev()),
        },
        asks: DepthLadder {
            side: Side::Ask,
            rows: {
                let mut rows = accumulate(asks.into_iter());
                rows.reverse();
                rows
            },
        },
    }
}

fn accumulate(levels: impl Iterator<Item = (Decimal, Decimal)>) -> Vec<DepthRow> {
    let mut total = Decimal::ZERO;
    levels
        .map(|(price_level, amount)| {
            total += amount;
            DepthRow {
                price_level,
                amount,
                cumulative_total: total,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn order(side: Side, price: &str, amount: &str) -> LimitOrder {
        LimitOrder {
            side,
            price_level: d(price),
            amount: d(amount),
        }
    }

    fn rows(ladder: &DepthLadder) -> Vec<(Decimal, Decimal, Decimal)> {
        ladder
            .rows
            .iter()
            .map(|r| (r.price_level, r.amount, r.cumulative_total))
            .collect()
    }

    #[test]
    fn test_aggregate_both_sides() {
        let orders = vec![
            order(Side::Bid, "0.80", "10"),
            order(Side::Ask, "0.10", "2"),
            order(Side::Bid, "0.80", "5"),
            order(Side::Ask, "0.30", "8"),
            order(Side::Bid, "0.60", "20"),
        ];
        let ladders = aggregate(&orders);

        assert_eq!(
            rows(&ladders.bids),
            vec![(d("0.8"), d("15"), d("15")), (d("0.6"), d("20"), d("35"))]
        );
        assert_eq!(
            rows(&ladders.asks),
            vec![(d("0.3"), d("8"), d("10")), (d("0.1"), d("2"), d("2"))]
        );
    }

    #[test]
    fn test_rounding_collapses_levels() {
        let ladders = aggregate(&[
            order(Side::Bid, "0.8001", "3"),
            order(Side::Bid, "0.7999", "4"),
        ]);
        assert_eq!(ladders.bids.len(), 1);
        assert_eq!(ladders.bids.rows[0].price_level, d("0.800"));
        assert_eq!(ladders.bids.rows[0].amount, d("7"));
        assert_eq!(ladders.bids.rows[0].cumulative_total, d("7"));
    }

    #[test]
    fn test_empty_side() {
        let ladders = aggregate(&[order(Side::Bid, "0.5", "1")]);
        assert!(ladders.asks.is_empty());
        assert_eq!(ladders.asks.max_total(), Decimal::ZERO);
        assert!(ladders.asks.depth_pcts().iter().all(|p| *p == 0.0));

        let ladders = aggregate(&[]);
        assert!(ladders.is_empty());
    }

    #[test]
    fn test_zero_amounts_are_kept() {
        let ladders = aggregate(&[
            order(Side::Ask, "0.2", "0"),
            order(Side::Ask, "0.4", "0"),
        ]);
        assert_eq!(
            rows(&ladders.asks),
            vec![
                (d("0.4"), Decimal::ZERO, Decimal::ZERO),
                (d("0.2"), Decimal::ZERO, Decimal::ZERO)
            ]
        );
        assert_eq!(ladders.asks.depth_pcts(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_rows_descending_and_totals_monotonic() {
        let orders: Vec<LimitOrder> = (1..=9)
            .flat_map(|i| {
                let price = format!("0.{}", i);
                vec![
                    order(Side::Bid, &price, &i.to_string()),
                    order(Side::Ask, &price, "1"),
                ]
            })
            .collect();
        let ladders = aggregate(&orders);

        for ladder in [&ladders.bids, &ladders.asks] {
            assert!(ladder
                .rows
                .windows(2)
                .all(|w| w[0].price_level > w[1].price_level));
        }
        // Bids grow top to bottom; asks grow bottom to top.
        assert!(ladders
            .bids
            .rows
            .windows(2)
            .all(|w| w[0].cumulative_total <= w[1].cumulative_total));
        assert!(ladders
            .asks
            .rows
            .windows(2)
            .all(|w| w[0].cumulative_total >= w[1].cumulative_total));
        assert_eq!(ladders.bids.max_total(), d("45"));
        assert_eq!(ladders.asks.max_total(), d("9"));
    }

    #[test]
    fn test_input_order_irrelevant() {
        let mut orders = vec![
            order(Side::Bid, "0.71", "1"),
            order(Side::Bid, "0.42", "2"),
            order(Side::Ask, "0.33", "3"),
            order(Side::Ask, "0.05", "4"),
        ];
        let forward = aggregate(&orders);
        orders.reverse();
        assert_eq!(aggregate(&orders), forward);
    }
}
