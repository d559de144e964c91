//! FIFO lot matching.
//!
//! Trades are normalized, grouped by (ticker, effective side), re-sorted
//! by execution time per group, and run through a first-in-first-out lot
//! queue. Buys open lots carrying `price * qty + fee` of cost; sells
//! consume lots from the front, prorating cost with banker's rounding so
//! repeated partial consumption accumulates no bias. A sell that outruns
//! the open lots is an orphan: counted and logged, never an error, since
//! it signals an incomplete trade history rather than an engine defect.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::Result;
use crate::pnl::normalize::{normalize_trade, EffectiveTrade};
use crate::types::{Action, RawTrade, Side};
use crate::utils::money::{round_half_even_div, round_half_up_div};

/// Grouping key for lots: one queue per market side.
pub type PositionKey = (String, Side);

/// A partially-or-fully unconsumed batch of acquired contracts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    pub quantity_remaining: u32,
    pub cost_remaining_cents: i64,
}

/// Outcome of one FIFO pass over a trade history.
#[derive(Clone, Debug, Default)]
pub struct FifoResult {
    /// Realized P&L per closing event, in cents, in (ticker, side,
    /// execution time) order
    pub closed_pnls: Vec<i64>,
    /// Sell quantity with no matching open lot (incomplete history signal)
    pub orphan_sell_quantity_skipped: u64,
    /// Surviving lots per (ticker, side), oldest first
    pub open_lots: BTreeMap<PositionKey, Vec<Lot>>,
}

impl FifoResult {
    /// Total realized P&L across all closing events, in cents.
    pub fn realized_pnl_cents(&self) -> i64 {
        self.closed_pnls.iter().sum()
    }

    /// Open contracts for a position key.
    pub fn open_quantity(&self, key: &PositionKey) -> u64 {
        self.open_lots
            .get(key)
            .map(|lots| lots.iter().map(|l| l.quantity_remaining as u64).sum())
            .unwrap_or(0)
    }

    /// Average cost of the open position in cents per contract, rounded
    /// half up. `None` when nothing is open for the key.
    pub fn avg_open_cost_cents(&self, key: &PositionKey) -> Option<i64> {
        let lots = self.open_lots.get(key)?;
        let qty: i64 = lots.iter().map(|l| l.quantity_remaining as i64).sum();
        if qty == 0 {
            return None;
        }
        let cost: i64 = lots.iter().map(|l| l.cost_remaining_cents).sum();
        Some(round_half_up_div(cost, qty))
    }
}

/// Run the FIFO matcher over a trade history.
///
/// The whole batch fails with `InvalidTrade` if any record is malformed;
/// callers sanitize history before matching, there is no partial repair.
/// Groups are processed in key order so results are deterministic
/// regardless of input interleaving across markets.
pub fn fifo_match(trades: &[RawTrade]) -> Result<FifoResult> {
    let mut groups: BTreeMap<PositionKey, Vec<EffectiveTrade>> = BTreeMap::new();
    for trade in trades {
        let eff = normalize_trade(trade)?;
        groups
            .entry((eff.ticker.clone(), eff.side))
            .or_default()
            .push(eff);
    }

    let mut result = FifoResult::default();

    for (key, mut events) in groups {
        // Defensive re-sort; stable, so same-timestamp events keep their
        // recorded order.
        events.sort_by_key(|e| e.executed_at);

        let mut queue: VecDeque<Lot> = VecDeque::new();
        for event in events {
            match event.action {
                Action::Buy => {
                    queue.push_back(Lot {
                        quantity_remaining: event.quantity,
                        cost_remaining_cents: event.price_cents as i64 * event.quantity as i64
                            + event.fee_cents,
                    });
                }
                Action::Sell => {
                    let requested = event.quantity;
                    let mut unmet = requested;
                    let mut matched: u32 = 0;
                    let mut cost_basis: i64 = 0;

                    while unmet > 0 {
                        let Some(front) = queue.front_mut() else { break };
                        let take = front.quantity_remaining.min(unmet);
                        let cost_take = if take == front.quantity_remaining {
                            front.cost_remaining_cents
                        } else {
                            round_half_even_div(
                                front.cost_remaining_cents * take as i64,
                                front.quantity_remaining as i64,
                            )
                        };
                        front.quantity_remaining -= take;
                        front.cost_remaining_cents -= cost_take;
                        if front.quantity_remaining == 0 {
                            queue.pop_front();
                        }
                        matched += take;
                        cost_basis += cost_take;
                        unmet -= take;
                    }

                    if matched > 0 {
                        let fee = if matched == requested {
                            event.fee_cents
                        } else {
                            round_half_even_div(
                                event.fee_cents * matched as i64,
                                requested as i64,
                            )
                        };
                        let proceeds = event.price_cents as i64 * matched as i64;
                        result.closed_pnls.push(proceeds - fee - cost_basis);
                    }
                    if unmet > 0 {
                        warn!(
                            ticker = %key.0,
                            side = %key.1,
                            skipped = unmet,
                            "sell without matching open lots; trade history looks incomplete"
                        );
                        result.orphan_sell_quantity_skipped += unmet as u64;
                    }
                }
            }
        }

        if !queue.is_empty() {
            result.open_lots.insert(key, queue.into_iter().collect());
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EngineError;
    use chrono::{Duration, TimeZone, Utc};

    fn trades_at(specs: &[(&str, Side, Action, u32, u16, i64)]) -> Vec<RawTrade> {
        let start = Utc.with_ymd_and_hms(2025, 11, 2, 9, 0, 0).unwrap();
        specs
            .iter()
            .enumerate()
            .map(|(i, &(ticker, side, action, qty, price, fee))| {
                RawTrade::new(
                    ticker,
                    side,
                    action,
                    qty,
                    price,
                    fee,
                    start + Duration::minutes(i as i64),
                )
            })
            .collect()
    }

    fn yes_key(ticker: &str) -> PositionKey {
        (ticker.to_string(), Side::Yes)
    }

    #[test]
    fn test_fifo_consumes_oldest_lots_first() {
        // Buys 10@40, 10@50, 10@60, then a 15-lot close reported as a
        // NO-side sell at 45, i.e. an effective YES sale at 55.
        // FIFO: 10 from the 40c lot (cost 400) + 5 from the 50c lot
        // (cost 250). Proceeds 15 * 55 = 825 -> P&L 175. The 60c lot
        // stays fully open.
        let trades = trades_at(&[
            ("T", Side::Yes, Action::Buy, 10, 40, 0),
            ("T", Side::Yes, Action::Buy, 10, 50, 0),
            ("T", Side::Yes, Action::Buy, 10, 60, 0),
            ("T", Side::No, Action::Sell, 15, 45, 0), // effective: yes @ 55
        ]);
        let result = fifo_match(&trades).unwrap();

        assert_eq!(result.closed_pnls, vec![175]);
        assert_eq!(result.orphan_sell_quantity_skipped, 0);
        let lots = &result.open_lots[&yes_key("T")];
        assert_eq!(
            lots,
            &vec![
                Lot {
                    quantity_remaining: 5,
                    cost_remaining_cents: 250
                },
                Lot {
                    quantity_remaining: 10,
                    cost_remaining_cents: 600
                },
            ]
        );
        assert_eq!(result.avg_open_cost_cents(&yes_key("T")), Some(57)); // 850/15 -> 56.67
    }

    #[test]
    fn test_buy_fee_lands_in_cost_basis() {
        let trades = trades_at(&[
            ("T", Side::Yes, Action::Buy, 10, 40, 7),
            ("T", Side::No, Action::Sell, 10, 50, 0), // effective: yes @ 50
        ]);
        let result = fifo_match(&trades).unwrap();
        // Cost basis 407, proceeds 500.
        assert_eq!(result.closed_pnls, vec![93]);
        assert!(result.open_lots.is_empty());
    }

    #[test]
    fn test_sell_fee_prorated_over_matched_portion() {
        // Only 10 of the 15 requested match, so 2/3 of the 9c fee counts:
        // round_half_even(9 * 10 / 15) = 6.
        let trades = trades_at(&[
            ("T", Side::Yes, Action::Buy, 10, 40, 0),
            ("T", Side::No, Action::Sell, 15, 50, 9), // effective: yes @ 50
        ]);
        let result = fifo_match(&trades).unwrap();
        assert_eq!(result.closed_pnls, vec![10 * 50 - 6 - 400]);
        assert_eq!(result.orphan_sell_quantity_skipped, 5);
    }

    #[test]
    fn test_fully_orphaned_sell_contributes_no_pnl() {
        let trades = trades_at(&[("T", Side::Yes, Action::Sell, 20, 50, 4)]);
        let result = fifo_match(&trades).unwrap();
        assert!(result.closed_pnls.is_empty());
        assert_eq!(result.orphan_sell_quantity_skipped, 20);
        assert!(result.open_lots.is_empty());
    }

    #[test]
    fn test_cross_side_sell_closes_mirrored_position() {
        // Buy YES at 40; the close arrives as SELL NO at 55, i.e. an
        // effective YES sale at 45.
        let trades = trades_at(&[
            ("T", Side::Yes, Action::Buy, 10, 40, 0),
            ("T", Side::No, Action::Sell, 10, 55, 0),
        ]);
        let result = fifo_match(&trades).unwrap();
        assert_eq!(result.closed_pnls, vec![50]); // 450 - 400
        assert!(result.open_lots.is_empty());
    }

    #[test]
    fn test_sides_keep_independent_queues() {
        let trades = trades_at(&[
            ("T", Side::Yes, Action::Buy, 10, 40, 0),
            ("T", Side::No, Action::Buy, 10, 55, 0),
            ("T", Side::Yes, Action::Sell, 10, 48, 0),
        ]);
        let result = fifo_match(&trades).unwrap();
        // The YES sell normalizes to a NO-side close at 52 and must not
        // touch the YES lot.
        assert_eq!(result.closed_pnls, vec![520 - 550]);
        assert_eq!(result.open_quantity(&yes_key("T")), 10);
    }

    #[test]
    fn test_out_of_order_timestamps_resorted() {
        let start = Utc.with_ymd_and_hms(2025, 11, 2, 9, 0, 0).unwrap();
        let buy = RawTrade::new("T", Side::Yes, Action::Buy, 10, 40, 0, start);
        let sell = RawTrade::new(
            "T",
            Side::No,
            Action::Sell,
            10,
            55,
            0,
            start + Duration::minutes(5),
        );
        // Sell listed first; the per-group sort restores execution order.
        let result = fifo_match(&[sell, buy]).unwrap();
        assert_eq!(result.closed_pnls, vec![50]);
        assert_eq!(result.orphan_sell_quantity_skipped, 0);
    }

    #[test]
    fn test_banker_rounding_in_partial_consumption() {
        // Lot of 8 contracts costing 405 cents; selling 3 prorates
        // 405 * 3 / 8 = 151.875 -> 152. Remainder keeps 253.
        let trades = trades_at(&[
            ("T", Side::Yes, Action::Buy, 8, 50, 5),
            ("T", Side::No, Action::Sell, 3, 40, 0), // effective: yes @ 60
        ]);
        let result = fifo_match(&trades).unwrap();
        assert_eq!(result.closed_pnls, vec![3 * 60 - 152]);
        let lots = &result.open_lots[&yes_key("T")];
        assert_eq!(lots[0].quantity_remaining, 5);
        assert_eq!(lots[0].cost_remaining_cents, 253);
    }

    #[test]
    fn test_lot_conservation() {
        // Sum of open quantities equals buys minus matched sells.
        let trades = trades_at(&[
            ("T", Side::Yes, Action::Buy, 100, 40, 3),
            ("T", Side::Yes, Action::Buy, 50, 45, 2),
            ("T", Side::No, Action::Sell, 30, 58, 1),
            ("T", Side::No, Action::Sell, 80, 60, 2),
            ("T", Side::Yes, Action::Buy, 25, 44, 1),
            ("T", Side::No, Action::Sell, 90, 61, 0),
        ]);
        let result = fifo_match(&trades).unwrap();
        let buys: u64 = 100 + 50 + 25;
        let sells: u64 = 30 + 80 + 90;
        let matched = sells - result.orphan_sell_quantity_skipped;
        assert_eq!(result.open_quantity(&yes_key("T")), buys - matched);
    }

    #[test]
    fn test_malformed_trade_aborts_batch() {
        let mut trades = trades_at(&[
            ("T", Side::Yes, Action::Buy, 10, 40, 0),
            ("T", Side::Yes, Action::Buy, 10, 50, 0),
        ]);
        trades[1].price_cents = 120;
        assert!(matches!(
            fifo_match(&trades),
            Err(EngineError::InvalidTrade(_))
        ));
    }

    #[test]
    fn test_multi_ticker_groups_are_deterministic() {
        // Interleaved tickers; closed P&L comes out in key order (A then
        // B) no matter how the input was interleaved.
        let trades = trades_at(&[
            ("B", Side::Yes, Action::Buy, 10, 40, 0),
            ("A", Side::Yes, Action::Buy, 10, 30, 0),
            ("B", Side::No, Action::Sell, 10, 52, 0), // effective: yes @ 48
            ("A", Side::No, Action::Sell, 10, 65, 0), // effective: yes @ 35
        ]);
        let result = fifo_match(&trades).unwrap();
        assert_eq!(result.closed_pnls, vec![350 - 300, 480 - 400]);
        assert_eq!(result.orphan_sell_quantity_skipped, 0);
        assert!(result.open_lots.is_empty());
    }
}
