//! Per-ticker P&L summaries.
//!
//! Combines the FIFO matcher's output with the latest orderbook snapshot:
//! realized P&L comes straight from the closed lots, open lots are marked
//! to the midpoint (NO inventory at `100 - mid`), and the fee schedule
//! estimates what closing the remainder would cost. Markets whose book
//! has no midpoint simply carry no mark; the summary says so instead of
//! guessing.

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::fees::taker_fee_cents;
use crate::pnl::fifo::fifo_match;
use crate::types::{OrderbookSnapshot, RawTrade, Side};
use crate::utils::money::round_half_up_div;

/// Open-position view for one side of a market.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SideSummary {
    pub side: Side,
    pub open_quantity: u64,
    /// Remaining cost basis, in cents
    pub open_cost_cents: i64,
    /// Cost per contract, rounded half up
    pub avg_open_cost_cents: i64,
    /// Mark price in cents; `None` when the book has no midpoint
    pub mark_price_cents: Option<f64>,
    /// Mark value minus cost basis; `None` without a mark
    pub unrealized_pnl_cents: Option<i64>,
    /// Estimated taker fee to exit at the mark; `None` without a mark
    pub est_exit_fee_cents: Option<i64>,
}

/// Realized + unrealized P&L for one ticker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PnlSummary {
    pub ticker: String,
    pub realized_pnl_cents: i64,
    /// Number of closing events that produced a realized P&L entry
    pub closed_trade_count: usize,
    /// Sell quantity that matched no open lot; non-zero means the trade
    /// history is incomplete and these numbers are partial
    pub orphan_sell_quantity: u64,
    pub open_sides: Vec<SideSummary>,
    /// Sum over open sides; `None` when any open side has no mark
    pub unrealized_pnl_cents: Option<i64>,
}

/// Summarize P&L for one ticker from a trade history and, when
/// available, the market's latest snapshot for marking open inventory.
///
/// Trades for other tickers are ignored, so the full history can be
/// passed as-is.
pub fn position_summary(
    ticker: &str,
    trades: &[RawTrade],
    book: Option<&OrderbookSnapshot>,
) -> Result<PnlSummary> {
    let own: Vec<RawTrade> = trades
        .iter()
        .filter(|t| t.ticker == ticker)
        .cloned()
        .collect();
    let fifo = fifo_match(&own)?;
    let mid = book.and_then(|b| b.midpoint());

    let mut open_sides = Vec::new();
    for ((_, side), lots) in &fifo.open_lots {
        let quantity: u64 = lots.iter().map(|l| l.quantity_remaining as u64).sum();
        let cost: i64 = lots.iter().map(|l| l.cost_remaining_cents).sum();
        let mark = mid.map(|m| match side {
            Side::Yes => m,
            Side::No => 100.0 - m,
        });
        // Mark value rounds half up, the same policy as price/cents
        // conversion elsewhere.
        let unrealized = mark.map(|m| (m * quantity as f64).round() as i64 - cost);
        let est_exit_fee = mark.map(|m| taker_fee_cents(m.round() as u16) * quantity as i64);
        open_sides.push(SideSummary {
            side: *side,
            open_quantity: quantity,
            open_cost_cents: cost,
            avg_open_cost_cents: round_half_up_div(cost, quantity as i64),
            mark_price_cents: mark,
            unrealized_pnl_cents: unrealized,
            est_exit_fee_cents: est_exit_fee,
        });
    }

    let unrealized_total = if open_sides.is_empty() {
        Some(0)
    } else if open_sides.iter().all(|s| s.unrealized_pnl_cents.is_some()) {
        Some(
            open_sides
                .iter()
                .filter_map(|s| s.unrealized_pnl_cents)
                .sum(),
        )
    } else {
        None
    };

    Ok(PnlSummary {
        ticker: ticker.to_string(),
        realized_pnl_cents: fifo.realized_pnl_cents(),
        closed_trade_count: fifo.closed_pnls.len(),
        orphan_sell_quantity: fifo.orphan_sell_quantity_skipped,
        open_sides,
        unrealized_pnl_cents: unrealized_total,
    })
}

/// Summaries for every ticker present in the history, in ticker order,
/// computed in parallel. `books` supplies marks for whichever tickers
/// have a live snapshot.
pub fn batch_summaries(
    trades: &[RawTrade],
    books: &FxHashMap<String, OrderbookSnapshot>,
) -> Result<Vec<PnlSummary>> {
    let mut tickers: Vec<&str> = trades.iter().map(|t| t.ticker.as_str()).collect();
    tickers.sort_unstable();
    tickers.dedup();

    tickers
        .par_iter()
        .map(|ticker| position_summary(ticker, trades, books.get(*ticker)))
        .collect()
}
