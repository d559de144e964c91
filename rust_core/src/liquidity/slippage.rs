//! Slippage estimation, safe order sizing, and the pre-trade gate.
//!
//! Only bids rest on the book, so a BUY crosses the opposite side's bids
//! as an implied ask ladder (`ask = 100 - opposing_bid`), cheapest first,
//! while a SELL hits the literal bids, highest first. Either way the walk
//! consumes the same resting pool in best-execution order, which makes
//! slippage non-decreasing in order size -- the invariant the binary
//! search in [`max_safe_order_size`] depends on.

use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};
use crate::types::{Action, OrderbookSnapshot, PriceLevel, Side};

/// Result of walking the book for one hypothetical order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SlippageEstimate {
    /// Best executable price before the walk, in cents
    pub best_price_cents: u16,
    /// Volume-weighted average fill price, in cents (0 if nothing fills)
    pub avg_fill_price_cents: f64,
    /// Price of the deepest level touched, in cents
    pub worst_price_cents: u16,
    /// `|avg - best|` in the adverse direction, floored at zero
    pub slippage_cents: f64,
    /// Slippage relative to the best price, in percent
    pub slippage_pct: f64,
    /// Contracts the book can actually fill, up to the requested quantity
    pub fillable_quantity: u32,
    /// Requested contracts the book cannot absorb
    pub remaining_unfilled: u32,
    /// Number of price levels consumed
    pub levels_crossed: u32,
}

/// Executable levels for one (side, action), in consumption order.
///
/// BUYs cross the opposite pool with prices inverted onto the taker's
/// axis; SELLs hit their own pool at face price. Sorted defensively in
/// case the snapshot was built from struct literals rather than `new`.
fn executable_levels(book: &OrderbookSnapshot, side: Side, action: Action) -> Vec<PriceLevel> {
    let (pool, invert) = match (side, action) {
        (Side::Yes, Action::Buy) => (&book.no_bids, true),
        (Side::No, Action::Sell) => (&book.no_bids, false),
        (Side::No, Action::Buy) => (&book.yes_bids, true),
        (Side::Yes, Action::Sell) => (&book.yes_bids, false),
    };

    let mut levels: Vec<PriceLevel> = pool
        .iter()
        .filter(|l| l.quantity > 0 && l.price_cents <= 100)
        .map(|l| {
            if invert {
                PriceLevel::new(100 - l.price_cents, l.quantity)
            } else {
                *l
            }
        })
        .collect();

    match action {
        // Cheapest acquisition cost first
        Action::Buy => levels.sort_by_key(|l| l.price_cents),
        // Highest proceeds first
        Action::Sell => levels.sort_by(|a, b| b.price_cents.cmp(&a.price_cents)),
    }
    levels
}

/// Walk the book for a hypothetical order of `quantity` contracts.
///
/// Consumes executable levels in best-execution order, accumulating cost
/// until the quantity is met or the book runs out. An empty ladder yields
/// an all-zero estimate with the full quantity unfilled. Fails with
/// `InvalidArgument` on a zero quantity.
pub fn slippage_walk(
    book: &OrderbookSnapshot,
    side: Side,
    action: Action,
    quantity: u32,
) -> Result<SlippageEstimate> {
    if quantity == 0 {
        return Err(EngineError::InvalidArgument(
            "order quantity must be positive".to_string(),
        ));
    }

    let levels = executable_levels(book, side, action);
    let Some(best) = levels.first().map(|l| l.price_cents) else {
        return Ok(SlippageEstimate {
            remaining_unfilled: quantity,
            ..Default::default()
        });
    };

    let mut remaining = quantity;
    let mut filled: u64 = 0;
    let mut cost: u64 = 0;
    let mut worst = best;
    let mut crossed: u32 = 0;

    for level in &levels {
        if remaining == 0 {
            break;
        }
        let take = level.quantity.min(remaining);
        filled += take as u64;
        cost += level.price_cents as u64 * take as u64;
        worst = level.price_cents;
        crossed += 1;
        remaining -= take;
    }

    let avg = cost as f64 / filled as f64; // filled > 0: levels are non-empty
    // Averaging can never beat the best level; the floor only guards
    // against rounding underflow.
    let slippage = match action {
        Action::Buy => (avg - best as f64).max(0.0),
        Action::Sell => (best as f64 - avg).max(0.0),
    };
    let slippage_pct = if best > 0 {
        slippage / best as f64 * 100.0
    } else {
        0.0
    };

    Ok(SlippageEstimate {
        best_price_cents: best,
        avg_fill_price_cents: avg,
        worst_price_cents: worst,
        slippage_cents: slippage,
        slippage_pct,
        fillable_quantity: filled as u32,
        remaining_unfilled: remaining,
        levels_crossed: crossed,
    })
}

/// Largest BUY quantity that fills completely with at most
/// `max_slippage_cents` of slippage. Returns 0 when nothing rests on the
/// executable ladder.
///
/// Binary search over `[1, total_executable]`; valid because slippage is
/// non-decreasing in order size (deeper walks only reach worse levels).
pub fn max_safe_order_size(book: &OrderbookSnapshot, side: Side, max_slippage_cents: f64) -> u32 {
    let total: u64 = executable_levels(book, side, Action::Buy)
        .iter()
        .map(|l| l.quantity as u64)
        .sum();
    if total == 0 {
        return 0;
    }

    let mut lo: u64 = 1;
    let mut hi: u64 = total.min(u32::MAX as u64);
    let mut best: u64 = 0;

    while lo <= hi {
        let mid = lo + (hi - lo) / 2;
        let safe = match slippage_walk(book, side, Action::Buy, mid as u32) {
            Ok(est) => est.remaining_unfilled == 0 && est.slippage_cents <= max_slippage_cents,
            Err(_) => false,
        };
        if safe {
            best = mid;
            lo = mid + 1;
        } else {
            hi = mid - 1;
        }
    }

    best as u32
}

/// Pre-trade gate: estimate the fill and refuse orders the book cannot
/// absorb within the caller's slippage budget.
///
/// Fails with `InsufficientLiquidity` when any quantity is unfillable and
/// `SlippageExceeded` when the estimated slippage percentage is over
/// `max_slippage_pct`. Pure validation -- nothing is placed or reserved.
pub fn check_execution(
    book: &OrderbookSnapshot,
    side: Side,
    action: Action,
    quantity: u32,
    max_slippage_pct: f64,
) -> Result<SlippageEstimate> {
    let est = slippage_walk(book, side, action, quantity)?;
    if est.remaining_unfilled > 0 {
        return Err(EngineError::InsufficientLiquidity {
            requested: quantity,
            unfilled: est.remaining_unfilled,
        });
    }
    if est.slippage_pct > max_slippage_pct {
        return Err(EngineError::SlippageExceeded {
            slippage_pct: est.slippage_pct,
            max_pct: max_slippage_pct,
        });
    }
    Ok(est)
}
