//! Cross-side trade normalization.
//!
//! The exchange quotes both sides of a binary market as mirrored bids, so
//! closing a YES position is frequently reported as a SELL on the NO side.
//! For FIFO matching every trade is first mapped to the side it actually
//! acts on: a BUY keeps its literal side and price, a SELL flips to the
//! opposite side at the inverted price (`100 - price`). The raw record
//! stays untouched and auditable; the effective view is derived on demand
//! and never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};
use crate::types::{Action, RawTrade, Side};

/// The FIFO-normalized view of a [`RawTrade`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveTrade {
    pub ticker: String,
    /// Side the trade acts on after cross-side normalization
    pub side: Side,
    pub action: Action,
    pub quantity: u32,
    /// Price on the effective side, in cents
    pub price_cents: u16,
    pub fee_cents: i64,
    pub executed_at: DateTime<Utc>,
}

/// Normalize one trade for FIFO matching.
///
/// Side and action arrive as enums, so the unknown-discriminant cases are
/// rejected at the deserialization boundary; this validates the numeric
/// fields and fails with `InvalidTrade` on a price above 100 cents, a
/// zero quantity, or a negative fee.
pub fn normalize_trade(trade: &RawTrade) -> Result<EffectiveTrade> {
    if trade.price_cents > 100 {
        return Err(EngineError::InvalidTrade(format!(
            "price {}c outside 0-100 on {}",
            trade.price_cents, trade.ticker
        )));
    }
    if trade.quantity == 0 {
        return Err(EngineError::InvalidTrade(format!(
            "zero quantity on {}",
            trade.ticker
        )));
    }
    if trade.fee_cents < 0 {
        return Err(EngineError::InvalidTrade(format!(
            "negative fee {}c on {}",
            trade.fee_cents, trade.ticker
        )));
    }

    let (side, price_cents) = match trade.action {
        Action::Buy => (trade.side, trade.price_cents),
        Action::Sell => (trade.side.opposite(), 100 - trade.price_cents),
    };

    Ok(EffectiveTrade {
        ticker: trade.ticker.clone(),
        side,
        action: trade.action,
        quantity: trade.quantity,
        price_cents,
        fee_cents: trade.fee_cents,
        executed_at: trade.executed_at,
    })
}
