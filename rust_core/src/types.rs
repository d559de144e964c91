//! Core domain types for a binary-outcome prediction market.
//!
//! Prices are integer cents in [0, 100]; 100 cents = the full $1.00 payout
//! of a winning contract, so a YES price doubles as a probability estimate.
//! The exchange only publishes resting bids: the ask side of either book is
//! implied by the opposite side's bids (`ask = 100 - opposing_bid`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contract side of a binary market.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Yes,
    No,
}

impl Side {
    /// The mirrored side of the same market.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Yes => Side::No,
            Side::No => Side::Yes,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Yes => write!(f, "yes"),
            Side::No => write!(f, "no"),
        }
    }
}

/// Order direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Buy,
    Sell,
}

/// One resting bid: a price level and the contracts quoted at it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Price in cents, 0-100
    pub price_cents: u16,
    /// Contracts resting at this level (> 0)
    pub quantity: u32,
}

impl PriceLevel {
    pub fn new(price_cents: u16, quantity: u32) -> Self {
        Self {
            price_cents,
            quantity,
        }
    }
}

/// Immutable snapshot of both bid books for one market.
///
/// Constructed fresh per query, never mutated. Levels are held best-first
/// (descending price); the constructor re-sorts defensively and drops
/// emptied levels that some feeds leave behind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderbookSnapshot {
    pub ticker: String,
    /// Resting YES bids, best (highest) first
    pub yes_bids: Vec<PriceLevel>,
    /// Resting NO bids, best (highest) first
    pub no_bids: Vec<PriceLevel>,
}

impl OrderbookSnapshot {
    pub fn new(
        ticker: impl Into<String>,
        mut yes_bids: Vec<PriceLevel>,
        mut no_bids: Vec<PriceLevel>,
    ) -> Self {
        yes_bids.retain(|l| l.quantity > 0 && l.price_cents <= 100);
        no_bids.retain(|l| l.quantity > 0 && l.price_cents <= 100);
        yes_bids.sort_by(|a, b| b.price_cents.cmp(&a.price_cents));
        no_bids.sort_by(|a, b| b.price_cents.cmp(&a.price_cents));
        Self {
            ticker: ticker.into(),
            yes_bids,
            no_bids,
        }
    }

    /// Best (highest) YES bid in cents.
    #[inline]
    pub fn best_yes_bid(&self) -> Option<u16> {
        self.yes_bids.first().map(|l| l.price_cents)
    }

    /// Best (highest) NO bid in cents.
    #[inline]
    pub fn best_no_bid(&self) -> Option<u16> {
        self.no_bids.first().map(|l| l.price_cents)
    }

    /// Cheapest implied YES ask: `100 - best_no_bid`.
    #[inline]
    pub fn implied_yes_ask(&self) -> Option<u16> {
        self.best_no_bid().map(|p| 100 - p)
    }

    /// Cheapest implied NO ask: `100 - best_yes_bid`.
    #[inline]
    pub fn implied_no_ask(&self) -> Option<u16> {
        self.best_yes_bid().map(|p| 100 - p)
    }

    /// Midpoint of best YES bid and implied YES ask, in cents.
    /// Undefined when either side of the book is empty.
    pub fn midpoint(&self) -> Option<f64> {
        let bid = self.best_yes_bid()?;
        let ask = self.implied_yes_ask()?;
        Some((bid as f64 + ask as f64) / 2.0)
    }

    /// Bid/ask spread on the YES axis, in cents. Negative when the implied
    /// book is crossed. Undefined when either side is empty.
    pub fn spread_cents(&self) -> Option<i32> {
        let bid = self.best_yes_bid()?;
        let ask = self.implied_yes_ask()?;
        Some(ask as i32 - bid as i32)
    }

    /// True when neither side has a resting bid.
    pub fn is_empty(&self) -> bool {
        self.yes_bids.is_empty() && self.no_bids.is_empty()
    }
}

/// Volume/open-interest metadata supplied alongside an orderbook snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketView {
    pub ticker: String,
    /// Contracts traded in the last 24 hours
    pub volume_24h: u64,
    /// Contracts currently outstanding
    pub open_interest: u64,
}

/// A recorded fill, exactly as the exchange reported it.
///
/// Immutable once recorded; the trade store owns the append-only history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTrade {
    pub ticker: String,
    pub side: Side,
    pub action: Action,
    /// Contracts filled (> 0)
    pub quantity: u32,
    /// Fill price in cents, 0-100
    pub price_cents: u16,
    /// Fee charged on the fill, in cents
    pub fee_cents: i64,
    pub executed_at: DateTime<Utc>,
}

impl RawTrade {
    pub fn new(
        ticker: impl Into<String>,
        side: Side,
        action: Action,
        quantity: u32,
        price_cents: u16,
        fee_cents: i64,
        executed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            side,
            action,
            quantity,
            price_cents,
            fee_cents,
            executed_at,
        }
    }
}
