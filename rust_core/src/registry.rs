//! Shared registry of the latest market state per ticker.
//!
//! The data-fetch side writes fresh snapshots; analysis callers read
//! them. Critical sections are short (insert/clone), so a `parking_lot`
//! RwLock over an `FxHashMap` is plenty -- the engines themselves stay
//! pure and never touch this state.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::Result;
use crate::liquidity::{analyze_liquidity, LiquidityAnalysis, LiquidityConfig, LiquidityWeights};
use crate::types::{MarketView, OrderbookSnapshot};

/// Latest known state for one market.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarketState {
    pub book: OrderbookSnapshot,
    pub view: MarketView,
    pub updated_at: DateTime<Utc>,
}

/// Thread-safe ticker -> latest state map.
#[derive(Default)]
pub struct MarketRegistry {
    markets: RwLock<FxHashMap<String, MarketState>>,
}

impl MarketRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the latest snapshot and metadata for a market, keyed by the
    /// snapshot's ticker. Replaces any previous state.
    pub fn update(&self, book: OrderbookSnapshot, view: MarketView) {
        debug_assert_eq!(book.ticker, view.ticker);
        debug!(ticker = %book.ticker, "registry update");
        let state = MarketState {
            view,
            updated_at: Utc::now(),
            book,
        };
        self.markets.write().insert(state.book.ticker.clone(), state);
    }

    /// Latest state for a ticker, if any.
    pub fn get(&self, ticker: &str) -> Option<MarketState> {
        self.markets.read().get(ticker).cloned()
    }

    /// Tickers currently tracked, sorted.
    pub fn tickers(&self) -> Vec<String> {
        let mut out: Vec<String> = self.markets.read().keys().cloned().collect();
        out.sort();
        out
    }

    pub fn len(&self) -> usize {
        self.markets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.read().is_empty()
    }

    /// Drop a market, returning its last state.
    pub fn remove(&self, ticker: &str) -> Option<MarketState> {
        self.markets.write().remove(ticker)
    }

    /// Run the composite liquidity score on the stored state for a
    /// ticker. `None` when the ticker is unknown.
    pub fn analyze(
        &self,
        ticker: &str,
        weights: &LiquidityWeights,
        config: &LiquidityConfig,
    ) -> Option<Result<LiquidityAnalysis>> {
        let state = self.get(ticker)?;
        Some(analyze_liquidity(&state.view, &state.book, weights, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PriceLevel;
    use std::sync::Arc;

    fn state_for(ticker: &str, bid: u16) -> (OrderbookSnapshot, MarketView) {
        (
            OrderbookSnapshot::new(
                ticker,
                vec![PriceLevel::new(bid, 500)],
                vec![PriceLevel::new(100 - bid - 2, 500)],
            ),
            MarketView {
                ticker: ticker.to_string(),
                volume_24h: 10_000,
                open_interest: 5_000,
            },
        )
    }

    #[test]
    fn test_update_then_get() {
        let registry = MarketRegistry::new();
        let (book, view) = state_for("REG-A", 47);
        registry.update(book, view);

        let state = registry.get("REG-A").unwrap();
        assert_eq!(state.book.best_yes_bid(), Some(47));
        assert!(registry.get("REG-MISSING").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_update_replaces_previous_state() {
        let registry = MarketRegistry::new();
        let (book, view) = state_for("REG-A", 47);
        registry.update(book, view);
        let (book, view) = state_for("REG-A", 52);
        registry.update(book, view);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("REG-A").unwrap().book.best_yes_bid(), Some(52));
    }

    #[test]
    fn test_analyze_stored_market() {
        let registry = MarketRegistry::new();
        let (book, view) = state_for("REG-A", 47);
        registry.update(book, view);

        let analysis = registry
            .analyze(
                "REG-A",
                &LiquidityWeights::default(),
                &LiquidityConfig::default(),
            )
            .unwrap()
            .unwrap();
        assert!(analysis.score > 0);
        assert!(registry
            .analyze(
                "REG-MISSING",
                &LiquidityWeights::default(),
                &LiquidityConfig::default()
            )
            .is_none());
    }

    #[test]
    fn test_concurrent_writers() {
        let registry = Arc::new(MarketRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    let ticker = format!("REG-{i}");
                    let (book, view) = state_for(&ticker, 40 + i as u16);
                    registry.update(book, view);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.len(), 8);
        assert_eq!(registry.tickers().first().map(String::as_str), Some("REG-0"));
    }
}
