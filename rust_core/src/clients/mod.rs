//! Collaborator interfaces.
//!
//! The engines are pure; everything with I/O lives behind these traits.
//! A data-fetch implementation supplies orderbook snapshots and market
//! metadata, a trade store owns the append-only fill history. Both are
//! `Send + Sync` for use from async contexts; implementations handle
//! their own retries and rate limits.

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::types::{MarketView, OrderbookSnapshot, RawTrade};

/// Source of live market data (exchange REST/WebSocket client, replay
/// file, fixture).
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Display name ("kalshi", "replay", ...)
    fn name(&self) -> &str;

    /// Latest orderbook snapshot for a ticker.
    async fn fetch_orderbook(&self, ticker: &str) -> Result<OrderbookSnapshot>;

    /// Volume/open-interest metadata for a ticker.
    async fn fetch_market_view(&self, ticker: &str) -> Result<MarketView>;
}

/// Append-only store of recorded fills.
#[async_trait]
pub trait TradeStore: Send + Sync {
    /// Record one fill. Fills are immutable once recorded.
    async fn record_fill(&self, trade: RawTrade) -> Result<()>;

    /// All fills for one ticker, in recorded order.
    async fn trades_for(&self, ticker: &str) -> Result<Vec<RawTrade>>;

    /// The whole history, in recorded order.
    async fn all_trades(&self) -> Result<Vec<RawTrade>>;
}

/// In-memory trade store for tests and offline research sessions.
#[derive(Default)]
pub struct StaticTradeStore {
    trades: RwLock<Vec<RawTrade>>,
}

impl StaticTradeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a JSON array of fills, e.g. an exported trade
    /// history.
    pub fn from_json(json: &str) -> Result<Self> {
        let trades: Vec<RawTrade> = serde_json::from_str(json)?;
        Ok(Self {
            trades: RwLock::new(trades),
        })
    }
}

#[async_trait]
impl TradeStore for StaticTradeStore {
    async fn record_fill(&self, trade: RawTrade) -> Result<()> {
        self.trades.write().push(trade);
        Ok(())
    }

    async fn trades_for(&self, ticker: &str) -> Result<Vec<RawTrade>> {
        Ok(self
            .trades
            .read()
            .iter()
            .filter(|t| t.ticker == ticker)
            .cloned()
            .collect())
    }

    async fn all_trades(&self) -> Result<Vec<RawTrade>> {
        Ok(self.trades.read().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Action, Side};
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_static_store_round_trip() {
        let store = StaticTradeStore::new();
        let trade = RawTrade::new(
            "STORE-TEST",
            Side::Yes,
            Action::Buy,
            10,
            42,
            1,
            Utc.with_ymd_and_hms(2025, 11, 2, 9, 0, 0).unwrap(),
        );
        store.record_fill(trade.clone()).await.unwrap();

        assert_eq!(store.trades_for("STORE-TEST").await.unwrap(), vec![trade]);
        assert!(store.trades_for("OTHER").await.unwrap().is_empty());
        assert_eq!(store.all_trades().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_from_json_export() {
        let json = r#"[
            {
                "ticker": "FED-25DEC",
                "side": "yes",
                "action": "buy",
                "quantity": 100,
                "price_cents": 37,
                "fee_cents": 150,
                "executed_at": "2025-10-30T18:02:11Z"
            },
            {
                "ticker": "FED-25DEC",
                "side": "no",
                "action": "sell",
                "quantity": 40,
                "price_cents": 58,
                "fee_cents": 60,
                "executed_at": "2025-11-01T10:15:00Z"
            }
        ]"#;
        let store = StaticTradeStore::from_json(json).unwrap();
        let trades = store.trades_for("FED-25DEC").await.unwrap();
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].quantity, 100);
        assert_eq!(trades[1].action, Action::Sell);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(StaticTradeStore::from_json("not json").is_err());
    }
}
