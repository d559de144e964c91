//! Tidebook Core - market-microstructure risk engine for binary-outcome
//! prediction markets (contracts priced in cents, 0-100).
//!
//! This crate provides:
//! - Orderbook depth scoring with distance-weighted decay around the mid
//! - Slippage estimation by walking the implied ask ladders
//! - Maximum safe order sizing via binary search over the walk
//! - A pre-trade execution gate on fill and slippage limits
//! - Composite liquidity scoring, grading, and warnings
//! - FIFO cost-basis matching with cross-side trade normalization
//! - Realized/unrealized P&L summaries, batched across tickers
//! - The exchange taker-fee schedule and cents-precise money utilities
//! - A concurrent registry of latest market snapshots
//!
//! The engines are pure functions over immutable inputs: no I/O, no
//! ambient configuration, no shared mutable state. Network fetch and
//! persistence live behind the traits in [`clients`].

pub mod clients;
pub mod errors;
pub mod fees;
pub mod liquidity;
pub mod pnl;
pub mod registry;
pub mod types;
pub mod utils;

pub use errors::EngineError;
pub use liquidity::{
    analyze_liquidity, check_execution, depth_analysis, max_safe_order_size, slippage_walk,
    DepthAnalysis, LiquidityAnalysis, LiquidityConfig, LiquidityGrade, LiquidityWeights,
    SlippageEstimate, DEFAULT_DEPTH_RADIUS_CENTS,
};
pub use pnl::{
    batch_summaries, fifo_match, normalize_trade, position_summary, EffectiveTrade, FifoResult,
    Lot, PnlSummary, SideSummary,
};
pub use registry::{MarketRegistry, MarketState};
pub use types::{Action, MarketView, OrderbookSnapshot, PriceLevel, RawTrade, Side};
