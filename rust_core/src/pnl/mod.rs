//! FIFO cost-basis and P&L engine.
//!
//! This module provides:
//! - Cross-side trade normalization (sells act on the mirrored side)
//! - FIFO lot matching with banker's-rounding cost proration
//! - Per-ticker P&L summaries marked against the live midpoint
//! - Batch summaries across tickers in parallel
//!
//! The engine is stateless: every call recomputes from the supplied
//! trade history, so it tolerates cold starts and replays.

pub mod fifo;
pub mod normalize;
pub mod summary;

pub use fifo::{fifo_match, FifoResult, Lot, PositionKey};
pub use normalize::{normalize_trade, EffectiveTrade};
pub use summary::{batch_summaries, position_summary, PnlSummary, SideSummary};
