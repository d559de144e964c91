//! Error taxonomy for the risk engine.
//!
//! Two families of failure:
//! - `InvalidArgument` / `InvalidTrade` are malformed inputs. Fail fast,
//!   never retried.
//! - `InsufficientLiquidity` / `SlippageExceeded` are expected outcomes of
//!   the pre-trade execution gate. Callers catch these and skip or resize
//!   the order.
//!
//! Diagnostic counters (orphan sell quantities, liquidity warnings) are
//! data, not errors, and never surface through this type.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Malformed call-site input: zero quantity, negative radius, bad
    /// weight sum. A programming error on the caller's side.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Malformed trade record. Aborts the whole batch; the trade history
    /// must be sanitized before matching.
    #[error("invalid trade: {0}")]
    InvalidTrade(String),

    /// The book cannot absorb the requested quantity.
    #[error("insufficient liquidity: {unfilled} of {requested} contracts unfillable")]
    InsufficientLiquidity { requested: u32, unfilled: u32 },

    /// Filling the requested quantity would cost more slippage than the
    /// caller allows.
    #[error("slippage {slippage_pct:.2}% exceeds limit {max_pct:.2}%")]
    SlippageExceeded { slippage_pct: f64, max_pct: f64 },
}

pub type Result<T> = std::result::Result<T, EngineError>;
