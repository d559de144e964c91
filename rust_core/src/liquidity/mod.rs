//! Orderbook liquidity engine.
//!
//! This module provides:
//! - Depth scoring with distance-weighted decay around the midpoint
//! - Slippage estimation by walking the implied ask ladders
//! - Maximum safe order sizing via binary search over the walk
//! - Pre-trade execution gating on fill and slippage limits
//! - Composite liquidity scoring, grading, and warnings
//!
//! Every operation is a pure function of an immutable snapshot; nothing
//! here holds state between calls.

pub mod depth;
pub mod scoring;
pub mod slippage;

pub use depth::{depth_analysis, DepthAnalysis, DEFAULT_DEPTH_RADIUS_CENTS};
pub use scoring::{
    analyze_liquidity, LiquidityAnalysis, LiquidityConfig, LiquidityGrade, LiquidityWeights,
};
pub use slippage::{check_execution, max_safe_order_size, slippage_walk, SlippageEstimate};
