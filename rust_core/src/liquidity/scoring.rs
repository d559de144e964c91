//! Composite liquidity scoring and grading.
//!
//! Blends spread, depth, 24h volume, and open interest into a single
//! 0-100 score with a coarse grade and human-readable warnings. Weights
//! and thresholds are explicit parameters with documented defaults; there
//! is no ambient configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};
use crate::liquidity::depth::{depth_analysis, DepthAnalysis};
use crate::liquidity::slippage::max_safe_order_size;
use crate::types::{MarketView, OrderbookSnapshot, Side};

/// Weight sum tolerance for [`LiquidityWeights::new`].
const WEIGHT_SUM_TOLERANCE: f64 = 0.001;

/// Sub-score weights for the composite score. Must sum to 1.0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LiquidityWeights {
    pub spread: f64,
    pub depth: f64,
    pub volume: f64,
    pub open_interest: f64,
}

impl LiquidityWeights {
    /// Validated construction; rejects weight sets that are negative or
    /// do not sum to 1.0 within `0.001`.
    pub fn new(spread: f64, depth: f64, volume: f64, open_interest: f64) -> Result<Self> {
        if spread < 0.0 || depth < 0.0 || volume < 0.0 || open_interest < 0.0 {
            return Err(EngineError::InvalidArgument(
                "liquidity weights must be non-negative".to_string(),
            ));
        }
        let sum = spread + depth + volume + open_interest;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(EngineError::InvalidArgument(format!(
                "liquidity weights must sum to 1.0, got {sum:.3}"
            )));
        }
        Ok(Self {
            spread,
            depth,
            volume,
            open_interest,
        })
    }
}

impl Default for LiquidityWeights {
    fn default() -> Self {
        Self {
            spread: 0.30,
            depth: 0.30,
            volume: 0.20,
            open_interest: 0.20,
        }
    }
}

/// Thresholds and defaults for scoring, grading, and warnings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LiquidityConfig {
    /// Radius for the depth sub-score, in cents
    pub depth_radius_cents: i32,
    /// Slippage tolerance used when sizing `max_safe_size_yes/_no`, in cents
    pub max_safe_slippage_cents: f64,
    /// Warn when the spread is wider than this, in cents
    pub spread_warn_cents: i32,
    /// Warn when fewer contracts than this rest near the mid
    pub min_depth_contracts: u64,
    /// Warn when |imbalance_ratio| exceeds this
    pub max_imbalance_ratio: f64,
    /// Warn when 24h volume is below this
    pub min_volume_24h: u64,
    /// Minimum score for a `Liquid` grade
    pub liquid_threshold: u8,
    /// Minimum score for a `Moderate` grade
    pub moderate_threshold: u8,
    /// Minimum score for a `Thin` grade
    pub thin_threshold: u8,
}

impl Default for LiquidityConfig {
    fn default() -> Self {
        Self {
            depth_radius_cents: super::depth::DEFAULT_DEPTH_RADIUS_CENTS,
            max_safe_slippage_cents: 2.0,
            spread_warn_cents: 5,
            min_depth_contracts: 100,
            max_imbalance_ratio: 0.7,
            min_volume_24h: 500,
            liquid_threshold: 70,
            moderate_threshold: 40,
            thin_threshold: 15,
        }
    }
}

/// Coarse liquidity grade derived from the composite score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiquidityGrade {
    Liquid,
    Moderate,
    Thin,
    Illiquid,
}

impl std::fmt::Display for LiquidityGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiquidityGrade::Liquid => write!(f, "liquid"),
            LiquidityGrade::Moderate => write!(f, "moderate"),
            LiquidityGrade::Thin => write!(f, "thin"),
            LiquidityGrade::Illiquid => write!(f, "illiquid"),
        }
    }
}

/// Composite liquidity verdict for one market.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LiquidityAnalysis {
    pub ticker: String,
    /// Weighted composite score, 0-100
    pub score: u8,
    pub grade: LiquidityGrade,
    /// Sub-scores by name ("spread", "depth", "volume", "open_interest")
    pub components: HashMap<String, f64>,
    pub depth: DepthAnalysis,
    /// Largest BUY YES that stays inside the slippage tolerance
    pub max_safe_size_yes: u32,
    /// Largest BUY NO that stays inside the slippage tolerance
    pub max_safe_size_no: u32,
    /// Advisory notes; analysis results may be partial when non-empty
    pub warnings: Vec<String>,
}

/// Piecewise-linear spread sub-score: 100 at <= 1c, 0 at >= 20c.
/// A one-sided book has no spread and scores 0.
fn spread_score(spread_cents: Option<i32>) -> f64 {
    match spread_cents {
        None => 0.0,
        Some(s) if s <= 1 => 100.0,
        Some(s) if s >= 20 => 0.0,
        Some(s) => 100.0 * (20 - s) as f64 / 19.0,
    }
}

/// Score a market's liquidity from its latest snapshot and metadata.
///
/// Pure function of its inputs; `weights` and `config` carry the
/// documented defaults via their `Default` impls.
pub fn analyze_liquidity(
    view: &MarketView,
    book: &OrderbookSnapshot,
    weights: &LiquidityWeights,
    config: &LiquidityConfig,
) -> Result<LiquidityAnalysis> {
    let depth = depth_analysis(book, config.depth_radius_cents)?;
    let spread = book.spread_cents();

    let s_spread = spread_score(spread);
    let s_depth = (depth.weighted_score / 10.0).min(100.0);
    let s_volume = (view.volume_24h as f64 / 100.0).min(100.0);
    let s_oi = (view.open_interest as f64 / 50.0).min(100.0);

    let raw = s_spread * weights.spread
        + s_depth * weights.depth
        + s_volume * weights.volume
        + s_oi * weights.open_interest;
    let score = raw.clamp(0.0, 100.0) as u8;

    let grade = if score >= config.liquid_threshold {
        LiquidityGrade::Liquid
    } else if score >= config.moderate_threshold {
        LiquidityGrade::Moderate
    } else if score >= config.thin_threshold {
        LiquidityGrade::Thin
    } else {
        LiquidityGrade::Illiquid
    };

    let mut warnings = Vec::new();
    match spread {
        Some(s) if s > config.spread_warn_cents => {
            warnings.push(format!(
                "spread {}c is wider than {}c",
                s, config.spread_warn_cents
            ));
        }
        None => warnings.push("order book is one-sided; spread unavailable".to_string()),
        _ => {}
    }
    if depth.total_contracts < config.min_depth_contracts {
        warnings.push(format!(
            "only {} contracts within {}c of the mid (want {})",
            depth.total_contracts, config.depth_radius_cents, config.min_depth_contracts
        ));
    }
    if depth.imbalance_ratio.abs() > config.max_imbalance_ratio {
        warnings.push(format!(
            "book imbalance {:.2} exceeds {:.2}",
            depth.imbalance_ratio, config.max_imbalance_ratio
        ));
    }
    if view.volume_24h < config.min_volume_24h {
        warnings.push(format!(
            "24h volume {} below {}",
            view.volume_24h, config.min_volume_24h
        ));
    }
    if grade == LiquidityGrade::Illiquid {
        warnings.push("market graded illiquid; size and slippage estimates are unreliable".to_string());
    }

    let mut components = HashMap::new();
    components.insert("spread".to_string(), s_spread);
    components.insert("depth".to_string(), s_depth);
    components.insert("volume".to_string(), s_volume);
    components.insert("open_interest".to_string(), s_oi);

    Ok(LiquidityAnalysis {
        ticker: view.ticker.clone(),
        score,
        grade,
        components,
        max_safe_size_yes: max_safe_order_size(book, Side::Yes, config.max_safe_slippage_cents),
        max_safe_size_no: max_safe_order_size(book, Side::No, config.max_safe_slippage_cents),
        depth,
        warnings,
    })
}
