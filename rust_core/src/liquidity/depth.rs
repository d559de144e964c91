//! Depth scoring around the market midpoint.
//!
//! Counts resting contracts within a radius of the midpoint, weighting
//! each level by how close it sits. NO bids are mapped onto the YES price
//! axis first (`100 - price`) so both sides compare on the same scale.

use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};
use crate::types::OrderbookSnapshot;

/// Default radius used by the composite liquidity score.
pub const DEFAULT_DEPTH_RADIUS_CENTS: i32 = 10;

/// Depth within a price radius of the midpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DepthAnalysis {
    /// Contracts on both sides within the radius
    pub total_contracts: u64,
    /// Distance-weighted contract total
    pub weighted_score: f64,
    /// YES-side contracts within the radius
    pub yes_side_depth: u64,
    /// NO-side contracts within the radius (on the implied-ask axis)
    pub no_side_depth: u64,
    /// (yes - no) / max(yes + no, 1); positive means bid-heavy
    pub imbalance_ratio: f64,
}

/// Score book depth within `radius_cents` of the midpoint.
///
/// Returns an all-zero analysis when the midpoint is undefined (one or
/// both sides empty). Level weight is 1.0 at the midpoint and decays
/// linearly to `1/(radius+1)` at the edge of the radius; with a zero
/// radius only levels exactly at the midpoint count, at full weight.
pub fn depth_analysis(book: &OrderbookSnapshot, radius_cents: i32) -> Result<DepthAnalysis> {
    if radius_cents < 0 {
        return Err(EngineError::InvalidArgument(format!(
            "depth radius must be non-negative, got {radius_cents}"
        )));
    }

    let Some(mid) = book.midpoint() else {
        return Ok(DepthAnalysis::default());
    };

    let radius = radius_cents as f64;
    let weight_of = |distance: f64| {
        if radius_cents == 0 {
            1.0
        } else {
            // distance <= radius < radius + 1, so this never goes negative
            1.0 - distance / (radius + 1.0)
        }
    };

    let mut weighted = 0.0;
    let mut yes_depth: u64 = 0;
    let mut no_depth: u64 = 0;

    for level in &book.yes_bids {
        let distance = (level.price_cents as f64 - mid).abs();
        if distance <= radius {
            weighted += level.quantity as f64 * weight_of(distance);
            yes_depth += level.quantity as u64;
        }
    }
    for level in &book.no_bids {
        // Implied YES ask for this NO bid, same axis as the midpoint
        let implied_ask = 100.0 - level.price_cents as f64;
        let distance = (implied_ask - mid).abs();
        if distance <= radius {
            weighted += level.quantity as f64 * weight_of(distance);
            no_depth += level.quantity as u64;
        }
    }

    let total = yes_depth + no_depth;
    Ok(DepthAnalysis {
        total_contracts: total,
        weighted_score: weighted,
        yes_side_depth: yes_depth,
        no_side_depth: no_depth,
        imbalance_ratio: (yes_depth as f64 - no_depth as f64) / total.max(1) as f64,
    })
}
