//! Blood glucose risk indices (LBGI, HBGI, DRR).
//!
//! Every reading is mapped through the symmetrizing transform
//! `f(g) = ln(g)^1.084 - 5.381` and split into a low-risk and a high-risk
//! component. The split is a single pass over the readings producing two
//! parallel sequences.

use super::stats::{max_propagating, mean_propagating};
use serde::{Deserialize, Serialize};

const RISK_EXPONENT: f64 = 1.084;
const RISK_OFFSET: f64 = 5.381;
const RISK_SCALE: f64 = 22.77;

/// Symmetrized glucose value. Non-finite for `g < 1` (including
/// non-positive readings).
pub fn risk_transform(g: f64) -> f64 {
    g.ln().powf(RISK_EXPONENT) - RISK_OFFSET
}

/// Per-reading low (`rl`) and high (`rh`) risk components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub low: Vec<f64>,
    pub high: Vec<f64>,
}

impl RiskProfile {
    /// Split every reading into its risk components.
    ///
    /// An absent reading scores zero on both sides and still counts toward
    /// the averages. A present reading whose transform is undefined yields a
    /// non-finite component that propagates into every index.
    pub fn from_glucose(glucose: &[f64]) -> Self {
        let (low, high) = glucose.iter().map(|&g| risk_components(g)).unzip();
        Self { low, high }
    }

    /// Low blood glucose index: mean of `rl`.
    pub fn lbgi(&self) -> f64 {
        mean_propagating(&self.low)
    }

    /// High blood glucose index: mean of `rh`.
    pub fn hbgi(&self) -> f64 {
        mean_propagating(&self.high)
    }

    /// Daily risk range: `max(rl) + max(rh)` over the whole profile.
    ///
    /// This is a single maximum over everything supplied, not the per-day
    /// average of the ADRR literature; a multi-day window gets one value.
    pub fn drr(&self) -> f64 {
        max_propagating(&self.low) + max_propagating(&self.high)
    }

    pub fn len(&self) -> usize {
        self.low.len()
    }

    pub fn is_empty(&self) -> bool {
        self.low.is_empty()
    }
}

fn risk_components(g: f64) -> (f64, f64) {
    if g.is_nan() {
        return (0.0, 0.0);
    }
    let f = risk_transform(g);
    if f.is_nan() {
        return (f64::NAN, f64::NAN);
    }
    let r = RISK_SCALE * f * f;
    if f <= 0.0 {
        (r, 0.0)
    } else {
        (0.0, r)
    }
}

/// Low blood glucose index.
pub fn lbgi(glucose: &[f64]) -> f64 {
    RiskProfile::from_glucose(glucose).lbgi()
}

/// High blood glucose index.
pub fn hbgi(glucose: &[f64]) -> f64 {
    RiskProfile::from_glucose(glucose).hbgi()
}

/// Daily risk range (reported as ADRR in feature tables).
pub fn drr(glucose: &[f64]) -> f64 {
    RiskProfile::from_glucose(glucose).drr()
}
