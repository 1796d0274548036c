//! Glycemic metric library.
//!
//! Pure functions, one statistic each. Functions over `&[f64]` read the
//! glucose column only; functions over `&[Sample]` also use timestamps.
//! `NaN` is an absent reading throughout.
//!
//! | Group | Metrics |
//! |-------|---------|
//! | [`descriptive`] | summary, interday sd/cv, intraday sd/cv, J-index, GMI, eA1c |
//! | [`range`] | TIR, TOR, PIR, POR, fixed-bound TIR, MGE, MGN |
//! | [`risk`] | LBGI, HBGI, DRR |
//! | [`threshold`] | time above/below, GRI, peak count, episode-based time above |
//! | [`variability`] | MODD, CONGA24 |

pub mod descriptive;
pub mod range;
pub mod risk;
pub mod stats;
pub mod threshold;
pub mod variability;

pub use descriptive::{
    ea1c, gmi, interday_cv, interday_sd, intraday_cv, intraday_sd, j_index, summary,
    DailySpread, GlucoseSummary,
};
pub use range::{
    mean_glucose_excursion, mean_glucose_in_range, percent_in_range, percent_outside_range,
    time_in_bounds, time_in_range, time_in_range_70_180, time_in_tight_range,
    time_outside_range, Band,
};
pub use risk::{drr, hbgi, lbgi, risk_transform, RiskProfile};
pub use threshold::{
    count_peaks, glucose_risk_index, glucose_risk_index_from, threshold_episodes, time_above,
    time_above_revised, time_below, Episode,
};
pub use variability::{conga24, minute_of_day, modd, modd_per_minute};

/// Default sampling interval in minutes credited per reading.
pub const DEFAULT_SAMPLING_RATE: f64 = 5.0;
