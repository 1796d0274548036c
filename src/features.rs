//! Per-window feature bundle.
//!
//! [`WindowFeatures`] holds every metric of one window in output column
//! order. The field order, [`METRIC_COLUMNS`] and [`WindowFeatures::values`]
//! must stay in step.

use crate::metrics::{
    count_peaks, glucose_risk_index_from, interday_cv, interday_sd, j_index,
    mean_glucose_excursion, mean_glucose_in_range, summary, time_above, time_below,
    time_in_range, time_in_range_70_180, time_in_tight_range, time_outside_range, RiskProfile,
};
use serde::{Deserialize, Serialize};

/// Metric columns, in output order.
pub const METRIC_COLUMNS: [&str; 28] = [
    "mean",
    "median",
    "min",
    "max",
    "fq",
    "tq",
    "interdaysd",
    "interdaycv",
    "TOR",
    "TIR",
    "MGE",
    "MGN",
    "J_index",
    "LBGI",
    "HBGI",
    "ADRR",
    "TA140",
    "TA200",
    "TIR_70_180",
    "TA180",
    "TA250",
    "TB70",
    "TB54",
    "TITR",
    "GRI",
    "PA140",
    "PA180",
    "PA200",
];

/// Number of leading metric columns reported in random-day mode.
pub const RANDOM_DAY_METRICS: usize = 18;

/// All metrics of one window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowFeatures {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// First quartile.
    pub fq: f64,
    /// Third quartile.
    pub tq: f64,
    pub interdaysd: f64,
    pub interdaycv: f64,
    #[serde(rename = "TOR")]
    pub tor: f64,
    #[serde(rename = "TIR")]
    pub tir: f64,
    #[serde(rename = "MGE")]
    pub mge: f64,
    #[serde(rename = "MGN")]
    pub mgn: f64,
    #[serde(rename = "J_index")]
    pub j_index: f64,
    #[serde(rename = "LBGI")]
    pub lbgi: f64,
    #[serde(rename = "HBGI")]
    pub hbgi: f64,
    /// Daily risk range, single maximum over the window.
    #[serde(rename = "ADRR")]
    pub adrr: f64,
    #[serde(rename = "TA140")]
    pub ta140: f64,
    #[serde(rename = "TA200")]
    pub ta200: f64,
    #[serde(rename = "TIR_70_180")]
    pub tir_70_180: f64,
    #[serde(rename = "TA180")]
    pub ta180: f64,
    #[serde(rename = "TA250")]
    pub ta250: f64,
    #[serde(rename = "TB70")]
    pub tb70: f64,
    #[serde(rename = "TB54")]
    pub tb54: f64,
    /// Time in tight range, 70..=140 mg/dL.
    #[serde(rename = "TITR")]
    pub titr: f64,
    #[serde(rename = "GRI")]
    pub gri: f64,
    #[serde(rename = "PA140")]
    pub pa140: f64,
    #[serde(rename = "PA180")]
    pub pa180: f64,
    #[serde(rename = "PA200")]
    pub pa200: f64,
}

impl WindowFeatures {
    /// Compute every metric over a window's glucose values.
    ///
    /// `band_sd` is the width of the statistical band for TIR/TOR/MGE/MGN
    /// and `sr` the minutes credited per reading.
    pub fn compute(glucose: &[f64], band_sd: f64, sr: f64) -> Self {
        let stats = summary(glucose);
        let risk = RiskProfile::from_glucose(glucose);

        let ta180 = time_above(glucose, 180.0, sr);
        let ta250 = time_above(glucose, 250.0, sr);
        let tb70 = time_below(glucose, 70.0, sr);
        let tb54 = time_below(glucose, 54.0, sr);

        Self {
            mean: stats.mean,
            median: stats.median,
            min: stats.min,
            max: stats.max,
            fq: stats.q1,
            tq: stats.q3,
            interdaysd: interday_sd(glucose),
            interdaycv: interday_cv(glucose),
            tor: time_outside_range(glucose, band_sd, sr),
            tir: time_in_range(glucose, band_sd, sr),
            mge: mean_glucose_excursion(glucose, band_sd),
            mgn: mean_glucose_in_range(glucose, band_sd),
            j_index: j_index(glucose),
            lbgi: risk.lbgi(),
            hbgi: risk.hbgi(),
            adrr: risk.drr(),
            ta140: time_above(glucose, 140.0, sr),
            ta200: time_above(glucose, 200.0, sr),
            tir_70_180: time_in_range_70_180(glucose, sr),
            ta180,
            ta250,
            tb70,
            tb54,
            titr: time_in_tight_range(glucose, sr),
            gri: glucose_risk_index_from(tb54, tb70, ta250, ta180),
            pa140: f64::from(count_peaks(glucose, 140.0)),
            pa180: f64::from(count_peaks(glucose, 180.0)),
            pa200: f64::from(count_peaks(glucose, 200.0)),
        }
    }

    /// Raw values in [`METRIC_COLUMNS`] order.
    pub fn values(&self) -> [f64; 28] {
        [
            self.mean,
            self.median,
            self.min,
            self.max,
            self.fq,
            self.tq,
            self.interdaysd,
            self.interdaycv,
            self.tor,
            self.tir,
            self.mge,
            self.mgn,
            self.j_index,
            self.lbgi,
            self.hbgi,
            self.adrr,
            self.ta140,
            self.ta200,
            self.tir_70_180,
            self.ta180,
            self.ta250,
            self.tb70,
            self.tb54,
            self.titr,
            self.gri,
            self.pa140,
            self.pa180,
            self.pa200,
        ]
    }

    /// Values as table cells; non-finite results become `None`.
    pub fn cells(&self) -> [Option<f64>; 28] {
        self.values().map(|v| v.is_finite().then_some(v))
    }

    /// Look up a metric by column name.
    pub fn get(&self, column: &str) -> Option<f64> {
        METRIC_COLUMNS
            .iter()
            .position(|&c| c == column)
            .map(|i| self.values()[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::DEFAULT_SAMPLING_RATE;

    fn day_of(glucose: f64) -> Vec<f64> {
        vec![glucose; 288]
    }

    #[test]
    fn test_columns_match_serde_names() {
        let features = WindowFeatures::compute(&[100.0, 150.0, 200.0], 1.0, DEFAULT_SAMPLING_RATE);
        let json = serde_json::to_value(features).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), METRIC_COLUMNS.len());
        for (column, value) in METRIC_COLUMNS.iter().zip(features.values()) {
            let encoded = object[*column].as_f64().unwrap();
            assert!((encoded - value).abs() <= 1e-9 * value.abs().max(1.0), "{}", column);
        }
    }

    #[test]
    fn test_steady_day() {
        let glucose = day_of(120.0);
        let features = WindowFeatures::compute(&glucose, 1.0, DEFAULT_SAMPLING_RATE);

        assert_eq!(features.mean, 120.0);
        assert_eq!(features.interdaysd, 0.0);
        assert_eq!(features.tir, 1440.0);
        assert_eq!(features.tor, 0.0);
        assert_eq!(features.mge, 120.0);
        assert_eq!(features.mgn, 120.0);
        assert_eq!(features.tir_70_180, 1440.0);
        assert_eq!(features.titr, 1440.0);
        assert_eq!(features.gri, 0.0);
        assert_eq!(features.pa140, 0.0);
        // 120 mg/dL sits on the high side of the risk transform
        assert_eq!(features.lbgi, 0.0);
    }

    #[test]
    fn test_high_day() {
        let glucose = day_of(260.0);
        let features = WindowFeatures::compute(&glucose, 1.0, DEFAULT_SAMPLING_RATE);

        assert_eq!(features.ta250, 1440.0);
        assert_eq!(features.ta180, 1440.0);
        assert_eq!(features.tb70, 0.0);
        assert_eq!(features.gri, 1.6 * 1440.0 + 0.8 * 1440.0);
        assert_eq!(features.pa200, 1.0);
        assert_eq!(features.lbgi, 0.0);
        assert!(features.hbgi > 0.0);
    }

    #[test]
    fn test_cells_hide_non_finite() {
        // A sub-1 mg/dL reading leaves the risk transform undefined
        let mut glucose = day_of(120.0);
        glucose[10] = 0.5;
        let cells = WindowFeatures::compute(&glucose, 1.0, DEFAULT_SAMPLING_RATE).cells();
        let lbgi = METRIC_COLUMNS.iter().position(|&c| c == "LBGI").unwrap();
        let mge = METRIC_COLUMNS.iter().position(|&c| c == "MGE").unwrap();

        assert_eq!(cells[lbgi], None);
        assert_eq!(cells[mge], Some(0.5));
    }

    #[test]
    fn test_get_by_column() {
        let features = WindowFeatures::compute(&[100.0, 200.0], 1.0, DEFAULT_SAMPLING_RATE);
        assert_eq!(features.get("mean"), Some(150.0));
        assert_eq!(features.get("TA140"), Some(5.0));
        assert_eq!(features.get("nope"), None);
    }
}
