//! Statistical-band and fixed-bound range metrics.
//!
//! The band is `mean ± sd * std` of the present readings. Time-in-range and
//! time-outside-range partition the present readings, so their sum is always
//! `present_count * sr`.

use super::stats::{nan_mean, nan_std};

/// Closed glucose interval `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub lower: f64,
    pub upper: f64,
}

impl Band {
    /// Fixed bounds.
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// `mean ± sd * std` of `glucose`. Undefined (`NaN` bounds) when no
    /// reading is present, in which case nothing is inside or outside.
    pub fn around_mean(glucose: &[f64], sd: f64) -> Self {
        let mean = nan_mean(glucose);
        let std = nan_std(glucose);
        Self {
            lower: mean - sd * std,
            upper: mean + sd * std,
        }
    }

    /// Reading lies within the band, bounds inclusive.
    pub fn contains(&self, g: f64) -> bool {
        g >= self.lower && g <= self.upper
    }

    /// Reading lies strictly outside the band.
    pub fn excludes(&self, g: f64) -> bool {
        g < self.lower || g > self.upper
    }

    /// Reading lies on a bound or outside the band.
    pub fn reaches(&self, g: f64) -> bool {
        g <= self.lower || g >= self.upper
    }
}

/// Minutes spent within `mean ± sd * std`.
pub fn time_in_range(glucose: &[f64], sd: f64, sr: f64) -> f64 {
    let band = Band::around_mean(glucose, sd);
    count(glucose, |g| band.contains(g)) as f64 * sr
}

/// Minutes spent outside `mean ± sd * std`.
pub fn time_outside_range(glucose: &[f64], sd: f64, sr: f64) -> f64 {
    let band = Band::around_mean(glucose, sd);
    count(glucose, |g| band.excludes(g)) as f64 * sr
}

/// Time in range as a percentage of the record length (absent entries
/// included in the denominator).
pub fn percent_in_range(glucose: &[f64], sd: f64, sr: f64) -> f64 {
    time_in_range(glucose, sd, sr) / (glucose.len() as f64 * sr) * 100.0
}

/// Time outside range as a percentage of the record length.
pub fn percent_outside_range(glucose: &[f64], sd: f64, sr: f64) -> f64 {
    time_outside_range(glucose, sd, sr) / (glucose.len() as f64 * sr) * 100.0
}

/// Minutes spent within the fixed bounds `[dw, up]`.
pub fn time_in_bounds(glucose: &[f64], up: f64, dw: f64, sr: f64) -> f64 {
    let band = Band::new(dw, up);
    count(glucose, |g| band.contains(g)) as f64 * sr
}

/// Time in the clinical target range, 70..=180 mg/dL.
pub fn time_in_range_70_180(glucose: &[f64], sr: f64) -> f64 {
    time_in_bounds(glucose, 180.0, 70.0, sr)
}

/// Time in the tight target range, 70..=140 mg/dL.
pub fn time_in_tight_range(glucose: &[f64], sr: f64) -> f64 {
    time_in_bounds(glucose, 140.0, 70.0, sr)
}

/// Mean glucose excursion: mean of readings on or beyond the band bounds.
///
/// Unlike time outside range, readings on a bound count, so a flat record
/// reports its own level.
pub fn mean_glucose_excursion(glucose: &[f64], sd: f64) -> f64 {
    let band = Band::around_mean(glucose, sd);
    let outside: Vec<f64> = glucose.iter().copied().filter(|&g| band.reaches(g)).collect();
    nan_mean(&outside)
}

/// Mean of readings inside the band.
pub fn mean_glucose_in_range(glucose: &[f64], sd: f64) -> f64 {
    let band = Band::around_mean(glucose, sd);
    let inside: Vec<f64> = glucose.iter().copied().filter(|&g| band.contains(g)).collect();
    nan_mean(&inside)
}

fn count(glucose: &[f64], pred: impl Fn(f64) -> bool) -> usize {
    glucose.iter().filter(|&&g| pred(g)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAN: f64 = f64::NAN;

    #[test]
    fn test_band_around_mean() {
        let band = Band::around_mean(&[90.0, 110.0], 1.0);
        assert!((band.lower - 90.0).abs() < 1e-12);
        assert!((band.upper - 110.0).abs() < 1e-12);
        assert!(band.contains(100.0));
        assert!(!band.excludes(100.0));
    }

    #[test]
    fn test_absent_readings_are_neither_inside_nor_outside() {
        let band = Band::new(70.0, 180.0);
        assert!(!band.contains(NAN));
        assert!(!band.excludes(NAN));
    }

    #[test]
    fn test_tir_tor_partition() {
        let glucose = [60.0, 80.0, 100.0, 120.0, 140.0, 200.0, 250.0];
        for sd in [0.0, 0.5, 1.0, 2.0] {
            let total = time_in_range(&glucose, sd, 5.0) + time_outside_range(&glucose, sd, 5.0);
            assert_eq!(total, glucose.len() as f64 * 5.0);
        }
    }

    #[test]
    fn test_constant_window_is_all_in_range() {
        let glucose = [120.0; 12];
        assert_eq!(time_in_range(&glucose, 1.0, 5.0), 60.0);
        assert_eq!(time_outside_range(&glucose, 1.0, 5.0), 0.0);
        assert!(mean_glucose_excursion(&glucose, 1.0).is_nan());
        assert_eq!(mean_glucose_in_range(&glucose, 1.0), 120.0);
    }

    #[test]
    fn test_percentages() {
        // mean 100, std ~7.07: two readings in, two out
        let glucose = [100.0, 100.0, 90.0, 110.0];
        let pir = percent_in_range(&glucose, 1.0, 5.0);
        let por = percent_outside_range(&glucose, 1.0, 5.0);
        assert!((pir + por - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_bounds_inclusive() {
        let glucose = [69.9, 70.0, 140.0, 140.1, 180.0, 180.1, NAN];
        assert_eq!(time_in_range_70_180(&glucose, 5.0), 20.0);
        assert_eq!(time_in_tight_range(&glucose, 5.0), 10.0);
        assert_eq!(time_in_bounds(&glucose, 140.0, 70.0, 15.0), 30.0);
    }

    #[test]
    fn test_mge_and_mgn() {
        // mean 100, std sqrt(200) ~ 14.14: band ~ [85.86, 114.14]
        let glucose = [80.0, 100.0, 100.0, 120.0];
        assert_eq!(mean_glucose_excursion(&glucose, 1.0), 100.0);
        assert_eq!(mean_glucose_in_range(&glucose, 1.0), 100.0);

        let skewed = [70.0, 100.0, 100.0, 100.0];
        // mean 92.5, std ~12.99: 70 is outside
        assert_eq!(mean_glucose_excursion(&skewed, 1.0), 70.0);
        assert_eq!(mean_glucose_in_range(&skewed, 1.0), 100.0);
    }

    #[test]
    fn test_mge_counts_band_edges() {
        let flat = [120.0; 288];
        assert_eq!(mean_glucose_excursion(&flat, 1.0), 120.0);
        assert_eq!(mean_glucose_in_range(&flat, 1.0), 120.0);
        // The strict partition still puts every reading in range
        assert_eq!(time_outside_range(&flat, 1.0, 5.0), 0.0);

        // Zero-width band: every reading sits on or beyond a bound
        let glucose = [90.0, 100.0, 110.0];
        assert_eq!(mean_glucose_excursion(&glucose, 0.0), 100.0);

        let band = Band::new(90.0, 110.0);
        assert!(band.reaches(90.0) && band.reaches(110.0) && band.reaches(130.0));
        assert!(!band.reaches(100.0));
        assert!(!band.reaches(NAN));
    }
}
