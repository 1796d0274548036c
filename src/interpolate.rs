//! Interior gap filling with piecewise quadratics.
//!
//! Each run of absent readings gets its own quadratic, a least-squares fit
//! over up to [`GAP_NEIGHBOURS`] present readings on either side of the run,
//! parameterized by sample position. Readings away from the gap have no
//! influence on it. Exact quadratics and lines are reproduced. Only gaps
//! between the first and last present reading are filled.

use crate::series::Sample;

/// Fewest present readings a window needs before any gap is filled.
pub const MIN_KNOTS: usize = 3;

/// Present readings taken from each side of a gap.
pub const GAP_NEIGHBOURS: usize = 3;

/// Quadratic `c0 + c1 t + c2 t²` in `t = x - center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalQuadratic {
    center: f64,
    coefficients: [f64; 3],
}

impl LocalQuadratic {
    /// Least-squares fit through `(x, y)` knots with distinct `x`.
    ///
    /// Returns `None` with fewer than [`MIN_KNOTS`] knots or when the knots
    /// do not determine a quadratic.
    pub fn fit(knots: &[(f64, f64)]) -> Option<Self> {
        if knots.len() < MIN_KNOTS {
            return None;
        }
        let center = knots.iter().map(|&(x, _)| x).sum::<f64>() / knots.len() as f64;

        // Power sums of t and moments of y against t
        let mut s = [0.0; 5];
        let mut m = [0.0; 3];
        for &(x, y) in knots {
            let t = x - center;
            let mut p = 1.0;
            for k in 0..5 {
                s[k] += p;
                if k < 3 {
                    m[k] += y * p;
                }
                p *= t;
            }
        }

        let normal = [[s[0], s[1], s[2]], [s[1], s[2], s[3]], [s[2], s[3], s[4]]];
        let det = det3(&normal);
        if !det.is_finite() || det.abs() < 1e-9 {
            return None;
        }

        // Cramer's rule
        let mut coefficients = [0.0; 3];
        for (j, c) in coefficients.iter_mut().enumerate() {
            let mut replaced = normal;
            for (row, &rhs) in replaced.iter_mut().zip(&m) {
                row[j] = rhs;
            }
            *c = det3(&replaced) / det;
        }

        Some(Self {
            center,
            coefficients,
        })
    }

    /// Value at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        let t = x - self.center;
        let [c0, c1, c2] = self.coefficients;
        c0 + c1 * t + c2 * t * t
    }
}

fn det3(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Fill interior `NaN` entries of `values` in place, using the index as the
/// fit parameter. Returns the number of entries filled.
pub fn fill_gaps(values: &mut [f64]) -> usize {
    let present: Vec<usize> = (0..values.len()).filter(|&i| !values[i].is_nan()).collect();
    if present.len() < MIN_KNOTS {
        return 0;
    }

    let mut filled = 0;
    // Consecutive present readings with absent ones between them bound a gap
    for (p, pair) in present.windows(2).enumerate() {
        let (before, after) = (pair[0], pair[1]);
        if after - before < 2 {
            continue;
        }

        let left = &present[(p + 1).saturating_sub(GAP_NEIGHBOURS)..=p];
        let right = &present[p + 1..(p + 1 + GAP_NEIGHBOURS).min(present.len())];
        let knots: Vec<(f64, f64)> = left
            .iter()
            .chain(right)
            .map(|&i| (i as f64, values[i]))
            .collect();

        let fill = match LocalQuadratic::fit(&knots) {
            Some(q) => q,
            None => continue,
        };
        for (i, value) in values.iter_mut().enumerate().take(after).skip(before + 1) {
            *value = fill.evaluate(i as f64);
            filled += 1;
        }
    }
    filled
}

/// Copy of `samples` with interior absent readings interpolated.
pub fn interpolate_samples(samples: &[Sample]) -> Vec<Sample> {
    let mut glucose: Vec<f64> = samples.iter().map(|s| s.glucose).collect();
    fill_gaps(&mut glucose);
    samples
        .iter()
        .zip(glucose)
        .map(|(s, g)| Sample::new(s.time, g))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAN: f64 = f64::NAN;
    const JITTER: [f64; 6] = [0.0, 3.0, -2.0, 4.0, -3.0, 1.0];

    #[test]
    fn test_reproduces_quadratic() {
        let mut values: Vec<f64> = (0..12).map(|i| 100.0 + 2.0 * (i * i) as f64).collect();
        let expected = values.clone();
        for i in [2, 5, 6, 9] {
            values[i] = NAN;
        }

        assert_eq!(fill_gaps(&mut values), 4);
        for (got, want) in values.iter().zip(&expected) {
            assert!((got - want).abs() < 1e-9, "{} != {}", got, want);
        }
    }

    #[test]
    fn test_reproduces_line() {
        let mut values = vec![10.0, NAN, 14.0, 16.0, NAN, NAN, 22.0];
        assert_eq!(fill_gaps(&mut values), 3);
        let expected = [10.0, 12.0, 14.0, 16.0, 18.0, 20.0, 22.0];
        for (got, want) in values.iter().zip(&expected) {
            assert!((got - want).abs() < 1e-9);
        }
    }

    #[test]
    fn test_edges_are_not_extrapolated() {
        let mut values = vec![NAN, 100.0, 110.0, NAN, 130.0, NAN];
        assert_eq!(fill_gaps(&mut values), 1);
        assert!(values[0].is_nan());
        assert!((values[3] - 120.0).abs() < 1e-9);
        assert!(values[5].is_nan());
    }

    #[test]
    fn test_too_few_knots_leaves_gaps() {
        let mut values = vec![100.0, NAN, 120.0];
        assert_eq!(fill_gaps(&mut values), 0);
        assert!(values[1].is_nan());
        assert!(LocalQuadratic::fit(&[(0.0, 1.0), (1.0, 2.0)]).is_none());
    }

    #[test]
    fn test_fit_through_three_knots_is_exact() {
        let knots = [(0.0, 100.0), (1.0, 130.0), (3.0, 90.0)];
        let q = LocalQuadratic::fit(&knots).unwrap();
        for &(x, y) in &knots {
            assert!((q.evaluate(x) - y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_jittery_flat_day_gap_stays_near_neighbours() {
        let mut values: Vec<f64> = (0..288).map(|i| 120.0 + JITTER[i % 6]).collect();
        // 30 minute dropout
        for v in &mut values[150..156] {
            *v = NAN;
        }

        assert_eq!(fill_gaps(&mut values), 6);
        for &v in &values[150..156] {
            assert!((v - 120.0).abs() < 5.0, "filled {}", v);
        }
    }

    #[test]
    fn test_jittery_sine_day_gaps_stay_near_neighbours() {
        let mut values: Vec<f64> = (0..288)
            .map(|i| {
                let phase = i as f64 / 288.0 * std::f64::consts::TAU;
                120.0 + 30.0 * phase.sin() + JITTER[i % 6]
            })
            .collect();
        for i in [60, 61, 62, 200, 201, 202, 203, 204, 205] {
            values[i] = NAN;
        }

        assert_eq!(fill_gaps(&mut values), 9);
        for (gap, before, after) in [(60..63, 59, 63), (200..206, 199, 206)] {
            let lo = values[before].min(values[after]) - 10.0;
            let hi = values[before].max(values[after]) + 10.0;
            for &v in &values[gap] {
                assert!(v > lo && v < hi, "filled {} outside {}..{}", v, lo, hi);
            }
        }
    }

    #[test]
    fn test_interpolate_samples_keeps_times() {
        use chrono::{Duration, NaiveDate};
        let start = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let samples: Vec<Sample> = [100.0, NAN, 120.0, 130.0]
            .iter()
            .enumerate()
            .map(|(i, &g)| Sample::new(start + Duration::minutes(5 * i as i64), g))
            .collect();

        let filled = interpolate_samples(&samples);
        assert_eq!(filled.len(), 4);
        assert_eq!(filled[1].time, samples[1].time);
        assert!((filled[1].glucose - 110.0).abs() < 1e-9);
    }
}
