//! NaN-omitting descriptive statistics.
//!
//! Absent readings are `NaN`; every function here skips them. An input with
//! no present value yields `NaN`.

/// Iterate over present values.
pub fn present(values: &[f64]) -> impl Iterator<Item = f64> + '_ {
    values.iter().copied().filter(|v| !v.is_nan())
}

/// Number of present values.
pub fn present_count(values: &[f64]) -> usize {
    present(values).count()
}

/// Arithmetic mean of present values.
pub fn nan_mean(values: &[f64]) -> f64 {
    let (sum, n) = present(values).fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

/// Population standard deviation (divides by N) of present values.
pub fn nan_std(values: &[f64]) -> f64 {
    let mean = nan_mean(values);
    if mean.is_nan() {
        return f64::NAN;
    }
    let (sum_sq, n) = present(values).fold((0.0, 0usize), |(s, n), v| {
        (s + (v - mean) * (v - mean), n + 1)
    });
    (sum_sq / n as f64).sqrt()
}

/// Smallest present value.
pub fn nan_min(values: &[f64]) -> f64 {
    present(values).reduce(f64::min).unwrap_or(f64::NAN)
}

/// Largest present value.
pub fn nan_max(values: &[f64]) -> f64 {
    present(values).reduce(f64::max).unwrap_or(f64::NAN)
}

/// Median of present values; mean of the two middle values for even counts.
pub fn nan_median(values: &[f64]) -> f64 {
    let sorted = sorted_present(values);
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Percentile `q` in `[0, 100]` with linear interpolation between order
/// statistics at position `q/100 * (n - 1)`.
pub fn nan_percentile(values: &[f64], q: f64) -> f64 {
    let sorted = sorted_present(values);
    if sorted.is_empty() || !(0.0..=100.0).contains(&q) {
        return f64::NAN;
    }

    let pos = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let t = pos - lo as f64;
    lerp(sorted[lo], sorted[hi], t)
}

/// Largest value, propagating `NaN` if any entry is `NaN`. Empty input
/// yields `NaN`.
pub fn max_propagating(values: &[f64]) -> f64 {
    let mut iter = values.iter().copied();
    let Some(first) = iter.next() else {
        return f64::NAN;
    };
    iter.fold(first, |acc, v| {
        if acc.is_nan() || v.is_nan() {
            f64::NAN
        } else {
            acc.max(v)
        }
    })
}

/// Plain mean over every entry, `NaN` included.
pub fn mean_propagating(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn sorted_present(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = present(values).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

// Symmetric form keeps the result monotone in t and exact at both ends.
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let diff = b - a;
    if t >= 0.5 {
        b - diff * (1.0 - t)
    } else {
        a + diff * t
    }
}
