//! Threshold metrics: time above/below, GRI, peak counting and
//! episode-duration time above threshold.

use crate::series::Sample;
use std::ops::Range;

/// Minutes credited to readings at or above `thres`.
pub fn time_above(glucose: &[f64], thres: f64, sr: f64) -> f64 {
    glucose.iter().filter(|&&g| g >= thres).count() as f64 * sr
}

/// Minutes credited to readings at or below `thres`.
pub fn time_below(glucose: &[f64], thres: f64, sr: f64) -> f64 {
    glucose.iter().filter(|&&g| g <= thres).count() as f64 * sr
}

/// Glucose risk index from its four components (minutes).
pub fn glucose_risk_index_from(tb54: f64, tb70: f64, ta250: f64, ta180: f64) -> f64 {
    3.0 * tb54 + 2.4 * tb70 + 1.6 * ta250 + 0.8 * ta180
}

/// Glucose risk index: weighted time below 54/70 and above 250/180.
pub fn glucose_risk_index(glucose: &[f64], sr: f64) -> f64 {
    glucose_risk_index_from(
        time_below(glucose, 54.0, sr),
        time_below(glucose, 70.0, sr),
        time_above(glucose, 250.0, sr),
        time_above(glucose, 180.0, sr),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PeakState {
    Below,
    Above,
}

/// Number of excursions above `threshold`.
///
/// Rising strictly above the threshold opens an episode; falling strictly
/// below closes it and counts one peak. An episode still open at the end of
/// the series counts once. Absent readings never change state.
pub fn count_peaks(glucose: &[f64], threshold: f64) -> u32 {
    let mut peaks = 0;
    let mut state = PeakState::Below;

    for &g in glucose {
        match state {
            PeakState::Above if g < threshold => {
                peaks += 1;
                state = PeakState::Below;
            }
            PeakState::Below if g > threshold => state = PeakState::Above,
            _ => {}
        }
    }

    if state == PeakState::Above {
        peaks += 1;
    }
    peaks
}

/// Maximal run of consecutive readings sharing the same side of a threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    /// Readings in the run are strictly above the threshold.
    pub above: bool,
    /// Sample indices covered by the run.
    pub range: Range<usize>,
    /// Elapsed minutes from the first to the last reading of the run.
    pub duration_minutes: f64,
}

/// Segment the series into episodes at every change of `g > thres`.
/// Absent readings fall on the not-above side.
pub fn threshold_episodes(samples: &[Sample], thres: f64) -> Vec<Episode> {
    let mut episodes: Vec<Episode> = Vec::new();

    for (i, sample) in samples.iter().enumerate() {
        let above = sample.glucose > thres;
        match episodes.last_mut() {
            Some(current) if current.above == above => {
                let step = sample.time - samples[i - 1].time;
                current.duration_minutes += step.num_milliseconds() as f64 / 60_000.0;
                current.range.end = i + 1;
            }
            _ => episodes.push(Episode {
                above,
                range: i..i + 1,
                duration_minutes: 0.0,
            }),
        }
    }

    episodes
}

/// Total minutes spent above `thres`, weighting real time between readings
/// rather than counting samples.
///
/// Each above-threshold episode contributes the elapsed time from its first
/// to its last reading, plus one sampling interval `sr` for the span covered
/// by its last reading. On a gap-free regular series this equals
/// [`time_above`] with a strict threshold.
pub fn time_above_revised(samples: &[Sample], thres: f64, sr: f64) -> f64 {
    threshold_episodes(samples, thres)
        .iter()
        .filter(|e| e.above)
        .map(|e| e.duration_minutes + sr)
        .sum()
}
