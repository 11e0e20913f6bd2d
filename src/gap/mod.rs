//! Detection of discontinuities in a 1D sequence of timestamps.


use log::{debug, warn};

use crate::math::{consecutive_deltas, median, positive_deltas};

/// A time gap is anything larger than this many times the median cadence.
pub const TIME_GAP_FACTOR: f64 = 5.0;

/// Indices of the samples immediately *after* a detected discontinuity.
/// Strictly increasing; never contains 0 (except in the single-sample
/// convention, see [`detect_gaps`]).
pub type GapList = Vec<usize>;

/// Get the threshold that separates a normal cadence from a gap,
/// i.e. [`TIME_GAP_FACTOR`] times the median of the strictly-positive deltas.
/// `None` if there are no positive deltas.
pub fn cadence_threshold(timestamps: &[f64]) -> Option<f64> {
    median(&positive_deltas(timestamps)).map(|m| m * TIME_GAP_FACTOR)
}

/// Find the gaps in `timestamps`. If `threshold` isn't supplied, it is derived
/// with [`cadence_threshold`].
///
/// No samples yields no gaps. A single sample yields `[0, 1]`, i.e. the
/// boundaries of the single group.
pub fn detect_gaps(timestamps: &[f64], threshold: Option<f64>) -> GapList {
    match timestamps.len() {
        0 => return vec![],
        1 => return vec![0, 1],
        _ => (),
    }

    let threshold = match threshold.or_else(|| cadence_threshold(timestamps)) {
        Some(t) => t,
        None => {
            warn!("All {} timestamps are identical; no time gaps can be detected", timestamps.len());
            return vec![];
        }
    };
    debug!("Time gap threshold: {threshold} s");

    consecutive_deltas(timestamps)
        .into_iter()
        .enumerate()
        .filter(|(_, dt)| *dt > threshold)
        .map(|(i, _)| i + 1)
        .collect()
}

/// Turn a gap list into `(start, end)` index ranges covering `0..num_samples`.
/// Gap lists that use the single-sample convention are handled too.
pub fn gaps_to_ranges(gaps: &[usize], num_samples: usize) -> Vec<std::ops::Range<usize>> {
    if num_samples == 0 {
        return vec![];
    }
    let mut ranges = vec![];
    let mut start = 0;
    for &g in gaps.iter().filter(|&&g| g > 0 && g < num_samples) {
        ranges.push(start..g);
        start = g;
    }
    ranges.push(start..num_samples);
    ranges
}
