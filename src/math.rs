//! Robust statistics shared by the grouping heuristics.

use std::cmp::Ordering;

/// The median of the supplied values. For an even number of values this is
/// the mean of the two middle values. NaNs are ignored; `None` is returned if
/// nothing is left.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut v: Vec<f64> = values.iter().copied().filter(|x| !x.is_nan()).collect();
    if v.is_empty() {
        return None;
    }
    v.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = v.len() / 2;
    if v.len() % 2 == 0 {
        Some((v[mid - 1] + v[mid]) * 0.5)
    } else {
        Some(v[mid])
    }
}

/// `out[i] = values[i + 1] - values[i]`.
pub fn consecutive_deltas(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Only the strictly positive deltas; simultaneous samples (e.g. multiple
/// beams sharing a timestamp) don't say anything about the cadence.
pub fn positive_deltas(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|dt| *dt > 0.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_abs_diff_eq!(median(&[3.0, 1.0, 2.0]).unwrap(), 2.0);
        assert_abs_diff_eq!(median(&[4.0, 1.0, 3.0, 2.0]).unwrap(), 2.5);
        assert_abs_diff_eq!(median(&[7.0]).unwrap(), 7.0);
    }

    #[test]
    fn test_median_empty_and_nan() {
        assert!(median(&[]).is_none());
        assert!(median(&[f64::NAN]).is_none());
        assert_abs_diff_eq!(median(&[f64::NAN, 1.0, 5.0, 3.0]).unwrap(), 3.0);
    }

    #[test]
    fn test_deltas() {
        let t = [0.0, 1.0, 1.0, 3.0];
        assert_eq!(consecutive_deltas(&t), vec![1.0, 0.0, 2.0]);
        assert_eq!(positive_deltas(&t), vec![1.0, 2.0]);
        assert!(consecutive_deltas(&[1.0]).is_empty());
        assert!(positive_deltas(&[]).is_empty());
    }
}
