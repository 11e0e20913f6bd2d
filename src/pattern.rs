//! Classifying the pointing pattern of an observation.

use std::fmt;

use log::{debug, info};

use crate::PosDict;

/// How the telescope was pointed during an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservingPattern {
    /// Many independent positions; a mapping observation.
    Raster,

    /// Every pointing is at the same position.
    SinglePoint,

    /// A handful of independent positions.
    MultiPoint,
}

impl ObservingPattern {
    /// Classify by the number of independent positions (representative
    /// entries of `pos_dict`) among `ids`. More than `sqrt(len(ids))` or more
    /// than 10 positions is a raster.
    pub fn analyse(pos_dict: &PosDict, ids: &[usize]) -> ObservingPattern {
        let num_positions = ids
            .iter()
            .filter(|id| pos_dict.get(id).map(|e| e.is_representative()).unwrap_or(false))
            .count()
            .max(1);
        debug!(
            "Number of spectra: {}, number of independent positions: {num_positions}",
            ids.len()
        );

        let pattern = if ids.is_empty() {
            ObservingPattern::SinglePoint
        } else if num_positions as f64 > (ids.len() as f64).sqrt() || num_positions > 10 {
            ObservingPattern::Raster
        } else if num_positions == 1 {
            ObservingPattern::SinglePoint
        } else {
            ObservingPattern::MultiPoint
        };
        info!("Pattern is {pattern}");
        pattern
    }
}

impl fmt::Display for ObservingPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ObservingPattern::Raster => "RASTER",
                ObservingPattern::SinglePoint => "SINGLE-POINT",
                ObservingPattern::MultiPoint => "MULTI-POINT",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group_by_position;

    fn classify(ra: &[f64], dec: &[f64]) -> ObservingPattern {
        let ids: Vec<usize> = (0..ra.len()).collect();
        let (pos_dict, _, _) = group_by_position(&ids, &ids, ra, dec, 0.01, 0.001).unwrap();
        ObservingPattern::analyse(&pos_dict, &ids)
    }

    #[test]
    fn test_single_point() {
        assert_eq!(classify(&[1.0; 20], &[2.0; 20]), ObservingPattern::SinglePoint);
    }

    #[test]
    fn test_multi_point() {
        // Three positions, 10 integrations each.
        let mut ra = vec![];
        for p in [0.0, 1.0, 2.0] {
            ra.extend([p; 10]);
        }
        assert_eq!(classify(&ra, &[0.0; 30]), ObservingPattern::MultiPoint);
    }

    #[test]
    fn test_raster() {
        let ra: Vec<f64> = (0..16).map(|i| (i % 4) as f64 * 0.1).collect();
        let dec: Vec<f64> = (0..16).map(|i| (i / 4) as f64 * 0.1).collect();
        // 16 positions > sqrt(16).
        assert_eq!(classify(&ra, &dec), ObservingPattern::Raster);
    }

    #[test]
    fn test_empty() {
        assert_eq!(
            ObservingPattern::analyse(&PosDict::new(), &[]),
            ObservingPattern::SinglePoint
        );
        assert_eq!(ObservingPattern::Raster.to_string(), "RASTER");
    }
}
