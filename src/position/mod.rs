//! Grouping samples by their sky positions.


use std::collections::BTreeMap;

use log::{debug, info, trace, warn};

use crate::{
    math::median,
    sample::{check_len, check_position},
    GapList, GroupingError,
};

/// A position gap is anything larger than this many times the median step
/// between pointings.
pub const POSITION_GAP_FACTOR: f64 = 10.0;

/// What a sample's position cell says about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosEntry {
    /// The first sample in its lattice cell. Holds every member of the cell,
    /// itself included, in input order.
    Representative { rows: Vec<usize>, ids: Vec<usize> },

    /// Another member of a cell; refers to the cell's representative.
    Alias { row: usize, id: usize },
}

impl PosEntry {
    pub fn is_representative(&self) -> bool {
        matches!(self, PosEntry::Representative { .. })
    }
}

/// Sample id -> its [`PosEntry`].
pub type PosDict = BTreeMap<usize, PosEntry>;

/// Group samples into square lattice cells of side `2 * combine_radius` and
/// find the position gaps between consecutive samples.
///
/// Positions and radii must use the same angular unit. `allowance_radius` is
/// the step size below which two consecutive pointings are considered the
/// same; those steps don't contribute to the gap threshold.
///
/// Returns the cell structure, the position gaps (as sample ids) and the gap
/// threshold that was used.
pub fn group_by_position(
    ids: &[usize],
    rows: &[usize],
    ra: &[f64],
    dec: &[f64],
    combine_radius: f64,
    allowance_radius: f64,
) -> Result<(PosDict, GapList, f64), GroupingError> {
    check_len("ROW", ids.len(), rows.len())?;
    check_len("RA", ids.len(), ra.len())?;
    check_len("DEC", ids.len(), dec.len())?;
    check_radius("combine", combine_radius)?;
    check_radius("allowance", allowance_radius)?;
    for ((&id, &r), &d) in ids.iter().zip(ra).zip(dec) {
        check_position(id, r, d)?;
    }

    if ids.is_empty() {
        return Ok((PosDict::new(), vec![], 0.0));
    }

    let pos_dict = lattice_cells(ids, rows, ra, dec, combine_radius);
    debug!(
        "{} samples fall in {} position cells",
        ids.len(),
        pos_dict.values().filter(|e| e.is_representative()).count()
    );

    let delta_p: Vec<f64> = ra
        .windows(2)
        .zip(dec.windows(2))
        .map(|(r, d)| (r[1] - r[0]).hypot(d[1] - d[0]))
        .collect();
    let significant: Vec<f64> = delta_p
        .iter()
        .copied()
        .filter(|&dp| dp > allowance_radius)
        .collect();
    let threshold = match median(&significant) {
        Some(m) => m * POSITION_GAP_FACTOR,
        None => {
            if !delta_p.is_empty() {
                warn!(
                    "No pointing step exceeds the allowance radius ({allowance_radius}); \
                     using a position gap threshold of 0"
                );
            }
            0.0
        }
    };
    debug!("Position gap threshold: {threshold}");

    let mut pos_gap = vec![];
    for (i, &dp) in delta_p.iter().enumerate() {
        if dp > threshold {
            trace!("Position gap {dp} at id={}", ids[i + 1]);
            pos_gap.push(ids[i + 1]);
        }
    }
    if pos_gap.is_empty() {
        info!("Found no position gap");
    } else {
        info!("Found {} position gap(s)", pos_gap.len());
    }

    Ok((pos_dict, pos_gap, threshold))
}

fn lattice_cells(
    ids: &[usize],
    rows: &[usize],
    ra: &[f64],
    dec: &[f64],
    combine_radius: f64,
) -> PosDict {
    let min_ra = ra.iter().copied().fold(f64::INFINITY, f64::min);
    let min_dec = dec.iter().copied().fold(f64::INFINITY, f64::min);
    let cell_size = 2.0 * combine_radius;

    // Cell -> indices of its members, in input order.
    let mut cells: BTreeMap<(i64, i64), Vec<usize>> = BTreeMap::new();
    for i in 0..ids.len() {
        let cell = (
            ((ra[i] - min_ra) / cell_size).floor() as i64,
            ((dec[i] - min_dec) / cell_size).floor() as i64,
        );
        cells.entry(cell).or_default().push(i);
    }

    let mut pos_dict = PosDict::new();
    for members in cells.into_values() {
        let first = members[0];
        for &i in &members[1..] {
            pos_dict.insert(
                ids[i],
                PosEntry::Alias {
                    row: rows[first],
                    id: ids[first],
                },
            );
        }
        pos_dict.insert(
            ids[first],
            PosEntry::Representative {
                rows: members.iter().map(|&i| rows[i]).collect(),
                ids: members.iter().map(|&i| ids[i]).collect(),
            },
        );
    }
    pos_dict
}

fn check_radius(name: &'static str, value: f64) -> Result<(), GroupingError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GroupingError::BadRadius { name, value })
    }
}
