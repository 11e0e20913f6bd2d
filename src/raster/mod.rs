//! Row and raster detection for raster-scan observations.
//!
//! A raster scan sweeps the telescope along one direction (a "row"), then
//! steps perpendicular to the sweep to start the next row. Once all rows are
//! done, the telescope jumps back to begin a new raster. Row boundaries are
//! time gaps; a row boundary is also a raster boundary when the perpendicular
//! step goes the "wrong" way, i.e. backwards relative to the usual row step.

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

use log::{debug, info, warn};
use ndarray::prelude::*;

use crate::{
    gap::{detect_gaps, gaps_to_ranges},
    math::median,
    sample::check_len,
    GapList, GroupingError, SampleTable,
};

/// Options for [`detect_raster_gaps`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterGapOptions {
    /// Use this as the row (time) gap threshold \[seconds\] instead of deriving
    /// one from the cadence.
    pub time_threshold: Option<f64>,

    /// Use this as the raster gap threshold instead of deriving one from the
    /// row boundaries.
    pub ddm: Option<f64>,

    /// Multiplies the projections of the row steps onto the perpendicular
    /// direction. Which sign is right depends on the scan direction convention;
    /// -1 suits rasters whose rows step to the left of the sweep direction.
    pub sign: f64,
}

impl Default for RasterGapOptions {
    fn default() -> Self {
        Self {
            time_threshold: None,
            ddm: None,
            sign: -1.0,
        }
    }
}

/// Find the row gaps and raster gaps of a raster scan.
///
/// `positions` has shape `(N, 2)` with (RA, Dec) on the second axis. Both
/// returned gap lists are indices into the samples; the raster gaps are a
/// subset of the row gaps.
pub fn detect_raster_gaps(
    positions: ArrayView2<f64>,
    timestamps: &[f64],
    options: &RasterGapOptions,
) -> Result<(GapList, GapList), GroupingError> {
    let (n, cols) = positions.dim();
    if cols != 2 {
        return Err(GroupingError::BadPositionShape { rows: n, cols });
    }
    check_len("TIME", n, timestamps.len())?;

    let row_gaps = detect_gaps(timestamps, options.time_threshold);
    let ranges = gaps_to_ranges(&row_gaps, n);
    if ranges.len() < 2 {
        debug!("Fewer than two raster rows; no raster gaps");
        return Ok((row_gaps, vec![]));
    }
    info!("Found {} raster row(s)", ranges.len());

    // The direction of travel within the first row.
    let first_row = positions.slice(s![ranges[0].clone(), ..]);
    if first_row.nrows() < 2 {
        warn!("The first raster row has only one sample; can't determine the scan direction");
        return Ok((row_gaps, vec![]));
    }
    let steps = &first_row.slice(s![1.., ..]) - &first_row.slice(s![..-1, ..]);
    let (dx, dy) = match (
        median(&steps.column(0).to_vec()),
        median(&steps.column(1).to_vec()),
    ) {
        (Some(dx), Some(dy)) => (dx, dy),
        _ => return Ok((row_gaps, vec![])),
    };
    let rot = arr2(&[[0.0, 1.0], [-1.0, 0.0]]);
    let perpendicular = rot.dot(&arr1(&[dx, dy]));
    debug!("Scan direction ({dx}, {dy}); perpendicular {perpendicular}");

    // Project each step across a row boundary onto the perpendicular.
    let boundaries: Vec<usize> = ranges[1..].iter().map(|r| r.start).collect();
    let projections: Vec<f64> = boundaries
        .iter()
        .map(|&g| {
            let step = &positions.row(g) - &positions.row(g - 1);
            options.sign * step.dot(&perpendicular)
        })
        .collect();

    let ddm = match options.ddm {
        Some(ddm) => ddm,
        // Checked above that there is at least one boundary.
        None => -median(&projections).unwrap_or(0.0).abs(),
    };
    debug!("Raster gap threshold: {ddm}");

    let raster_gaps: GapList = boundaries
        .iter()
        .zip(projections)
        .filter(|(_, p)| *p < ddm)
        .map(|(&g, _)| g)
        .collect();
    info!("Found {} raster gap(s)", raster_gaps.len());

    Ok((row_gaps, raster_gaps))
}

/// The samples of one raster-scan observation (one antenna and field), with
/// the spectral window and polarisation used to find gaps.
#[derive(Debug, Clone)]
pub struct Raster {
    table: SampleTable,

    /// The spectral window with the most samples (the lowest one wins ties).
    pub nominal_spw: u32,

    /// The polarisation with the most samples within `nominal_spw` (the lowest
    /// one wins ties).
    pub nominal_pol: u32,
}

impl Raster {
    /// Returns `None` if `table` is empty.
    pub fn new(table: SampleTable) -> Option<Raster> {
        let nominal_spw = most_common(table.samples().iter().map(|s| s.spw))?;
        let nominal_pol = most_common(
            table
                .samples()
                .iter()
                .filter(|s| s.spw == nominal_spw)
                .map(|s| s.pol),
        )?;
        debug!("Nominal spw {nominal_spw}, pol {nominal_pol}");
        Some(Raster {
            table,
            nominal_spw,
            nominal_pol,
        })
    }

    pub fn table(&self) -> &SampleTable {
        &self.table
    }

    /// Detect row and raster gaps using only the nominal spw/pol samples.
    /// Each gap is reported as the id of the sample starting the new row or
    /// raster.
    pub fn detect_gaps(
        &self,
        options: &RasterGapOptions,
    ) -> Result<(GapList, GapList), GroupingError> {
        let selected: Vec<_> = self
            .table
            .samples()
            .iter()
            .filter(|s| s.spw == self.nominal_spw && s.pol == self.nominal_pol)
            .collect();
        let positions = Array2::from_shape_fn((selected.len(), 2), |(i, j)| {
            if j == 0 {
                selected[i].ra
            } else {
                selected[i].dec
            }
        });
        let times: Vec<f64> = selected.iter().map(|s| s.time).collect();

        let (row_gaps, raster_gaps) = detect_raster_gaps(positions.view(), &times, options)?;
        // The single-sample convention doesn't name a gap.
        let to_ids = |gaps: GapList| -> GapList {
            gaps.into_iter()
                .filter(|&g| g > 0 && g < selected.len())
                .map(|g| selected[g].id)
                .collect()
        };
        Ok((to_ids(row_gaps), to_ids(raster_gaps)))
    }
}

fn most_common<I: Iterator<Item = u32>>(values: I) -> Option<u32> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    // `max_by_key` returns the last maximum; iterate in reverse so that the
    // smallest value wins ties.
    counts
        .into_iter()
        .rev()
        .max_by_key(|&(_, count)| count)
        .map(|(v, _)| v)
}
