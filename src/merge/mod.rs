//! Reconciling time gaps with position gaps.


use std::collections::HashSet;

use itertools::Itertools;
use log::{debug, info};

use crate::{
    partition_ids,
    time::{split_where, TimeGap, TimeTable},
    Group, GroupingError, Partition, SampleTable,
};

/// Merge the position gaps into the small-gap time partition, then split every
/// group (of both partitions) wherever adjacent samples come from different
/// beams.
///
/// Either signal alone can miss a discontinuity; the telescope can jump to a
/// new position without a pause, or dwell on one position across a pause. The
/// inputs are left untouched; the merged table and gaps are returned. The
/// large gaps are returned unchanged.
///
/// Gap ids that aren't in the small time partition are dropped. `table` must
/// contain every sample in `time_table`; it's used to look up beams.
pub fn merge_gaps(
    time_gap: &TimeGap,
    time_table: &TimeTable,
    pos_gap: &[usize],
    table: &SampleTable,
) -> Result<(TimeTable, TimeGap), GroupingError> {
    let idx = partition_ids(&time_table.small);
    let considered: HashSet<usize> = idx.iter().copied().collect();

    let merged_gaps: Vec<usize> = time_gap
        .small
        .iter()
        .chain(pos_gap)
        .copied()
        .sorted()
        .dedup()
        .filter(|id| considered.contains(id))
        .collect();
    debug!(
        "{} time gap(s) and {} position gap(s) merge into {} gap(s)",
        time_gap.small.len(),
        pos_gap.len(),
        merged_gaps.len()
    );

    let gap_set: HashSet<usize> = merged_gaps.iter().copied().collect();
    let idx_rows = partition_rows(&time_table.small);
    let small = split_where(&idx_rows, &idx, |i| gap_set.contains(&idx[i]));

    let small = split_by_beam(&small, table)?;
    let large = split_by_beam(&time_table.large, table)?;
    info!(
        "Merged table has {} small group(s) and {} large group(s)",
        small.len(),
        large.len()
    );

    Ok((
        TimeTable { small, large },
        TimeGap {
            small: merged_gaps,
            large: time_gap.large.clone(),
        },
    ))
}

/// Split each group wherever two adjacent samples have different beams.
/// Samples of different beams interleaved in time must not be combined.
pub fn split_by_beam(
    partition: &[Group],
    table: &SampleTable,
) -> Result<Partition, GroupingError> {
    let mut out = Vec::with_capacity(partition.len());
    for group in partition {
        let beams = group
            .ids
            .iter()
            .map(|&id| {
                table
                    .by_id(id)
                    .map(|s| s.beam)
                    .ok_or(GroupingError::UnknownId(id))
            })
            .collect::<Result<Vec<u32>, _>>()?;
        out.extend(split_where(&group.rows, &group.ids, |i| {
            i > 0 && beams[i] != beams[i - 1]
        }));
    }
    Ok(out)
}

fn partition_rows(partition: &[Group]) -> Vec<usize> {
    partition
        .iter()
        .flat_map(|g| g.rows.iter().copied())
        .collect()
}
