//! Grouping samples by time, at two granularities.


use log::{debug, info, trace};

use crate::{
    gap::TIME_GAP_FACTOR,
    math::{median, positive_deltas},
    sample::check_len,
    GapList, Group, GroupingError, Partition,
};

/// The two time gap thresholds \[seconds\].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeThresholds {
    /// [`TIME_GAP_FACTOR`] times the median of the non-zero time deltas. 0 if
    /// there are no non-zero deltas.
    pub small: f64,

    /// [`TIME_GAP_FACTOR`] times the median of the deltas exceeding `small`. If
    /// nothing exceeds `small`, this is the same as `small`. Never less than
    /// `small`.
    pub large: f64,
}

/// Partitions of the same samples split at small and large time gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeTable {
    pub small: Partition,
    pub large: Partition,
}

/// The ids that start a new group in the corresponding [`TimeTable`]
/// partitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeGap {
    pub small: GapList,
    pub large: GapList,
}

/// Derive the small and large time gap thresholds from a reference sequence of
/// times.
pub fn time_thresholds(timebase: &[f64]) -> TimeThresholds {
    let deltas = positive_deltas(timebase);
    let small = median(&deltas).map(|m| m * TIME_GAP_FACTOR).unwrap_or(0.0);
    let above: Vec<f64> = deltas.iter().copied().filter(|&dt| dt > small).collect();
    let large = median(&above)
        .map(|m| m * TIME_GAP_FACTOR)
        .unwrap_or(small);

    if let (Some(min), Some(max)) = (
        deltas.iter().copied().reduce(f64::min),
        deltas.iter().copied().reduce(f64::max),
    ) {
        debug!("Time deltas range from {min} s to {max} s");
    }
    debug!("Small time gap threshold: {small} s");
    debug!("Large time gap threshold: {large} s");
    TimeThresholds { small, large }
}

/// Group samples by time.
///
/// `timebase` is the full sequence of times for the data (e.g. all
/// integrations of one antenna) and is only used to derive the thresholds, so
/// that they don't depend on which subset is being grouped. `timelist`,
/// `rows` and `ids` describe the (possibly filtered) samples to group.
pub fn group_by_time(
    timebase: &[f64],
    timelist: &[f64],
    rows: &[usize],
    ids: &[usize],
) -> Result<(TimeTable, TimeGap), GroupingError> {
    split_by_time(&time_thresholds(timebase), timelist, rows, ids)
}

/// [`group_by_time`] with thresholds that have already been derived.
pub fn split_by_time(
    thresholds: &TimeThresholds,
    timelist: &[f64],
    rows: &[usize],
    ids: &[usize],
) -> Result<(TimeTable, TimeGap), GroupingError> {
    check_len("ROW", timelist.len(), rows.len())?;
    check_len("ID", timelist.len(), ids.len())?;

    let delta = |i: usize| if i == 0 { 0.0 } else { timelist[i] - timelist[i - 1] };
    let small = split_where(rows, ids, |i| {
        let gap = delta(i) > thresholds.small;
        if gap {
            trace!("Small time gap {} s at id={}", delta(i), ids[i]);
        }
        gap
    });
    let large = split_where(rows, ids, |i| {
        let gap = delta(i) > thresholds.large;
        if gap {
            trace!("Large time gap {} s at id={}", delta(i), ids[i]);
        }
        gap
    });
    let gaps = TimeGap {
        small: partition_gaps(&small),
        large: partition_gaps(&large),
    };
    let table = TimeTable { small, large };

    if gaps.small.is_empty() {
        info!("Found no time gap");
    } else {
        info!("Found {} small time gap(s)", gaps.small.len());
        info!("Found {} large time gap(s)", gaps.large.len());
    }

    Ok((table, gaps))
}

/// Walk `rows`/`ids` in order, starting a new group at every sample for which
/// `is_gap` returns true. The first sample never starts a gap.
pub(crate) fn split_where<F>(rows: &[usize], ids: &[usize], mut is_gap: F) -> Partition
where
    F: FnMut(usize) -> bool,
{
    let mut partition = vec![];
    let mut current: Option<Group> = None;
    for (i, (&row, &id)) in rows.iter().zip(ids).enumerate() {
        match current.as_mut() {
            Some(g) if !is_gap(i) => g.push(row, id),
            Some(_) => partition.extend(current.replace(Group::new(row, id))),
            None => current = Some(Group::new(row, id)),
        }
    }
    partition.extend(current);
    partition
}

/// The first id of every group but the first, i.e. the ids that follow a gap.
pub(crate) fn partition_gaps(partition: &[Group]) -> GapList {
    partition.iter().skip(1).map(|g| *g.ids.first()).collect()
}
