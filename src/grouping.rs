//! The whole grouping procedure for one antenna's worth of samples.

use log::debug;

use crate::{
    group_by_position, merge_gaps, split_by_time, time_thresholds, GapList, GroupingError,
    ObservingPattern, PosDict, SampleTable, TimeGap, TimeTable, TimeThresholds,
};

/// Parameters of the grouping procedure. Radii are in the same unit as the
/// sample positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupingParams {
    /// Pointings within the same lattice cell of side `2 * combine_radius`
    /// are considered the same position.
    pub combine_radius: f64,

    /// Steps between consecutive pointings smaller than this are considered
    /// noise when deriving the position gap threshold.
    pub allowance_radius: f64,
}

impl GroupingParams {
    /// The allowance radius is a tenth of the combine radius.
    pub fn from_radius(radius: f64) -> GroupingParams {
        GroupingParams {
            combine_radius: radius,
            allowance_radius: radius / 10.0,
        }
    }
}

/// Everything produced by [`group_samples`].
#[derive(Debug, Clone)]
pub struct GroupingResult {
    pub pos_dict: PosDict,

    /// The position gaps before merging.
    pub pos_gap: GapList,

    pub position_threshold: f64,

    pub thresholds: TimeThresholds,

    /// The merged, beam-split partitions.
    pub time_table: TimeTable,

    /// The merged gaps.
    pub time_gap: TimeGap,

    pub pattern: ObservingPattern,
}

/// Group the samples of `selection` (ids of `base`) by position and time,
/// merge the gaps and classify the pointing pattern. The time thresholds are
/// derived from all of `base`.
pub fn group_samples(
    base: &SampleTable,
    selection: &[usize],
    params: &GroupingParams,
) -> Result<GroupingResult, GroupingError> {
    let selected = base.select(selection)?;
    debug!(
        "Grouping {} of {} samples",
        selected.len(),
        base.len()
    );
    let ids = selected.ids();
    let rows = selected.rows();

    let (pos_dict, pos_gap, position_threshold) = group_by_position(
        &ids,
        &rows,
        &selected.ras(),
        &selected.decs(),
        params.combine_radius,
        params.allowance_radius,
    )?;
    let thresholds = time_thresholds(&base.times());
    let (time_table, time_gap) = split_by_time(&thresholds, &selected.times(), &rows, &ids)?;
    let (time_table, time_gap) = merge_gaps(&time_gap, &time_table, &pos_gap, base)?;
    let pattern = ObservingPattern::analyse(&pos_dict, &ids);

    Ok(GroupingResult {
        pos_dict,
        pos_gap,
        position_threshold,
        thresholds,
        time_table,
        time_gap,
        pattern,
    })
}

/// [`group_samples`] with every sample selected.
pub fn group_all(
    table: &SampleTable,
    params: &GroupingParams,
) -> Result<GroupingResult, GroupingError> {
    group_samples(table, &table.ids(), params)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{partition_ids, Sample};

    /// Two beams observing a 2-row raster, then a pause and a second pass.
    fn two_beam_scan() -> SampleTable {
        let mut samples = vec![];
        let mut id = 0;
        let mut t = 0.0;
        for pass in 0..2 {
            if pass == 1 {
                t += 600.0;
            }
            for row in 0..2 {
                if row == 1 {
                    t += 20.0;
                }
                for k in 0..8 {
                    for beam in 0..2 {
                        samples.push(Sample {
                            id,
                            row: id,
                            time: t,
                            ra: k as f64 * 0.01 + beam as f64 * 0.5,
                            dec: row as f64 * 0.01,
                            beam,
                            antenna: 0,
                            spw: 0,
                            pol: 0,
                        });
                        id += 1;
                    }
                    t += 1.0;
                }
            }
        }
        SampleTable::new(samples).unwrap()
    }

    #[test]
    fn test_group_all() {
        let table = two_beam_scan();
        let result = group_all(&table, &GroupingParams::from_radius(0.005)).unwrap();

        assert_abs_diff_eq!(result.thresholds.small, 5.0);
        assert!(result.thresholds.large >= result.thresholds.small);
        // Every step is roughly the same size, so none is a position gap.
        assert!(result.pos_gap.is_empty());
        assert_eq!(result.pattern, ObservingPattern::Raster);

        // Partitions always cover every sample, in order.
        assert_eq!(partition_ids(&result.time_table.small), table.ids());
        assert_eq!(partition_ids(&result.time_table.large), table.ids());
        // ... and every group holds a single beam.
        for group in result.time_table.large.iter() {
            let beam = table.by_id(*group.ids.first()).unwrap().beam;
            assert!(group
                .ids
                .iter()
                .all(|&id| table.by_id(id).unwrap().beam == beam));
        }
    }

    #[test]
    fn test_group_one_beam() {
        let table = two_beam_scan();
        let beam0: Vec<usize> = table
            .samples()
            .iter()
            .filter(|s| s.beam == 0)
            .map(|s| s.id)
            .collect();
        let result =
            group_samples(&table, &beam0, &GroupingParams::from_radius(0.005)).unwrap();

        // 2 passes x 2 rows, no position gaps.
        assert!(result.pos_gap.is_empty());
        assert_eq!(result.time_gap.small, vec![16, 32, 48]);
        assert_eq!(result.time_table.small.len(), 4);
        assert!(result.time_table.small.iter().all(|g| g.len() == 8));
        assert_eq!(result.time_table.large.len(), 2);
        assert_eq!(result.time_gap.large, vec![32]);

        // The reported thresholds are the ones the split was done with.
        let selected = table.select(&beam0).unwrap();
        let (_, unmerged) = split_by_time(
            &result.thresholds,
            &selected.times(),
            &selected.rows(),
            &beam0,
        )
        .unwrap();
        assert_eq!(unmerged, result.time_gap);
    }

    #[test]
    fn test_unknown_selection() {
        let table = two_beam_scan();
        assert_eq!(
            group_samples(&table, &[1_000_000], &GroupingParams::from_radius(0.01)).unwrap_err(),
            GroupingError::UnknownId(1_000_000)
        );
    }
}
