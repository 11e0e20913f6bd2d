//! Grouping heuristics for single-dish data: split a time-ordered sequence of
//! pointings into continuous raster rows and whole rasters, using gaps in time
//! and in sky position.

mod error;
pub mod gap;
pub mod grouping;
pub mod math;
pub mod merge;
pub mod pattern;
pub mod position;
pub mod raster;
pub mod read;
mod sample;
pub mod time;
pub mod write;

pub use error::GroupingError;
pub use gap::{detect_gaps, GapList};
pub use grouping::{group_samples, GroupingParams, GroupingResult};
pub use merge::merge_gaps;
pub use pattern::ObservingPattern;
pub use position::{group_by_position, PosDict, PosEntry};
pub use raster::{detect_raster_gaps, Raster, RasterGapOptions};
pub use sample::{Sample, SampleTable};
pub use time::{
    group_by_time, split_by_time, time_thresholds, TimeGap, TimeTable, TimeThresholds,
};

use vec1::Vec1;

/// One contiguous, ungapped run of samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// The physical data-table rows of the samples in this group.
    pub rows: Vec1<usize>,

    /// The sample ids of this group. Always the same length as `rows`.
    pub ids: Vec1<usize>,
}

impl Group {
    pub fn new(row: usize, id: usize) -> Group {
        Group {
            rows: Vec1::new(row),
            ids: Vec1::new(id),
        }
    }

    pub fn push(&mut self, row: usize, id: usize) {
        self.rows.push(row);
        self.ids.push(id);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Never true; a group always has at least one sample.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// An ordered sequence of [`Group`]s. Concatenating each group's ids, in order,
/// reproduces the ids that were partitioned.
pub type Partition = Vec<Group>;

/// All of the ids in a partition, in group order.
pub fn partition_ids(partition: &[Group]) -> Vec<usize> {
    partition
        .iter()
        .flat_map(|g| g.ids.iter().copied())
        .collect()
}
