//! Per-integration metadata supplied by the data table reader.

use std::collections::{BTreeMap, HashMap};

use crate::GroupingError;

/// One telescope pointing/integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Opaque sequence index into the external data table.
    pub id: usize,

    /// The physical row in the data table. This may differ from `id` if the
    /// data were filtered before they got here.
    pub row: usize,

    /// \[seconds\]
    pub time: f64,

    /// Right ascension, in the same unit as the grouping radii.
    pub ra: f64,

    /// Declination, in the same unit as the grouping radii.
    pub dec: f64,

    /// The receiver feed that took this sample.
    pub beam: u32,

    pub antenna: u32,

    pub spw: u32,

    pub pol: u32,
}

/// A time-ordered collection of [`Sample`]s. Ids are unique and times never
/// decrease; both are checked at construction.
#[derive(Debug, Clone, Default)]
pub struct SampleTable {
    samples: Vec<Sample>,

    /// Sample id -> index into `samples`.
    index: HashMap<usize, usize>,
}

impl SampleTable {
    pub fn new(samples: Vec<Sample>) -> Result<SampleTable, GroupingError> {
        let mut index = HashMap::with_capacity(samples.len());
        for (i, s) in samples.iter().enumerate() {
            if index.insert(s.id, i).is_some() {
                return Err(GroupingError::DuplicateId(s.id));
            }
            check_position(s.id, s.ra, s.dec)?;
            if i > 0 {
                let prev = samples[i - 1].time;
                // `!(a >= b)` so that NaNs are rejected too.
                if !(s.time >= prev) {
                    return Err(GroupingError::TimeNotSorted {
                        index: i,
                        prev,
                        this: s.time,
                    });
                }
            }
        }

        Ok(SampleTable { samples, index })
    }

    /// Build a table from parallel columns. Ids are taken to be the positions
    /// in the columns, antennas, spws and pols are all 0.
    pub fn from_columns(
        rows: &[usize],
        times: &[f64],
        ras: &[f64],
        decs: &[f64],
        beams: &[u32],
    ) -> Result<SampleTable, GroupingError> {
        let n = rows.len();
        check_len("TIME", n, times.len())?;
        check_len("RA", n, ras.len())?;
        check_len("DEC", n, decs.len())?;
        check_len("BEAM", n, beams.len())?;

        let samples = (0..n)
            .map(|i| Sample {
                id: i,
                row: rows[i],
                time: times[i],
                ra: ras[i],
                dec: decs[i],
                beam: beams[i],
                antenna: 0,
                spw: 0,
                pol: 0,
            })
            .collect();
        SampleTable::new(samples)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn by_id(&self, id: usize) -> Option<&Sample> {
        self.index.get(&id).map(|&i| &self.samples[i])
    }

    pub fn ids(&self) -> Vec<usize> {
        self.samples.iter().map(|s| s.id).collect()
    }

    pub fn rows(&self) -> Vec<usize> {
        self.samples.iter().map(|s| s.row).collect()
    }

    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.time).collect()
    }

    pub fn ras(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.ra).collect()
    }

    pub fn decs(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.dec).collect()
    }

    /// A new table with only the given ids, kept in table order (not the
    /// order of `ids`).
    pub fn select(&self, ids: &[usize]) -> Result<SampleTable, GroupingError> {
        let mut wanted = Vec::with_capacity(ids.len());
        for &id in ids {
            match self.index.get(&id) {
                Some(&i) => wanted.push(i),
                None => return Err(GroupingError::UnknownId(id)),
            }
        }
        wanted.sort_unstable();
        wanted.dedup();
        SampleTable::new(wanted.into_iter().map(|i| self.samples[i]).collect())
    }

    /// Split the table into one table per antenna, ascending by antenna.
    pub fn split_by_antenna(&self) -> BTreeMap<u32, SampleTable> {
        let mut split: BTreeMap<u32, Vec<Sample>> = BTreeMap::new();
        for s in &self.samples {
            split.entry(s.antenna).or_default().push(*s);
        }
        split
            .into_iter()
            .map(|(ant, samples)| {
                // Ordering and uniqueness carry over from `self`.
                let index = samples.iter().enumerate().map(|(i, s)| (s.id, i)).collect();
                (ant, SampleTable { samples, index })
            })
            .collect()
    }
}

pub(crate) fn check_len(
    name: &'static str,
    expected: usize,
    got: usize,
) -> Result<(), GroupingError> {
    if expected == got {
        Ok(())
    } else {
        Err(GroupingError::LengthMismatch {
            name,
            expected,
            got,
        })
    }
}

pub(crate) fn check_position(id: usize, ra: f64, dec: f64) -> Result<(), GroupingError> {
    if ra.is_finite() && dec.is_finite() {
        Ok(())
    } else {
        Err(GroupingError::NonFinitePosition { id, ra, dec })
    }
}
