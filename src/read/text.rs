//! Plain-text sample tables.
//!
//! One sample per line, whitespace-separated:
//!
//! ```text
//! # row  time        ra        dec      beam [antenna [spw [pol]]]
//!   0    4.9e9       83.6331   22.0145  0    0        17   0
//! ```
//!
//! Lines starting with `#` and blank lines are ignored. Sample ids are the
//! order of the samples in the file.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    str::FromStr,
};

use log::{debug, trace};

use super::{ReadError, SampleRead};
use crate::{Sample, SampleTable};

const COLUMNS: [&str; 8] = ["ROW", "TIME", "RA", "DEC", "BEAM", "ANTENNA", "SPW", "POL"];
const MIN_COLUMNS: usize = 5;

pub struct TextReader {
    file: PathBuf,
}

impl TextReader {
    pub fn new<P: AsRef<Path>>(file: P) -> TextReader {
        TextReader {
            file: file.as_ref().to_path_buf(),
        }
    }

    /// Parse samples from anything that reads lines. `self.file` is only used
    /// for error messages.
    pub fn parse<R: BufRead>(&self, reader: R) -> Result<SampleTable, ReadError> {
        let mut samples = vec![];
        for (i_line, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| ReadError::IO {
                file: self.file.display().to_string(),
                source,
            })?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            if !(MIN_COLUMNS..=COLUMNS.len()).contains(&fields.len()) {
                return Err(ReadError::ColumnCount {
                    file: self.file.display().to_string(),
                    line: i_line + 1,
                    min: MIN_COLUMNS,
                    max: COLUMNS.len(),
                    found: fields.len(),
                });
            }

            let get_u32 = |i: usize| -> Result<u32, ReadError> {
                match fields.get(i) {
                    Some(f) => self.parse_field(f, i, i_line),
                    None => Ok(0),
                }
            };
            let sample = Sample {
                id: samples.len(),
                row: self.parse_field(fields[0], 0, i_line)?,
                time: self.parse_field(fields[1], 1, i_line)?,
                ra: self.parse_field(fields[2], 2, i_line)?,
                dec: self.parse_field(fields[3], 3, i_line)?,
                beam: get_u32(4)?,
                antenna: get_u32(5)?,
                spw: get_u32(6)?,
                pol: get_u32(7)?,
            };
            trace!("{sample:?}");
            samples.push(sample);
        }
        debug!("Read {} samples from {}", samples.len(), self.file.display());

        SampleTable::new(samples).map_err(|source| ReadError::Table {
            file: self.file.display().to_string(),
            source,
        })
    }

    fn parse_field<T: FromStr>(
        &self,
        field: &str,
        column: usize,
        i_line: usize,
    ) -> Result<T, ReadError> {
        field.parse().map_err(|_| ReadError::Parse {
            file: self.file.display().to_string(),
            line: i_line + 1,
            column: COLUMNS[column],
            value: field.to_string(),
        })
    }
}

impl SampleRead for TextReader {
    fn read_samples(&self) -> Result<SampleTable, ReadError> {
        let f = File::open(&self.file).map_err(|source| ReadError::IO {
            file: self.file.display().to_string(),
            source,
        })?;
        self.parse(BufReader::new(f))
    }
}
