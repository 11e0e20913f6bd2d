//! Recording groupings as text.
//!
//! Each group is written on one line as
//!
//! ```text
//! <antenna> <small|large> <group index> <beam> <row> <row> ...
//! ```
//!
//! preceded by `#` comment lines describing the thresholds, gaps and the
//! observing pattern of each antenna.


use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use itertools::Itertools;
use log::debug;
use thiserror::Error;

use crate::{GapList, GroupingResult, Partition, SampleTable};

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Sample id {id} of antenna {antenna} isn't in its sample table")]
    UnknownId { antenna: u32, id: usize },

    #[error("Couldn't write {file}: {source}")]
    IO {
        file: String,
        source: std::io::Error,
    },
}

/// The grouping of one antenna's samples, ready to be written out.
pub struct AntennaGroups<'a> {
    pub antenna: u32,

    pub table: &'a SampleTable,

    pub result: &'a GroupingResult,

    /// Row and raster gaps (as sample ids), if raster detection was done.
    pub raster_gaps: Option<(GapList, GapList)>,
}

/// Write the groupings of all antennas to `file`.
pub fn write_groups_file<P: AsRef<Path>>(
    file: P,
    groups: &[AntennaGroups],
) -> Result<(), WriteError> {
    let file = file.as_ref();
    let io_err = |source| WriteError::IO {
        file: file.display().to_string(),
        source,
    };
    let mut writer = BufWriter::new(File::create(file).map_err(io_err)?);
    for g in groups {
        write_groups(&mut writer, g).map_err(|e| match e {
            WriteError::IO { source, .. } => io_err(source),
            e => e,
        })?;
    }
    writer.flush().map_err(io_err)?;
    debug!("Wrote groups for {} antenna(s) to {}", groups.len(), file.display());
    Ok(())
}

/// Write one antenna's grouping to `writer`.
pub fn write_groups<W: Write>(writer: &mut W, groups: &AntennaGroups) -> Result<(), WriteError> {
    let io_err = |source| WriteError::IO {
        file: "<stream>".to_string(),
        source,
    };
    let AntennaGroups {
        antenna,
        table,
        result,
        raster_gaps,
    } = groups;

    let mut header = vec![
        format!("antenna {antenna}: pattern {}", result.pattern),
        format!(
            "antenna {antenna}: time thresholds {} s, {} s; position threshold {}",
            result.thresholds.small, result.thresholds.large, result.position_threshold
        ),
        format!(
            "antenna {antenna}: position gaps [{}]",
            result.pos_gap.iter().join(" ")
        ),
        format!(
            "antenna {antenna}: small gaps [{}]",
            result.time_gap.small.iter().join(" ")
        ),
        format!(
            "antenna {antenna}: large gaps [{}]",
            result.time_gap.large.iter().join(" ")
        ),
    ];
    if let Some((row_gaps, raster_gaps)) = raster_gaps {
        header.push(format!(
            "antenna {antenna}: raster row gaps [{}]",
            row_gaps.iter().join(" ")
        ));
        header.push(format!(
            "antenna {antenna}: raster gaps [{}]",
            raster_gaps.iter().join(" ")
        ));
    }
    for line in header {
        writeln!(writer, "# {line}").map_err(io_err)?;
    }

    for (name, partition) in [
        ("small", &result.time_table.small),
        ("large", &result.time_table.large),
    ] {
        write_partition(writer, *antenna, name, partition, table)?;
    }
    Ok(())
}

fn write_partition<W: Write>(
    writer: &mut W,
    antenna: u32,
    name: &str,
    partition: &Partition,
    table: &SampleTable,
) -> Result<(), WriteError> {
    for (i_group, group) in partition.iter().enumerate() {
        let id = *group.ids.first();
        let beam = table
            .by_id(id)
            .ok_or(WriteError::UnknownId { antenna, id })?
            .beam;
        writeln!(
            writer,
            "{antenna} {name} {i_group} {beam} {}",
            group.rows.iter().join(" ")
        )
        .map_err(|source| WriteError::IO {
            file: "<stream>".to_string(),
            source,
        })?;
    }
    Ok(())
}
