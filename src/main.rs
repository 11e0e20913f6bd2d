use std::path::PathBuf;

use clap::{AppSettings, Parser};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;

use sdgroup::{
    grouping::group_all,
    read::{SampleRead, TextReader},
    write::{write_groups_file, AntennaGroups},
    GroupingError, GroupingParams, GroupingResult, Raster, RasterGapOptions, SampleTable,
};

#[derive(Parser)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
#[clap(disable_help_subcommand = true)]
#[clap(infer_long_args = true)]
struct Args {
    /// The sample table to be grouped. Whitespace-separated columns: row, time
    /// [s], RA [deg], Dec [deg], beam, and optionally antenna, spw and pol.
    data: PathBuf,

    /// Where to write the groups.
    #[clap(short, long)]
    output: PathBuf,

    /// The combine radius [deg]. Pointings closer than this are the same
    /// position.
    #[clap(short, long)]
    radius: f64,

    /// The allowance radius [deg]. Defaults to a tenth of the combine radius.
    #[clap(long)]
    allowance: Option<f64>,

    /// Also detect raster rows and rasters.
    #[clap(long)]
    raster: bool,

    /// Flip the sign convention of the raster detection. Use this if rows step
    /// to the right of the scan direction.
    #[clap(long, requires = "raster")]
    flip_raster_sign: bool,

    /// The verbosity of the program. Increase by specifying multiple times
    /// (e.g. -vv). The default is to print only high-level information.
    #[clap(short, long, parse(from_occurrences))]
    verbosity: u8,

    /// Disable progress bars.
    #[clap(long)]
    no_progress_bars: bool,
}

fn main() {
    if let Err(e) = try_main() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_logging(args.verbosity);

    let params = match args.allowance {
        Some(allowance) => GroupingParams {
            combine_radius: args.radius,
            allowance_radius: allowance,
        },
        None => GroupingParams::from_radius(args.radius),
    };
    info!(
        "Combine radius: {} deg, allowance radius: {} deg",
        params.combine_radius, params.allowance_radius
    );
    let raster_options = RasterGapOptions {
        sign: if args.flip_raster_sign { 1.0 } else { -1.0 },
        ..Default::default()
    };

    let table = TextReader::new(&args.data).read_samples()?;
    info!("Read {} samples from {}", table.len(), args.data.display());
    let antennas: Vec<(u32, SampleTable)> = table.split_by_antenna().into_iter().collect();
    info!("{} antenna(s)", antennas.len());

    let progress = ProgressBar::with_draw_target(
        Some(antennas.len() as _),
        if args.no_progress_bars {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stdout()
        },
    )
    .with_style(
        ProgressStyle::default_bar()
            .template("{msg:17}: [{wide_bar:.blue}] {pos:2}/{len:2} antennas ({elapsed_precise}<{eta_precise})")?
            .progress_chars("=> "),
    )
    .with_message("Grouping");

    type AntennaResult = (GroupingResult, Option<(Vec<usize>, Vec<usize>)>);
    let results = antennas
        .par_iter()
        .progress_with(progress.clone())
        .map(|(antenna, ant_table)| -> Result<AntennaResult, GroupingError> {
            debug!("Working on antenna {antenna}");
            let result = group_all(ant_table, &params)?;
            let raster_gaps = if args.raster {
                match Raster::new(ant_table.clone()) {
                    Some(raster) => Some(raster.detect_gaps(&raster_options)?),
                    None => None,
                }
            } else {
                None
            };
            Ok((result, raster_gaps))
        })
        .collect::<Result<Vec<_>, _>>()?;
    progress.finish();

    for ((antenna, _), (result, _)) in antennas.iter().zip(results.iter()) {
        info!(
            "Antenna {antenna}: {} pattern, {} small group(s), {} large group(s)",
            result.pattern,
            result.time_table.small.len(),
            result.time_table.large.len()
        );
    }
    let groups: Vec<AntennaGroups> = antennas
        .iter()
        .zip(results.iter())
        .map(|((antenna, ant_table), (result, raster_gaps))| AntennaGroups {
            antenna: *antenna,
            table: ant_table,
            result,
            raster_gaps: raster_gaps.clone(),
        })
        .collect();

    write_groups_file(&args.output, &groups)?;
    info!("Wrote {}", args.output.display());

    Ok(())
}

/// Log to stdout. `-v` shows debug messages, `-vv` traces every gap, and
/// `-vvv` also stamps each message with its time and source location.
fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::from_default_env();
    builder
        .target(env_logger::Target::Stdout)
        .format_target(false)
        .filter_level(level);
    if verbosity > 2 {
        builder.format(|buf, record| {
            use std::io::Write;

            let stamp = buf.timestamp();
            writeln!(
                buf,
                "[{stamp} {} {}:{}] {}",
                record.level(),
                record.module_path().unwrap_or("sdgroup"),
                record.line().unwrap_or(0),
                record.args()
            )
        });
    }
    builder.init();
}
