//! rustpix: run the neutron-imaging data-reduction pipeline over a raw
//! TPX3 file from the command line.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use rustpix_core::Hit;
use rustpix_io::{run_parallel, run_sequential, MappedRegion, PipelineConfig};
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    /// Writing the output CSV failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The pipeline itself failed (configuration or I/O).
    #[error("pipeline error: {0}")]
    Pipeline(#[from] rustpix_io::Error),
}

/// High-performance Timepix3 neutron-imaging data reducer.
#[derive(Parser)]
#[command(name = "rustpix")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a TPX3 file into neutron events.
    Process {
        /// Input TPX3 file.
        input: PathBuf,

        /// Output CSV path for the fitted events.
        #[arg(short, long)]
        output: PathBuf,

        /// Peak fitter to use.
        #[arg(long, default_value = "centroid")]
        peak_fitter: String,

        /// ABS feather radius, in pixels.
        #[arg(long, default_value = "5.0")]
        radius: f64,

        /// ABS time window, in nanoseconds.
        #[arg(long, default_value = "75.0")]
        spider_time_range_ns: f64,

        /// Minimum cluster size.
        #[arg(long, default_value = "1")]
        min_cluster_size: usize,

        /// Coordinate multiplier applied by the fitter.
        #[arg(long, default_value = "1.0")]
        super_resolution: f64,

        /// Run the decode/cluster/fit stage single-threaded.
        #[arg(long)]
        sequential: bool,
    },

    /// Print quick file statistics without running the full pipeline.
    Info {
        /// Input TPX3 file.
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Process {
            input,
            output,
            peak_fitter,
            radius,
            spider_time_range_ns,
            min_cluster_size,
            super_resolution,
            sequential,
        } => process(
            &input,
            &output,
            &peak_fitter,
            radius,
            spider_time_range_ns,
            min_cluster_size,
            super_resolution,
            sequential,
        ),
        Commands::Info { input } => info(&input),
    }
}

#[allow(clippy::too_many_arguments)]
fn process(
    input: &PathBuf,
    output: &PathBuf,
    peak_fitter: &str,
    radius: f64,
    spider_time_range_ns: f64,
    min_cluster_size: usize,
    super_resolution: f64,
    sequential: bool,
) -> Result<()> {
    let region = MappedRegion::open(input)?;

    let config = PipelineConfig::default()
        .with_abs_radius(radius)
        .with_abs_spider_time_range_ns(spider_time_range_ns)
        .with_abs_min_cluster_size(min_cluster_size)
        .with_super_resolution(super_resolution)
        .with_peak_fitter_str(peak_fitter)?;

    let start = Instant::now();
    let output_data = if sequential {
        run_sequential(&region, &config)?
    } else {
        run_parallel(&region, &config)?
    };
    log::info!("pipeline finished in {:.3}s", start.elapsed().as_secs_f64());
    log::info!(
        "{} bad-TOF hits, truncated = {}",
        output_data.diagnostics.bad_tof_count,
        output_data.diagnostics.truncated
    );

    let mut file = std::fs::File::create(output)?;
    writeln!(file, "x,y,tof,tot,n_hits")?;
    for batch in &output_data.events {
        for event in batch {
            writeln!(
                file,
                "{},{},{},{},{}",
                event.x, event.y, event.tof, event.tot, event.n_hits
            )?;
        }
    }

    Ok(())
}

fn info(input: &PathBuf) -> Result<()> {
    let region = MappedRegion::open(input)?;
    println!("file size: {} bytes", rustpix_io::ByteRegion::len(&region));

    let config = PipelineConfig::default();
    let output = run_sequential(&region, &config)?;
    let hits: Vec<&Hit> = output.hits.iter().flatten().collect();
    println!("hits: {}", hits.len());
    println!("batches: {}", output.hits.len());

    if !hits.is_empty() {
        let min_tof = hits.iter().map(|h| h.tof).min().expect("hits is non-empty");
        let max_tof = hits.iter().map(|h| h.tof).max().expect("hits is non-empty");
        println!("tof range: {min_tof} - {max_tof}");

        let min_x = hits.iter().map(|h| h.x).min().expect("hits is non-empty");
        let max_x = hits.iter().map(|h| h.x).max().expect("hits is non-empty");
        let min_y = hits.iter().map(|h| h.y).min().expect("hits is non-empty");
        let max_y = hits.iter().map(|h| h.y).max().expect("hits is non-empty");
        println!("x range: {min_x} - {max_x}");
        println!("y range: {min_y} - {max_y}");
    }

    Ok(())
}
