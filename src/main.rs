use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use component_segmentation::loader;
use component_segmentation::segmentation::{segment, SegmentConfig};
use component_segmentation::serializer;

/// Partition a binned pangenome matrix into collinear components.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding metadata.json, paths.csv, path_bins.csv and links.csv
    input: PathBuf,

    /// Output folder for the schematic
    #[arg(short, long)]
    out_folder: PathBuf,

    /// Level of logging verbosity (error, warn, info, debug, trace)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Discard links whose gap spans nothing any path occupies
    #[arg(long)]
    prune_links: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&args.log_level)?)
        .init();

    let start = Instant::now();
    let loaded = loader::load_directory(&args.input)?;

    let config = SegmentConfig {
        prune_links: args.prune_links,
    };
    let schematic = segment(
        &loaded.paths,
        loaded.pangenome_length,
        loaded.bin_width,
        config,
    )?;

    serializer::write_json(&schematic, &args.out_folder)?;
    info!(elapsed = ?start.elapsed(), "done");
    Ok(())
}
