mod catalog;
mod database;
mod error;
mod ingest;
mod media;
mod utils;

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::catalog::cataloger::{Cataloger, ScanSummary};
use crate::database::repo::CatalogStore;
use crate::ingest::scanner;
use crate::media::exr_header::ExrHeaderReader;
use crate::utils::config::{self, Overrides};
use crate::utils::volume::VolumePathResolver;

#[derive(Parser, Debug)]
#[command(author, version, about = "Catalogs OpenEXR header attributes into SQLite", long_about = None)]
struct Args {
    /// Root of the tree to scan for image sequences
    #[arg(short, long)]
    input_dir: PathBuf,

    /// SQLite catalog to append to
    #[arg(short, long)]
    db_path: Option<PathBuf>,

    /// Boot volume name; stored paths are re-rooted under /Volumes/<name>
    #[arg(short, long)]
    root_volume: Option<String>,

    /// Extension of the sequences to catalog
    #[arg(short, long)]
    extension: Option<String>,

    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Write the effective settings back to the env file
    #[arg(long)]
    save_config: bool,

    /// Write the run summary as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let settings = config::load_settings(
        &args.env_file,
        Overrides {
            db_path: args.db_path,
            root_volume: args.root_volume,
            extension: args.extension,
        },
    )?;
    if args.save_config {
        config::save_to_env(&args.env_file, &settings)?;
        info!("Saved settings to {:?}", args.env_file);
    }

    info!("EXR attribute catalog starting...");
    info!("Input: {:?}", args.input_dir);
    info!("DB: {:?}", settings.db_path);

    let store = CatalogStore::open(&settings.db_path)?;
    let resolver = VolumePathResolver::new(settings.root_volume.as_deref())
        .context("Failed to read working directory")?;
    let mut cataloger = Cataloger::new(store, ExrHeaderReader, resolver);
    cataloger
        .ensure_schema()
        .context("Failed to create catalog schema")?;

    let sequences = scanner::scan_sequences(&args.input_dir)?;
    let frames = scanner::select_first_frames(&sequences, &settings.extension);
    info!(
        "Found {} sequences, {} of them .{}",
        sequences.len(),
        frames.len(),
        settings.extension
    );

    let progress = ProgressBar::new(frames.len() as u64);
    progress.set_style(ProgressStyle::with_template(
        "{spinner} [{bar:40}] {pos}/{len} {wide_msg}",
    )?);

    let mut summary = ScanSummary {
        sequences_found: sequences.len(),
        ..ScanSummary::default()
    };
    for path in &frames {
        progress.set_message(path.display().to_string());
        let outcome = progress.suspend(|| cataloger.catalog_attributes_for_file(path));
        summary.record(path, &outcome);
        progress.inc(1);
    }
    progress.finish_and_clear();

    info!(
        "Cataloged {} attributes from {} files ({} files skipped, {} type mismatches, {} unsupported values)",
        summary.attributes_cataloged,
        summary.files_cataloged,
        summary.files_skipped,
        summary.mismatches,
        summary.unsupported_skipped
    );
    info!(
        "Catalog now holds {} attribute records",
        cataloger.store().row_count("attrs")?
    );

    if let Some(path) = args.summary_json {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create summary file {:?}", path))?;
        serde_json::to_writer_pretty(file, &summary).context("Failed to write summary")?;
        info!("Summary written to {:?}", path);
    }

    info!("Scan completed.");
    Ok(())
}
