//! Strong-motion QC runner
//!
//! Usage:
//!   gmqc --config qc.json --event event.json --waveforms a.json b.json
//!   gmqc --config qc.json --event event.json --waveforms data/*.json --failures failures.csv

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use gmqc::core::{ScalarEvent, StreamCollection};
use gmqc::input::{read_json, read_waveforms};
use gmqc::metrics;
use gmqc::{PipelinePool, QcConfig, QcPipeline};

/// Run quality checks over the waveform records of one earthquake
#[derive(Parser, Debug)]
#[command(name = "gmqc")]
#[command(about = "Quality control for strong-motion waveform records")]
struct Args {
    /// QC configuration (JSON)
    #[arg(long)]
    config: PathBuf,

    /// Event origin (JSON)
    #[arg(long)]
    event: PathBuf,

    /// Waveform files, each holding one trace or a list of traces (JSON)
    #[arg(long, num_args = 1.., required = true)]
    waveforms: Vec<PathBuf>,

    /// Write the failure table as CSV
    #[arg(long)]
    failures: Option<PathBuf>,

    /// Write the full QA report as JSON
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write peak motions of passed streams as CSV
    #[arg(long)]
    metrics: Option<PathBuf>,

    /// Override the number of streams processed concurrently
    #[arg(long)]
    max_concurrent: Option<usize>,
}

async fn write_file(path: &Path, contents: String) -> Result<()> {
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();

    let config: QcConfig = read_json(&args.config).await?;
    let event: ScalarEvent = read_json(&args.event).await?;
    let pipeline = Arc::new(QcPipeline::from_config(config).context("Invalid QC configuration")?);

    let raw = read_waveforms(&args.waveforms).await?;
    let (collection, rejected) = StreamCollection::from_traces(raw);
    info!(
        "Loaded {} streams for event {} ({} traces rejected)",
        collection.len(),
        event.id,
        rejected.len()
    );

    let pool = match args.max_concurrent {
        Some(n) => PipelinePool::new(pipeline.clone(), n),
        None => PipelinePool::from_pipeline(pipeline.clone()),
    };
    let (collection, report) = pool.run(collection, &event).await?;

    match report.summary() {
        Some(summary) => {
            println!("{}", summary);
            print!("{}", report.to_csv()?);
        }
        None => println!("All {} streams passed QA", report.passed_streams.len()),
    }

    if let Some(path) = &args.failures {
        write_file(path, report.to_csv()?).await?;
    }
    if let Some(path) = &args.report {
        write_file(path, report.to_json()?).await?;
    }
    if let Some(path) = &args.metrics {
        write_file(path, metrics::to_csv(&metrics::peak_motions(&collection))?).await?;
    }

    info!("{}", pipeline.monitor().generate_report());
    Ok(())
}
