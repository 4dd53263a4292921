// ==============================================================================
// main.rs - SNP/Phenotype Processor Entry Point
// ==============================================================================
// Description: CLI for running the merge/classify pipeline on local files
// Author: Matt Barham
// Created: 2026-08-23
// Modified: 2026-08-23
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snp_pheno_processor::models::TableFile;
use snp_pheno_processor::pipeline::process_batch;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Phenotype table (tab-delimited, with an Accession_ID column)
    #[arg(short, long)]
    pheno: PathBuf,

    /// Genotype tables (comma-delimited, with strain and alt columns)
    #[arg(required = true)]
    genotype_files: Vec<PathBuf>,

    /// Write the JSON results to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snp_pheno_processor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let pheno = read_table(&args.pheno)?;
    let genotype_files = args
        .genotype_files
        .iter()
        .map(|path| read_table(path))
        .collect::<Result<Vec<_>>>()?;

    let results = process_batch(&pheno, &genotype_files)?;

    let json = serde_json::to_string_pretty(&results).context("Failed to serialize results")?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write results to {:?}", path))?;
            info!("Results written to {:?}", path);
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn read_table(path: &Path) -> Result<TableFile> {
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read input file {:?}", path))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    Ok(TableFile { name, data })
}
