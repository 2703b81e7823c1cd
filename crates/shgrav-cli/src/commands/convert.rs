use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use shgrav_artifact::convert_model;
use shgrav_core::ModelRegistry;

use super::print_json;

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// TOML registry describing known models
    #[arg(long)]
    pub registry: PathBuf,
    /// Model identifier to convert
    #[arg(long)]
    pub model: String,
    /// Coefficient file, or a directory holding the registered file name
    #[arg(long)]
    pub source: PathBuf,
    /// Output directory for `<model>.bin`
    #[arg(long)]
    pub out: PathBuf,
    /// Print the conversion report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &ConvertArgs) -> Result<(), Box<dyn Error>> {
    let registry = ModelRegistry::load(&args.registry)?;
    let report = convert_model(&registry, &args.model, &args.source, &args.out)?;
    if args.json {
        return print_json(&report);
    }
    println!(
        "{} ({}) -> {}",
        report.model,
        report.format,
        report.artifact.display()
    );
    println!(
        "  l_max={} m_max={} entries={} skipped={} overwritten={}",
        report.l_max,
        report.m_max,
        report.entries,
        report.skipped_lines,
        report.overwritten_entries
    );
    println!("  {} bytes, sha256 {}", report.byte_len, report.sha256);
    Ok(())
}
