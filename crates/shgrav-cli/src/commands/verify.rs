use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use shgrav_artifact::{ensure_match, verify_artifact};
use shgrav_core::ModelRegistry;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// TOML registry describing known models
    #[arg(long)]
    pub registry: PathBuf,
    /// Model identifier the artifact was built from
    #[arg(long)]
    pub model: String,
    /// Coefficient file, or a directory holding the registered file name
    #[arg(long)]
    pub source: PathBuf,
    /// Artifact to check
    #[arg(long)]
    pub artifact: PathBuf,
}

pub fn run(args: &VerifyArgs) -> Result<(), Box<dyn Error>> {
    let registry = ModelRegistry::load(&args.registry)?;
    let report = verify_artifact(&registry, &args.model, &args.source, &args.artifact)?;
    ensure_match(&report)?;
    println!("{} verified against {}", args.artifact.display(), args.model);
    Ok(())
}
