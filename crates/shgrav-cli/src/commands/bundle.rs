use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Args;
use shgrav_artifact::{verify_bundle, write_bundle};
use walkdir::WalkDir;

#[derive(Args, Debug)]
pub struct BundleArgs {
    /// Output bundle path (.zip)
    #[arg(long, required_unless_present = "verify")]
    pub out: Option<PathBuf>,
    /// Verify an existing bundle instead of writing one
    #[arg(long, conflicts_with = "out")]
    pub verify: Option<PathBuf>,
    /// Artifacts to pack; directories contribute every `.bin` beneath them
    #[arg(required_unless_present = "verify")]
    pub inputs: Vec<PathBuf>,
}

pub fn run(args: &BundleArgs) -> Result<(), Box<dyn Error>> {
    if let Some(bundle) = &args.verify {
        let manifest = verify_bundle(bundle)?;
        println!(
            "bundle verified successfully ({} artifacts)",
            manifest.artifacts.len()
        );
        return Ok(());
    }
    let Some(out) = args.out.as_ref() else {
        return Err("--out is required unless --verify is set".into());
    };
    let artifacts = collect_artifacts(&args.inputs);
    if artifacts.is_empty() {
        return Err("no .bin artifacts found in the given inputs".into());
    }
    let manifest = write_bundle(&artifacts, out)?;
    for entry in &manifest.artifacts {
        println!("{}  {}", entry.sha256, entry.path);
    }
    println!("bundle written to {}", out.display());
    Ok(())
}

fn collect_artifacts(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut artifacts = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            artifacts.push(input.clone());
            continue;
        }
        for entry in WalkDir::new(input).into_iter().filter_map(Result::ok) {
            if entry.file_type().is_file() && is_artifact(entry.path()) {
                artifacts.push(entry.into_path());
            }
        }
    }
    artifacts.sort();
    artifacts
}

fn is_artifact(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "bin")
}
