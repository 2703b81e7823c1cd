use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use shgrav_artifact::artifact_sha256;

#[derive(Args, Debug)]
pub struct ChecksumArgs {
    /// Files to digest
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Prints `<sha256>  <path>` lines in the `sha256sum` format.
pub fn run(args: &ChecksumArgs) -> Result<(), Box<dyn Error>> {
    for path in &args.files {
        let digest = artifact_sha256(path)?;
        println!("{digest}  {}", path.display());
    }
    Ok(())
}
