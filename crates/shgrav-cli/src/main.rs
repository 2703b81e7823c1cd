use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    bundle::{self, BundleArgs},
    checksum::{self, ChecksumArgs},
    convert::{self, ConvertArgs},
    inspect::{self, InspectArgs},
    models::{self, ModelsArgs},
    verify::{self, VerifyArgs},
};
use tracing_subscriber::EnvFilter;

mod commands;

const DEFAULT_LOG_FILTER: &str = "shgrav=info";

#[derive(Parser, Debug)]
#[command(
    name = "shgrav",
    version,
    about = "Spherical-harmonic gravity coefficient converter"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a registered model's text source and write `<model>.bin`.
    Convert(ConvertArgs),
    /// Print the header and shape of an existing artifact.
    Inspect(InspectArgs),
    /// Re-parse a source and check an artifact against it bit for bit.
    Verify(VerifyArgs),
    /// Print SHA-256 digests of files.
    Checksum(ChecksumArgs),
    /// Pack artifacts into a zip bundle, or verify an existing bundle.
    Bundle(BundleArgs),
    /// List the models of a registry file.
    Models(ModelsArgs),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Convert(_) => "convert",
            Command::Inspect(_) => "inspect",
            Command::Verify(_) => "verify",
            Command::Checksum(_) => "checksum",
            Command::Bundle(_) => "bundle",
            Command::Models(_) => "models",
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let name = cli.command.name();
    tracing::debug!(command = name, "running command");
    let result = match cli.command {
        Command::Convert(args) => convert::run(&args),
        Command::Inspect(args) => inspect::run(&args),
        Command::Verify(args) => verify::run(&args),
        Command::Checksum(args) => checksum::run(&args),
        Command::Bundle(args) => bundle::run(&args),
        Command::Models(args) => models::run(&args),
    };
    if let Err(err) = &result {
        tracing::error!(command = name, %err, "command failed");
    }
    result
}
