use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use shgrav_core::ModelRegistry;

use super::print_json;

#[derive(Args, Debug)]
pub struct ModelsArgs {
    /// TOML registry describing known models
    #[arg(long)]
    pub registry: PathBuf,
    /// Print the registry as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &ModelsArgs) -> Result<(), Box<dyn Error>> {
    let registry = ModelRegistry::load(&args.registry)?;
    if args.json {
        return print_json(&registry);
    }
    for (name, spec) in registry.iter() {
        println!(
            "{name:<16} {:<6} line {:<4} {:<28} GM={:e} R={}",
            spec.format.label(),
            spec.start_line,
            spec.filename,
            spec.gm,
            spec.radius
        );
        if let Some(description) = &spec.description {
            println!("{:<16} {description}", "");
        }
    }
    Ok(())
}
