use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use shgrav_artifact::MappedArtifact;

use super::print_json;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Artifact to inspect
    pub artifact: PathBuf,
    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct InspectSummary {
    path: String,
    l_max: i32,
    m_max: i32,
    gm: f64,
    radius: f64,
    byte_len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    c20: Option<f64>,
}

pub fn run(args: &InspectArgs) -> Result<(), Box<dyn Error>> {
    let mapped = MappedArtifact::open(&args.artifact)?;
    let header = mapped.header();
    let summary = InspectSummary {
        path: args.artifact.display().to_string(),
        l_max: header.l_max,
        m_max: header.m_max,
        gm: header.gm,
        radius: header.radius,
        byte_len: mapped.as_bytes().len(),
        c20: mapped.coefficient(2, 0).map(|(c, _)| c),
    };
    if args.json {
        return print_json(&summary);
    }
    println!("{}", summary.path);
    println!("  l_max  {}", summary.l_max);
    println!("  m_max  {}", summary.m_max);
    println!("  GM     {:e} m^3/s^2", summary.gm);
    println!("  radius {} m", summary.radius);
    println!("  bytes  {}", summary.byte_len);
    if let Some(c20) = summary.c20 {
        println!("  C(2,0) {c20:e}");
    }
    Ok(())
}
