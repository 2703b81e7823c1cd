#![deny(missing_docs)]
#![doc = "Parsers for the ICGEM and PGDA spherical-harmonic coefficient text formats."]

/// Format dispatch and the shared parse result.
pub mod dispatch;
/// Whitespace-delimited `gfc` record parser.
pub mod icgem;
/// Fortran-style numeric helpers.
pub mod numeric;
/// Comma-delimited record parser.
pub mod pgda;

mod lines;

pub use dispatch::{parse_file, ParsedSource};
pub use icgem::{parse_icgem, parse_icgem_reader, parse_icgem_str};
pub use numeric::parse_fortran_f64;
pub use pgda::{parse_pgda, parse_pgda_reader, parse_pgda_str};
