use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use shgrav_core::{CoefficientTable, GravError, SourceFormat};

use crate::{icgem, pgda};

/// Coefficients recovered from one source file plus parse diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSource {
    /// Entries keyed by `(l, m)`.
    pub table: CoefficientTable,
    /// Data lines that were dropped as malformed (PGDA only).
    pub skipped_lines: usize,
}

impl ParsedSource {
    /// Discards the diagnostics and keeps the table.
    pub fn into_table(self) -> CoefficientTable {
        self.table
    }
}

pub(crate) fn open_source(path: &Path) -> Result<BufReader<File>, GravError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|err| GravError::io("source-read", path, err))
}

/// Parses `path` with the parser selected by `format`, starting at the
/// 1-based `start_line`.
pub fn parse_file(
    format: SourceFormat,
    path: &Path,
    start_line: usize,
) -> Result<ParsedSource, GravError> {
    let parsed = match format {
        SourceFormat::Icgem => icgem::parse_icgem(path, start_line)?,
        SourceFormat::Pgda => pgda::parse_pgda(path, start_line)?,
    };
    tracing::info!(
        format = %format,
        path = %path.display(),
        entries = parsed.table.len(),
        skipped = parsed.skipped_lines,
        "parsed coefficient source"
    );
    Ok(parsed)
}
