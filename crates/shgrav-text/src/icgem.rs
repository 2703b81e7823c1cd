use std::io::BufRead;
use std::path::Path;

use shgrav_core::{CoefficientEntry, CoefficientTable, ErrorInfo, GravError};

use crate::dispatch::{open_source, ParsedSource};
use crate::lines::{for_each_data_line, DataLine};
use crate::numeric::parse_fortran_f64;

const RECORD_PREFIX: &str = "gfc";
const MIN_FIELDS: usize = 5;

/// Parses an ICGEM file from the 1-based `start_line`.
///
/// Any malformed `gfc` record aborts the whole file.
pub fn parse_icgem(path: &Path, start_line: usize) -> Result<ParsedSource, GravError> {
    let reader = open_source(path)?;
    parse_icgem_reader(reader, start_line, &path.display().to_string())
}

/// Parses ICGEM text held in memory.
pub fn parse_icgem_str(text: &str, start_line: usize) -> Result<ParsedSource, GravError> {
    parse_icgem_reader(text.as_bytes(), start_line, "<memory>")
}

/// Parses ICGEM records from any buffered reader; `origin` labels errors.
pub fn parse_icgem_reader<R: BufRead>(
    reader: R,
    start_line: usize,
    origin: &str,
) -> Result<ParsedSource, GravError> {
    let mut table = CoefficientTable::new();
    for_each_data_line(reader, start_line, origin, |line_no, line| {
        let line = match line {
            DataLine::Text(text) => text,
            DataLine::Undecodable(bytes) => {
                return check_undecodable(bytes, origin, line_no);
            }
        };
        // Prefix match, so `gfct` records are taken as well.
        if !line.starts_with(RECORD_PREFIX) {
            tracing::trace!(line = line_no, "ignoring non-record line");
            return Ok(());
        }
        let entry = parse_record(line).map_err(|info| {
            GravError::Parse(
                info.with_context("path", origin)
                    .with_context("line", line_no.to_string()),
            )
        })?;
        table.insert(entry).map(|_| ()).map_err(|err| {
            err.with_context("path", origin)
                .with_context("line", line_no.to_string())
        })
    })?;
    Ok(ParsedSource {
        table,
        skipped_lines: 0,
    })
}

/// Non-UTF-8 text is only fatal when it sits in a coefficient record.
fn check_undecodable(bytes: &[u8], origin: &str, line_no: usize) -> Result<(), GravError> {
    if !String::from_utf8_lossy(bytes).starts_with(RECORD_PREFIX) {
        tracing::trace!(line = line_no, "ignoring undecodable non-record line");
        return Ok(());
    }
    Err(GravError::Parse(
        ErrorInfo::new("icgem-encoding", "gfc record is not valid UTF-8")
            .with_context("path", origin)
            .with_context("line", line_no.to_string()),
    ))
}

fn parse_record(line: &str) -> Result<CoefficientEntry, ErrorInfo> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MIN_FIELDS {
        return Err(ErrorInfo::new(
            "icgem-field-count",
            format!(
                "expected at least {MIN_FIELDS} fields, found {}",
                fields.len()
            ),
        ));
    }
    let degree = fields[1].parse::<usize>().map_err(|err| {
        ErrorInfo::new("icgem-degree", err.to_string()).with_context("field", fields[1])
    })?;
    let order = fields[2].parse::<usize>().map_err(|err| {
        ErrorInfo::new("icgem-order", err.to_string()).with_context("field", fields[2])
    })?;
    let c = parse_fortran_f64(fields[3]).map_err(|err| {
        ErrorInfo::new("icgem-coefficient", err.to_string()).with_context("field", fields[3])
    })?;
    let s = parse_fortran_f64(fields[4]).map_err(|err| {
        ErrorInfo::new("icgem-coefficient", err.to_string()).with_context("field", fields[4])
    })?;
    Ok(CoefficientEntry::new(degree, order, c, s))
}
