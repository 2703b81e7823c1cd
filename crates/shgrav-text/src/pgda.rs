use std::io::BufRead;
use std::path::Path;

use shgrav_core::{CoefficientEntry, CoefficientTable, GravError};

use crate::dispatch::{open_source, ParsedSource};
use crate::lines::{for_each_data_line, DataLine};

const MIN_FIELDS: usize = 4;

/// Parses a PGDA file from the 1-based `start_line`.
///
/// Lines that do not parse are dropped and counted in
/// [`ParsedSource::skipped_lines`]; only I/O failures abort.
pub fn parse_pgda(path: &Path, start_line: usize) -> Result<ParsedSource, GravError> {
    let reader = open_source(path)?;
    parse_pgda_reader(reader, start_line, &path.display().to_string())
}

/// Parses PGDA text held in memory.
pub fn parse_pgda_str(text: &str, start_line: usize) -> Result<ParsedSource, GravError> {
    parse_pgda_reader(text.as_bytes(), start_line, "<memory>")
}

/// Parses PGDA records from any buffered reader; `origin` labels errors.
pub fn parse_pgda_reader<R: BufRead>(
    reader: R,
    start_line: usize,
    origin: &str,
) -> Result<ParsedSource, GravError> {
    let mut table = CoefficientTable::new();
    let mut skipped_lines = 0;
    for_each_data_line(reader, start_line, origin, |line_no, line| {
        let record = match line {
            DataLine::Text(text) => parse_record(text),
            DataLine::Undecodable(_) => Err("line is not valid UTF-8".to_string()),
        };
        let inserted = record.and_then(|entry| {
            table
                .insert(entry)
                .map(|_| ())
                .map_err(|err| err.code().to_string())
        });
        if let Err(reason) = inserted {
            skipped_lines += 1;
            tracing::debug!(
                path = origin,
                line = line_no,
                %reason,
                "skipping malformed PGDA line"
            );
        }
        Ok(())
    })?;
    Ok(ParsedSource {
        table,
        skipped_lines,
    })
}

fn parse_record(line: &str) -> Result<CoefficientEntry, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < MIN_FIELDS {
        return Err(format!("expected {MIN_FIELDS} fields, found {}", fields.len()));
    }
    let degree = fields[0].parse::<usize>().map_err(|err| err.to_string())?;
    let order = fields[1].parse::<usize>().map_err(|err| err.to_string())?;
    let c = fields[2].parse::<f64>().map_err(|err| err.to_string())?;
    let s = fields[3].parse::<f64>().map_err(|err| err.to_string())?;
    Ok(CoefficientEntry::new(degree, order, c, s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_trimmed() {
        let entry = parse_record(" 3 ,  1, 2.03046E-06 , 2.48200E-07, 0.0, 0.0").unwrap();
        assert_eq!((entry.degree, entry.order), (3, 1));
        assert_eq!(entry.c, 2.03046e-6);
        assert_eq!(entry.s, 2.482e-7);
    }

    #[test]
    fn header_row_is_not_a_record() {
        let header = "1.7380000000000E+03, 4.9028000661638E+03, 0.0, 1200, 1200, 1";
        assert!(parse_record(header).is_err());
    }
}
