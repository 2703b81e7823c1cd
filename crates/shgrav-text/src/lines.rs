use std::io::BufRead;

use shgrav_core::{ErrorInfo, GravError};

/// A candidate data line after header, blank and comment filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DataLine<'a> {
    /// Trimmed UTF-8 text.
    Text(&'a str),
    /// Trimmed raw bytes that are not valid UTF-8.
    Undecodable(&'a [u8]),
}

fn trim_ascii_bytes(mut bytes: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = bytes {
        if !first.is_ascii_whitespace() {
            break;
        }
        bytes = rest;
    }
    while let [rest @ .., last] = bytes {
        if !last.is_ascii_whitespace() {
            break;
        }
        bytes = rest;
    }
    bytes
}

/// Walks `reader` from the 1-based `start_line`, handing each non-blank,
/// non-comment line to `visit` along with its line number.
///
/// Lines before `start_line` are never decoded, so header text in any
/// encoding is skipped. Later lines that are not UTF-8 reach `visit` as
/// [`DataLine::Undecodable`]; only read failures abort the walk.
pub(crate) fn for_each_data_line<R, F>(
    mut reader: R,
    start_line: usize,
    origin: &str,
    mut visit: F,
) -> Result<(), GravError>
where
    R: BufRead,
    F: FnMut(usize, DataLine<'_>) -> Result<(), GravError>,
{
    let mut buf = Vec::new();
    let mut line_no = 0;
    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).map_err(|err| {
            GravError::Io(
                ErrorInfo::new("source-read", err.to_string())
                    .with_context("path", origin)
                    .with_context("line", (line_no + 1).to_string()),
            )
        })?;
        if read == 0 {
            return Ok(());
        }
        line_no += 1;
        if line_no < start_line {
            continue;
        }
        let line = match std::str::from_utf8(&buf) {
            Ok(text) => DataLine::Text(text.trim()),
            Err(_) => DataLine::Undecodable(trim_ascii_bytes(&buf)),
        };
        let skip = match line {
            DataLine::Text(text) => text.is_empty() || text.starts_with('#'),
            DataLine::Undecodable(bytes) => bytes.is_empty() || bytes[0] == b'#',
        };
        if !skip {
            visit(line_no, line)?;
        }
    }
}
