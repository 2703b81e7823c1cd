//! Byte layout of `<model>.bin` artifacts.
//!
//! | offset | size | field |
//! |---|---|---|
//! | 0 | 4 | `l_max`, i32 LE |
//! | 4 | 4 | `m_max`, i32 LE |
//! | 8 | 8 | GM, f64 LE |
//! | 16 | 8 | reference radius, f64 LE |
//! | 24 | 8N | C, column-major f64 LE |
//! | 24 + 8N | 8N | S, column-major f64 LE |
//!
//! where `N = (l_max + 1)(m_max + 1)`.

use serde::{Deserialize, Serialize};
use shgrav_core::{ErrorInfo, GravError};

use crate::assemble::DenseCoefficients;

/// Size of the fixed header in bytes.
pub const HEADER_LEN: usize = 24;

/// Size of one stored coefficient in bytes.
pub(crate) const VALUE_LEN: usize = 8;

/// Fixed-size header preceding the coefficient payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArtifactHeader {
    /// Largest degree stored.
    pub l_max: i32,
    /// Largest order stored.
    pub m_max: i32,
    /// Gravitational parameter GM.
    pub gm: f64,
    /// Reference radius.
    pub radius: f64,
}

fn to_i32(value: usize, field: &str) -> Result<i32, GravError> {
    i32::try_from(value).map_err(|_| {
        GravError::Layout(
            ErrorInfo::new("dimension-overflow", format!("{field} does not fit in i32"))
                .with_context(field, value.to_string()),
        )
    })
}

impl ArtifactHeader {
    /// Header describing `coefficients` with the supplied physical constants.
    pub fn for_coefficients(
        coefficients: &DenseCoefficients,
        gm: f64,
        radius: f64,
    ) -> Result<Self, GravError> {
        Ok(Self {
            l_max: to_i32(coefficients.l_max(), "l_max")?,
            m_max: to_i32(coefficients.m_max(), "m_max")?,
            gm,
            radius,
        })
    }

    /// `(l_max, m_max)` as unsigned sizes, rejecting negative values.
    pub fn dimensions(&self) -> Result<(usize, usize), GravError> {
        let convert = |value: i32, field: &str| {
            usize::try_from(value).map_err(|_| {
                GravError::Layout(
                    ErrorInfo::new("negative-dimension", format!("{field} is negative"))
                        .with_context(field, value.to_string()),
                )
            })
        };
        Ok((convert(self.l_max, "l_max")?, convert(self.m_max, "m_max")?))
    }

    /// Number of cells in each of the C and S matrices.
    pub fn cell_count(&self) -> Result<usize, GravError> {
        let (l_max, m_max) = self.dimensions()?;
        (l_max + 1).checked_mul(m_max + 1).ok_or_else(|| {
            GravError::Layout(
                ErrorInfo::new("dimension-overflow", "cell count overflows usize")
                    .with_context("l_max", l_max.to_string())
                    .with_context("m_max", m_max.to_string()),
            )
        })
    }

    /// Total file length implied by the header.
    pub fn file_len(&self) -> Result<usize, GravError> {
        let cells = self.cell_count()?;
        cells
            .checked_mul(2 * VALUE_LEN)
            .and_then(|payload| payload.checked_add(HEADER_LEN))
            .ok_or_else(|| {
                GravError::Layout(ErrorInfo::new(
                    "dimension-overflow",
                    "artifact length overflows usize",
                ))
            })
    }

    /// Rejects non-positive or non-finite GM and radius.
    pub fn validate_constants(&self) -> Result<(), GravError> {
        for (field, value) in [("gm", self.gm), ("radius", self.radius)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(GravError::Layout(
                    ErrorInfo::new("invalid-constant", format!("{field} must be positive"))
                        .with_context(field, value.to_string()),
                ));
            }
        }
        Ok(())
    }

    /// Checks that the header dimensions describe `coefficients`.
    pub fn check_shape(&self, coefficients: &DenseCoefficients) -> Result<(), GravError> {
        let (l_max, m_max) = self.dimensions()?;
        if (l_max, m_max) != (coefficients.l_max(), coefficients.m_max()) {
            return Err(GravError::Layout(
                ErrorInfo::new("shape-mismatch", "header dimensions differ from matrix shape")
                    .with_context("header_l_max", l_max.to_string())
                    .with_context("header_m_max", m_max.to_string())
                    .with_context("matrix_l_max", coefficients.l_max().to_string())
                    .with_context("matrix_m_max", coefficients.m_max().to_string()),
            ));
        }
        Ok(())
    }

    /// Little-endian header bytes.
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(&self.l_max.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.m_max.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.gm.to_le_bytes());
        bytes[16..24].copy_from_slice(&self.radius.to_le_bytes());
        bytes
    }

    /// Reads a header from the first [`HEADER_LEN`] bytes.
    pub fn decode(bytes: &[u8; HEADER_LEN]) -> Self {
        let mut i32_buf = [0u8; 4];
        i32_buf.copy_from_slice(&bytes[0..4]);
        let l_max = i32::from_le_bytes(i32_buf);
        i32_buf.copy_from_slice(&bytes[4..8]);
        let m_max = i32::from_le_bytes(i32_buf);
        Self {
            l_max,
            m_max,
            gm: read_f64(bytes, 8),
            radius: read_f64(bytes, 16),
        }
    }
}

pub(crate) fn read_f64(bytes: &[u8], offset: usize) -> f64 {
    let mut buf = [0u8; VALUE_LEN];
    buf.copy_from_slice(&bytes[offset..offset + VALUE_LEN]);
    f64::from_le_bytes(buf)
}

/// Writes header and payload into `dst`, which must be exactly `header.file_len()` long.
pub(crate) fn encode_into(
    header: &ArtifactHeader,
    coefficients: &DenseCoefficients,
    dst: &mut [u8],
) {
    dst[..HEADER_LEN].copy_from_slice(&header.encode());
    let values = coefficients
        .c_column_major()
        .iter()
        .chain(coefficients.s_column_major());
    for (chunk, value) in dst[HEADER_LEN..].chunks_exact_mut(VALUE_LEN).zip(values) {
        chunk.copy_from_slice(&value.to_le_bytes());
    }
}

/// Validates `bytes` against the header it starts with.
///
/// Returns the header and the per-matrix cell count. Trailing bytes are
/// tolerated and logged.
pub(crate) fn check_layout(
    bytes: &[u8],
    origin: &str,
) -> Result<(ArtifactHeader, usize), GravError> {
    let truncated = |expected: usize| {
        GravError::Io(
            ErrorInfo::new("artifact-truncated", "artifact shorter than declared layout")
                .with_context("path", origin)
                .with_context("expected", expected.to_string())
                .with_context("actual", bytes.len().to_string()),
        )
    };
    let Some(head) = bytes.get(..HEADER_LEN) else {
        return Err(truncated(HEADER_LEN));
    };
    let mut header_bytes = [0u8; HEADER_LEN];
    header_bytes.copy_from_slice(head);
    let header = ArtifactHeader::decode(&header_bytes);
    let cells = header
        .cell_count()
        .map_err(|err| err.with_context("path", origin))?;
    let expected = header
        .file_len()
        .map_err(|err| err.with_context("path", origin))?;
    if bytes.len() < expected {
        return Err(truncated(expected));
    }
    if bytes.len() > expected {
        tracing::warn!(
            path = origin,
            expected,
            actual = bytes.len(),
            "artifact carries trailing bytes"
        );
    }
    Ok((header, cells))
}

/// Decodes `count` column-major values starting at byte `offset`.
pub(crate) fn decode_values(bytes: &[u8], offset: usize, count: usize) -> Vec<f64> {
    bytes[offset..offset + count * VALUE_LEN]
        .chunks_exact(VALUE_LEN)
        .map(|chunk| read_f64(chunk, 0))
        .collect()
}

/// Byte offset of value `(l, m)` in the C block; the S block follows at `+ 8N`.
pub(crate) fn value_offset(l_max: usize, degree: usize, order: usize) -> usize {
    HEADER_LEN + (order * (l_max + 1) + degree) * VALUE_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_bytes_are_little_endian() {
        let header = ArtifactHeader {
            l_max: 3,
            m_max: 2,
            gm: 1.0,
            radius: 2.0,
        };
        let bytes = header.encode();
        assert_eq!(&bytes[0..4], &[3, 0, 0, 0]);
        assert_eq!(&bytes[4..8], &[2, 0, 0, 0]);
        assert_eq!(&bytes[8..16], &1.0f64.to_le_bytes());
        assert_eq!(ArtifactHeader::decode(&bytes), header);
        assert_eq!(header.file_len().unwrap(), 24 + 2 * 12 * 8);
    }

    #[test]
    fn offsets_walk_rows_fastest() {
        assert_eq!(value_offset(3, 0, 0), 24);
        assert_eq!(value_offset(3, 1, 0), 32);
        assert_eq!(value_offset(3, 0, 1), 24 + 4 * 8);
    }

    #[test]
    fn negative_dimensions_are_rejected() {
        let header = ArtifactHeader {
            l_max: -1,
            m_max: 0,
            gm: 1.0,
            radius: 1.0,
        };
        assert_eq!(header.cell_count().unwrap_err().code(), "negative-dimension");
    }
}
