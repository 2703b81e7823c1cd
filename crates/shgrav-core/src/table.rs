//! Sparse coefficient storage filled while a source file is parsed.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, GravError};

/// Highest degree accepted from a source file.
///
/// Rows are allocated per degree on first use, so a stray high-degree line
/// costs one row of `degree + 1` slots. A fully populated table at this
/// degree holds about 33.6M slots of 24 bytes each (roughly 800 MB), and the dense matrices
/// built from it are larger still.
pub const MAX_SUPPORTED_DEGREE: usize = 8192;

/// One (degree, order) term of a spherical-harmonic expansion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoefficientEntry {
    /// Degree `l`.
    pub degree: usize,
    /// Order `m`, with `m <= l`.
    pub order: usize,
    /// Cosine coefficient.
    pub c: f64,
    /// Sine coefficient.
    pub s: f64,
}

impl CoefficientEntry {
    /// Creates a new entry without validating it; validation happens on insert.
    pub fn new(degree: usize, order: usize, c: f64, s: f64) -> Self {
        Self {
            degree,
            order,
            c,
            s,
        }
    }
}

/// Mapping from `(l, m)` to `(C, S)` stored as one row per degree.
///
/// Row `l` holds orders `0..=l` and is allocated the first time degree `l`
/// is inserted; untouched degrees cost nothing beyond an empty `Vec`.
/// Inserting an existing key overwrites it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoefficientTable {
    rows: Vec<Vec<Option<(f64, f64)>>>,
    len: usize,
    degree_max: Option<usize>,
    order_max: Option<usize>,
    overwrites: usize,
}

impl CoefficientTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from a sequence of entries, applying last-write-wins.
    pub fn from_entries<I>(entries: I) -> Result<Self, GravError>
    where
        I: IntoIterator<Item = CoefficientEntry>,
    {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry)?;
        }
        Ok(table)
    }

    /// Inserts an entry, returning the `(C, S)` pair it replaced, if any.
    pub fn insert(&mut self, entry: CoefficientEntry) -> Result<Option<(f64, f64)>, GravError> {
        let CoefficientEntry {
            degree,
            order,
            c,
            s,
        } = entry;
        if order > degree {
            return Err(GravError::Parse(
                ErrorInfo::new(
                    "order-exceeds-degree",
                    format!("order {order} exceeds degree {degree}"),
                )
                .with_context("degree", degree.to_string())
                .with_context("order", order.to_string()),
            ));
        }
        if degree > MAX_SUPPORTED_DEGREE {
            return Err(GravError::Parse(
                ErrorInfo::new(
                    "degree-out-of-range",
                    format!("degree {degree} exceeds supported maximum {MAX_SUPPORTED_DEGREE}"),
                )
                .with_context("degree", degree.to_string()),
            ));
        }
        if !c.is_finite() || !s.is_finite() {
            return Err(GravError::Parse(
                ErrorInfo::new("non-finite-coefficient", "coefficient is not finite")
                    .with_context("degree", degree.to_string())
                    .with_context("order", order.to_string()),
            ));
        }

        if self.rows.len() <= degree {
            self.rows.resize_with(degree + 1, Vec::new);
        }
        let row = &mut self.rows[degree];
        if row.is_empty() {
            row.resize(degree + 1, None);
        }

        let previous = row[order].replace((c, s));
        if previous.is_some() {
            self.overwrites += 1;
            tracing::debug!(degree, order, "duplicate coefficient overwrites earlier entry");
        } else {
            self.len += 1;
        }
        self.degree_max = Some(self.degree_max.map_or(degree, |max| max.max(degree)));
        self.order_max = Some(self.order_max.map_or(order, |max| max.max(order)));
        Ok(previous)
    }

    /// Returns the `(C, S)` pair stored for `(degree, order)`.
    pub fn get(&self, degree: usize, order: usize) -> Option<(f64, f64)> {
        self.rows.get(degree)?.get(order).copied().flatten()
    }

    /// Number of distinct keys stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no entry has been stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Largest degree observed, if any.
    pub fn degree_max(&self) -> Option<usize> {
        self.degree_max
    }

    /// Largest order observed across all degrees, if any.
    pub fn order_max(&self) -> Option<usize> {
        self.order_max
    }

    /// Number of inserts that replaced an existing key.
    pub fn overwrites(&self) -> usize {
        self.overwrites
    }

    /// Iterates stored entries in ascending `(l, m)` order.
    pub fn iter(&self) -> impl Iterator<Item = CoefficientEntry> + '_ {
        self.rows.iter().enumerate().flat_map(|(degree, row)| {
            row.iter().enumerate().filter_map(move |(order, pair)| {
                pair.map(|(c, s)| CoefficientEntry::new(degree, order, c, s))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_high_degree_entry_allocates_one_row() {
        let mut table = CoefficientTable::new();
        table
            .insert(CoefficientEntry::new(MAX_SUPPORTED_DEGREE, 0, 1.0, 0.0))
            .unwrap();
        let slots: usize = table.rows.iter().map(Vec::len).sum();
        assert_eq!(slots, MAX_SUPPORTED_DEGREE + 1);
        assert_eq!(table.get(MAX_SUPPORTED_DEGREE, 0), Some((1.0, 0.0)));
        assert_eq!(table.get(MAX_SUPPORTED_DEGREE - 1, 0), None);
    }

    #[test]
    fn rows_fill_in_when_lower_degrees_arrive_later() {
        let table = CoefficientTable::from_entries([
            CoefficientEntry::new(5, 2, 1.0, 2.0),
            CoefficientEntry::new(2, 1, 3.0, 4.0),
        ])
        .unwrap();
        let slots: usize = table.rows.iter().map(Vec::len).sum();
        assert_eq!(slots, 6 + 3);
        assert_eq!(table.get(2, 1), Some((3.0, 4.0)));
        assert_eq!(table.get(2, 3), None);
    }

    #[test]
    fn maxima_are_tracked_independently() {
        let table = CoefficientTable::from_entries([
            CoefficientEntry::new(4, 0, 1.0, 0.0),
            CoefficientEntry::new(3, 3, 1.0, 1.0),
        ])
        .unwrap();
        assert_eq!(table.degree_max(), Some(4));
        assert_eq!(table.order_max(), Some(3));
    }
}
