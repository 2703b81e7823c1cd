use nalgebra::DMatrix;
use shgrav_core::{CoefficientTable, ErrorInfo, GravError};

/// Dense C and S matrices of shape `(l_max + 1) x (m_max + 1)`.
///
/// Row index is the degree `l`, column index the order `m`, both 0-based.
/// Consumers that use 1-based addressing find `(l, m)` at `(l + 1, m + 1)`,
/// see [`DenseCoefficients::position`]. Storage is column-major, which is
/// also the on-disk order.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseCoefficients {
    c: DMatrix<f64>,
    s: DMatrix<f64>,
}

impl DenseCoefficients {
    /// Zero-filled matrices covering degrees `0..=l_max` and orders `0..=m_max`.
    pub fn zeros(l_max: usize, m_max: usize) -> Self {
        Self {
            c: DMatrix::zeros(l_max + 1, m_max + 1),
            s: DMatrix::zeros(l_max + 1, m_max + 1),
        }
    }

    /// Builds matrices from column-major buffers of length `(l_max + 1)(m_max + 1)`.
    pub fn from_column_major(
        l_max: usize,
        m_max: usize,
        c: Vec<f64>,
        s: Vec<f64>,
    ) -> Result<Self, GravError> {
        let cells = (l_max + 1) * (m_max + 1);
        if c.len() != cells || s.len() != cells {
            return Err(GravError::Layout(
                ErrorInfo::new("shape-mismatch", "buffer length does not match dimensions")
                    .with_context("expected", cells.to_string())
                    .with_context("c_len", c.len().to_string())
                    .with_context("s_len", s.len().to_string()),
            ));
        }
        Ok(Self {
            c: DMatrix::from_vec(l_max + 1, m_max + 1, c),
            s: DMatrix::from_vec(l_max + 1, m_max + 1, s),
        })
    }

    /// Largest degree covered by the rows.
    pub fn l_max(&self) -> usize {
        self.c.nrows() - 1
    }

    /// Largest order covered by the columns.
    pub fn m_max(&self) -> usize {
        self.c.ncols() - 1
    }

    /// `(rows, columns)` of each matrix.
    pub fn shape(&self) -> (usize, usize) {
        self.c.shape()
    }

    /// Cosine coefficient at `(l, m)`, `None` outside the matrix.
    pub fn c(&self, degree: usize, order: usize) -> Option<f64> {
        self.c.get((degree, order)).copied()
    }

    /// Sine coefficient at `(l, m)`, `None` outside the matrix.
    pub fn s(&self, degree: usize, order: usize) -> Option<f64> {
        self.s.get((degree, order)).copied()
    }

    /// `(C, S)` at the 1-based matrix position `(row, col)`.
    pub fn position(&self, row: usize, col: usize) -> Option<(f64, f64)> {
        let degree = row.checked_sub(1)?;
        let order = col.checked_sub(1)?;
        Some((self.c(degree, order)?, self.s(degree, order)?))
    }

    /// Cosine matrix.
    pub fn c_matrix(&self) -> &DMatrix<f64> {
        &self.c
    }

    /// Sine matrix.
    pub fn s_matrix(&self) -> &DMatrix<f64> {
        &self.s
    }

    /// Cosine values in column-major order.
    pub fn c_column_major(&self) -> &[f64] {
        self.c.as_slice()
    }

    /// Sine values in column-major order.
    pub fn s_column_major(&self) -> &[f64] {
        self.s.as_slice()
    }

    /// Whether every cell with `m > l` holds exactly zero in both matrices.
    ///
    /// Assembly never writes those cells, so a `false` here means the matrices
    /// were built from something other than a validated table.
    pub fn upper_triangle_is_zero(&self) -> bool {
        let (rows, cols) = self.shape();
        (0..cols).all(|m| {
            (0..rows.min(m)).all(|l| self.c[(l, m)] == 0.0 && self.s[(l, m)] == 0.0)
        })
    }
}

/// Scatters a parsed table into zero-initialised dense matrices.
///
/// `l_max` and `m_max` are independent maxima over the keys present. An
/// empty table cannot be assembled.
pub fn assemble(table: CoefficientTable) -> Result<DenseCoefficients, GravError> {
    let (Some(l_max), Some(m_max)) = (table.degree_max(), table.order_max()) else {
        return Err(GravError::Assembly(
            ErrorInfo::new("empty-table", "coefficient table has no entries")
                .with_hint("check the model's format and start_line"),
        ));
    };
    let mut dense = DenseCoefficients::zeros(l_max, m_max);
    for entry in table.iter() {
        dense.c[(entry.degree, entry.order)] = entry.c;
        dense.s[(entry.degree, entry.order)] = entry.s;
    }
    tracing::info!(l_max, m_max, entries = table.len(), "assembled dense coefficients");
    Ok(dense)
}

impl TryFrom<CoefficientTable> for DenseCoefficients {
    type Error = GravError;

    fn try_from(table: CoefficientTable) -> Result<Self, Self::Error> {
        assemble(table)
    }
}
