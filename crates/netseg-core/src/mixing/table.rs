//! Dense row-major count table.

use serde::{Deserialize, Serialize};

/// A dense `rows x cols` table of non-negative counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCountMatrix")]
pub struct CountMatrix {
    rows: usize,
    cols: usize,
    data: Vec<u64>,
}

/// Unchecked wire form; `data` must hold `rows * cols` cells.
#[derive(Deserialize)]
struct RawCountMatrix {
    rows: usize,
    cols: usize,
    data: Vec<u64>,
}

impl TryFrom<RawCountMatrix> for CountMatrix {
    type Error = String;

    fn try_from(raw: RawCountMatrix) -> Result<Self, Self::Error> {
        let cells = raw
            .rows
            .checked_mul(raw.cols)
            .ok_or_else(|| format!("{}x{} table is too large", raw.rows, raw.cols))?;
        if raw.data.len() != cells {
            return Err(format!(
                "{}x{} table needs {cells} cells, got {}",
                raw.rows,
                raw.cols,
                raw.data.len()
            ));
        }
        Ok(Self {
            rows: raw.rows,
            cols: raw.cols,
            data: raw.data,
        })
    }
}

impl CountMatrix {
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// Build from nested rows. Returns `None` if rows are ragged.
    #[must_use]
    pub fn from_rows(rows: &[Vec<u64>]) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        Some(Self {
            rows: rows.len(),
            cols,
            data: rows.concat(),
        })
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub const fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Cell value. Panics on out-of-range indices, like slice indexing.
    #[must_use]
    pub fn get(&self, r: usize, c: usize) -> u64 {
        self.data[r * self.cols + c]
    }

    pub fn set(&mut self, r: usize, c: usize, value: u64) {
        self.data[r * self.cols + c] = value;
    }

    pub fn add(&mut self, r: usize, c: usize, value: u64) {
        self.data[r * self.cols + c] += value;
    }

    #[must_use]
    pub fn row_sum(&self, r: usize) -> u64 {
        self.data[r * self.cols..(r + 1) * self.cols].iter().sum()
    }

    #[must_use]
    pub fn col_sum(&self, c: usize) -> u64 {
        (0..self.rows).map(|r| self.get(r, c)).sum()
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.data.iter().sum()
    }

    /// Sum of the main diagonal (`min(rows, cols)` cells).
    #[must_use]
    pub fn trace(&self) -> u64 {
        (0..self.rows.min(self.cols)).map(|i| self.get(i, i)).sum()
    }

    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.set(c, r, self.get(r, c));
            }
        }
        out
    }

    /// Whether every cell below the diagonal is zero.
    #[must_use]
    pub fn is_upper_triangular(&self) -> bool {
        (0..self.rows).all(|r| (0..self.cols.min(r)).all(|c| self.get(r, c) == 0))
    }

    /// Rows as nested vectors, for display and serialization.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<u64>> {
        (0..self.rows)
            .map(|r| self.data[r * self.cols..(r + 1) * self.cols].to_vec())
            .collect()
    }
}
