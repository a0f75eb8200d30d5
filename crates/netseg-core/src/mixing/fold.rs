//! Folding and symmetrizing square tables.
//!
//! An undirected tie between groups `i` and `j` may land in either `(i, j)`
//! or `(j, i)` depending on edge orientation. Folding moves every count onto
//! one triangle so each unordered group pair owns exactly one cell.

use serde::{Deserialize, Serialize};

use crate::error::MixingError;
use crate::mixing::table::CountMatrix;

/// Triangle that receives the folded counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoldDirection {
    #[default]
    Upper,
    Lower,
}

/// Add the opposite triangle onto `direction` and zero it.
///
/// # Errors
///
/// Returns [`MixingError::NotSquare`] for non-square input.
pub fn fold(m: &CountMatrix, direction: FoldDirection) -> Result<CountMatrix, MixingError> {
    ensure_square(m)?;
    let n = m.rows();
    let mut out = m.clone();
    for i in 0..n {
        for j in (i + 1)..n {
            let sum = m.get(i, j) + m.get(j, i);
            match direction {
                FoldDirection::Upper => {
                    out.set(i, j, sum);
                    out.set(j, i, 0);
                }
                FoldDirection::Lower => {
                    out.set(j, i, sum);
                    out.set(i, j, 0);
                }
            }
        }
    }
    Ok(out)
}

/// Return `m + mᵀ`.
///
/// Applied to a folded undirected table this yields ordered-pair counts:
/// every between-group tie appears in both `(i, j)` and `(j, i)`, every
/// within-group tie twice on the diagonal.
///
/// # Errors
///
/// Returns [`MixingError::NotSquare`] for non-square input.
pub fn symmetrize(m: &CountMatrix) -> Result<CountMatrix, MixingError> {
    ensure_square(m)?;
    let n = m.rows();
    let mut out = CountMatrix::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            out.set(i, j, m.get(i, j) + m.get(j, i));
        }
    }
    Ok(out)
}

fn ensure_square(m: &CountMatrix) -> Result<(), MixingError> {
    if m.is_square() {
        Ok(())
    } else {
        Err(MixingError::NotSquare {
            rows: m.rows(),
            cols: m.cols(),
        })
    }
}
