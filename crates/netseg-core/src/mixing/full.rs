//! Full mixing matrix: ties and non-ties per (ego group, alter group).
//!
//! # Margins
//!
//! The margin of a cell is the number of dyads that could carry a tie:
//!
//! | sizes  | directed | cell        | margin                          |
//! |--------|----------|-------------|---------------------------------|
//! | vector | yes      | `i != j`    | `n_i * n_j`                     |
//! | vector | yes      | `i == i`    | `n_i^2` or `n_i (n_i - 1)`      |
//! | vector | no       | `i < j`     | `n_i * n_j`                     |
//! | vector | no       | `i == i`    | `n_i (n_i + 1) / 2` or `n_i (n_i - 1) / 2` |
//! | vector | no       | `i > j`     | `0`                             |
//! | table  | yes      | `(r, c)`    | `R_r * C_c - [no loops] s_rc`   |
//!
//! The first diagonal variant in each row applies when loops are allowed.
//! Margins always sum to [`total_dyads`].

use tracing::{debug, instrument};

use crate::error::MixingError;
use crate::graph::groups::GroupSizes;
use crate::mixing::table::CountMatrix;

/// Number of possible dyads among `n` vertices.
#[must_use]
pub const fn total_dyads(n: u64, directed: bool, loops: bool) -> u64 {
    match (directed, loops) {
        (true, true) => n * n,
        (true, false) => n * n.saturating_sub(1),
        (false, true) => n * (n + 1) / 2,
        (false, false) => n * n.saturating_sub(1) / 2,
    }
}

/// Possible-dyad counts for every cell of the mixing matrix.
///
/// # Errors
///
/// Returns [`MixingError::UndirectedCrossAttributes`] for table sizes on an
/// undirected graph.
pub fn margins(sizes: &GroupSizes, directed: bool, loops: bool) -> Result<CountMatrix, MixingError> {
    match sizes {
        GroupSizes::Vector(n) => Ok(vector_margins(n, directed, loops)),
        GroupSizes::Table(s) => {
            if !directed {
                return Err(MixingError::UndirectedCrossAttributes {
                    rattr: "rows".to_string(),
                    cattr: "columns".to_string(),
                });
            }
            Ok(table_margins(s, loops))
        }
    }
}

fn vector_margins(n: &[u64], directed: bool, loops: bool) -> CountMatrix {
    let k = n.len();
    let mut m = CountMatrix::zeros(k, k);
    for i in 0..k {
        for j in 0..k {
            let value = if i == j {
                total_dyads(n[i], directed, loops)
            } else if directed || i < j {
                n[i] * n[j]
            } else {
                0
            };
            m.set(i, j, value);
        }
    }
    m
}

fn table_margins(s: &CountMatrix, loops: bool) -> CountMatrix {
    let row_sizes: Vec<u64> = (0..s.rows()).map(|r| s.row_sum(r)).collect();
    let col_sizes: Vec<u64> = (0..s.cols()).map(|c| s.col_sum(c)).collect();
    let mut m = CountMatrix::zeros(s.rows(), s.cols());
    for (r, &rs) in row_sizes.iter().enumerate() {
        for (c, &cs) in col_sizes.iter().enumerate() {
            let own = if loops { 0 } else { s.get(r, c) };
            m.set(r, c, rs * cs - own);
        }
    }
    m
}

/// The two layers of a full mixing matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullLayers {
    /// Dyads without a tie.
    pub no_tie: CountMatrix,
    /// Dyads with a tie (the contact layer).
    pub tie: CountMatrix,
}

impl FullLayers {
    /// `no_tie + tie`, i.e. the margins.
    #[must_use]
    pub fn dyads(&self) -> CountMatrix {
        let mut out = self.no_tie.clone();
        for r in 0..out.rows() {
            for c in 0..out.cols() {
                out.add(r, c, self.tie.get(r, c));
            }
        }
        out
    }
}

/// Expand a contact layer into a full dyad census.
///
/// `levels` name the rows and columns for error reporting; when `None`,
/// cells are reported by index.
///
/// # Errors
///
/// - [`MixingError::DimensionMismatch`] if `contact` and `sizes` disagree.
/// - [`MixingError::UndirectedCrossAttributes`] for table sizes with
///   `directed = false`.
/// - [`MixingError::ContactExceedsMargin`] if a cell holds more ties than
///   dyads (loops with `loops = false`, multi-edges, or lower-triangle
///   counts in an undirected table).
#[instrument(skip(contact, sizes, levels))]
pub fn full_mm(
    contact: &CountMatrix,
    sizes: &GroupSizes,
    directed: bool,
    loops: bool,
    levels: Option<(&[String], &[String])>,
) -> Result<FullLayers, MixingError> {
    let (size_rows, size_cols) = sizes.shape();
    if (contact.rows(), contact.cols()) != (size_rows, size_cols) {
        return Err(MixingError::DimensionMismatch {
            contact_rows: contact.rows(),
            contact_cols: contact.cols(),
            size_rows,
            size_cols,
        });
    }

    let margin = margins(sizes, directed, loops)?;
    let mut no_tie = CountMatrix::zeros(contact.rows(), contact.cols());
    for r in 0..contact.rows() {
        for c in 0..contact.cols() {
            let ties = contact.get(r, c);
            let possible = margin.get(r, c);
            let Some(rest) = possible.checked_sub(ties) else {
                let label = |names: Option<&[String]>, i: usize| {
                    names
                        .and_then(|n| n.get(i).cloned())
                        .unwrap_or_else(|| i.to_string())
                };
                return Err(MixingError::ContactExceedsMargin {
                    ego: label(levels.map(|l| l.0), r),
                    alter: label(levels.map(|l| l.1), c),
                    contact: ties,
                    margin: possible,
                });
            };
            no_tie.set(r, c, rest);
        }
    }

    debug!(
        ties = contact.total(),
        dyads = margin.total(),
        "full mixing matrix built"
    );
    Ok(FullLayers {
        no_tie,
        tie: contact.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dyad_totals() {
        assert_eq!(total_dyads(4, true, false), 12);
        assert_eq!(total_dyads(4, true, true), 16);
        assert_eq!(total_dyads(4, false, false), 6);
        assert_eq!(total_dyads(4, false, true), 10);
        assert_eq!(total_dyads(0, true, false), 0);
        assert_eq!(total_dyads(0, false, false), 0);
    }

    #[test]
    fn directed_vector_margins() {
        let m = margins(&GroupSizes::Vector(vec![2, 3]), true, false).expect("margins");
        assert_eq!(m.to_rows(), vec![vec![2, 6], vec![6, 6]]);
        assert_eq!(m.total(), total_dyads(5, true, false));
    }

    #[test]
    fn undirected_vector_margins_with_loops() {
        let m = margins(&GroupSizes::Vector(vec![2, 3]), false, true).expect("margins");
        assert_eq!(m.to_rows(), vec![vec![3, 6], vec![0, 6]]);
        assert_eq!(m.total(), total_dyads(5, false, true));
    }

    #[test]
    fn table_margins_subtract_self_pairs() {
        // 3 vertices: (x,p), (x,q), (y,p)
        let s = CountMatrix::from_rows(&[vec![1, 1], vec![1, 0]]).expect("sizes");
        let m = margins(&GroupSizes::Table(s), true, false).expect("margins");
        // rows: x=2, y=1; cols: p=2, q=1
        assert_eq!(m.to_rows(), vec![vec![3, 1], vec![1, 1]]);
        assert_eq!(m.total(), total_dyads(3, true, false));
    }

    #[test]
    fn table_margins_undirected_rejected() {
        let s = CountMatrix::zeros(2, 2);
        assert!(matches!(
            margins(&GroupSizes::Table(s), false, false),
            Err(MixingError::UndirectedCrossAttributes { .. })
        ));
    }

    #[test]
    fn full_layers_sum_to_margins() {
        let contact = CountMatrix::from_rows(&[vec![1, 2], vec![0, 3]]).expect("contact");
        let sizes = GroupSizes::Vector(vec![2, 3]);
        let full = full_mm(&contact, &sizes, false, false, None).expect("full");
        assert_eq!(full.no_tie.to_rows(), vec![vec![0, 4], vec![0, 0]]);
        assert_eq!(full.dyads().total(), total_dyads(5, false, false));
    }

    #[test]
    fn loop_without_loop_margin_rejected() {
        let contact = CountMatrix::from_rows(&[vec![1]]).expect("contact");
        let levels = vec!["solo".to_string()];
        let err = full_mm(
            &contact,
            &GroupSizes::Vector(vec![1]),
            true,
            false,
            Some((levels.as_slice(), levels.as_slice())),
        )
        .expect_err("loop exceeds margin");
        assert_eq!(
            err,
            MixingError::ContactExceedsMargin {
                ego: "solo".into(),
                alter: "solo".into(),
                contact: 1,
                margin: 0,
            }
        );
    }

    #[test]
    fn dimension_mismatch_rejected() {
        let contact = CountMatrix::zeros(2, 2);
        let err = full_mm(&contact, &GroupSizes::Vector(vec![1, 1, 1]), true, false, None)
            .expect_err("mismatch");
        assert!(matches!(err, MixingError::DimensionMismatch { .. }));
    }
}
