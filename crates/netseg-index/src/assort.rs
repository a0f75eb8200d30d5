//! Newman's assortativity coefficient for categorical attributes.
//!
//! With `e` the mixing matrix normalized to sum to one, `a` its row sums
//! and `b` its column sums:
//!
//! ```text
//! r = (Σ e_ii − Σ a_i b_i) / (1 − Σ a_i b_i)
//! ```
//!
//! Undirected tables are symmetrized first so each tie contributes half to
//! `e_ij` and half to `e_ji`.

use tracing::{debug, instrument};

use netseg_core::mixing::MixingMatrix;

use crate::{IndexError, require_square};

const INDEX: &str = "assort";

/// Assortativity coefficient of a mixing matrix.
///
/// # Errors
///
/// - [`IndexError::MismatchedGroups`] for cross-attribute tables.
/// - [`IndexError::NoTies`] for a table without ties.
/// - [`IndexError::Undefined`] when `Σ a_i b_i = 1`, i.e. every tie sits in
///   a single group.
#[instrument(skip(mm))]
pub fn assort(mm: &MixingMatrix) -> Result<f64, IndexError> {
    require_square(mm, INDEX)?;
    let m = mm.ordered_contact()?;
    let total = m.total();
    if total == 0 {
        return Err(IndexError::NoTies { index: INDEX });
    }
    let total = total as f64;
    let k = m.rows();

    let trace = m.trace() as f64 / total;
    let expected: f64 = (0..k)
        .map(|i| (m.row_sum(i) as f64 / total) * (m.col_sum(i) as f64 / total))
        .sum();

    let denom = 1.0 - expected;
    if denom.abs() < f64::EPSILON {
        return Err(IndexError::undefined(INDEX, "all ties fall within a single group"));
    }
    let r = (trace - expected) / denom;
    debug!(trace, expected, r, "assortativity");
    Ok(r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use netseg_core::graph::{AttributedGraph, Vertex};
    use netseg_core::mixing::{MixingOptions, mixingm};

    fn mm(directed: bool, edges: &[(&str, &str)]) -> MixingMatrix {
        let g = AttributedGraph::from_edges(
            directed,
            [
                Vertex::new("a", [("g", "x")]),
                Vertex::new("b", [("g", "x")]),
                Vertex::new("c", [("g", "y")]),
                Vertex::new("d", [("g", "y")]),
            ],
            edges,
        )
        .expect("graph");
        mixingm(&g, "g", "g", MixingOptions::contact()).expect("mm")
    }

    #[test]
    fn perfectly_assortative() {
        let r = assort(&mm(false, &[("a", "b"), ("c", "d")])).expect("r");
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn perfectly_disassortative() {
        // e = [[0, .5], [.5, 0]]: a = b = [.5, .5]; r = (0 - .5) / .5 = -1
        let r = assort(&mm(false, &[("a", "c"), ("b", "d")])).expect("r");
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn directed_table_not_symmetrized() {
        // e = [[1/3, 1/3], [0, 1/3]]; a = [2/3, 1/3]; b = [1/3, 2/3]
        // Σab = 2/9 + 2/9 = 4/9; r = (2/3 - 4/9) / (5/9) = 2/5
        let r = assort(&mm(true, &[("a", "b"), ("a", "c"), ("c", "d")])).expect("r");
        assert!((r - 0.4).abs() < 1e-12);
    }

    #[test]
    fn single_group_ties_undefined() {
        let err = assort(&mm(false, &[("a", "b")])).expect_err("undefined");
        assert!(matches!(err, IndexError::Undefined { .. }));
    }
}
