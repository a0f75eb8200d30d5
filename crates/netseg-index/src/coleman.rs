//! Coleman's homophily index.
//!
//! For group `i` the observed share of within-group ties among all ties
//! sent by members of `i` is compared to the share expected if alters
//! were chosen at random:
//!
//! ```text
//! p_i = m_ii / m_i+
//! e_i = (n_i − 1) / (N − 1)        (n_i / N when loops are allowed)
//!
//! H_i = (p_i − e_i) / (1 − e_i)    if p_i ≥ e_i
//! H_i = (p_i − e_i) / e_i          otherwise
//! ```
//!
//! `H_i` is 1 for a group that only chooses its own members, 0 at random
//! choice, and -1 for a group that never does. Undirected tables are
//! symmetrized, so each member of a tie counts as a sender.

use tracing::{instrument, warn};

use netseg_core::mixing::MixingMatrix;

use crate::{GroupScore, IndexError, group_sizes, require_square};

const INDEX: &str = "coleman";

/// Coleman's homophily index for every group.
///
/// Groups that send no ties, and groups whose expected share is 0 or 1,
/// get `None` where the formula divides by zero.
///
/// # Errors
///
/// [`IndexError::MismatchedGroups`] for cross-attribute tables and
/// [`IndexError::Undefined`] for networks of fewer than two vertices.
#[instrument(skip(mm))]
pub fn coleman(mm: &MixingMatrix) -> Result<Vec<GroupScore>, IndexError> {
    require_square(mm, INDEX)?;
    let sizes = group_sizes(mm, INDEX)?;
    let n: u64 = sizes.iter().sum();
    let loops = mm.loops();
    if n < 2 {
        return Err(IndexError::undefined(INDEX, "fewer than two vertices"));
    }
    let m = mm.ordered_contact()?;

    let scores = mm
        .ego_levels()
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let sent = m.row_sum(i);
            let value = if sent == 0 {
                warn!(group = %group, "group sends no ties");
                None
            } else {
                let p = m.get(i, i) as f64 / sent as f64;
                let e = if loops {
                    sizes[i] as f64 / n as f64
                } else {
                    sizes[i].saturating_sub(1) as f64 / (n - 1) as f64
                };
                homophily(p, e)
            };
            GroupScore {
                group: group.clone(),
                value,
            }
        })
        .collect();
    Ok(scores)
}

fn homophily(p: f64, e: f64) -> Option<f64> {
    if p >= e {
        let denom = 1.0 - e;
        (denom > 0.0).then(|| (p - e) / denom)
    } else {
        (e > 0.0).then(|| (p - e) / e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netseg_core::graph::{AttributedGraph, Vertex};
    use netseg_core::mixing::{MixingOptions, mixingm};

    fn scores(directed: bool, edges: &[(&str, &str)]) -> Vec<GroupScore> {
        let g = AttributedGraph::from_edges(
            directed,
            [
                Vertex::new("a", [("g", "x")]),
                Vertex::new("b", [("g", "x")]),
                Vertex::new("c", [("g", "y")]),
                Vertex::new("d", [("g", "y")]),
                Vertex::new("e", [("g", "y")]),
            ],
            edges,
        )
        .expect("graph");
        coleman(&mixingm(&g, "g", "g", MixingOptions::contact()).expect("mm")).expect("coleman")
    }

    #[test]
    fn fully_homophilous_group_scores_one() {
        let s = scores(true, &[("a", "b"), ("b", "a"), ("c", "a")]);
        assert_eq!(s[0].group, "x");
        assert!((s[0].value.expect("x") - 1.0).abs() < 1e-12);
        // y: p = 0, e = 2/4 → -1
        assert!((s[1].value.expect("y") + 1.0).abs() < 1e-12);
    }

    #[test]
    fn random_mixing_scores_zero() {
        // x sends 1 of 4 ties internally; e_x = 1/4
        let s = scores(true, &[("a", "b"), ("a", "c"), ("a", "d"), ("a", "e")]);
        assert!(s[0].value.expect("x").abs() < 1e-12);
        assert_eq!(s[1].value, None, "y sends nothing");
    }

    #[test]
    fn loops_use_share_of_all_vertices() {
        let g = AttributedGraph::from_edges(
            true,
            [
                Vertex::new("a", [("g", "x")]),
                Vertex::new("b", [("g", "x")]),
                Vertex::new("c", [("g", "y")]),
                Vertex::new("d", [("g", "y")]),
                Vertex::new("e", [("g", "y")]),
            ],
            &[("a", "b"), ("a", "c"), ("c", "a")],
        )
        .expect("graph");
        let mm = mixingm(&g, "g", "g", MixingOptions::contact().with_loops(true)).expect("mm");
        let s = coleman(&mm).expect("coleman");
        // x: p = 1/2, e = 2/5 → (1/10) / (3/5) = 1/6 (1/3 without loops)
        assert!((s[0].value.expect("x") - 1.0 / 6.0).abs() < 1e-12);
        // y: p = 0, e = 3/5 → -1
        assert!((s[1].value.expect("y") + 1.0).abs() < 1e-12);
    }

    #[test]
    fn undirected_counts_both_endpoints() {
        // symmetrized: x row = [0, 1], y row = [1, 2]
        let s = scores(false, &[("a", "c"), ("d", "e")]);
        // x: p = 0, e = 1/4 → -1
        assert!((s[0].value.expect("x") + 1.0).abs() < 1e-12);
        // y: p = 2/3, e = 1/2 → (1/6) / (1/2) = 1/3
        assert!((s[1].value.expect("y") - 1.0 / 3.0).abs() < 1e-12);
    }
}
