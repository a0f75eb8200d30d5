//! Freshtman's Segregation Matrix Index.
//!
//! For group `i`, with `d_ii` the density of ties within the group and
//! `d_io` the density of ties between the group and everyone else:
//!
//! ```text
//! r_i   = d_ii / d_io
//! SMI_i = (r_i − 1) / (r_i + 1)      (normalized, in [-1, 1])
//! ```
//!
//! Directed tables use the ties members send to other groups; undirected
//! tables use every between-group tie incident to the group.

use tracing::instrument;

use netseg_core::mixing::MixingMatrix;

use crate::{GroupScore, IndexError, require_full, require_square};

const INDEX: &str = "smi";

/// Segregation Matrix Index for every group of a full mixing matrix.
///
/// A group with no possible within- or between-group dyads gets `None`.
/// With no between-group ties the ratio is infinite: the normalized index
/// is then 1 (if the group has any within-group tie), the raw ratio `None`.
///
/// # Errors
///
/// [`IndexError::NotFull`] for a contact layer and
/// [`IndexError::MismatchedGroups`] for cross-attribute tables.
#[instrument(skip(mm))]
pub fn smi(mm: &MixingMatrix, normalize: bool) -> Result<Vec<GroupScore>, IndexError> {
    require_full(mm, INDEX)?;
    require_square(mm, INDEX)?;
    let ties = mm.contact();
    let Some(non_ties) = mm.no_tie() else {
        return Err(IndexError::NotFull { index: INDEX });
    };
    let dyads = |r: usize, c: usize| ties.get(r, c) + non_ties.get(r, c);
    let directed = mm.is_directed();
    let k = ties.rows();

    let scores = mm
        .ego_levels()
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let (mut between_ties, mut between_dyads) = (0_u64, 0_u64);
            for j in (0..k).filter(|&j| j != i) {
                between_ties += ties.get(i, j);
                between_dyads += dyads(i, j);
                if !directed {
                    between_ties += ties.get(j, i);
                    between_dyads += dyads(j, i);
                }
            }
            let within = density(ties.get(i, i), dyads(i, i));
            let between = density(between_ties, between_dyads);
            GroupScore {
                group: group.clone(),
                value: within.zip(between).and_then(|(w, b)| score(w, b, normalize)),
            }
        })
        .collect();
    Ok(scores)
}

fn density(ties: u64, dyads: u64) -> Option<f64> {
    (dyads > 0).then(|| ties as f64 / dyads as f64)
}

fn score(within: f64, between: f64, normalize: bool) -> Option<f64> {
    if between == 0.0 {
        return (normalize && within > 0.0).then_some(1.0);
    }
    let r = within / between;
    Some(if normalize { (r - 1.0) / (r + 1.0) } else { r })
}

#[cfg(test)]
mod tests {
    use super::*;
    use netseg_core::graph::{AttributedGraph, Vertex};
    use netseg_core::mixing::{MixingOptions, mixingm};

    fn full(edges: &[(&str, &str)]) -> MixingMatrix {
        let g = AttributedGraph::from_edges(
            false,
            [
                Vertex::new("a", [("g", "x")]),
                Vertex::new("b", [("g", "x")]),
                Vertex::new("c", [("g", "x")]),
                Vertex::new("d", [("g", "y")]),
                Vertex::new("e", [("g", "y")]),
            ],
            edges,
        )
        .expect("graph");
        mixingm(&g, "g", "g", MixingOptions::full()).expect("mm")
    }

    #[test]
    fn known_ratios() {
        let mm = full(&[("a", "b"), ("d", "e"), ("a", "d")]);
        let raw = smi(&mm, false).expect("smi");
        // x: (1/3) / (1/6) = 2; y: 1 / (1/6) = 6
        assert!((raw[0].value.expect("x") - 2.0).abs() < 1e-12);
        assert!((raw[1].value.expect("y") - 6.0).abs() < 1e-12);

        let norm = smi(&mm, true).expect("smi");
        assert!((norm[0].value.expect("x") - 1.0 / 3.0).abs() < 1e-12);
        assert!((norm[1].value.expect("y") - 5.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn no_between_ties() {
        let mm = full(&[("a", "b")]);
        let norm = smi(&mm, true).expect("smi");
        assert_eq!(norm[0].value, Some(1.0));
        assert_eq!(norm[1].value, None, "y has no ties at all");
        let raw = smi(&mm, false).expect("smi");
        assert_eq!(raw[0].value, None);
    }

    #[test]
    fn normalized_in_range() {
        let mm = full(&[("a", "d"), ("b", "e"), ("c", "d"), ("a", "b")]);
        for s in smi(&mm, true).expect("smi") {
            if let Some(v) = s.value {
                assert!((-1.0..=1.0).contains(&v), "{} = {v}", s.group);
            }
        }
    }
}
