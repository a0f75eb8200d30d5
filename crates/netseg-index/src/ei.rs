//! Krackhardt's E-I index.
//!
//! `EI = (E - I) / (E + I)` where `E` counts ties between different groups
//! and `I` ties within a group. The index ranges from -1 (all ties
//! internal) to +1 (all ties external).
//!
//! Group- and vertex-level variants count, for each group or vertex, the
//! ties incident to it regardless of direction.

use tracing::{debug, instrument};

use netseg_core::graph::{AttributedGraph, Grouping};
use netseg_core::mixing::{MixingMatrix, MixingOptions, mixingm};

use crate::{GroupScore, IndexError, VertexScore, require_square};

const INDEX: &str = "ei";

fn ratio(external: u64, internal: u64) -> Option<f64> {
    let total = external + internal;
    if total == 0 {
        return None;
    }
    Some((external as f64 - internal as f64) / total as f64)
}

/// Graph-level E-I index from a mixing matrix.
///
/// # Errors
///
/// [`IndexError::MismatchedGroups`] for cross-attribute tables and
/// [`IndexError::NoTies`] for a table without ties.
#[instrument(skip(mm))]
pub fn ei(mm: &MixingMatrix) -> Result<f64, IndexError> {
    require_square(mm, INDEX)?;
    let contact = mm.contact();
    let internal = contact.trace();
    let external = contact.total() - internal;
    debug!(internal, external, "e-i counts");
    ratio(external, internal).ok_or(IndexError::NoTies { index: INDEX })
}

/// Graph-level E-I index of `graph` grouped by `attr`.
///
/// # Errors
///
/// Mixing-matrix errors, plus those of [`ei`].
pub fn ei_graph(graph: &AttributedGraph, attr: &str) -> Result<f64, IndexError> {
    let mm = mixingm(graph, attr, attr, MixingOptions::contact())?;
    ei(&mm)
}

/// Group-level E-I index: ties incident to each group.
///
/// # Errors
///
/// [`IndexError::MismatchedGroups`] for cross-attribute tables.
pub fn ei_groups(mm: &MixingMatrix) -> Result<Vec<GroupScore>, IndexError> {
    require_square(mm, INDEX)?;
    let contact = mm.contact();
    let k = contact.rows();
    Ok(mm
        .ego_levels()
        .iter()
        .enumerate()
        .map(|(g, name)| {
            let internal = contact.get(g, g);
            let external: u64 = (0..k)
                .filter(|&h| h != g)
                .map(|h| contact.get(g, h) + contact.get(h, g))
                .sum();
            GroupScore {
                group: name.clone(),
                value: ratio(external, internal),
            }
        })
        .collect())
}

/// Vertex-level E-I index: each vertex's incident ties, by alter group.
///
/// Isolates get `None`. A loop counts once as an internal tie.
///
/// # Errors
///
/// Grouping errors for a missing attribute.
#[instrument(skip(graph))]
pub fn ei_vertices(graph: &AttributedGraph, attr: &str) -> Result<Vec<VertexScore>, IndexError> {
    let grouping = Grouping::from_attr(graph, attr)?;
    let n = graph.vertex_count();
    let mut internal = vec![0_u64; n];
    let mut external = vec![0_u64; n];

    for (a, b) in graph.edges() {
        if a == b {
            internal[a.index()] += 1;
            continue;
        }
        let counts = if grouping.group_of(a) == grouping.group_of(b) {
            &mut internal
        } else {
            &mut external
        };
        counts[a.index()] += 1;
        counts[b.index()] += 1;
    }

    Ok(graph
        .graph()
        .node_indices()
        .map(|idx| VertexScore {
            vertex: graph.graph()[idx].name.clone(),
            value: ratio(external[idx.index()], internal[idx.index()]),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use netseg_core::graph::Vertex;

    fn graph(directed: bool, edges: &[(&str, &str)]) -> AttributedGraph {
        AttributedGraph::from_edges(
            directed,
            [
                Vertex::new("a", [("g", "x")]),
                Vertex::new("b", [("g", "x")]),
                Vertex::new("c", [("g", "y")]),
                Vertex::new("d", [("g", "y")]),
            ],
            edges,
        )
        .expect("graph")
    }

    #[test]
    fn all_internal_is_minus_one() {
        let g = graph(false, &[("a", "b"), ("c", "d")]);
        assert!((ei_graph(&g, "g").expect("ei") + 1.0).abs() < 1e-12);
    }

    #[test]
    fn all_external_is_plus_one() {
        let g = graph(true, &[("a", "c"), ("d", "b")]);
        assert!((ei_graph(&g, "g").expect("ei") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn mixed_ties() {
        // internal: a-b; external: a-c, b-d, b-c
        let g = graph(false, &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "b")]);
        assert!((ei_graph(&g, "g").expect("ei") - 0.5).abs() < 1e-12);
    }

    #[test]
    fn no_ties_is_an_error() {
        let g = graph(false, &[]);
        assert_eq!(
            ei_graph(&g, "g"),
            Err(IndexError::NoTies { index: "ei" })
        );
    }

    #[test]
    fn group_level() {
        // x: internal a-b, external a-c, b-c; y: internal none, external 2
        let g = graph(false, &[("a", "b"), ("a", "c"), ("c", "b")]);
        let mm = mixingm(&g, "g", "g", MixingOptions::contact()).expect("mm");
        let groups = ei_groups(&mm).expect("groups");
        assert_eq!(groups[0].group, "x");
        assert!((groups[0].value.expect("x") - (2.0 - 1.0) / 3.0).abs() < 1e-12);
        assert!((groups[1].value.expect("y") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn vertex_level() {
        let g = graph(true, &[("a", "b"), ("a", "c"), ("c", "d")]);
        let scores = ei_vertices(&g, "g").expect("vertices");
        let value = |name: &str| {
            scores
                .iter()
                .find(|s| s.vertex == name)
                .and_then(|s| s.value)
        };
        // a: internal b, external c → 0
        assert!(value("a").expect("a").abs() < 1e-12);
        assert!((value("b").expect("b") + 1.0).abs() < 1e-12);
        // c: external a, internal d → 0
        assert!(value("c").expect("c").abs() < 1e-12);
        assert!((value("d").expect("d") + 1.0).abs() < 1e-12);
    }

    #[test]
    fn isolates_have_no_vertex_score() {
        let g = graph(false, &[("a", "b")]);
        let scores = ei_vertices(&g, "g").expect("vertices");
        assert_eq!(scores[2].vertex, "c");
        assert_eq!(scores[2].value, None);
    }
}
