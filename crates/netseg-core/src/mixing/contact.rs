//! Contact layer: tie counts by (ego group, alter group).

use tracing::{debug, instrument};

use crate::error::MixingError;
use crate::graph::build::AttributedGraph;
use crate::graph::groups::Grouping;
use crate::mixing::fold::{FoldDirection, fold};
use crate::mixing::table::CountMatrix;

/// Count realized ties by the groups of their endpoints.
///
/// Each edge `(u, v)` adds one to `m[rows(u)][cols(v)]`. When `directed` is
/// false the table is folded onto the upper triangle, which requires the
/// same grouping for egos and alters.
///
/// # Errors
///
/// Returns [`MixingError::UndirectedCrossAttributes`] for undirected
/// counting over two different groupings and
/// [`MixingError::GroupingMismatch`] for groupings of another graph.
#[instrument(skip_all, fields(rattr = rows.attr(), cattr = cols.attr(), directed = directed))]
pub fn contact_layer(
    graph: &AttributedGraph,
    rows: &Grouping,
    cols: &Grouping,
    directed: bool,
) -> Result<CountMatrix, MixingError> {
    if !directed && !rows.same_groups(cols) {
        return Err(MixingError::UndirectedCrossAttributes {
            rattr: rows.attr().to_string(),
            cattr: cols.attr().to_string(),
        });
    }

    rows.ensure_covers(graph)?;
    cols.ensure_covers(graph)?;

    let mut m = CountMatrix::zeros(rows.level_count(), cols.level_count());
    for (a, b) in graph.edges() {
        let (Some(r), Some(c)) = (rows.group_of(a), cols.group_of(b)) else {
            return Err(MixingError::GroupingMismatch {
                attr: rows.attr().to_string(),
                grouped: rows.vertex_count(),
                vertices: graph.vertex_count(),
            });
        };
        m.add(r, c, 1);
    }

    let m = if directed {
        m
    } else {
        fold(&m, FoldDirection::Upper)?
    };
    debug!(
        rows = m.rows(),
        cols = m.cols(),
        ties = m.total(),
        "contact layer built"
    );
    Ok(m)
}
