//! Vertex grouping by a categorical attribute, and group sizes.

use std::collections::BTreeSet;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::MixingError;
use crate::graph::build::AttributedGraph;
use crate::mixing::table::CountMatrix;

/// Assignment of every vertex to one level of an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouping {
    attr: String,
    levels: Vec<String>,
    /// Level index per vertex, indexed by `NodeIndex::index()`.
    membership: Vec<usize>,
}

impl Grouping {
    /// Group vertices by `attr`, with levels being the sorted distinct labels.
    ///
    /// # Errors
    ///
    /// Returns [`MixingError::MissingAttribute`] if any vertex lacks `attr`.
    #[instrument(skip(graph))]
    pub fn from_attr(graph: &AttributedGraph, attr: &str) -> Result<Self, MixingError> {
        let mut labels = BTreeSet::new();
        for v in graph.graph().node_weights() {
            let label = v.attr(attr).ok_or_else(|| MixingError::MissingAttribute {
                vertex: v.name.clone(),
                attr: attr.to_string(),
            })?;
            labels.insert(label);
        }
        let levels: Vec<String> = labels.into_iter().map(str::to_string).collect();
        Self::with_levels(graph, attr, levels)
    }

    /// Group vertices by `attr` using an explicit level order.
    ///
    /// Levels without members are kept and produce empty rows/columns.
    ///
    /// # Errors
    ///
    /// Returns [`MixingError::MissingAttribute`] for vertices lacking `attr`
    /// and [`MixingError::UnknownLevel`] for labels outside `levels`.
    pub fn with_levels(
        graph: &AttributedGraph,
        attr: &str,
        levels: Vec<String>,
    ) -> Result<Self, MixingError> {
        let membership = graph
            .graph()
            .node_weights()
            .map(|v| {
                let label = v.attr(attr).ok_or_else(|| MixingError::MissingAttribute {
                    vertex: v.name.clone(),
                    attr: attr.to_string(),
                })?;
                levels
                    .iter()
                    .position(|l| l == label)
                    .ok_or_else(|| MixingError::UnknownLevel {
                        vertex: v.name.clone(),
                        attr: attr.to_string(),
                        value: label.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            attr: attr.to_string(),
            levels,
            membership,
        })
    }

    #[must_use]
    pub fn attr(&self) -> &str {
        &self.attr
    }

    #[must_use]
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    #[must_use]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Number of vertices this grouping assigns.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.membership.len()
    }

    /// Fail unless this grouping assigns exactly the vertices of `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`MixingError::GroupingMismatch`] when the vertex counts
    /// differ.
    pub fn ensure_covers(&self, graph: &AttributedGraph) -> Result<(), MixingError> {
        if self.membership.len() == graph.vertex_count() {
            Ok(())
        } else {
            Err(MixingError::GroupingMismatch {
                attr: self.attr.clone(),
                grouped: self.membership.len(),
                vertices: graph.vertex_count(),
            })
        }
    }

    /// Level index of a vertex.
    #[must_use]
    pub fn group_of(&self, idx: NodeIndex) -> Option<usize> {
        self.membership.get(idx.index()).copied()
    }

    /// Whether two groupings describe the same attribute and level order.
    #[must_use]
    pub fn same_groups(&self, other: &Self) -> bool {
        self.attr == other.attr && self.levels == other.levels
    }

    /// Number of vertices per level.
    #[must_use]
    pub fn sizes(&self) -> GroupSizes {
        let mut counts = vec![0_u64; self.levels.len()];
        for &g in &self.membership {
            counts[g] += 1;
        }
        GroupSizes::Vector(counts)
    }
}

/// Vertex counts per group (one attribute) or per group combination (two).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupSizes {
    /// `n[i]` vertices in group `i`.
    Vector(Vec<u64>),
    /// `s[r][c]` vertices with row level `r` and column level `c`.
    Table(CountMatrix),
}

impl GroupSizes {
    /// Cross-tabulate two groupings of the same graph.
    ///
    /// # Errors
    ///
    /// Returns [`MixingError::DimensionMismatch`] if the groupings cover a
    /// different number of vertices.
    pub fn cross(rows: &Grouping, cols: &Grouping) -> Result<Self, MixingError> {
        if rows.membership.len() != cols.membership.len() {
            return Err(MixingError::DimensionMismatch {
                contact_rows: rows.membership.len(),
                contact_cols: cols.membership.len(),
                size_rows: rows.level_count(),
                size_cols: cols.level_count(),
            });
        }
        let mut table = CountMatrix::zeros(rows.level_count(), cols.level_count());
        for (&r, &c) in rows.membership.iter().zip(&cols.membership) {
            table.add(r, c, 1);
        }
        Ok(Self::Table(table))
    }

    /// `(rows, cols)` this size object yields margins for.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Self::Vector(n) => (n.len(), n.len()),
            Self::Table(t) => (t.rows(), t.cols()),
        }
    }

    /// Total number of vertices.
    #[must_use]
    pub fn total(&self) -> u64 {
        match self {
            Self::Vector(n) => n.iter().sum(),
            Self::Table(t) => t.total(),
        }
    }

    /// The size vector, when sizes come from a single attribute.
    #[must_use]
    pub fn as_vector(&self) -> Option<&[u64]> {
        match self {
            Self::Vector(n) => Some(n),
            Self::Table(_) => None,
        }
    }
}
