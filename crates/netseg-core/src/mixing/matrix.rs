//! The [`MixingMatrix`] type and the [`mixingm`] entry point.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::MixingConfig;
use crate::error::MixingError;
use crate::graph::build::AttributedGraph;
use crate::graph::groups::{GroupSizes, Grouping};
use crate::mixing::contact::contact_layer;
use crate::mixing::fold::symmetrize;
use crate::mixing::full::{FullLayers, full_mm};
use crate::mixing::table::CountMatrix;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How to count dyads when building a mixing matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MixingOptions {
    /// Also count non-ties (3-D dyad census).
    pub full: bool,
    /// Treat the graph as directed. Defaults to the graph's own flag.
    pub directed: Option<bool>,
    /// Whether self-ties are possible dyads. Defaults to whether the graph
    /// has any loop.
    pub loops: Option<bool>,
}

impl MixingOptions {
    /// Contact layer only, graph defaults.
    #[must_use]
    pub const fn contact() -> Self {
        Self {
            full: false,
            directed: None,
            loops: None,
        }
    }

    /// Full dyad census, graph defaults.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            full: true,
            directed: None,
            loops: None,
        }
    }

    #[must_use]
    pub const fn with_directed(mut self, directed: bool) -> Self {
        self.directed = Some(directed);
        self
    }

    #[must_use]
    pub const fn with_loops(mut self, loops: bool) -> Self {
        self.loops = Some(loops);
        self
    }
}

impl From<&MixingConfig> for MixingOptions {
    fn from(cfg: &MixingConfig) -> Self {
        Self {
            full: cfg.full,
            directed: cfg.directed,
            loops: cfg.loops,
        }
    }
}

// ---------------------------------------------------------------------------
// MixingMatrix
// ---------------------------------------------------------------------------

/// Ties (and optionally non-ties) cross-tabulated by endpoint groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixingMatrix {
    ego_levels: Vec<String>,
    alter_levels: Vec<String>,
    directed: bool,
    loops: bool,
    sizes: GroupSizes,
    contact: CountMatrix,
    no_tie: Option<CountMatrix>,
}

/// One cell of a mixing matrix in long format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixingRecord {
    pub ego: String,
    pub alter: String,
    /// `None` for a contact layer, otherwise the tie axis value.
    pub tie: Option<bool>,
    pub count: u64,
}

impl MixingMatrix {
    /// Assemble a mixing matrix from a precomputed contact layer.
    ///
    /// With `full` the non-tie layer is derived via [`full_mm`], so the
    /// same validation applies.
    ///
    /// # Errors
    ///
    /// Returns [`MixingError::DimensionMismatch`] if the level lists or the
    /// group sizes do not match the table, plus any [`full_mm`] error.
    pub fn from_contact(
        ego_levels: Vec<String>,
        alter_levels: Vec<String>,
        contact: CountMatrix,
        sizes: GroupSizes,
        directed: bool,
        loops: bool,
        full: bool,
    ) -> Result<Self, MixingError> {
        if (ego_levels.len(), alter_levels.len()) != (contact.rows(), contact.cols()) {
            return Err(MixingError::DimensionMismatch {
                contact_rows: contact.rows(),
                contact_cols: contact.cols(),
                size_rows: ego_levels.len(),
                size_cols: alter_levels.len(),
            });
        }
        let (size_rows, size_cols) = sizes.shape();
        if (size_rows, size_cols) != (contact.rows(), contact.cols()) {
            return Err(MixingError::DimensionMismatch {
                contact_rows: contact.rows(),
                contact_cols: contact.cols(),
                size_rows,
                size_cols,
            });
        }
        let no_tie = if full {
            let FullLayers { no_tie, .. } = full_mm(
                &contact,
                &sizes,
                directed,
                loops,
                Some((ego_levels.as_slice(), alter_levels.as_slice())),
            )?;
            Some(no_tie)
        } else {
            if !directed && !contact.is_upper_triangular() {
                warn!("undirected contact layer has counts below the diagonal");
            }
            None
        };
        Ok(Self {
            ego_levels,
            alter_levels,
            directed,
            loops,
            sizes,
            contact,
            no_tie,
        })
    }

    #[must_use]
    pub fn ego_levels(&self) -> &[String] {
        &self.ego_levels
    }

    #[must_use]
    pub fn alter_levels(&self) -> &[String] {
        &self.alter_levels
    }

    /// Whether egos and alters are classified by the same groups.
    #[must_use]
    pub fn is_square(&self) -> bool {
        self.ego_levels == self.alter_levels
    }

    #[must_use]
    pub const fn is_directed(&self) -> bool {
        self.directed
    }

    #[must_use]
    pub const fn loops(&self) -> bool {
        self.loops
    }

    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.no_tie.is_some()
    }

    #[must_use]
    pub const fn sizes(&self) -> &GroupSizes {
        &self.sizes
    }

    /// Tie counts (the contact layer).
    #[must_use]
    pub const fn contact(&self) -> &CountMatrix {
        &self.contact
    }

    /// Non-tie counts, present for full matrices.
    #[must_use]
    pub const fn no_tie(&self) -> Option<&CountMatrix> {
        self.no_tie.as_ref()
    }

    /// Contact layer in ordered-pair form.
    ///
    /// Directed tables are returned as-is; undirected (folded) tables are
    /// symmetrized so that every tie is seen from both endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`MixingError::NotSquare`] for an undirected table that is
    /// not square.
    pub fn ordered_contact(&self) -> Result<CountMatrix, MixingError> {
        if self.directed {
            Ok(self.contact.clone())
        } else {
            symmetrize(&self.contact)
        }
    }

    /// Value of one cell of the 3-D array. `None` if out of range or if a
    /// non-tie count is requested from a contact layer.
    #[must_use]
    pub fn get(&self, ego: usize, alter: usize, tie: bool) -> Option<u64> {
        if ego >= self.contact.rows() || alter >= self.contact.cols() {
            return None;
        }
        if tie {
            Some(self.contact.get(ego, alter))
        } else {
            self.no_tie.as_ref().map(|m| m.get(ego, alter))
        }
    }

    /// Total number of dyads in a full matrix.
    #[must_use]
    pub fn total_dyads(&self) -> Option<u64> {
        self.no_tie
            .as_ref()
            .map(|m| m.total() + self.contact.total())
    }

    /// Long-format rows, ego-major then alter; for full matrices the
    /// no-tie record precedes the tie record of each cell.
    #[must_use]
    pub fn records(&self) -> Vec<MixingRecord> {
        let mut out = Vec::with_capacity(
            self.contact.rows() * self.contact.cols() * if self.is_full() { 2 } else { 1 },
        );
        for (r, ego) in self.ego_levels.iter().enumerate() {
            for (c, alter) in self.alter_levels.iter().enumerate() {
                match &self.no_tie {
                    Some(no_tie) => {
                        out.push(MixingRecord {
                            ego: ego.clone(),
                            alter: alter.clone(),
                            tie: Some(false),
                            count: no_tie.get(r, c),
                        });
                        out.push(MixingRecord {
                            ego: ego.clone(),
                            alter: alter.clone(),
                            tie: Some(true),
                            count: self.contact.get(r, c),
                        });
                    }
                    None => out.push(MixingRecord {
                        ego: ego.clone(),
                        alter: alter.clone(),
                        tie: None,
                        count: self.contact.get(r, c),
                    }),
                }
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Mixing matrix of `graph` with egos grouped by `rattr` and alters by
/// `cattr`.
///
/// # Errors
///
/// Grouping errors for missing attributes, [`MixingError::DirectedOnUndirected`]
/// when forcing a directed view of an undirected graph, and any error from
/// [`mixingm_grouped`].
#[instrument(skip(graph), fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn mixingm(
    graph: &AttributedGraph,
    rattr: &str,
    cattr: &str,
    options: MixingOptions,
) -> Result<MixingMatrix, MixingError> {
    let rows = Grouping::from_attr(graph, rattr)?;
    let cols = if rattr == cattr {
        rows.clone()
    } else {
        Grouping::from_attr(graph, cattr)?
    };
    mixingm_grouped(graph, &rows, &cols, options)
}

/// Mixing matrix over precomputed groupings (e.g. with explicit levels).
///
/// # Errors
///
/// See [`mixingm`].
pub fn mixingm_grouped(
    graph: &AttributedGraph,
    rows: &Grouping,
    cols: &Grouping,
    options: MixingOptions,
) -> Result<MixingMatrix, MixingError> {
    rows.ensure_covers(graph)?;
    cols.ensure_covers(graph)?;
    let directed = options.directed.unwrap_or_else(|| graph.is_directed());
    if directed && !graph.is_directed() {
        return Err(MixingError::DirectedOnUndirected);
    }
    let loops = options.loops.unwrap_or_else(|| graph.has_loops());

    let contact = contact_layer(graph, rows, cols, directed)?;
    let sizes = if rows.same_groups(cols) {
        rows.sizes()
    } else {
        GroupSizes::cross(rows, cols)?
    };

    debug!(directed, loops, full = options.full, "assembling mixing matrix");
    MixingMatrix::from_contact(
        rows.levels().to_vec(),
        cols.levels().to_vec(),
        contact,
        sizes,
        directed,
        loops,
        options.full,
    )
}
