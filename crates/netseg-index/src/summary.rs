//! All graph-level indices for one attribute in a single pass.
//!
//! Indices that are undefined for the input (no ties, a single group, ...)
//! are reported as `None` rather than failing the whole summary; hard
//! errors (missing attributes, inconsistent options) still propagate.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use netseg_core::config::NetsegConfig;
use netseg_core::graph::AttributedGraph;
use netseg_core::mixing::{MixingOptions, mixingm};

use crate::IndexError;
use crate::{assort, ei, freeman, gamix, orwg};

/// Graph-level segregation measures for one attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegregationSummary {
    pub attr: String,
    pub directed: bool,
    pub ties: u64,
    pub dyads: u64,
    pub ei: Option<f64>,
    pub assortativity: Option<f64>,
    pub freeman: Option<f64>,
    pub gamix: Option<f64>,
    pub orwg: Option<f64>,
}

/// Compute every graph-level index of `graph` grouped by `attr`.
///
/// The full mixing matrix is built once using `config.mixing` (its `full`
/// flag is ignored; the census is always full).
///
/// # Errors
///
/// Mixing-matrix errors; index-specific degeneracies become `None`.
#[instrument(skip(graph, config))]
pub fn summarize(
    graph: &AttributedGraph,
    attr: &str,
    config: &NetsegConfig,
) -> Result<SegregationSummary, IndexError> {
    let options = MixingOptions {
        full: true,
        ..MixingOptions::from(&config.mixing)
    };
    let mm = mixingm(graph, attr, attr, options)?;

    let summary = SegregationSummary {
        attr: attr.to_string(),
        directed: mm.is_directed(),
        ties: mm.contact().total(),
        dyads: mm.total_dyads().unwrap_or_default(),
        ei: soft(ei::ei(&mm))?,
        assortativity: soft(assort::assort(&mm))?,
        freeman: soft(freeman::freeman(&mm))?,
        gamix: soft(gamix::gamix(&mm, config.index.drop_empty_groups))?,
        orwg: soft(orwg::orwg(&mm))?,
    };
    info!(
        attr,
        ties = summary.ties,
        dyads = summary.dyads,
        "segregation summary computed"
    );
    Ok(summary)
}

/// Map degenerate-input errors to `None`, keep the rest.
fn soft(result: Result<f64, IndexError>) -> Result<Option<f64>, IndexError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(
            IndexError::NoTies { .. }
            | IndexError::Undefined { .. }
            | IndexError::EmptyGroup { .. },
        ) => Ok(None),
        Err(e) => Err(e),
    }
}
