//! Freeman's segregation index.
//!
//! Compares the observed share of between-group ties `p` with the share of
//! between-group dyads `π` implied by group sizes:
//!
//! ```text
//! S = 1 − p / π
//! π = (N² − Σ n_i²) / (N (N − 1))
//! ```
//!
//! With loops the denominator becomes `N²` (directed) or `N (N + 1)`
//! (undirected), counting self-dyads as within-group.
//!
//! `S = 0` under random mixing, `S = 1` when no tie crosses groups; it is
//! negative when groups mix more than chance.

use tracing::{debug, instrument};

use netseg_core::mixing::MixingMatrix;

use crate::{IndexError, group_sizes, require_square};

const INDEX: &str = "freeman";

/// Freeman's segregation index of a mixing matrix.
///
/// # Errors
///
/// - [`IndexError::MismatchedGroups`] for cross-attribute tables.
/// - [`IndexError::NoTies`] for a table without ties.
/// - [`IndexError::Undefined`] when every vertex is in one group.
#[instrument(skip(mm))]
pub fn freeman(mm: &MixingMatrix) -> Result<f64, IndexError> {
    require_square(mm, INDEX)?;
    let sizes = group_sizes(mm, INDEX)?;

    let contact = mm.contact();
    let ties = contact.total();
    if ties == 0 {
        return Err(IndexError::NoTies { index: INDEX });
    }
    let between = ties - contact.trace();
    let observed = between as f64 / ties as f64;

    let n: u64 = sizes.iter().sum();
    let sum_sq: u64 = sizes.iter().map(|s| s * s).sum();
    let pairs = match (mm.loops(), mm.is_directed()) {
        (false, _) => n * n.saturating_sub(1),
        (true, true) => n * n,
        (true, false) => n * (n + 1),
    };
    if pairs == 0 || n * n == sum_sq {
        return Err(IndexError::undefined(INDEX, "no between-group dyads"));
    }
    let expected = (n * n - sum_sq) as f64 / pairs as f64;

    let s = 1.0 - observed / expected;
    debug!(observed, expected, s, "freeman segregation");
    Ok(s)
}
