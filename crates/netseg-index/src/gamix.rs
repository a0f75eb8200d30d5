//! Gupta–Anderson–May assortativity coefficient `Q`.
//!
//! ```text
//! Q = (Σ_i m_ii / m_i+ − 1) / (K − 1)
//! ```
//!
//! `Q = 1` for complete within-group mixing, `-1 / (K − 1)` when no tie
//! stays within a group.

use tracing::{instrument, warn};

use netseg_core::mixing::MixingMatrix;

use crate::{IndexError, require_square};

const INDEX: &str = "gamix";

/// Gupta–Anderson–May `Q` of a mixing matrix.
///
/// Groups that send no ties are skipped when `drop_empty` is set (and
/// excluded from `K`); otherwise they are an error.
///
/// # Errors
///
/// - [`IndexError::MismatchedGroups`] for cross-attribute tables.
/// - [`IndexError::EmptyGroup`] for a tie-less group without `drop_empty`.
/// - [`IndexError::Undefined`] when fewer than two groups remain.
#[instrument(skip(mm))]
pub fn gamix(mm: &MixingMatrix, drop_empty: bool) -> Result<f64, IndexError> {
    require_square(mm, INDEX)?;
    let m = mm.ordered_contact()?;

    let mut k = 0_usize;
    let mut within = 0.0_f64;
    for (i, group) in mm.ego_levels().iter().enumerate() {
        let sent = m.row_sum(i);
        if sent == 0 {
            if !drop_empty {
                return Err(IndexError::EmptyGroup {
                    index: INDEX,
                    group: group.clone(),
                });
            }
            warn!(group = %group, "skipping group without ties");
            continue;
        }
        k += 1;
        within += m.get(i, i) as f64 / sent as f64;
    }

    if k < 2 {
        return Err(IndexError::undefined(INDEX, "fewer than two groups with ties"));
    }
    Ok((within - 1.0) / (k - 1) as f64)
}
