//! Odds ratio of within-group ties.
//!
//! From the full dyad census:
//!
//! ```text
//! OR = (within ties / within non-ties) / (between ties / between non-ties)
//! ```
//!
//! Values above 1 mean a within-group dyad is more likely to be a tie than
//! a between-group dyad.

use tracing::{debug, instrument};

use netseg_core::mixing::MixingMatrix;

use crate::{IndexError, require_full, require_square};

const INDEX: &str = "orwg";

/// Odds ratio of within-group ties of a full mixing matrix.
///
/// # Errors
///
/// - [`IndexError::NotFull`] for a contact layer.
/// - [`IndexError::MismatchedGroups`] for cross-attribute tables.
/// - [`IndexError::Undefined`] when a denominator count is zero.
#[instrument(skip(mm))]
pub fn orwg(mm: &MixingMatrix) -> Result<f64, IndexError> {
    require_full(mm, INDEX)?;
    require_square(mm, INDEX)?;
    let ties = mm.contact();
    let Some(non_ties) = mm.no_tie() else {
        return Err(IndexError::NotFull { index: INDEX });
    };

    let within_ties = ties.trace();
    let within_non = non_ties.trace();
    let between_ties = ties.total() - within_ties;
    let between_non = non_ties.total() - within_non;
    debug!(within_ties, within_non, between_ties, between_non, "orwg counts");

    if within_non == 0 || between_ties == 0 {
        return Err(IndexError::undefined(
            INDEX,
            "no within-group non-ties or no between-group ties",
        ));
    }
    Ok((within_ties as f64 * between_non as f64) / (within_non as f64 * between_ties as f64))
}
