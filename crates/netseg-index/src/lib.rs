#![forbid(unsafe_code)]
//! netseg-index library.
//!
//! Segregation and homophily indices computed from mixing matrices
//! ([`netseg_core::MixingMatrix`]) or directly from attributed graphs.
//!
//! | index                   | level          | input              |
//! |-------------------------|----------------|--------------------|
//! | [`ei::ei`]              | graph          | contact layer      |
//! | [`ei::ei_groups`]       | group          | contact layer      |
//! | [`ei::ei_vertices`]     | vertex         | graph              |
//! | [`assort::assort`]      | graph          | contact layer      |
//! | [`coleman::coleman`]    | group          | contact + sizes    |
//! | [`freeman::freeman`]    | graph          | contact + sizes    |
//! | [`gamix::gamix`]        | graph          | contact layer      |
//! | [`orwg::orwg`]          | graph          | full matrix        |
//! | [`smi::smi`]            | group          | full matrix        |
//! | [`ssi::ssi`]            | vertex / group | undirected graph   |
//!
//! # Conventions
//!
//! - **Errors**: Every index returns `Result<_, IndexError>`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

use serde::{Deserialize, Serialize};

use netseg_core::{ErrorCode, MixingError, MixingMatrix};

pub mod assort;
pub mod coleman;
pub mod ei;
pub mod freeman;
pub mod gamix;
pub mod orwg;
pub mod smi;
pub mod ssi;
pub mod summary;

/// Errors raised by index computations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error(transparent)]
    Mixing(#[from] MixingError),

    #[error("{index}: no ties to compute from")]
    NoTies { index: &'static str },

    #[error("{index}: ego and alter groups must be the same")]
    MismatchedGroups { index: &'static str },

    #[error("{index}: requires a full mixing matrix")]
    NotFull { index: &'static str },

    #[error("{index}: group '{group}' has no ties")]
    EmptyGroup { index: &'static str, group: String },

    #[error("{index}: defined for undirected graphs only")]
    RequiresUndirected { index: &'static str },

    #[error("{index}: undefined ({reason})")]
    Undefined { index: &'static str, reason: String },
}

impl IndexError {
    /// The stable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Mixing(e) => e.code(),
            Self::NoTies { .. } => ErrorCode::NoTies,
            Self::MismatchedGroups { .. } => ErrorCode::MismatchedGroups,
            Self::NotFull { .. } => ErrorCode::NotFullMatrix,
            Self::EmptyGroup { .. } => ErrorCode::EmptyGroup,
            Self::RequiresUndirected { .. } => ErrorCode::RequiresUndirected,
            Self::Undefined { .. } => ErrorCode::UndefinedIndex,
        }
    }

    pub(crate) fn undefined(index: &'static str, reason: impl Into<String>) -> Self {
        Self::Undefined {
            index,
            reason: reason.into(),
        }
    }
}

/// An index value for one group. `None` where the index is undefined for
/// that group (e.g. a group without ties).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupScore {
    pub group: String,
    pub value: Option<f64>,
}

/// An index value for one vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexScore {
    pub vertex: String,
    pub value: Option<f64>,
}

/// Fail unless egos and alters use the same groups.
pub(crate) fn require_square(mm: &MixingMatrix, index: &'static str) -> Result<(), IndexError> {
    if mm.is_square() {
        Ok(())
    } else {
        Err(IndexError::MismatchedGroups { index })
    }
}

/// Fail unless the matrix carries the non-tie layer.
pub(crate) fn require_full(mm: &MixingMatrix, index: &'static str) -> Result<(), IndexError> {
    if mm.is_full() {
        Ok(())
    } else {
        Err(IndexError::NotFull { index })
    }
}

/// Group sizes as a vector, failing for cross-attribute size tables.
pub(crate) fn group_sizes<'a>(
    mm: &'a MixingMatrix,
    index: &'static str,
) -> Result<&'a [u64], IndexError> {
    mm.sizes()
        .as_vector()
        .ok_or(IndexError::MismatchedGroups { index })
}
