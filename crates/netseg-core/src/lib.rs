#![forbid(unsafe_code)]
//! netseg-core library.
//!
//! Attributed graph snapshots, vertex groupings, and mixing matrices
//! (contact layers and full dyad censuses) for segregation analysis.
//!
//! # Conventions
//!
//! - **Errors**: Computations return [`error::MixingError`]; configuration
//!   loading uses `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod graph;
pub mod mixing;

pub use error::{ErrorCode, MixingError};
pub use graph::{AttributedGraph, GroupSizes, Grouping, Vertex};
pub use mixing::{CountMatrix, MixingMatrix, MixingOptions, mixingm};
