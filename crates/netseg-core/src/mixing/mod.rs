//! Mixing matrices.
//!
//! # Pipeline
//!
//! ```text
//! AttributedGraph + Grouping(rows) + Grouping(cols)
//!        ↓  contact::contact_layer()      (folded when undirected)
//! contact layer: CountMatrix
//!        ↓  full::full_mm() with GroupSizes margins
//! FullLayers { no_tie, tie }
//!        ↓
//! matrix::MixingMatrix  →  records() for long format
//! ```
//!
//! [`matrix::mixingm`] runs the whole pipeline.

pub mod contact;
pub mod fold;
pub mod full;
pub mod matrix;
pub mod table;

pub use contact::contact_layer;
pub use fold::{FoldDirection, fold, symmetrize};
pub use full::{FullLayers, full_mm, margins, total_dyads};
pub use matrix::{MixingMatrix, MixingOptions, MixingRecord, mixingm, mixingm_grouped};
pub use table::CountMatrix;
