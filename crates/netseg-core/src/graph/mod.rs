//! Attributed graph snapshots and vertex groupings.
//!
//! ```text
//! JSON document / edge list
//!        ↓  build::AttributedGraph::from_edges()
//! AttributedGraph (DiGraph<Vertex, ()> + directed flag)
//!        ↓  groups::Grouping::from_attr()
//! Grouping (vertex → level index) + GroupSizes
//! ```

pub mod build;
pub mod groups;

pub use build::{AttributedGraph, GraphDocument, Vertex};
pub use groups::{GroupSizes, Grouping};
