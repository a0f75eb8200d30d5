//! Attributed graph construction.
//!
//! # Overview
//!
//! An [`AttributedGraph`] is a [`petgraph`] graph whose vertices carry a
//! unique name and a set of categorical attributes (`attr -> label`). It is
//! the snapshot every mixing matrix is computed from.
//!
//! ## Edge Direction
//!
//! Edges are always stored in a `DiGraph` in the orientation they were
//! supplied. For undirected graphs the orientation carries no meaning and
//! `a-b` and `b-a` describe the same dyad.
//!
//! ## JSON Input
//!
//! ```json
//! {
//!   "directed": false,
//!   "vertices": [{ "name": "ann", "attrs": { "gender": "f" } }],
//!   "edges": [["ann", "bob"]]
//! }
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::MixingError;

// ---------------------------------------------------------------------------
// Vertex
// ---------------------------------------------------------------------------

/// A named vertex with categorical attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    pub name: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
}

impl Vertex {
    /// Build a vertex from a name and `(attr, label)` pairs.
    #[must_use]
    pub fn new<I, K, V>(name: impl Into<String>, attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            attrs: attrs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Label of `attr`, if the vertex has one.
    #[must_use]
    pub fn attr(&self, attr: &str) -> Option<&str> {
        self.attrs.get(attr).map(String::as_str)
    }
}

/// Serialized form of an attributed graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDocument {
    pub directed: bool,
    #[serde(default)]
    pub vertices: Vec<Vertex>,
    #[serde(default)]
    pub edges: Vec<(String, String)>,
}

// ---------------------------------------------------------------------------
// AttributedGraph
// ---------------------------------------------------------------------------

/// A graph snapshot with categorical vertex attributes.
#[derive(Debug, Clone)]
pub struct AttributedGraph {
    graph: DiGraph<Vertex, ()>,
    node_map: HashMap<String, NodeIndex>,
    directed: bool,
}

impl AttributedGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new(directed: bool) -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
            directed,
        }
    }

    /// Bulk constructor from vertices and `(source, target)` name pairs.
    ///
    /// # Errors
    ///
    /// Fails on duplicate vertex names and on edges referencing unknown
    /// vertices.
    #[instrument(skip(vertices, edges))]
    pub fn from_edges<S: AsRef<str>>(
        directed: bool,
        vertices: impl IntoIterator<Item = Vertex>,
        edges: &[(S, S)],
    ) -> Result<Self, MixingError> {
        let mut g = Self::new(directed);
        for v in vertices {
            g.add_vertex(v)?;
        }
        for (a, b) in edges {
            g.add_edge(a.as_ref(), b.as_ref())?;
        }
        debug!(
            vertices = g.vertex_count(),
            edges = g.edge_count(),
            "built attributed graph"
        );
        Ok(g)
    }

    /// Parse a [`GraphDocument`] from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`MixingError::GraphParse`] on malformed JSON and the
    /// [`AttributedGraph::from_edges`] errors on inconsistent content.
    pub fn from_json_str(json: &str) -> Result<Self, MixingError> {
        let doc: GraphDocument =
            serde_json::from_str(json).map_err(|e| MixingError::GraphParse(e.to_string()))?;
        Self::from_document(doc)
    }

    /// Parse a [`GraphDocument`] from a reader.
    ///
    /// # Errors
    ///
    /// See [`AttributedGraph::from_json_str`].
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, MixingError> {
        let doc: GraphDocument =
            serde_json::from_reader(reader).map_err(|e| MixingError::GraphParse(e.to_string()))?;
        Self::from_document(doc)
    }

    /// Build from an already-deserialized document.
    ///
    /// # Errors
    ///
    /// See [`AttributedGraph::from_edges`].
    pub fn from_document(doc: GraphDocument) -> Result<Self, MixingError> {
        Self::from_edges(doc.directed, doc.vertices, &doc.edges)
    }

    /// Export the graph as a [`GraphDocument`].
    #[must_use]
    pub fn to_document(&self) -> GraphDocument {
        GraphDocument {
            directed: self.directed,
            vertices: self.graph.node_weights().cloned().collect(),
            edges: self
                .graph
                .edge_references()
                .map(|e| {
                    (
                        self.graph[e.source()].name.clone(),
                        self.graph[e.target()].name.clone(),
                    )
                })
                .collect(),
        }
    }

    /// Add a vertex and return its index.
    ///
    /// # Errors
    ///
    /// Returns [`MixingError::DuplicateVertex`] if the name is taken.
    pub fn add_vertex(&mut self, vertex: Vertex) -> Result<NodeIndex, MixingError> {
        if self.node_map.contains_key(&vertex.name) {
            return Err(MixingError::DuplicateVertex(vertex.name));
        }
        let name = vertex.name.clone();
        let idx = self.graph.add_node(vertex);
        self.node_map.insert(name, idx);
        Ok(idx)
    }

    /// Add an edge between two named vertices.
    ///
    /// Parallel edges are kept; they are rejected later, when a full mixing
    /// matrix finds more ties than dyads.
    ///
    /// # Errors
    ///
    /// Returns [`MixingError::UnknownVertex`] if either endpoint is missing.
    pub fn add_edge(&mut self, source: &str, target: &str) -> Result<(), MixingError> {
        let a = self
            .node_index(source)
            .ok_or_else(|| MixingError::UnknownVertex(source.to_string()))?;
        let b = self
            .node_index(target)
            .ok_or_else(|| MixingError::UnknownVertex(target.to_string()))?;
        self.graph.add_edge(a, b, ());
        Ok(())
    }

    #[must_use]
    pub const fn is_directed(&self) -> bool {
        self.directed
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The underlying petgraph graph.
    #[must_use]
    pub const fn graph(&self) -> &DiGraph<Vertex, ()> {
        &self.graph
    }

    /// Look up the `NodeIndex` for a vertex name.
    #[must_use]
    pub fn node_index(&self, name: &str) -> Option<NodeIndex> {
        self.node_map.get(name).copied()
    }

    /// Vertex weight for an index.
    #[must_use]
    pub fn vertex(&self, idx: NodeIndex) -> Option<&Vertex> {
        self.graph.node_weight(idx)
    }

    /// Iterate `(source, target)` index pairs in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source(), e.target()))
    }

    /// Whether any edge starts and ends at the same vertex.
    #[must_use]
    pub fn has_loops(&self) -> bool {
        self.edges().any(|(a, b)| a == b)
    }

    /// Whether any dyad carries more than one edge.
    ///
    /// For undirected graphs `a-b` and `b-a` count as the same dyad.
    #[must_use]
    pub fn has_multi_edges(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.edge_count());
        self.edges().any(|(a, b)| {
            let key = if self.directed || a <= b { (a, b) } else { (b, a) };
            !seen.insert(key)
        })
    }

    /// BLAKE3 fingerprint of vertices, attributes, and the sorted edge set.
    ///
    /// Stable under vertex and edge insertion order.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut vertices: Vec<&Vertex> = self.graph.node_weights().collect();
        vertices.sort_by(|a, b| a.name.cmp(&b.name));

        let mut edges: Vec<(&str, &str)> = self
            .edges()
            .map(|(a, b)| {
                let (sa, sb) = (self.graph[a].name.as_str(), self.graph[b].name.as_str());
                if self.directed || sa <= sb {
                    (sa, sb)
                } else {
                    (sb, sa)
                }
            })
            .collect();
        edges.sort_unstable();

        let mut hasher = blake3::Hasher::new();
        hasher.update(if self.directed { b"D" } else { b"U" });
        for v in vertices {
            hasher.update(v.name.as_bytes());
            hasher.update(b"\x00");
            for (k, val) in &v.attrs {
                hasher.update(k.as_bytes());
                hasher.update(b"=");
                hasher.update(val.as_bytes());
                hasher.update(b"\x00");
            }
            hasher.update(b"\x01");
        }
        for (a, b) in edges {
            hasher.update(a.as_bytes());
            hasher.update(b"\x00");
            hasher.update(b.as_bytes());
            hasher.update(b"\x00");
        }
        format!("blake3:{}", hasher.finalize())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
