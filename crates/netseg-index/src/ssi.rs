//! Spectral Segregation Index (Echenique & Fryer).
//!
//! # Algorithm
//!
//! For every group, the subgraph induced by its members is split into
//! connected components. For a component `C` with adjacency `A_C` and
//! full-graph degrees `D` (ties to any group count):
//!
//! 1. `B = D⁻¹ A_C`, the share of each member's ties that go to members of
//!    the same component.
//! 2. `λ`, the largest eigenvalue of `B`, is the component's index.
//! 3. The Perron eigenvector `x` of `B`, scaled so that its mean is `λ`,
//!    gives the vertex-level indices.
//!
//! `B` is not symmetric, but it is similar to `S = D^{-1/2} A_C D^{-1/2}`,
//! which is. We decompose `S` with [`nalgebra::SymmetricEigen`] and map its
//! eigenvector `y` back with `x = D^{-1/2} y`.
//!
//! A fully segregated component (no ties leaving the group) has `λ = 1`.
//! Members with no same-group neighbors score 0; isolates have no score.
//! Loops are ignored.

use std::collections::HashMap;

use nalgebra::{DMatrix, SymmetricEigen};
use petgraph::graph::NodeIndex;
use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use netseg_core::config::SsiConfig;
use netseg_core::graph::{AttributedGraph, Grouping};

use crate::{GroupScore, IndexError, VertexScore};

const INDEX: &str = "ssi";

/// One same-group connected component and its index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SsiComponent {
    pub group: String,
    pub members: Vec<String>,
    pub eigenvalue: f64,
}

/// Vertex-, component-, and group-level spectral segregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SsiResult {
    /// One entry per vertex, in graph order.
    pub vertices: Vec<VertexScore>,
    pub components: Vec<SsiComponent>,
    /// Mean vertex index per group, over vertices that have one.
    pub groups: Vec<GroupScore>,
}

/// Spectral Segregation Index of an undirected graph grouped by `attr`.
///
/// # Errors
///
/// - [`IndexError::RequiresUndirected`] for directed graphs.
/// - Grouping errors for a missing attribute.
/// - [`IndexError::Undefined`] if an eigen decomposition fails to converge
///   within `config.max_iter` iterations.
#[instrument(skip(graph, config), fields(vertices = graph.vertex_count()))]
pub fn ssi(graph: &AttributedGraph, attr: &str, config: &SsiConfig) -> Result<SsiResult, IndexError> {
    if graph.is_directed() {
        return Err(IndexError::RequiresUndirected { index: INDEX });
    }
    let grouping = Grouping::from_attr(graph, attr)?;
    let n = graph.vertex_count();

    let mut degree = vec![0_u64; n];
    let mut same_group = Vec::new();
    let mut components = UnionFind::<usize>::new(n);
    for (a, b) in graph.edges() {
        if a == b {
            continue;
        }
        let (a, b) = (a.index(), b.index());
        degree[a] += 1;
        degree[b] += 1;
        if grouping.group_of(NodeIndex::new(a)) == grouping.group_of(NodeIndex::new(b)) {
            components.union(a, b);
            same_group.push((a, b));
        }
    }

    // Members per component root, ordered by first member.
    let mut order: Vec<usize> = Vec::new();
    let mut members: HashMap<usize, Vec<usize>> = HashMap::new();
    for v in (0..n).filter(|&v| degree[v] > 0) {
        let root = components.find(v);
        members
            .entry(root)
            .or_insert_with(|| {
                order.push(root);
                Vec::new()
            })
            .push(v);
    }

    let mut scores: Vec<Option<f64>> = vec![None; n];
    let mut result_components = Vec::with_capacity(order.len());
    for root in order {
        let comp = &members[&root];
        let edges: Vec<(usize, usize)> = same_group
            .iter()
            .copied()
            .filter(|&(a, _)| components.find(a) == root)
            .collect();
        let (eigenvalue, vector) = component_index(comp, &edges, &degree, config)?;
        for (&v, x) in comp.iter().zip(vector) {
            scores[v] = Some(x);
        }

        let group = grouping
            .group_of(NodeIndex::new(comp[0]))
            .map(|g| grouping.levels()[g].clone())
            .unwrap_or_default();
        result_components.push(SsiComponent {
            group,
            members: comp.iter().map(|&v| name(graph, v)).collect(),
            eigenvalue,
        });
    }
    debug!(components = result_components.len(), "ssi components");

    let groups = grouping
        .levels()
        .iter()
        .enumerate()
        .map(|(g, level)| {
            let values: Vec<f64> = (0..n)
                .filter(|&v| grouping.group_of(NodeIndex::new(v)) == Some(g))
                .filter_map(|v| scores[v])
                .collect();
            GroupScore {
                group: level.clone(),
                value: (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64),
            }
        })
        .collect();

    let vertices = scores
        .into_iter()
        .enumerate()
        .map(|(v, value)| VertexScore {
            vertex: name(graph, v),
            value,
        })
        .collect();

    Ok(SsiResult {
        vertices,
        components: result_components,
        groups,
    })
}

fn name(graph: &AttributedGraph, v: usize) -> String {
    graph
        .vertex(NodeIndex::new(v))
        .map(|vx| vx.name.clone())
        .unwrap_or_default()
}

/// Largest eigenvalue of `D⁻¹ A_C` and the matching scaled eigenvector,
/// one entry per member of `comp`.
fn component_index(
    comp: &[usize],
    edges: &[(usize, usize)],
    degree: &[u64],
    config: &SsiConfig,
) -> Result<(f64, Vec<f64>), IndexError> {
    let k = comp.len();
    if k == 1 {
        return Ok((0.0, vec![0.0]));
    }
    let local: HashMap<usize, usize> = comp.iter().enumerate().map(|(p, &v)| (v, p)).collect();
    let inv_sqrt: Vec<f64> = comp
        .iter()
        .map(|&v| 1.0 / (degree[v] as f64).sqrt())
        .collect();

    let mut s = DMatrix::<f64>::zeros(k, k);
    for &(a, b) in edges {
        let (p, q) = (local[&a], local[&b]);
        let w = inv_sqrt[p] * inv_sqrt[q];
        s[(p, q)] += w;
        s[(q, p)] += w;
    }

    let eig = SymmetricEigen::try_new(s, config.tolerance, config.max_iter)
        .ok_or_else(|| IndexError::undefined(INDEX, "eigen decomposition did not converge"))?;
    let Some((top, &lambda)) = eig
        .eigenvalues
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
    else {
        return Ok((0.0, vec![0.0; k]));
    };

    let y = eig.eigenvectors.column(top);
    let mut x: Vec<f64> = (0..k).map(|p| y[p] * inv_sqrt[p]).collect();
    // Perron vector is one-signed; fix the sign and drop rounding noise.
    let sign = if x.iter().sum::<f64>() < 0.0 { -1.0 } else { 1.0 };
    for v in &mut x {
        *v = (*v * sign).abs();
    }
    let mean = x.iter().sum::<f64>() / k as f64;
    if mean > 0.0 {
        for v in &mut x {
            *v *= lambda / mean;
        }
    }
    Ok((lambda, x))
}
