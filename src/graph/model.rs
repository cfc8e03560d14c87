//! model.rs
//! Directed referential graph built once per request from a flat edge list.

use crate::store::{Edge, ReferentialId, TransfoId};
use petgraph::graph::{DiGraph, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Arena-indexed view of an edge set: referentials are nodes, transfos are
/// directed edges carrying their id.
#[derive(Debug, Clone, Default)]
pub struct TransfoGraph {
    pub(crate) graph: DiGraph<ReferentialId, TransfoId>,
    index: HashMap<ReferentialId, NodeIndex>,
}

impl TransfoGraph {
    pub fn new() -> Self { Self::default() }

    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut g = Self::new();
        for edge in edges {
            g.add_edge(edge);
        }
        g
    }

    fn ensure_node(&mut self, referential: ReferentialId) -> NodeIndex {
        if let Some(&idx) = self.index.get(&referential) {
            return idx;
        }
        let idx = self.graph.add_node(referential);
        self.index.insert(referential, idx);
        idx
    }

    pub fn add_edge(&mut self, edge: &Edge) {
        let source = self.ensure_node(edge.source);
        let target = self.ensure_node(edge.target);
        self.graph.add_edge(source, target, edge.id);
    }

    pub fn node(&self, referential: ReferentialId) -> Option<NodeIndex> {
        self.index.get(&referential).copied()
    }

    pub fn referential(&self, idx: NodeIndex) -> ReferentialId { self.graph[idx] }

    /// Number of distinct referentials touched by the edge set.
    pub fn node_count(&self) -> usize { self.graph.node_count() }

    pub fn edge_count(&self) -> usize { self.graph.edge_count() }

    /// Transfos going from `from` to `to`, parallel ones included.
    pub fn transfos_between(&self, from: NodeIndex, to: NodeIndex) -> Vec<TransfoId> {
        self.graph.edges_connecting(from, to).map(|e| *e.weight()).collect()
    }

    /// Outgoing neighbours of `node` with the transfo leading to each.
    pub fn successors(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, TransfoId)> + '_ {
        self.graph.edges(node).map(|e| (e.target(), *e.weight()))
    }

    /// Same nodes and edges, ignoring direction.
    pub fn to_undirected(&self) -> UnGraph<ReferentialId, TransfoId> {
        self.graph.clone().into_edge_type()
    }
}
