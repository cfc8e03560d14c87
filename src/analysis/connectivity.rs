use crate::graph::TransfoGraph;
use crate::store::Edge;
use petgraph::visit::Bfs;
use std::collections::HashSet;
use tracing::warn;

/// Number of distinct referentials referenced by `edges`.
pub fn distinct_node_count(edges: &[Edge]) -> usize {
    edges.iter()
        .flat_map(|e| [e.source, e.target])
        .collect::<HashSet<_>>()
        .len()
}

/// Returns true when two edges of `edges` share the same (source, target) pair.
pub fn has_parallel_edges(edges: &[Edge]) -> bool {
    let pairs: HashSet<_> = edges.iter().map(Edge::pair).collect();
    pairs.len() < edges.len()
}

/// Checks that `edges`, taken as undirected, connect every referential they touch.
///
/// Cycles are accepted. When `allow_parallel` is false, two edges with the
/// same (source, target) pair make the set fail. An empty set is connected.
pub fn is_connected(edges: &[Edge], allow_parallel: bool) -> bool {
    if !allow_parallel && has_parallel_edges(edges) {
        warn!(edges = edges.len(), "parallel transfos found in edge set");
        return false;
    }

    let graph = TransfoGraph::from_edges(edges).to_undirected();
    let total = graph.node_count();
    let start = match graph.node_indices().next() {
        Some(start) => start,
        None => return true,
    };

    // Bfs marks a node as discovered when it is enqueued.
    let mut bfs = Bfs::new(&graph, start);
    let mut visited = 0;
    while bfs.next(&graph).is_some() {
        visited += 1;
    }

    if visited != total {
        warn!(visited, total, "edge set is not connected");
        return false;
    }
    true
}

/// Checks that `edges` form a tree over the referentials they touch.
///
/// Connectivity alone admits cycles; pairing it with the `nodes - 1` edge
/// count rejects them.
pub fn is_tree(edges: &[Edge]) -> bool {
    if edges.is_empty() {
        return true;
    }
    is_connected(edges, false) && edges.len() == distinct_node_count(edges) - 1
}
