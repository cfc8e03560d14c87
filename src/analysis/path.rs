//! Minimum-hop transfo chains between two referentials of a platform config.

use crate::error::{ResolveError, Result};
use crate::graph::{NodeIndex, TransfoGraph};
use crate::store::{ConfigId, GraphStore, ReferentialId, TransfoId};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use tracing::{debug, info};

/// Every transfo costs one hop.
const HOP: u32 = 1;

/// Result of a path query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOutcome {
    /// Transfos to apply, in order. Empty when no path exists or when
    /// source and target are the same referential.
    Transfos(Vec<TransfoId>),
    /// First referential of the requested category met along the path.
    Referential(ReferentialId),
}

impl PathOutcome {
    /// Raw ids, the shape exposed to the query layer.
    pub fn ids(&self) -> Vec<u32> {
        match self {
            PathOutcome::Transfos(ids) => ids.iter().map(|id| id.0).collect(),
            PathOutcome::Referential(id) => vec![id.0],
        }
    }
}

pub struct PathResolver<'a> {
    store: &'a dyn GraphStore,
}

impl<'a> PathResolver<'a> {
    pub fn new(store: &'a dyn GraphStore) -> Self {
        Self { store }
    }

    /// Finds the transfos leading from `from` to `to` using only the transfos
    /// of `config`, following transfo direction.
    ///
    /// With `stop_at` set to a sensor category, returns instead the first
    /// referential of that category on the path; finding none is an error
    /// since the caller required a match.
    pub fn find_path(
        &self,
        config: ConfigId,
        from: ReferentialId,
        to: ReferentialId,
        stop_at: Option<&str>,
    ) -> Result<PathOutcome> {
        let edges = self.store.config_edges(config)?;
        let graph = TransfoGraph::from_edges(&edges);
        debug!(config = %config, edges = graph.edge_count(), referentials = graph.node_count(), "working edge set");

        let start = graph.node(from).ok_or(ResolveError::ReferentialNotFound(from))?;
        let goal = graph.node(to).ok_or(ResolveError::ReferentialNotFound(to))?;

        let predecessors = shortest_predecessors(&graph, start);
        let nodes = match node_path(&predecessors, start, goal) {
            Some(nodes) => nodes,
            None => {
                info!(from = %from, to = %to, config = %config, "no path between referentials");
                Vec::new()
            }
        };

        if let Some(category) = stop_at.filter(|c| !c.is_empty()) {
            return nodes.iter()
                .map(|&n| graph.referential(n))
                .find(|&r| self.store.referential_category(r) == Some(category))
                .map(PathOutcome::Referential)
                .ok_or_else(|| ResolveError::NoReferentialOfCategory {
                    category: category.to_string(),
                    from,
                    to,
                });
        }

        nodes.windows(2)
            .map(|pair| transfo_for_pair(&graph, pair[0], pair[1]))
            .collect::<Result<Vec<_>>>()
            .map(PathOutcome::Transfos)
    }

    /// Transfo chain only; `Vec::new()` when `to` is unreachable.
    pub fn transfo_chain(&self, config: ConfigId, from: ReferentialId, to: ReferentialId) -> Result<Vec<TransfoId>> {
        match self.find_path(config, from, to, None)? {
            PathOutcome::Transfos(ids) => Ok(ids),
            PathOutcome::Referential(_) => Ok(Vec::new()),
        }
    }
}

/// Uniform-cost search from `start` over outgoing transfos. Returns the
/// predecessor of every reached node.
fn shortest_predecessors(graph: &TransfoGraph, start: NodeIndex) -> HashMap<NodeIndex, NodeIndex> {
    let mut distance: HashMap<NodeIndex, u32> = HashMap::new();
    let mut settled: HashSet<NodeIndex> = HashSet::new();
    let mut predecessor: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut frontier = BinaryHeap::new();

    distance.insert(start, 0);
    frontier.push(Reverse((0u32, start)));

    while let Some(Reverse((dist, node))) = frontier.pop() {
        if !settled.insert(node) {
            continue;
        }
        for (next, _) in graph.successors(node) {
            if settled.contains(&next) {
                continue;
            }
            let candidate = dist + HOP;
            if distance.get(&next).map_or(true, |&known| candidate < known) {
                distance.insert(next, candidate);
                predecessor.insert(next, node);
                frontier.push(Reverse((candidate, next)));
            }
        }
    }
    predecessor
}

/// Walks predecessors back from `goal`. `None` when `goal` was not reached.
fn node_path(predecessor: &HashMap<NodeIndex, NodeIndex>, start: NodeIndex, goal: NodeIndex) -> Option<Vec<NodeIndex>> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        current = *predecessor.get(&current)?;
        path.push(current);
    }
    path.reverse();
    Some(path)
}

fn transfo_for_pair(graph: &TransfoGraph, from: NodeIndex, to: NodeIndex) -> Result<TransfoId> {
    match graph.transfos_between(from, to).as_slice() {
        [id] => Ok(*id),
        ids => Err(ResolveError::AmbiguousEdge {
            from: graph.referential(from),
            to: graph.referential(to),
            count: ids.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::reference_snapshot;
    use crate::store::Edge;
    use petgraph::visit::Bfs;
    use rstest::rstest;

    fn chain(config: u32, from: u32, to: u32) -> Vec<u32> {
        let snapshot = reference_snapshot();
        PathResolver::new(&snapshot)
            .find_path(ConfigId(config), ReferentialId(from), ReferentialId(to), None)
            .unwrap()
            .ids()
    }

    #[rstest]
    #[case(1, 2, vec![1])]
    #[case(1, 5, vec![1, 4])]
    #[case(1, 7, vec![1, 4, 5, 6])]
    #[case(3, 8, vec![])]
    #[case(1, 1, vec![])]
    #[case(5, 4, vec![])] // t9 belongs to no tree
    fn test_paths_in_first_config(#[case] from: u32, #[case] to: u32, #[case] expected: Vec<u32>) {
        assert_eq!(chain(1, from, to), expected);
    }

    #[rstest]
    #[case(1, 2, vec![1])]
    #[case(1, 5, vec![1, 4])]
    #[case(1, 7, vec![1, 4, 5, 11])]
    #[case(3, 8, vec![])]
    #[case(1, 1, vec![])]
    #[case(5, 4, vec![])]
    fn test_paths_in_second_config(#[case] from: u32, #[case] to: u32, #[case] expected: Vec<u32>) {
        assert_eq!(chain(2, from, to), expected);
    }

    #[test]
    fn test_unknown_referential_is_an_error() {
        let snapshot = reference_snapshot();
        let resolver = PathResolver::new(&snapshot);
        assert_eq!(
            resolver.find_path(ConfigId(1), ReferentialId(1), ReferentialId(55), None).unwrap_err(),
            ResolveError::ReferentialNotFound(ReferentialId(55))
        );
        assert_eq!(
            resolver.find_path(ConfigId(1), ReferentialId(55), ReferentialId(1), None).unwrap_err(),
            ResolveError::ReferentialNotFound(ReferentialId(55))
        );
        // Referential 10 exists but none of the config's transfos touch it.
        assert!(resolver.find_path(ConfigId(1), ReferentialId(1), ReferentialId(10), None).is_err());
    }

    #[test]
    fn test_unknown_config_is_an_error() {
        let snapshot = reference_snapshot();
        let err = PathResolver::new(&snapshot)
            .find_path(ConfigId(77), ReferentialId(1), ReferentialId(2), None)
            .unwrap_err();
        assert_eq!(err, ResolveError::ConfigNotFound(ConfigId(77)));
    }

    #[test]
    fn test_stop_at_first_referential_of_category() {
        let snapshot = reference_snapshot();
        let resolver = PathResolver::new(&snapshot);
        assert_eq!(
            resolver.find_path(ConfigId(1), ReferentialId(1), ReferentialId(8), Some("ins")).unwrap(),
            PathOutcome::Referential(ReferentialId(6))
        );
        assert_eq!(
            resolver.find_path(ConfigId(1), ReferentialId(1), ReferentialId(8), Some("camera")).unwrap(),
            PathOutcome::Referential(ReferentialId(1))
        );
    }

    #[test]
    fn test_stop_at_missing_category_is_an_error() {
        let snapshot = reference_snapshot();
        let err = PathResolver::new(&snapshot)
            .find_path(ConfigId(1), ReferentialId(1), ReferentialId(8), Some("lidar"))
            .unwrap_err();
        assert!(matches!(err, ResolveError::NoReferentialOfCategory { .. }), "{:?}", err);
    }

    #[test]
    fn test_empty_category_means_full_chain() {
        let snapshot = reference_snapshot();
        let outcome = PathResolver::new(&snapshot)
            .find_path(ConfigId(1), ReferentialId(1), ReferentialId(7), Some(""))
            .unwrap();
        assert_eq!(outcome.ids(), vec![1, 4, 5, 6]);
    }

    #[test]
    fn test_parallel_pair_on_path_is_ambiguous() {
        let snapshot = reference_snapshot();
        let err = PathResolver::new(&snapshot)
            .find_path(ConfigId(3), ReferentialId(6), ReferentialId(7), None)
            .unwrap_err();
        assert_eq!(err, ResolveError::AmbiguousEdge { from: ReferentialId(6), to: ReferentialId(7), count: 2 });
    }

    /// Directed BFS depth, used as the reference hop count.
    fn bfs_depth(graph: &TransfoGraph, start: NodeIndex, goal: NodeIndex) -> Option<usize> {
        let mut depth = HashMap::from([(start, 0usize)]);
        let mut bfs = Bfs::new(&graph.graph, start);
        while let Some(node) = bfs.next(&graph.graph) {
            let d = depth[&node];
            for (next, _) in graph.successors(node) {
                depth.entry(next).or_insert(d + 1);
            }
        }
        depth.get(&goal).copied()
    }

    #[test]
    fn test_hop_count_matches_bfs_for_every_pair() {
        let snapshot = reference_snapshot();
        let edges: Vec<Edge> = snapshot.config_edges(ConfigId(1)).unwrap();
        let graph = TransfoGraph::from_edges(&edges);
        let resolver = PathResolver::new(&snapshot);

        for a in graph.graph.node_indices() {
            for b in graph.graph.node_indices() {
                let (ra, rb) = (graph.referential(a), graph.referential(b));
                let hops = resolver.transfo_chain(ConfigId(1), ra, rb).unwrap().len();
                match bfs_depth(&graph, a, b) {
                    Some(depth) => assert_eq!(hops, depth, "{} -> {}", ra, rb),
                    None => assert_eq!(hops, 0, "{} -> {}", ra, rb),
                }
            }
        }
    }
}
