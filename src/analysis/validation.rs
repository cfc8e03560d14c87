//! Structural checks run by the surrounding system before a transfo tree or
//! a platform config is committed. The checks only report; enforcing them is
//! the caller's decision.

use super::connectivity::{distinct_node_count, has_parallel_edges, is_connected, is_tree};
use super::error::{ValidationError, ValidationErrorType};
use crate::config::ParallelEdgePolicy;
use crate::error::Result;
use crate::store::{Edge, GraphStore, PlatformConfig, TransfoId, TransfoTree, TreeId};
use std::collections::HashSet;

/// Returns true when every id of `ids` names an existing transfo.
pub fn transfos_exist(store: &dyn GraphStore, ids: &[TransfoId]) -> bool {
    ids.iter().all(|&id| store.transfo(id).is_ok())
}

/// Returns true when the union of the given trees forms a tree. An empty
/// list is a tree.
pub fn trees_form_tree(store: &dyn GraphStore, trees: &[TreeId]) -> Result<bool> {
    Ok(is_tree(&store.trees_edges(trees)?))
}

/// Validates a transfo tree before creation.
///
/// # Returns
/// - `Ok(())` if the tree can be committed.
/// - `Err(Vec<ValidationError>)` containing every violation found.
pub fn validate_transfo_tree(store: &dyn GraphStore, tree: &TransfoTree) -> std::result::Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut edges = Vec::with_capacity(tree.transfos.len());
    for &id in &tree.transfos {
        match store.transfo(id) {
            Ok(t) => edges.push(t.edge()),
            Err(e) => errors.push(ValidationError::new(&tree.name, ValidationErrorType::MissingReference, e.to_string())),
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    if tree.sensor_connection {
        check_sensor_connection(store, tree, &edges, &mut errors);
    } else if has_parallel_edges(&edges) {
        errors.push(ValidationError::new(
            &tree.name,
            ValidationErrorType::ParallelEdges,
            "two transfos share the same source and target".to_string(),
        ));
    } else if !is_tree(&edges) {
        errors.push(ValidationError::new(
            &tree.name,
            ValidationErrorType::NotATree,
            format!("{} transfos over {} referentials do not form a tree", edges.len(), distinct_node_count(&edges)),
        ));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn check_sensor_connection(store: &dyn GraphStore, tree: &TransfoTree, edges: &[Edge], errors: &mut Vec<ValidationError>) {
    let [edge] = edges else {
        errors.push(ValidationError::new(
            &tree.name,
            ValidationErrorType::SensorConnection,
            format!("a sensor connection holds exactly one transfo, found {}", edges.len()),
        ));
        return;
    };
    // Only judged when both ends are known and attached to a sensor.
    let sensor_of = |r| store.referential(r).ok().and_then(|r| r.sensor);
    if let (Some(a), Some(b)) = (sensor_of(edge.source), sensor_of(edge.target)) {
        if a == b {
            errors.push(ValidationError::new(
                &tree.name,
                ValidationErrorType::SensorConnection,
                format!("transfo {} does not cross sensors (both ends on sensor {})", edge.id, a),
            ));
        }
    }
}

/// Validates a platform config before creation: every tree must exist and
/// the union of their transfos must form a tree. Parallel (source, target)
/// pairs across trees are tolerated only when `policy` allows them for this
/// config, in which case each pair counts once.
pub fn validate_platform_config(
    store: &dyn GraphStore,
    config: &PlatformConfig,
    policy: ParallelEdgePolicy,
) -> std::result::Result<(), Vec<ValidationError>> {
    let mut errors: Vec<ValidationError> = config.transfo_trees.iter()
        .filter_map(|&id| store.tree(id).err())
        .map(|e| ValidationError::new(&config.name, ValidationErrorType::MissingReference, e.to_string()))
        .collect();
    if !errors.is_empty() {
        return Err(errors);
    }

    let edges = match store.trees_edges(&config.transfo_trees) {
        Ok(edges) => edges,
        Err(e) => {
            return Err(vec![ValidationError::new(&config.name, ValidationErrorType::MissingReference, e.to_string())]);
        }
    };
    if edges.is_empty() {
        return Ok(());
    }

    let allow_parallel = policy.allows(config.allow_parallel_edges);
    if !allow_parallel && has_parallel_edges(&edges) {
        errors.push(ValidationError::new(
            &config.name,
            ValidationErrorType::ParallelEdges,
            "transfo trees supply two transfos with the same source and target".to_string(),
        ));
        return Err(errors);
    }

    let pair_count = edges.iter().map(Edge::pair).collect::<HashSet<_>>().len();
    let nodes = distinct_node_count(&edges);
    if !is_connected(&edges, allow_parallel) || pair_count != nodes - 1 {
        errors.push(ValidationError::new(
            &config.name,
            ValidationErrorType::NotATree,
            format!("transfo trees do not form a tree ({} links over {} referentials)", pair_count, nodes),
        ));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
