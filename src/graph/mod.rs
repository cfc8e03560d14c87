//! In-memory referential graph, rebuilt from a snapshot for each request.
pub mod model;

pub use model::TransfoGraph;
pub use petgraph::graph::NodeIndex;
