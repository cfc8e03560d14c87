//! Snapshot-side collaborators: the Graph Store and the Parameter Store.
//!
//! The core never owns persistent state. Every request reads one
//! point-in-time snapshot through the two traits below; `Snapshot` and
//! `TimeSeriesStore` are the in-memory implementations.

pub mod registry;
pub mod timeseries;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use registry::Snapshot;
pub use timeseries::{ParamPatch, Sample, TimeSeriesStore};
pub use types::*;

use crate::error::Result;
use crate::params::ColumnRef;
use std::collections::{BTreeMap, HashSet};

/// Read access to referentials, transfos, trees and configs.
pub trait GraphStore: Send + Sync {
    fn referential(&self, id: ReferentialId) -> Result<&Referential>;
    fn transfo(&self, id: TransfoId) -> Result<&Transfo>;
    fn transfo_type(&self, id: TransfoTypeId) -> Result<&TransfoType>;
    fn tree(&self, id: TreeId) -> Result<&TransfoTree>;
    fn config(&self, id: ConfigId) -> Result<&PlatformConfig>;

    /// Sensor category of a referential, `None` when it has no sensor.
    fn referential_category(&self, id: ReferentialId) -> Option<&str>;

    fn tree_edges(&self, id: TreeId) -> Result<Vec<TransfoId>> {
        Ok(self.tree(id)?.transfos.clone())
    }

    fn edges(&self, ids: &[TransfoId]) -> Result<Vec<Edge>> {
        ids.iter().map(|&id| self.transfo(id).map(Transfo::edge)).collect()
    }

    /// Union of the edges of the given trees, first occurrence order.
    fn trees_edges(&self, trees: &[TreeId]) -> Result<Vec<Edge>> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for &tree in trees {
            for id in self.tree_edges(tree)? {
                if seen.insert(id) {
                    edges.push(self.transfo(id)?.edge());
                }
            }
        }
        Ok(edges)
    }

    /// The working edge set of a platform config.
    fn config_edges(&self, id: ConfigId) -> Result<Vec<Edge>> {
        let trees = self.config(id)?.transfo_trees.clone();
        self.trees_edges(&trees)
    }
}

/// One interpolated row: dimension name to value.
pub type Record = BTreeMap<String, f64>;

/// Outcome of a time interpolation query.
#[derive(Debug, Clone, PartialEq)]
pub enum Interpolation {
    None,
    One(Record),
    /// Number of overlapping records that matched.
    Many(usize),
}

/// Time-indexed parameter storage used by dynamic transfos.
pub trait ParameterStore: Send + Sync {
    /// Interpolates the records of `column` whose validity interval strictly
    /// contains `time`.
    fn interpolate_at(&self, column: &ColumnRef, time: f64) -> Result<Interpolation>;
}
