//! Request-independent knobs of the resolver.

use crate::compute::DEFAULT_TIME_PARAM;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Whether the union of the transfo trees of a platform config may contain
/// two transfos joining the same (source, target) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParallelEdgePolicy {
    /// Parallel pairs are always rejected.
    Strict,
    /// Parallel pairs are accepted only for configs flagged `allow_parallel_edges`.
    #[default]
    HonorConfigFlag,
    /// Parallel pairs are always accepted.
    Permissive,
}

impl ParallelEdgePolicy {
    pub fn allows(&self, config_flag: bool) -> bool {
        match self {
            ParallelEdgePolicy::Strict => false,
            ParallelEdgePolicy::HonorConfigFlag => config_flag,
            ParallelEdgePolicy::Permissive => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub parallel_edges: ParallelEdgePolicy,
    /// Signature entry that carries the timestamp and never becomes a numeric argument.
    pub time_param: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            parallel_edges: ParallelEdgePolicy::default(),
            time_param: DEFAULT_TIME_PARAM.to_string(),
        }
    }
}

impl ResolverConfig {
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
