//! Error type shared by every resolution request.
//!
//! Only structural failures live here. Non-findings (no path, no parameters
//! for a timestamp, a disconnected edge set) are ordinary return values.

use crate::params::ColumnRef;
use crate::store::{ConfigId, ReferentialId, TransfoId, TransfoTypeId, TreeId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("referential {0} not found")]
    ReferentialNotFound(ReferentialId),
    #[error("no transfo with id {0}")]
    TransfoNotFound(TransfoId),
    #[error("no transfo type with id {0}")]
    TransfoTypeNotFound(TransfoTypeId),
    #[error("no transfo tree with id {0}")]
    TreeNotFound(TreeId),
    #[error("no platform config with id {0}")]
    ConfigNotFound(ConfigId),
    #[error("function {0} is unknown")]
    UnknownFunction(String),
    #[error("invalid arguments for function {function}: {msg}")]
    InvalidArguments { function: String, msg: String },
    #[error("no time value provided for dynamic transfo \"{transfo}\"")]
    MissingTime { transfo: String },
    #[error("multiple rows ({matches}) returned from time interpolation on {column} at time {time}")]
    AmbiguousInterpolation { column: ColumnRef, time: f64, matches: usize },
    #[error("no time-indexed parameters stored in column {0}")]
    UnknownColumn(ColumnRef),
    #[error("interpolated record has no field \"{field}\"")]
    MissingField { field: String },
    #[error("transfo \"{transfo}\" has no value for parameter \"{param}\"")]
    MissingParameter { transfo: String, param: String },
    #[error("no referential of category \"{category}\" on the path from {from} to {to}")]
    NoReferentialOfCategory { category: String, from: ReferentialId, to: ReferentialId },
    #[error("{count} transfos join {from} to {to} in the working edge set")]
    AmbiguousEdge { from: ReferentialId, to: ReferentialId, count: usize },
    #[error("malformed column reference \"{0}\"")]
    InvalidColumnRef(String),
    #[error("malformed field descriptor \"{0}\"")]
    InvalidFieldDescriptor(String),
    #[error("decoding failed: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for ResolveError {
    fn from(e: serde_json::Error) -> Self {
        ResolveError::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
