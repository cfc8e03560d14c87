//! Resolution core for a graph of spatial referentials linked by directed
//! transfos: connectivity and tree checks, minimum-hop path search,
//! time-dependent parameter binding and the geometric transform pipeline.

pub mod analysis;
pub mod compute;
pub mod config;
pub mod error;
pub mod graph;
pub mod params;
pub mod resolver;
pub mod store;

#[cfg(feature = "python")]
pub mod bindings;

pub use analysis::{PathOutcome, ValidationError, ValidationErrorType};
pub use compute::{FunctionRegistry, Geometry, GeometryProvider, Point};
pub use config::{ParallelEdgePolicy, ResolverConfig};
pub use error::{ResolveError, Result};
pub use resolver::Resolver;
pub use store::{GraphStore, ParameterStore, Snapshot, TimeSeriesStore};
