//! Geometric values, the function registry and the transform pipeline.
pub mod functions;
pub mod geometry;
pub mod pipeline;

pub use geometry::{Aabb, Arg, FunctionRegistry, Geometry, GeometryFn, GeometryProvider, Point, ShapeKind};
pub use pipeline::{TransformPipeline, DEFAULT_TIME_PARAM};
