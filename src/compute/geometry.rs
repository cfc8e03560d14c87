//! Geometric values and the Geometry Provider seam.

use crate::error::{ResolveError, Result};
use crate::store::ParamValue;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self { Self { x, y, z } }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2)).sqrt()
    }
}

/// Axis-aligned box; `min` is component-wise below `max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point,
    pub max: Point,
}

impl Aabb {
    /// Builds the box spanned by two opposite corners, in any order.
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    pub fn corners(&self) -> [Point; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Point::new(lo.x, lo.y, lo.z), Point::new(hi.x, lo.y, lo.z),
            Point::new(lo.x, hi.y, lo.z), Point::new(hi.x, hi.y, lo.z),
            Point::new(lo.x, lo.y, hi.z), Point::new(hi.x, lo.y, hi.z),
            Point::new(lo.x, hi.y, hi.z), Point::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Smallest box holding every point, `None` for no points.
    pub fn bounding(points: &[Point]) -> Option<Aabb> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(Aabb::new(*first, *first), |b, p| Aabb::new(
            Point::new(b.min.x.min(p.x), b.min.y.min(p.y), b.min.z.min(p.z)),
            Point::new(b.max.x.max(p.x), b.max.y.max(p.y), b.max.z.max(p.z)),
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Point,
    Box,
    Patch,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShapeKind::Point => "point",
            ShapeKind::Box => "box",
            ShapeKind::Patch => "patch",
        })
    }
}

/// The value carried through a transform pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Geometry {
    Point(Point),
    Box(Aabb),
    /// A batch of points transformed together.
    Patch(Vec<Point>),
}

impl Geometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::Point(_) => ShapeKind::Point,
            Geometry::Box(_) => ShapeKind::Box,
            Geometry::Patch(_) => ShapeKind::Patch,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Geometry::Patch(points) if points.is_empty())
    }
}

/// One positional argument of a geometry function.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Scalar(f64),
    Array(SmallVec<[f64; 4]>),
}

impl From<&ParamValue> for Arg {
    fn from(value: &ParamValue) -> Self {
        match value {
            ParamValue::Scalar(v) => Arg::Scalar(*v),
            ParamValue::List(vs) => Arg::Array(vs.clone()),
        }
    }
}

impl Arg {
    pub(crate) fn describe(&self) -> String {
        match self {
            Arg::Scalar(_) => "a scalar".to_string(),
            Arg::Array(vs) => format!("an array of {}", vs.len()),
        }
    }
}

/// A geometry function, defined for every shape kind. `Ok(None)` means the
/// transform has no result for this value.
pub type GeometryFn = Arc<dyn Fn(&Geometry, &[Arg]) -> Result<Option<Geometry>> + Send + Sync>;

/// Registry of named geometry functions consumed by the pipeline.
pub trait GeometryProvider: Send + Sync {
    fn has_function(&self, name: &str) -> bool;
    fn invoke(&self, function: &str, value: &Geometry, args: &[Arg]) -> Result<Option<Geometry>>;
}

/// Name-to-function table injected into the pipeline.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, GeometryFn>,
}

impl FunctionRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn register<F>(&mut self, name: &str, function: F) -> &mut Self
    where
        F: Fn(&Geometry, &[Arg]) -> Result<Option<Geometry>> + Send + Sync + 'static,
    {
        self.functions.insert(name.to_string(), Arc::new(function));
        self
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry").field("functions", &self.names()).finish()
    }
}

impl GeometryProvider for FunctionRegistry {
    fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    fn invoke(&self, function: &str, value: &Geometry, args: &[Arg]) -> Result<Option<Geometry>> {
        let f = self.functions.get(function)
            .ok_or_else(|| ResolveError::UnknownFunction(function.to_string()))?;
        f(value, args)
    }
}
