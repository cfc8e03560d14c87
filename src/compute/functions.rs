//! Builtin geometry functions.
//!
//! Every function maps points one by one. A box is transformed through its
//! eight corners and re-bounded; a patch maps its points in parallel.

use super::geometry::{Aabb, Arg, FunctionRegistry, Geometry, Point};
use crate::error::{ResolveError, Result};
use rayon::prelude::*;

pub const AFFINE_MAT4X3: &str = "affine_mat4x3";
pub const AFFINE_QUAT: &str = "affine_quat";
pub const AFFINE_QUAT_INVERSE: &str = "affine_quat_inverse";
pub const SPHERICAL_TO_CARTESIAN: &str = "spherical_to_cartesian";
pub const PROJECTIVE_PINHOLE: &str = "projective_pinhole";
pub const PROJECTIVE_PINHOLE_INVERSE: &str = "projective_pinhole_inverse";

impl FunctionRegistry {
    /// Registry holding every builtin function.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry
            .register(AFFINE_MAT4X3, affine_mat4x3)
            .register(AFFINE_QUAT, affine_quat)
            .register(AFFINE_QUAT_INVERSE, affine_quat_inverse)
            .register(SPHERICAL_TO_CARTESIAN, spherical_to_cartesian)
            .register(PROJECTIVE_PINHOLE, projective_pinhole)
            .register(PROJECTIVE_PINHOLE_INVERSE, projective_pinhole_inverse);
        registry
    }
}

fn invalid(function: &str, msg: String) -> ResolveError {
    ResolveError::InvalidArguments { function: function.to_string(), msg }
}

fn array<'a>(function: &str, args: &'a [Arg], position: usize, len: usize) -> Result<&'a [f64]> {
    match args.get(position) {
        Some(Arg::Array(values)) if values.len() == len => Ok(values.as_slice()),
        Some(other) => Err(invalid(function, format!(
            "argument {} must be an array of {} numbers, got {}", position + 1, len, other.describe()
        ))),
        None => Err(invalid(function, format!("missing argument {}", position + 1))),
    }
}

/// Applies `f` to every point of `value`. A single `None` voids the result.
fn map_points<F>(value: &Geometry, f: F) -> Option<Geometry>
where
    F: Fn(Point) -> Option<Point> + Send + Sync,
{
    match value {
        Geometry::Point(p) => f(*p).map(Geometry::Point),
        Geometry::Box(b) => {
            let corners = b.corners().into_iter().map(&f).collect::<Option<Vec<_>>>()?;
            Aabb::bounding(&corners).map(Geometry::Box)
        }
        Geometry::Patch(points) => points.par_iter()
            .map(|&p| f(p))
            .collect::<Option<Vec<_>>>()
            .map(Geometry::Patch),
    }
}

/// Args: `mat4x3`, a row-major 3x4 matrix (12 numbers).
pub fn affine_mat4x3(value: &Geometry, args: &[Arg]) -> Result<Option<Geometry>> {
    let m = array(AFFINE_MAT4X3, args, 0, 12)?;
    Ok(map_points(value, |p| Some(Point::new(
        m[0] * p.x + m[1] * p.y + m[2] * p.z + m[3],
        m[4] * p.x + m[5] * p.y + m[6] * p.z + m[7],
        m[8] * p.x + m[9] * p.y + m[10] * p.z + m[11],
    ))))
}

#[derive(Debug, Clone, Copy)]
struct Quat {
    w: f64,
    x: f64,
    y: f64,
    z: f64,
}

impl Quat {
    /// Unit quaternion from `[w, x, y, z]`.
    fn unit(function: &str, q: &[f64]) -> Result<Quat> {
        let norm = q.iter().map(|c| c * c).sum::<f64>().sqrt();
        if norm == 0.0 || !norm.is_finite() {
            return Err(invalid(function, "quaternion has no usable norm".to_string()));
        }
        Ok(Quat { w: q[0] / norm, x: q[1] / norm, y: q[2] / norm, z: q[3] / norm })
    }

    fn conjugate(self) -> Quat {
        Quat { w: self.w, x: -self.x, y: -self.y, z: -self.z }
    }

    fn rotate(&self, p: Point) -> Point {
        // t = 2 (q x p); p' = p + w t + q x t
        let tx = 2.0 * (self.y * p.z - self.z * p.y);
        let ty = 2.0 * (self.z * p.x - self.x * p.z);
        let tz = 2.0 * (self.x * p.y - self.y * p.x);
        Point::new(
            p.x + self.w * tx + (self.y * tz - self.z * ty),
            p.y + self.w * ty + (self.z * tx - self.x * tz),
            p.z + self.w * tz + (self.x * ty - self.y * tx),
        )
    }
}

/// Args: `quat` `[w, x, y, z]`, `vec3` translation. Rotates then translates.
pub fn affine_quat(value: &Geometry, args: &[Arg]) -> Result<Option<Geometry>> {
    let q = Quat::unit(AFFINE_QUAT, array(AFFINE_QUAT, args, 0, 4)?)?;
    let t = array(AFFINE_QUAT, args, 1, 3)?;
    Ok(map_points(value, |p| {
        let r = q.rotate(p);
        Some(Point::new(r.x + t[0], r.y + t[1], r.z + t[2]))
    }))
}

/// Same arguments as `affine_quat`, undoes it.
pub fn affine_quat_inverse(value: &Geometry, args: &[Arg]) -> Result<Option<Geometry>> {
    let q = Quat::unit(AFFINE_QUAT_INVERSE, array(AFFINE_QUAT_INVERSE, args, 0, 4)?)?.conjugate();
    let t = array(AFFINE_QUAT_INVERSE, args, 1, 3)?;
    Ok(map_points(value, |p| Some(q.rotate(Point::new(p.x - t[0], p.y - t[1], p.z - t[2])))))
}

/// No args. Reads points as (azimuth, elevation, range), angles in radians.
pub fn spherical_to_cartesian(value: &Geometry, _args: &[Arg]) -> Result<Option<Geometry>> {
    Ok(map_points(value, |p| {
        let (azimuth, elevation, range) = (p.x, p.y, p.z);
        Some(Point::new(
            range * elevation.cos() * azimuth.cos(),
            range * elevation.cos() * azimuth.sin(),
            range * elevation.sin(),
        ))
    }))
}

/// Args: `pinhole` `[fx, fy, cx, cy]`. Projects to (u, v, depth); points at
/// or behind the image plane have no projection.
pub fn projective_pinhole(value: &Geometry, args: &[Arg]) -> Result<Option<Geometry>> {
    let k = array(PROJECTIVE_PINHOLE, args, 0, 4)?;
    let (fx, fy, cx, cy) = (k[0], k[1], k[2], k[3]);
    Ok(map_points(value, |p| {
        if p.z <= 0.0 {
            return None;
        }
        Some(Point::new(fx * p.x / p.z + cx, fy * p.y / p.z + cy, p.z))
    }))
}

/// Args: `pinhole` `[fx, fy, cx, cy]`. Lifts (u, v, depth) back to camera space.
pub fn projective_pinhole_inverse(value: &Geometry, args: &[Arg]) -> Result<Option<Geometry>> {
    let k = array(PROJECTIVE_PINHOLE_INVERSE, args, 0, 4)?;
    let (fx, fy, cx, cy) = (k[0], k[1], k[2], k[3]);
    if fx == 0.0 || fy == 0.0 {
        return Err(invalid(PROJECTIVE_PINHOLE_INVERSE, "focal lengths must be non-zero".to_string()));
    }
    Ok(map_points(value, |p| Some(Point::new((p.x - cx) * p.z / fx, (p.y - cy) * p.z / fy, p.z))))
}
