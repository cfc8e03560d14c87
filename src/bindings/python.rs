use crate::analysis::ValidationError;
use crate::compute::{Aabb, FunctionRegistry, Geometry, Point};
use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::resolver::Resolver;
use crate::store::{ConfigId, Edge, GraphStore, ReferentialId, Snapshot, TimeSeriesStore, TransfoId, TreeId};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

type Xyz = (f64, f64, f64);

fn to_py(e: ResolveError) -> PyErr {
    match e {
        ResolveError::Decode(_) | ResolveError::InvalidColumnRef(_) | ResolveError::InvalidFieldDescriptor(_) => {
            PyValueError::new_err(e.to_string())
        }
        _ => PyRuntimeError::new_err(e.to_string()),
    }
}

fn report(errs: Vec<ValidationError>) -> PyErr {
    let msg = errs.iter().map(|e| format!("{}: {}", e.subject, e.message)).collect::<Vec<_>>().join("\n");
    PyValueError::new_err(msg)
}

fn point((x, y, z): Xyz) -> Point { Point::new(x, y, z) }

fn xyz(p: &Point) -> Xyz { (p.x, p.y, p.z) }

fn edges(raw: Vec<(u32, u32, u32)>) -> Vec<Edge> {
    raw.into_iter().map(|(id, source, target)| Edge::new(id, source, target)).collect()
}

fn ids(raw: Vec<u32>) -> Vec<TransfoId> {
    raw.into_iter().map(TransfoId).collect()
}

#[pyclass(name = "_Resolver")]
pub struct PyResolver {
    snapshot: Snapshot,
    timeseries: TimeSeriesStore,
    registry: FunctionRegistry,
    config: ResolverConfig,
}

impl PyResolver {
    fn resolver(&self) -> Resolver<'_> {
        Resolver::with_config(&self.snapshot, &self.timeseries, &self.registry, self.config.clone())
    }

    fn apply(&self, value: Geometry, transfos: Vec<u32>, time: Option<f64>) -> PyResult<Option<Geometry>> {
        self.resolver().apply(value, &ids(transfos), time).map_err(to_py)
    }
}

#[pymethods]
impl PyResolver {
    #[new]
    #[pyo3(signature = (snapshot_json, timeseries_json=None, config_json=None))]
    pub fn new(snapshot_json: &str, timeseries_json: Option<&str>, config_json: Option<&str>) -> PyResult<Self> {
        Ok(Self {
            snapshot: Snapshot::from_json(snapshot_json).map_err(to_py)?,
            timeseries: timeseries_json.map(TimeSeriesStore::from_json).transpose().map_err(to_py)?.unwrap_or_default(),
            registry: FunctionRegistry::builtin(),
            config: config_json.map(ResolverConfig::from_json).transpose().map_err(to_py)?.unwrap_or_default(),
        })
    }

    pub fn is_connected(&self, edge_list: Vec<(u32, u32, u32)>, allow_parallel: bool) -> bool {
        self.resolver().is_connected(&edges(edge_list), allow_parallel)
    }

    pub fn is_tree(&self, edge_list: Vec<(u32, u32, u32)>) -> bool {
        self.resolver().is_tree(&edges(edge_list))
    }

    /// Working edge set of a platform config as `(id, source, target)`.
    pub fn config_edges(&self, config: u32) -> PyResult<Vec<(u32, u32, u32)>> {
        let edges = self.snapshot.config_edges(ConfigId(config)).map_err(to_py)?;
        Ok(edges.iter().map(|e| (e.id.0, e.source.0, e.target.0)).collect())
    }

    #[pyo3(signature = (config, source, target, stop_at=None))]
    pub fn find_path(&self, config: u32, source: u32, target: u32, stop_at: Option<&str>) -> PyResult<Vec<u32>> {
        self.resolver()
            .find_path(ConfigId(config), ReferentialId(source), ReferentialId(target), stop_at)
            .map(|outcome| outcome.ids())
            .map_err(to_py)
    }

    /// Parameters as a JSON object, `None` when no record covers `time`.
    #[pyo3(signature = (transfo, time=None))]
    pub fn resolve_params(&self, transfo: u32, time: Option<f64>) -> PyResult<Option<String>> {
        match self.resolver().resolve_params(TransfoId(transfo), time).map_err(to_py)? {
            Some(params) => serde_json::to_string(&params).map(Some).map_err(|e| PyValueError::new_err(e.to_string())),
            None => Ok(None),
        }
    }

    #[pyo3(signature = (value, transfos, time=None))]
    pub fn transform_point(&self, value: Xyz, transfos: Vec<u32>, time: Option<f64>) -> PyResult<Option<Xyz>> {
        Ok(match self.apply(Geometry::Point(point(value)), transfos, time)? {
            Some(Geometry::Point(p)) => Some(xyz(&p)),
            _ => None,
        })
    }

    #[pyo3(signature = (corner_a, corner_b, transfos, time=None))]
    pub fn transform_box(&self, corner_a: Xyz, corner_b: Xyz, transfos: Vec<u32>, time: Option<f64>) -> PyResult<Option<(Xyz, Xyz)>> {
        let value = Geometry::Box(Aabb::new(point(corner_a), point(corner_b)));
        Ok(match self.apply(value, transfos, time)? {
            Some(Geometry::Box(b)) => Some((xyz(&b.min), xyz(&b.max))),
            _ => None,
        })
    }

    #[pyo3(signature = (points, transfos, time=None))]
    pub fn transform_patch(&self, points: Vec<Xyz>, transfos: Vec<u32>, time: Option<f64>) -> PyResult<Option<Vec<Xyz>>> {
        let value = Geometry::Patch(points.into_iter().map(point).collect());
        Ok(match self.apply(value, transfos, time)? {
            Some(Geometry::Patch(ps)) => Some(ps.iter().map(xyz).collect()),
            _ => None,
        })
    }

    pub fn validate_tree(&self, tree: u32) -> PyResult<()> {
        let tree = self.snapshot.tree(TreeId(tree)).map_err(to_py)?;
        self.resolver().validate_tree(tree).map_err(report)
    }

    pub fn validate_config(&self, config: u32) -> PyResult<()> {
        let config = self.snapshot.config(ConfigId(config)).map_err(to_py)?;
        self.resolver().validate_config(config).map_err(report)
    }

    pub fn function_names(&self) -> Vec<String> {
        self.registry.names().into_iter().map(str::to_string).collect()
    }
}

/// Defines the `_core` Python module.
#[pymodule]
fn _core(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyResolver>()?;
    Ok(())
}
