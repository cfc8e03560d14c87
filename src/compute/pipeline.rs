//! Applies a chain of transfos to a geometric value.

use super::geometry::{Arg, Geometry, GeometryProvider};
use crate::error::{ResolveError, Result};
use crate::params::ParameterResolver;
use crate::store::{GraphStore, ParamMap, ParameterStore, Transfo, TransfoId};
use tracing::{debug, info};

/// Signature entry standing for the request timestamp.
pub const DEFAULT_TIME_PARAM: &str = "_time";

pub struct TransformPipeline<'a> {
    store: &'a dyn GraphStore,
    params: ParameterResolver<'a>,
    provider: &'a dyn GeometryProvider,
    time_param: String,
}

impl<'a> TransformPipeline<'a> {
    pub fn new(store: &'a dyn GraphStore, params: &'a dyn ParameterStore, provider: &'a dyn GeometryProvider) -> Self {
        Self {
            store,
            params: ParameterResolver::new(params),
            provider,
            time_param: DEFAULT_TIME_PARAM.to_string(),
        }
    }

    pub fn with_time_param(mut self, name: &str) -> Self {
        self.time_param = name.to_string();
        self
    }

    /// Parameters of transfo `id` at `time`.
    pub fn resolve_params(&self, id: TransfoId, time: Option<f64>) -> Result<Option<ParamMap>> {
        self.params.resolve(self.store.transfo(id)?, time)
    }

    /// Runs `value` through `transfos` in order. Stops with `Ok(None)` as soon
    /// as a step has no parameters or no result.
    pub fn apply(&self, value: Geometry, transfos: &[TransfoId], time: Option<f64>) -> Result<Option<Geometry>> {
        let mut current = value;
        for &id in transfos {
            let transfo = self.store.transfo(id)?;
            match self.apply_step(transfo, &current, time)? {
                Some(next) => current = next,
                None => {
                    debug!(transfo = %transfo.name, "pipeline stopped without a value");
                    return Ok(None);
                }
            }
        }
        Ok(Some(current))
    }

    fn apply_step(&self, transfo: &Transfo, value: &Geometry, time: Option<f64>) -> Result<Option<Geometry>> {
        let transfo_type = self.store.transfo_type(transfo.transfo_type)?;
        let function = transfo_type.name.as_str();
        if !self.provider.has_function(function) {
            return Err(ResolveError::UnknownFunction(function.to_string()));
        }

        let Some(params) = self.params.resolve(transfo, time)? else {
            return Ok(None);
        };

        let args = transfo_type.func_signature.iter()
            .filter(|name| **name != self.time_param)
            .map(|name| {
                params.get(name).map(Arg::from).ok_or_else(|| ResolveError::MissingParameter {
                    transfo: transfo.name.clone(),
                    param: name.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(transfo = %transfo.name, function, shape = %value.kind(), "apply transfo");
        let result = self.provider.invoke(function, value, &args)?;
        Ok(result.filter(|g| !g.is_empty()))
    }
}
