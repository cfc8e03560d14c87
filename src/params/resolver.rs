use super::descriptor::FieldSpec;
use crate::error::{ResolveError, Result};
use crate::store::{Interpolation, ParamMap, ParamValue, ParameterStore, Record, Transfo, TransfoParams};
use std::collections::BTreeMap;
use tracing::warn;

/// Produces the bound parameter values of a transfo.
pub struct ParameterResolver<'a> {
    store: &'a dyn ParameterStore,
}

impl<'a> ParameterResolver<'a> {
    pub fn new(store: &'a dyn ParameterStore) -> Self {
        Self { store }
    }

    /// Returns the parameters of `transfo` at `time`.
    ///
    /// # Returns
    /// - `Ok(Some(params))` for a static transfo, or a dynamic one with exactly
    ///   one record containing `time`.
    /// - `Ok(None)` when no record of a dynamic transfo contains `time`.
    /// - `Err(..)` when `time` is missing for a dynamic transfo, when records
    ///   overlap at `time`, or when a field cannot be found.
    pub fn resolve(&self, transfo: &Transfo, time: Option<f64>) -> Result<Option<ParamMap>> {
        match &transfo.params {
            TransfoParams::Static { values } => Ok(Some(values.clone())),
            TransfoParams::Dynamic { column, fields } => {
                let time = time.ok_or_else(|| ResolveError::MissingTime { transfo: transfo.name.clone() })?;
                match self.store.interpolate_at(column, time)? {
                    Interpolation::None => {
                        warn!(transfo = %transfo.name, time, "no parameters for the provided time");
                        Ok(None)
                    }
                    Interpolation::Many(matches) => Err(ResolveError::AmbiguousInterpolation {
                        column: column.clone(),
                        time,
                        matches,
                    }),
                    Interpolation::One(record) => bind_fields(fields, &record).map(Some),
                }
            }
        }
    }
}

fn bind_fields(fields: &BTreeMap<String, FieldSpec>, record: &Record) -> Result<ParamMap> {
    fields.iter()
        .map(|(param, spec)| {
            let value = match spec {
                FieldSpec::Scalar(field) => ParamValue::Scalar(field.resolve(record)?),
                FieldSpec::List(group) => ParamValue::List(
                    group.iter().map(|field| field.resolve(record)).collect::<Result<_>>()?,
                ),
            };
            Ok((param.clone(), value))
        })
        .collect()
}
