//! In-memory time-indexed parameter storage.
//!
//! A column holds patches of time-stamped samples. A patch is valid over the
//! open interval between its first and last sample time, and a query inside
//! that interval linearly interpolates every dimension between the two
//! bracketing samples.

use super::{Interpolation, ParameterStore, Record};
use crate::error::{ResolveError, Result};
use crate::params::ColumnRef;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: f64,
    #[serde(flatten)]
    pub values: Record,
}

impl Sample {
    pub fn new(time: f64, values: &[(&str, f64)]) -> Self {
        Self {
            time,
            values: values.iter().map(|&(k, v)| (k.to_string(), v)).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamPatch {
    #[serde(deserialize_with = "sorted_samples")]
    samples: Vec<Sample>,
}

fn sorted_samples<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<Sample>, D::Error> {
    let mut samples = Vec::<Sample>::deserialize(deserializer)?;
    samples.sort_by(|a, b| a.time.total_cmp(&b.time));
    Ok(samples)
}

impl ParamPatch {
    /// Samples are kept sorted by time.
    pub fn new(mut samples: Vec<Sample>) -> Self {
        samples.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] { &self.samples }

    pub fn min_time(&self) -> Option<f64> { self.samples.first().map(|s| s.time) }

    pub fn max_time(&self) -> Option<f64> { self.samples.last().map(|s| s.time) }

    /// Strict containment: a time equal to a bound does not match.
    pub fn contains(&self, time: f64) -> bool {
        match (self.min_time(), self.max_time()) {
            (Some(min), Some(max)) => min < time && time < max,
            _ => false,
        }
    }

    pub fn interpolate(&self, time: f64) -> Option<Record> {
        if !self.contains(time) {
            return None;
        }
        // First sample strictly after `time`; containment guarantees 0 < hi < len.
        let hi = self.samples.partition_point(|s| s.time <= time);
        let (a, b) = (&self.samples[hi - 1], &self.samples[hi]);
        let span = b.time - a.time;
        let ratio = if span > 0.0 { (time - a.time) / span } else { 0.0 };

        let record = a.values.iter()
            .map(|(dim, &va)| {
                let value = match b.values.get(dim) {
                    Some(&vb) => va + (vb - va) * ratio,
                    None => va,
                };
                (dim.clone(), value)
            })
            .collect();
        Some(record)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeSeriesStore {
    /// Keyed by the `schema.table.column` form of the column reference.
    columns: BTreeMap<String, Vec<ParamPatch>>,
}

impl TimeSeriesStore {
    pub fn new() -> Self { Self::default() }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn insert_patch(&mut self, column: &ColumnRef, samples: Vec<Sample>) {
        self.columns.entry(column.to_string()).or_default().push(ParamPatch::new(samples));
    }

    pub fn patches(&self, column: &ColumnRef) -> Option<&[ParamPatch]> {
        self.columns.get(&column.to_string()).map(Vec::as_slice)
    }
}

impl ParameterStore for TimeSeriesStore {
    fn interpolate_at(&self, column: &ColumnRef, time: f64) -> Result<Interpolation> {
        let patches = self.patches(column).ok_or_else(|| ResolveError::UnknownColumn(column.clone()))?;
        let mut records: Vec<Record> = patches.iter().filter_map(|p| p.interpolate(time)).collect();
        debug!(column = %column, time, matches = records.len(), "time interpolation");

        Ok(match records.len() {
            0 => Interpolation::None,
            1 => Interpolation::One(records.remove(0)),
            n => Interpolation::Many(n),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column() -> ColumnRef {
        "test.ins.poses".parse().unwrap()
    }

    fn store() -> TimeSeriesStore {
        let mut store = TimeSeriesStore::new();
        store.insert_patch(&column(), vec![
            Sample::new(10.0, &[("x", 10.0), ("y", 0.0)]),
            Sample::new(0.0, &[("x", 0.0), ("y", 0.0)]),
        ]);
        store.insert_patch(&column(), vec![
            Sample::new(20.0, &[("x", 100.0)]),
            Sample::new(30.0, &[("x", 200.0)]),
        ]);
        store.insert_patch(&column(), vec![
            Sample::new(25.0, &[("x", -1.0)]),
            Sample::new(40.0, &[("x", -1.0)]),
        ]);
        store
    }

    #[test]
    fn test_linear_interpolation_inside_patch() {
        match store().interpolate_at(&column(), 2.5).unwrap() {
            Interpolation::One(record) => {
                assert!((record["x"] - 2.5).abs() < 1e-12);
                assert_eq!(record["y"], 0.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_bounds_are_excluded() {
        assert_eq!(store().interpolate_at(&column(), 0.0).unwrap(), Interpolation::None);
        assert_eq!(store().interpolate_at(&column(), 10.0).unwrap(), Interpolation::None);
        assert_eq!(store().interpolate_at(&column(), 15.0).unwrap(), Interpolation::None);
    }

    #[test]
    fn test_overlapping_patches_report_many() {
        assert_eq!(store().interpolate_at(&column(), 27.0).unwrap(), Interpolation::Many(2));
    }

    #[test]
    fn test_unknown_column_is_an_error() {
        let other: ColumnRef = "test.ins.other".parse().unwrap();
        assert!(matches!(store().interpolate_at(&other, 5.0), Err(ResolveError::UnknownColumn(_))));
    }

    #[test]
    fn test_store_from_json() {
        let json = r#"{ "columns": { "a.b.c": [ { "samples": [
            { "time": 0.0, "roll": 1.0 }, { "time": 2.0, "roll": 3.0 } ] } ] } }"#;
        let store = TimeSeriesStore::from_json(json).unwrap();
        let col: ColumnRef = "a.b.c".parse().unwrap();
        assert_eq!(
            store.interpolate_at(&col, 1.0).unwrap(),
            Interpolation::One(Record::from([("roll".to_string(), 2.0)]))
        );
    }
}
