use super::types::*;
use super::GraphStore;
use crate::error::{ResolveError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;

/// Point-in-time copy of the referential graph, as handed over by the
/// surrounding system for one or more requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    // Row storage, in insertion order
    #[serde(default)]
    pub sensors: Vec<Sensor>,
    #[serde(default)]
    pub referentials: Vec<Referential>,
    #[serde(default)]
    pub transfo_types: Vec<TransfoType>,
    #[serde(default)]
    pub transfos: Vec<Transfo>,
    #[serde(default)]
    pub transfo_trees: Vec<TransfoTree>,
    #[serde(default)]
    pub platform_configs: Vec<PlatformConfig>,

    // Id -> row position (Not serialized, rebuilt on load)
    #[serde(skip)]
    index: RowIndex,
}

#[derive(Debug, Clone, Default)]
struct RowIndex {
    sensors: HashMap<SensorId, usize>,
    referentials: HashMap<ReferentialId, usize>,
    transfo_types: HashMap<TransfoTypeId, usize>,
    transfos: HashMap<TransfoId, usize>,
    trees: HashMap<TreeId, usize>,
    configs: HashMap<ConfigId, usize>,
}

/// Inserts `row` or replaces the row already stored under the same id.
fn upsert<I: Copy + Eq + std::hash::Hash, T>(rows: &mut Vec<T>, index: &mut HashMap<I, usize>, id: I, row: T) -> I {
    match index.get(&id) {
        Some(&pos) => rows[pos] = row,
        None => {
            index.insert(id, rows.len());
            rows.push(row);
        }
    }
    id
}

impl Snapshot {
    pub fn new() -> Self { Self::default() }

    pub fn from_json(s: &str) -> Result<Self> {
        let mut snapshot: Snapshot = serde_json::from_str(s)?;
        snapshot.rebuild_index();
        Ok(snapshot)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut snapshot: Snapshot = serde_json::from_reader(reader)?;
        snapshot.rebuild_index();
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuilds the id lookup tables after deserialization. On duplicate ids
    /// the last row wins.
    pub fn rebuild_index(&mut self) {
        fn positions<I: Copy + Eq + std::hash::Hash, T>(rows: &[T], id: impl Fn(&T) -> I) -> HashMap<I, usize> {
            rows.iter().enumerate().map(|(pos, row)| (id(row), pos)).collect()
        }
        self.index = RowIndex {
            sensors: positions(&self.sensors, |r| r.id),
            referentials: positions(&self.referentials, |r| r.id),
            transfo_types: positions(&self.transfo_types, |r| r.id),
            transfos: positions(&self.transfos, |r| r.id),
            trees: positions(&self.transfo_trees, |r| r.id),
            configs: positions(&self.platform_configs, |r| r.id),
        };
    }

    pub fn add_sensor(&mut self, sensor: Sensor) -> SensorId {
        upsert(&mut self.sensors, &mut self.index.sensors, sensor.id, sensor)
    }

    pub fn add_referential(&mut self, referential: Referential) -> ReferentialId {
        upsert(&mut self.referentials, &mut self.index.referentials, referential.id, referential)
    }

    pub fn add_transfo_type(&mut self, transfo_type: TransfoType) -> TransfoTypeId {
        upsert(&mut self.transfo_types, &mut self.index.transfo_types, transfo_type.id, transfo_type)
    }

    pub fn add_transfo(&mut self, transfo: Transfo) -> TransfoId {
        upsert(&mut self.transfos, &mut self.index.transfos, transfo.id, transfo)
    }

    pub fn add_tree(&mut self, tree: TransfoTree) -> TreeId {
        upsert(&mut self.transfo_trees, &mut self.index.trees, tree.id, tree)
    }

    pub fn add_config(&mut self, config: PlatformConfig) -> ConfigId {
        upsert(&mut self.platform_configs, &mut self.index.configs, config.id, config)
    }

    pub fn sensor(&self, id: SensorId) -> Option<&Sensor> {
        self.index.sensors.get(&id).map(|&pos| &self.sensors[pos])
    }
}

impl GraphStore for Snapshot {
    fn referential(&self, id: ReferentialId) -> Result<&Referential> {
        self.index.referentials.get(&id)
            .map(|&pos| &self.referentials[pos])
            .ok_or(ResolveError::ReferentialNotFound(id))
    }

    fn transfo(&self, id: TransfoId) -> Result<&Transfo> {
        self.index.transfos.get(&id)
            .map(|&pos| &self.transfos[pos])
            .ok_or(ResolveError::TransfoNotFound(id))
    }

    fn transfo_type(&self, id: TransfoTypeId) -> Result<&TransfoType> {
        self.index.transfo_types.get(&id)
            .map(|&pos| &self.transfo_types[pos])
            .ok_or(ResolveError::TransfoTypeNotFound(id))
    }

    fn tree(&self, id: TreeId) -> Result<&TransfoTree> {
        self.index.trees.get(&id)
            .map(|&pos| &self.transfo_trees[pos])
            .ok_or(ResolveError::TreeNotFound(id))
    }

    fn config(&self, id: ConfigId) -> Result<&PlatformConfig> {
        self.index.configs.get(&id)
            .map(|&pos| &self.platform_configs[pos])
            .ok_or(ResolveError::ConfigNotFound(id))
    }

    fn referential_category(&self, id: ReferentialId) -> Option<&str> {
        let referential = self.referential(id).ok()?;
        self.sensor(referential.sensor?).map(|s| s.kind.as_str())
    }
}
