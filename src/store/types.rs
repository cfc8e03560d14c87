use crate::params::{ColumnRef, FieldSpec};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            #[inline(always)]
            pub fn index(&self) -> usize { self.0 as usize }
            pub fn new(idx: usize) -> Self { Self(idx as u32) }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(SensorId);
id_type!(
    /// A coordinate reference frame, i.e. a graph node.
    ReferentialId
);
id_type!(
    /// A directed transform, i.e. a graph edge.
    TransfoId
);
id_type!(TransfoTypeId);
id_type!(TreeId);
id_type!(ConfigId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: SensorId,
    pub name: String,
    #[serde(default)]
    pub serial_number: String,
    /// Sensor category, e.g. `camera` or `ins`.
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referential {
    pub id: ReferentialId,
    pub name: String,
    #[serde(default)]
    pub sensor: Option<SensorId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransfoType {
    pub id: TransfoTypeId,
    /// Name of the geometry function implementing this type.
    pub name: String,
    /// Ordered formal parameter names.
    #[serde(default)]
    pub func_signature: Vec<String>,
}

/// A parameter value bound to a transfo: one number or an ordered group
/// (vector, quaternion, matrix).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Scalar(f64),
    List(SmallVec<[f64; 4]>),
}

pub type ParamMap = BTreeMap<String, ParamValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransfoParams {
    Static {
        #[serde(default)]
        values: ParamMap,
    },
    /// Values are interpolated from `column` at request time.
    Dynamic {
        column: ColumnRef,
        fields: BTreeMap<String, FieldSpec>,
    },
}

impl Default for TransfoParams {
    fn default() -> Self {
        TransfoParams::Static { values: ParamMap::new() }
    }
}

impl TransfoParams {
    pub fn is_dynamic(&self) -> bool {
        matches!(self, TransfoParams::Dynamic { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfo {
    pub id: TransfoId,
    pub name: String,
    pub source: ReferentialId,
    pub target: ReferentialId,
    pub transfo_type: TransfoTypeId,
    #[serde(default)]
    pub params: TransfoParams,
}

impl Transfo {
    pub fn edge(&self) -> Edge {
        Edge { id: self.id, source: self.source, target: self.target }
    }
}

/// The topology-only view of a transfo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub id: TransfoId,
    pub source: ReferentialId,
    pub target: ReferentialId,
}

impl Edge {
    pub fn new(id: u32, source: u32, target: u32) -> Self {
        Self { id: TransfoId(id), source: ReferentialId(source), target: ReferentialId(target) }
    }

    #[inline]
    pub fn pair(&self) -> (ReferentialId, ReferentialId) {
        (self.source, self.target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransfoTree {
    pub id: TreeId,
    pub name: String,
    pub transfos: Vec<TransfoId>,
    /// A single cross-sensor transfo, exempt from the tree invariant.
    #[serde(default)]
    pub sensor_connection: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub id: ConfigId,
    pub name: String,
    pub transfo_trees: Vec<TreeId>,
    #[serde(default)]
    pub allow_parallel_edges: bool,
}
