//! Reference graph shared by the unit tests.
//!
//! ```text
//!            1
//!            | t1
//!            v
//!   4 <-t3-- 2 --t2-> 3          sensor "cam" (camera): 1..5
//!           |^
//!        t4 || t9 (t9 is in no tree)
//!           v|
//!            5
//!            | t5                 sensor connection
//!            v
//!   7 <-t6-- 6 --t8-> 9          sensor "ins" (ins): 6..10
//!            | t7     | t20 (dynamic pose, in no tree)
//!            v        v
//!            8        10
//! ```
//!
//! t11, t12, t13 duplicate t6, t7, t8 and form tree 4.

use super::types::*;
use super::{Sample, Snapshot, TimeSeriesStore};
use crate::params::{ColumnRef, FieldDescriptor, FieldSpec};
use smallvec::smallvec;
use std::collections::BTreeMap;

pub const POSE_COLUMN: &str = "test.ins.poses";

/// Row-major 3x4 matrix translating by `(tx, ty, tz)`.
pub fn translation(tx: f64, ty: f64, tz: f64) -> ParamMap {
    ParamMap::from([(
        "mat4x3".to_string(),
        ParamValue::List(smallvec![1.0, 0.0, 0.0, tx, 0.0, 1.0, 0.0, ty, 0.0, 0.0, 1.0, tz]),
    )])
}

fn transfo(id: u32, source: u32, target: u32, transfo_type: u32, values: ParamMap) -> Transfo {
    Transfo {
        id: TransfoId(id),
        name: format!("t{}", id),
        source: ReferentialId(source),
        target: ReferentialId(target),
        transfo_type: TransfoTypeId(transfo_type),
        params: TransfoParams::Static { values },
    }
}

fn tree(id: u32, transfos: &[u32], sensor_connection: bool) -> TransfoTree {
    TransfoTree {
        id: TreeId(id),
        name: format!("tree{}", id),
        transfos: transfos.iter().map(|&t| TransfoId(t)).collect(),
        sensor_connection,
    }
}

fn config(id: u32, trees: &[u32], allow_parallel_edges: bool) -> PlatformConfig {
    PlatformConfig {
        id: ConfigId(id),
        name: format!("p{}", id),
        transfo_trees: trees.iter().map(|&t| TreeId(t)).collect(),
        allow_parallel_edges,
    }
}

fn transfo_type(id: u32, name: &str, signature: &[&str]) -> TransfoType {
    TransfoType {
        id: TransfoTypeId(id),
        name: name.to_string(),
        func_signature: signature.iter().map(|s| s.to_string()).collect(),
    }
}

/// Every static transfo `tN` of the graph translates along x by `N`.
pub fn reference_snapshot() -> Snapshot {
    let mut s = Snapshot::new();

    s.add_sensor(Sensor { id: SensorId(1), name: "cam".into(), serial_number: "XKB".into(), kind: "camera".into() });
    s.add_sensor(Sensor { id: SensorId(2), name: "ins".into(), serial_number: "INS".into(), kind: "ins".into() });
    for id in 1..=10u32 {
        let sensor = if id <= 5 { SensorId(1) } else { SensorId(2) };
        s.add_referential(Referential { id: ReferentialId(id), name: format!("r{}", id), sensor: Some(sensor) });
    }

    s.add_transfo_type(transfo_type(1, "affine_mat4x3", &["mat4x3"]));
    s.add_transfo_type(transfo_type(2, "affine_quat", &["_time", "quat", "vec3"]));
    s.add_transfo_type(transfo_type(3, "warp_drive", &["factor"]));

    for &(id, source, target) in &[
        (1, 1, 2), (2, 2, 3), (3, 2, 4), (4, 2, 5), (9, 5, 2), (5, 5, 6),
        (6, 6, 7), (7, 6, 8), (8, 6, 9), (11, 6, 7), (12, 6, 8), (13, 6, 9),
    ] {
        s.add_transfo(transfo(id, source, target, 1, translation(id as f64, 0.0, 0.0)));
    }

    let column: ColumnRef = POSE_COLUMN.parse().expect("valid column");
    let fields = BTreeMap::from([
        ("quat".to_string(), FieldSpec::List(vec![
            FieldDescriptor::new("qw"),
            FieldDescriptor::new("qx"),
            FieldDescriptor::new("qy"),
            FieldDescriptor::new("qz"),
        ])),
        ("vec3".to_string(), FieldSpec::List(vec![
            FieldDescriptor::new("x"),
            FieldDescriptor::negated("y"),
            FieldDescriptor::new("z"),
        ])),
    ]);
    s.add_transfo(Transfo {
        id: TransfoId(20),
        name: "ins_pose".into(),
        source: ReferentialId(9),
        target: ReferentialId(10),
        transfo_type: TransfoTypeId(2),
        params: TransfoParams::Dynamic { column, fields },
    });
    s.add_transfo(transfo(21, 10, 9, 3, ParamMap::from([("factor".to_string(), ParamValue::Scalar(2.0))])));
    s.add_transfo(transfo(22, 10, 9, 1, ParamMap::new()));

    s.add_tree(tree(1, &[1, 2, 3, 4], false));
    s.add_tree(tree(2, &[6, 7, 8], false));
    s.add_tree(tree(3, &[5], true));
    s.add_tree(tree(4, &[11, 12, 13], false));

    s.add_config(config(1, &[1, 2, 3], false));
    s.add_config(config(2, &[1, 3, 4], false));
    s.add_config(config(3, &[2, 4], true));
    s
}

/// Poses of the `ins` sensor: identity rotation, a gap between t=10 and
/// t=20, and two patches overlapping over ]25, 30[.
pub fn pose_store() -> TimeSeriesStore {
    let column: ColumnRef = POSE_COLUMN.parse().expect("valid column");
    let pose = |time: f64, x: f64, y: f64| {
        Sample::new(time, &[("qw", 1.0), ("qx", 0.0), ("qy", 0.0), ("qz", 0.0), ("x", x), ("y", y), ("z", 1.0)])
    };

    let mut store = TimeSeriesStore::new();
    store.insert_patch(&column, vec![pose(0.0, 0.0, 0.0), pose(10.0, 10.0, -20.0)]);
    store.insert_patch(&column, vec![pose(20.0, 0.0, 0.0), pose(30.0, 0.0, 0.0)]);
    store.insert_patch(&column, vec![pose(25.0, 0.0, 0.0), pose(40.0, 0.0, 0.0)]);
    store
}
