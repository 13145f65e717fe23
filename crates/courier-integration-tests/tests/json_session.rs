//! Sessions loaded from JSON files, run, snapshotted and resumed.

use courier_core::config::RebuildPolicy;
use courier_core::data_loader::{DataLoadError, load_config_json, load_session_json, load_session_json_bytes};
use courier_core::serialize::read_snapshot_header;
use courier_core::sim::Simulation;
use courier_core::test_utils::*;

const TWO_LEG_SESSION: &str = r#"{
    "config": {
        "origin": { "x": 0.0, "y": 0.0 },
        "destination": { "x": 200.0, "y": 150.0 },
        "vehicle_speed": 5.0,
        "rebuild_policy": "OnRoadChange"
    },
    "roads": [
        { "from": [0, 0], "to": [200, 0] },
        { "from": [202, 3], "to": [200, 150] }
    ]
}"#;

#[test]
fn loaded_session_runs_the_preset_route() {
    let mut sim = load_session_json(TWO_LEG_SESSION).expect("session loads");
    assert_eq!(sim.config().rebuild_policy, RebuildPolicy::OnRoadChange);
    assert_eq!(sim.config().snap_threshold, 10.0);
    assert_eq!(sim.roads().len(), 2);

    // 200 + 150 units at speed 5.
    assert_eq!(ticks_until_arrival(&mut sim, 200), Some(70));
    assert_eq!(sim.advance_by(700), 10);
}

#[test]
fn bytes_and_str_loaders_agree() {
    let a = load_session_json(TWO_LEG_SESSION).expect("str loads");
    let b = load_session_json_bytes(TWO_LEG_SESSION.as_bytes()).expect("bytes load");
    assert_eq!(a.config(), b.config());
    assert_eq!(a.roads().as_slice(), b.roads().as_slice());
}

#[test]
fn snapshot_resumes_mid_delivery() {
    let mut sim = load_session_json(TWO_LEG_SESSION).expect("session loads");
    sim.advance_by(125);

    let bytes = sim.serialize().expect("encodes");
    assert_eq!(read_snapshot_header(&bytes).expect("header").tick, 125);

    let mut resumed = Simulation::deserialize(&bytes).expect("decodes");
    assert_eq!(resumed.tick(), 125);
    assert_eq!(resumed.score(), sim.score());
    assert_eq!(resumed.vehicle_position(), sim.vehicle_position());

    for _ in 0..300 {
        let a = sim.advance();
        let b = resumed.advance();
        assert_eq!(a, b);
    }
    assert_eq!(resumed.score(), 6);
}

#[test]
fn invalid_config_is_reported() {
    let err = load_config_json(r#"{ "vehicle_speed": -1.0 }"#).unwrap_err();
    assert!(matches!(err, DataLoadError::Config(_)));

    let err = load_session_json("{ not json").unwrap_err();
    assert!(matches!(err, DataLoadError::JsonParse(_)));
}

#[test]
fn empty_session_uses_defaults() {
    let mut sim = load_session_json("{}").expect("empty session loads");
    assert_eq!(sim.config().origin, pt(60.0, 60.0));
    assert_eq!(sim.advance_by(100), 0);
}
