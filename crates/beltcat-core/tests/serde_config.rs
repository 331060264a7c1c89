//! JSON shape of configuration and diagnostics types.

#![cfg(feature = "serde")]

use beltcat_core::*;
use serde_json::json;

#[test]
fn profile_fields_default_when_absent() {
    let p: Profile = serde_json::from_value(json!({
        "id": "B",
        "start_marker": "Profile B",
        "end_marker": "Profile C",
        "min_speed": 400
    }))
    .unwrap();
    assert_eq!(p.pages, None);
    assert_eq!(p.alignment, AlignmentPolicy::Discard);
    assert_eq!(p.rows, RowStrategy::Chunked);
    assert_eq!(p.footnote_markers, Profile::default().footnote_markers);
    assert!(p.validate().is_ok());
}

#[test]
fn policy_enums_are_snake_case() {
    let p: Profile = serde_json::from_value(json!({
        "id": "C",
        "start_marker": "Profile C",
        "end_marker": "Profile D",
        "min_speed": 500,
        "alignment": "abort",
        "blocks": "independent",
        "rows": "line_aware",
        "duplicates": "last_seen"
    }))
    .unwrap();
    assert_eq!(p.alignment, AlignmentPolicy::Abort);
    assert_eq!(p.blocks, BlockMode::Independent);
    assert_eq!(p.rows, RowStrategy::LineAware);
    assert_eq!(p.duplicates, DuplicatePolicy::LastSeen);

    let back = serde_json::to_value(&p).unwrap();
    assert_eq!(back["rows"], "line_aware");
}

#[test]
fn unknown_policy_is_rejected() {
    let result: Result<Profile, _> = serde_json::from_value(json!({
        "id": "C",
        "start_marker": "Profile C",
        "end_marker": "Profile D",
        "min_speed": 500,
        "alignment": "ignore"
    }));
    assert!(result.is_err());
}

#[test]
fn lookup_options_shape() {
    let options: LookupOptions = serde_json::from_value(json!({
        "strategy": "scattered",
        "missing_corners": "unknown"
    }))
    .unwrap();
    assert_eq!(options.strategy, StrategyChoice::Scattered);
    assert_eq!(options.missing_corners, MissingCornerPolicy::Unknown);
}

#[test]
fn lookup_serializes_resolution_and_corners() {
    let table = PowerTable::new(vec![
        LongRecord::new(180.0, 710.0, 1.2),
        LongRecord::new(200.0, 710.0, 1.5),
    ]);
    let hit = lookup(&table, 190.0, 710.0);
    let v = serde_json::to_value(hit).unwrap();
    assert_eq!(v["resolution"], "bilinear");
    assert_eq!(v["corners"]["diameter"]["low"], 180.0);
    assert_eq!(v["corners"]["diameter"]["high"], 200.0);
    assert_eq!(v["missing_corners"], 0);

    let none = serde_json::to_value(Lookup::no_data()).unwrap();
    assert_eq!(none["resolution"], "no_data");
    assert_eq!(none["corners"], serde_json::Value::Null);
}

#[test]
fn records_and_warnings_serialize() {
    let parsed = parse_table(
        "Profile C 180 200 710 1,2 1,5 950 Profile D",
        &Profile::new("C", "Profile C", "Profile D", 500),
    )
    .unwrap();
    let records = serde_json::to_value(parsed.value.table.records()).unwrap();
    assert_eq!(records[1], json!({"diameter": 200.0, "speed": 710.0, "power": 1.5}));

    let warnings = serde_json::to_value(&parsed.warnings).unwrap();
    assert!(
        warnings
            .as_array()
            .unwrap()
            .iter()
            .any(|w| w["code"] == "TrailingRemainder")
    );
}
