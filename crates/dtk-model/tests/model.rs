//! Tests for dtk-model types.

use chrono::{TimeZone, Utc};
use dtk_model::{ComparisonResult, CultureIdFallback, DataTypeResolution, Value};

#[test]
fn resolution_serializes_as_value_or_error_message() {
    let ok: DataTypeResolution<Value> = DataTypeResolution::Value(Value::Number(1.5));
    let json = serde_json::to_string(&ok).expect("serialize value");
    assert_eq!(json, r#"{"value":{"type":"number","value":1.5}}"#);

    let failed: DataTypeResolution<Value> = DataTypeResolution::error("Invalid number");
    let json = serde_json::to_string(&failed).expect("serialize error");
    assert_eq!(json, r#"{"errorMessage":"Invalid number"}"#);
}

#[test]
fn resolution_accessors() {
    let ok = DataTypeResolution::Value(3);
    assert!(ok.is_ok());
    assert_eq!(ok.value(), Some(&3));
    assert_eq!(ok.error_message(), None);
    assert_eq!(ok.map(|n| n * 2), DataTypeResolution::Value(6));

    let failed: DataTypeResolution<i32> = DataTypeResolution::error("nope");
    assert_eq!(failed.error_message(), Some("nope"));
    assert_eq!(failed.clone().into_value(), None);
    assert_eq!(
        failed.and_then(|n| DataTypeResolution::Value(n + 1)),
        DataTypeResolution::error("nope")
    );
}

#[test]
fn culture_entry_reads_camel_case() {
    let entry: CultureIdFallback =
        serde_json::from_str(r#"{"cultureId":"en-GB","fallbackCultureId":"en"}"#)
            .expect("deserialize culture");
    assert_eq!(entry, CultureIdFallback::new("en-GB", Some("en")));
    assert_eq!(entry.language_code(), "en");

    let root: CultureIdFallback =
        serde_json::from_str(r#"{"cultureId":"en"}"#).expect("deserialize root culture");
    assert_eq!(root.fallback_culture_id, None);
}

#[test]
fn value_round_trips_through_json() {
    let date = Utc.with_ymd_and_hms(2000, 12, 1, 0, 0, 0).unwrap();
    let value = Value::Date(date);
    let json = serde_json::to_string(&value).expect("serialize date");
    let back: Value = serde_json::from_str(&json).expect("deserialize date");
    assert_eq!(back, value);
    assert!(!back.is_simple());
}

#[test]
fn ordering_maps_to_comparison() {
    assert_eq!(
        ComparisonResult::from(1.cmp(&2)),
        ComparisonResult::LessThan
    );
    assert_eq!(
        ComparisonResult::from(2.cmp(&2)),
        ComparisonResult::Equal
    );
}
