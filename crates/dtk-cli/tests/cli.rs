//! Rendering of command results.

use dtk_cli::report::{Report, comparison_label, cultures_table, lookup_keys_table};
use dtk_cli::value_arg::parse_value_token;
use dtk_core::{DataTypeServices, EngineConfig};
use dtk_model::{DataTypeResolution, Value};

#[test]
fn parse_report_as_json() {
    let services = DataTypeServices::with_defaults().unwrap();
    let resolution = services
        .parsers()
        .parse("($12.50)", "Currency", "en-US")
        .unwrap();
    let report = Report::new("parse", resolution)
        .with_lookup_key(Some("Currency"))
        .with_culture_id("en-US");

    insta::assert_snapshot!(report.to_json().unwrap(), @r#"
    {
      "command": "parse",
      "lookupKey": "Currency",
      "cultureId": "en-US",
      "value": {
        "type": "number",
        "value": -12.5
      }
    }
    "#);
    assert!(!report.is_error());
}

#[test]
fn error_report_carries_the_message() {
    let services = DataTypeServices::with_defaults().unwrap();
    let resolution = services.parsers().parse("31/02/2024", "Date", "en-GB").unwrap();
    let report = Report::new("parse", resolution).with_culture_id("en-GB");

    insta::assert_snapshot!(report.to_json().unwrap(), @r#"
    {
      "command": "parse",
      "cultureId": "en-GB",
      "errorMessage": "Invalid date"
    }
    "#);
    assert_eq!(report.to_text(), "error: Invalid date");
    assert!(report.is_error());
}

#[test]
fn format_report_from_value_token() {
    let services = DataTypeServices::with_defaults().unwrap();
    let value = parse_value_token("date:2024-03-09").unwrap();
    let resolution = services
        .formatters()
        .format_for_culture(&value, Some("ShortDate"), "de-DE")
        .unwrap();
    let report = Report::new("format", resolution);
    assert_eq!(report.to_text(), "09.03.2024");
}

#[test]
fn compare_labels_match_json_spelling() {
    let services = DataTypeServices::with_defaults().unwrap();
    let result = services
        .comparers()
        .compare(&Value::Number(1.0), &Value::Number(3.0), None, None)
        .unwrap();
    let report = Report::new("compare", DataTypeResolution::Value(comparison_label(result)));
    assert_eq!(report.to_text(), "lessThan");
    assert_eq!(
        serde_json::to_value(result).unwrap(),
        serde_json::json!(comparison_label(result))
    );
}

#[test]
fn cultures_table_lists_every_culture() {
    let services = DataTypeServices::with_defaults().unwrap();
    let rendered = cultures_table(&services).unwrap().to_string();
    let culture_rows: Vec<&str> = rendered
        .lines()
        .filter(|line| line.contains("en") || line.contains("fr") || line.contains("de"))
        .collect();

    for culture in EngineConfig::default().cultures {
        assert!(
            rendered.contains(&culture.culture.culture_id),
            "missing {}:\n{rendered}",
            culture.culture.culture_id
        );
    }
    assert!(culture_rows.len() >= 7, "{rendered}");
    assert!(rendered.contains('*'));
}

#[test]
fn lookup_keys_table_lists_builtin_fallbacks() {
    let services = DataTypeServices::with_defaults().unwrap();
    let rendered = lookup_keys_table(&services).unwrap().to_string();
    for key in ["ShortDate", "YesNoBoolean", "CaseInsensitive"] {
        assert!(rendered.contains(key), "missing {key}:\n{rendered}");
    }
}
