//! Formatting, comparison and configuration through `DataTypeServices`.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use dtk_core::{DataTypeComparer, DataTypeServices, EngineConfig};
use dtk_model::{ComparisonResult, DataTypeError, DataTypeResolution, Result, Value};

fn services() -> Arc<DataTypeServices> {
    DataTypeServices::with_defaults().expect("default services")
}

fn format(services: &DataTypeServices, value: Value, key: &str, culture: &str) -> String {
    services
        .formatters()
        .format_for_culture(&value, Some(key), culture)
        .expect("format should not be a setup error")
        .into_value()
        .expect("value should format")
}

#[test]
fn default_formats_per_culture() {
    let services = services();
    let date = Value::Date(Utc.with_ymd_and_hms(2003, 2, 1, 0, 0, 0).unwrap());
    let cultures = ["en-US", "en-GB", "fr-FR", "de-DE"];

    let mut table = String::new();
    for culture in cultures {
        table.push_str(&format!(
            "{culture}: {} | {} | {} | {} | {}\n",
            format(&services, Value::Number(-1234.5), "Number", culture),
            format(&services, Value::Number(1234.5), "Currency", culture),
            format(&services, Value::Number(0.125), "Percentage", culture),
            format(&services, date.clone(), "ShortDate", culture),
            format(&services, Value::Boolean(true), "YesNoBoolean", culture),
        ));
    }

    insta::assert_snapshot!(table.trim_end(), @r"
    en-US: -1,234.5 | $1,234.50 | 12.5% | 02/01/2003 | yes
    en-GB: -1,234.5 | £1,234.50 | 12.5% | 01/02/2003 | yes
    fr-FR: -1 234,5 | 1 234,50 € | 12,5 % | 01/02/2003 | oui
    de-DE: -1.234,5 | 1.234,50 € | 12,5 % | 01.02.2003 | ja
    ");
}

#[test]
fn format_uses_the_active_culture() {
    let services = services();
    services.cultures().set_active_culture_id("de-DE").unwrap();
    assert_eq!(
        services
            .formatters()
            .format(&Value::Number(0.5), None)
            .unwrap(),
        DataTypeResolution::Value("0,5".to_string())
    );
}

#[test]
fn unknown_culture_has_no_formatter() {
    let services = services();
    assert!(matches!(
        services
            .formatters()
            .format_for_culture(&Value::Number(1.0), Some("Number"), "ja-JP"),
        Err(DataTypeError::NoHandler { .. })
    ));
    assert_eq!(
        format(&services, Value::from("text"), "String", "ja-JP"),
        "text"
    );
}

#[test]
fn default_comparisons() {
    let services = services();
    let comparers = services.comparers();

    assert_eq!(
        comparers
            .compare(&Value::Number(1.0), &Value::Number(2.0), None, None)
            .unwrap(),
        ComparisonResult::LessThan
    );
    assert_eq!(
        comparers
            .compare(&Value::from("1"), &Value::Number(1.0), None, None)
            .unwrap(),
        ComparisonResult::Undetermined
    );
    assert_eq!(
        comparers
            .compare(&Value::Null, &Value::from("a"), None, None)
            .unwrap(),
        ComparisonResult::NotEqual
    );
}

#[test]
fn dates_compare_by_day() {
    let services = services();
    let morning = Value::Date(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap());
    let evening = Value::Date(Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap());
    let next_day = Value::Date(Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap());
    let comparers = services.comparers();

    assert_eq!(
        comparers.compare(&morning, &evening, None, None).unwrap(),
        ComparisonResult::Equal
    );
    assert_eq!(
        comparers
            .compare(&next_day, &morning, Some("ShortDate"), Some("ShortDate"))
            .unwrap(),
        ComparisonResult::GreaterThan
    );
}

#[test]
fn lookup_keys_select_converters() {
    let services = services();
    let comparers = services.comparers();
    assert_eq!(
        comparers
            .compare(
                &Value::from("ABC"),
                &Value::from("abc"),
                Some("CaseInsensitive"),
                Some("CaseInsensitive"),
            )
            .unwrap(),
        ComparisonResult::Equal
    );
    assert_eq!(
        comparers
            .compare(&Value::from("ABC"), &Value::from("abc"), None, None)
            .unwrap(),
        ComparisonResult::LessThan
    );
    assert_eq!(
        comparers
            .compare(
                &Value::Number(2.7),
                &Value::Number(2.1),
                Some("Integer"),
                Some("Integer"),
            )
            .unwrap(),
        ComparisonResult::Equal
    );
}

struct AlwaysEqual;

impl DataTypeComparer for AlwaysEqual {
    fn supports(
        &self,
        _left: &Value,
        _right: &Value,
        left_lookup_key: Option<&str>,
        _right_lookup_key: Option<&str>,
    ) -> bool {
        left_lookup_key == Some("Anything")
    }

    fn compare(
        &self,
        _left: &Value,
        _right: &Value,
        _left_lookup_key: Option<&str>,
        _right_lookup_key: Option<&str>,
    ) -> Result<ComparisonResult> {
        Ok(ComparisonResult::Equal)
    }
}

#[test]
fn custom_comparers_win() {
    let services = services();
    services.comparers().register(Arc::new(AlwaysEqual)).unwrap();
    assert_eq!(
        services
            .comparers()
            .compare(&Value::from("a"), &Value::Number(9.0), Some("Anything"), None)
            .unwrap(),
        ComparisonResult::Equal
    );
}

#[test]
fn config_file_fallbacks_and_active_culture() {
    let config = EngineConfig::from_json_str(
        r#"{
            "activeCulture": "en-US",
            "cultures": [
                { "cultureId": "en", "grammar": "en" },
                { "cultureId": "en-US", "fallbackCultureId": "en" }
            ],
            "lookupKeyFallbacks": { "USDCurrency": "Currency" }
        }"#,
    )
    .unwrap();
    let services = DataTypeServices::from_config(&config).unwrap();

    assert_eq!(services.cultures().active_culture_id().unwrap(), "en-US");
    assert_eq!(
        services.cultures().available_cultures().unwrap(),
        vec!["en".to_string(), "en-US".to_string()]
    );
    assert_eq!(
        services
            .parsers()
            .parse("$5", "USDCurrency", "en-US")
            .unwrap(),
        DataTypeResolution::Value(Value::Number(5.0))
    );
    assert_eq!(
        services
            .formatters()
            .format(&Value::Number(5.0), Some("USDCurrency"))
            .unwrap(),
        DataTypeResolution::Value("$5.00".to_string())
    );
}

#[test]
fn custom_grammar_from_json() {
    let config = EngineConfig::from_json_str(
        r#"{
            "activeCulture": "sv",
            "cultures": [
                {
                    "cultureId": "sv",
                    "grammar": {
                        "decimalSeparator": ",",
                        "thousandsSeparator": " ",
                        "negativeSymbol": "-",
                        "currencySymbol": "kr",
                        "currencyPlacement": "suffix",
                        "percentSymbol": "%",
                        "percentSpaced": true,
                        "dateOrder": "ymd",
                        "dateSeparator": "-",
                        "trueWords": ["ja"],
                        "falseWords": ["nej"]
                    }
                }
            ]
        }"#,
    )
    .unwrap();
    let services = DataTypeServices::from_config(&config).unwrap();

    assert_eq!(
        services.parsers().parse("2024-03-09", "Date", "sv").unwrap(),
        DataTypeResolution::Value(Value::Date(
            Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap()
        ))
    );
    assert_eq!(
        format(&services, Value::Number(1500.0), "Currency", "sv"),
        "1 500,00 kr"
    );
    assert_eq!(
        format(&services, Value::Boolean(false), "Boolean", "sv"),
        "nej"
    );
}

#[test]
fn default_config_round_trips_through_json() {
    let config = EngineConfig::default();
    let json = config.to_json_pretty().unwrap();
    assert_eq!(EngineConfig::from_json_str(&json).unwrap(), config);
}
