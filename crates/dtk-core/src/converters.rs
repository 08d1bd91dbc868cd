//! Converters that reduce values to something [`default_compare`] orders.
//!
//! [`default_compare`]: crate::services::default_compare

use dtk_model::{DataTypeResolution, Result, Value, lookup_keys};

use crate::services::DataTypeConverter;

const SECONDS_PER_DAY: i64 = 86_400;

/// Turns a date into whole days since the Unix epoch so that two dates
/// on the same day compare equal.
#[derive(Debug, Clone)]
pub struct DateToDaysConverter {
    lookup_key: String,
}

impl DateToDaysConverter {
    pub fn new(lookup_key: impl Into<String>) -> Self {
        Self {
            lookup_key: lookup_key.into(),
        }
    }
}

impl Default for DateToDaysConverter {
    fn default() -> Self {
        Self::new(lookup_keys::DATE)
    }
}

impl DataTypeConverter for DateToDaysConverter {
    fn supports(&self, value: &Value, lookup_key: &str) -> bool {
        lookup_key == self.lookup_key && matches!(value, Value::Date(_))
    }

    fn convert(&self, value: &Value, _lookup_key: &str) -> Result<DataTypeResolution<Value>> {
        Ok(match value {
            Value::Date(date) => {
                let days = date.timestamp().div_euclid(SECONDS_PER_DAY);
                DataTypeResolution::Value(Value::from(days))
            }
            _ => DataTypeResolution::error("Value is not a date"),
        })
    }
}

/// Lower-cases strings for case-insensitive comparison.
#[derive(Debug, Clone, Default)]
pub struct CaseInsensitiveConverter;

impl DataTypeConverter for CaseInsensitiveConverter {
    fn supports(&self, value: &Value, lookup_key: &str) -> bool {
        lookup_key == lookup_keys::CASE_INSENSITIVE && matches!(value, Value::String(_))
    }

    fn convert(&self, value: &Value, _lookup_key: &str) -> Result<DataTypeResolution<Value>> {
        Ok(match value {
            Value::String(text) => DataTypeResolution::Value(Value::String(text.to_lowercase())),
            _ => DataTypeResolution::error("Value is not a string"),
        })
    }
}

/// Drops the fractional part of a number.
#[derive(Debug, Clone, Default)]
pub struct IntegerConverter;

impl DataTypeConverter for IntegerConverter {
    fn supports(&self, value: &Value, lookup_key: &str) -> bool {
        lookup_key == lookup_keys::INTEGER && matches!(value, Value::Number(_))
    }

    fn convert(&self, value: &Value, _lookup_key: &str) -> Result<DataTypeResolution<Value>> {
        Ok(match value {
            Value::Number(number) => DataTypeResolution::Value(Value::Number(number.trunc())),
            _ => DataTypeResolution::error("Value is not a number"),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn same_day_dates_convert_to_the_same_number() {
        let converter = DateToDaysConverter::default();
        let morning = Value::Date(Utc.with_ymd_and_hms(2024, 3, 1, 1, 0, 0).unwrap());
        let evening = Value::Date(Utc.with_ymd_and_hms(2024, 3, 1, 23, 0, 0).unwrap());
        assert!(converter.supports(&morning, "Date"));
        assert!(!converter.supports(&morning, "ShortDate"));
        assert_eq!(
            converter.convert(&morning, "Date").unwrap(),
            converter.convert(&evening, "Date").unwrap()
        );
    }

    #[test]
    fn dates_before_the_epoch_round_down() {
        let converter = DateToDaysConverter::default();
        let date = Value::Date(Utc.with_ymd_and_hms(1969, 12, 31, 12, 0, 0).unwrap());
        assert_eq!(
            converter.convert(&date, "Date").unwrap(),
            DataTypeResolution::Value(Value::Number(-1.0))
        );
    }

    #[test]
    fn case_insensitive_lowercases() {
        assert_eq!(
            CaseInsensitiveConverter
                .convert(&Value::from("MiXeD"), "CaseInsensitive")
                .unwrap(),
            DataTypeResolution::Value(Value::from("mixed"))
        );
    }

    #[test]
    fn integer_truncates() {
        assert_eq!(
            IntegerConverter.convert(&Value::Number(-2.7), "Integer").unwrap(),
            DataTypeResolution::Value(Value::Number(-2.0))
        );
    }
}
