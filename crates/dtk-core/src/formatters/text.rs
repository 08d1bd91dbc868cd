use dtk_model::{DataTypeError, DataTypeResolution, Result, Value, lookup_keys};

use super::serves;
use crate::parsers::CultureGate;
use crate::services::DataTypeFormatter;

/// Writes booleans as culture words such as `yes`/`no`.
#[derive(Debug, Clone)]
pub struct BooleanFormatter {
    lookup_key: String,
    cultures: Option<CultureGate>,
    true_text: String,
    false_text: String,
}

impl BooleanFormatter {
    pub fn new(
        lookup_key: &str,
        true_text: impl Into<String>,
        false_text: impl Into<String>,
    ) -> Result<Self> {
        let lookup_key = lookup_key.trim();
        if lookup_key.is_empty() {
            return Err(DataTypeError::coding("formatter lookup key must not be empty"));
        }
        Ok(Self {
            lookup_key: lookup_key.to_string(),
            cultures: None,
            true_text: true_text.into(),
            false_text: false_text.into(),
        })
    }

    pub fn for_cultures<I, S>(mut self, culture_ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.cultures = Some(CultureGate::new(culture_ids)?);
        Ok(self)
    }
}

impl DataTypeFormatter for BooleanFormatter {
    fn supports(&self, lookup_key: &str, culture_id: &str) -> bool {
        self.lookup_key == lookup_key && serves(self.cultures.as_ref(), culture_id)
    }

    fn format(
        &self,
        value: &Value,
        _lookup_key: &str,
        _culture_id: &str,
    ) -> Result<DataTypeResolution<String>> {
        Ok(match value {
            Value::Null => DataTypeResolution::Value(String::new()),
            Value::Boolean(true) => DataTypeResolution::Value(self.true_text.clone()),
            Value::Boolean(false) => DataTypeResolution::Value(self.false_text.clone()),
            other => DataTypeResolution::error(format!(
                "Cannot format {:?} as a boolean",
                other.kind()
            )),
        })
    }
}

/// Culture-agnostic formatter for the `String` lookup key.
#[derive(Debug, Clone, Default)]
pub struct StringFormatter;

impl DataTypeFormatter for StringFormatter {
    fn supports(&self, lookup_key: &str, _culture_id: &str) -> bool {
        lookup_key == lookup_keys::STRING
    }

    fn format(
        &self,
        value: &Value,
        _lookup_key: &str,
        _culture_id: &str,
    ) -> Result<DataTypeResolution<String>> {
        Ok(DataTypeResolution::Value(match value {
            Value::Null => String::new(),
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_words() {
        let formatter = BooleanFormatter::new("YesNoBoolean", "yes", "no")
            .unwrap()
            .for_cultures(["en"])
            .unwrap();
        assert!(formatter.supports("YesNoBoolean", "en"));
        assert!(!formatter.supports("YesNoBoolean", "fr"));
        assert_eq!(
            formatter.format(&Value::Boolean(false), "YesNoBoolean", "en").unwrap(),
            DataTypeResolution::Value("no".to_string())
        );
    }

    #[test]
    fn string_passthrough() {
        let formatter = StringFormatter;
        assert!(formatter.supports("String", "any"));
        assert_eq!(
            formatter.format(&Value::from("abc"), "String", "en").unwrap(),
            DataTypeResolution::Value("abc".to_string())
        );
        assert_eq!(
            formatter.format(&Value::Null, "String", "en").unwrap(),
            DataTypeResolution::Value(String::new())
        );
    }
}
