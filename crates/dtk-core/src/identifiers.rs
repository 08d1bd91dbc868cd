use dtk_model::{Value, ValueKind, lookup_keys};

use crate::services::DataTypeIdentifier;

/// Identifies a value by its runtime kind.
#[derive(Debug, Clone)]
pub struct ValueKindIdentifier {
    lookup_key: String,
    kind: ValueKind,
}

impl ValueKindIdentifier {
    /// `lookup_key` is stored trimmed.
    pub fn new(lookup_key: &str, kind: ValueKind) -> Self {
        Self {
            lookup_key: lookup_key.trim().to_string(),
            kind,
        }
    }

    /// One identifier per non-null kind, keyed by the built-in lookup keys.
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::new(lookup_keys::STRING, ValueKind::String),
            Self::new(lookup_keys::NUMBER, ValueKind::Number),
            Self::new(lookup_keys::BOOLEAN, ValueKind::Boolean),
            Self::new(lookup_keys::DATE, ValueKind::Date),
        ]
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }
}

impl DataTypeIdentifier for ValueKindIdentifier {
    fn lookup_key(&self) -> &str {
        &self.lookup_key
    }

    fn supports_value(&self, value: &Value) -> bool {
        value.kind() == self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_each_kind_but_null() {
        let identifiers = ValueKindIdentifier::builtin();
        let key_for = |value: &Value| {
            identifiers
                .iter()
                .find(|identifier| identifier.supports_value(value))
                .map(|identifier| identifier.lookup_key().to_string())
        };
        assert_eq!(key_for(&Value::from("a")).as_deref(), Some("String"));
        assert_eq!(key_for(&Value::Number(1.0)).as_deref(), Some("Number"));
        assert_eq!(key_for(&Value::Boolean(true)).as_deref(), Some("Boolean"));
        assert_eq!(key_for(&Value::Null), None);
    }

    #[test]
    fn new_trims_the_lookup_key() {
        let identifier = ValueKindIdentifier::new(" Date\t", ValueKind::Date);
        assert_eq!(identifier.lookup_key(), "Date");
    }
}
