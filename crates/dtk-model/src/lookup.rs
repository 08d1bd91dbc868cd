//! Lookup keys and case-insensitive key storage.

use std::collections::HashMap;

/// Built-in lookup keys. Lookup keys are open strings; these are only the
/// ones the default handlers register under.
pub mod lookup_keys {
    pub const STRING: &str = "String";
    pub const NUMBER: &str = "Number";
    pub const INTEGER: &str = "Integer";
    pub const BOOLEAN: &str = "Boolean";
    pub const YES_NO_BOOLEAN: &str = "YesNoBoolean";
    pub const DATE: &str = "Date";
    pub const SHORT_DATE: &str = "ShortDate";
    pub const CURRENCY: &str = "Currency";
    pub const PERCENTAGE: &str = "Percentage";
    pub const PERCENTAGE_100: &str = "Percentage100";
    pub const CASE_INSENSITIVE: &str = "CaseInsensitive";
}

/// Map keyed by trimmed, case-folded names that remembers the original spelling.
#[derive(Debug, Clone)]
pub struct CaseInsensitiveMap<V> {
    map: HashMap<String, (String, V)>,
}

impl<V> Default for CaseInsensitiveMap<V> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<V> CaseInsensitiveMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn fold(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Inserts or replaces the entry for `name`, returning the previous value.
    pub fn insert(&mut self, name: &str, value: V) -> Option<V> {
        self.map
            .insert(Self::fold(name), (name.trim().to_string(), value))
            .map(|(_, previous)| previous)
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.map.get(&Self::fold(name)).map(|(_, value)| value)
    }

    /// The spelling used when the entry was inserted.
    pub fn original_name(&self, name: &str) -> Option<&str> {
        self.map
            .get(&Self::fold(name))
            .map(|(original, _)| original.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&Self::fold(name))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.map
            .values()
            .map(|(original, value)| (original.as_str(), value))
    }
}
