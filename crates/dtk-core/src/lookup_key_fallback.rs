//! Fallback edges from custom lookup keys to more general ones.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use dtk_model::{CaseInsensitiveMap, DataTypeError, Result};

use crate::dispose::DisposeGuard;

/// Maps a custom key such as `"USDCurrency"` to a general one such as
/// `"Currency"`.
///
/// `find` is a single hop. Callers walk the chain themselves so they can
/// interleave culture and key fallback, guarding each hop with
/// [`LookupKeyFallbackRegistry::ensure_recursion_safe`].
#[derive(Debug)]
pub struct LookupKeyFallbackRegistry {
    entries: RwLock<CaseInsensitiveMap<String>>,
    guard: DisposeGuard,
}

impl Default for LookupKeyFallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupKeyFallbackRegistry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(CaseInsensitiveMap::new()),
            guard: DisposeGuard::new("LookupKeyFallbackRegistry"),
        }
    }

    /// Stores `custom_key -> general_key`, replacing an earlier edge for `custom_key`.
    pub fn register(&self, custom_key: &str, general_key: &str) -> Result<()> {
        self.guard.check()?;
        let (custom_key, general_key) = (custom_key.trim(), general_key.trim());
        if custom_key.is_empty() || general_key.is_empty() {
            return Err(DataTypeError::coding(
                "lookup key fallback requires non-empty custom and general keys",
            ));
        }
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(custom_key, general_key.to_string());
        Ok(())
    }

    /// The general key registered for `key`, matched case-insensitively.
    pub fn find(&self, key: &str) -> Result<Option<String>> {
        self.guard.check()?;
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    /// Registered edges sorted by custom key.
    pub fn entries(&self) -> Result<Vec<(String, String)>> {
        self.guard.check()?;
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut pairs: Vec<(String, String)> = entries
            .iter()
            .map(|(custom, general)| (custom.to_string(), general.clone()))
            .collect();
        pairs.sort();
        Ok(pairs)
    }

    /// Fails when `key` was already visited on this resolution, otherwise
    /// records it. Seed `visited` with an empty set at the top-level call.
    pub fn ensure_recursion_safe(key: &str, visited: &mut HashSet<String>) -> Result<()> {
        if !visited.insert(key.to_string()) {
            return Err(DataTypeError::CyclicFallback {
                key: key.to_string(),
            });
        }
        Ok(())
    }

    pub fn dispose(&self) {
        self.guard.dispose();
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_is_one_hop() {
        let registry = LookupKeyFallbackRegistry::new();
        registry.register("CUSTOMB", "CUSTOMA").unwrap();
        registry.register("CUSTOMA", "Currency").unwrap();
        assert_eq!(registry.find("CUSTOMB").unwrap().as_deref(), Some("CUSTOMA"));
        assert_eq!(registry.find("Currency").unwrap(), None);
    }

    #[test]
    fn find_is_case_insensitive_and_trimmed() {
        let registry = LookupKeyFallbackRegistry::new();
        registry.register(" USDCurrency ", " Currency").unwrap();
        assert_eq!(
            registry.find("usdcurrency").unwrap().as_deref(),
            Some("Currency")
        );
        assert_eq!(
            registry.entries().unwrap(),
            vec![("USDCurrency".to_string(), "Currency".to_string())]
        );
    }

    #[test]
    fn register_replaces_edge() {
        let registry = LookupKeyFallbackRegistry::new();
        registry.register("Money", "Number").unwrap();
        registry.register("money", "Currency").unwrap();
        assert_eq!(registry.find("Money").unwrap().as_deref(), Some("Currency"));
    }

    #[test]
    fn empty_keys_are_coding_errors() {
        let registry = LookupKeyFallbackRegistry::new();
        assert!(matches!(
            registry.register("  ", "Number"),
            Err(DataTypeError::Coding(_))
        ));
    }

    #[test]
    fn recursion_guard_names_repeated_key() {
        let mut visited = HashSet::new();
        LookupKeyFallbackRegistry::ensure_recursion_safe("A", &mut visited).unwrap();
        LookupKeyFallbackRegistry::ensure_recursion_safe("B", &mut visited).unwrap();
        let err = LookupKeyFallbackRegistry::ensure_recursion_safe("A", &mut visited).unwrap_err();
        assert_eq!(err, DataTypeError::CyclicFallback { key: "A".to_string() });
    }

    #[test]
    fn disposed_registry_rejects_calls() {
        let registry = LookupKeyFallbackRegistry::new();
        registry.dispose();
        assert!(matches!(
            registry.find("A"),
            Err(DataTypeError::Disposed { .. })
        ));
    }
}
