//! The fallback walks every service shares.

use std::collections::HashSet;

use dtk_model::{DataTypeResolution, Result};
use tracing::{debug, warn};

use crate::cultures::CultureRegistry;
use crate::lookup_key_fallback::LookupKeyFallbackRegistry;

/// Tries `attempt` for `lookup_key`, then for each more general key the
/// fallback registry yields. One visited set spans the whole chain, so a
/// loop fails with `CyclicFallback` instead of recursing forever.
///
/// Returns the handler together with the key it was found under.
pub(crate) fn resolve_lookup_key<T>(
    lookup_key: &str,
    fallbacks: &LookupKeyFallbackRegistry,
    mut attempt: impl FnMut(&str) -> Result<Option<T>>,
) -> Result<Option<(T, String)>> {
    let mut visited = HashSet::new();
    let mut key = lookup_key.to_string();
    loop {
        LookupKeyFallbackRegistry::ensure_recursion_safe(&key, &mut visited)?;
        if let Some(found) = attempt(&key)? {
            return Ok(Some((found, key)));
        }
        match fallbacks.find(&key)? {
            Some(general) => {
                debug!(from = %key, to = %general, "lookup key fallback");
                key = general;
            }
            None => return Ok(None),
        }
    }
}

/// Tries `attempt` for `culture_id` and each culture along its
/// `fallback_culture_id` chain.
pub(crate) fn resolve_culture<T>(
    culture_id: &str,
    cultures: &CultureRegistry,
    mut attempt: impl FnMut(&str) -> Result<Option<T>>,
) -> Result<Option<(T, String)>> {
    let mut visited = HashSet::new();
    let mut culture = culture_id.to_string();
    loop {
        LookupKeyFallbackRegistry::ensure_recursion_safe(&culture, &mut visited)?;
        if let Some(found) = attempt(&culture)? {
            return Ok(Some((found, culture)));
        }
        let next = cultures
            .find(&culture)?
            .and_then(|entry| entry.fallback_culture_id.clone());
        match next {
            Some(fallback) => {
                debug!(from = %culture, to = %fallback, "culture fallback");
                culture = fallback;
            }
            None => return Ok(None),
        }
    }
}

/// Folds an ordinary handler failure into an error result. Severe errors pass through.
pub(crate) fn downgrade<T>(
    service: &'static str,
    lookup_key: &str,
    outcome: Result<DataTypeResolution<T>>,
) -> Result<DataTypeResolution<T>> {
    match outcome {
        Err(error) if !error.is_severe() => {
            warn!(service, lookup_key, %error, "handler failed");
            Ok(DataTypeResolution::Error(error.to_string()))
        }
        other => other,
    }
}
