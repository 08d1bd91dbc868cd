//! Registry of supported cultures and their fallback edges.

use std::sync::{Arc, PoisonError, RwLock};

use dtk_model::{CultureIdFallback, Result, culture_language_code};
use tracing::debug;

use crate::dispose::DisposeGuard;

/// Culture used until [`CultureRegistry::set_active_culture_id`] is called.
pub const DEFAULT_CULTURE_ID: &str = "en";

#[derive(Debug)]
struct CultureState {
    cultures: Vec<Arc<CultureIdFallback>>,
    active_culture_id: String,
}

/// Known cultures, their fallback chain and the active culture.
///
/// The fallback edges form a forest. Cycles are not rejected at
/// registration; the formatter's culture walk reports them as
/// [`DataTypeError::CyclicFallback`](dtk_model::DataTypeError::CyclicFallback).
#[derive(Debug)]
pub struct CultureRegistry {
    state: RwLock<CultureState>,
    guard: DisposeGuard,
}

impl Default for CultureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CultureRegistry {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CultureState {
                cultures: Vec::new(),
                active_culture_id: DEFAULT_CULTURE_ID.to_string(),
            }),
            guard: DisposeGuard::new("CultureRegistry"),
        }
    }

    /// Registers a culture, replacing any entry with the same id in place.
    pub fn register(&self, entry: CultureIdFallback) -> Result<()> {
        self.guard.check()?;
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let entry = Arc::new(entry);
        match state
            .cultures
            .iter_mut()
            .find(|existing| existing.culture_id == entry.culture_id)
        {
            Some(existing) => {
                debug!(culture_id = %entry.culture_id, "replacing culture registration");
                *existing = entry;
            }
            None => state.cultures.push(entry),
        }
        Ok(())
    }

    /// Exact-match lookup.
    pub fn find(&self, culture_id: &str) -> Result<Option<Arc<CultureIdFallback>>> {
        self.guard.check()?;
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Ok(state
            .cultures
            .iter()
            .find(|entry| entry.culture_id == culture_id)
            .cloned())
    }

    /// Returns `culture_id` when registered, else its language code when that
    /// is registered, else `None`.
    ///
    /// This reduces to the language code once; it does not follow
    /// `fallback_culture_id` links.
    pub fn closest_culture_id(&self, culture_id: &str) -> Result<Option<String>> {
        if self.find(culture_id)?.is_some() {
            return Ok(Some(culture_id.to_string()));
        }
        let language = culture_language_code(culture_id);
        if language != culture_id && self.find(language)?.is_some() {
            return Ok(Some(language.to_string()));
        }
        Ok(None)
    }

    pub fn active_culture_id(&self) -> Result<String> {
        self.guard.check()?;
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Ok(state.active_culture_id.clone())
    }

    /// Single-writer expectation: set during startup or on an explicit
    /// user culture switch.
    pub fn set_active_culture_id(&self, culture_id: impl Into<String>) -> Result<()> {
        self.guard.check()?;
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.active_culture_id = culture_id.into();
        Ok(())
    }

    /// Registered culture ids in insertion order.
    pub fn available_cultures(&self) -> Result<Vec<String>> {
        self.guard.check()?;
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Ok(state
            .cultures
            .iter()
            .map(|entry| entry.culture_id.clone())
            .collect())
    }

    /// De-duplicated language codes in first-seen order.
    pub fn available_languages(&self) -> Result<Vec<String>> {
        self.guard.check()?;
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let mut languages: Vec<String> = Vec::new();
        for entry in &state.cultures {
            let language = entry.language_code();
            if !languages.iter().any(|known| known == language) {
                languages.push(language.to_string());
            }
        }
        Ok(languages)
    }

    /// Clears the registry. Every later call fails with `Disposed`.
    pub fn dispose(&self) {
        self.guard.dispose();
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.cultures.clear();
    }
}
