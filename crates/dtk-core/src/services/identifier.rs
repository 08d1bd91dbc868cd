use std::sync::Arc;

use dtk_model::{DataTypeError, Result, Value};

use super::handlers::{HandlerList, LazyLoad, LazyLoader, find_with_lazy_load};
use crate::dispose::DisposeGuard;

/// Infers a lookup key from the runtime shape of a value.
pub trait DataTypeIdentifier: Send + Sync {
    fn lookup_key(&self) -> &str;

    fn supports_value(&self, value: &Value) -> bool;
}

/// Identifier registry. Registering a second identifier for the same lookup
/// key replaces the first in place.
pub struct IdentifierService {
    handlers: HandlerList<dyn DataTypeIdentifier>,
    lazy_load: LazyLoader<IdentifierService>,
    guard: DisposeGuard,
}

impl IdentifierService {
    pub(crate) fn new() -> Self {
        Self {
            handlers: HandlerList::default(),
            lazy_load: LazyLoader::default(),
            guard: DisposeGuard::new("IdentifierService"),
        }
    }

    pub fn register(&self, identifier: Arc<dyn DataTypeIdentifier>) -> Result<()> {
        self.guard.check()?;
        let key = identifier.lookup_key().trim().to_string();
        if key.is_empty() {
            return Err(DataTypeError::coding(
                "a DataTypeIdentifier needs a non-empty lookup key",
            ));
        }
        self.handlers
            .replace_or_push(identifier, |existing| existing.lookup_key().trim() == key);
        Ok(())
    }

    pub fn set_lazy_load(&self, load: LazyLoad<IdentifierService>) -> Result<()> {
        self.guard.check()?;
        self.lazy_load.set(load)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The identifier registered under `lookup_key`.
    pub fn find(&self, lookup_key: &str) -> Result<Option<Arc<dyn DataTypeIdentifier>>> {
        self.guard.check()?;
        let lookup_key = lookup_key.trim();
        Ok(find_with_lazy_load(self, &self.lazy_load, |service| {
            service
                .handlers
                .first(|identifier| identifier.lookup_key().trim() == lookup_key)
        }))
    }

    /// Lookup key of the first identifier that recognises `value`.
    pub fn identify(&self, value: &Value) -> Result<Option<String>> {
        self.guard.check()?;
        Ok(find_with_lazy_load(self, &self.lazy_load, |service| {
            service
                .handlers
                .first(|identifier| identifier.supports_value(value))
        })
        .map(|identifier| identifier.lookup_key().trim().to_string()))
    }

    pub(crate) fn dispose(&self) {
        self.guard.dispose();
        self.handlers.clear();
        self.lazy_load.clear();
    }
}
