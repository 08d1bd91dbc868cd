use std::sync::Arc;

use dtk_model::{DataTypeError, DataTypeResolution, Result, Value};
use tracing::trace;

use super::ServicesHandle;
use super::handlers::{HandlerList, LazyLoad, LazyLoader, find_with_lazy_load};
use super::resolution::{downgrade, resolve_lookup_key};
use crate::dispose::DisposeGuard;

const SERVICE: &str = "DataTypeParser";

/// Turns user text into a native value for one lookup key and culture.
pub trait DataTypeParser: Send + Sync {
    /// `text` lets several parsers share a key and split the inputs between
    /// them. Empty text must be accepted by any parser owning the key and culture.
    fn supports(&self, lookup_key: &str, culture_id: &str, text: &str) -> bool;

    fn parse(
        &self,
        text: &str,
        lookup_key: &str,
        culture_id: &str,
    ) -> Result<DataTypeResolution<Value>>;

    fn attach(&self, _services: &ServicesHandle) {}
}

/// Parser registry. Registration accumulates; earlier handlers shadow later ones.
pub struct ParserService {
    handlers: HandlerList<dyn DataTypeParser>,
    lazy_load: LazyLoader<ParserService>,
    host: ServicesHandle,
    guard: DisposeGuard,
}

impl ParserService {
    pub(crate) fn new(host: ServicesHandle) -> Self {
        Self {
            handlers: HandlerList::default(),
            lazy_load: LazyLoader::default(),
            host,
            guard: DisposeGuard::new("ParserService"),
        }
    }

    pub fn register(&self, parser: Arc<dyn DataTypeParser>) -> Result<()> {
        self.guard.check()?;
        parser.attach(&self.host);
        self.handlers.push(parser);
        Ok(())
    }

    /// Removes the first parser owning `lookup_key` for `culture_id`.
    pub fn unregister(&self, lookup_key: &str, culture_id: &str) -> Result<bool> {
        self.guard.check()?;
        Ok(self
            .handlers
            .remove_first(|parser| parser.supports(lookup_key, culture_id, "")))
    }

    pub fn set_lazy_load(&self, load: LazyLoad<ParserService>) -> Result<()> {
        self.guard.check()?;
        self.lazy_load.set(load)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(
        &self,
        lookup_key: &str,
        culture_id: &str,
        text: &str,
    ) -> Result<Option<Arc<dyn DataTypeParser>>> {
        self.guard.check()?;
        Ok(find_with_lazy_load(self, &self.lazy_load, |service| {
            service
                .handlers
                .first(|parser| parser.supports(lookup_key, culture_id, text))
        }))
    }

    /// Parses `text` for `lookup_key` in exactly `culture_id`.
    ///
    /// Only the lookup key fallback chain is walked; the caller supplies a
    /// definite culture. When no parser along the chain accepts the text,
    /// the first parser owning the key reports its own mismatch message, so
    /// bad input never turns into a `NoHandler` error.
    pub fn parse(
        &self,
        text: &str,
        lookup_key: &str,
        culture_id: &str,
    ) -> Result<DataTypeResolution<Value>> {
        self.guard.check()?;
        let lookup_key = lookup_key.trim();
        if lookup_key.is_empty() {
            return Err(DataTypeError::coding("a lookup key is required to parse"));
        }
        let services = self.host.services()?;
        let fallbacks = services.lookup_key_fallbacks();

        let found = match resolve_lookup_key(lookup_key, fallbacks, |key| {
            self.find(key, culture_id, text)
        })? {
            Some(found) => Some(found),
            None => resolve_lookup_key(lookup_key, fallbacks, |key| {
                self.find(key, culture_id, "")
            })?,
        };
        let Some((parser, key)) = found else {
            return Err(DataTypeError::NoHandler {
                service: SERVICE,
                lookup_key: lookup_key.to_string(),
                culture_id: culture_id.to_string(),
            });
        };
        trace!(lookup_key = %key, culture_id, "parser selected");
        downgrade(SERVICE, &key, parser.parse(text, &key, culture_id))
    }

    pub(crate) fn dispose(&self) {
        self.guard.dispose();
        self.handlers.clear();
        self.lazy_load.clear();
    }
}
