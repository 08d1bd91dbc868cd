use std::sync::Arc;

use dtk_model::{DataTypeError, DataTypeResolution, Result, Value};
use tracing::trace;

use super::ServicesHandle;
use super::handlers::{HandlerList, LazyLoad, LazyLoader, find_with_lazy_load};
use super::resolution::{downgrade, resolve_culture, resolve_lookup_key};
use crate::dispose::DisposeGuard;

const SERVICE: &str = "DataTypeFormatter";

/// Turns a native value into display text for one lookup key and culture.
pub trait DataTypeFormatter: Send + Sync {
    fn supports(&self, lookup_key: &str, culture_id: &str) -> bool;

    /// `lookup_key` and `culture_id` are the ones resolution settled on,
    /// which may be fallbacks of the requested ones.
    fn format(
        &self,
        value: &Value,
        lookup_key: &str,
        culture_id: &str,
    ) -> Result<DataTypeResolution<String>>;

    /// Receives the owning container on registration.
    fn attach(&self, _services: &ServicesHandle) {}
}

/// Formatter registry. Registration accumulates; earlier handlers shadow later ones.
pub struct FormatterService {
    handlers: HandlerList<dyn DataTypeFormatter>,
    lazy_load: LazyLoader<FormatterService>,
    host: ServicesHandle,
    guard: DisposeGuard,
}

impl FormatterService {
    pub(crate) fn new(host: ServicesHandle) -> Self {
        Self {
            handlers: HandlerList::default(),
            lazy_load: LazyLoader::default(),
            host,
            guard: DisposeGuard::new("FormatterService"),
        }
    }

    pub fn register(&self, formatter: Arc<dyn DataTypeFormatter>) -> Result<()> {
        self.guard.check()?;
        formatter.attach(&self.host);
        self.handlers.push(formatter);
        Ok(())
    }

    /// Removes the first formatter supporting `lookup_key` and `culture_id`.
    pub fn unregister(&self, lookup_key: &str, culture_id: &str) -> Result<bool> {
        self.guard.check()?;
        Ok(self
            .handlers
            .remove_first(|formatter| formatter.supports(lookup_key, culture_id)))
    }

    /// Installs a one-shot callback that runs on the first lookup miss.
    pub fn set_lazy_load(&self, load: LazyLoad<FormatterService>) -> Result<()> {
        self.guard.check()?;
        self.lazy_load.set(load)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First registered formatter supporting the exact key and culture.
    pub fn find(
        &self,
        lookup_key: &str,
        culture_id: &str,
    ) -> Result<Option<Arc<dyn DataTypeFormatter>>> {
        self.guard.check()?;
        Ok(find_with_lazy_load(self, &self.lazy_load, |service| {
            service
                .handlers
                .first(|formatter| formatter.supports(lookup_key, culture_id))
        }))
    }

    /// Formats `value` in the active culture.
    ///
    /// Without a `lookup_key` the identifier service infers one from the
    /// value; a value no identifier recognises is a `Coding` error.
    pub fn format(
        &self,
        value: &Value,
        lookup_key: Option<&str>,
    ) -> Result<DataTypeResolution<String>> {
        self.guard.check()?;
        let services = self.host.services()?;
        let culture_id = services.cultures().active_culture_id()?;
        self.format_for_culture(value, lookup_key, &culture_id)
    }

    /// Formats `value` starting the culture walk at `culture_id`.
    pub fn format_for_culture(
        &self,
        value: &Value,
        lookup_key: Option<&str>,
        culture_id: &str,
    ) -> Result<DataTypeResolution<String>> {
        self.guard.check()?;
        let services = self.host.services()?;
        let lookup_key = match lookup_key.map(str::trim).filter(|key| !key.is_empty()) {
            Some(key) => key.to_string(),
            None => services.identifiers().identify(value)?.ok_or_else(|| {
                DataTypeError::coding(format!(
                    "no lookup key supplied and no DataTypeIdentifier recognises {value:?}"
                ))
            })?,
        };

        let found = resolve_lookup_key(&lookup_key, services.lookup_key_fallbacks(), |key| {
            resolve_culture(culture_id, services.cultures(), |culture| {
                self.find(key, culture)
            })
        })?;
        let Some(((formatter, culture), key)) = found else {
            return Err(DataTypeError::NoHandler {
                service: SERVICE,
                lookup_key,
                culture_id: culture_id.to_string(),
            });
        };
        trace!(lookup_key = %key, culture_id = %culture, "formatter selected");
        downgrade(SERVICE, &key, formatter.format(value, &key, &culture))
    }

    pub(crate) fn dispose(&self) {
        self.guard.dispose();
        self.handlers.clear();
        self.lazy_load.clear();
    }
}
