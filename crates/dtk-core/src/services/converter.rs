use std::sync::Arc;

use dtk_model::{DataTypeError, DataTypeResolution, Result, Value};
use tracing::trace;

use super::ServicesHandle;
use super::handlers::{HandlerList, LazyLoad, LazyLoader, find_with_lazy_load};
use super::resolution::{downgrade, resolve_lookup_key};
use crate::dispose::DisposeGuard;

const SERVICE: &str = "DataTypeConverter";

/// Upper bound on chained conversions in [`ConverterService::convert_until_simple`].
const MAX_CONVERSIONS: usize = 8;

/// Converts a value into another value, usually one that compares more easily.
pub trait DataTypeConverter: Send + Sync {
    fn supports(&self, value: &Value, lookup_key: &str) -> bool;

    fn convert(&self, value: &Value, lookup_key: &str) -> Result<DataTypeResolution<Value>>;

    fn attach(&self, _services: &ServicesHandle) {}
}

/// Converter registry. Registration accumulates; earlier handlers shadow later ones.
pub struct ConverterService {
    handlers: HandlerList<dyn DataTypeConverter>,
    lazy_load: LazyLoader<ConverterService>,
    host: ServicesHandle,
    guard: DisposeGuard,
}

impl ConverterService {
    pub(crate) fn new(host: ServicesHandle) -> Self {
        Self {
            handlers: HandlerList::default(),
            lazy_load: LazyLoader::default(),
            host,
            guard: DisposeGuard::new("ConverterService"),
        }
    }

    pub fn register(&self, converter: Arc<dyn DataTypeConverter>) -> Result<()> {
        self.guard.check()?;
        converter.attach(&self.host);
        self.handlers.push(converter);
        Ok(())
    }

    pub fn set_lazy_load(&self, load: LazyLoad<ConverterService>) -> Result<()> {
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
        value: &Value,
        lookup_key: &str,
    ) -> Result<Option<Arc<dyn DataTypeConverter>>> {
        self.guard.check()?;
        Ok(find_with_lazy_load(self, &self.lazy_load, |service| {
            service
                .handlers
                .first(|converter| converter.supports(value, lookup_key))
        }))
    }

    /// Converts `value` with the first converter found along the lookup key
    /// fallback chain. A missing converter is a `NoHandler` error.
    pub fn convert(
        &self,
        value: &Value,
        lookup_key: Option<&str>,
    ) -> Result<DataTypeResolution<Value>> {
        self.guard.check()?;
        let lookup_key = self.lookup_key_for(value, lookup_key)?;
        let Some((converter, key)) = self.resolve(value, &lookup_key)? else {
            return Err(DataTypeError::NoHandler {
                service: SERVICE,
                lookup_key,
                culture_id: String::new(),
            });
        };
        downgrade(SERVICE, &key, converter.convert(value, &key))
    }

    /// Applies converters until the value is simple (not a date) or no
    /// converter applies. A simple value without a converter is returned as is.
    pub fn convert_until_simple(
        &self,
        value: &Value,
        lookup_key: Option<&str>,
    ) -> Result<DataTypeResolution<Value>> {
        self.guard.check()?;
        let services = self.host.services()?;
        let mut current = value.clone();
        let mut lookup_key = match lookup_key.map(str::trim).filter(|key| !key.is_empty()) {
            Some(key) => Some(key.to_string()),
            None => services.identifiers().identify(value)?,
        };

        for _ in 0..MAX_CONVERSIONS {
            let Some(key) = lookup_key.as_deref() else {
                break;
            };
            let Some((converter, found_key)) = self.resolve(&current, key)? else {
                break;
            };
            trace!(lookup_key = %found_key, "converting value");
            match downgrade(SERVICE, &found_key, converter.convert(&current, &found_key))? {
                DataTypeResolution::Value(converted) => {
                    if converted.is_simple() {
                        return Ok(DataTypeResolution::Value(converted));
                    }
                    lookup_key = services.identifiers().identify(&converted)?;
                    current = converted;
                }
                failed @ DataTypeResolution::Error(_) => return Ok(failed),
            }
        }

        if current.is_simple() {
            Ok(DataTypeResolution::Value(current))
        } else {
            Ok(DataTypeResolution::error(format!(
                "No converter turns {} into a comparable value",
                lookup_key.as_deref().unwrap_or("this value")
            )))
        }
    }

    fn resolve(
        &self,
        value: &Value,
        lookup_key: &str,
    ) -> Result<Option<(Arc<dyn DataTypeConverter>, String)>> {
        let services = self.host.services()?;
        resolve_lookup_key(lookup_key, services.lookup_key_fallbacks(), |key| {
            self.find(value, key)
        })
    }

    fn lookup_key_for(&self, value: &Value, lookup_key: Option<&str>) -> Result<String> {
        if let Some(key) = lookup_key.map(str::trim).filter(|key| !key.is_empty()) {
            return Ok(key.to_string());
        }
        let services = self.host.services()?;
        services.identifiers().identify(value)?.ok_or_else(|| {
            DataTypeError::coding(format!(
                "no lookup key supplied and no DataTypeIdentifier recognises {value:?}"
            ))
        })
    }

    pub(crate) fn dispose(&self) {
        self.guard.dispose();
        self.handlers.clear();
        self.lazy_load.clear();
    }
}
