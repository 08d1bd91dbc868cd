//! Data type resolution services and the container that owns them.
//!
//! # Architecture
//!
//! Every service keeps an ordered list of handlers. The first handler whose
//! `supports` predicate accepts the request wins. When nothing matches, the
//! formatter walks the culture fallback chain, and every service walks the
//! lookup key fallback chain, before giving up with
//! [`DataTypeError::NoHandler`].
//!
//! Handlers that need sibling services receive a [`ServicesHandle`] through
//! `attach` when they are registered. The handle is weak, so a handler never
//! keeps the container alive.

mod comparer;
mod converter;
mod formatter;
mod handlers;
mod identifier;
mod parser;
pub(crate) mod resolution;

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use dtk_model::{DataTypeError, Result};
use tracing::debug;

use crate::cultures::CultureRegistry;
use crate::lookup_key_fallback::LookupKeyFallbackRegistry;

pub use comparer::{ComparerService, DataTypeComparer, default_compare};
pub use converter::{ConverterService, DataTypeConverter};
pub use formatter::{DataTypeFormatter, FormatterService};
pub use handlers::LazyLoad;
pub use identifier::{DataTypeIdentifier, IdentifierService};
pub use parser::{DataTypeParser, ParserService};

/// Weak reference to the owning [`DataTypeServices`].
#[derive(Debug, Clone, Default)]
pub struct ServicesHandle(Weak<DataTypeServices>);

impl ServicesHandle {
    /// A handle that is not connected to any container.
    pub fn detached() -> Self {
        Self::default()
    }

    pub(crate) fn services(&self) -> Result<Arc<DataTypeServices>> {
        self.0.upgrade().ok_or_else(|| DataTypeError::NotAttached {
            handler: "service".to_string(),
        })
    }
}

/// Late-bound back-reference held by handlers that reach sibling services.
///
/// Construct the handler, register it (which calls `attach`), then use it.
/// Using it before attachment fails with [`DataTypeError::NotAttached`].
#[derive(Debug, Default)]
pub struct ServicesSlot {
    handle: OnceLock<ServicesHandle>,
}

impl ServicesSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the back-reference. Later calls are ignored.
    pub fn attach(&self, services: &ServicesHandle) {
        if self.handle.set(services.clone()).is_err() {
            debug!("handler already attached, keeping the first container");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.handle.get().is_some()
    }

    pub fn services(&self, handler: &str) -> Result<Arc<DataTypeServices>> {
        self.handle
            .get()
            .and_then(|handle| handle.0.upgrade())
            .ok_or_else(|| DataTypeError::NotAttached {
                handler: handler.to_string(),
            })
    }
}

/// Owns the registries and the five resolution services.
pub struct DataTypeServices {
    cultures: CultureRegistry,
    lookup_key_fallbacks: LookupKeyFallbackRegistry,
    identifiers: IdentifierService,
    formatters: FormatterService,
    parsers: ParserService,
    converters: ConverterService,
    comparers: ComparerService,
}

impl fmt::Debug for DataTypeServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTypeServices")
            .field("formatters", &self.formatters.len())
            .field("parsers", &self.parsers.len())
            .field("converters", &self.converters.len())
            .field("identifiers", &self.identifiers.len())
            .field("comparers", &self.comparers.len())
            .finish_non_exhaustive()
    }
}

impl DataTypeServices {
    /// Creates an empty container: no cultures, no handlers.
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|weak| {
            let handle = ServicesHandle(weak.clone());
            Self {
                cultures: CultureRegistry::new(),
                lookup_key_fallbacks: LookupKeyFallbackRegistry::new(),
                identifiers: IdentifierService::new(),
                formatters: FormatterService::new(handle.clone()),
                parsers: ParserService::new(handle.clone()),
                converters: ConverterService::new(handle.clone()),
                comparers: ComparerService::new(handle),
            }
        })
    }

    pub fn handle(self: &Arc<Self>) -> ServicesHandle {
        ServicesHandle(Arc::downgrade(self))
    }

    pub fn cultures(&self) -> &CultureRegistry {
        &self.cultures
    }

    pub fn lookup_key_fallbacks(&self) -> &LookupKeyFallbackRegistry {
        &self.lookup_key_fallbacks
    }

    pub fn identifiers(&self) -> &IdentifierService {
        &self.identifiers
    }

    pub fn formatters(&self) -> &FormatterService {
        &self.formatters
    }

    pub fn parsers(&self) -> &ParserService {
        &self.parsers
    }

    pub fn converters(&self) -> &ConverterService {
        &self.converters
    }

    pub fn comparers(&self) -> &ComparerService {
        &self.comparers
    }

    /// Disposes every registry and service. All later calls fail with
    /// [`DataTypeError::Disposed`].
    pub fn dispose(&self) {
        self.comparers.dispose();
        self.converters.dispose();
        self.parsers.dispose();
        self.formatters.dispose();
        self.identifiers.dispose();
        self.lookup_key_fallbacks.dispose();
        self.cultures.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_slot_reports_not_attached() {
        let slot = ServicesSlot::new();
        let err = slot.services("PercentageFormatter").unwrap_err();
        assert_eq!(
            err,
            DataTypeError::NotAttached {
                handler: "PercentageFormatter".to_string()
            }
        );
    }

    #[test]
    fn debug_lists_handler_counts() {
        let services = DataTypeServices::new();
        let slot = ServicesSlot::new();
        slot.attach(&services.handle());
        let attached = slot.services("NumberFormatter").unwrap();
        assert_eq!(
            format!("{attached:?}"),
            "DataTypeServices { formatters: 0, parsers: 0, converters: 0, \
             identifiers: 0, comparers: 0, .. }"
        );
    }

    #[test]
    fn slot_keeps_first_attachment() {
        let services = DataTypeServices::new();
        let slot = ServicesSlot::new();
        slot.attach(&services.handle());
        slot.attach(&ServicesHandle::detached());
        assert!(slot.is_attached());
        assert!(slot.services("NumberFormatter").is_ok());
    }

    #[test]
    fn slot_fails_after_container_drop() {
        let services = DataTypeServices::new();
        let slot = ServicesSlot::new();
        slot.attach(&services.handle());
        drop(services);
        assert!(matches!(
            slot.services("NumberFormatter"),
            Err(DataTypeError::NotAttached { .. })
        ));
    }
}
