//! Ordered handler storage and one-shot lazy loaders shared by all services.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use dtk_model::{DataTypeError, Result};
use tracing::debug;

/// Callback that populates a service the first time a lookup misses.
pub type LazyLoad<S> = Box<dyn FnOnce(&S) + Send + Sync>;

/// Registration-ordered list of handlers. Order is match priority.
pub(crate) struct HandlerList<H: ?Sized> {
    items: RwLock<Vec<Arc<H>>>,
}

impl<H: ?Sized> Default for HandlerList<H> {
    fn default() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }
}

impl<H: ?Sized> HandlerList<H> {
    pub(crate) fn push(&self, handler: Arc<H>) {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handler);
    }

    /// Replaces the first handler for which `same` holds, or appends.
    pub(crate) fn replace_or_push(&self, handler: Arc<H>, same: impl Fn(&H) -> bool) {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        match items.iter_mut().find(|existing| same(existing)) {
            Some(existing) => *existing = handler,
            None => items.push(handler),
        }
    }

    pub(crate) fn first(&self, matches: impl Fn(&H) -> bool) -> Option<Arc<H>> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|handler| matches(handler))
            .cloned()
    }

    pub(crate) fn remove_first(&self, matches: impl Fn(&H) -> bool) -> bool {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        match items.iter().position(|handler| matches(handler)) {
            Some(index) => {
                items.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.items.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub(crate) fn clear(&self) {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Holds at most one pending [`LazyLoad`] for a service.
pub(crate) struct LazyLoader<S> {
    slot: Mutex<Option<LazyLoad<S>>>,
}

impl<S> Default for LazyLoader<S> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<S> LazyLoader<S> {
    pub(crate) fn set(&self, load: LazyLoad<S>) -> Result<()> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return Err(DataTypeError::coding(
                "a lazy loader is already pending for this service",
            ));
        }
        *slot = Some(load);
        Ok(())
    }

    fn take(&self) -> Option<LazyLoad<S>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    pub(crate) fn clear(&self) {
        drop(self.take());
    }
}

/// Runs `scan`; on a miss consumes the pending loader, if any, and scans once more.
pub(crate) fn find_with_lazy_load<S, T>(
    service: &S,
    loader: &LazyLoader<S>,
    scan: impl Fn(&S) -> Option<T>,
) -> Option<T> {
    if let Some(found) = scan(service) {
        return Some(found);
    }
    let load = loader.take()?;
    debug!("running lazy loader after lookup miss");
    load(service);
    scan(service)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct Host {
        list: HandlerList<str>,
    }

    #[test]
    fn list_keeps_registration_order() {
        let list: HandlerList<str> = HandlerList::default();
        list.push(Arc::from("alpha"));
        list.push(Arc::from("beta"));
        list.push(Arc::from("alphabet"));
        assert_eq!(
            list.first(|h| h.starts_with("alpha")).as_deref(),
            Some("alpha")
        );
        assert!(list.remove_first(|h| h.starts_with("alpha")));
        assert_eq!(
            list.first(|h| h.starts_with("alpha")).as_deref(),
            Some("alphabet")
        );
        assert!(!list.remove_first(|h| h == "gamma"));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn replace_or_push_replaces_match() {
        let list: HandlerList<str> = HandlerList::default();
        list.push(Arc::from("a1"));
        list.replace_or_push(Arc::from("a2"), |h| h.starts_with('a'));
        list.replace_or_push(Arc::from("b1"), |h| h.starts_with('b'));
        assert_eq!(list.len(), 2);
        assert_eq!(list.first(|h| h.starts_with('a')).as_deref(), Some("a2"));
    }

    #[test]
    fn lazy_loader_runs_once() {
        let host = Host {
            list: HandlerList::default(),
        };
        let loader: LazyLoader<Host> = LazyLoader::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        loader
            .set(Box::new(move |host: &Host| {
                counter.fetch_add(1, Ordering::SeqCst);
                host.list.push(Arc::from("loaded"));
            }))
            .unwrap();

        let scan = |p: &Host| p.list.first(|h| h == "missing");
        assert!(find_with_lazy_load(&host, &loader, scan).is_none());
        assert!(find_with_lazy_load(&host, &loader, scan).is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let scan = |p: &Host| p.list.first(|h| h == "loaded");
        assert!(find_with_lazy_load(&host, &loader, scan).is_some());
    }

    #[test]
    fn second_pending_loader_is_rejected() {
        let loader: LazyLoader<Host> = LazyLoader::default();
        loader.set(Box::new(|_: &Host| {})).unwrap();
        assert!(loader.set(Box::new(|_: &Host| {})).is_err());
    }
}
