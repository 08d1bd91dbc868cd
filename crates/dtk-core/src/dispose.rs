//! Use-after-dispose tracking shared by registries and services.

use std::sync::atomic::{AtomicBool, Ordering};

use dtk_model::{DataTypeError, Result};

#[derive(Debug)]
pub(crate) struct DisposeGuard {
    component: &'static str,
    disposed: AtomicBool,
}

impl DisposeGuard {
    pub(crate) fn new(component: &'static str) -> Self {
        Self {
            component,
            disposed: AtomicBool::new(false),
        }
    }

    pub(crate) fn dispose(&self) {
        self.disposed.store(true, Ordering::Release);
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Fails with [`DataTypeError::Disposed`] once `dispose` has run.
    pub(crate) fn check(&self) -> Result<()> {
        if self.is_disposed() {
            return Err(DataTypeError::Disposed {
                component: self.component,
            });
        }
        Ok(())
    }
}
