//! Error types shared by every Data Type Kit crate.
//!
//! Two channels exist. Bad user input travels inside
//! [`DataTypeResolution::Error`](crate::DataTypeResolution) and is never an
//! `Err`. Everything here is the second channel: setup or wiring mistakes that
//! the embedding application has to fix.

use thiserror::Error;

/// Errors raised by registries, services and handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DataTypeError {
    /// Configuration mistake in the embedding application.
    #[error("coding error: {0}")]
    Coding(String),

    /// A lookup key or culture fallback chain loops back on itself.
    #[error("cyclic fallback detected at \"{key}\"")]
    CyclicFallback {
        /// The key that was visited twice.
        key: String,
    },

    /// No handler is registered for the key anywhere in its fallback chain.
    #[error("no {service} registered for lookup key \"{lookup_key}\" with culture \"{culture_id}\"")]
    NoHandler {
        /// Handler kind, for example `DataTypeParser`.
        service: &'static str,
        /// The lookup key originally requested.
        lookup_key: String,
        /// The culture originally requested (empty for culture-free services).
        culture_id: String,
    },

    /// A handler needed its owning services before they were attached.
    #[error("{handler} is not attached to a services container")]
    NotAttached {
        /// Name of the handler.
        handler: String,
    },

    /// The component was used after `dispose()`.
    #[error("{component} used after dispose")]
    Disposed {
        /// Name of the disposed component.
        component: &'static str,
    },

    /// Ordinary failure raised inside a handler operation.
    #[error("{0}")]
    Handler(String),

    /// The engine configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl DataTypeError {
    /// Shorthand for [`DataTypeError::Coding`].
    pub fn coding(message: impl Into<String>) -> Self {
        Self::Coding(message.into())
    }

    /// Shorthand for [`DataTypeError::Handler`].
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler(message.into())
    }

    /// Returns whether the error must propagate instead of being folded
    /// into a `DataTypeResolution::Error`.
    #[must_use]
    pub fn is_severe(&self) -> bool {
        !matches!(self, Self::Handler(_))
    }
}

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, DataTypeError>;
