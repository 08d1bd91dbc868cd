//! Shared data model for Data Type Kit.
//!
//! Holds the types every other crate speaks in: runtime [`Value`]s, the
//! [`DataTypeResolution`] envelope, culture fallback entries and the
//! [`DataTypeError`] kinds.

pub mod culture;
pub mod error;
pub mod lookup;
pub mod options;
pub mod resolution;
pub mod value;

pub use culture::{CultureIdFallback, culture_language_code};
pub use error::{DataTypeError, Result};
pub use lookup::{CaseInsensitiveMap, lookup_keys};
pub use options::{CaseConversion, DateOrder, TrimMode};
pub use resolution::{ComparisonResult, DataTypeResolution};
pub use value::{Value, ValueKind};
