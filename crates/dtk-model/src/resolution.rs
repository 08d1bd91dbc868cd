//! Success-or-message envelope returned by every resolution operation.

use serde::{Deserialize, Serialize};

/// Either a resolved value or a display-ready error message, never both.
///
/// Expected failures (pattern mismatch, invalid date, unknown boolean word)
/// are reported here so callers can collect many of them without
/// unwinding. Setup mistakes use [`DataTypeError`](crate::DataTypeError) instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataTypeResolution<T> {
    #[serde(rename = "value")]
    Value(T),
    #[serde(rename = "errorMessage")]
    Error(String),
}

impl<T> DataTypeResolution<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Value(_) => None,
            Self::Error(message) => Some(message.as_str()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> DataTypeResolution<U> {
        match self {
            Self::Value(value) => DataTypeResolution::Value(f(value)),
            Self::Error(message) => DataTypeResolution::Error(message),
        }
    }

    /// Chains another resolution step onto a successful value.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> DataTypeResolution<U>) -> DataTypeResolution<U> {
        match self {
            Self::Value(value) => f(value),
            Self::Error(message) => DataTypeResolution::Error(message),
        }
    }
}

impl<T> From<std::result::Result<T, String>> for DataTypeResolution<T> {
    fn from(result: std::result::Result<T, String>) -> Self {
        match result {
            Ok(value) => Self::Value(value),
            Err(message) => Self::Error(message),
        }
    }
}

/// Outcome of comparing two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonResult {
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    /// The values cannot be ordered against each other.
    Undetermined,
}

impl From<std::cmp::Ordering> for ComparisonResult {
    fn from(ordering: std::cmp::Ordering) -> Self {
        match ordering {
            std::cmp::Ordering::Less => Self::LessThan,
            std::cmp::Ordering::Equal => Self::Equal,
            std::cmp::Ordering::Greater => Self::GreaterThan,
        }
    }
}
