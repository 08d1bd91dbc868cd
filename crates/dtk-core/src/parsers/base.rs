//! Base stage: lookup key ownership, trimming and the empty-text short circuit.

use dtk_model::{DataTypeError, DataTypeResolution, Result, TrimMode, Value};

/// Per-instance options of the base stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// Returned whenever the trimmed input is empty.
    pub empty_string_result: Value,
    pub trim: TrimMode,
}

impl ParseOptions {
    pub fn new(empty_string_result: Value) -> Self {
        Self {
            empty_string_result,
            trim: TrimMode::Both,
        }
    }

    #[must_use]
    pub fn with_trim(mut self, trim: TrimMode) -> Self {
        self.trim = trim;
        self
    }

    /// Empty text yields `""`.
    pub fn for_strings() -> Self {
        Self::new(Value::String(String::new()))
    }

    /// Empty text yields `0`.
    pub fn for_numbers() -> Self {
        Self::new(Value::Number(0.0))
    }

    /// Empty text yields `false`.
    pub fn for_booleans() -> Self {
        Self::new(Value::Boolean(false))
    }

    /// Empty text yields null.
    pub fn for_dates() -> Self {
        Self::new(Value::Null)
    }
}

/// The stage every parser starts with.
#[derive(Debug, Clone)]
pub struct ParserBase {
    lookup_key: String,
    options: ParseOptions,
}

impl ParserBase {
    pub fn new(lookup_key: &str, options: ParseOptions) -> Result<Self> {
        let lookup_key = lookup_key.trim();
        if lookup_key.is_empty() {
            return Err(DataTypeError::coding("parser lookup key must not be empty"));
        }
        Ok(Self {
            lookup_key: lookup_key.to_string(),
            options,
        })
    }

    pub fn lookup_key(&self) -> &str {
        &self.lookup_key
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    #[must_use]
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Exact, case-sensitive match.
    pub fn supports_key(&self, lookup_key: &str) -> bool {
        self.lookup_key == lookup_key
    }

    /// Applies the trim option; `None` means nothing is left to parse.
    pub fn trimmed<'a>(&self, text: &'a str) -> Option<&'a str> {
        let trimmed = self.options.trim.apply(text);
        (!trimmed.is_empty()).then_some(trimmed)
    }

    pub fn empty_result(&self) -> DataTypeResolution<Value> {
        DataTypeResolution::Value(self.options.empty_string_result.clone())
    }
}
