use dtk_model::{DataTypeResolution, Result, Value, lookup_keys};

use super::base::{ParseOptions, ParserBase};
use super::cleanup::TextCleanup;
use crate::services::DataTypeParser;

/// Culture-agnostic parser that returns the trimmed, cleaned text.
#[derive(Debug, Clone)]
pub struct CleanUpStringParser {
    base: ParserBase,
    cleanup: TextCleanup,
}

impl CleanUpStringParser {
    pub fn new(lookup_key: &str, cleanup: TextCleanup) -> Result<Self> {
        Ok(Self {
            base: ParserBase::new(lookup_key, ParseOptions::for_strings())?,
            cleanup,
        })
    }

    /// Parser for the `String` lookup key without any cleanup.
    pub fn string() -> Result<Self> {
        Self::new(lookup_keys::STRING, TextCleanup::default())
    }

    #[must_use]
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.base = self.base.with_options(options);
        self
    }

    pub fn cleanup(&self) -> &TextCleanup {
        &self.cleanup
    }
}

impl DataTypeParser for CleanUpStringParser {
    fn supports(&self, lookup_key: &str, _culture_id: &str, _text: &str) -> bool {
        self.base.supports_key(lookup_key)
    }

    fn parse(
        &self,
        text: &str,
        _lookup_key: &str,
        _culture_id: &str,
    ) -> Result<DataTypeResolution<Value>> {
        let Some(trimmed) = self.base.trimmed(text) else {
            return Ok(self.base.empty_result());
        };
        let cleaned = self.cleanup.apply(trimmed);
        if cleaned.is_empty() {
            return Ok(self.base.empty_result());
        }
        Ok(DataTypeResolution::Value(Value::String(cleaned)))
    }
}
