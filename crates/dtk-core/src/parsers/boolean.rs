use dtk_model::{DataTypeError, DataTypeResolution, Result, Value};

use super::base::{ParseOptions, ParserBase};
use super::cleanup::TextCleanup;
use super::pattern::CultureGate;
use crate::services::DataTypeParser;

const BAD_TEXT_MESSAGE: &str = "Invalid value";

/// Parses words such as `yes`/`no` into booleans. Matching ignores case.
#[derive(Debug, Clone)]
pub struct BooleanParser {
    base: ParserBase,
    cleanup: TextCleanup,
    cultures: Option<CultureGate>,
    true_values: Vec<String>,
    false_values: Vec<String>,
}

fn normalize<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|value| value.as_ref().trim().to_lowercase())
        .collect()
}

impl BooleanParser {
    /// Both lists must be non-empty and must not share a word.
    pub fn new<T, F, S>(lookup_key: &str, true_values: T, false_values: F) -> Result<Self>
    where
        T: IntoIterator<Item = S>,
        F: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let true_values = normalize(true_values);
        let false_values = normalize(false_values);
        if true_values.is_empty() || false_values.is_empty() {
            return Err(DataTypeError::coding(
                "boolean parser requires true values and false values",
            ));
        }
        if let Some(shared) = true_values.iter().find(|value| false_values.contains(value)) {
            return Err(DataTypeError::coding(format!(
                "\"{shared}\" is listed as both a true and a false value"
            )));
        }
        Ok(Self {
            base: ParserBase::new(lookup_key, ParseOptions::for_booleans())?,
            cleanup: TextCleanup::default(),
            cultures: None,
            true_values,
            false_values,
        })
    }

    #[must_use]
    pub fn with_cleanup(mut self, cleanup: TextCleanup) -> Self {
        self.cleanup = cleanup;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.base = self.base.with_options(options);
        self
    }

    pub fn for_cultures<I, S>(mut self, culture_ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.cultures = Some(CultureGate::new(culture_ids)?);
        Ok(self)
    }

    pub fn true_values(&self) -> &[String] {
        &self.true_values
    }

    pub fn false_values(&self) -> &[String] {
        &self.false_values
    }

    fn word(&self, text: &str) -> Option<bool> {
        let word = self.cleanup.apply(text).to_lowercase();
        if self.true_values.contains(&word) {
            Some(true)
        } else if self.false_values.contains(&word) {
            Some(false)
        } else {
            None
        }
    }
}

impl DataTypeParser for BooleanParser {
    fn supports(&self, lookup_key: &str, culture_id: &str, text: &str) -> bool {
        if !self.base.supports_key(lookup_key) {
            return false;
        }
        if self
            .cultures
            .as_ref()
            .is_some_and(|gate| !gate.allows(culture_id))
        {
            return false;
        }
        match self.base.trimmed(text) {
            None => true,
            Some(trimmed) => self.word(trimmed).is_some(),
        }
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
        Ok(match self.word(trimmed) {
            Some(flag) => DataTypeResolution::Value(Value::Boolean(flag)),
            None => DataTypeResolution::error(BAD_TEXT_MESSAGE),
        })
    }
}
