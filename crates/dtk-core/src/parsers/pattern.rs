//! Strong-pattern and culture-restricted stages, composed into [`PatternParser`].

use dtk_model::{DataTypeError, DataTypeResolution, Result, Value};
use regex::{Captures, Regex};

use super::base::{ParseOptions, ParserBase};
use super::cleanup::TextCleanup;
use crate::services::DataTypeParser;

/// Type-specific part of a pattern parser.
///
/// The framework trims, cleans and checks for empty text; the rules
/// supply the regex, an optional canonicalisation step and the final
/// interpretation of the captures.
pub trait PatternRules: Send + Sync {
    /// Regex source. Compiled once when the parser is built.
    fn pattern(&self) -> String;

    /// Rejects text that cannot possibly match and canonicalises the rest.
    /// The regex runs on the returned text.
    fn prepare(&self, text: &str) -> Option<String> {
        Some(text.to_string())
    }

    fn interpret(&self, captures: &Captures<'_>) -> DataTypeResolution<Value>;

    /// Error message for text the pattern rejects.
    fn mismatch_message(&self) -> String;
}

/// Fixed list of cultures a parser or formatter serves.
///
/// Membership is exact. Culture fallback belongs to the owning service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CultureGate {
    culture_ids: Vec<String>,
}

impl CultureGate {
    pub fn new<I, S>(culture_ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let culture_ids: Vec<String> = culture_ids
            .into_iter()
            .map(|id| id.as_ref().trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        if culture_ids.is_empty() {
            return Err(DataTypeError::coding("at least one culture id is required"));
        }
        Ok(Self { culture_ids })
    }

    pub fn allows(&self, culture_id: &str) -> bool {
        self.culture_ids.iter().any(|id| id == culture_id)
    }

    pub fn culture_ids(&self) -> &[String] {
        &self.culture_ids
    }
}

/// Parser built from the base stage, an optional cleanup stage, an optional
/// culture gate and a set of [`PatternRules`].
pub struct PatternParser<R> {
    base: ParserBase,
    cleanup: TextCleanup,
    cultures: Option<CultureGate>,
    regex: Regex,
    rules: R,
}

impl<R: PatternRules> PatternParser<R> {
    pub fn new(lookup_key: &str, options: ParseOptions, rules: R) -> Result<Self> {
        let source = rules.pattern();
        let regex = Regex::new(&source).map_err(|err| {
            DataTypeError::coding(format!("invalid parser pattern {source:?}: {err}"))
        })?;
        Ok(Self {
            base: ParserBase::new(lookup_key, options)?,
            cleanup: TextCleanup::default(),
            cultures: None,
            regex,
            rules,
        })
    }

    #[must_use]
    pub fn with_cleanup(mut self, cleanup: TextCleanup) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Restricts the parser to the given cultures.
    pub fn for_cultures<I, S>(mut self, culture_ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.cultures = Some(CultureGate::new(culture_ids)?);
        Ok(self)
    }

    pub fn lookup_key(&self) -> &str {
        self.base.lookup_key()
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn culture_gate(&self) -> Option<&CultureGate> {
        self.cultures.as_ref()
    }

    /// Trimmed and cleaned text, or `None` when nothing is left.
    fn cleaned(&self, text: &str) -> Option<String> {
        let trimmed = self.base.trimmed(text)?;
        let cleaned = self.cleanup.apply(trimmed);
        (!cleaned.is_empty()).then_some(cleaned)
    }

    fn matches(&self, cleaned: &str) -> bool {
        self.rules
            .prepare(cleaned)
            .is_some_and(|canonical| self.regex.is_match(&canonical))
    }
}

impl<R: PatternRules> DataTypeParser for PatternParser<R> {
    fn supports(&self, lookup_key: &str, culture_id: &str, text: &str) -> bool {
        if !self.base.supports_key(lookup_key) {
            return false;
        }
        if let Some(gate) = &self.cultures {
            if !gate.allows(culture_id) {
                return false;
            }
        }
        match self.cleaned(text) {
            None => true,
            Some(cleaned) => self.matches(&cleaned),
        }
    }

    fn parse(
        &self,
        text: &str,
        _lookup_key: &str,
        _culture_id: &str,
    ) -> Result<DataTypeResolution<Value>> {
        let Some(cleaned) = self.cleaned(text) else {
            return Ok(self.base.empty_result());
        };
        let Some(canonical) = self.rules.prepare(&cleaned) else {
            return Ok(DataTypeResolution::Error(self.rules.mismatch_message()));
        };
        Ok(match self.regex.captures(&canonical) {
            Some(captures) => self.rules.interpret(&captures),
            None => DataTypeResolution::Error(self.rules.mismatch_message()),
        })
    }
}

/// Rules for a caller-supplied pattern that yields the matched text.
#[derive(Debug, Clone)]
pub struct TextPatternRules {
    pattern: String,
    mismatch_message: String,
}

impl TextPatternRules {
    pub fn new(pattern: impl Into<String>, mismatch_message: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            mismatch_message: mismatch_message.into(),
        }
    }
}

impl PatternRules for TextPatternRules {
    fn pattern(&self) -> String {
        self.pattern.clone()
    }

    fn interpret(&self, captures: &Captures<'_>) -> DataTypeResolution<Value> {
        DataTypeResolution::Value(Value::String(captures[0].to_string()))
    }

    fn mismatch_message(&self) -> String {
        self.mismatch_message.clone()
    }
}

pub type TextPatternParser = PatternParser<TextPatternRules>;
