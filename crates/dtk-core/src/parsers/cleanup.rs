//! Text cleanup stage: strip, compress, replace, then convert case.

use std::sync::LazyLock;

use dtk_model::{CaseConversion, DataTypeError, Result};
use regex::Regex;

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("Invalid whitespace-run regex"));

/// Character and case normalisation applied after trimming.
///
/// The steps always run in the same order: strip characters, compress
/// whitespace runs to one space, replace each whitespace character, and
/// finally convert case.
#[derive(Debug, Clone, Default)]
pub struct TextCleanup {
    strip_characters: Option<Regex>,
    compress_whitespace: bool,
    replace_whitespace: Option<String>,
    convert_case: Option<CaseConversion>,
}

impl TextCleanup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every occurrence of each character in `characters`.
    pub fn strip_characters(mut self, characters: &str) -> Result<Self> {
        if characters.is_empty() {
            self.strip_characters = None;
            return Ok(self);
        }
        let class: String = characters
            .chars()
            .map(|c| regex::escape(c.encode_utf8(&mut [0; 4])))
            .collect();
        let regex = Regex::new(&format!("[{class}]"))
            .map_err(|err| DataTypeError::coding(format!("invalid strip characters: {err}")))?;
        self.strip_characters = Some(regex);
        Ok(self)
    }

    #[must_use]
    pub fn compress_whitespace(mut self, compress: bool) -> Self {
        self.compress_whitespace = compress;
        self
    }

    #[must_use]
    pub fn replace_whitespace(mut self, replacement: impl Into<String>) -> Self {
        self.replace_whitespace = Some(replacement.into());
        self
    }

    #[must_use]
    pub fn convert_case(mut self, conversion: CaseConversion) -> Self {
        self.convert_case = Some(conversion);
        self
    }

    pub fn is_noop(&self) -> bool {
        self.strip_characters.is_none()
            && !self.compress_whitespace
            && self.replace_whitespace.is_none()
            && self.convert_case.is_none()
    }

    pub fn apply(&self, text: &str) -> String {
        let mut text = match &self.strip_characters {
            Some(regex) => regex.replace_all(text, "").into_owned(),
            None => text.to_string(),
        };
        if self.compress_whitespace {
            text = WHITESPACE_RUNS.replace_all(&text, " ").into_owned();
        }
        if let Some(replacement) = &self.replace_whitespace {
            text = text
                .chars()
                .map(|c| {
                    if c.is_whitespace() {
                        replacement.clone()
                    } else {
                        c.to_string()
                    }
                })
                .collect();
        }
        if let Some(conversion) = self.convert_case {
            text = conversion.apply(&text);
        }
        text
    }
}
