//! Culture-specific number grammar: decimal, thousands and negative symbols,
//! currency and percent tokens, parenthesis negatives.

use dtk_model::{DataTypeError, DataTypeResolution, Result, Value};
use regex::Captures;

use super::base::ParseOptions;
use super::pattern::{PatternParser, PatternRules};

/// Symbols of one culture's number grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberSymbols {
    pub decimal_separator: String,
    pub negative_symbol: String,
    pub thousands_separator: Option<String>,
    /// `(12.5)` means `-12.5`.
    pub parentheses_negative: bool,
    /// Stripped before parsing; never interpreted.
    pub currency_symbol: Option<String>,
    /// Stripped before parsing; never interpreted.
    pub percent_symbol: Option<String>,
    /// Further literal substrings to strip.
    pub strip_these_strings: Vec<String>,
}

impl NumberSymbols {
    pub fn new(decimal_separator: impl Into<String>, negative_symbol: impl Into<String>) -> Self {
        Self {
            decimal_separator: decimal_separator.into(),
            negative_symbol: negative_symbol.into(),
            thousands_separator: None,
            parentheses_negative: false,
            currency_symbol: None,
            percent_symbol: None,
            strip_these_strings: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_thousands_separator(mut self, separator: impl Into<String>) -> Self {
        self.thousands_separator = Some(separator.into());
        self
    }

    #[must_use]
    pub fn with_parentheses_negative(mut self, enabled: bool) -> Self {
        self.parentheses_negative = enabled;
        self
    }

    #[must_use]
    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = Some(symbol.into());
        self
    }

    #[must_use]
    pub fn with_percent_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.percent_symbol = Some(symbol.into());
        self
    }

    #[must_use]
    pub fn with_strip_strings<I, S>(mut self, strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strip_these_strings = strings.into_iter().map(Into::into).collect();
        self
    }

    fn validate(&self) -> Result<()> {
        if self.decimal_separator.is_empty() {
            return Err(DataTypeError::coding("number parser requires a decimal separator"));
        }
        if self.negative_symbol.is_empty() {
            return Err(DataTypeError::coding("number parser requires a negative symbol"));
        }
        if self.thousands_separator.as_deref() == Some(self.decimal_separator.as_str()) {
            return Err(DataTypeError::coding(
                "thousands separator must differ from the decimal separator",
            ));
        }
        Ok(())
    }

    /// Longest first so overlapping tokens strip cleanly.
    fn strip_tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self
            .currency_symbol
            .iter()
            .chain(self.percent_symbol.iter())
            .chain(self.strip_these_strings.iter())
            .filter(|token| !token.is_empty())
            .cloned()
            .collect();
        tokens.sort_by_key(|token| std::cmp::Reverse(token.len()));
        tokens.dedup();
        tokens
    }
}

/// Why a piece of text cannot be a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberRejection {
    NoDigits,
    Letters,
    UnexpectedCharacter(char),
    RepeatedSymbol,
    NegativeBetweenDigits,
    UnbalancedParentheses,
}

/// Pattern rules for numbers written in one culture's grammar.
#[derive(Debug, Clone)]
pub struct NumberRules {
    symbols: NumberSymbols,
    strip_tokens: Vec<String>,
    integer_only: bool,
    mismatch_message: String,
}

impl NumberRules {
    pub fn new(symbols: NumberSymbols) -> Result<Self> {
        symbols.validate()?;
        Ok(Self {
            strip_tokens: symbols.strip_tokens(),
            symbols,
            integer_only: false,
            mismatch_message: "Invalid number".to_string(),
        })
    }

    /// Like [`NumberRules::new`] but fractions are rejected.
    pub fn integer(symbols: NumberSymbols) -> Result<Self> {
        let mut rules = Self::new(symbols)?;
        rules.integer_only = true;
        rules.mismatch_message = "Invalid whole number".to_string();
        Ok(rules)
    }

    #[must_use]
    pub fn with_mismatch_message(mut self, message: impl Into<String>) -> Self {
        self.mismatch_message = message.into();
        self
    }

    pub fn symbols(&self) -> &NumberSymbols {
        &self.symbols
    }

    fn strip(&self, text: &str) -> String {
        self.strip_tokens
            .iter()
            .fold(text.to_string(), |text, token| text.replace(token.as_str(), ""))
    }

    fn is_negative_char(&self, c: char) -> bool {
        self.symbols.negative_symbol.contains(c)
            || (self.symbols.parentheses_negative && (c == '(' || c == ')'))
    }

    fn is_allowed_char(&self, c: char) -> bool {
        let symbols = &self.symbols;
        c.is_ascii_digit()
            || c.is_whitespace()
            || symbols.decimal_separator.contains(c)
            || symbols
                .thousands_separator
                .as_deref()
                .is_some_and(|separator| separator.contains(c))
            || self.is_negative_char(c)
    }

    /// Cheap screen run before the pattern. Checks, in order: digits
    /// present, no letters, only grammar characters, single decimal and
    /// negative symbol, no negative between digits, balanced parentheses.
    pub fn rejection(&self, text: &str) -> Option<NumberRejection> {
        if !text.chars().any(|c| c.is_ascii_digit()) {
            return Some(NumberRejection::NoDigits);
        }
        let residue = self.strip(text);
        if residue.chars().any(char::is_alphabetic) {
            return Some(NumberRejection::Letters);
        }
        if let Some(c) = residue.chars().find(|c| !self.is_allowed_char(*c)) {
            return Some(NumberRejection::UnexpectedCharacter(c));
        }
        let symbols = &self.symbols;
        if residue.matches(symbols.decimal_separator.as_str()).count() > 1
            || residue.matches(symbols.negative_symbol.as_str()).count() > 1
        {
            return Some(NumberRejection::RepeatedSymbol);
        }

        let chars: Vec<char> = residue.chars().collect();
        for (index, c) in chars.iter().enumerate() {
            if self.is_negative_char(*c)
                && chars[..index].iter().any(char::is_ascii_digit)
                && chars[index + 1..].iter().any(char::is_ascii_digit)
            {
                return Some(NumberRejection::NegativeBetweenDigits);
            }
        }

        if symbols.parentheses_negative {
            let open = residue.matches('(').count();
            let close = residue.matches(')').count();
            let ordered = match (residue.find('('), residue.find(')')) {
                (Some(open_at), Some(close_at)) => open_at < close_at,
                (None, None) => true,
                _ => false,
            };
            if open != close || open > 1 || !ordered {
                return Some(NumberRejection::UnbalancedParentheses);
            }
            if open == 1 && residue.contains(symbols.negative_symbol.as_str()) {
                return Some(NumberRejection::RepeatedSymbol);
            }
        }
        None
    }

    /// Rewrites accepted text into `-?digits(.digits)?` form.
    pub fn canonicalize(&self, text: &str) -> Option<String> {
        if self.rejection(text).is_some() {
            return None;
        }
        let symbols = &self.symbols;
        let residue = self.strip(text);
        let negative = residue.contains(symbols.negative_symbol.as_str())
            || (symbols.parentheses_negative && residue.contains('('));

        let mut body = residue.replace(symbols.negative_symbol.as_str(), "");
        if symbols.parentheses_negative {
            body = body.replace(['(', ')'], "");
        }
        if let Some(separator) = symbols.thousands_separator.as_deref() {
            body = body.replace(separator, "");
        }
        body.retain(|c| !c.is_whitespace());
        let mut body = body.replace(symbols.decimal_separator.as_str(), ".");
        if body.starts_with('.') {
            body.insert(0, '0');
        }
        if body.ends_with('.') {
            body.pop();
        }
        if negative {
            body.insert(0, '-');
        }
        Some(body)
    }

    pub(crate) fn number_from(&self, captures: &Captures<'_>) -> Option<f64> {
        captures[0].parse::<f64>().ok()
    }
}

impl PatternRules for NumberRules {
    fn pattern(&self) -> String {
        if self.integer_only {
            r"^-?\d+$".to_string()
        } else {
            r"^-?\d+(\.\d+)?$".to_string()
        }
    }

    fn prepare(&self, text: &str) -> Option<String> {
        self.canonicalize(text)
    }

    fn interpret(&self, captures: &Captures<'_>) -> DataTypeResolution<Value> {
        match self.number_from(captures) {
            Some(number) => DataTypeResolution::Value(Value::Number(number)),
            None => DataTypeResolution::Error(self.mismatch_message.clone()),
        }
    }

    fn mismatch_message(&self) -> String {
        self.mismatch_message.clone()
    }
}

pub type NumberParser = PatternParser<NumberRules>;

impl NumberParser {
    /// Number parser with an empty-text result of `0`.
    pub fn number(lookup_key: &str, rules: NumberRules) -> Result<Self> {
        PatternParser::new(lookup_key, ParseOptions::for_numbers(), rules)
    }
}
