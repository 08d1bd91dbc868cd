use dtk_model::{DataTypeError, DataTypeResolution, Result, Value};
use regex::Captures;

use super::base::ParseOptions;
use super::number::{NumberRules, NumberSymbols};
use super::pattern::{PatternParser, PatternRules};

/// How a parsed percentage is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercentScale {
    /// `50%` is stored as `0.5`.
    Fraction,
    /// `50%` is stored as `50`.
    Hundred,
}

/// Number rules with a mandatory percent symbol and a scale.
#[derive(Debug, Clone)]
pub struct PercentageRules {
    number: NumberRules,
    scale: PercentScale,
}

impl PercentageRules {
    pub fn new(symbols: NumberSymbols, scale: PercentScale) -> Result<Self> {
        if symbols.percent_symbol.as_deref().is_none_or(str::is_empty) {
            return Err(DataTypeError::coding(
                "percentage parser requires a percent symbol",
            ));
        }
        Ok(Self {
            number: NumberRules::new(symbols)?.with_mismatch_message("Invalid percentage"),
            scale,
        })
    }

    pub fn scale(&self) -> PercentScale {
        self.scale
    }
}

impl PatternRules for PercentageRules {
    fn pattern(&self) -> String {
        self.number.pattern()
    }

    fn prepare(&self, text: &str) -> Option<String> {
        self.number.prepare(text)
    }

    fn interpret(&self, captures: &Captures<'_>) -> DataTypeResolution<Value> {
        match (self.number.number_from(captures), self.scale) {
            (Some(number), PercentScale::Fraction) => {
                DataTypeResolution::Value(Value::Number(number / 100.0))
            }
            (Some(number), PercentScale::Hundred) => DataTypeResolution::Value(Value::Number(number)),
            (None, _) => DataTypeResolution::Error(self.number.mismatch_message()),
        }
    }

    fn mismatch_message(&self) -> String {
        self.number.mismatch_message()
    }
}

pub type PercentageParser = PatternParser<PercentageRules>;

impl PercentageParser {
    pub fn percentage(lookup_key: &str, rules: PercentageRules) -> Result<Self> {
        PatternParser::new(lookup_key, ParseOptions::for_numbers(), rules)
    }
}
