//! Per-culture symbols and words the default handlers are built from.

use dtk_model::{DateOrder, culture_language_code};
use serde::{Deserialize, Serialize};

use crate::formatters::{CurrencyPlacement, NumberFormat};
use crate::parsers::{DEFAULT_TWO_DIGIT_YEAR_BREAK, NumberSymbols};

fn default_two_digit_year_break() -> u32 {
    DEFAULT_TWO_DIGIT_YEAR_BREAK
}

fn default_true() -> bool {
    true
}

/// How one culture writes numbers, dates and booleans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CultureGrammar {
    pub decimal_separator: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thousands_separator: Option<String>,

    pub negative_symbol: String,

    /// Accept `(12)` as `-12` when parsing.
    #[serde(default)]
    pub parentheses_negative: bool,

    pub currency_symbol: String,

    #[serde(default)]
    pub currency_placement: CurrencyPlacement,

    pub percent_symbol: String,

    /// Write `50 %` rather than `50%`.
    #[serde(default)]
    pub percent_spaced: bool,

    pub date_order: DateOrder,

    pub date_separator: String,

    #[serde(default = "default_two_digit_year_break")]
    pub two_digit_year_break: u32,

    /// Dates are read and written in UTC rather than local time.
    #[serde(default = "default_true")]
    pub utc_dates: bool,

    pub true_words: Vec<String>,

    pub false_words: Vec<String>,
}

impl CultureGrammar {
    /// Built-in grammar for `culture_id` or, failing that, its language.
    #[must_use]
    pub fn builtin(culture_id: &str) -> Option<Self> {
        match culture_id {
            "en-GB" => Some(Self::english_gb()),
            "en" | "en-US" => Some(Self::english_us()),
            "fr" | "fr-FR" => Some(Self::french()),
            "de" | "de-DE" => Some(Self::german()),
            _ => {
                let language = culture_language_code(culture_id);
                (language != culture_id)
                    .then(|| Self::builtin(language))
                    .flatten()
            }
        }
    }

    fn english_us() -> Self {
        Self {
            decimal_separator: ".".to_string(),
            thousands_separator: Some(",".to_string()),
            negative_symbol: "-".to_string(),
            parentheses_negative: true,
            currency_symbol: "$".to_string(),
            currency_placement: CurrencyPlacement::Prefix,
            percent_symbol: "%".to_string(),
            percent_spaced: false,
            date_order: DateOrder::Mdy,
            date_separator: "/".to_string(),
            two_digit_year_break: DEFAULT_TWO_DIGIT_YEAR_BREAK,
            utc_dates: true,
            true_words: words(&["yes", "true"]),
            false_words: words(&["no", "false"]),
        }
    }

    fn english_gb() -> Self {
        Self {
            currency_symbol: "£".to_string(),
            date_order: DateOrder::Dmy,
            ..Self::english_us()
        }
    }

    fn french() -> Self {
        Self {
            decimal_separator: ",".to_string(),
            thousands_separator: Some(" ".to_string()),
            negative_symbol: "-".to_string(),
            parentheses_negative: false,
            currency_symbol: "€".to_string(),
            currency_placement: CurrencyPlacement::Suffix,
            percent_symbol: "%".to_string(),
            percent_spaced: true,
            date_order: DateOrder::Dmy,
            date_separator: "/".to_string(),
            two_digit_year_break: DEFAULT_TWO_DIGIT_YEAR_BREAK,
            utc_dates: true,
            true_words: words(&["oui", "vrai"]),
            false_words: words(&["non", "faux"]),
        }
    }

    fn german() -> Self {
        Self {
            thousands_separator: Some(".".to_string()),
            date_separator: ".".to_string(),
            true_words: words(&["ja", "wahr"]),
            false_words: words(&["nein", "falsch"]),
            ..Self::french()
        }
    }

    /// Parser symbols: currency and percent are strip tokens.
    #[must_use]
    pub fn number_symbols(&self) -> NumberSymbols {
        let mut symbols = NumberSymbols::new(&self.decimal_separator, &self.negative_symbol)
            .with_parentheses_negative(self.parentheses_negative)
            .with_currency_symbol(&self.currency_symbol)
            .with_percent_symbol(&self.percent_symbol);
        if let Some(separator) = &self.thousands_separator {
            symbols = symbols.with_thousands_separator(separator);
        }
        symbols
    }

    #[must_use]
    pub fn number_format(&self) -> NumberFormat {
        let mut format = NumberFormat::new(&self.decimal_separator, &self.negative_symbol);
        if let Some(separator) = &self.thousands_separator {
            format = format.with_thousands_separator(separator);
        }
        format
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|word| (*word).to_string()).collect()
}
