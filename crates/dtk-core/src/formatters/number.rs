//! Number, integer, currency and percentage formatting.

use dtk_model::{DataTypeError, DataTypeResolution, Result, Value, lookup_keys};
use serde::{Deserialize, Serialize};

use super::serves;
use crate::parsers::{CultureGate, PercentScale};
use crate::services::{DataTypeFormatter, ServicesHandle, ServicesSlot};

/// Digit grouping and decimal rules for rendering an `f64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    pub decimal_separator: String,
    pub thousands_separator: Option<String>,
    pub negative_symbol: String,
    pub min_decimals: usize,
    pub max_decimals: usize,
}

impl NumberFormat {
    pub fn new(decimal_separator: impl Into<String>, negative_symbol: impl Into<String>) -> Self {
        Self {
            decimal_separator: decimal_separator.into(),
            thousands_separator: None,
            negative_symbol: negative_symbol.into(),
            min_decimals: 0,
            max_decimals: 6,
        }
    }

    #[must_use]
    pub fn with_thousands_separator(mut self, separator: impl Into<String>) -> Self {
        self.thousands_separator = Some(separator.into());
        self
    }

    #[must_use]
    pub fn with_decimals(mut self, min: usize, max: usize) -> Self {
        self.min_decimals = min.min(max);
        self.max_decimals = max;
        self
    }

    pub fn render(&self, number: f64) -> String {
        if !number.is_finite() {
            return number.to_string();
        }
        let fixed = format!("{:.*}", self.max_decimals, number.abs());
        let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

        let mut fraction = fraction.trim_end_matches('0').to_string();
        while fraction.len() < self.min_decimals {
            fraction.push('0');
        }
        let whole = match self.thousands_separator.as_deref() {
            Some(separator) => group_digits(whole, separator),
            None => whole.to_string(),
        };

        let is_zero = fixed.bytes().all(|b| b == b'0' || b == b'.');
        let mut out = String::new();
        if number < 0.0 && !is_zero {
            out.push_str(&self.negative_symbol);
        }
        out.push_str(&whole);
        if !fraction.is_empty() {
            out.push_str(&self.decimal_separator);
            out.push_str(&fraction);
        }
        out
    }
}

fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(digit);
    }
    out
}

/// Where a currency symbol goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyPlacement {
    /// `$1.00`
    #[default]
    Prefix,
    /// `1,00 €`
    Suffix,
}

#[derive(Debug, Clone)]
struct Currency {
    symbol: String,
    placement: CurrencyPlacement,
}

/// Formats numbers, optionally as currency.
#[derive(Debug, Clone)]
pub struct NumberFormatter {
    lookup_key: String,
    cultures: Option<CultureGate>,
    format: NumberFormat,
    currency: Option<Currency>,
}

impl NumberFormatter {
    pub fn new(lookup_key: &str, format: NumberFormat) -> Result<Self> {
        let lookup_key = lookup_key.trim();
        if lookup_key.is_empty() {
            return Err(DataTypeError::coding("formatter lookup key must not be empty"));
        }
        Ok(Self {
            lookup_key: lookup_key.to_string(),
            cultures: None,
            format,
            currency: None,
        })
    }

    /// Whole numbers: no decimals.
    pub fn integer(format: NumberFormat) -> Result<Self> {
        Self::new(lookup_keys::INTEGER, format.with_decimals(0, 0))
    }

    /// Fixed two decimals with a currency symbol.
    pub fn currency(
        format: NumberFormat,
        symbol: impl Into<String>,
        placement: CurrencyPlacement,
    ) -> Result<Self> {
        let symbol = symbol.into();
        if symbol.is_empty() {
            return Err(DataTypeError::coding("currency formatter requires a symbol"));
        }
        let mut formatter = Self::new(lookup_keys::CURRENCY, format.with_decimals(2, 2))?;
        formatter.currency = Some(Currency { symbol, placement });
        Ok(formatter)
    }

    pub fn for_cultures<I, S>(mut self, culture_ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.cultures = Some(CultureGate::new(culture_ids)?);
        Ok(self)
    }

    pub fn number_format(&self) -> &NumberFormat {
        &self.format
    }

    fn render(&self, number: f64) -> String {
        let Some(currency) = &self.currency else {
            return self.format.render(number);
        };
        let digits = self.format.render(number.abs());
        let sign = if self.format.render(number).starts_with(&self.format.negative_symbol) {
            self.format.negative_symbol.as_str()
        } else {
            ""
        };
        match currency.placement {
            CurrencyPlacement::Prefix => format!("{sign}{}{digits}", currency.symbol),
            CurrencyPlacement::Suffix => format!("{sign}{digits} {}", currency.symbol),
        }
    }
}

impl DataTypeFormatter for NumberFormatter {
    fn supports(&self, lookup_key: &str, culture_id: &str) -> bool {
        self.lookup_key == lookup_key && serves(self.cultures.as_ref(), culture_id)
    }

    fn format(
        &self,
        value: &Value,
        _lookup_key: &str,
        _culture_id: &str,
    ) -> Result<DataTypeResolution<String>> {
        Ok(match value {
            Value::Null => DataTypeResolution::Value(String::new()),
            Value::Number(number) => DataTypeResolution::Value(self.render(*number)),
            other => DataTypeResolution::error(format!(
                "Cannot format {:?} as a number",
                other.kind()
            )),
        })
    }
}

/// Formats a stored percentage by sending the number part through the
/// `Number` formatter of the same culture and appending the symbol.
#[derive(Debug)]
pub struct PercentageFormatter {
    lookup_key: String,
    cultures: Option<CultureGate>,
    scale: PercentScale,
    symbol: String,
    spaced: bool,
    services: ServicesSlot,
}

impl PercentageFormatter {
    pub fn new(lookup_key: &str, scale: PercentScale, symbol: impl Into<String>) -> Result<Self> {
        let lookup_key = lookup_key.trim();
        let symbol = symbol.into();
        if lookup_key.is_empty() || symbol.is_empty() {
            return Err(DataTypeError::coding(
                "percentage formatter requires a lookup key and a percent symbol",
            ));
        }
        Ok(Self {
            lookup_key: lookup_key.to_string(),
            cultures: None,
            scale,
            symbol,
            spaced: false,
            services: ServicesSlot::new(),
        })
    }

    /// Puts a space between the number and the symbol, as in `50 %`.
    #[must_use]
    pub fn spaced(mut self, spaced: bool) -> Self {
        self.spaced = spaced;
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
}

impl DataTypeFormatter for PercentageFormatter {
    fn supports(&self, lookup_key: &str, culture_id: &str) -> bool {
        self.lookup_key == lookup_key && serves(self.cultures.as_ref(), culture_id)
    }

    fn format(
        &self,
        value: &Value,
        _lookup_key: &str,
        culture_id: &str,
    ) -> Result<DataTypeResolution<String>> {
        let number = match value {
            Value::Null => return Ok(DataTypeResolution::Value(String::new())),
            Value::Number(number) => *number,
            other => {
                return Ok(DataTypeResolution::error(format!(
                    "Cannot format {:?} as a percentage",
                    other.kind()
                )));
            }
        };
        let number = match self.scale {
            PercentScale::Fraction => number * 100.0,
            PercentScale::Hundred => number,
        };

        let services = self.services.services("PercentageFormatter")?;
        let separator = if self.spaced { " " } else { "" };
        Ok(services
            .formatters()
            .format_for_culture(&Value::Number(number), Some(lookup_keys::NUMBER), culture_id)?
            .map(|digits| format!("{digits}{separator}{}", self.symbol)))
    }

    fn attach(&self, services: &ServicesHandle) {
        self.services.attach(services);
    }
}
