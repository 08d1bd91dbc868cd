//! Short date parsing: three numeric parts in a culture's order.

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc};
use dtk_model::{DataTypeError, DataTypeResolution, DateOrder, Result, Value};
use regex::Captures;

use super::base::ParseOptions;
use super::pattern::{PatternParser, PatternRules};

/// Two-digit years up to and including this value are in the 2000s.
pub const DEFAULT_TWO_DIGIT_YEAR_BREAK: u32 = 29;

const DAY_OR_MONTH: &str = r"(\d{1,2})";
const YEAR: &str = r"(\d{4}|\d{2})";

#[derive(Debug, Clone)]
pub struct DateRules {
    order: DateOrder,
    separator: String,
    utc: bool,
    two_digit_year_break: u32,
    invalid_date_message: String,
    mismatch_message: String,
}

impl DateRules {
    pub fn new(order: DateOrder, separator: impl Into<String>, utc: bool) -> Result<Self> {
        let separator = separator.into();
        if separator.is_empty() {
            return Err(DataTypeError::coding("date parser requires a separator"));
        }
        Ok(Self {
            order,
            separator,
            utc,
            two_digit_year_break: DEFAULT_TWO_DIGIT_YEAR_BREAK,
            invalid_date_message: "Invalid date".to_string(),
            mismatch_message: "Invalid date format".to_string(),
        })
    }

    #[must_use]
    pub fn with_two_digit_year_break(mut self, year_break: u32) -> Self {
        self.two_digit_year_break = year_break.min(99);
        self
    }

    #[must_use]
    pub fn with_messages(
        mut self,
        invalid_date: impl Into<String>,
        mismatch: impl Into<String>,
    ) -> Self {
        self.invalid_date_message = invalid_date.into();
        self.mismatch_message = mismatch.into();
        self
    }

    pub fn order(&self) -> DateOrder {
        self.order
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn is_utc(&self) -> bool {
        self.utc
    }

    pub fn two_digit_year_break(&self) -> u32 {
        self.two_digit_year_break
    }

    /// Expands a two-digit year around the break; longer years pass through.
    pub fn full_year(&self, year: &str) -> Option<i32> {
        let parsed: u32 = year.parse().ok()?;
        let full = match year.len() {
            2 if parsed <= self.two_digit_year_break => 2000 + parsed,
            2 => 1900 + parsed,
            _ => parsed,
        };
        i32::try_from(full).ok()
    }

    /// Builds the date, rejecting anything that does not read back as the
    /// same year, month and day.
    pub fn to_date(&self, year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
        let naive = NaiveDate::from_ymd_opt(year, month, day)?;
        if (naive.year(), naive.month(), naive.day()) != (year, month, day) {
            return None;
        }
        let midnight = naive.and_hms_opt(0, 0, 0)?;
        if self.utc {
            return Some(Utc.from_utc_datetime(&midnight));
        }
        let local = Local.from_local_datetime(&midnight).single()?;
        if (local.year(), local.month(), local.day()) != (year, month, day) {
            return None;
        }
        Some(local.with_timezone(&Utc))
    }
}

impl PatternRules for DateRules {
    fn pattern(&self) -> String {
        let separator = regex::escape(&self.separator);
        let parts = if self.order.year_first() {
            [YEAR, DAY_OR_MONTH, DAY_OR_MONTH]
        } else {
            [DAY_OR_MONTH, DAY_OR_MONTH, YEAR]
        };
        format!("^{}$", parts.join(&separator))
    }

    fn interpret(&self, captures: &Captures<'_>) -> DataTypeResolution<Value> {
        let (year_at, month_at, day_at) = self.order.positions();
        let part = |index: usize| captures.get(index + 1).map(|m| m.as_str());

        let year = part(year_at).and_then(|year| self.full_year(year));
        let month = part(month_at).and_then(|month| month.parse::<u32>().ok());
        let day = part(day_at).and_then(|day| day.parse::<u32>().ok());

        match (year, month, day) {
            (Some(year), Some(month), Some(day)) => match self.to_date(year, month, day) {
                Some(date) => DataTypeResolution::Value(Value::Date(date)),
                None => DataTypeResolution::Error(self.invalid_date_message.clone()),
            },
            _ => DataTypeResolution::Error(self.mismatch_message.clone()),
        }
    }

    fn mismatch_message(&self) -> String {
        self.mismatch_message.clone()
    }
}

pub type DateParser = PatternParser<DateRules>;

impl DateParser {
    /// Date parser with a null empty-text result.
    pub fn date(lookup_key: &str, rules: DateRules) -> Result<Self> {
        PatternParser::new(lookup_key, ParseOptions::for_dates(), rules)
    }
}
