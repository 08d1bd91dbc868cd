use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use dtk_model::{DataTypeError, DataTypeResolution, DateOrder, Result, Value};

use super::serves;
use crate::parsers::CultureGate;
use crate::services::DataTypeFormatter;

/// Writes dates as three numeric parts in a culture's order.
#[derive(Debug, Clone)]
pub struct DateFormatter {
    lookup_key: String,
    cultures: Option<CultureGate>,
    order: DateOrder,
    separator: String,
    utc: bool,
    zero_pad: bool,
}

impl DateFormatter {
    pub fn new(
        lookup_key: &str,
        order: DateOrder,
        separator: impl Into<String>,
        utc: bool,
    ) -> Result<Self> {
        let lookup_key = lookup_key.trim();
        let separator = separator.into();
        if lookup_key.is_empty() || separator.is_empty() {
            return Err(DataTypeError::coding(
                "date formatter requires a lookup key and a separator",
            ));
        }
        Ok(Self {
            lookup_key: lookup_key.to_string(),
            cultures: None,
            order,
            separator,
            utc,
            zero_pad: true,
        })
    }

    /// `01/02/2003` when set, `1/2/2003` otherwise.
    #[must_use]
    pub fn zero_pad(mut self, zero_pad: bool) -> Self {
        self.zero_pad = zero_pad;
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

    fn calendar_date(&self, date: &DateTime<Utc>) -> NaiveDate {
        if self.utc {
            date.date_naive()
        } else {
            date.with_timezone(&Local).date_naive()
        }
    }

    pub fn render(&self, date: &DateTime<Utc>) -> String {
        let date = self.calendar_date(date);
        let (year_at, month_at, day_at) = self.order.positions();
        let mut parts = [String::new(), String::new(), String::new()];
        parts[year_at] = format!("{:04}", date.year());
        if self.zero_pad {
            parts[month_at] = format!("{:02}", date.month());
            parts[day_at] = format!("{:02}", date.day());
        } else {
            parts[month_at] = date.month().to_string();
            parts[day_at] = date.day().to_string();
        }
        parts.join(&self.separator)
    }
}

impl DataTypeFormatter for DateFormatter {
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
            Value::Date(date) => DataTypeResolution::Value(self.render(date)),
            other => DataTypeResolution::error(format!(
                "Cannot format {:?} as a date",
                other.kind()
            )),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2003, 2, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn orders_and_separators() {
        let mdy = DateFormatter::new("ShortDate", DateOrder::Mdy, "/", true).unwrap();
        assert_eq!(mdy.render(&date()), "02/01/2003");
        let dmy = DateFormatter::new("ShortDate", DateOrder::Dmy, ".", true).unwrap();
        assert_eq!(dmy.render(&date()), "01.02.2003");
        let ymd = DateFormatter::new("Date", DateOrder::Ymd, "-", true).unwrap();
        assert_eq!(ymd.render(&date()), "2003-02-01");
    }

    #[test]
    fn without_padding() {
        let formatter = DateFormatter::new("ShortDate", DateOrder::Mdy, "/", true)
            .unwrap()
            .zero_pad(false);
        assert_eq!(formatter.render(&date()), "2/1/2003");
    }

    #[test]
    fn non_dates_fail() {
        let formatter = DateFormatter::new("ShortDate", DateOrder::Mdy, "/", true).unwrap();
        assert_eq!(
            formatter.format(&Value::Number(1.0), "ShortDate", "en").unwrap(),
            DataTypeResolution::error("Cannot format Number as a date")
        );
    }
}
