//! Typed value tokens accepted on the command line.
//!
//! | token              | value                         |
//! |--------------------|-------------------------------|
//! | `null`             | `Value::Null`                 |
//! | `bool:true`        | `Value::Boolean`              |
//! | `number:-12.5`     | `Value::Number`               |
//! | `date:2024-03-09`  | `Value::Date` at UTC midnight |
//! | `date:<rfc3339>`   | `Value::Date`                 |
//! | `text:anything`    | `Value::String`               |
//!
//! Anything without a recognised prefix is a string.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, Utc};
use dtk_model::Value;

pub fn parse_value_token(token: &str) -> Result<Value> {
    if token == "null" {
        return Ok(Value::Null);
    }
    let Some((prefix, rest)) = token.split_once(':') else {
        return Ok(Value::from(token));
    };
    match prefix {
        "bool" => match rest.trim().to_lowercase().as_str() {
            "true" => Ok(Value::Boolean(true)),
            "false" => Ok(Value::Boolean(false)),
            other => Err(anyhow!("expected bool:true or bool:false, got bool:{other}")),
        },
        "number" => rest
            .trim()
            .parse::<f64>()
            .map(Value::Number)
            .with_context(|| format!("invalid number token: {token}")),
        "date" => parse_date(rest.trim())
            .map(Value::Date)
            .with_context(|| format!("invalid date token: {token}")),
        "text" => Ok(Value::from(rest)),
        _ => Ok(Value::from(token)),
    }
}

fn parse_date(text: &str) -> Result<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| anyhow!("no midnight on {date}"))?;
        return Ok(midnight.and_utc());
    }
    Ok(DateTime::parse_from_rfc3339(text)?.with_timezone(&Utc))
}
