//! Built-in formatters. A formatter without a culture list serves every culture.

mod date;
mod number;
mod text;

pub use date::DateFormatter;
pub use number::{CurrencyPlacement, NumberFormat, NumberFormatter, PercentageFormatter};
pub use text::{BooleanFormatter, StringFormatter};

use crate::parsers::CultureGate;

fn serves(cultures: Option<&CultureGate>, culture_id: &str) -> bool {
    cultures.is_none_or(|gate| gate.allows(culture_id))
}
