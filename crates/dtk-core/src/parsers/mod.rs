//! Parser framework.
//!
//! Parsers are assembled from stages rather than inherited:
//!
//! 1. [`ParserBase`] owns the lookup key, trims, and short-circuits empty
//!    text to the configured empty result.
//! 2. [`TextCleanup`] strips characters, compresses and replaces
//!    whitespace, and converts case.
//! 3. [`PatternParser`] adds a regex compiled at construction, an optional
//!    [`CultureGate`] and a [`PatternRules`] strategy that interprets the
//!    match.
//!
//! Number, percentage and date parsing are [`PatternRules`]
//! implementations. Booleans and plain strings implement
//! [`DataTypeParser`](crate::services::DataTypeParser) directly.

mod base;
mod boolean;
mod cleanup;
mod date;
mod number;
mod pattern;
mod percentage;
mod text;

pub use base::{ParseOptions, ParserBase};
pub use boolean::BooleanParser;
pub use cleanup::TextCleanup;
pub use date::{DEFAULT_TWO_DIGIT_YEAR_BREAK, DateParser, DateRules};
pub use number::{NumberParser, NumberRejection, NumberRules, NumberSymbols};
pub use pattern::{CultureGate, PatternParser, PatternRules, TextPatternParser, TextPatternRules};
pub use percentage::{PercentScale, PercentageParser, PercentageRules};
pub use text::CleanUpStringParser;
