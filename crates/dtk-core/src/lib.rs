pub mod config;
pub mod converters;
pub mod cultures;
pub mod defaults;
mod dispose;
pub mod formatters;
pub mod grammar;
pub mod identifiers;
pub mod lookup_key_fallback;
pub mod parsers;
pub mod services;

pub use config::{CultureConfig, EngineConfig, GrammarGroup, GrammarSource};
pub use converters::{CaseInsensitiveConverter, DateToDaysConverter, IntegerConverter};
pub use cultures::{CultureRegistry, DEFAULT_CULTURE_ID};
pub use formatters::{
    BooleanFormatter, CurrencyPlacement, DateFormatter, NumberFormat, NumberFormatter,
    PercentageFormatter, StringFormatter,
};
pub use grammar::CultureGrammar;
pub use identifiers::ValueKindIdentifier;
pub use lookup_key_fallback::LookupKeyFallbackRegistry;
pub use parsers::{
    BooleanParser, CleanUpStringParser, CultureGate, DateParser, DateRules, NumberParser,
    NumberRules, NumberSymbols, ParseOptions, PatternParser, PatternRules, PercentScale,
    PercentageParser, PercentageRules, TextCleanup, TextPatternParser, TextPatternRules,
};
pub use services::{
    ComparerService, ConverterService, DataTypeComparer, DataTypeConverter, DataTypeFormatter,
    DataTypeIdentifier, DataTypeParser, DataTypeServices, FormatterService, IdentifierService,
    LazyLoad, ParserService, ServicesHandle, ServicesSlot, default_compare,
};
