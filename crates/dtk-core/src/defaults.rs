//! The handler set installed by [`DataTypeServices::from_config`].
//!
//! [`DataTypeServices::from_config`]: crate::DataTypeServices::from_config

use std::sync::Arc;

use dtk_model::{Result, lookup_keys};
use tracing::debug;

use crate::converters::{CaseInsensitiveConverter, DateToDaysConverter, IntegerConverter};
use crate::formatters::{
    BooleanFormatter, DateFormatter, NumberFormatter, PercentageFormatter, StringFormatter,
};
use crate::grammar::CultureGrammar;
use crate::identifiers::ValueKindIdentifier;
use crate::parsers::{
    BooleanParser, CleanUpStringParser, DateParser, DateRules, NumberParser, NumberRules,
    PercentScale, PercentageParser, PercentageRules,
};
use crate::services::DataTypeServices;

/// Built-in lookup key fallbacks, custom key first.
pub const LOOKUP_KEY_FALLBACKS: &[(&str, &str)] = &[
    (lookup_keys::SHORT_DATE, lookup_keys::DATE),
    (lookup_keys::YES_NO_BOOLEAN, lookup_keys::BOOLEAN),
    (lookup_keys::CASE_INSENSITIVE, lookup_keys::STRING),
];

pub fn register_lookup_key_fallbacks(services: &DataTypeServices) -> Result<()> {
    for (custom, general) in LOOKUP_KEY_FALLBACKS {
        services.lookup_key_fallbacks().register(custom, general)?;
    }
    Ok(())
}

pub fn register_identifiers(services: &DataTypeServices) -> Result<()> {
    for identifier in ValueKindIdentifier::builtin() {
        services.identifiers().register(Arc::new(identifier))?;
    }
    Ok(())
}

pub fn register_converters(services: &DataTypeServices) -> Result<()> {
    let converters = services.converters();
    converters.register(Arc::new(DateToDaysConverter::default()))?;
    converters.register(Arc::new(CaseInsensitiveConverter))?;
    converters.register(Arc::new(IntegerConverter))?;
    Ok(())
}

/// Handlers that ignore the culture.
pub fn register_culture_agnostic(services: &DataTypeServices) -> Result<()> {
    services
        .parsers()
        .register(Arc::new(CleanUpStringParser::string()?))?;
    services.formatters().register(Arc::new(StringFormatter))?;
    Ok(())
}

/// Registers the parsers and formatters one grammar defines.
///
/// Parsers do not follow culture fallback, so they serve every culture in
/// `parser_cultures`. Formatters serve `formatter_cultures` and are reached
/// from other cultures through the culture fallback walk.
pub fn register_culture_handlers(
    services: &DataTypeServices,
    grammar: &CultureGrammar,
    parser_cultures: &[String],
    formatter_cultures: &[String],
) -> Result<()> {
    register_parsers(services, grammar, parser_cultures)?;
    register_formatters(services, grammar, formatter_cultures)?;
    debug!(
        cultures = ?parser_cultures,
        "registered culture handlers"
    );
    Ok(())
}

fn register_parsers(
    services: &DataTypeServices,
    grammar: &CultureGrammar,
    cultures: &[String],
) -> Result<()> {
    let parsers = services.parsers();
    let symbols = grammar.number_symbols();

    parsers.register(Arc::new(
        NumberParser::number(lookup_keys::NUMBER, NumberRules::new(symbols.clone())?)?
            .for_cultures(cultures)?,
    ))?;
    parsers.register(Arc::new(
        NumberParser::number(lookup_keys::INTEGER, NumberRules::integer(symbols.clone())?)?
            .for_cultures(cultures)?,
    ))?;
    parsers.register(Arc::new(
        NumberParser::number(
            lookup_keys::CURRENCY,
            NumberRules::new(symbols.clone())?.with_mismatch_message("Invalid currency"),
        )?
        .for_cultures(cultures)?,
    ))?;
    parsers.register(Arc::new(
        PercentageParser::percentage(
            lookup_keys::PERCENTAGE,
            PercentageRules::new(symbols.clone(), PercentScale::Fraction)?,
        )?
        .for_cultures(cultures)?,
    ))?;
    parsers.register(Arc::new(
        PercentageParser::percentage(
            lookup_keys::PERCENTAGE_100,
            PercentageRules::new(symbols, PercentScale::Hundred)?,
        )?
        .for_cultures(cultures)?,
    ))?;

    let date_rules = DateRules::new(grammar.date_order, &grammar.date_separator, grammar.utc_dates)?
        .with_two_digit_year_break(grammar.two_digit_year_break);
    parsers.register(Arc::new(
        DateParser::date(lookup_keys::DATE, date_rules)?.for_cultures(cultures)?,
    ))?;

    parsers.register(Arc::new(
        BooleanParser::new(lookup_keys::BOOLEAN, &grammar.true_words, &grammar.false_words)?
            .for_cultures(cultures)?,
    ))?;
    Ok(())
}

fn register_formatters(
    services: &DataTypeServices,
    grammar: &CultureGrammar,
    cultures: &[String],
) -> Result<()> {
    let formatters = services.formatters();
    let format = grammar.number_format();

    formatters.register(Arc::new(
        NumberFormatter::new(lookup_keys::NUMBER, format.clone())?.for_cultures(cultures)?,
    ))?;
    formatters.register(Arc::new(
        NumberFormatter::integer(format.clone())?.for_cultures(cultures)?,
    ))?;
    formatters.register(Arc::new(
        NumberFormatter::currency(format, &grammar.currency_symbol, grammar.currency_placement)?
            .for_cultures(cultures)?,
    ))?;
    for (lookup_key, scale) in [
        (lookup_keys::PERCENTAGE, PercentScale::Fraction),
        (lookup_keys::PERCENTAGE_100, PercentScale::Hundred),
    ] {
        formatters.register(Arc::new(
            PercentageFormatter::new(lookup_key, scale, &grammar.percent_symbol)?
                .spaced(grammar.percent_spaced)
                .for_cultures(cultures)?,
        ))?;
    }
    formatters.register(Arc::new(
        DateFormatter::new(
            lookup_keys::DATE,
            grammar.date_order,
            &grammar.date_separator,
            grammar.utc_dates,
        )?
        .for_cultures(cultures)?,
    ))?;

    let true_text = grammar.true_words.first().cloned().unwrap_or_default();
    let false_text = grammar.false_words.first().cloned().unwrap_or_default();
    formatters.register(Arc::new(
        BooleanFormatter::new(lookup_keys::BOOLEAN, true_text, false_text)?
            .for_cultures(cultures)?,
    ))?;
    Ok(())
}
