//! Fallback resolution across the services container.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use dtk_core::{
    DataTypeFormatter, DataTypeParser, DataTypeServices, FormatterService, NumberFormat,
    NumberFormatter, NumberParser, NumberRules, NumberSymbols, ParserService,
    ValueKindIdentifier,
};
use dtk_model::{CultureIdFallback, DataTypeError, DataTypeResolution, Result, Value};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn with_captured_logs<T>(run: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .without_time()
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, run);
    (result, buffer.contents())
}

fn currency_parser() -> NumberParser {
    NumberParser::number(
        "Currency",
        NumberRules::new(NumberSymbols::new(".", "-").with_currency_symbol("$")).unwrap(),
    )
    .unwrap()
}

fn plain_number_formatter() -> NumberFormatter {
    NumberFormatter::new("Number", NumberFormat::new(".", "-").with_thousands_separator(","))
        .unwrap()
}

#[test]
fn parse_walks_lookup_key_chain_in_order() {
    let services = DataTypeServices::new();
    let fallbacks = services.lookup_key_fallbacks();
    fallbacks.register("CUSTOMB", "CUSTOMA").unwrap();
    fallbacks.register("CUSTOMA", "Currency").unwrap();
    services
        .parsers()
        .register(Arc::new(currency_parser()))
        .unwrap();

    let (parsed, logs) =
        with_captured_logs(|| services.parsers().parse("$12.50", "CUSTOMB", "en"));

    assert_eq!(
        parsed.unwrap(),
        DataTypeResolution::Value(Value::Number(12.5))
    );
    let first = logs.find("from=CUSTOMB").expect("first hop logged");
    let second = logs.find("from=CUSTOMA").expect("second hop logged");
    assert!(first < second, "hops out of order:\n{logs}");
    assert!(logs.contains("to=Currency"));
}

#[test]
fn cyclic_lookup_keys_fail_with_the_looping_key() {
    let services = DataTypeServices::new();
    services.lookup_key_fallbacks().register("A", "B").unwrap();
    services.lookup_key_fallbacks().register("B", "A").unwrap();

    let err = services.parsers().parse("1", "A", "en").unwrap_err();
    assert_eq!(
        err,
        DataTypeError::CyclicFallback {
            key: "A".to_string()
        }
    );
    assert!(err.to_string().contains("\"A\""));
}

#[test]
fn bad_text_reports_the_owning_parser_message() {
    let services = DataTypeServices::new();
    services
        .parsers()
        .register(Arc::new(currency_parser()))
        .unwrap();

    assert_eq!(
        services.parsers().parse("abc", "Currency", "en").unwrap(),
        DataTypeResolution::error("Invalid number")
    );
    assert!(matches!(
        services.parsers().parse("1", "Unknown", "en"),
        Err(DataTypeError::NoHandler { .. })
    ));
    assert!(matches!(
        services.parsers().parse("1", "  ", "en"),
        Err(DataTypeError::Coding(_))
    ));
}

#[test]
fn format_walks_culture_chain_from_active_culture() {
    let services = DataTypeServices::new();
    let cultures = services.cultures();
    cultures.register(CultureIdFallback::new("en", None)).unwrap();
    cultures
        .register(CultureIdFallback::new("en-GB", Some("en")))
        .unwrap();
    cultures.set_active_culture_id("en-GB").unwrap();
    services
        .formatters()
        .register(Arc::new(plain_number_formatter().for_cultures(["en"]).unwrap()))
        .unwrap();

    let (formatted, logs) =
        with_captured_logs(|| services.formatters().format(&Value::Number(1234.5), Some("Number")));

    assert_eq!(
        formatted.unwrap(),
        DataTypeResolution::Value("1,234.5".to_string())
    );
    assert!(logs.contains("from=en-GB"), "{logs}");
}

#[test]
fn format_without_key_uses_identifiers() {
    let services = DataTypeServices::new();
    for identifier in ValueKindIdentifier::builtin() {
        services.identifiers().register(Arc::new(identifier)).unwrap();
    }
    services
        .formatters()
        .register(Arc::new(plain_number_formatter()))
        .unwrap();

    assert_eq!(
        services.formatters().format(&Value::Number(2.0), None).unwrap(),
        DataTypeResolution::Value("2".to_string())
    );
    assert!(matches!(
        services.formatters().format(&Value::Null, None),
        Err(DataTypeError::Coding(_))
    ));
    assert!(matches!(
        services.formatters().format(&Value::from("x"), None),
        Err(DataTypeError::NoHandler { .. })
    ));
}

#[test]
fn lazy_loader_runs_once_on_first_miss() {
    let services = DataTypeServices::new();
    services
        .parsers()
        .set_lazy_load(Box::new(|parsers: &ParserService| {
            parsers.register(Arc::new(currency_parser())).unwrap();
        }))
        .unwrap();
    assert!(services.parsers().is_empty());

    assert_eq!(
        services.parsers().parse("3", "Currency", "en").unwrap(),
        DataTypeResolution::Value(Value::Number(3.0))
    );
    assert_eq!(services.parsers().len(), 1);
}

#[test]
fn second_pending_lazy_loader_is_rejected() {
    let services = DataTypeServices::new();
    let formatters = services.formatters();
    formatters
        .set_lazy_load(Box::new(|_: &FormatterService| {}))
        .unwrap();
    assert!(matches!(
        formatters.set_lazy_load(Box::new(|_: &FormatterService| {})),
        Err(DataTypeError::Coding(_))
    ));
}

struct FailingFormatter {
    error: DataTypeError,
}

impl DataTypeFormatter for FailingFormatter {
    fn supports(&self, lookup_key: &str, _culture_id: &str) -> bool {
        lookup_key == "Fragile"
    }

    fn format(
        &self,
        _value: &Value,
        _lookup_key: &str,
        _culture_id: &str,
    ) -> Result<DataTypeResolution<String>> {
        Err(self.error.clone())
    }
}

#[test]
fn handler_failures_are_downgraded_unless_severe() {
    let services = DataTypeServices::new();
    services
        .formatters()
        .register(Arc::new(FailingFormatter {
            error: DataTypeError::handler("formatter blew up"),
        }))
        .unwrap();
    assert_eq!(
        services
            .formatters()
            .format(&Value::Number(1.0), Some("Fragile"))
            .unwrap(),
        DataTypeResolution::error("formatter blew up")
    );

    let severe = DataTypeServices::new();
    severe
        .formatters()
        .register(Arc::new(FailingFormatter {
            error: DataTypeError::CyclicFallback {
                key: "Loop".to_string(),
            },
        }))
        .unwrap();
    assert!(matches!(
        severe.formatters().format(&Value::Number(1.0), Some("Fragile")),
        Err(DataTypeError::CyclicFallback { .. })
    ));
}

#[test]
fn unregister_removes_the_first_owner() {
    let services = DataTypeServices::new();
    services
        .parsers()
        .register(Arc::new(currency_parser()))
        .unwrap();
    assert!(services.parsers().unregister("Currency", "en").unwrap());
    assert!(!services.parsers().unregister("Currency", "en").unwrap());
    assert!(services.parsers().find("Currency", "en", "").unwrap().is_none());
}

#[test]
fn disposed_container_refuses_work() {
    let services = DataTypeServices::new();
    services
        .parsers()
        .register(Arc::new(currency_parser()))
        .unwrap();
    services.dispose();

    assert_eq!(
        services.parsers().parse("1", "Currency", "en").unwrap_err(),
        DataTypeError::Disposed {
            component: "ParserService"
        }
    );
    assert!(matches!(
        services.cultures().active_culture_id(),
        Err(DataTypeError::Disposed { .. })
    ));
    assert!(matches!(
        services.lookup_key_fallbacks().find("A"),
        Err(DataTypeError::Disposed { .. })
    ));
}

#[test]
fn parser_trait_objects_share_the_registry() {
    let services = DataTypeServices::new();
    let parser: Arc<dyn DataTypeParser> = Arc::new(currency_parser());
    services.parsers().register(Arc::clone(&parser)).unwrap();
    let found = services.parsers().find("Currency", "en", "1").unwrap().unwrap();
    assert!(Arc::ptr_eq(&found, &parser));
}
