use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info_span};

use dtk_cli::report::{Report, comparison_label, cultures_table, lookup_keys_table};
use dtk_cli::value_arg::parse_value_token;
use dtk_core::{DataTypeServices, EngineConfig};
use dtk_model::DataTypeResolution;

use crate::cli::{Cli, Command, CompareArgs, IdentifyArgs, ParseArgs, ValueArgs};

/// Runs the selected command and returns the process exit code.
pub fn run(cli: &Cli) -> Result<i32> {
    let config = load_config(cli)?;
    let services = DataTypeServices::from_config(&config).context("build data type services")?;
    let culture_id = match &cli.culture {
        Some(culture_id) => culture_id.clone(),
        None => services.cultures().active_culture_id()?,
    };
    services.cultures().set_active_culture_id(culture_id.as_str())?;
    let span = info_span!("command", culture_id = %culture_id);
    let _guard = span.enter();

    let code = match &cli.command {
        Command::Parse(args) => run_parse(cli, &services, args, &culture_id)?,
        Command::Format(args) => run_format(cli, &services, args, &culture_id)?,
        Command::Identify(args) => run_identify(cli, &services, args)?,
        Command::Convert(args) => run_convert(cli, &services, args)?,
        Command::Compare(args) => run_compare(cli, &services, args)?,
        Command::Cultures => {
            println!("{}", cultures_table(&services)?);
            0
        }
        Command::LookupKeys => {
            println!("{}", lookup_keys_table(&services)?);
            0
        }
        Command::Config => {
            println!("{}", config.to_json_pretty()?);
            0
        }
    };
    services.dispose();
    Ok(code)
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    match &cli.config {
        Some(path) => {
            debug!(path = %path.display(), "loading engine config");
            EngineConfig::load(path).with_context(|| format!("load {}", path.display()))
        }
        None => Ok(EngineConfig::default()),
    }
}

fn emit<T>(cli: &Cli, report: &Report<T>) -> Result<i32>
where
    T: Serialize + std::fmt::Display,
{
    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.to_text());
    }
    Ok(i32::from(report.is_error()))
}

fn run_parse(
    cli: &Cli,
    services: &Arc<DataTypeServices>,
    args: &ParseArgs,
    culture_id: &str,
) -> Result<i32> {
    let resolution = services.parsers().parse(&args.text, &args.key, culture_id)?;
    let report = Report::new("parse", resolution)
        .with_lookup_key(Some(&args.key))
        .with_culture_id(culture_id);
    emit(cli, &report)
}

fn run_format(
    cli: &Cli,
    services: &Arc<DataTypeServices>,
    args: &ValueArgs,
    culture_id: &str,
) -> Result<i32> {
    let value = parse_value_token(&args.value)?;
    let resolution =
        services
            .formatters()
            .format_for_culture(&value, args.key.as_deref(), culture_id)?;
    let report = Report::new("format", resolution)
        .with_lookup_key(args.key.as_deref())
        .with_culture_id(culture_id);
    emit(cli, &report)
}

fn run_identify(cli: &Cli, services: &Arc<DataTypeServices>, args: &IdentifyArgs) -> Result<i32> {
    let value = parse_value_token(&args.value)?;
    let resolution = match services.identifiers().identify(&value)? {
        Some(lookup_key) => DataTypeResolution::Value(lookup_key),
        None => DataTypeResolution::error("No lookup key identifies this value"),
    };
    emit(cli, &Report::new("identify", resolution))
}

fn run_convert(cli: &Cli, services: &Arc<DataTypeServices>, args: &ValueArgs) -> Result<i32> {
    let value = parse_value_token(&args.value)?;
    let resolution = services.converters().convert(&value, args.key.as_deref())?;
    let report = Report::new("convert", resolution).with_lookup_key(args.key.as_deref());
    emit(cli, &report)
}

fn run_compare(cli: &Cli, services: &Arc<DataTypeServices>, args: &CompareArgs) -> Result<i32> {
    let left = parse_value_token(&args.left)?;
    let right = parse_value_token(&args.right)?;
    let right_key = args.right_key.as_deref().or(args.left_key.as_deref());
    let result = services
        .comparers()
        .compare(&left, &right, args.left_key.as_deref(), right_key)?;
    let report = Report::new(
        "compare",
        DataTypeResolution::Value(comparison_label(result)),
    )
    .with_lookup_key(args.left_key.as_deref());
    emit(cli, &report)
}
