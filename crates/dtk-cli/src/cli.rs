//! CLI argument definitions for the `dtk` binary.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{Args, ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use dtk_cli::logging::{LogConfig, LogFormat};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "dtk",
    version,
    about = "Data Type Kit - parse, format and compare values by lookup key and culture",
    long_about = "Parse, format, identify, convert and compare values through lookup keys \
                  and culture fallbacks.\n\n\
                  Values are given as typed tokens: null, bool:true, number:-12.5, \
                  date:2024-03-09, text:anything. Untyped tokens are strings."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Engine configuration file (JSON). Built-in cultures are used when absent.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Culture to resolve against (default: the configured active culture).
    #[arg(long = "culture", value_name = "ID", global = true)]
    pub culture: Option<String>,

    /// Print results as JSON.
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (default: json with --json, pretty otherwise).
    #[arg(long = "log-format", value_enum, global = true)]
    pub log_format: Option<LogFormatArg>,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Logging setup for this invocation.
    ///
    /// `--log-level` beats `-v`/`-q`, and either one disables `RUST_LOG`.
    /// Results printed with `--json` get JSON logs unless `--log-format`
    /// says otherwise, so stdout and stderr can both be machine-read.
    pub fn log_config(&self) -> LogConfig {
        let explicit_level = self.log_level.map(LevelFilter::from);
        let format = match self.log_format {
            Some(format) => LogFormat::from(format),
            None if self.json => LogFormat::Json,
            None => LogFormat::Pretty,
        };
        let ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        let level_filter = explicit_level.unwrap_or(self.verbosity.tracing_level_filter());
        LogConfig::default()
            .with_level_filter(level_filter)
            .with_env_filter(explicit_level.is_none() && !self.verbosity.is_present())
            .with_format(format)
            .with_ansi(ansi)
            .with_log_file(self.log_file.clone())
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse text into a value.
    Parse(ParseArgs),

    /// Format a value as text.
    Format(ValueArgs),

    /// Print the lookup key identified for a value.
    Identify(IdentifyArgs),

    /// Convert a value with the converter for its lookup key.
    Convert(ValueArgs),

    /// Compare two values.
    Compare(CompareArgs),

    /// List registered cultures.
    Cultures,

    /// List lookup key fallbacks.
    LookupKeys,

    /// Print the effective engine configuration as JSON.
    Config,
}

#[derive(Args)]
pub struct ParseArgs {
    /// Text to parse.
    #[arg(value_name = "TEXT", allow_hyphen_values = true)]
    pub text: String,

    /// Lookup key naming the data type, e.g. Number or ShortDate.
    #[arg(long = "key", short = 'k', value_name = "KEY")]
    pub key: String,
}

#[derive(Args)]
pub struct ValueArgs {
    /// Typed value token.
    #[arg(value_name = "VALUE", allow_hyphen_values = true)]
    pub value: String,

    /// Lookup key (default: identified from the value).
    #[arg(long = "key", short = 'k', value_name = "KEY")]
    pub key: Option<String>,
}

#[derive(Args)]
pub struct IdentifyArgs {
    /// Typed value token.
    #[arg(value_name = "VALUE", allow_hyphen_values = true)]
    pub value: String,
}

#[derive(Args)]
pub struct CompareArgs {
    #[arg(value_name = "LEFT", allow_hyphen_values = true)]
    pub left: String,

    #[arg(value_name = "RIGHT", allow_hyphen_values = true)]
    pub right: String,

    #[arg(long = "left-key", value_name = "KEY")]
    pub left_key: Option<String>,

    /// Lookup key for the right value (default: same as --left-key).
    #[arg(long = "right-key", value_name = "KEY")]
    pub right_key: Option<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
