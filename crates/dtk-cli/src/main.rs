//! Data Type Kit CLI.

use clap::Parser;
use dtk_cli::logging::init_logging;

mod cli;
mod commands;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&cli.log_config()) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match commands::run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            2
        }
    };
    std::process::exit(exit_code);
}
