#![allow(clippy::print_stderr)]

use clap::Parser;
use std::io::IsTerminal;

use tsz_golden_cli::args::{CliArgs, ColorMode, Command};
use tsz_golden_cli::commands;

/// Setup or I/O errors, as opposed to failing baselines.
const EXIT_ERROR: i32 = 2;

fn main() {
    // Zero cost unless TSZ_GOLDEN_LOG or RUST_LOG is set.
    tsz_golden_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let color = match args.color {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::io::stdout().is_terminal(),
    };
    colored::control::set_override(color);

    let result = match &args.command {
        Command::Check(check) => commands::run_check(check, color),
        Command::Compare(compare) => commands::run_compare(compare, color),
        Command::Inspect(inspect) => commands::run_inspect(inspect),
        Command::Generate(generate) => commands::run_generate(generate, color),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(EXIT_ERROR);
        }
    }
}
