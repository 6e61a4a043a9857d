//! Setwise CLI - compile set-operation plans to backend SQL

use clap::Parser;

mod cli;
mod commands;
mod plan;

use cli::Cli;
use commands::common::ExitCode;
use commands::{backends, capabilities, compile};

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        cli::Commands::Compile(args) => compile::execute(args, &cli.global),
        cli::Commands::Capabilities(args) => capabilities::execute(args, &cli.global),
        cli::Commands::Backends(args) => backends::execute(args, &cli.global),
    };

    if let Err(err) = result {
        let code = match err.downcast_ref::<ExitCode>() {
            Some(ExitCode(code)) => *code,
            None => {
                eprintln!("Error: {err:#}");
                1
            }
        };
        std::process::exit(code);
    }
}
