//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

mod cli;
mod rank;
mod store;

use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    if let Err(err) = run() {
        eprintln!("nestwise: {err}");
        std::process::exit(1);
    }
}

fn run() -> eyre::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Rank(args) => rank::run(&args),
        Command::ClearCache(args) => rank::clear_cache(&args),
    }
}
