// src/bin/rulegate.rs
use clap::Parser;
use colored::Colorize;

use rulegate_core::cli::{self, Cli};
use rulegate_core::exit::RulegateExit;

fn main() -> RulegateExit {
    let cli = Cli::parse();
    match cli::execute(&cli) {
        Ok(exit) => exit,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            RulegateExit::Error
        }
    }
}
