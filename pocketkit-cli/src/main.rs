//! Binary crate for the `pocketkit` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive prompts for missing input
//! - Human-friendly output formatting

use clap::Parser;

mod bmi;
mod cli;
mod logging;
mod password;

fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    logging::init_logging(cmd.verbose)?;
    cmd.run()
}
