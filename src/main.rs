//! tera-encore CLI entry point
//!
//! Parses arguments, runs the command and prints failures with a suggestion.

use anyhow::Result;
use clap::Parser;
use tera_encore::cli;
use tera_encore::core::user_friendly_error;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
