//! esrowsctl - normalize search engine responses from the command line

use clap::Parser;
use esrowsctl::cli::Cli;
use esrowsctl::{commands, errors, logging};
use std::process::ExitCode;
use tracing::debug;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();

    match commands::execute(&cli, stdin, stdout) {
        Ok(()) => ExitCode::from(errors::EXIT_SUCCESS as u8),
        Err(err) => {
            let code = errors::exit_code_for(&err);
            debug!(code, "command failed");
            eprintln!("esrowsctl: {:#}", err);
            ExitCode::from(code as u8)
        }
    }
}
