//! `puppetize` binary entry point.
use std::process::ExitCode;

use clap::Parser;

use puppetize_cli::{cli, commands, logging};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    match args.command {
        cli::Command::Convert(ref opts) => {
            let command = args.command.name();
            logging::init_subscriber(args.verbose, command);
            let log = logging::Logger::new(command);
            match commands::convert::run(opts, &log) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    log.error(&format!("{e:#}"));
                    ExitCode::FAILURE
                }
            }
        }
        cli::Command::Version => {
            commands::version::run();
            ExitCode::SUCCESS
        }
    }
}
