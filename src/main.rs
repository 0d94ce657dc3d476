//! Command-line entry point for omega-zsh.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use omega_zsh::cli::{Cli, Command};
use omega_zsh::{commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    let command = args.command_name();
    logging::init_subscriber(args.verbose, command);
    let log = Arc::new(logging::Logger::new(command));

    match args.command {
        Command::Provision => commands::provision::run(&args.global, &log),
        Command::Apply => commands::apply::run(&args.global, &log),
        Command::Select(ref cmd) => commands::select::run(&args.global, cmd, &log),
        Command::Status => commands::status::run(&args.global, &log),
        Command::Themes => commands::themes::run(&args.global, &log),
        Command::Update => commands::update::run(&args.global, &log),
        Command::Completions { shell } => {
            commands::completions::run(shell);
            Ok(())
        }
        Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
