//! Command-line entry point for dotfiles.

use anyhow::Result;
use clap::Parser;

use dotfiles_repo::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    if matches!(args.command, cli::Command::Version) {
        commands::version::run();
        return Ok(());
    }

    logging::init_subscriber(args.verbose, args.command.name());
    let log = logging::Logger::new(args.command.name());

    match &args.command {
        cli::Command::Add(opts) => commands::add::run(&args.global, opts, &log),
        cli::Command::Remove(opts) => commands::remove::run(&args.global, opts, &log),
        cli::Command::Link(opts) => commands::link::run(&args.global, opts, &log),
        cli::Command::Unlink(opts) => commands::unlink::run(&args.global, opts, &log),
        cli::Command::List(opts) => commands::list::run(&args.global, opts, &log),
        cli::Command::Version => Ok(()),
    }
}
