//! Command: move home files into the repository and link them back.
use anyhow::Result;
use std::path::PathBuf;

use super::{Action, CommandSetup};
use crate::cli::{GlobalOpts, PathsOpts};
use crate::logging::{Log, Logger};

/// Run the add command.
///
/// # Errors
///
/// Returns an error if setup fails or any dotfile could not be added.
pub fn run(global: &GlobalOpts, opts: &PathsOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    execute(&setup, &opts.paths, global.dry_run, log)?;
    super::finish(log)
}

fn execute(setup: &CommandSetup, paths: &[PathBuf], dry_run: bool, log: &dyn Log) -> Result<()> {
    log.stage("Adding dotfiles");
    let dotfiles = setup.repository.dotfiles(paths, log)?;
    super::process_dotfiles(&dotfiles, Action::Add, dry_run, log);
    Ok(())
}
