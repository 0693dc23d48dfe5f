//! Command: move tracked files back into the home directory.
use anyhow::Result;
use std::path::PathBuf;

use super::{Action, CommandSetup};
use crate::cli::{GlobalOpts, PathsOpts};
use crate::logging::{Log, Logger};

/// Run the remove command.
///
/// # Errors
///
/// Returns an error if setup or pruning fails, or any dotfile could not be
/// removed.
pub fn run(global: &GlobalOpts, opts: &PathsOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    execute(&setup, &opts.paths, global.dry_run, log)?;
    super::finish(log)
}

fn execute(setup: &CommandSetup, paths: &[PathBuf], dry_run: bool, log: &dyn Log) -> Result<()> {
    log.stage("Removing dotfiles");
    let dotfiles = setup.repository.dotfiles(paths, log)?;
    super::process_dotfiles(&dotfiles, Action::Remove, dry_run, log);
    super::prune(&setup.repository, dry_run, log)
}
