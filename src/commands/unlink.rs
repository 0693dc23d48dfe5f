//! Command: remove links from the home directory.
use anyhow::Result;
use std::path::PathBuf;

use super::{Action, CommandSetup};
use crate::cli::{GlobalOpts, OptionalPathsOpts};
use crate::logging::{Log, Logger};

/// Run the unlink command.
///
/// # Errors
///
/// Returns an error if setup or pruning fails, or any dotfile could not be
/// unlinked.
pub fn run(global: &GlobalOpts, opts: &OptionalPathsOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    execute(&setup, &opts.paths, global.dry_run, log)?;
    super::finish(log)
}

fn execute(setup: &CommandSetup, paths: &[PathBuf], dry_run: bool, log: &dyn Log) -> Result<()> {
    log.stage("Unlinking dotfiles");
    let dotfiles = setup.select(paths, log)?;
    super::process_dotfiles(&dotfiles, Action::Unlink, dry_run, log);
    super::prune(&setup.repository, dry_run, log)
}
