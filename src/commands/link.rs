//! Command: link repository files into the home directory.
use anyhow::Result;
use std::path::PathBuf;

use super::{Action, CommandSetup};
use crate::cli::{GlobalOpts, OptionalPathsOpts};
use crate::logging::{Log, Logger};

/// Run the link command.
///
/// # Errors
///
/// Returns an error if setup fails or any dotfile could not be linked.
pub fn run(global: &GlobalOpts, opts: &OptionalPathsOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    execute(&setup, &opts.paths, global.dry_run, log)?;
    super::finish(log)
}

fn execute(setup: &CommandSetup, paths: &[PathBuf], dry_run: bool, log: &dyn Log) -> Result<()> {
    log.stage("Linking dotfiles");
    let dotfiles = setup.select(paths, log)?;
    super::process_dotfiles(&dotfiles, Action::Link, dry_run, log);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::commands::test_helpers::Fixture;
    use crate::logging::CaptureLog;

    #[test]
    fn link_all_creates_every_link() {
        let fx = Fixture::new();
        let a = fx.write_repo(".gitconfig", "[user]");
        let b = fx.write_repo(".config/fish/config.fish", "set -x");
        let log = CaptureLog::default();
        let setup = CommandSetup::from_settings(fx.settings(), &log).unwrap();

        execute(&setup, &[], false, &log).unwrap();

        assert_eq!(std::fs::read_link(fx.home.join(".gitconfig")).unwrap(), a);
        assert_eq!(
            std::fs::read_link(fx.home.join(".config/fish/config.fish")).unwrap(),
            b
        );
    }

    #[test]
    fn link_is_idempotent() {
        let fx = Fixture::new();
        fx.write_repo(".tmux.conf", "set -g mouse on");
        let log = CaptureLog::default();
        let setup = CommandSetup::from_settings(fx.settings(), &log).unwrap();

        execute(&setup, &[], false, &log).unwrap();
        execute(&setup, &[], false, &log).unwrap();

        let records = log.at("record");
        assert!(records[0].contains("Ok"));
        assert!(records[1].contains("Unchanged"));
    }

    #[test]
    fn link_selected_paths_only() {
        let fx = Fixture::new();
        fx.write_repo(".a", "a");
        fx.write_repo(".b", "b");
        let log = CaptureLog::default();
        let setup = CommandSetup::from_settings(fx.settings(), &log).unwrap();

        execute(&setup, &[fx.home.join(".a")], false, &log).unwrap();

        assert!(std::fs::symlink_metadata(fx.home.join(".a")).is_ok());
        assert!(std::fs::symlink_metadata(fx.home.join(".b")).is_err());
    }
}
