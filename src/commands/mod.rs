//! Subcommand implementations and shared setup.

pub mod add;
pub mod link;
pub mod list;
pub mod remove;
pub mod unlink;
pub mod version;

use anyhow::{Context as _, Result};
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::config::{Environment, Settings, validation};
use crate::dotfile::{Dotfile, DotfileChange, DotfileState};
use crate::error::DotfileError;
use crate::logging::{Log, Logger, OutcomeStatus};
use crate::repository::Repository;

/// Shared state produced by the common command setup sequence.
///
/// Resolves settings and opens the repository so that each command does not
/// have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Resolved settings.
    pub settings: Settings,
    /// The opened repository.
    pub repository: Repository,
}

impl CommandSetup {
    /// Load settings from the environment, config file, and `global`, then
    /// open the repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or the
    /// repository directory cannot be created.
    pub fn init(global: &GlobalOpts, log: &dyn Log) -> Result<Self> {
        log.stage("Loading configuration");
        let settings = Settings::load(&global.overrides(), &Environment::capture())
            .context("failed to load configuration")?;
        Self::from_settings(settings, log)
    }

    /// Open the repository for already-resolved `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository directory cannot be created.
    pub fn from_settings(settings: Settings, log: &dyn Log) -> Result<Self> {
        log.debug(&format!("home: {}", settings.home.display()));
        log.debug(&format!("repository: {}", settings.repository.display()));
        log.debug(&format!("ignore: {}", settings.ignore.join(", ")));
        log.debug(&format!("dot convention: {}", settings.dot));

        let warnings = validation::validate(&settings);
        if !warnings.is_empty() {
            log.warn(&format!(
                "found {} configuration warning(s):",
                warnings.len()
            ));
            for warning in &warnings {
                log.warn(&format!(
                    "  {} [{}]: {}",
                    warning.setting, warning.item, warning.message
                ));
            }
        }

        let repository = Repository::open(&settings).with_context(|| {
            format!("failed to open repository {}", settings.repository.display())
        })?;
        Ok(Self {
            settings,
            repository,
        })
    }

    /// Dotfiles named by `paths`, or every tracked dotfile when `paths` is
    /// empty.  Rejected paths are reported as warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository or a named directory cannot be read.
    pub fn select(&self, paths: &[PathBuf], log: &dyn Log) -> Result<Vec<Dotfile>> {
        if paths.is_empty() {
            self.repository.contents()
        } else {
            self.repository.dotfiles(paths, log)
        }
    }
}

/// A per-dotfile operation driven by [`process_dotfiles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// [`Dotfile::add`]
    Add,
    /// [`Dotfile::remove`]
    Remove,
    /// [`Dotfile::link`]
    Link,
    /// [`Dotfile::unlink`]
    Unlink,
}

impl Action {
    /// Verb used in log messages.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Link => "link",
            Self::Unlink => "unlink",
        }
    }

    /// Whether `dotfile` already is in the state this action produces.
    fn is_satisfied(self, dotfile: &Dotfile) -> bool {
        match self {
            Self::Link => dotfile.state() == DotfileState::Linked,
            Self::Unlink => dotfile.state() == DotfileState::Unlinked,
            Self::Add | Self::Remove => false,
        }
    }

    fn apply(self, dotfile: &Dotfile) -> Result<DotfileChange, DotfileError> {
        match self {
            Self::Add => dotfile.add(),
            Self::Remove => dotfile.remove(),
            Self::Link => dotfile.link(),
            Self::Unlink => dotfile.unlink(),
        }
    }
}

/// Apply `action` to every dotfile, recording one outcome each.
///
/// Failures are recorded and logged; processing continues with the next
/// dotfile.  In dry-run mode nothing is changed.
pub fn process_dotfiles(dotfiles: &[Dotfile], action: Action, dry_run: bool, log: &dyn Log) {
    let verb = action.verb();
    for dotfile in dotfiles {
        let name = dotfile.name.display().to_string();

        if action.is_satisfied(dotfile) {
            log.debug(&format!("ok: {name}"));
            log.record(&name, OutcomeStatus::Unchanged, None);
            continue;
        }

        if dry_run {
            log.dry_run(&format!("would {verb}: {name}"));
            log.record(&name, OutcomeStatus::DryRun, None);
            continue;
        }

        match action.apply(dotfile) {
            Ok(DotfileChange::Applied) => {
                log.debug(&format!("{verb}: {name}"));
                log.record(&name, OutcomeStatus::Ok, None);
            }
            Ok(DotfileChange::AlreadyCorrect) => {
                log.record(&name, OutcomeStatus::Unchanged, None);
            }
            Err(e) => {
                log.error(&format!("failed to {verb} {name}: {e}"));
                log.record(&name, OutcomeStatus::Failed, Some(&e.to_string()));
            }
        }
    }
}

/// Remove empty directories left behind in the repository.
///
/// # Errors
///
/// Returns an error if the repository cannot be walked or a directory cannot
/// be removed.
pub fn prune(repository: &Repository, dry_run: bool, log: &dyn Log) -> Result<()> {
    if dry_run {
        log.dry_run("would prune empty repository directories");
        return Ok(());
    }
    for dir in repository.prune()? {
        log.debug(&format!("pruned {}", dir.display()));
    }
    Ok(())
}

/// Print the summary and bail if any dotfile failed.
///
/// # Errors
///
/// Returns an error if one or more dotfiles recorded a failure.
pub fn finish(log: &Logger) -> Result<()> {
    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} dotfile(s) failed");
    }
    Ok(())
}
