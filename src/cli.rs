//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Overrides;

/// Top-level CLI entry point for the dotfiles repository manager.
#[derive(Parser, Debug)]
#[command(
    name = "dotfiles",
    about = "Track home-directory dotfiles in a repository and link them back",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Repository directory (default: ~/Dotfiles, or $DOTFILES_REPO)
    #[arg(short = 'r', long = "repo", global = true)]
    pub repository: Option<PathBuf>,

    /// Override the home directory
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Config file (default: $XDG_CONFIG_HOME/dotfiles/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Additional basenames to ignore
    #[arg(long, global = true, value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Strip the leading dot from names inside the repository
    #[arg(long = "no-dot", global = true)]
    pub no_dot: bool,
}

impl GlobalOpts {
    /// Command-line values that take precedence over the config file.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            repository: self.repository.clone(),
            home: self.home.clone(),
            config: self.config.clone(),
            ignore: self.ignore.clone(),
            no_dot: self.no_dot,
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Move files into the repository and link them back
    Add(PathsOpts),
    /// Move files out of the repository and restore them
    Remove(PathsOpts),
    /// Link repository files into the home directory
    Link(OptionalPathsOpts),
    /// Remove links from the home directory
    Unlink(OptionalPathsOpts),
    /// List tracked dotfiles and their link state
    List(ListOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Subcommand name, used for the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Remove(_) => "remove",
            Self::Link(_) => "link",
            Self::Unlink(_) => "unlink",
            Self::List(_) => "list",
            Self::Version => "version",
        }
    }
}

/// Options for subcommands that need at least one path.
#[derive(Parser, Debug, Clone)]
pub struct PathsOpts {
    /// Home-directory files or directories
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

/// Options for subcommands that default to the whole repository.
#[derive(Parser, Debug, Clone)]
pub struct OptionalPathsOpts {
    /// Home-directory files or directories (default: every tracked file)
    pub paths: Vec<PathBuf>,
}

/// Options for the `list` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ListOpts {
    /// Show the repository target of each dotfile
    #[arg(short, long)]
    pub targets: bool,
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_add_paths() {
        let cli = Cli::parse_from(["dotfiles", "add", "~/.bashrc", "/home/u/.vimrc"]);
        assert!(
            matches!(&cli.command, Command::Add(_)),
            "Expected Add command"
        );
        if let Command::Add(opts) = cli.command {
            assert_eq!(opts.paths.len(), 2);
            assert_eq!(opts.paths[1], PathBuf::from("/home/u/.vimrc"));
        }
    }

    #[test]
    fn add_requires_paths() {
        assert!(Cli::try_parse_from(["dotfiles", "add"]).is_err());
        assert!(Cli::try_parse_from(["dotfiles", "remove"]).is_err());
    }

    #[test]
    fn link_paths_are_optional() {
        let cli = Cli::parse_from(["dotfiles", "link"]);
        assert!(
            matches!(&cli.command, Command::Link(opts) if opts.paths.is_empty()),
            "Expected Link with no paths"
        );
        let cli = Cli::parse_from(["dotfiles", "unlink", "/home/u/.zshrc"]);
        assert!(matches!(&cli.command, Command::Unlink(opts) if opts.paths.len() == 1));
    }

    #[test]
    fn parse_dry_run_short() {
        let cli = Cli::parse_from(["dotfiles", "-d", "link"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_dry_run_after_subcommand() {
        let cli = Cli::parse_from(["dotfiles", "unlink", "--dry-run"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_repo_override() {
        let cli = Cli::parse_from(["dotfiles", "-r", "/srv/dots", "list"]);
        assert_eq!(cli.global.repository, Some(PathBuf::from("/srv/dots")));
        let cli = Cli::parse_from(["dotfiles", "list", "--repo", "/srv/dots"]);
        assert_eq!(cli.global.repository, Some(PathBuf::from("/srv/dots")));
    }

    #[test]
    fn parse_ignore_list_and_repeat() {
        let cli = Cli::parse_from([
            "dotfiles", "--ignore", "a,b", "--ignore", "c", "list",
        ]);
        assert_eq!(cli.global.ignore, vec!["a", "b", "c"]);
    }

    #[test]
    fn overrides_carry_global_options() {
        let cli = Cli::parse_from([
            "dotfiles",
            "--home",
            "/tmp/h",
            "--config",
            "/tmp/c.toml",
            "--no-dot",
            "list",
        ]);
        let o = cli.global.overrides();
        assert_eq!(o.home, Some(PathBuf::from("/tmp/h")));
        assert_eq!(o.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(o.no_dot);
        assert!(o.repository.is_none());
    }

    #[test]
    fn parse_list_targets() {
        let cli = Cli::parse_from(["dotfiles", "list", "-t"]);
        assert!(matches!(&cli.command, Command::List(opts) if opts.targets));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["dotfiles", "-v", "list"]);
        assert!(cli.verbose);
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["dotfiles", "version"]);
        assert!(matches!(cli.command, Command::Version));
        assert_eq!(cli.command.name(), "version");
    }
}
