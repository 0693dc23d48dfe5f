//! Domain-specific error types for the dotfiles engine.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! The repository core returns typed errors ([`ValidationError`],
//! [`DotfileError`], [`ConfigError`]) while command handlers at the CLI
//! boundary convert them to [`anyhow::Error`] via the standard `?` operator.

use std::path::PathBuf;

use thiserror::Error;

/// Reasons a home-directory path cannot be tracked.
///
/// None of these indicate corruption: they are precondition failures that the
/// batch resolver reports and skips.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The path lies outside the configured home root.
    #[error("{}: not rooted in home directory", .0.display())]
    NotRootedInHome(PathBuf),

    /// The path lies inside the repository root.
    #[error("{}: already part of repository", .0.display())]
    AlreadyInRepository(PathBuf),

    /// The first segment below home has no leading dot to strip.  Only raised
    /// when the dot convention is off.
    #[error("{}: not a dotfile", .0.display())]
    NotDotted(PathBuf),

    /// The repository target's basename is in the ignore set.
    #[error("{}: targets an ignored file", .0.display())]
    IgnoredTarget(PathBuf),

    /// The path is a directory where a file was required.
    #[error("{}: is a directory", .0.display())]
    IsDirectory(PathBuf),
}

impl ValidationError {
    /// The rejected path.
    #[must_use]
    pub const fn path(&self) -> &PathBuf {
        match self {
            Self::NotRootedInHome(p)
            | Self::AlreadyInRepository(p)
            | Self::NotDotted(p)
            | Self::IgnoredTarget(p)
            | Self::IsDirectory(p) => p,
        }
    }
}

/// Errors raised by the symlink primitive acting on one dotfile.
#[derive(Error, Debug)]
pub enum DotfileError {
    /// Something other than the expected link occupies the home path.
    #[error("{}: conflict ({reason})", name.display())]
    Conflict {
        /// Home-side path.
        name: PathBuf,
        /// What was found instead.
        reason: String,
    },

    /// The repository already holds a file at the target path.
    #[error("{}: target already exists in repository", target.display())]
    TargetExists {
        /// Repository-side path.
        target: PathBuf,
    },

    /// The repository file the link should point at does not exist.
    #[error("{}: target missing from repository", target.display())]
    TargetMissing {
        /// Repository-side path.
        target: PathBuf,
    },

    /// The home path is not a symlink to the expected target.
    #[error("{}: not linked", name.display())]
    NotLinked {
        /// Home-side path.
        name: PathBuf,
    },

    /// The home path is already a symlink and cannot be added again.
    #[error("{}: already a symlink", name.display())]
    AlreadyLinked {
        /// Home-side path.
        name: PathBuf,
    },

    /// An I/O error occurred while touching `path`.
    #[error("{}: {source}", path.display())]
    Io {
        /// Path being operated on.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise from configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading the settings file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for the expected schema.
    #[error("Invalid TOML in {file}: {message}")]
    Parse {
        /// File that failed to parse.
        file: String,
        /// Parser message.
        message: String,
    },

    /// No home directory could be determined.
    #[error("cannot determine home directory: set HOME or pass --home")]
    MissingHome,
}
