//! Dotfiles repository manager.
//!
//! Keeps selected home-directory files in a single repository directory and
//! replaces each original with a symlink into that repository.  Files are
//! added, removed, linked and unlinked by home-side path; the repository
//! layout mirrors the home directory, optionally without the leading dot on
//! the first path segment.
//!
//! The public API is organised into these layers:
//!
//! - **[`config`]** — load `config.toml` and merge it with the environment
//!   and command line
//! - **[`repository`]** — path mapping, validation, traversal, and pruning
//! - **[`dotfile`]** — the symlink primitive acting on one tracked file
//! - **[`operations`]** — the filesystem abstraction the repository walks
//! - **[`commands`]** — top-level subcommand orchestration (`add`, `link`, …)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod dotfile;
pub mod error;
pub mod logging;
pub mod operations;
pub mod repository;
