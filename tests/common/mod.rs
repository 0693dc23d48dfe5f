// Shared helpers for integration tests.
//
// Provides a temporary home directory with a repository inside it and a
// fluent builder so each integration test can set up an isolated environment
// without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use dotfiles_repo::cli::GlobalOpts;
use dotfiles_repo::config::Settings;
use dotfiles_repo::repository::Repository;

/// An isolated home directory backed by a [`tempfile::TempDir`].
///
/// Layout:
/// - `home/`               — the home root
/// - `home/Dotfiles/`      — the repository
/// - `config.toml`         — empty config file, outside home
pub struct IntegrationTestContext {
    /// Temporary directory holding home, repository, and config.
    pub root: tempfile::TempDir,
    /// Whether repository names keep their leading dot.
    pub dot: bool,
}

impl IntegrationTestContext {
    /// Create a new context with an empty home and repository.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(root.path().join("home/Dotfiles")).expect("create repository");
        std::fs::write(root.path().join("config.toml"), "").expect("write config.toml");
        Self { root, dot: true }
    }

    /// Path to the home root.
    pub fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    /// Path to the repository root.
    pub fn repo(&self) -> PathBuf {
        self.home().join("Dotfiles")
    }

    /// Path to the config file.
    pub fn config(&self) -> PathBuf {
        self.root.path().join("config.toml")
    }

    /// Resolved settings for this context.
    pub fn settings(&self) -> Settings {
        Settings {
            repository: self.repo(),
            home: self.home(),
            ignore: vec![".git".to_string(), "README.md".to_string()],
            dot: self.dot,
        }
    }

    /// Open the repository on the real filesystem.
    pub fn repository(&self) -> Repository {
        Repository::open(&self.settings()).expect("open repository")
    }

    /// Global options pointing every setting at this context.
    pub fn global_opts(&self, dry_run: bool) -> GlobalOpts {
        GlobalOpts {
            dry_run,
            repository: Some(self.repo()),
            home: Some(self.home()),
            config: Some(self.config()),
            ignore: Vec::new(),
            no_dot: !self.dot,
        }
    }

    /// Whether `path` is a symlink pointing at `target`.
    pub fn is_link_to(path: &Path, target: &Path) -> bool {
        std::fs::read_link(path).is_ok_and(|t| t == target)
    }
}

/// Fluent builder for [`IntegrationTestContext`].
///
/// Allows individual tests to customise the home directory and repository
/// before the context is finalised.
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new, empty context.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Use the no-dot convention: repository names lose their leading dot.
    pub fn without_dot(mut self) -> Self {
        self.ctx.dot = false;
        self
    }

    /// Write `content` to `home/<rel>`.
    pub fn with_home_file(self, rel: &str, content: &str) -> Self {
        write(&self.ctx.home().join(rel), content);
        self
    }

    /// Write `content` to `home/Dotfiles/<rel>`.
    pub fn with_repo_file(self, rel: &str, content: &str) -> Self {
        write(&self.ctx.repo().join(rel), content);
        self
    }

    /// Create an empty directory at `home/Dotfiles/<rel>`.
    pub fn with_repo_dir(self, rel: &str) -> Self {
        std::fs::create_dir_all(self.ctx.repo().join(rel)).expect("create repo dir");
        self
    }

    /// Overwrite the config file.
    pub fn with_config(self, content: &str) -> Self {
        std::fs::write(self.ctx.config(), content).expect("write config.toml");
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}
