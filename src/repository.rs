//! The dotfiles repository: path mapping, candidate validation, traversal,
//! and pruning.
//!
//! Every file in the repository corresponds to one path under the home
//! directory.  With the dot convention enabled the relative path is kept as
//! is (`.config/git/config` ↔ `~/.config/git/config`); with it disabled the
//! first segment loses its leading dot inside the repository
//! (`bashrc` ↔ `~/.bashrc`).
use anyhow::Result;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::config::Settings;
use crate::dotfile::Dotfile;
use crate::error::ValidationError;
use crate::logging::Log;
use crate::operations::{
    EntryKind, FileSystemOps, SystemFileSystemOps, WalkOrder, absolute_path,
};

/// Outcome of resolving a batch of candidate paths.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Candidates that passed validation, in traversal order.
    pub dotfiles: Vec<Dotfile>,
    /// Candidates that did not, each with the reason.
    pub rejected: Vec<ValidationError>,
}

/// A directory of tracked files mirrored into the home directory.
#[derive(Debug)]
pub struct Repository {
    repo_root: PathBuf,
    home_root: PathBuf,
    ignore: BTreeSet<String>,
    dot: bool,
    fs_ops: Arc<dyn FileSystemOps>,
}

impl Repository {
    /// Open the repository described by `settings` on the real filesystem,
    /// creating its root directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if a root cannot be made absolute or the repository
    /// directory cannot be created.
    pub fn open(settings: &Settings) -> Result<Self> {
        Self::with_fs_ops(settings, Arc::new(SystemFileSystemOps))
    }

    /// Like [`open`](Self::open) with an injected filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if a root cannot be made absolute or the repository
    /// directory cannot be created.
    pub fn with_fs_ops(settings: &Settings, fs_ops: Arc<dyn FileSystemOps>) -> Result<Self> {
        let repo_root = absolute_path(&settings.repository)?;
        let home_root = absolute_path(&settings.home)?;
        fs_ops.ensure_dir(&repo_root)?;
        Ok(Self {
            repo_root,
            home_root,
            ignore: settings.ignore.iter().cloned().collect(),
            dot: settings.dot,
            fs_ops,
        })
    }

    /// Repository root directory.
    #[must_use]
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Home root directory.
    #[must_use]
    pub fn home_root(&self) -> &Path {
        &self.home_root
    }

    /// Whether `path`'s basename is in the ignore set.
    #[must_use]
    pub fn is_ignored(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| self.ignore.contains(n))
    }

    /// Repository path for the home-side `path`.  Pure; `path` need not
    /// exist or lie under the home root.
    #[must_use]
    pub fn home_to_repo(&self, path: &Path) -> PathBuf {
        let rel = relative_to(path, &self.home_root);
        if self.dot {
            self.repo_root.join(rel)
        } else {
            self.repo_root.join(strip_leading_dot(&rel))
        }
    }

    /// Home path for the repository-side `path`.  Inverse of
    /// [`home_to_repo`](Self::home_to_repo).
    #[must_use]
    pub fn repo_to_home(&self, path: &Path) -> PathBuf {
        let rel = relative_to(path, &self.repo_root);
        if self.dot {
            self.home_root.join(rel)
        } else {
            self.home_root.join(prepend_dot(&rel))
        }
    }

    /// Check that the home-side `path` may be tracked and build its
    /// [`Dotfile`].
    ///
    /// Checks run in a fixed order and stop at the first failure: rooted in
    /// home, outside the repository, dotted first segment (dot convention
    /// off only), target not ignored, not a directory.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] of the first failed check.
    pub fn validate(&self, path: &Path) -> Result<Dotfile, ValidationError> {
        if !is_strictly_below(path, &self.home_root) {
            return Err(ValidationError::NotRootedInHome(path.to_path_buf()));
        }
        if is_strictly_below(path, &self.repo_root) {
            return Err(ValidationError::AlreadyInRepository(path.to_path_buf()));
        }
        if !self.dot && !has_leading_dot(&relative_to(path, &self.home_root)) {
            return Err(ValidationError::NotDotted(path.to_path_buf()));
        }

        let target = self.home_to_repo(path);
        if self.is_ignored(&target) {
            return Err(ValidationError::IgnoredTarget(path.to_path_buf()));
        }
        if self.fs_ops.entry_kind(path) == EntryKind::Directory {
            return Err(ValidationError::IsDirectory(path.to_path_buf()));
        }

        Ok(Dotfile::new(path.to_path_buf(), target))
    }

    /// Expand and validate a batch of candidate paths.
    ///
    /// Paths are made absolute and deduplicated; directories are replaced by
    /// the non-ignored files beneath them.  Validation failures are collected,
    /// not raised.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory is unavailable or a
    /// directory cannot be walked.
    pub fn resolve<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Resolution> {
        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut candidates: Vec<PathBuf> = Vec::new();
        let mut resolution = Resolution::default();

        for path in paths {
            let path = absolute_path(path.as_ref())?;
            if !seen.insert(path.clone()) {
                continue;
            }
            if self.fs_ops.entry_kind(&path) != EntryKind::Directory {
                candidates.push(path);
                continue;
            }
            if self.is_ignored(&self.home_to_repo(&path)) {
                resolution
                    .rejected
                    .push(ValidationError::IgnoredTarget(path));
                continue;
            }
            for file in self.files_below(&path)? {
                if seen.insert(file.clone()) {
                    candidates.push(file);
                }
            }
        }

        for path in candidates {
            match self.validate(&path) {
                Ok(dotfile) => resolution.dotfiles.push(dotfile),
                Err(e) => resolution.rejected.push(e),
            }
        }
        Ok(resolution)
    }

    /// [`resolve`](Self::resolve), reporting every rejected path through
    /// `log` and returning only the valid dotfiles.
    ///
    /// # Errors
    ///
    /// Propagates filesystem errors from [`resolve`](Self::resolve).
    pub fn dotfiles<P: AsRef<Path>>(&self, paths: &[P], log: &dyn Log) -> Result<Vec<Dotfile>> {
        let resolution = self.resolve(paths)?;
        for rejected in &resolution.rejected {
            log.warn(&rejected.to_string());
        }
        Ok(resolution.dotfiles)
    }

    /// Every tracked file in the repository, sorted by home-side name.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be walked.
    pub fn contents(&self) -> Result<Vec<Dotfile>> {
        let mut dotfiles: Vec<Dotfile> = self
            .files_below(&self.repo_root)?
            .into_iter()
            .map(|target| Dotfile::new(self.repo_to_home(&target), target))
            .collect();
        dotfiles.sort();
        Ok(dotfiles)
    }

    /// Remove every empty, non-ignored directory below the repository root,
    /// deepest first, so a parent emptied by its children goes in the same
    /// pass.  The root itself is kept.
    ///
    /// Returns the removed directories in removal order.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be walked or a directory
    /// cannot be removed.
    pub fn prune(&self) -> Result<Vec<PathBuf>> {
        let admit = |p: &Path| !self.is_ignored(p);
        let mut removed = Vec::new();
        for entry in self
            .fs_ops
            .walk(&self.repo_root, WalkOrder::PostOrder, &admit)?
        {
            if entry.kind != EntryKind::Directory {
                continue;
            }
            if self.fs_ops.read_dir(&entry.path)?.is_empty() {
                self.fs_ops.remove_dir(&entry.path)?;
                removed.push(entry.path);
            }
        }
        Ok(removed)
    }

    /// Non-ignored, non-directory entries below `dir`, in walk order.
    fn files_below(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let admit = |p: &Path| !self.is_ignored(p);
        Ok(self
            .fs_ops
            .walk(dir, WalkOrder::PreOrder, &admit)?
            .into_iter()
            .filter(|e| e.kind != EntryKind::Directory)
            .map(|e| e.path)
            .collect())
    }
}

impl fmt::Display for Repository {
    /// One home-side name per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let contents = self.contents().map_err(|_| fmt::Error)?;
        let lines: Vec<String> = contents.iter().map(ToString::to_string).collect();
        write!(f, "{}", lines.join("\n"))
    }
}

/// `path` relative to `base`, with `..` segments when `path` is outside.
fn relative_to(path: &Path, base: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

fn is_strictly_below(path: &Path, root: &Path) -> bool {
    path != root && path.starts_with(root)
}

/// Rebuild `rel` with its first segment passed through `f`.  Paths whose
/// first segment is not a plain UTF-8 name are returned unchanged.
fn map_first_segment(rel: &Path, f: impl FnOnce(&str) -> String) -> PathBuf {
    let mut components = rel.components();
    let Some(Component::Normal(first)) = components.next() else {
        return rel.to_path_buf();
    };
    let Some(first) = first.to_str() else {
        return rel.to_path_buf();
    };

    let mut out = PathBuf::from(f(first));
    let rest = components.as_path();
    if !rest.as_os_str().is_empty() {
        out.push(rest);
    }
    out
}

/// Whether the first segment of `rel` starts with a dot.
fn has_leading_dot(rel: &Path) -> bool {
    matches!(
        rel.components().next(),
        Some(Component::Normal(first)) if first.to_str().is_some_and(|f| f.starts_with('.'))
    )
}

/// `.bashrc/x` → `bashrc/x`.  Segments without a leading dot are kept.
fn strip_leading_dot(rel: &Path) -> PathBuf {
    map_first_segment(rel, |first| {
        first.strip_prefix('.').unwrap_or(first).to_string()
    })
}

/// `bashrc/x` → `.bashrc/x`.
fn prepend_dot(rel: &Path) -> PathBuf {
    map_first_segment(rel, |first| format!(".{first}"))
}
