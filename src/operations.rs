//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that the repository core can be
//! unit-tested without touching the real filesystem.  Production code uses
//! [`SystemFileSystemOps`]; tests use `MockFileSystemOps`.

use anyhow::{Context as _, Result};
use std::path::{Component, Path, PathBuf};

/// What a path refers to, as seen by the repository core.
///
/// Symlinks are followed, so a link to a directory is a [`Directory`] and a
/// dangling link is [`Missing`].
///
/// [`Directory`]: EntryKind::Directory
/// [`Missing`]: EntryKind::Missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Anything that is not a directory.
    File,
    /// A directory.
    Directory,
    /// Nothing exists at the path.
    Missing,
}

/// Order in which [`FileSystemOps::walk`] yields a directory relative to its
/// contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOrder {
    /// Directory first, then its contents.
    PreOrder,
    /// Contents first, then the directory.
    PostOrder,
}

/// One entry produced by a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Absolute path of the entry.
    pub path: PathBuf,
    /// Whether the entry is a directory.  Symlinks are never descended into
    /// and are reported as [`EntryKind::File`].
    pub kind: EntryKind,
}

/// Abstraction over the filesystem queries the repository core performs.
///
/// Implement this trait to swap in a mock during unit tests, keeping the
/// core independent of real I/O.  The production implementation is
/// [`SystemFileSystemOps`].
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Classify `path`.  A path that cannot be inspected counts as
    /// [`EntryKind::Missing`], like [`Path::exists`].
    fn entry_kind(&self, path: &Path) -> EntryKind;

    /// Returns the immediate child paths inside `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be opened or read as a directory.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Recursively list everything below `root` (excluding `root`), sorted by
    /// file name within each directory.
    ///
    /// `admit` is consulted for every entry; a rejected entry is skipped
    /// together with its whole subtree.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be read.
    fn walk(
        &self,
        root: &Path,
        order: WalkOrder,
        admit: &dyn Fn(&Path) -> bool,
    ) -> Result<Vec<WalkEntry>>;

    /// Create `path` and any missing ancestors.  Succeeds if it already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    fn ensure_dir(&self, path: &Path) -> Result<()>;

    /// Remove the empty directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is not empty or cannot be removed.
    fn remove_dir(&self, path: &Path) -> Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`]
/// and [`walkdir`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn entry_kind(&self, path: &Path) -> EntryKind {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_dir() => EntryKind::Directory,
            Ok(_) => EntryKind::File,
            Err(_) => EntryKind::Missing,
        }
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        std::fs::read_dir(path)
            .with_context(|| format!("reading directory {}", path.display()))?
            .map(|e| e.map(|entry| entry.path()).map_err(Into::into))
            .collect()
    }

    fn walk(
        &self,
        root: &Path,
        order: WalkOrder,
        admit: &dyn Fn(&Path) -> bool,
    ) -> Result<Vec<WalkEntry>> {
        let post_order = order == WalkOrder::PostOrder;
        let walker = walkdir::WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .contents_first(post_order);

        let mut entries = Vec::new();
        if post_order {
            // `filter_entry` skips the rest of the parent when it rejects a
            // directory yielded after its contents, so post-order walks filter
            // on every ancestor below `root` instead.
            let admitted = |path: &Path| {
                path.ancestors()
                    .take_while(|a| *a != root)
                    .all(admit)
            };
            for entry in walker {
                let entry = entry.with_context(|| format!("walking {}", root.display()))?;
                if admitted(entry.path()) {
                    entries.push(walk_entry(entry));
                }
            }
        } else {
            for entry in walker.into_iter().filter_entry(|e| admit(e.path())) {
                let entry = entry.with_context(|| format!("walking {}", root.display()))?;
                entries.push(walk_entry(entry));
            }
        }
        Ok(entries)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("creating directory {}", path.display()))
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        std::fs::remove_dir(path).with_context(|| format!("removing directory {}", path.display()))
    }
}

fn walk_entry(entry: walkdir::DirEntry) -> WalkEntry {
    let kind = if entry.file_type().is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::File
    };
    WalkEntry {
        path: entry.into_path(),
        kind,
    }
}

/// Make `path` absolute against `cwd` and fold away `.` and `..` components
/// without consulting the filesystem.
///
/// Symlinks are not resolved.
#[must_use]
pub fn normalize_path(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// [`normalize_path`] against the process working directory.
///
/// # Errors
///
/// Returns an error if `path` is relative and the working directory cannot be
/// determined.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(normalize_path(path, Path::new("/")));
    }
    let cwd = std::env::current_dir().context("reading current directory")?;
    Ok(normalize_path(path, &cwd))
}

/// In-memory [`FileSystemOps`] for unit tests.
///
/// Register files and directories with the builder-style methods; ancestors
/// are created implicitly.  `remove_dir` mutates the tree so prune tests can
/// observe convergence.
///
/// # Example
///
/// ```ignore
/// let fs = MockFileSystemOps::new()
///     .with_file("/repo/bashrc")
///     .with_dir("/repo/config/empty");
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    nodes: std::sync::Mutex<std::collections::BTreeMap<PathBuf, EntryKind>>,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, path: &Path, kind: EntryKind) {
        let mut nodes = self.nodes.lock().expect("mock nodes poisoned");
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            nodes.insert(ancestor.to_path_buf(), EntryKind::Directory);
        }
        nodes.insert(path.to_path_buf(), kind);
    }

    /// Register a regular file (and its ancestors as directories).
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>) -> Self {
        self.insert(&path.into(), EntryKind::File);
        self
    }

    /// Register a directory (and its ancestors).
    #[must_use]
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.insert(&path.into(), EntryKind::Directory);
        self
    }

    /// Returns `true` if `path` is currently present in the tree.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.nodes
            .lock()
            .expect("mock nodes poisoned")
            .contains_key(path)
    }

    fn children(&self, path: &Path) -> Vec<(PathBuf, EntryKind)> {
        self.nodes
            .lock()
            .expect("mock nodes poisoned")
            .iter()
            .filter(|(p, _)| p.parent() == Some(path))
            .map(|(p, k)| (p.clone(), *k))
            .collect()
    }

    fn visit(
        &self,
        dir: &Path,
        order: WalkOrder,
        admit: &dyn Fn(&Path) -> bool,
        out: &mut Vec<WalkEntry>,
    ) {
        for (path, kind) in self.children(dir) {
            if !admit(&path) {
                continue;
            }
            let entry = WalkEntry {
                path: path.clone(),
                kind,
            };
            if kind == EntryKind::Directory {
                if order == WalkOrder::PreOrder {
                    out.push(entry.clone());
                }
                self.visit(&path, order, admit, out);
                if order == WalkOrder::PostOrder {
                    out.push(entry);
                }
            } else {
                out.push(entry);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl FileSystemOps for MockFileSystemOps {
    fn entry_kind(&self, path: &Path) -> EntryKind {
        self.nodes
            .lock()
            .expect("mock nodes poisoned")
            .get(path)
            .copied()
            .unwrap_or(EntryKind::Missing)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if self.entry_kind(path) != EntryKind::Directory {
            anyhow::bail!("mock: not a directory: {}", path.display());
        }
        Ok(self.children(path).into_iter().map(|(p, _)| p).collect())
    }

    fn walk(
        &self,
        root: &Path,
        order: WalkOrder,
        admit: &dyn Fn(&Path) -> bool,
    ) -> Result<Vec<WalkEntry>> {
        let mut out = Vec::new();
        self.visit(root, order, admit, &mut out);
        Ok(out)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        self.insert(path, EntryKind::Directory);
        Ok(())
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        if !self.children(path).is_empty() {
            anyhow::bail!("mock: directory not empty: {}", path.display());
        }
        self.nodes
            .lock()
            .expect("mock nodes poisoned")
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| anyhow::anyhow!("mock: no such directory: {}", path.display()))
    }
}
