//! A tracked dotfile and the symlink primitive acting on it.
use std::cmp::Ordering;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::DotfileError;

/// One tracked pair: the symlink in the home directory and the repository
/// file it points at.
///
/// Ordering and equality follow `name` first; `target` only breaks ties so
/// the order stays total.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dotfile {
    /// Absolute home-side path (where the symlink lives).
    pub name: PathBuf,
    /// Absolute repository-side path (what the symlink points to).
    pub target: PathBuf,
}

/// Link status of a dotfile, as observed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotfileState {
    /// `name` is a symlink to `target`.
    Linked,
    /// Nothing exists at `name`.
    Unlinked,
    /// Something else occupies `name`.
    Conflict {
        /// What was found instead of the expected link.
        reason: String,
    },
}

impl fmt::Display for DotfileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linked => write!(f, "ok"),
            Self::Unlinked => write!(f, "unlinked"),
            Self::Conflict { reason } => write!(f, "conflict: {reason}"),
        }
    }
}

/// Result of a successful dotfile operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotfileChange {
    /// The filesystem was changed.
    Applied,
    /// Already in the requested state; nothing was touched.
    AlreadyCorrect,
}

impl Ord for Dotfile {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.target.cmp(&other.target))
    }
}

impl PartialOrd for Dotfile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Dotfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name.display())
    }
}

impl Dotfile {
    /// Pair a home-side `name` with a repository-side `target`.
    #[must_use]
    pub const fn new(name: PathBuf, target: PathBuf) -> Self {
        Self { name, target }
    }

    /// Inspect `name` and report whether it links to `target`.
    #[must_use]
    pub fn state(&self) -> DotfileState {
        let Ok(meta) = std::fs::symlink_metadata(&self.name) else {
            return DotfileState::Unlinked;
        };

        if !meta.is_symlink() {
            let reason = if meta.is_dir() {
                "directory"
            } else {
                "regular file"
            };
            return DotfileState::Conflict {
                reason: reason.to_string(),
            };
        }

        match std::fs::read_link(&self.name) {
            Ok(existing) if self.points_at_target(&existing) => DotfileState::Linked,
            Ok(existing) => DotfileState::Conflict {
                reason: format!("points to {}", existing.display()),
            },
            Err(e) => DotfileState::Conflict {
                reason: e.to_string(),
            },
        }
    }

    /// Create the symlink `name -> target`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Fails when something else occupies `name`, when `target` is missing,
    /// or on I/O failure.
    pub fn link(&self) -> Result<DotfileChange, DotfileError> {
        match self.state() {
            DotfileState::Linked => return Ok(DotfileChange::AlreadyCorrect),
            DotfileState::Conflict { reason } => {
                return Err(DotfileError::Conflict {
                    name: self.name.clone(),
                    reason,
                });
            }
            DotfileState::Unlinked => {}
        }

        if std::fs::symlink_metadata(&self.target).is_err() {
            return Err(DotfileError::TargetMissing {
                target: self.target.clone(),
            });
        }

        ensure_parent_dir(&self.name)?;
        create_symlink(&self.target, &self.name).map_err(io_error(&self.name))?;
        Ok(DotfileChange::Applied)
    }

    /// Remove the symlink at `name`.
    ///
    /// # Errors
    ///
    /// Fails when `name` is something other than our link, or on I/O failure.
    pub fn unlink(&self) -> Result<DotfileChange, DotfileError> {
        match self.state() {
            DotfileState::Unlinked => Ok(DotfileChange::AlreadyCorrect),
            DotfileState::Conflict { .. } => Err(DotfileError::NotLinked {
                name: self.name.clone(),
            }),
            DotfileState::Linked => {
                remove_symlink(&self.name).map_err(io_error(&self.name))?;
                Ok(DotfileChange::Applied)
            }
        }
    }

    /// Move the home file into the repository and link it back.
    ///
    /// # Errors
    ///
    /// Fails when `name` is already a symlink, when `target` already exists,
    /// or on I/O failure.
    pub fn add(&self) -> Result<DotfileChange, DotfileError> {
        match std::fs::symlink_metadata(&self.name) {
            Ok(meta) if meta.is_symlink() => {
                return Err(DotfileError::AlreadyLinked {
                    name: self.name.clone(),
                });
            }
            Ok(_) => {}
            Err(e) => return Err(io_error(&self.name)(e)),
        }

        if std::fs::symlink_metadata(&self.target).is_ok() {
            return Err(DotfileError::TargetExists {
                target: self.target.clone(),
            });
        }

        ensure_parent_dir(&self.target)?;
        move_file(&self.name, &self.target)?;
        create_symlink(&self.target, &self.name).map_err(io_error(&self.name))?;
        Ok(DotfileChange::Applied)
    }

    /// Unlink and move the repository file back to `name`.
    ///
    /// # Errors
    ///
    /// Fails when `name` is not our link, or on I/O failure.
    pub fn remove(&self) -> Result<DotfileChange, DotfileError> {
        if self.state() != DotfileState::Linked {
            return Err(DotfileError::NotLinked {
                name: self.name.clone(),
            });
        }
        if std::fs::symlink_metadata(&self.target).is_err() {
            return Err(DotfileError::TargetMissing {
                target: self.target.clone(),
            });
        }

        remove_symlink(&self.name).map_err(io_error(&self.name))?;
        move_file(&self.target, &self.name)?;
        Ok(DotfileChange::Applied)
    }

    /// Compare a link's text with `target`, resolving relative links against
    /// the directory holding `name`.
    fn points_at_target(&self, link: &Path) -> bool {
        if link.is_absolute() {
            return paths_equal(link, &self.target);
        }
        self.name
            .parent()
            .is_some_and(|parent| paths_equal(&parent.join(link), &self.target))
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> DotfileError + '_ {
    move |source| DotfileError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), DotfileError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    Ok(())
}

/// Move a regular file.  Prefers an atomic rename; falls back to copy+delete
/// when the rename crosses a filesystem boundary.
fn move_file(from: &Path, to: &Path) -> Result<(), DotfileError> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    std::fs::copy(from, to).map_err(io_error(to))?;
    if let Err(e) = std::fs::remove_file(from) {
        let _ = std::fs::remove_file(to);
        return Err(io_error(from)(e));
    }
    Ok(())
}

/// Compare two paths, ignoring `.`/`..` spelling differences.
fn paths_equal(a: &Path, b: &Path) -> bool {
    let root = Path::new("/");
    crate::operations::normalize_path(a, root) == crate::operations::normalize_path(b, root)
}

/// Create a symlink at `link` pointing to `target`.
#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

/// Create a file symlink at `link` pointing to `target` (requires developer
/// mode or elevation).
#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

/// Remove the symlink at `path` without touching what it points to.
fn remove_symlink(path: &Path) -> io::Result<()> {
    std::fs::remove_file(path)
}
