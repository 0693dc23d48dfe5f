//! Settings resolution: config file, environment, and command-line overrides.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Basenames ignored when no `ignore` list is configured.
pub const DEFAULT_IGNORE: &[&str] = &[".git", ".gitignore", ".DS_Store", "README.md"];

/// Repository location used when nothing else is configured, relative to home.
pub const DEFAULT_REPOSITORY: &str = "Dotfiles";

/// On-disk shape of `config.toml`.  Every field is optional.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Repository directory; `~` expands to the home root.
    pub repository: Option<String>,
    /// Home directory override; `~` expands to `$HOME`.
    pub home: Option<String>,
    /// Whether repository names keep their leading dot.
    pub dot: Option<bool>,
    /// Basenames to ignore.  Replaces the default list when present.
    pub ignore: Option<Vec<String>>,
}

/// Values given on the command line.  They win over everything else.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    /// `--repo`
    pub repository: Option<PathBuf>,
    /// `--home`
    pub home: Option<PathBuf>,
    /// `--config`
    pub config: Option<PathBuf>,
    /// `--ignore`, appended to the configured list.
    pub ignore: Vec<String>,
    /// `--no-dot`
    pub no_dot: bool,
}

/// Process environment captured once at startup.
#[derive(Debug, Default, Clone)]
pub struct Environment {
    /// `$HOME` (or `%USERPROFILE%` on Windows).
    pub home: Option<PathBuf>,
    /// `$DOTFILES_REPO`
    pub repository: Option<PathBuf>,
    /// `$XDG_CONFIG_HOME`
    pub config_home: Option<PathBuf>,
}

impl Environment {
    /// Read the relevant variables from the process environment.
    #[must_use]
    pub fn capture() -> Self {
        let var = |name: &str| {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        let home = if cfg!(target_os = "windows") {
            var("USERPROFILE").or_else(|| var("HOME"))
        } else {
            var("HOME")
        };
        Self {
            home,
            repository: var("DOTFILES_REPO"),
            config_home: var("XDG_CONFIG_HOME"),
        }
    }
}

/// Fully resolved configuration handed to the repository core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Repository root.
    pub repository: PathBuf,
    /// Home root.
    pub home: PathBuf,
    /// Ignored basenames, in configuration order without duplicates.
    pub ignore: Vec<String>,
    /// Dot convention: `true` keeps leading dots in the repository.
    pub dot: bool,
}

impl Settings {
    /// Load the config file and merge it with `env` and `overrides`.
    ///
    /// Precedence is command line, then environment, then config file, then
    /// built-in defaults.  A missing default config file is not an error; a
    /// missing file named with `--config` is.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or if no
    /// home directory can be determined.
    pub fn load(overrides: &Overrides, env: &Environment) -> Result<Self, ConfigError> {
        let file = match &overrides.config {
            Some(path) if !path.exists() => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                });
            }
            Some(path) => super::toml_loader::load_config(path)?,
            None => match default_config_path(env) {
                Some(path) => super::toml_loader::load_config(&path)?,
                None => FileConfig::default(),
            },
        };
        Self::resolve(&file, overrides, env)
    }

    /// Merge already-parsed `file` values with `env` and `overrides`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingHome`] if no home directory is known.
    pub fn resolve(
        file: &FileConfig,
        overrides: &Overrides,
        env: &Environment,
    ) -> Result<Self, ConfigError> {
        let home = match (&overrides.home, &file.home) {
            (Some(home), _) => home.clone(),
            (None, Some(home)) => expand_tilde(home, env.home.as_deref())?,
            (None, None) => env.home.clone().ok_or(ConfigError::MissingHome)?,
        };

        let repository = if let Some(repo) = &overrides.repository {
            repo.clone()
        } else if let Some(repo) = &env.repository {
            repo.clone()
        } else if let Some(repo) = &file.repository {
            expand_tilde(repo, Some(&home))?
        } else {
            home.join(DEFAULT_REPOSITORY)
        };

        let configured = file.ignore.clone().unwrap_or_else(|| {
            DEFAULT_IGNORE
                .iter()
                .map(|s| (*s).to_string())
                .collect()
        });
        let mut ignore: Vec<String> = Vec::new();
        for name in configured.into_iter().chain(overrides.ignore.iter().cloned()) {
            if !ignore.contains(&name) {
                ignore.push(name);
            }
        }

        let dot = !overrides.no_dot && file.dot.unwrap_or(true);

        Ok(Self {
            repository,
            home,
            ignore,
            dot,
        })
    }
}

/// `$XDG_CONFIG_HOME/dotfiles/config.toml`, else `~/.config/dotfiles/config.toml`.
#[must_use]
pub fn default_config_path(env: &Environment) -> Option<PathBuf> {
    env.config_home
        .clone()
        .or_else(|| env.home.as_ref().map(|h| h.join(".config")))
        .map(|dir| dir.join("dotfiles").join("config.toml"))
}

/// Expand a leading `~` or `~/` against `home`.
fn expand_tilde(value: &str, home: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let rest = if value == "~" {
        ""
    } else if let Some(rest) = value.strip_prefix("~/") {
        rest
    } else {
        return Ok(PathBuf::from(value));
    };
    let home = home.ok_or(ConfigError::MissingHome)?;
    Ok(if rest.is_empty() {
        home.to_path_buf()
    } else {
        home.join(rest)
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn env() -> Environment {
        Environment {
            home: Some(PathBuf::from("/home/u")),
            repository: None,
            config_home: None,
        }
    }

    #[test]
    fn defaults_without_config() {
        let s = Settings::resolve(&FileConfig::default(), &Overrides::default(), &env()).unwrap();
        assert_eq!(s.home, PathBuf::from("/home/u"));
        assert_eq!(s.repository, PathBuf::from("/home/u/Dotfiles"));
        assert!(s.dot);
        assert_eq!(s.ignore, DEFAULT_IGNORE);
    }

    #[test]
    fn file_values_expand_tilde() {
        let file = FileConfig {
            repository: Some("~/src/dots".to_string()),
            dot: Some(false),
            ignore: Some(vec!["README".to_string()]),
            ..FileConfig::default()
        };
        let s = Settings::resolve(&file, &Overrides::default(), &env()).unwrap();
        assert_eq!(s.repository, PathBuf::from("/home/u/src/dots"));
        assert!(!s.dot);
        assert_eq!(s.ignore, vec!["README"]);
    }

    #[test]
    fn repository_tilde_follows_configured_home() {
        let file = FileConfig {
            repository: Some("~/dots".to_string()),
            ..FileConfig::default()
        };
        let overrides = Overrides {
            home: Some(PathBuf::from("/tmp/fakehome")),
            ..Overrides::default()
        };
        let s = Settings::resolve(&file, &overrides, &env()).unwrap();
        assert_eq!(s.repository, PathBuf::from("/tmp/fakehome/dots"));
    }

    #[test]
    fn command_line_wins_over_env_and_file() {
        let file = FileConfig {
            repository: Some("/from/file".to_string()),
            dot: Some(true),
            ..FileConfig::default()
        };
        let mut e = env();
        e.repository = Some(PathBuf::from("/from/env"));
        let overrides = Overrides {
            repository: Some(PathBuf::from("/from/cli")),
            no_dot: true,
            ..Overrides::default()
        };
        let s = Settings::resolve(&file, &overrides, &e).unwrap();
        assert_eq!(s.repository, PathBuf::from("/from/cli"));
        assert!(!s.dot);
    }

    #[test]
    fn env_repository_wins_over_file() {
        let file = FileConfig {
            repository: Some("/from/file".to_string()),
            ..FileConfig::default()
        };
        let mut e = env();
        e.repository = Some(PathBuf::from("/from/env"));
        let s = Settings::resolve(&file, &Overrides::default(), &e).unwrap();
        assert_eq!(s.repository, PathBuf::from("/from/env"));
    }

    #[test]
    fn ignore_overrides_are_appended_without_duplicates() {
        let overrides = Overrides {
            ignore: vec![".git".to_string(), "Makefile".to_string()],
            ..Overrides::default()
        };
        let s = Settings::resolve(&FileConfig::default(), &overrides, &env()).unwrap();
        assert_eq!(s.ignore.iter().filter(|i| *i == ".git").count(), 1);
        assert_eq!(s.ignore.last().map(String::as_str), Some("Makefile"));
    }

    #[test]
    fn missing_home_is_an_error() {
        let err = Settings::resolve(
            &FileConfig::default(),
            &Overrides::default(),
            &Environment::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingHome));
    }

    #[test]
    fn default_config_path_prefers_xdg() {
        let mut e = env();
        assert_eq!(
            default_config_path(&e),
            Some(PathBuf::from("/home/u/.config/dotfiles/config.toml"))
        );
        e.config_home = Some(PathBuf::from("/xdg"));
        assert_eq!(
            default_config_path(&e),
            Some(PathBuf::from("/xdg/dotfiles/config.toml"))
        );
    }

    #[test]
    fn load_reads_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "repository = \"/srv/dots\"\ndot = false\nignore = [\".hg\"]\n",
        )
        .unwrap();
        let overrides = Overrides {
            config: Some(path),
            ..Overrides::default()
        };
        let s = Settings::load(&overrides, &env()).unwrap();
        assert_eq!(s.repository, PathBuf::from("/srv/dots"));
        assert!(!s.dot);
        assert_eq!(s.ignore, vec![".hg"]);
    }

    #[test]
    fn load_rejects_missing_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let overrides = Overrides {
            config: Some(dir.path().join("absent.toml")),
            ..Overrides::default()
        };
        assert!(matches!(
            Settings::load(&overrides, &env()),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn load_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "repo = \"/x\"\n").unwrap();
        let overrides = Overrides {
            config: Some(path),
            ..Overrides::default()
        };
        assert!(matches!(
            Settings::load(&overrides, &env()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
