//! Sanity checks on resolved settings, reported as warnings.
use std::path::MAIN_SEPARATOR;

use super::settings::Settings;

/// A validation warning detected after settings are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The setting that triggered the warning (e.g. `"ignore"`).
    pub setting: String,
    /// The specific value involved.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Build a warning.
    #[must_use]
    pub fn new(
        setting: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            setting: setting.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

/// Check `settings` for values that are legal but almost certainly wrong.
#[must_use]
pub fn validate(settings: &Settings) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for name in &settings.ignore {
        if name.is_empty() {
            warnings.push(ValidationWarning::new(
                "ignore",
                name,
                "empty entry never matches",
            ));
        } else if name.contains('/') || name.contains(MAIN_SEPARATOR) {
            warnings.push(ValidationWarning::new(
                "ignore",
                name,
                "entries match basenames only; a path never matches",
            ));
        }
    }

    if settings.repository == settings.home {
        warnings.push(ValidationWarning::new(
            "repository",
            settings.repository.display().to_string(),
            "repository is the home directory itself",
        ));
    } else if !settings.repository.starts_with(&settings.home) {
        warnings.push(ValidationWarning::new(
            "repository",
            settings.repository.display().to_string(),
            "repository is outside the home directory",
        ));
    }

    warnings
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn settings() -> Settings {
        Settings {
            repository: PathBuf::from("/home/u/Dotfiles"),
            home: PathBuf::from("/home/u"),
            ignore: vec![".git".to_string()],
            dot: true,
        }
    }

    #[test]
    fn clean_settings_have_no_warnings() {
        assert!(validate(&settings()).is_empty());
    }

    #[test]
    fn path_like_ignore_entry_warns() {
        let mut s = settings();
        s.ignore.push(".config/nvim".to_string());
        let warnings = validate(&s);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].setting, "ignore");
        assert_eq!(warnings[0].item, ".config/nvim");
    }

    #[test]
    fn empty_ignore_entry_warns() {
        let mut s = settings();
        s.ignore.push(String::new());
        assert_eq!(validate(&s).len(), 1);
    }

    #[test]
    fn repository_outside_home_warns() {
        let mut s = settings();
        s.repository = PathBuf::from("/srv/dots");
        let warnings = validate(&s);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("outside"));
    }

    #[test]
    fn repository_equal_to_home_warns() {
        let mut s = settings();
        s.repository = s.home.clone();
        assert!(validate(&s)[0].message.contains("home directory itself"));
    }
}
