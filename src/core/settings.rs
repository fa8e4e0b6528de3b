/// Localization settings, loaded from RON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::resolver::DEFAULT_LANGUAGE;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("language code must not be empty")]
    EmptyLanguage,
}

/// Which language is active and which one fills the gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_language")]
    pub default_language: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: default_language(),
            default_language: default_language(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Settings, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    pub fn from_ron_str(input: &str) -> Result<Settings, SettingsError> {
        let settings: Settings = ron::from_str(input)?;
        if settings.language.is_empty() || settings.default_language.is_empty() {
            return Err(SettingsError::EmptyLanguage);
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_english() {
        let settings = Settings::default();
        assert_eq!(settings.language, "en");
        assert_eq!(settings.default_language, "en");
    }

    #[test]
    fn parse_partial_ron() {
        let settings = Settings::from_ron_str(r#"(language: "ar")"#).unwrap();
        assert_eq!(settings.language, "ar");
        assert_eq!(settings.default_language, "en");
    }

    #[test]
    fn parse_full_ron() {
        let settings =
            Settings::from_ron_str(r#"(language: "en", default_language: "fr")"#).unwrap();
        assert_eq!(settings.default_language, "fr");
    }

    #[test]
    fn rejects_empty_language() {
        assert!(matches!(
            Settings::from_ron_str(r#"(language: "")"#),
            Err(SettingsError::EmptyLanguage)
        ));
    }

    #[test]
    fn rejects_malformed_ron() {
        assert!(matches!(
            Settings::from_ron_str("(language: )"),
            Err(SettingsError::Ron(_))
        ));
    }

    #[test]
    fn load_fixture() {
        let path = std::path::PathBuf::from("tests/fixtures/settings.ron");
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.language, "ar");
    }

    #[test]
    fn load_missing_file() {
        let path = std::path::PathBuf::from("tests/fixtures/does_not_exist.ron");
        assert!(matches!(Settings::load(&path), Err(SettingsError::Io(_))));
    }
}
