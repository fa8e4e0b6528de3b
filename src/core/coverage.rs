/// Key coverage — checks that content-referenced text keys exist in the
/// loaded language packs.

use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::core::resolver::DEFAULT_LANGUAGE;
use crate::schema::action::ActionRecord;
use crate::schema::language_pack::LanguagePack;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoverageError {
    #[error("missing base pack for default language '{0}'")]
    MissingDefaultPack(String),
}

/// Which packs must define every required key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoverageMode {
    /// Every pack.
    #[default]
    Strict,
    /// Only the default-language pack; translations may lag behind.
    DefaultOnly,
}

/// Text keys referenced by `message_key` on a batch of actions.
pub fn required_keys<'a>(actions: impl IntoIterator<Item = &'a ActionRecord>) -> BTreeSet<String> {
    actions
        .into_iter()
        .filter_map(ActionRecord::message_key)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone)]
pub struct KeyCoverage {
    default_language: String,
    mode: CoverageMode,
}

impl Default for KeyCoverage {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE, CoverageMode::Strict)
    }
}

impl KeyCoverage {
    pub fn new(default_language: impl Into<String>, mode: CoverageMode) -> Self {
        Self {
            default_language: default_language.into(),
            mode,
        }
    }

    /// Find the required keys each checked pack lacks.
    pub fn check(
        &self,
        required: &BTreeSet<String>,
        packs: &[&LanguagePack],
    ) -> Result<CoverageReport, CoverageError> {
        if !packs
            .iter()
            .any(|pack| pack.language_code() == self.default_language)
        {
            return Err(CoverageError::MissingDefaultPack(
                self.default_language.clone(),
            ));
        }

        let mut report = CoverageReport {
            required: required.len(),
            checked: Vec::new(),
            missing: BTreeMap::new(),
        };

        for pack in packs {
            let code = pack.language_code();
            if self.mode == CoverageMode::DefaultOnly && code != self.default_language {
                continue;
            }
            report.checked.push(code.to_string());

            let missing: Vec<String> = required
                .iter()
                .filter(|key| !pack.contains(key))
                .cloned()
                .collect();
            if !missing.is_empty() {
                report.missing.insert(code.to_string(), missing);
            }
        }
        report.checked.sort_unstable();

        Ok(report)
    }
}

/// Outcome of a coverage check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageReport {
    /// Number of distinct required keys.
    pub required: usize,
    /// Language codes that were checked, sorted.
    pub checked: Vec<String>,
    /// Language code to sorted missing keys; only incomplete packs appear.
    pub missing: BTreeMap<String, Vec<String>>,
}

impl CoverageReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// One line per incomplete pack listing at most `limit` keys.
    pub fn summary(&self, limit: usize) -> Vec<String> {
        self.missing
            .iter()
            .map(|(code, keys)| {
                let shown = keys
                    .iter()
                    .take(limit)
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                if keys.len() > limit {
                    format!("{}: {} (+{} more)", code, shown, keys.len() - limit)
                } else {
                    format!("{}: {}", code, shown)
                }
            })
            .collect()
    }
}
