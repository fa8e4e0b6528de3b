/// Text resolution — key lookup with language fallback and `{name}`
/// variable substitution.

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;
use thiserror::Error;

use crate::core::settings::Settings;
use crate::schema::language_pack::{LanguagePack, PackError};

/// Language consulted when the active pack lacks a key.
pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unknown language '{0}'")]
    UnknownLanguage(String),
    #[error("language pack '{language}' unavailable: {reason}")]
    Unavailable { language: String, reason: String },
    #[error("malformed language pack: {0}")]
    Malformed(#[from] PackError),
}

/// Produces the pack for a language code. The storage format is the
/// loader's business.
pub trait PackLoader {
    fn load(&self, language: &str) -> Result<LanguagePack, LoadError>;
}

impl<F> PackLoader for F
where
    F: Fn(&str) -> Result<LanguagePack, LoadError>,
{
    fn load(&self, language: &str) -> Result<LanguagePack, LoadError> {
        self(language)
    }
}

/// Loader over packs already held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPackLoader {
    packs: FxHashMap<String, LanguagePack>,
}

impl MemoryPackLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pack, keyed by its own language code.
    pub fn with_pack(mut self, pack: LanguagePack) -> Self {
        self.insert(pack);
        self
    }

    pub fn insert(&mut self, pack: LanguagePack) {
        self.packs.insert(pack.language_code().to_string(), pack);
    }

    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.packs.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }
}

impl PackLoader for MemoryPackLoader {
    fn load(&self, language: &str) -> Result<LanguagePack, LoadError> {
        self.packs
            .get(language)
            .cloned()
            .ok_or_else(|| LoadError::UnknownLanguage(language.to_string()))
    }
}

/// Named values substituted into `{name}` markers.
///
/// Setting the same name twice keeps the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextVars {
    values: BTreeMap<String, String>,
}

impl TextVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Display) {
        self.values.insert(name.into(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(marker, value)` pairs, longest marker first, ties by name.
    fn markers(&self) -> Vec<(String, &str)> {
        let mut markers: Vec<(String, &str)> = self
            .values
            .iter()
            .map(|(name, value)| (format!("{{{}}}", name), value.as_str()))
            .collect();
        // BTreeMap iteration is already name-ordered; the stable sort keeps it
        // for equal lengths.
        markers.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        markers
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for TextVars {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = TextVars::new();
        for (name, value) in iter {
            vars.insert(name, value);
        }
        vars
    }
}

/// Replace every `{name}` marker in one left-to-right pass. Inserted values
/// are never scanned again.
fn substitute(template: &str, vars: &TextVars) -> String {
    if vars.is_empty() || !template.contains('{') {
        return template.to_string();
    }

    let markers = vars.markers();
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match markers
            .iter()
            .find(|(marker, _)| tail.starts_with(marker.as_str()))
        {
            Some((marker, value)) => {
                out.push_str(value);
                rest = &tail[marker.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Resolves text keys against an active-language pack, then the default
/// pack, then the key itself.
#[derive(Debug, Clone)]
pub struct TextResolver {
    primary: Arc<LanguagePack>,
    fallback: Arc<LanguagePack>,
    current_language: String,
    default_language: String,
}

impl TextResolver {
    /// Load `language` with [`DEFAULT_LANGUAGE`] as the fallback.
    pub fn new(language: &str, loader: &dyn PackLoader) -> Result<Self, LoadError> {
        Self::with_default_language(language, DEFAULT_LANGUAGE, loader)
    }

    pub fn from_settings(settings: &Settings, loader: &dyn PackLoader) -> Result<Self, LoadError> {
        Self::with_default_language(&settings.language, &settings.default_language, loader)
    }

    /// Either both packs load or nothing is built.
    pub fn with_default_language(
        language: &str,
        default_language: &str,
        loader: &dyn PackLoader,
    ) -> Result<Self, LoadError> {
        let primary = Arc::new(loader.load(language)?);
        let fallback = if language == default_language {
            Arc::clone(&primary)
        } else {
            Arc::new(loader.load(default_language)?)
        };
        tracing::debug!(
            language,
            default_language,
            entries = primary.len(),
            rtl = primary.is_rtl(),
            "Loaded language packs"
        );

        Ok(Self {
            primary,
            fallback,
            current_language: language.to_string(),
            default_language: default_language.to_string(),
        })
    }

    /// Resolve `key` without substitution.
    pub fn resolve(&self, key: &str) -> String {
        self.lookup(key).to_string()
    }

    /// Resolve `key` and replace `{name}` markers from `vars`.
    pub fn resolve_with(&self, key: &str, vars: &TextVars) -> String {
        substitute(self.lookup(key), vars)
    }

    fn lookup<'a>(&'a self, key: &'a str) -> &'a str {
        self.primary
            .get(key)
            .or_else(|| self.fallback.get(key))
            .unwrap_or(key)
    }

    /// True when the active pack is right-to-left. The fallback is ignored.
    pub fn is_rtl(&self) -> bool {
        self.primary.is_rtl()
    }

    /// True when either pack defines `key`.
    pub fn has_key(&self, key: &str) -> bool {
        self.primary.contains(key) || self.fallback.contains(key)
    }

    pub fn current_language(&self) -> &str {
        &self.current_language
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn primary(&self) -> &LanguagePack {
        &self.primary
    }

    pub fn fallback(&self) -> &LanguagePack {
        &self.fallback
    }

    /// True when primary and fallback are one and the same pack.
    pub fn fallback_is_shared(&self) -> bool {
        Arc::ptr_eq(&self.primary, &self.fallback)
    }
}
