/// Language packs — immutable key→string tables for one language.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reserved key holding the pack's language code.
pub const META_LANG: &str = "meta.lang";
/// Reserved key holding `"true"` or `"false"` for right-to-left scripts.
pub const META_RTL: &str = "meta.rtl";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    #[error("language code must not be empty")]
    EmptyLanguageCode,
    #[error("pack '{language}' is missing reserved key '{key}'")]
    MissingMetadata { language: String, key: &'static str },
    #[error("pack '{language}' has meta.rtl = '{value}', expected \"true\" or \"false\"")]
    InvalidRtlFlag { language: String, value: String },
    #[error("pack '{language}' declares meta.lang = '{declared}'")]
    LanguageMismatch { language: String, declared: String },
}

/// An immutable mapping from text key to display string for one language.
///
/// Always carries the reserved `meta.lang` and `meta.rtl` entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPack", into = "RawPack")]
pub struct LanguagePack {
    language_code: String,
    entries: FxHashMap<String, String>,
}

// Serde goes through an unchecked shape so that deserialized packs are
// validated exactly like hand-built ones.
#[derive(Serialize, Deserialize)]
struct RawPack {
    language_code: String,
    entries: FxHashMap<String, String>,
}

impl TryFrom<RawPack> for LanguagePack {
    type Error = PackError;

    fn try_from(raw: RawPack) -> Result<Self, Self::Error> {
        LanguagePack::new(raw.language_code, raw.entries)
    }
}

impl From<LanguagePack> for RawPack {
    fn from(pack: LanguagePack) -> Self {
        RawPack {
            language_code: pack.language_code,
            entries: pack.entries,
        }
    }
}

impl LanguagePack {
    /// Build a pack from entries that already include the metadata keys.
    pub fn new<I, K, V>(language_code: impl Into<String>, entries: I) -> Result<Self, PackError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let language_code = language_code.into();
        if language_code.is_empty() {
            return Err(PackError::EmptyLanguageCode);
        }
        let entries: FxHashMap<String, String> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let declared = entries
            .get(META_LANG)
            .ok_or_else(|| PackError::MissingMetadata {
                language: language_code.clone(),
                key: META_LANG,
            })?;
        if *declared != language_code {
            return Err(PackError::LanguageMismatch {
                language: language_code,
                declared: declared.clone(),
            });
        }

        match entries.get(META_RTL).map(String::as_str) {
            Some("true") | Some("false") => {}
            Some(other) => {
                return Err(PackError::InvalidRtlFlag {
                    language: language_code,
                    value: other.to_string(),
                })
            }
            None => {
                return Err(PackError::MissingMetadata {
                    language: language_code,
                    key: META_RTL,
                })
            }
        }

        Ok(Self {
            language_code,
            entries,
        })
    }

    /// Start a builder that fills in the metadata keys itself.
    pub fn builder(language_code: impl Into<String>) -> LanguagePackBuilder {
        LanguagePackBuilder {
            language_code: language_code.into(),
            rtl: false,
            entries: FxHashMap::default(),
        }
    }

    pub fn language_code(&self) -> &str {
        &self.language_code
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries, metadata included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when `meta.rtl` is exactly `"true"`.
    pub fn is_rtl(&self) -> bool {
        self.get(META_RTL) == Some("true")
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Builder for [`LanguagePack`]. `meta.lang` and `meta.rtl` always reflect
/// the builder's language code and RTL flag, whatever the entries say.
#[derive(Debug, Clone)]
pub struct LanguagePackBuilder {
    language_code: String,
    rtl: bool,
    entries: FxHashMap<String, String>,
}

impl LanguagePackBuilder {
    pub fn rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    pub fn entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn entries<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.entries
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn build(mut self) -> Result<LanguagePack, PackError> {
        self.entries
            .insert(META_LANG.to_string(), self.language_code.clone());
        self.entries
            .insert(META_RTL.to_string(), self.rtl.to_string());
        LanguagePack::new(self.language_code, self.entries)
    }
}
