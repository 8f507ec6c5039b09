//! Pipeline configuration.

use crate::error::{Error, Result};
use crate::token::Tag;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Options controlling one pipeline run.
///
/// A config is borrowed immutably for the whole run; no pipeline step can
/// change it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Strip LaTeX markup before tokenizing.
    pub clean_markup: bool,

    /// How the document body is located when cleaning markup.
    pub body_mode: BodyMode,

    /// Apply Unicode NFC normalization to the raw text.
    pub normalize_unicode: bool,

    /// Split hyphenated tokens (runs before lemmatization).
    pub split_hyphenation: bool,

    /// Reduce tokens to their base form.
    pub lemmatize: bool,

    /// Tokens whose lowercased text is in this set are dropped.
    pub stopwords: Option<HashSet<String>>,

    /// Only tokens with these tags are kept.
    pub tag_allowlist: Option<HashSet<Tag>>,

    /// Remove punctuation (except hyphens) from tokens.
    pub delete_punctuation: bool,

    /// Drop tokens of one character or less.
    pub delete_single_characters: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            clean_markup: false,
            body_mode: BodyMode::Required,
            normalize_unicode: true,
            split_hyphenation: false,
            lemmatize: false,
            stopwords: None,
            tag_allowlist: None,
            delete_punctuation: false,
            delete_single_characters: false,
        }
    }
}

impl PipelineConfig {
    /// Creates a config with every optional step disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config with every step enabled and English stopwords.
    pub fn full() -> Self {
        Self {
            clean_markup: true,
            body_mode: BodyMode::Required,
            normalize_unicode: true,
            split_hyphenation: true,
            lemmatize: true,
            stopwords: Some(crate::stopwords::english()),
            tag_allowlist: None,
            delete_punctuation: true,
            delete_single_characters: true,
        }
    }

    /// Loads a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Parses a config from a JSON string and validates it.
    ///
    /// Stopwords are lowercased and trimmed the same way [`with_stopwords`](Self::with_stopwords) does.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        if let Some(words) = config.stopwords.take() {
            config = config.with_stopwords(words);
        }
        config.validate()?;
        Ok(config)
    }

    /// Enables markup stripping.
    pub fn with_clean_markup(mut self) -> Self {
        self.clean_markup = true;
        self
    }

    /// Sets the body extraction mode.
    pub fn with_body_mode(mut self, mode: BodyMode) -> Self {
        self.body_mode = mode;
        self
    }

    /// Disables Unicode normalization.
    pub fn without_unicode_normalization(mut self) -> Self {
        self.normalize_unicode = false;
        self
    }

    /// Enables hyphen splitting.
    pub fn with_split_hyphenation(mut self) -> Self {
        self.split_hyphenation = true;
        self
    }

    /// Enables lemmatization.
    pub fn with_lemmatize(mut self) -> Self {
        self.lemmatize = true;
        self
    }

    /// Sets the stopword set. Words are lowercased and trimmed.
    pub fn with_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stopwords = Some(
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .collect(),
        );
        self
    }

    /// Uses the built-in English stopword list.
    pub fn with_english_stopwords(mut self) -> Self {
        self.stopwords = Some(crate::stopwords::english());
        self
    }

    /// Restricts output to the given tags.
    pub fn with_tag_allowlist(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tag_allowlist = Some(tags.into_iter().collect());
        self
    }

    /// Enables punctuation stripping.
    pub fn with_delete_punctuation(mut self) -> Self {
        self.delete_punctuation = true;
        self
    }

    /// Enables the single-character filter.
    pub fn with_delete_single_characters(mut self) -> Self {
        self.delete_single_characters = true;
        self
    }

    /// Returns true if the stopword filter would remove anything.
    pub fn has_stopwords(&self) -> bool {
        self.stopwords.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Returns true if the tag filter is active.
    pub fn has_tag_allowlist(&self) -> bool {
        self.tag_allowlist.as_ref().is_some_and(|t| !t.is_empty())
    }

    /// Checks the config for values that can never match a token.
    pub fn validate(&self) -> Result<()> {
        if let Some(words) = &self.stopwords {
            if let Some(bad) = words
                .iter()
                .find(|w| w.is_empty() || w.trim().len() != w.len() || w.to_lowercase() != **w)
            {
                return Err(Error::InvalidConfig(format!(
                    "stopword {:?} is empty, has surrounding whitespace or is not lowercase",
                    bad
                )));
            }
        }
        Ok(())
    }
}

/// How the body extractor is applied when markup stripping is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyMode {
    /// The document must contain a body; otherwise the run fails.
    #[default]
    Required,
    /// Use the body when present, the whole text otherwise.
    IfPresent,
    /// Never extract a body; strip the whole text.
    Skip,
}
