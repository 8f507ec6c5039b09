//! Token normalization steps.
//!
//! Each step is a plain function from tokens to tokens. [`TokenNormalizer`]
//! runs the enabled ones in a fixed order:
//!
//! 1. split hyphenated tokens
//! 2. lemmatize
//! 3. lowercase and trim (always)
//! 4. drop stopwords
//! 5. keep allowed tags
//! 6. delete punctuation
//! 7. drop single characters
//!
//! Splitting comes before lemmatization: `co-occurring` only lemmatizes
//! once its halves are separate words.

use crate::config::PipelineConfig;
use crate::lemma::Lemmatizer;
use crate::tag::is_word_char;
use crate::token::{Tag, Token};
use std::collections::HashSet;
use tracing::debug;
use unicode_categories::UnicodeCategories;

/// Splits every hyphenated token into its non-empty segments.
pub fn split_hyphenated(tokens: Vec<Token>) -> Vec<Token> {
    tokens.iter().flat_map(Token::split_hyphens).collect()
}

/// Replaces each token's text with its lemma.
///
/// Tokens tagged [`Tag::Other`] are left as they are.
pub fn lemmatize_tokens(tokens: Vec<Token>, lemmatizer: &dyn Lemmatizer) -> Vec<Token> {
    tokens
        .into_iter()
        .map(|token| match token.tag.morph() {
            Some(pos) => {
                let lemma = lemmatizer.lemmatize(&token.text, pos);
                Token::new(lemma, token.tag)
            }
            None => token,
        })
        .collect()
}

/// Lowercases and trims every token.
pub fn lowercase_tokens(tokens: Vec<Token>) -> Vec<Token> {
    tokens.iter().map(Token::lowercased).collect()
}

/// Drops tokens whose lowercased text is a stopword.
pub fn filter_stopwords(tokens: Vec<Token>, stopwords: &HashSet<String>) -> Vec<Token> {
    if stopwords.is_empty() {
        return tokens;
    }
    tokens
        .into_iter()
        .filter(|t| !stopwords.contains(&t.text.to_lowercase()))
        .collect()
}

/// Keeps only tokens whose tag is in `tags`. An empty set keeps everything.
pub fn filter_tags(tokens: Vec<Token>, tags: &HashSet<Tag>) -> Vec<Token> {
    if tags.is_empty() {
        return tokens;
    }
    tokens.into_iter().filter(|t| tags.contains(&t.tag)).collect()
}

/// Returns true for ASCII and Unicode punctuation, hyphen excluded.
pub fn is_deletable_punctuation(c: char) -> bool {
    c != '-' && (c.is_ascii_punctuation() || c.is_punctuation())
}

/// Removes punctuation characters other than `-` from each token.
///
/// A token is dropped when nothing word-like remains after its leading
/// non-word characters.
pub fn delete_punctuation(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .filter_map(|token| {
            let text: String = token
                .text
                .chars()
                .filter(|&c| !is_deletable_punctuation(c))
                .collect();
            let rest = text.trim_start_matches(|c: char| !is_word_char(c));
            (!rest.is_empty()).then(|| Token::new(text, token.tag))
        })
        .collect()
}

/// Drops tokens of at most one character.
pub fn delete_single_characters(tokens: Vec<Token>) -> Vec<Token> {
    tokens.into_iter().filter(|t| t.char_len() > 1).collect()
}

/// Runs the normalization steps a [`PipelineConfig`] enables.
pub struct TokenNormalizer<'a> {
    config: &'a PipelineConfig,
    lemmatizer: &'a dyn Lemmatizer,
}

impl<'a> TokenNormalizer<'a> {
    pub fn new(config: &'a PipelineConfig, lemmatizer: &'a dyn Lemmatizer) -> Self {
        Self { config, lemmatizer }
    }

    /// Normalizes tokens. Order is preserved among surviving tokens.
    pub fn normalize(&self, tokens: Vec<Token>) -> Vec<Token> {
        let config = self.config;
        let input = tokens.len();
        let mut tokens = tokens;

        if config.split_hyphenation {
            tokens = split_hyphenated(tokens);
        }
        if config.lemmatize {
            tokens = lemmatize_tokens(tokens, self.lemmatizer);
        }
        tokens = lowercase_tokens(tokens);
        if let Some(stopwords) = &config.stopwords {
            tokens = filter_stopwords(tokens, stopwords);
        }
        if let Some(tags) = &config.tag_allowlist {
            tokens = filter_tags(tokens, tags);
        }
        if config.delete_punctuation {
            tokens = delete_punctuation(tokens);
        }
        if config.delete_single_characters {
            tokens = delete_single_characters(tokens);
        }

        debug!(input, output = tokens.len(), "normalize_complete");
        tokens
    }
}
