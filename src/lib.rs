//! # untex
//!
//! Turns LaTeX manuscripts into normalized word tokens for text analysis.
//!
//! ## Pipeline
//!
//! - **Markup stripping**: comments, the preamble, formulas, layout
//!   environments, reference commands and leftover caption words are deleted
//! - **Tagging**: prose is split into words and punctuation, each with a
//!   coarse part-of-speech tag
//! - **Normalization**: hyphen splitting, lemmatization, lowercasing,
//!   stopword and tag filters, punctuation and single-character removal
//!
//! ## Quick Start
//!
//! ```no_run
//! use untex::{tokenize_file, PipelineConfig};
//!
//! fn main() -> untex::Result<()> {
//!     let config = PipelineConfig::full();
//!     let tokens = tokenize_file("paper.tex", &config)?;
//!
//!     for token in &tokens {
//!         println!("{}", token);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Every step except lowercasing is off in [`PipelineConfig::default`];
//! [`PipelineConfig::full`] turns them all on with English stopwords.

pub mod config;
pub mod document;
pub mod error;
pub mod lemma;
pub mod normalize;
pub mod pipeline;
pub mod stopwords;
pub mod strip;
pub mod tag;
pub mod token;

// Re-exports
pub use config::{BodyMode, PipelineConfig};
pub use document::Document;
pub use error::{Delimiter, Error, Result};
pub use lemma::{Lemmatizer, RuleLemmatizer};
pub use normalize::TokenNormalizer;
pub use pipeline::{Pipeline, PipelineOutput};
pub use strip::{extract_body, strip_markup, Phase, StripStats, Stripped};
pub use tag::{RuleTagger, Tagger};
pub use token::{MorphTag, Tag, Token};

use std::path::Path;
use std::sync::Arc;

/// Tokenizes a LaTeX file.
///
/// # Example
///
/// ```no_run
/// use untex::{tokenize_file, PipelineConfig};
///
/// let config = PipelineConfig::new().with_clean_markup().with_lemmatize();
/// let tokens = tokenize_file("paper.tex", &config)?;
/// println!("{} tokens", tokens.len());
/// # Ok::<(), untex::Error>(())
/// ```
pub fn tokenize_file(path: impl AsRef<Path>, config: &PipelineConfig) -> Result<Vec<Token>> {
    let document = Document::from_path(path)?;
    let output = Pipeline::new(config.clone())?.run(&document)?;
    Ok(output.tokens)
}

/// Tokenizes inline text.
///
/// # Example
///
/// ```
/// use untex::{tokenize_text, PipelineConfig};
///
/// let config = PipelineConfig::new().with_split_hyphenation().with_lemmatize();
/// let tokens = tokenize_text("co-occurring terms", &config)?;
/// let words: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
/// assert_eq!(words, ["co", "occur", "term"]);
/// # Ok::<(), untex::Error>(())
/// ```
pub fn tokenize_text(text: &str, config: &PipelineConfig) -> Result<Vec<Token>> {
    Pipeline::new(config.clone())?.run_text(text)
}

/// Strips markup from a LaTeX file and returns the remaining prose.
///
/// The text is NFC-normalized first, as the tokenizing pipeline does.
///
/// # Example
///
/// ```no_run
/// let prose = untex::strip_file("paper.tex")?;
/// std::fs::write("paper.txt", prose)?;
/// # Ok::<(), untex::Error>(())
/// ```
pub fn strip_file(path: impl AsRef<Path>) -> Result<String> {
    let document = Document::from_path(path)?;
    let pipeline = Pipeline::new(PipelineConfig::new().with_clean_markup())?;
    Ok(pipeline.strip(&document)?.text)
}

/// Builder for tokenizing documents.
///
/// Provides a fluent API over [`PipelineConfig`] and the pipeline
/// components.
///
/// # Example
///
/// ```no_run
/// use untex::Untex;
///
/// let tokens = Untex::new()
///     .with_lemmatize()
///     .with_english_stopwords()
///     .parse("paper.tex")?
///     .into_tokens();
/// # Ok::<(), untex::Error>(())
/// ```
pub struct Untex {
    config: PipelineConfig,
    lemmatizer: Option<Arc<dyn Lemmatizer>>,
}

impl Default for Untex {
    fn default() -> Self {
        Self::new()
    }
}

impl Untex {
    /// Creates a builder that strips markup and lowercases, nothing else.
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::new().with_clean_markup(),
            lemmatizer: None,
        }
    }

    /// Starts from an existing configuration.
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the body extraction mode.
    pub fn with_body_mode(mut self, mode: BodyMode) -> Self {
        self.config = self.config.with_body_mode(mode);
        self
    }

    /// Tokenizes the raw text without stripping markup.
    pub fn raw(mut self) -> Self {
        self.config.clean_markup = false;
        self
    }

    /// Splits hyphenated words.
    pub fn with_split_hyphenation(mut self) -> Self {
        self.config = self.config.with_split_hyphenation();
        self
    }

    /// Reduces words to their lemma.
    pub fn with_lemmatize(mut self) -> Self {
        self.config = self.config.with_lemmatize();
        self
    }

    /// Uses a custom lemmatizer (implies lemmatization).
    pub fn with_lemmatizer(mut self, lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        self.lemmatizer = Some(lemmatizer);
        self.with_lemmatize()
    }

    /// Drops English stopwords.
    pub fn with_english_stopwords(mut self) -> Self {
        self.config = self.config.with_english_stopwords();
        self
    }

    /// Keeps only tokens with these tags.
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.config = self.config.with_tag_allowlist(tags);
        self
    }

    /// Removes punctuation and single characters.
    pub fn words_only(mut self) -> Self {
        self.config = self
            .config
            .with_delete_punctuation()
            .with_delete_single_characters();
        self
    }

    /// Builds the pipeline.
    pub fn build(self) -> Result<Pipeline> {
        let pipeline = Pipeline::new(self.config)?;
        Ok(match self.lemmatizer {
            Some(lemmatizer) => pipeline.with_lemmatizer(lemmatizer),
            None => pipeline,
        })
    }

    /// Tokenizes a document from a file path.
    pub fn parse(self, path: impl AsRef<Path>) -> Result<TokenizedDocument> {
        let document = Document::from_path(path)?;
        self.parse_document(&document)
    }

    /// Tokenizes an in-memory document.
    pub fn parse_document(self, document: &Document) -> Result<TokenizedDocument> {
        let output = self.build()?.run(document)?;
        Ok(TokenizedDocument { output })
    }
}

/// A tokenized document.
pub struct TokenizedDocument {
    output: PipelineOutput,
}

impl TokenizedDocument {
    /// Returns the document name.
    pub fn name(&self) -> &str {
        &self.output.document
    }

    /// Returns the tokens in text order.
    pub fn tokens(&self) -> &[Token] {
        &self.output.tokens
    }

    /// Returns the number of tokens.
    pub fn token_count(&self) -> usize {
        self.output.tokens.len()
    }

    /// Returns stripping diagnostics, if markup was cleaned.
    pub fn strip_stats(&self) -> Option<&StripStats> {
        self.output.strip_stats.as_ref()
    }

    /// Joins token texts with single spaces.
    pub fn to_text(&self) -> String {
        self.output
            .tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Serializes the whole output as JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.output)
            .map_err(|e| Error::Encoding(format!("JSON serialization failed: {}", e)))
    }

    /// Consumes self and returns the tokens.
    pub fn into_tokens(self) -> Vec<Token> {
        self.output.tokens
    }

    /// Consumes self and returns the pipeline output.
    pub fn into_output(self) -> PipelineOutput {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const PAPER: &str = r"\documentclass{article}
\title{Ignored}
\begin{document}
\maketitle
Our method clusters the documents. % fast
\begin{figure}\includegraphics{plot.png}\caption{A plot}\end{figure}
As Fig. 2 shows, it scales.
\end{document}";

    #[test]
    fn test_tokenize_text_defaults() {
        let tokens = tokenize_text("Hello World", &PipelineConfig::default()).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "hello");
        assert_eq!(tokens[1].text, "world");
    }

    #[test]
    fn test_tokenize_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.tex");
        fs::write(&path, PAPER).unwrap();

        let config = PipelineConfig::new()
            .with_clean_markup()
            .with_delete_punctuation()
            .with_delete_single_characters();
        let tokens = tokenize_file(&path, &config).unwrap();
        let words: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            words,
            vec!["our", "method", "clusters", "the", "documents", "as", "shows", "it", "scales"]
        );
    }

    #[test]
    fn test_strip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.tex");
        fs::write(&path, PAPER).unwrap();

        let prose = strip_file(&path).unwrap();
        assert!(prose.starts_with("Our method clusters the documents."));
        assert!(!prose.contains("fast"));
        assert!(!prose.contains("plot"));
        assert!(!prose.contains("Ignored"));
        assert!(!prose.contains("Fig."));
    }

    #[test]
    fn test_strip_file_normalizes_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accent.tex");
        fs::write(&path, "\\begin{document}Cafe\u{0301} culture\\end{document}").unwrap();

        let prose = strip_file(&path).unwrap();
        assert_eq!(prose, "Caf\u{e9} culture");
        let tokens = tokenize_file(&path, &PipelineConfig::new().with_clean_markup()).unwrap();
        assert_eq!(tokens[0].text, "caf\u{e9}");
    }

    #[test]
    fn test_strip_file_without_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fragment.tex");
        fs::write(&path, "just a fragment").unwrap();

        let err = strip_file(&path).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed document 'fragment.tex': missing \\begin{document}"
        );
    }

    #[test]
    fn test_builder_parse_document() {
        let document = Document::new("paper.tex", PAPER);
        let parsed = Untex::new()
            .with_lemmatize()
            .with_tags([Tag::Noun])
            .words_only()
            .parse_document(&document)
            .unwrap();

        assert_eq!(parsed.name(), "paper.tex");
        assert_eq!(parsed.to_text(), "method cluster document show scale");
        assert_eq!(parsed.token_count(), 5);
        assert!(parsed.strip_stats().is_some());
    }

    #[test]
    fn test_builder_raw_mode() {
        let document = Document::new("snippet", r"see \ref{x}");
        let parsed = Untex::new().raw().parse_document(&document).unwrap();
        assert!(parsed.strip_stats().is_none());
        assert!(parsed.tokens().iter().any(|t| t.text == "ref"));
    }

    #[test]
    fn test_builder_to_json() {
        let document = Document::new("snippet", "Words");
        let json = Untex::new()
            .raw()
            .parse_document(&document)
            .unwrap()
            .to_json()
            .unwrap();
        assert!(json.contains("\"document\": \"snippet\""));
        assert!(json.contains("\"tag\": \"NOUN\""));
    }
}
