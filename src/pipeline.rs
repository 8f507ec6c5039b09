//! Pipeline orchestration: document text to normalized tokens.

use crate::config::PipelineConfig;
use crate::document::Document;
use crate::error::Result;
use crate::lemma::{Lemmatizer, RuleLemmatizer};
use crate::normalize::TokenNormalizer;
use crate::strip::{strip_markup, StripStats, Stripped};
use crate::tag::{RuleTagger, Tagger};
use crate::token::Token;
use rayon::prelude::*;
use serde::Serialize;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn, Level};
use unicode_normalization::UnicodeNormalization;

/// Name given to text passed without a document.
const INLINE_NAME: &str = "<text>";

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    /// Name of the source document
    pub document: String,
    /// Normalized tokens, in text order
    pub tokens: Vec<Token>,
    /// Stripping diagnostics, when markup was cleaned
    pub strip_stats: Option<StripStats>,
}

/// Runs stripping, tagging and normalization with a fixed configuration.
///
/// The tagger and lemmatizer are shared read-only, so one pipeline can
/// serve many documents, including in parallel through [`Pipeline::run_batch`].
#[derive(Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    tagger: Arc<dyn Tagger>,
    lemmatizer: Arc<dyn Lemmatizer>,
}

impl Pipeline {
    /// Creates a pipeline with the rule-based tagger and lemmatizer.
    ///
    /// Fails with [`Error::InvalidConfig`](crate::Error::InvalidConfig) if
    /// the config does not validate.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            tagger: Arc::new(RuleTagger::new()),
            lemmatizer: Arc::new(RuleLemmatizer::new()),
        })
    }

    /// Replaces the tagger.
    pub fn with_tagger(mut self, tagger: Arc<dyn Tagger>) -> Self {
        self.tagger = tagger;
        self
    }

    /// Replaces the lemmatizer.
    pub fn with_lemmatizer(mut self, lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        self.lemmatizer = lemmatizer;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the pipeline over one document.
    pub fn run(&self, document: &Document) -> Result<PipelineOutput> {
        let start = Instant::now();
        let span = tracing::span!(Level::INFO, "untex.run", document = %document.name());
        let _guard = span.enter();

        match self.run_inner(document) {
            Ok(output) => {
                let elapsed_micros = start.elapsed().as_micros();
                info!(
                    tokens = output.tokens.len(),
                    stripped_len = output.strip_stats.as_ref().map(StripStats::final_len),
                    elapsed_micros,
                    "pipeline_success"
                );
                Ok(output)
            }
            Err(err) => {
                let elapsed_micros = start.elapsed().as_micros();
                warn!(error = %err, elapsed_micros, "pipeline_failure");
                Err(err)
            }
        }
    }

    /// Runs the pipeline over inline text and returns only the tokens.
    pub fn run_text(&self, text: &str) -> Result<Vec<Token>> {
        let document = Document::new(INLINE_NAME, text);
        self.run(&document).map(|output| output.tokens)
    }

    /// Runs every document independently, in parallel.
    ///
    /// Results come back in input order; one failing document does not
    /// affect the others.
    pub fn run_batch(&self, documents: &[Document]) -> Vec<Result<PipelineOutput>> {
        documents.par_iter().map(|doc| self.run(doc)).collect()
    }

    /// Text the tagger would see: normalized and, if enabled, stripped.
    pub fn prepare(&self, document: &Document) -> Result<(String, Option<StripStats>)> {
        if !self.config.clean_markup {
            return Ok((self.normalized(document).into_owned(), None));
        }
        let stripped = self.strip(document)?;
        Ok((stripped.text, Some(stripped.stats)))
    }

    /// Normalizes and strips a document with this pipeline's body mode,
    /// whether or not `clean_markup` is set.
    pub fn strip(&self, document: &Document) -> Result<Stripped> {
        let text = self.normalized(document);
        strip_markup(document.name(), &text, self.config.body_mode)
    }

    fn normalized<'d>(&self, document: &'d Document) -> Cow<'d, str> {
        if self.config.normalize_unicode {
            Cow::Owned(document.text().nfc().collect::<String>())
        } else {
            Cow::Borrowed(document.text())
        }
    }

    fn run_inner(&self, document: &Document) -> Result<PipelineOutput> {
        let (text, strip_stats) = self.prepare(document)?;
        let tokens = self.tagger.tag(&text);
        let tokens = TokenNormalizer::new(&self.config, self.lemmatizer.as_ref()).normalize(tokens);

        Ok(PipelineOutput {
            document: document.name().to_string(),
            tokens,
            strip_stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BodyMode;
    use crate::error::Error;
    use crate::token::{MorphTag, Tag};

    const PAPER: &str = r"\documentclass{article}
\begin{document}
% TODO: rewrite
\section{Intro}
We compute $x=1$ here. See Figure~\ref{fig:a}.
\begin{equation} y = 2 \end{equation}
The results are shown in the well-known co-occurring terms.
\end{document}";

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_co_occurring_terms() {
        let config = PipelineConfig::new()
            .with_split_hyphenation()
            .with_lemmatize();
        let pipeline = Pipeline::new(config).unwrap();
        let tokens = pipeline.run_text("co-occurring terms").unwrap();
        assert_eq!(texts(&tokens), vec!["co", "occur", "term"]);
    }

    #[test]
    fn test_defaults_tokenize_and_lowercase_only() {
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let tokens = pipeline.run_text("The Cat sat.").unwrap();
        assert_eq!(texts(&tokens), vec!["the", "cat", "sat", "."]);
    }

    #[test]
    fn test_latex_scenario() {
        let config = PipelineConfig::new()
            .with_clean_markup()
            .with_split_hyphenation()
            .with_lemmatize()
            .with_stopwords(["the", "we", "in"])
            .with_delete_punctuation()
            .with_delete_single_characters();
        let pipeline = Pipeline::new(config).unwrap();
        let output = pipeline.run(&Document::new("paper.tex", PAPER)).unwrap();

        assert_eq!(output.document, "paper.tex");
        let tokens = texts(&output.tokens);
        assert_eq!(
            tokens,
            vec![
                "compute", "here", "see", "result", "be", "shown", "well", "known", "co", "occur",
                "term"
            ]
        );
        for absent in ["x=1", "todo", "rewrite", "figure", "intro", "y"] {
            assert!(!tokens.contains(&absent), "unexpected token {absent}");
        }

        let stats = output.strip_stats.unwrap();
        assert!(stats.final_len() < stats.body_len());
    }

    #[test]
    fn test_full_preset_has_no_empty_tokens() {
        let pipeline = Pipeline::new(PipelineConfig::full()).unwrap();
        let output = pipeline.run(&Document::new("paper.tex", PAPER)).unwrap();
        assert!(!output.tokens.is_empty());
        assert!(output.tokens.iter().all(|t| t.char_len() > 1));
    }

    #[test]
    fn test_missing_body_fails() {
        let config = PipelineConfig::new().with_clean_markup();
        let pipeline = Pipeline::new(config).unwrap();
        let err = pipeline
            .run(&Document::new("notes.tex", "no delimiters here"))
            .unwrap_err();
        assert!(matches!(err, Error::MalformedDocument { .. }));
    }

    #[test]
    fn test_body_mode_if_present() {
        let config = PipelineConfig::new()
            .with_clean_markup()
            .with_body_mode(BodyMode::IfPresent);
        let pipeline = Pipeline::new(config).unwrap();
        let tokens = pipeline.run_text("plain $a$ words").unwrap();
        assert_eq!(texts(&tokens), vec!["plain", "words"]);
    }

    #[test]
    fn test_unicode_normalization() {
        let pipeline = Pipeline::new(PipelineConfig::new()).unwrap();
        let tokens = pipeline.run_text("cafe\u{0301}").unwrap();
        assert_eq!(texts(&tokens), vec!["caf\u{e9}"]);
    }

    #[test]
    fn test_strip_matches_tokenizer_input() {
        let doc = Document::new("doc.tex", "\\begin{document}cafe\u{0301} $x$\\end{document}");
        let pipeline = Pipeline::new(PipelineConfig::new().with_clean_markup()).unwrap();

        let stripped = pipeline.strip(&doc).unwrap();
        assert_eq!(stripped.text, "caf\u{e9}");
        let (prepared, stats) = pipeline.prepare(&doc).unwrap();
        assert_eq!(prepared, stripped.text);
        assert_eq!(stats, Some(stripped.stats));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PipelineConfig::new().with_stopwords([""]);
        assert!(matches!(
            Pipeline::new(config),
            Err(Error::InvalidConfig(_))
        ));
    }

    struct SuffixLemmatizer;

    impl Lemmatizer for SuffixLemmatizer {
        fn lemmatize(&self, word: &str, _pos: MorphTag) -> String {
            format!("{word}_lemma")
        }
    }

    #[test]
    fn test_custom_lemmatizer() {
        let config = PipelineConfig::new().with_lemmatize();
        let pipeline = Pipeline::new(config)
            .unwrap()
            .with_lemmatizer(Arc::new(SuffixLemmatizer));
        let tokens = pipeline.run_text("the graphs").unwrap();
        assert_eq!(texts(&tokens), vec!["the", "graphs_lemma"]);
        assert_eq!(tokens[1].tag, Tag::Noun);
    }

    #[test]
    fn test_run_batch_preserves_order() {
        let config = PipelineConfig::new().with_clean_markup();
        let pipeline = Pipeline::new(config).unwrap();
        let docs = vec![
            Document::new("a.tex", r"\begin{document}alpha\end{document}"),
            Document::new("b.tex", "broken"),
            Document::new("c.tex", r"\begin{document}gamma\end{document}"),
        ];

        let results = pipeline.run_batch(&docs);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().document, "a.tex");
        assert!(results[1].is_err());
        assert_eq!(texts(&results[2].as_ref().unwrap().tokens), vec!["gamma"]);
    }

    #[test]
    fn test_output_serializes() {
        let pipeline = Pipeline::new(PipelineConfig::new()).unwrap();
        let output = pipeline.run(&Document::new("doc", "Cats")).unwrap();
        let json = serde_json::to_string(&output).unwrap();
        assert_eq!(
            json,
            r#"{"document":"doc","tokens":[{"text":"cats","tag":"NOUN"}],"strip_stats":null}"#
        );
    }
}
