//! # Markup Stripper
//!
//! Reduces a LaTeX document to near-prose with an ordered cascade of
//! deletions. The stripper is a best-effort lexical scrubber, not a parser.
//!
//! ## Phases
//!
//! 1. **Comments** - `%` to end of line, per line; lines rejoined with spaces
//! 2. **Body** - text between `\begin{document}` and `\end{document}`
//! 3. **Formulas** - `$$...$$`, `\[...\]`, `\(...\)`, then `$...$`
//! 4. **Environments** - `\begin{NAME}...\end{NAME}` for a fixed list of names
//! 5. **Braced commands** - `\NAME[opt]{arg}` for a fixed list of names
//! 6. **Unbraced commands** - `\NAME ` (one trailing space) for a fixed list
//! 7. **Residual words** - cross-reference words such as `Figure` or `Eq.`
//!
//! The order is load-bearing: environment and command patterns assume that
//! comments and formulas (with their stray braces and percent signs) are
//! already gone.

pub mod body;
pub mod pattern;

pub use body::{extract_body, has_body, BEGIN_DOCUMENT, END_DOCUMENT};
pub use pattern::{delete_all, delete_pattern};

use crate::config::BodyMode;
use crate::error::Result;
use regex::{Captures, Regex};
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

// ============================================================================
// Fixed construct tables
// ============================================================================

/// Block environments removed together with their content.
///
/// Enclosing environments come before the ones they usually contain.
pub const ENVIRONMENTS: &[&str] = &[
    "abstract",
    "thebibliography",
    "figure*",
    "figure",
    "table*",
    "table",
    "tabular",
    "subequations",
    "equation*",
    "equation",
    "eqnarray*",
    "eqnarray",
    "align*",
    "align",
    "gather*",
    "gather",
    "multline*",
    "multline",
    "displaymath",
    "verbatim",
    "lstlisting",
];

/// Commands removed together with their optional `[...]` and required `{...}` argument.
pub const BRACED_COMMANDS: &[&str] = &[
    "date",
    "label",
    "eqref",
    "ref",
    "pageref",
    "autoref",
    "cref",
    "Cref",
    "cite",
    "citep",
    "citet",
    "fig",
    "bibliography",
    "bibliographystyle",
    "title",
    "subsubsection",
    "subsection",
    "section",
    "author",
    "affiliation",
    "thanks",
    "textcolor",
    "email",
    "includegraphics",
    "url",
];

/// Argument-less commands removed together with one trailing space.
pub const UNBRACED_COMMANDS: &[&str] = &[
    "centering",
    "clearpage",
    "newpage",
    "noindent",
    "itemize",
    "item",
    "maketitle",
    "tableofcontents",
    "emph",
    "enumerate",
];

/// Cross-reference words removed in the final pass.
///
/// Entries are regex fragments, anchored at a word boundary on the left.
pub const RESIDUAL_WORDS: &[&str] = &[
    r"Equations?\b",
    r"Eqs?\b\.?",
    r"Figures?\b",
    r"Figs?\b\.?",
    r"Appendix\b",
    r"Sections?\b",
    r"Secs?\b\.?",
    r"et al\b\.?",
];

// ============================================================================
// Diagnostics
// ============================================================================

/// Stripping phase, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Raw input, before any deletion
    Input,
    /// After comment removal
    Comments,
    /// After body extraction
    Body,
    /// After formula removal
    Formulas,
    /// After environment removal
    Environments,
    /// After braced command removal
    BracedCommands,
    /// After unbraced command removal
    UnbracedCommands,
    /// After residual word removal and final trim
    ResidualWords,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Input => "input",
            Phase::Comments => "comments",
            Phase::Body => "body",
            Phase::Formulas => "formulas",
            Phase::Environments => "environments",
            Phase::BracedCommands => "braced commands",
            Phase::UnbracedCommands => "unbraced commands",
            Phase::ResidualWords => "residual words",
        };
        f.write_str(name)
    }
}

/// Text length (in characters) after each phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StripStats {
    /// `(phase, length)` pairs in execution order
    pub lengths: Vec<(Phase, usize)>,
}

impl StripStats {
    fn record(&mut self, phase: Phase, text: &str) {
        let len = text.chars().count();
        debug!(%phase, len, "strip_phase");
        self.lengths.push((phase, len));
    }

    /// Length after the given phase, if it ran.
    pub fn length_after(&self, phase: Phase) -> Option<usize> {
        self.lengths
            .iter()
            .find(|(p, _)| *p == phase)
            .map(|(_, len)| *len)
    }

    /// Length of the body the content phases started from.
    pub fn body_len(&self) -> usize {
        self.length_after(Phase::Body).unwrap_or(0)
    }

    /// Length of the final stripped text.
    pub fn final_len(&self) -> usize {
        self.lengths.last().map(|(_, len)| *len).unwrap_or(0)
    }

    /// Characters removed from the body by the content phases.
    pub fn removed(&self) -> usize {
        self.body_len().saturating_sub(self.final_len())
    }
}

/// Output of the markup stripper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stripped {
    /// Stripped prose
    pub text: String,
    /// Per-phase diagnostics
    pub stats: StripStats,
}

// ============================================================================
// Phase 1: Comments
// ============================================================================

/// Byte offset of the first unescaped `%` in a line.
///
/// A `%` preceded by an odd number of backslashes is escaped (`\%`); after an
/// even run (`\\%`) it starts a comment.
fn comment_start(line: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '%' => return Some(i),
            _ => {}
        }
    }
    None
}

/// Deletes the comment from a single line, along with trailing whitespace.
pub fn delete_comment(line: &str) -> &str {
    let line = line.trim_end();
    match comment_start(line) {
        Some(start) => line[..start].trim_end(),
        None => line,
    }
}

/// Deletes comments from every line and joins the lines with single spaces.
///
/// Line breaks are discarded.
pub fn delete_comments(text: &str) -> String {
    let joined = text
        .split('\n')
        .map(delete_comment)
        .collect::<Vec<_>>()
        .join(" ");
    joined.trim_end().to_string()
}

// ============================================================================
// Phase 3: Formulas
// ============================================================================

static RE_DISPLAY_DOLLARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\$\$.*?\$\$").unwrap());

// `\\` is a line break, not the start of `\[`; it is matched first and kept.
static RE_DISPLAY_BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\\\\|(\\\[.*?\\\]|\\\(.*?\\\))").unwrap());

static RE_INLINE_FORMULA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$[^$]+\$").unwrap());

/// Deletes every formula from the text.
///
/// Inline `$...$` spans are matched non-greedily and never nest; an escaped
/// `\$` inside a formula is not recognized. Removal is idempotent only when
/// dollar signs pair up: a stray `$` can pair with a later one on a second pass.
pub fn delete_formulas(text: &str) -> String {
    let text = delete_pattern(&RE_DISPLAY_DOLLARS, text);
    let text = RE_DISPLAY_BRACKETS.replace_all(&text, |caps: &Captures| {
        if caps.get(1).is_some() {
            String::new()
        } else {
            caps[0].to_string()
        }
    });
    delete_pattern(&RE_INLINE_FORMULA, &text)
}

// ============================================================================
// Phase 4: Environments
// ============================================================================

fn environment_pattern(name: &str) -> Regex {
    let name = regex::escape(name);
    Regex::new(&format!(r"(?s)\\begin\{{{name}\}}.*?\\end\{{{name}\}}")).unwrap()
}

static RE_ENVIRONMENTS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| ENVIRONMENTS.iter().map(|n| environment_pattern(n)).collect());

/// Deletes every `\begin{name}...\end{name}` span.
///
/// The first `\end{name}` after a `\begin{name}` closes it, so a nested
/// environment of the same name leaves its outer tail behind.
pub fn delete_environment(name: &str, text: &str) -> String {
    delete_pattern(&environment_pattern(name), text)
}

/// Deletes all environments of [`ENVIRONMENTS`], one name at a time.
pub fn delete_environments(text: &str) -> String {
    delete_all(RE_ENVIRONMENTS.iter(), text)
}

// ============================================================================
// Phase 5: Braced commands
// ============================================================================

fn braced_command_pattern(name: &str) -> Regex {
    let name = regex::escape(name);
    Regex::new(&format!(r"\\{name}\*?(?:\[[^\]]*\])?\{{[^}}]*\}}")).unwrap()
}

static RE_BRACED_COMMANDS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    BRACED_COMMANDS
        .iter()
        .map(|n| braced_command_pattern(n))
        .collect()
});

/// Deletes `\name`, an optional `[...]` and a single `{...}` group.
///
/// Nested braces inside the argument are not balanced: the first `}` closes it.
pub fn delete_braced_command(name: &str, text: &str) -> String {
    delete_pattern(&braced_command_pattern(name), text)
}

/// Deletes all commands of [`BRACED_COMMANDS`].
pub fn delete_braced_commands(text: &str) -> String {
    delete_all(RE_BRACED_COMMANDS.iter(), text)
}

// ============================================================================
// Phase 6: Unbraced commands
// ============================================================================

fn unbraced_command_pattern(name: &str) -> Regex {
    Regex::new(&format!(r"\\{} ", regex::escape(name))).unwrap()
}

static RE_UNBRACED_COMMANDS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    UNBRACED_COMMANDS
        .iter()
        .map(|n| unbraced_command_pattern(n))
        .collect()
});

/// Deletes `\name` followed by exactly one space.
pub fn delete_unbraced_command(name: &str, text: &str) -> String {
    delete_pattern(&unbraced_command_pattern(name), text)
}

/// Deletes all commands of [`UNBRACED_COMMANDS`].
pub fn delete_unbraced_commands(text: &str) -> String {
    delete_all(RE_UNBRACED_COMMANDS.iter(), text)
}

// ============================================================================
// Phase 7: Residual words
// ============================================================================

static RE_RESIDUAL_WORDS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    RESIDUAL_WORDS
        .iter()
        .map(|w| Regex::new(&format!(r"\b{w}")).unwrap())
        .collect()
});

/// Deletes the cross-reference words of [`RESIDUAL_WORDS`].
pub fn delete_residual_words(text: &str) -> String {
    delete_all(RE_RESIDUAL_WORDS.iter(), text)
}

// ============================================================================
// Main stripper
// ============================================================================

/// Strips markup from a full document.
///
/// Comments are removed from the whole text first, so a commented-out
/// delimiter never bounds the body. Fails only when `body_mode` is
/// [`BodyMode::Required`] and the document has no body.
pub fn strip_markup(name: &str, text: &str, body_mode: BodyMode) -> Result<Stripped> {
    let mut stats = StripStats::default();
    stats.record(Phase::Input, text);

    let text = delete_comments(text);
    stats.record(Phase::Comments, &text);

    let body = match body_mode {
        BodyMode::Required => extract_body(name, &text)?.to_string(),
        BodyMode::IfPresent => match extract_body(name, &text) {
            Ok(body) => body.to_string(),
            Err(_) => {
                debug!(document = name, "no document body, stripping whole text");
                text
            }
        },
        BodyMode::Skip => text,
    };
    stats.record(Phase::Body, &body);

    Ok(strip_content(body, stats))
}

/// Runs the content phases (formulas onward) on an already extracted body.
pub fn strip_body(body: &str) -> Stripped {
    let mut stats = StripStats::default();
    stats.record(Phase::Body, body);
    strip_content(body.to_string(), stats)
}

fn strip_content(body: String, mut stats: StripStats) -> Stripped {
    let body = delete_formulas(&body);
    stats.record(Phase::Formulas, &body);

    let body = delete_environments(&body);
    stats.record(Phase::Environments, &body);

    let body = delete_braced_commands(&body);
    stats.record(Phase::BracedCommands, &body);

    let body = delete_unbraced_commands(&body);
    stats.record(Phase::UnbracedCommands, &body);

    let body = delete_residual_words(&body).trim().to_string();
    stats.record(Phase::ResidualWords, &body);

    debug!(
        body_len = stats.body_len(),
        removed = stats.removed(),
        "strip_complete"
    );

    Stripped { text: body, stats }
}
