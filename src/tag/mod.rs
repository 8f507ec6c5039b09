//! Tokenization and part-of-speech tagging.
//!
//! A [`Tagger`] turns prose into a sequence of [`Token`]s, each carrying one
//! of the coarse [`Tag`](crate::Tag) categories. The built-in
//! [`RuleTagger`] works from closed-class word lists and suffix rules;
//! statistical taggers plug in behind the same trait.

pub mod rules;
pub mod tokenize;

pub use rules::RuleTagger;
pub use tokenize::{is_word_char, word_tokenize};

use crate::token::Token;

/// Splits text into tagged tokens.
pub trait Tagger: Send + Sync {
    /// Returns the tokens of `text` in input order.
    ///
    /// Whitespace never becomes a token and no token is empty.
    fn tag(&self, text: &str) -> Vec<Token>;
}
