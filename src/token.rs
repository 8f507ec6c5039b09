//! Tagged word tokens.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse grammatical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tag {
    /// Nouns, proper nouns
    Noun,
    /// Verbs, auxiliaries, modals
    Verb,
    /// Adjectives
    Adj,
    /// Adverbs
    Adv,
    /// Everything else: punctuation, determiners, pronouns, numbers, ...
    Other,
}

impl Tag {
    /// All tags, in declaration order.
    pub const ALL: [Tag; 5] = [Tag::Noun, Tag::Verb, Tag::Adj, Tag::Adv, Tag::Other];

    /// Maps the tag to the morphological subset used for lemmatization.
    ///
    /// Returns `None` for [`Tag::Other`], which is never lemmatized.
    pub fn morph(self) -> Option<MorphTag> {
        match self {
            Tag::Noun => Some(MorphTag::N),
            Tag::Verb => Some(MorphTag::V),
            Tag::Adj => Some(MorphTag::A),
            Tag::Adv => Some(MorphTag::R),
            Tag::Other => None,
        }
    }

    /// Upper-case name, as used in serialized output.
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Noun => "NOUN",
            Tag::Verb => "VERB",
            Tag::Adj => "ADJ",
            Tag::Adv => "ADV",
            Tag::Other => "OTHER",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NOUN" | "N" => Ok(Tag::Noun),
            "VERB" | "V" => Ok(Tag::Verb),
            "ADJ" | "A" => Ok(Tag::Adj),
            "ADV" | "R" => Ok(Tag::Adv),
            "OTHER" => Ok(Tag::Other),
            other => Err(format!("unknown tag: {}", other)),
        }
    }
}

/// Morphological tag subset understood by lemmatizers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MorphTag {
    /// noun
    N,
    /// verb
    V,
    /// adjective
    A,
    /// adverb
    R,
}

impl MorphTag {
    /// Single-letter code (`n`, `v`, `a`, `r`).
    pub fn code(self) -> char {
        match self {
            MorphTag::N => 'n',
            MorphTag::V => 'v',
            MorphTag::A => 'a',
            MorphTag::R => 'r',
        }
    }
}

/// A word token with its grammatical tag.
///
/// Tokens are never mutated in place; each transform returns a new token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// Surface form
    pub text: String,
    /// Grammatical category
    pub tag: Tag,
}

impl Token {
    /// Creates a new token.
    pub fn new(text: impl Into<String>, tag: Tag) -> Self {
        Self {
            text: text.into(),
            tag,
        }
    }

    /// Returns a token with the same tag and new text.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self::new(text, self.tag)
    }

    /// Returns the lowercased, trimmed token.
    pub fn lowercased(&self) -> Self {
        self.with_text(self.text.to_lowercase().trim())
    }

    /// Splits the token at every hyphen, dropping empty segments.
    ///
    /// Every segment inherits the original tag. A token without a hyphen
    /// yields itself.
    pub fn split_hyphens(&self) -> Vec<Token> {
        if !self.text.contains('-') {
            return vec![self.clone()];
        }
        self.text
            .split('-')
            .filter(|segment| !segment.is_empty())
            .map(|segment| self.with_text(segment))
            .collect()
    }

    /// Number of characters in the token text.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Returns true if the text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.text, self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_morph_mapping() {
        assert_eq!(Tag::Noun.morph(), Some(MorphTag::N));
        assert_eq!(Tag::Verb.morph(), Some(MorphTag::V));
        assert_eq!(Tag::Adj.morph(), Some(MorphTag::A));
        assert_eq!(Tag::Adv.morph(), Some(MorphTag::R));
        assert_eq!(Tag::Other.morph(), None);
        assert_eq!(MorphTag::R.code(), 'r');
    }

    #[test]
    fn test_tag_parse_and_display() {
        for tag in Tag::ALL {
            assert_eq!(tag.to_string().parse::<Tag>().unwrap(), tag);
        }
        assert_eq!("adj".parse::<Tag>().unwrap(), Tag::Adj);
        assert!("PUNCT".parse::<Tag>().is_err());
    }

    #[test]
    fn test_tag_serde_uppercase() {
        let json = serde_json::to_string(&Token::new("run", Tag::Verb)).unwrap();
        assert_eq!(json, r#"{"text":"run","tag":"VERB"}"#);
    }

    #[test]
    fn test_split_hyphens_inherits_tag() {
        let token = Token::new("well-known", Tag::Adj);
        let parts = token.split_hyphens();
        assert_eq!(
            parts,
            vec![Token::new("well", Tag::Adj), Token::new("known", Tag::Adj)]
        );
    }

    #[test]
    fn test_split_hyphens_drops_empty_segments() {
        let parts = Token::new("-x--y-", Tag::Noun).split_hyphens();
        let texts: Vec<&str> = parts.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["x", "y"]);
        assert!(Token::new("--", Tag::Other).split_hyphens().is_empty());
    }

    #[test]
    fn test_lowercased_trims() {
        let token = Token::new("  Hello ", Tag::Noun).lowercased();
        assert_eq!(token.text, "hello");
        assert_eq!(token.tag, Tag::Noun);
    }
}
