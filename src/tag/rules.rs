//! Rule-based part-of-speech tagger.

use super::tokenize::word_tokenize;
use super::Tagger;
use crate::token::{Tag, Token};
use std::collections::HashMap;

// ============================================================================
// Word lists
// ============================================================================

/// Determiners, pronouns, prepositions, conjunctions, particles, numerals.
const FUNCTION_WORDS: &[&str] = &[
    // determiners
    "a", "an", "the", "this", "that", "these", "those", "each", "every", "some", "any", "no",
    "all", "both", "either", "neither", "another", "such", "what", "which", "whose",
    // pronouns
    "i", "me", "my", "mine", "myself", "you", "your", "yours", "yourself", "yourselves", "he",
    "him", "his", "himself", "she", "her", "hers", "herself", "it", "its", "itself", "we", "us",
    "our", "ours", "ourselves", "they", "them", "their", "theirs", "themselves", "who", "whom",
    "whoever", "there",
    // prepositions
    "of", "in", "on", "at", "by", "for", "with", "without", "within", "from", "into", "onto",
    "upon", "over", "under", "above", "below", "between", "among", "through", "throughout",
    "during", "before", "after", "since", "until", "against", "across", "along", "around",
    "behind", "beyond", "toward", "towards", "via", "per", "despite", "except", "about", "than",
    "as", "to", "like",
    // conjunctions
    "and", "or", "but", "nor", "if", "whether", "because", "although", "though", "while",
    "whereas", "unless", "whereby", "where", "when", "why", "how",
    // particles
    "'s",
    // numerals
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "hundred", "thousand", "million",
];

/// Auxiliaries and modals.
const AUXILIARIES: &[&str] = &[
    "be", "is", "am", "are", "was", "were", "been", "being", "have", "has", "had", "having", "do",
    "does", "did", "'re", "'ve", "'m",
];

const MODALS: &[&str] = &[
    "can", "could", "may", "might", "must", "shall", "should", "will", "would", "ca", "wo",
    "'ll", "'d",
];

const ADVERBS: &[&str] = &[
    "not", "n't", "very", "also", "only", "just", "then", "here", "thus", "hence", "however",
    "therefore", "moreover", "furthermore", "often", "always", "never", "sometimes", "again",
    "already", "still", "even", "too", "quite", "rather", "almost", "so", "now", "well", "more",
    "most", "less", "least", "yet", "instead", "indeed", "perhaps", "once", "twice", "soon",
];

const ADJECTIVES: &[&str] = &[
    "good", "bad", "new", "old", "high", "low", "large", "small", "big", "long", "short",
    "great", "different", "same", "similar", "important", "possible", "many", "few", "much",
    "several", "various", "other", "own", "certain", "main", "first", "last", "next", "early",
    "late", "simple", "whole", "true", "false", "free", "full", "hard", "easy", "recent",
];

/// `-ly` words that are not adverbs.
const LY_NOUNS: &[&str] = &[
    "family", "supply", "apply", "reply", "rely", "assembly", "anomaly", "monopoly", "ally",
    "fly", "july", "italy", "belly", "jelly", "butterfly", "comply", "multiply",
];

/// `-ing` and `-ed` words that are not verbs.
const NON_VERB_SUFFIXED: &[&str] = &[
    "thing", "nothing", "something", "anything", "everything", "string", "king", "ring",
    "spring", "morning", "evening", "ceiling", "during", "bed", "red", "seed", "speed", "need",
    "indeed", "hundred", "kindred",
];

/// `-al` words that are not adjectives.
const AL_NOUNS: &[&str] = &[
    "animal", "signal", "journal", "material", "interval", "proposal", "approval", "arrival",
    "capital", "crystal", "metal", "festival", "principal", "terminal", "manual", "portal",
    "tutorial", "trial", "goal", "deal",
];

const ADJECTIVE_SUFFIXES: &[&str] = &[
    "ous", "ful", "ible", "able", "ive", "less", "ical", "ic", "al", "ary", "ish", "ular",
];

const VERB_SUFFIXES: &[&str] = &["ize", "ise", "ify"];

// ============================================================================
// Tagger
// ============================================================================

/// Tags words from closed-class lists, suffix shapes and one word of left
/// context. Unknown words default to [`Tag::Noun`].
#[derive(Debug, Clone, Default)]
pub struct RuleTagger {
    overrides: HashMap<String, Tag>,
}

impl RuleTagger {
    /// Creates a tagger with the built-in rules only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds fixed tags for specific words (matched case-insensitively).
    ///
    /// Overrides win over every built-in rule.
    pub fn with_lexicon<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Tag)>,
        S: AsRef<str>,
    {
        self.overrides.extend(
            entries
                .into_iter()
                .map(|(word, tag)| (word.as_ref().to_lowercase(), tag)),
        );
        self
    }

    /// Tags one word given the previous word, if any.
    pub fn tag_word(&self, word: &str, prev: Option<&str>) -> Tag {
        if !word.chars().any(char::is_alphabetic) {
            return Tag::Other;
        }

        let lower = word.to_lowercase();
        if let Some(&tag) = self.overrides.get(&lower) {
            return tag;
        }
        if let Some(tag) = closed_class(&lower) {
            return tag;
        }

        let after_infinitive = prev
            .map(|p| p.to_lowercase())
            .is_some_and(|p| p == "to" || MODALS.contains(&p.as_str()));
        if after_infinitive && !lower.ends_with("ly") {
            return Tag::Verb;
        }

        // Compounds take the category of their head.
        let head = lower.rsplit('-').next().unwrap_or(lower.as_str());
        if head != lower {
            if let Some(tag) = closed_class(head) {
                return tag;
            }
        }
        suffix_tag(head)
    }
}

impl Tagger for RuleTagger {
    fn tag(&self, text: &str) -> Vec<Token> {
        let words = word_tokenize(text);
        let mut tokens = Vec::with_capacity(words.len());
        let mut prev: Option<&str> = None;
        for word in &words {
            tokens.push(Token::new(word.as_str(), self.tag_word(word, prev)));
            prev = Some(word.as_str());
        }
        tokens
    }
}

fn closed_class(word: &str) -> Option<Tag> {
    if FUNCTION_WORDS.contains(&word) {
        Some(Tag::Other)
    } else if AUXILIARIES.contains(&word) || MODALS.contains(&word) {
        Some(Tag::Verb)
    } else if ADVERBS.contains(&word) {
        Some(Tag::Adv)
    } else if ADJECTIVES.contains(&word) {
        Some(Tag::Adj)
    } else {
        None
    }
}

fn suffix_tag(word: &str) -> Tag {
    let len = word.chars().count();

    if word.ends_with("ly") && len > 4 && !LY_NOUNS.contains(&word) {
        return Tag::Adv;
    }
    if NON_VERB_SUFFIXED.contains(&word) {
        return Tag::Noun;
    }
    if (word.ends_with("ing") && len > 4) || (word.ends_with("ed") && len > 3) {
        return Tag::Verb;
    }
    if VERB_SUFFIXES.iter().any(|s| word.ends_with(s)) && len > 5 {
        return Tag::Verb;
    }
    if len > 4
        && !AL_NOUNS.contains(&word)
        && ADJECTIVE_SUFFIXES.iter().any(|s| word.ends_with(s))
    {
        return Tag::Adj;
    }
    Tag::Noun
}
