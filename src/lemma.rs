//! Reduction of inflected words to their base form.
//!
//! [`RuleLemmatizer`] follows the WordNet morphology scheme: an exception
//! table for irregular forms, then suffix detachment rules per part of
//! speech. With a lexicon loaded, a detached form is only accepted when the
//! lexicon knows it. Without one, spelling heuristics choose between the
//! candidate stems (undoubling `stopp` -> `stop`, restoring a silent `e` in
//! `mak` -> `make`).

use crate::error::Result;
use crate::token::MorphTag;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Maps a word and its morphological tag to a base form.
pub trait Lemmatizer: Send + Sync {
    /// Returns the lemma of `word`, or `word` itself when no reduction
    /// applies.
    fn lemmatize(&self, word: &str, pos: MorphTag) -> String;
}

// ============================================================================
// Irregular forms
// ============================================================================

const NOUN_EXCEPTIONS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("mice", "mouse"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("appendices", "appendix"),
    ("analyses", "analysis"),
    ("hypotheses", "hypothesis"),
    ("theses", "thesis"),
    ("crises", "crisis"),
    ("axes", "axis"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("data", "datum"),
    ("schemata", "schema"),
    ("formulae", "formula"),
    ("spectra", "spectrum"),
    ("maxima", "maximum"),
    ("minima", "minimum"),
    ("optima", "optimum"),
    ("quanta", "quantum"),
    ("leaves", "leaf"),
    ("halves", "half"),
    ("lives", "life"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("selves", "self"),
    ("shelves", "shelf"),
    ("wolves", "wolf"),
    ("series", "series"),
    ("species", "species"),
    ("physics", "physics"),
    ("mathematics", "mathematics"),
    ("economics", "economics"),
    ("dynamics", "dynamics"),
    ("news", "news"),
    ("lens", "lens"),
    ("bias", "bias"),
];

const VERB_EXCEPTIONS: &[(&str, &str)] = &[
    ("am", "be"),
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("being", "be"),
    ("has", "have"),
    ("had", "have"),
    ("having", "have"),
    ("does", "do"),
    ("did", "do"),
    ("done", "do"),
    ("doing", "do"),
    ("goes", "go"),
    ("went", "go"),
    ("gone", "go"),
    ("going", "go"),
    ("made", "make"),
    ("took", "take"),
    ("taken", "take"),
    ("got", "get"),
    ("gotten", "get"),
    ("gave", "give"),
    ("given", "give"),
    ("saw", "see"),
    ("seen", "see"),
    ("found", "find"),
    ("shown", "show"),
    ("ran", "run"),
    ("wrote", "write"),
    ("written", "write"),
    ("came", "come"),
    ("began", "begin"),
    ("begun", "begin"),
    ("thought", "think"),
    ("brought", "bring"),
    ("bought", "buy"),
    ("knew", "know"),
    ("known", "know"),
    ("left", "leave"),
    ("felt", "feel"),
    ("kept", "keep"),
    ("held", "hold"),
    ("led", "lead"),
    ("said", "say"),
    ("told", "tell"),
    ("became", "become"),
    ("chose", "choose"),
    ("chosen", "choose"),
    ("built", "build"),
    ("sent", "send"),
    ("spent", "spend"),
    ("meant", "mean"),
    ("lost", "lose"),
    ("paid", "pay"),
    ("laid", "lay"),
    ("fell", "fall"),
    ("fallen", "fall"),
    ("grew", "grow"),
    ("grown", "grow"),
    ("drew", "draw"),
    ("drawn", "draw"),
    ("threw", "throw"),
    ("thrown", "throw"),
    ("won", "win"),
    ("stood", "stand"),
    ("understood", "understand"),
    ("taught", "teach"),
    ("caught", "catch"),
    ("sought", "seek"),
    ("fought", "fight"),
    ("struck", "strike"),
    ("hidden", "hide"),
    ("rose", "rise"),
    ("risen", "rise"),
    ("spoke", "speak"),
    ("spoken", "speak"),
    ("broke", "break"),
    ("broken", "break"),
    ("froze", "freeze"),
    ("frozen", "freeze"),
    ("forgot", "forget"),
    ("forgotten", "forget"),
    ("fed", "feed"),
    ("dying", "die"),
    ("lying", "lie"),
    ("tying", "tie"),
    ("agreed", "agree"),
    ("freed", "free"),
    ("created", "create"),
    ("creating", "create"),
    ("completed", "complete"),
    ("completing", "complete"),
    ("deleted", "delete"),
    ("deleting", "delete"),
    ("controlled", "control"),
    ("controlling", "control"),
    ("labelled", "label"),
    ("labelling", "label"),
    ("modelled", "model"),
    ("modelling", "model"),
    ("travelled", "travel"),
    ("travelling", "travel"),
    ("cancelled", "cancel"),
    ("cancelling", "cancel"),
    ("hanging", "hang"),
];

const ADJ_EXCEPTIONS: &[(&str, &str)] = &[
    ("better", "good"),
    ("best", "good"),
    ("worse", "bad"),
    ("worst", "bad"),
    ("further", "far"),
    ("farther", "far"),
    ("furthest", "far"),
    ("farthest", "far"),
];

const ADV_EXCEPTIONS: &[(&str, &str)] = &[
    ("better", "well"),
    ("best", "well"),
    ("further", "far"),
    ("farther", "far"),
    ("harder", "hard"),
    ("hardest", "hard"),
    ("deeper", "deeply"),
];

/// Adjectives compared with a plain `-er`/`-est` (or `-r`/`-st`).
const GRADABLE_ADJECTIVES: &[&str] = &[
    "small", "large", "high", "low", "great", "fast", "long", "short", "new", "old", "wide",
    "strong", "weak", "deep", "simple", "close", "late", "hard", "few", "near", "broad", "fine",
    "rare", "safe", "slow", "tight", "loose", "light", "dark", "cheap", "rich", "poor", "young",
    "clean", "clear", "quick", "sharp", "smooth", "steep", "thick", "dense", "sparse", "coarse",
];

// ============================================================================
// Detachment rules
// ============================================================================

const NOUN_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

const VERB_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ies", "y"),
    ("es", "e"),
    ("es", ""),
    ("ed", "e"),
    ("ed", ""),
    ("ing", "e"),
    ("ing", ""),
];

const ADJ_RULES: &[(&str, &str)] = &[
    ("er", ""),
    ("est", ""),
    ("er", "e"),
    ("est", "e"),
    ("ier", "y"),
    ("iest", "y"),
];

fn exceptions(pos: MorphTag) -> &'static [(&'static str, &'static str)] {
    match pos {
        MorphTag::N => NOUN_EXCEPTIONS,
        MorphTag::V => VERB_EXCEPTIONS,
        MorphTag::A => ADJ_EXCEPTIONS,
        MorphTag::R => ADV_EXCEPTIONS,
    }
}

fn rules(pos: MorphTag) -> &'static [(&'static str, &'static str)] {
    match pos {
        MorphTag::N => NOUN_RULES,
        MorphTag::V => VERB_RULES,
        MorphTag::A => ADJ_RULES,
        MorphTag::R => &[],
    }
}

fn exception(word: &str, pos: MorphTag) -> Option<&'static str> {
    exceptions(pos)
        .iter()
        .find(|(form, _)| *form == word)
        .map(|(_, lemma)| *lemma)
}

/// Every form produced by one detachment rule.
fn detached_forms(word: &str, pos: MorphTag) -> Vec<String> {
    rules(pos)
        .iter()
        .filter_map(|(suffix, replacement)| {
            word.strip_suffix(suffix)
                .filter(|stem| !stem.is_empty())
                .map(|stem| format!("{stem}{replacement}"))
        })
        .collect()
}

// ============================================================================
// Lemmatizer
// ============================================================================

/// Exception tables plus suffix rules, optionally checked against a lexicon.
#[derive(Debug, Clone, Default)]
pub struct RuleLemmatizer {
    lexicon: Option<HashSet<String>>,
}

impl RuleLemmatizer {
    /// Creates a lemmatizer that relies on spelling heuristics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts detached forms to the given base words.
    pub fn with_lexicon<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.lexicon = Some(
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        );
        self
    }

    /// Loads a lexicon from a word list, one entry per line.
    ///
    /// Only the first whitespace-separated field of a line is read, and lines
    /// starting with whitespace are skipped, so WordNet `index.*` files load
    /// directly. Multi-word entries joined by `_` are ignored.
    pub fn from_lexicon_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let words = content
            .lines()
            .filter(|line| !line.starts_with(char::is_whitespace))
            .filter_map(|line| line.split_whitespace().next())
            .filter(|word| !word.contains('_'));
        Ok(Self::new().with_lexicon(words))
    }

    /// Returns true if a lexicon is loaded.
    pub fn has_lexicon(&self) -> bool {
        self.lexicon.is_some()
    }
}

impl Lemmatizer for RuleLemmatizer {
    fn lemmatize(&self, word: &str, pos: MorphTag) -> String {
        // Compounds, numbers and symbols are not in the vocabulary.
        if word.is_empty() || !word.chars().all(char::is_alphabetic) {
            return word.to_string();
        }

        let lower = word.to_lowercase();
        if let Some(lemma) = exception(&lower, pos) {
            return lemma.to_string();
        }

        match &self.lexicon {
            Some(lexicon) => lexicon_lemma(&lower, pos, lexicon),
            None => match pos {
                MorphTag::N => noun_lemma(&lower),
                MorphTag::V => verb_lemma(&lower),
                MorphTag::A => adjective_lemma(&lower),
                MorphTag::R => lower,
            },
        }
    }
}

/// Shortest known form among the word and its detached forms.
fn lexicon_lemma(word: &str, pos: MorphTag, lexicon: &HashSet<String>) -> String {
    std::iter::once(word.to_string())
        .chain(detached_forms(word, pos))
        .filter(|form| lexicon.contains(form))
        .min_by_key(|form| form.chars().count())
        .unwrap_or_else(|| word.to_string())
}

// ============================================================================
// Spelling heuristics
// ============================================================================

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// `y` counts as a vowel except at the start of a word.
fn is_vowel_at(chars: &[char], i: usize) -> bool {
    is_vowel(chars[i]) || (chars[i] == 'y' && i > 0)
}

fn has_vowel(word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    (0..chars.len()).any(|i| is_vowel_at(&chars, i))
}

fn vowel_groups(chars: &[char]) -> usize {
    (0..chars.len())
        .filter(|&i| is_vowel_at(chars, i) && (i == 0 || !is_vowel_at(chars, i - 1)))
        .count()
}

/// Consonant, single vowel, consonant at the end of `chars[..end]`.
fn ends_cvc(chars: &[char], end: usize) -> bool {
    if end < 2 {
        return false;
    }
    let (v, c) = (end - 2, end - 1);
    !is_vowel_at(chars, c)
        && is_vowel_at(chars, v)
        && (v == 0 || !is_vowel_at(chars, v - 1))
}

/// `stopp` -> `stop`, `occurr` -> `occur`; not `add`, `fill`, `kiss`.
fn undouble(stem: &str) -> Option<String> {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    if n < 4 {
        return None;
    }
    let last = chars[n - 1];
    let doubled = last == chars[n - 2] && !is_vowel(last) && !matches!(last, 'l' | 's' | 'z' | 'f');
    let cvc = ends_cvc(&chars, n - 1) && !is_vowel_at(&chars, n - 4);
    (doubled && cvc).then(|| chars[..n - 1].iter().collect())
}

/// Stem endings left behind when a silent `e` was dropped.
const SILENT_E_ENDINGS: &[&str] = &[
    "v", "c", "u", "aus", "ous", "dg", "rg", "ag", "ang", "rs", "ns", "ps", "bl", "cl", "dl",
    "fl", "gl", "kl", "pl", "tl", "zl",
];

/// Endings that take a silent `e` when preceded by a consonant and the stem
/// has at least five letters.
const LONG_SILENT_E_ENDINGS: &[&str] = &["at", "ut", "id", "ud", "ir", "ur", "ar", "os", "in"];

fn needs_silent_e(stem: &str) -> bool {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    if n < 2 {
        return false;
    }
    if stem.ends_with('z') && !stem.ends_with("zz") {
        return true;
    }
    if SILENT_E_ENDINGS.iter().any(|e| stem.ends_with(e)) {
        return true;
    }
    if n >= 5 && LONG_SILENT_E_ENDINGS.iter().any(|e| stem.ends_with(e)) {
        // `qu` acts as a consonant: requir, acquir
        let before = n - 3;
        if !is_vowel_at(&chars, before) || (chars[before] == 'u' && chars[before - 1] == 'q') {
            return true;
        }
    }
    // One-syllable consonant-vowel-consonant stems: mak, us, not, typ
    vowel_groups(&chars) == 1
        && ends_cvc(&chars, n)
        && !matches!(chars[n - 1], 'w' | 'x' | 'y')
}

/// Rebuilds a verb stem after `-ed` or `-ing` was removed.
fn restore_stem(stem: &str) -> String {
    if let Some(undoubled) = undouble(stem) {
        return undoubled;
    }
    if needs_silent_e(stem) {
        return format!("{stem}e");
    }
    stem.to_string()
}

fn noun_lemma(word: &str) -> String {
    if word.chars().count() <= 3 || ["ss", "us", "is"].iter().any(|s| word.ends_with(s)) {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("ies") {
        if stem.chars().count() > 1 {
            return format!("{stem}y");
        }
    }
    if ["sses", "xes", "zzes", "ches", "shes"].iter().any(|s| word.ends_with(s)) {
        return word[..word.len() - 2].to_string();
    }
    match word.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => word.to_string(),
    }
}

fn verb_lemma(word: &str) -> String {
    let len = word.chars().count();
    if len <= 3 {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{stem}y");
    }
    if ["sses", "xes", "zzes", "ches", "shes"].iter().any(|s| word.ends_with(s)) {
        return word[..word.len() - 2].to_string();
    }
    if let Some(stem) = word.strip_suffix("ied") {
        return if len > 4 {
            format!("{stem}y")
        } else {
            word[..word.len() - 1].to_string()
        };
    }
    if word.ends_with("eed") {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("ed").or_else(|| word.strip_suffix("ing")) {
        if stem.chars().count() >= 2 && has_vowel(stem) {
            return restore_stem(stem);
        }
        return word.to_string();
    }
    if ["ss", "us", "is"].iter().any(|s| word.ends_with(s)) {
        return word.to_string();
    }
    match word.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => word.to_string(),
    }
}

fn adjective_lemma(word: &str) -> String {
    for base in GRADABLE_ADJECTIVES {
        let (comparative, superlative) = if base.ends_with('e') {
            (format!("{base}r"), format!("{base}st"))
        } else {
            (format!("{base}er"), format!("{base}est"))
        };
        if word == comparative || word == superlative {
            return base.to_string();
        }
    }

    for (suffix, replacement) in [("iest", "y"), ("ier", "y")] {
        if let Some(stem) = word.strip_suffix(suffix) {
            if stem.chars().count() >= 2 {
                return format!("{stem}{replacement}");
            }
        }
    }

    // bigger, hottest, thinnest
    for suffix in ["est", "er"] {
        if let Some(undoubled) = word.strip_suffix(suffix).and_then(undouble_short) {
            return undoubled;
        }
    }
    word.to_string()
}

/// `bigg` -> `big`: three-letter stems are allowed for adjectives.
fn undouble_short(stem: &str) -> Option<String> {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    if n < 3 {
        return None;
    }
    let last = chars[n - 1];
    let doubled = last == chars[n - 2] && !is_vowel(last) && !matches!(last, 'l' | 's' | 'z' | 'f');
    (doubled && ends_cvc(&chars, n - 1)).then(|| chars[..n - 1].iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lemma(word: &str, pos: MorphTag) -> String {
        RuleLemmatizer::new().lemmatize(word, pos)
    }

    #[test]
    fn test_noun_plurals() {
        assert_eq!(lemma("terms", MorphTag::N), "term");
        assert_eq!(lemma("studies", MorphTag::N), "study");
        assert_eq!(lemma("classes", MorphTag::N), "class");
        assert_eq!(lemma("boxes", MorphTag::N), "box");
        assert_eq!(lemma("approaches", MorphTag::N), "approach");
        assert_eq!(lemma("phases", MorphTag::N), "phase");
        assert_eq!(lemma("analysis", MorphTag::N), "analysis");
        assert_eq!(lemma("corpus", MorphTag::N), "corpus");
        assert_eq!(lemma("gas", MorphTag::N), "gas");
    }

    #[test]
    fn test_irregular_nouns() {
        assert_eq!(lemma("children", MorphTag::N), "child");
        assert_eq!(lemma("matrices", MorphTag::N), "matrix");
        assert_eq!(lemma("criteria", MorphTag::N), "criterion");
        assert_eq!(lemma("series", MorphTag::N), "series");
    }

    #[test]
    fn test_verb_inflections() {
        assert_eq!(lemma("occurring", MorphTag::V), "occur");
        assert_eq!(lemma("running", MorphTag::V), "run");
        assert_eq!(lemma("stopped", MorphTag::V), "stop");
        assert_eq!(lemma("making", MorphTag::V), "make");
        assert_eq!(lemma("using", MorphTag::V), "use");
        assert_eq!(lemma("used", MorphTag::V), "use");
        assert_eq!(lemma("added", MorphTag::V), "add");
        assert_eq!(lemma("normalized", MorphTag::V), "normalize");
        assert_eq!(lemma("studied", MorphTag::V), "study");
        assert_eq!(lemma("shows", MorphTag::V), "show");
        assert_eq!(lemma("computing", MorphTag::V), "compute");
        assert_eq!(lemma("provided", MorphTag::V), "provide");
        assert_eq!(lemma("required", MorphTag::V), "require");
        assert_eq!(lemma("visited", MorphTag::V), "visit");
        assert_eq!(lemma("needed", MorphTag::V), "need");
        assert_eq!(lemma("tested", MorphTag::V), "test");
        assert_eq!(lemma("need", MorphTag::V), "need");
    }

    #[test]
    fn test_irregular_verbs() {
        assert_eq!(lemma("was", MorphTag::V), "be");
        assert_eq!(lemma("written", MorphTag::V), "write");
        assert_eq!(lemma("found", MorphTag::V), "find");
    }

    #[test]
    fn test_adjectives() {
        assert_eq!(lemma("better", MorphTag::A), "good");
        assert_eq!(lemma("larger", MorphTag::A), "large");
        assert_eq!(lemma("smallest", MorphTag::A), "small");
        assert_eq!(lemma("bigger", MorphTag::A), "big");
        assert_eq!(lemma("happier", MorphTag::A), "happy");
        // not comparatives
        assert_eq!(lemma("proper", MorphTag::A), "proper");
        assert_eq!(lemma("honest", MorphTag::A), "honest");
    }

    #[test]
    fn test_adverbs_use_exceptions_only() {
        assert_eq!(lemma("better", MorphTag::R), "well");
        assert_eq!(lemma("quickly", MorphTag::R), "quickly");
    }

    #[test]
    fn test_lemmas_are_lowercase() {
        assert_eq!(lemma("Terms", MorphTag::N), "term");
        assert_eq!(lemma("WAS", MorphTag::V), "be");
    }

    #[test]
    fn test_unknown_shapes_unchanged() {
        assert_eq!(lemma("co-occurring", MorphTag::V), "co-occurring");
        assert_eq!(lemma("3D", MorphTag::N), "3D");
        assert_eq!(lemma("", MorphTag::N), "");
    }

    #[test]
    fn test_lexicon_restricts_forms() {
        let lemmatizer = RuleLemmatizer::new().with_lexicon(["term", "dog", "occur"]);
        assert!(lemmatizer.has_lexicon());
        assert_eq!(lemmatizer.lemmatize("terms", MorphTag::N), "term");
        assert_eq!(lemmatizer.lemmatize("dogs", MorphTag::N), "dog");
        // WordNet-style detachment never undoubles
        assert_eq!(lemmatizer.lemmatize("occurring", MorphTag::V), "occurring");
        assert_eq!(lemmatizer.lemmatize("cats", MorphTag::N), "cats");
        assert_eq!(lemmatizer.lemmatize("children", MorphTag::N), "child");
    }

    #[test]
    fn test_lexicon_prefers_shortest_form() {
        let lemmatizer = RuleLemmatizer::new().with_lexicon(["us", "use"]);
        assert_eq!(lemmatizer.lemmatize("uses", MorphTag::V), "us");
    }

    #[test]
    fn test_lexicon_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.noun");
        fs::write(
            &path,
            "  1 This software and database is being provided\nterm n 2 1 @ 2 0 0\nword_list n 1\ncase n 3\n",
        )
        .unwrap();

        let lemmatizer = RuleLemmatizer::from_lexicon_file(&path).unwrap();
        assert_eq!(lemmatizer.lemmatize("terms", MorphTag::N), "term");
        assert_eq!(lemmatizer.lemmatize("cases", MorphTag::N), "case");
    }

    #[test]
    fn test_missing_lexicon_file() {
        let err = RuleLemmatizer::from_lexicon_file("/nonexistent/index.noun").unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
