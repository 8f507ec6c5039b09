//! Word tokenization over a character cursor.
//!
//! Splits prose into words and punctuation, in input order:
//!
//! - words are runs of letters, digits and `_`, joined across internal
//!   hyphens (`co-occurring`), periods (`3.14`, `e.g.`) and apostrophes
//!   (`O'Brien`)
//! - contraction suffixes become their own tokens (`it's` -> `it`, `'s`;
//!   `don't` -> `do`, `n't`)
//! - every other non-space character is a token; runs of `-`, `.`, `` ` ``
//!   and `'` are kept together (`--`, `...`)

/// Suffixes split off a word after an apostrophe.
const CONTRACTION_SUFFIXES: &[&str] = &["s", "re", "ve", "ll", "d", "m"];

/// Splits text into word and punctuation tokens. Never yields empty tokens.
pub fn word_tokenize(text: &str) -> Vec<String> {
    WordCursor::new(text).collect()
}

/// Returns true for characters that make up words.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == '\u{2019}'
}

struct WordCursor {
    chars: Vec<char>,
    pos: usize,
}

impl WordCursor {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn take(&mut self, len: usize) -> String {
        let end = (self.pos + len).min(self.chars.len());
        let token = self.chars[self.pos..end].iter().collect();
        self.pos = end;
        token
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek_at(0), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    /// `n't` at `at`, followed by a non-word character or the end.
    fn is_negation(&self, at: usize) -> bool {
        matches!(self.chars.get(at), Some('n' | 'N'))
            && matches!(self.chars.get(at + 1), Some(&c) if is_apostrophe(c))
            && matches!(self.chars.get(at + 2), Some('t' | 'T'))
            && !matches!(self.chars.get(at + 3), Some(&c) if is_word_char(c))
    }

    /// Length of a contraction suffix (apostrophe included) starting at `at`.
    fn suffix_len(&self, at: usize) -> Option<usize> {
        if !matches!(self.chars.get(at), Some(&c) if is_apostrophe(c)) {
            return None;
        }
        let letters: String = self.chars[at + 1..]
            .iter()
            .take_while(|c| c.is_alphabetic())
            .collect::<String>()
            .to_lowercase();
        let end = at + 1 + letters.chars().count();
        if matches!(self.chars.get(end), Some(&c) if is_word_char(c)) {
            return None;
        }
        CONTRACTION_SUFFIXES
            .contains(&letters.as_str())
            .then_some(end - at)
    }

    fn read_word(&mut self) -> String {
        let start = self.pos;
        loop {
            while let Some(c) = self.peek_at(0) {
                if !is_word_char(c) || (self.pos > start && self.is_negation(self.pos)) {
                    break;
                }
                self.pos += 1;
            }

            match (self.peek_at(0), self.peek_at(1)) {
                (Some('-' | '.'), Some(next)) if is_word_char(next) => self.pos += 1,
                (Some(c), Some(next)) if is_apostrophe(c) && next.is_alphabetic() => {
                    if self.suffix_len(self.pos).is_some() {
                        break;
                    }
                    self.pos += 1;
                }
                _ => break,
            }
        }

        // Trailing period of a dotted abbreviation such as `e.g.`
        if self.peek_at(0) == Some('.') && is_dotted_abbreviation(&self.chars[start..self.pos]) {
            self.pos += 1;
        }

        self.chars[start..self.pos].iter().collect()
    }

    fn read_symbol(&mut self) -> String {
        let start = self.pos;
        let first = self.chars[start];
        self.pos += 1;
        if matches!(first, '-' | '.' | '`' | '\'') {
            while self.peek_at(0) == Some(first) {
                self.pos += 1;
            }
        }
        self.chars[start..self.pos].iter().collect()
    }
}

impl Iterator for WordCursor {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.skip_whitespace();
        let c = self.peek_at(0)?;

        if self.is_negation(self.pos) {
            return Some(self.take(3));
        }
        if is_word_char(c) {
            return Some(self.read_word());
        }
        let follows_word = self.pos > 0 && is_word_char(self.chars[self.pos - 1]);
        if follows_word {
            if let Some(len) = self.suffix_len(self.pos) {
                return Some(self.take(len));
            }
        }
        Some(self.read_symbol())
    }
}

/// `e.g`, `i.e`, `U.S`: single letters separated by periods.
fn is_dotted_abbreviation(chars: &[char]) -> bool {
    let word: String = chars.iter().collect();
    let mut parts = word.split('.');
    let all_single = parts
        .clone()
        .all(|p| p.chars().count() == 1 && p.chars().all(char::is_alphabetic));
    all_single && parts.nth(1).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_and_punctuation() {
        assert_eq!(
            word_tokenize("Hello, world! This works."),
            vec!["Hello", ",", "world", "!", "This", "works", "."]
        );
    }

    #[test]
    fn test_hyphenated_compound_kept() {
        assert_eq!(
            word_tokenize("co-occurring terms"),
            vec!["co-occurring", "terms"]
        );
        assert_eq!(word_tokenize("well-known"), vec!["well-known"]);
    }

    #[test]
    fn test_dash_runs() {
        assert_eq!(word_tokenize("a -- b - c"), vec!["a", "--", "b", "-", "c"]);
        assert_eq!(word_tokenize("wait..."), vec!["wait", "..."]);
    }

    #[test]
    fn test_contractions() {
        assert_eq!(word_tokenize("it's"), vec!["it", "'s"]);
        assert_eq!(word_tokenize("don't stop"), vec!["do", "n't", "stop"]);
        assert_eq!(word_tokenize("we'll see"), vec!["we", "'ll", "see"]);
        assert_eq!(word_tokenize("O'Brien"), vec!["O'Brien"]);
    }

    #[test]
    fn test_quotes_are_separate() {
        assert_eq!(
            word_tokenize("the 'model' works"),
            vec!["the", "'", "model", "'", "works"]
        );
    }

    #[test]
    fn test_numbers_and_abbreviations() {
        assert_eq!(word_tokenize("pi is 3.14."), vec!["pi", "is", "3.14", "."]);
        assert_eq!(word_tokenize("e.g. this"), vec!["e.g.", "this"]);
    }

    #[test]
    fn test_latex_leftovers() {
        assert_eq!(word_tokenize("~1 shows ."), vec!["~", "1", "shows", "."]);
        assert_eq!(
            word_tokenize(r"\textbf{bold}"),
            vec!["\\", "textbf", "{", "bold", "}"]
        );
    }

    #[test]
    fn test_no_empty_tokens() {
        let tokens = word_tokenize("  \t\n weird   ,, spacing -- ' ");
        assert!(tokens.iter().all(|t| !t.is_empty()));
        assert!(word_tokenize("").is_empty());
        assert!(word_tokenize("   ").is_empty());
    }

    #[test]
    fn test_unicode_words() {
        assert_eq!(word_tokenize("Café naïve"), vec!["Café", "naïve"]);
    }
}
