//! Built-in stopword lists.

use std::collections::HashSet;
use stop_words::{get, LANGUAGE};

/// English stopwords, lowercased.
pub fn english() -> HashSet<String> {
    get(LANGUAGE::English)
        .iter()
        .map(|s| s.to_string().to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_contains_common_words() {
        let words = english();
        assert!(words.contains("the"));
        assert!(words.contains("and"));
        assert!(words.contains("of"));
        assert!(!words.contains("manuscript"));
    }
}
