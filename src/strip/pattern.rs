//! Regex deletion primitive shared by every stripping phase.

use regex::Regex;

/// Deletes every match of `pattern` from `text`.
///
/// Total: an input without matches comes back unchanged.
pub fn delete_pattern(pattern: &Regex, text: &str) -> String {
    pattern.replace_all(text, "").into_owned()
}

/// Applies [`delete_pattern`] for each pattern, in order.
pub fn delete_all<'a>(patterns: impl IntoIterator<Item = &'a Regex>, text: &str) -> String {
    patterns
        .into_iter()
        .fold(text.to_string(), |acc, pattern| delete_pattern(pattern, &acc))
}
