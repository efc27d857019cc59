use regex::Regex;
use std::collections::BTreeMap;

/// Splits text into normalized word tokens, in order of appearance.
///
/// Tokens are maximal runs of alphanumeric/underscore characters, lowercased;
/// everything else is a separator. Tokens of a single character are noise,
/// not content, and are dropped. Pure and deterministic: same input, same
/// output, any number of times. Empty or non-text input yields an empty vec.
pub fn tokenize(text: &str) -> Vec<String> {
    let re = Regex::new(r"\w+").unwrap();
    re.find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .filter(|word| word.chars().count() > 1)
        .collect()
}

/// Counts occurrences per distinct word in a token sequence.
///
/// The map is local to one aggregation job and ordered by word, so the
/// persistence pass is independent of the tokens' insertion order.
pub fn word_frequencies(tokens: &[String]) -> BTreeMap<String, i64> {
    let mut frequencies = BTreeMap::new();
    for token in tokens {
        *frequencies.entry(token.clone()).or_insert(0) += 1;
    }
    frequencies
}

/// Normalizes a search word the same way `tokenize` normalizes tokens, so
/// search stays consistent with what was indexed.
pub fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}
