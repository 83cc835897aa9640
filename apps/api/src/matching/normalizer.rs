//! Text Normalizer — lower-cases, strips punctuation, collapses whitespace and
//! removes stop words before any similarity comparison.
//!
//! Total over its input: empty or punctuation-only text normalizes to `""`.

use std::collections::HashSet;

/// Built-in English stop words. Replaced wholesale when a custom set is configured.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "about", "across", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "been", "being", "both", "but", "by", "can", "could", "did", "do", "does", "each", "eg",
    "etc", "for", "from", "had", "has", "have", "he", "her", "here", "his", "how", "i", "ie",
    "if", "in", "into", "is", "it", "its", "may", "me", "might", "more", "most", "must", "my",
    "no", "nor", "not", "of", "on", "onto", "or", "our", "ours", "per", "shall", "she", "should",
    "so", "some", "such", "than", "that", "the", "their", "them", "then", "there", "these",
    "they", "this", "those", "to", "up", "us", "very", "via", "was", "we", "were", "what",
    "when", "where", "which", "while", "who", "whom", "will", "with", "within", "would", "you",
    "your", "yours",
];

#[derive(Debug, Clone)]
pub struct Normalizer {
    stop_words: HashSet<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()))
    }
}

impl Normalizer {
    /// Stop words are matched after normalization, so they are normalized too
    /// (`"E.g."` in a custom list still removes `eg`).
    pub fn new<I, S>(stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stop_words = stop_words
            .into_iter()
            .flat_map(|w| raw_tokens(w.as_ref()))
            .collect();
        Self { stop_words }
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Normalized tokens in document order, stop words removed.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        raw_tokens(text)
            .into_iter()
            .filter(|t| !self.is_stop_word(t))
            .collect()
    }

    /// Space-joined form of `tokens`. The scorer works on tokens directly.
    #[allow(dead_code)]
    pub fn normalize(&self, text: &str) -> String {
        self.tokens(text).join(" ")
    }
}

/// Lower-cased word tokens without stop-word filtering.
///
/// Apostrophes and periods are dropped in place (`team's` → `teams`,
/// `node.js` → `nodejs`); `+` and `#` stay when attached to a word (`c++`, `c#`);
/// every other non-alphanumeric character is a word boundary.
fn raw_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if c.is_alphanumeric() {
            current.extend(c.to_lowercase());
        } else if matches!(c, '+' | '#') && !current.is_empty() {
            current.push(c);
        } else if matches!(c, '\'' | '\u{2019}' | '.') {
            continue;
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Counts word-like tokens (containing at least one alphanumeric) without
/// stop-word removal. Used by the responsibility noise filter.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace()
        .filter(|w| w.chars().any(char::is_alphanumeric))
        .count()
}
