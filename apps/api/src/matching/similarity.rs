//! Similarity Scoring — pluggable, trait-based scorer comparing two text fragments.
//!
//! Default: `FuzzyScorer` (token-set ratio blended with a best-partial-match ratio).
//! `AppState` holds an `Arc<dyn SimilarityScorer>` so another algorithm can be
//! swapped in without touching the matcher or the handlers.
//!
//! Contract for every implementation:
//! - result is in `[0, 1]`
//! - `score(a, b) == score(b, a)`
//! - `score(a, a) == 1.0` whenever `a` normalizes to something non-empty
//! - `score(a, "") == 0.0`

use std::collections::BTreeSet;

use strsim::{normalized_levenshtein, sorensen_dice};

use crate::matching::normalizer::Normalizer;

/// Inflection suffixes stripped when comparing terms, with the ending restored
/// in their place (`managing` → `manage`).
const INFLECTIONS: &[(&str, &str)] = &[
    ("s", ""),
    ("es", ""),
    ("d", ""),
    ("ed", ""),
    ("ing", ""),
    ("ing", "e"),
];

/// Stems shorter than this are never produced.
const MIN_STEM_LEN: usize = 3;

/// Partial matches between sequences of different length are discounted.
const PARTIAL_SCALE: f64 = 0.9;

pub trait SimilarityScorer: Send + Sync {
    fn score(&self, a: &str, b: &str) -> f64;

    /// Short backend label reported alongside results.
    fn name(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// FuzzyScorer (default implementation)
// ────────────────────────────────────────────────────────────────────────────

/// Lexical fuzzy scorer over normalized token sequences.
///
/// Algorithm:
/// 1. Normalize both inputs; either side empty → 0.0, identical → 1.0
/// 2. token_set: split each side's unique tokens into terms shared with the
///    other side (same word up to a plural or verb inflection) and the rest, then compare `shared` vs `shared + rest` on each
///    side and `shared_a + rest_a` vs `shared_b + rest_b` (bigram Dice ratio)
/// 3. partial: slide the shorter token sequence over the longer one and keep
///    the best normalized Levenshtein similarity, discounted by 0.9
/// 4. score = max(token_set, partial)
#[derive(Debug, Clone, Default)]
pub struct FuzzyScorer {
    normalizer: Normalizer,
}

impl FuzzyScorer {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }
}

impl SimilarityScorer for FuzzyScorer {
    fn score(&self, a: &str, b: &str) -> f64 {
        let tokens_a = self.normalizer.tokens(a);
        let tokens_b = self.normalizer.tokens(b);
        score_tokens(&tokens_a, &tokens_b)
    }

    fn name(&self) -> &'static str {
        "fuzzy"
    }
}

/// Scores two already-normalized token sequences.
pub fn score_tokens(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    token_set_ratio(a, b).max(partial_ratio(a, b)).clamp(0.0, 1.0)
}

/// The word itself plus every stem reachable by removing one inflection.
fn stems(word: &str) -> Vec<String> {
    let mut stems = vec![word.to_string()];
    for (suffix, restore) in INFLECTIONS {
        if let Some(stem) = word.strip_suffix(suffix) {
            if stem.chars().count() >= MIN_STEM_LEN {
                stems.push(format!("{stem}{restore}"));
            }
        }
    }
    stems
}

/// Same word up to inflection: `team`/`teams`, `perform`/`performed`,
/// but not `perform`/`performance`.
fn same_term(x: &str, y: &str) -> bool {
    if x == y {
        return true;
    }
    let stems_y = stems(y);
    stems(x).iter().any(|s| stems_y.contains(s))
}

/// Returns `(shared, shared + rest)` for one side, both sorted and space-joined.
fn split_shared<'a>(own: &BTreeSet<&'a str>, other: &BTreeSet<&'a str>) -> (String, String) {
    let (shared, rest): (Vec<&str>, Vec<&str>) = own
        .iter()
        .copied()
        .partition(|t| other.iter().any(|o| same_term(t, o)));

    let shared = shared.join(" ");
    let combined = if rest.is_empty() {
        shared.clone()
    } else if shared.is_empty() {
        rest.join(" ")
    } else {
        format!("{shared} {}", rest.join(" "))
    };
    (shared, combined)
}

fn token_set_ratio(a: &[String], b: &[String]) -> f64 {
    let set_a: BTreeSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: BTreeSet<&str> = b.iter().map(String::as_str).collect();

    let (shared_a, combined_a) = split_shared(&set_a, &set_b);
    let (shared_b, combined_b) = split_shared(&set_b, &set_a);

    let mut best = ratio(&combined_a, &combined_b);
    if !shared_a.is_empty() {
        best = best
            .max(ratio(&shared_a, &combined_a))
            .max(ratio(&shared_b, &combined_b));
    }
    best
}

fn partial_ratio(a: &[String], b: &[String]) -> f64 {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let needle = short.join(" ");

    let best = long
        .windows(short.len())
        .map(|window| normalized_levenshtein(&needle, &window.join(" ")))
        .fold(0.0_f64, f64::max);

    if short.len() == long.len() {
        best
    } else {
        best * PARTIAL_SCALE
    }
}

/// Character-bigram Sørensen–Dice similarity; whitespace is ignored.
fn ratio(a: &str, b: &str) -> f64 {
    sorensen_dice(a, b)
}
