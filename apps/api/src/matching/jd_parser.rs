//! JD Parser — extracts ordered responsibilities from a raw job description.
//!
//! Splits on newlines, bullet markers and sentence terminators. Unbulleted
//! fragments shorter than the configured minimum word count are treated as
//! noise (section headers, taglines) and dropped. Bulleted fragments are
//! explicit list items and only need a single word.

use crate::matching::normalizer::word_count;
use crate::models::job::{JobDescription, Responsibility};

const BULLET_MARKERS: &[char] = &['-', '*', '•', '·', '▪', '◦', '‣', '–', '—'];

const SENTENCE_TERMINATORS: &[char] = &['.', '!', '?', ';'];

/// Words ending in '.' that do not end a sentence.
const ABBREVIATIONS: &[&str] = &["e.g", "i.e", "etc", "vs", "approx", "inc", "incl"];

/// Splits raw JD text into responsibility strings in document order.
///
/// Never fails: empty or header-only text yields an empty vector.
pub fn split_responsibilities(raw: &str, min_tokens: usize) -> Vec<String> {
    let mut responsibilities = Vec::new();

    for line in raw.lines() {
        let (bulleted, body) = strip_bullet(line.trim());
        let min_words = if bulleted { 1 } else { min_tokens.max(1) };

        for sentence in split_sentences(body) {
            let fragment = sentence
                .trim()
                .trim_end_matches(SENTENCE_TERMINATORS)
                .trim_end();
            if word_count(fragment) >= min_words {
                responsibilities.push(fragment.to_string());
            }
        }
    }

    responsibilities
}

/// Extracts indexed responsibilities from a job description.
pub fn extract_responsibilities(job: &JobDescription, min_tokens: usize) -> Vec<Responsibility> {
    responsibilities_from_text(&job.raw_text, min_tokens)
}

/// Indexed responsibilities straight from raw text, 0-based in document order.
pub fn responsibilities_from_text(raw: &str, min_tokens: usize) -> Vec<Responsibility> {
    split_responsibilities(raw, min_tokens)
        .into_iter()
        .enumerate()
        .map(|(index, text)| Responsibility { index, text })
        .collect()
}

/// Returns `(true, rest)` when the line starts with a bullet or list number.
fn strip_bullet(line: &str) -> (bool, &str) {
    let mut chars = line.chars();
    let Some(first) = chars.next() else {
        return (false, line);
    };

    if BULLET_MARKERS.contains(&first) {
        let rest = chars.as_str();
        // "-Build" is a bullet; "--" or "-5%" stay prose.
        if rest.starts_with(char::is_whitespace)
            || (first != '-' && first != '*')
            || rest.starts_with(char::is_alphabetic)
        {
            return (true, rest.trim_start());
        }
        return (false, line);
    }

    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 && digits <= 3 {
        let rest = &line[digits..];
        let mut rest_chars = rest.chars();
        if let (Some('.' | ')'), Some(next)) = (rest_chars.next(), rest_chars.next()) {
            if next.is_whitespace() {
                return (true, rest[1..].trim_start());
            }
        }
    }

    (false, line)
}

/// Splits at a terminator followed by whitespace or end of text.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut iter = text.char_indices().peekable();

    while let Some((i, c)) = iter.next() {
        if !SENTENCE_TERMINATORS.contains(&c) {
            continue;
        }
        let at_boundary = iter.peek().map_or(true, |(_, next)| next.is_whitespace());
        if !at_boundary || (c == '.' && ends_with_abbreviation(&text[start..i])) {
            continue;
        }
        let end = i + c.len_utf8();
        sentences.push(&text[start..end]);
        start = end;
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
}

fn ends_with_abbreviation(text: &str) -> bool {
    let last_word = text
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or_default()
        .trim_start_matches('(')
        .to_lowercase();
    ABBREVIATIONS.contains(&last_word.as_str())
}
