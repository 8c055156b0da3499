//! Sentence cleanup and meaningfulness filtering

use regex::Regex;
use std::sync::LazyLock;

static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([.,!?;:。！？；：])").expect("valid regex"));

static PUNCT_BEFORE_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.,!?。！？])([A-Za-z])").expect("valid regex"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

static PUNCTUATION_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[.,!?;:\-\s]+$").expect("valid regex"));

static NUMBERS_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9.,\s]+$").expect("valid regex"));

static HAS_WORD_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z\x{4e00}-\x{9fa5}]").expect("valid regex"));

/// CJK unified ideographs counted by the "mostly CJK" heuristic
#[inline]
pub fn is_cjk(ch: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&ch)
}

/// More than half of the non-whitespace characters are CJK ideographs
pub fn is_mostly_cjk(text: &str) -> bool {
    let mut cjk = 0usize;
    let mut total = 0usize;
    for ch in text.chars().filter(|ch| !ch.is_whitespace()) {
        total += 1;
        if is_cjk(ch) {
            cjk += 1;
        }
    }

    total > 0 && cjk * 2 > total
}

/// Normalize a sentence for output.
///
/// Latin text gets collapsed whitespace, no space before punctuation, a space
/// after sentence punctuation glued to a letter, and a capitalized first
/// letter. Mostly-CJK text keeps spaces only between two non-CJK characters.
/// Applying it twice gives the same result as applying it once.
pub fn clean_sentence(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let cjk = is_mostly_cjk(text);

    let spaced = if cjk {
        squeeze_cjk_whitespace(text)
    } else {
        WHITESPACE_RUN.replace_all(text, " ").into_owned()
    };

    let mut cleaned = SPACE_BEFORE_PUNCT.replace_all(&spaced, "$1").into_owned();

    if !cjk {
        cleaned = PUNCT_BEFORE_LETTER
            .replace_all(&cleaned, "$1 $2")
            .into_owned();
    }

    let cleaned = cleaned.trim();

    if cjk {
        return cleaned.to_string();
    }

    let mut chars = cleaned.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {
            let mut capitalized = String::with_capacity(cleaned.len());
            capitalized.push(first.to_ascii_uppercase());
            capitalized.push_str(chars.as_str());
            capitalized
        }
        _ => cleaned.to_string(),
    }
}

/// Drop whitespace around CJK text, keep one space between Latin runs
fn squeeze_cjk_whitespace(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if !ch.is_whitespace() {
            out.push(ch);
            i += 1;
            continue;
        }

        let run_start = i;
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }

        let before = run_start.checked_sub(1).map(|j| chars[j]);
        let after = chars.get(i).copied();
        if let (Some(before), Some(after)) = (before, after) {
            if !is_cjk(before) && !is_cjk(after) {
                out.push(' ');
            }
        }
    }

    out
}

/// Worth keeping as a sentence: at least two characters, not just
/// punctuation or numbers, and at least one letter or CJK ideograph.
pub fn is_meaningful_sentence(text: &str) -> bool {
    let trimmed = text.trim();

    if trimmed.chars().count() < 2 {
        return false;
    }

    if PUNCTUATION_ONLY.is_match(trimmed) {
        return false;
    }

    if NUMBERS_ONLY.is_match(trimmed) {
        return false;
    }

    HAS_WORD_CHAR.is_match(trimmed)
}
