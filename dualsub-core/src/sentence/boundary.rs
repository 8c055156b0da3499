//! Sentence boundary classification for accumulated caption text
//!
//! The classifier only ever looks at the *end* of a buffer: reconstruction
//! appends one fragment at a time and asks whether the text so far forms a
//! complete sentence.

use super::tables::{SentenceTables, TerminatorKind};
use std::collections::HashSet;

/// Outcome of classifying a buffer, with the reason it is not a boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryDecision {
    /// The buffer ends a sentence
    Terminated,
    /// Nothing but whitespace
    Empty,
    /// Last character is not a sentence terminator
    NoTerminator,
    /// The period is the last dot of `...`
    Ellipsis,
    /// The period sits between two digits
    Decimal,
    /// The period follows a known abbreviation or an initial
    Abbreviation(String),
    /// A quote opened before the terminator is still open
    InsideQuote,
}

impl BoundaryDecision {
    #[inline]
    pub fn is_boundary(&self) -> bool {
        matches!(self, BoundaryDecision::Terminated)
    }

    /// Short machine-friendly label
    pub fn label(&self) -> &'static str {
        match self {
            BoundaryDecision::Terminated => "terminated",
            BoundaryDecision::Empty => "empty",
            BoundaryDecision::NoTerminator => "no-terminator",
            BoundaryDecision::Ellipsis => "ellipsis",
            BoundaryDecision::Decimal => "decimal",
            BoundaryDecision::Abbreviation(_) => "abbreviation",
            BoundaryDecision::InsideQuote => "inside-quote",
        }
    }
}

/// Decides whether a text buffer ends a sentence.
///
/// Uses the embedded rule tables, optionally extended with extra
/// abbreviations (matched verbatim, like the built-in ones).
#[derive(Debug, Clone)]
pub struct BoundaryClassifier {
    tables: &'static SentenceTables,
    extra_abbreviations: HashSet<String>,
}

impl Default for BoundaryClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundaryClassifier {
    pub fn new() -> Self {
        Self {
            tables: SentenceTables::embedded(),
            extra_abbreviations: HashSet::new(),
        }
    }

    /// Add abbreviations on top of the embedded set
    pub fn with_abbreviations<I, S>(mut self, abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_abbreviations.extend(
            abbreviations
                .into_iter()
                .map(Into::into)
                .filter(|abbr: &String| !abbr.is_empty()),
        );
        self
    }

    pub fn tables(&self) -> &'static SentenceTables {
        self.tables
    }

    /// True if `text` (trimmed) ends a sentence
    #[inline]
    pub fn is_sentence_end(&self, text: &str) -> bool {
        self.classify(text).is_boundary()
    }

    /// Classify the end of `text`, reporting why it is not a boundary
    pub fn classify(&self, text: &str) -> BoundaryDecision {
        let trimmed = text.trim();
        let chars: Vec<char> = trimmed.chars().collect();

        let Some(&last) = chars.last() else {
            return BoundaryDecision::Empty;
        };
        let pos = chars.len() - 1;

        match self.tables.terminator_kind(last) {
            None => BoundaryDecision::NoTerminator,
            Some(TerminatorKind::Unconditional) => BoundaryDecision::Terminated,
            Some(TerminatorKind::QuoteSensitive) => {
                if self.tables.has_open_quote(&chars[..pos]) {
                    BoundaryDecision::InsideQuote
                } else {
                    BoundaryDecision::Terminated
                }
            }
            Some(TerminatorKind::Period) => self.classify_period(&chars, pos),
        }
    }

    fn classify_period(&self, chars: &[char], pos: usize) -> BoundaryDecision {
        if is_ellipsis(chars, pos) {
            return BoundaryDecision::Ellipsis;
        }

        if is_decimal_point(chars, pos) {
            return BoundaryDecision::Decimal;
        }

        if let Some(token) = self.abbreviation_before(chars, pos) {
            return BoundaryDecision::Abbreviation(token);
        }

        if self.tables.has_open_quote(&chars[..pos]) {
            return BoundaryDecision::InsideQuote;
        }

        BoundaryDecision::Terminated
    }

    /// The token before the dot, if it is an abbreviation
    fn abbreviation_before(&self, chars: &[char], pos: usize) -> Option<String> {
        let before: String = chars[..pos].iter().collect();
        let token = before.split_whitespace().last()?;

        if self.tables.is_abbreviation(token) || self.extra_abbreviations.contains(token) {
            Some(token.to_string())
        } else {
            None
        }
    }
}

/// `..` directly before the dot at `pos`
fn is_ellipsis(chars: &[char], pos: usize) -> bool {
    pos >= 2 && chars[pos - 1] == '.' && chars[pos - 2] == '.'
}

/// Digit on both sides of the dot at `pos`.
///
/// A dot in final position has no right neighbour, so this never holds for
/// the last character of a buffer: `"3."` is a sentence end.
fn is_decimal_point(chars: &[char], pos: usize) -> bool {
    if pos == 0 || pos + 1 >= chars.len() {
        return false;
    }
    chars[pos - 1].is_ascii_digit() && chars[pos + 1].is_ascii_digit()
}

/// Classify with the default rule tables
pub fn is_sentence_end(text: &str) -> bool {
    BoundaryClassifier::new().is_sentence_end(text)
}
