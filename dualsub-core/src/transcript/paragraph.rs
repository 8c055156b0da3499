//! Grouping caption entries into paragraphs for translation

use crate::types::CaptionFragment;
use serde::{Deserialize, Serialize};

/// Default number of paragraphs per translation request
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Words that open a new topic when they start the next entry
const TOPIC_TRANSITIONS: &[&str] = &[
    "However",
    "Moreover",
    "Furthermore",
    "Therefore",
    "Nevertheless",
    "On the other hand",
    "In addition",
    "First",
    "Second",
    "Finally",
    "In conclusion",
    "To summarize",
];

/// Paragraph size limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphOptions {
    /// Entries required before a paragraph may close
    pub min_sentences: usize,
    /// Entries after which a paragraph closes at the next sentence end
    pub max_sentences: usize,
    /// Characters after which a paragraph closes at the next sentence end
    pub max_length: usize,
}

impl Default for ParagraphOptions {
    fn default() -> Self {
        Self {
            min_sentences: 3,
            max_sentences: 5,
            max_length: 150,
        }
    }
}

/// Several caption entries merged into one block of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub id: usize,
    pub text: String,
    /// Filled in by [`apply_translations`]; empty until then
    pub translation: String,
    pub start: f64,
    pub end: f64,
    pub subtitle_indices: Vec<usize>,
}

#[derive(Debug, Default)]
struct Pending {
    text: String,
    indices: Vec<usize>,
    start: f64,
    end: f64,
}

impl Pending {
    fn push(&mut self, index: usize, fragment: &CaptionFragment, text: &str) {
        if self.indices.is_empty() {
            self.start = fragment.start;
        } else {
            self.text.push(' ');
        }
        self.text.push_str(text);
        self.indices.push(index);
        self.end = fragment.end;
    }

    fn into_paragraph(self, id: usize) -> Paragraph {
        Paragraph {
            id,
            text: self.text,
            translation: String::new(),
            start: self.start,
            end: self.end,
            subtitle_indices: self.indices,
        }
    }
}

/// Whether `text` opens with a topic transition word
pub fn is_topic_transition(text: &str) -> bool {
    let trimmed = text.trim();
    TOPIC_TRANSITIONS
        .iter()
        .any(|word| trimmed.starts_with(word))
}

/// Merge caption entries into paragraphs.
///
/// A paragraph closes on an entry ending in `.`, `!` or `?` once it holds
/// `min_sentences` entries and either reaches `max_sentences`, reaches
/// `max_length` characters, or the next entry starts a new topic.
pub fn build_paragraphs(
    fragments: &[CaptionFragment],
    options: &ParagraphOptions,
) -> Vec<Paragraph> {
    let mut paragraphs = Vec::new();
    let mut pending = Pending::default();

    for (index, fragment) in fragments.iter().enumerate() {
        let text = fragment.text.trim();
        if text.is_empty() {
            continue;
        }

        pending.push(index, fragment, text);

        let ends_sentence = text.ends_with(['.', '!', '?']);
        let count = pending.indices.len();
        let should_close = ends_sentence
            && count >= options.min_sentences
            && (count >= options.max_sentences
                || pending.text.chars().count() >= options.max_length
                || fragments
                    .get(index + 1)
                    .is_some_and(|next| is_topic_transition(&next.text)));

        if should_close {
            let id = paragraphs.len();
            paragraphs.push(std::mem::take(&mut pending).into_paragraph(id));
        }
    }

    if !pending.indices.is_empty() {
        let id = paragraphs.len();
        paragraphs.push(pending.into_paragraph(id));
    }

    paragraphs
}

/// Split paragraph texts into request-sized batches
pub fn translation_batches(paragraphs: &[Paragraph], max_batch_size: usize) -> Vec<Vec<String>> {
    paragraphs
        .chunks(max_batch_size.max(1))
        .map(|chunk| chunk.iter().map(|p| p.text.clone()).collect())
        .collect()
}

/// Attach translations by position; missing ones fall back to the source text
pub fn apply_translations(paragraphs: &[Paragraph], translations: &[String]) -> Vec<Paragraph> {
    if paragraphs.len() != translations.len() {
        tracing::warn!(
            paragraphs = paragraphs.len(),
            translations = translations.len(),
            "translation count does not match paragraph count"
        );
    }

    paragraphs
        .iter()
        .enumerate()
        .map(|(i, paragraph)| {
            let translation = translations
                .get(i)
                .filter(|t| !t.is_empty())
                .cloned()
                .unwrap_or_else(|| paragraph.text.clone());
            Paragraph {
                translation,
                ..paragraph.clone()
            }
        })
        .collect()
}

/// Rough token count for LLM request sizing, four characters per token
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captions(texts: &[&str]) -> Vec<CaptionFragment> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| CaptionFragment::new(i as f64, i as f64 + 1.0, *text))
            .collect()
    }

    #[test]
    fn test_closes_at_max_sentences() {
        let track = captions(&[
            "One.", "Two.", "Three.", "Four.", "Five.", "Six.", "Seven.",
        ]);
        let paragraphs = build_paragraphs(&track, &ParagraphOptions::default());

        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].text, "One. Two. Three. Four. Five.");
        assert_eq!(paragraphs[0].subtitle_indices, vec![0, 1, 2, 3, 4]);
        assert_eq!((paragraphs[0].start, paragraphs[0].end), (0.0, 5.0));
        assert_eq!(paragraphs[1].id, 1);
        assert_eq!(paragraphs[1].subtitle_indices, vec![5, 6]);
    }

    #[test]
    fn test_topic_transition_closes_early() {
        let track = captions(&["One.", "Two.", "Three.", "However, four.", "Five."]);
        let paragraphs = build_paragraphs(&track, &ParagraphOptions::default());

        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].subtitle_indices, vec![0, 1, 2]);
        assert_eq!(paragraphs[1].text, "However, four. Five.");
    }

    #[test]
    fn test_length_limit() {
        let long = "a".repeat(80);
        let first = format!("{long}.");
        let track = captions(&[&first, &first, &first, "tail."]);
        let paragraphs = build_paragraphs(&track, &ParagraphOptions::default());

        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].subtitle_indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_blank_entries_keep_real_indices() {
        let track = captions(&["One.", "", "Two.", "  ", "Three.", "Four"]);
        let paragraphs = build_paragraphs(&track, &ParagraphOptions::default());

        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].subtitle_indices, vec![0, 2, 4, 5]);
        assert_eq!(paragraphs[0].text, "One. Two. Three. Four");
    }

    #[test]
    fn test_empty_track() {
        assert!(build_paragraphs(&[], &ParagraphOptions::default()).is_empty());
    }

    #[test]
    fn test_topic_transition_words() {
        assert!(is_topic_transition("  Finally we are done"));
        assert!(is_topic_transition("On the other hand"));
        assert!(!is_topic_transition("however"));
    }

    #[test]
    fn test_translation_batches() {
        let track = captions(&["A.", "B.", "C.", "D.", "E."]);
        let paragraphs = build_paragraphs(
            &track,
            &ParagraphOptions {
                min_sentences: 1,
                max_sentences: 1,
                max_length: 150,
            },
        );
        let batches = translation_batches(&paragraphs, 2);

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0], vec!["A.", "B."]);
        assert_eq!(batches[2], vec!["E."]);
        assert_eq!(translation_batches(&paragraphs, 0).len(), 5);
    }

    #[test]
    fn test_apply_translations_with_fallback() {
        let track = captions(&["One.", "Two.", "Three.", "Four.", "Five.", "Six."]);
        let paragraphs = build_paragraphs(
            &track,
            &ParagraphOptions {
                min_sentences: 1,
                max_sentences: 2,
                max_length: 150,
            },
        );
        assert_eq!(paragraphs.len(), 3);

        let translations = vec!["一。二。".to_string(), String::new()];
        let translated = apply_translations(&paragraphs, &translations);

        assert_eq!(translated[0].translation, "一。二。");
        assert_eq!(translated[1].translation, "Three. Four.");
        assert_eq!(translated[2].translation, "Five. Six.");
        assert_eq!(translated[2].text, paragraphs[2].text);
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }
}
