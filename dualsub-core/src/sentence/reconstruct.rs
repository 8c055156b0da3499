//! Rebuilding complete sentences from time-sliced caption fragments
//!
//! Auto-generated captions are cut by time, so a single entry often holds one
//! or two words and a sentence is spread over many entries. Reconstruction
//! accumulates fragments until the boundary classifier reports a sentence end,
//! then cleans the text and keeps it if it is meaningful.

use super::boundary::BoundaryClassifier;
use super::clean::{clean_sentence, is_meaningful_sentence};
use crate::types::{CaptionFragment, FragmentIndices, ReconstructedSentence};
use serde::{Deserialize, Serialize};

/// Merges fragments into sentences using a [`BoundaryClassifier`]
#[derive(Debug, Clone, Default)]
pub struct SentenceReconstructor {
    classifier: BoundaryClassifier,
}

/// Text accumulated since the last emitted sentence
#[derive(Debug, Default)]
struct SentenceBuffer {
    text: String,
    indices: FragmentIndices,
    start: Option<f64>,
    end: f64,
}

impl SentenceBuffer {
    fn push(&mut self, index: usize, fragment: &str, span: Option<(f64, f64)>, attaching: bool) {
        if !self.text.is_empty() && !self.text.ends_with(' ') && !attaching {
            self.text.push(' ');
        }
        self.text.push_str(fragment);
        self.indices.push(index);

        if let Some((start, end)) = span {
            if self.start.is_none() {
                self.start = Some(start);
                self.end = end;
            } else if end > self.end {
                self.end = end;
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn take(&mut self) -> SentenceBuffer {
        std::mem::take(self)
    }
}

impl SentenceReconstructor {
    /// Reconstructor with the default boundary rules
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classifier(classifier: BoundaryClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &BoundaryClassifier {
        &self.classifier
    }

    /// Sentences as plain strings
    pub fn reconstruct<S: AsRef<str>>(&self, fragments: &[S]) -> Vec<String> {
        self.reconstruct_texts(fragments)
            .into_iter()
            .map(|sentence| sentence.text)
            .collect()
    }

    /// Sentences with source indices but no timing
    pub fn reconstruct_texts<S: AsRef<str>>(&self, fragments: &[S]) -> Vec<ReconstructedSentence> {
        self.run(fragments.iter().map(|fragment| (fragment.as_ref(), None)))
    }

    /// Sentences with source indices and the time span they cover
    pub fn reconstruct_fragments(&self, fragments: &[CaptionFragment]) -> Vec<ReconstructedSentence> {
        self.run(
            fragments
                .iter()
                .map(|fragment| (fragment.text.as_str(), Some((fragment.start, fragment.end)))),
        )
    }

    fn run<'a, I>(&self, fragments: I) -> Vec<ReconstructedSentence>
    where
        I: Iterator<Item = (&'a str, Option<(f64, f64)>)>,
    {
        let tables = self.classifier.tables();
        let mut sentences = Vec::new();
        let mut buffer = SentenceBuffer::default();
        let mut seen = 0usize;

        for (index, (text, span)) in fragments.enumerate() {
            seen += 1;
            let trimmed = text.trim();
            if trimmed.is_empty() {
                continue;
            }

            let attaching = trimmed.chars().next().is_some_and(|ch| tables.is_attaching(ch));
            buffer.push(index, trimmed, span, attaching);

            if self.classifier.is_sentence_end(&buffer.text) {
                emit(&mut sentences, buffer.take());
            }
        }

        // Transcripts often lack trailing punctuation
        if !buffer.is_empty() {
            emit(&mut sentences, buffer.take());
        }

        tracing::debug!(
            fragments = seen,
            sentences = sentences.len(),
            "reconstructed caption sentences"
        );

        sentences
    }
}

fn emit(sentences: &mut Vec<ReconstructedSentence>, buffer: SentenceBuffer) {
    let cleaned = clean_sentence(&buffer.text);
    if !is_meaningful_sentence(&cleaned) {
        tracing::trace!(text = %buffer.text, "dropping sentence without content");
        return;
    }

    sentences.push(ReconstructedSentence {
        id: sentences.len(),
        text: cleaned,
        source_fragment_indices: buffer.indices,
        start: buffer.start.unwrap_or(0.0),
        end: buffer.end,
    });
}

/// Reconstruct with the default boundary rules
pub fn reconstruct_sentences<S: AsRef<str>>(fragments: &[S]) -> Vec<String> {
    SentenceReconstructor::new().reconstruct(fragments)
}

/// How much reconstruction condensed a caption track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReconstructionStats {
    pub original_count: usize,
    pub reconstructed_count: usize,
    /// `reconstructed_count / original_count`, two decimals
    pub compression_ratio: f64,
    /// Mean fragment length in characters, two decimals
    pub avg_original_length: f64,
    /// Mean sentence length in characters, two decimals
    pub avg_reconstructed_length: f64,
}

impl ReconstructionStats {
    pub fn compute<A, B>(original: &[A], reconstructed: &[B]) -> Self
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let original_count = original.len();
        let reconstructed_count = reconstructed.len();

        let compression_ratio = if original_count > 0 {
            reconstructed_count as f64 / original_count as f64
        } else {
            0.0
        };

        Self {
            original_count,
            reconstructed_count,
            compression_ratio: round2(compression_ratio),
            avg_original_length: round2(mean_length(original)),
            avg_reconstructed_length: round2(mean_length(reconstructed)),
        }
    }
}

fn mean_length<S: AsRef<str>>(texts: &[S]) -> f64 {
    if texts.is_empty() {
        return 0.0;
    }
    let total: usize = texts.iter().map(|text| text.as_ref().chars().count()).sum();
    total as f64 / texts.len() as f64
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
