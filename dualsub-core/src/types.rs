//! Caption and sentence value types

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Fragment indices of a sentence; most sentences span only a few fragments.
pub type FragmentIndices = SmallVec<[usize; 8]>;

/// One raw caption entry as delivered by the caption source.
///
/// Times are in seconds. Entries are ordered by `start`; an entry's `end` may
/// overlap the next entry's `start` slightly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionFragment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl CaptionFragment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Length of the entry in seconds (negative for malformed entries)
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// True when the text is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A complete sentence rebuilt from one or more fragments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructedSentence {
    /// Dense 0-based position in the output
    pub id: usize,
    /// Cleaned sentence text
    pub text: String,
    /// Strictly increasing indices into the source fragment list
    pub source_fragment_indices: FragmentIndices,
    /// Start of the first contributing fragment (0.0 without timing)
    pub start: f64,
    /// Latest end among contributing fragments (0.0 without timing)
    pub end: f64,
}

impl ReconstructedSentence {
    /// Index of the first contributing fragment
    pub fn first_fragment(&self) -> Option<usize> {
        self.source_fragment_indices.first().copied()
    }

    /// Index of the last contributing fragment
    pub fn last_fragment(&self) -> Option<usize> {
        self.source_fragment_indices.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_deserializes_from_caption_json() {
        let json = r#"[{"start": 0.0, "end": 1.2, "text": "Hello"}, {"start": 1.2, "end": 2.5, "text": "world."}]"#;
        let fragments: Vec<CaptionFragment> = serde_json::from_str(json).unwrap();

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[1], CaptionFragment::new(1.2, 2.5, "world."));
        assert!((fragments[1].duration() - 1.3).abs() < 1e-9);
    }

    #[test]
    fn test_blank_fragment() {
        assert!(CaptionFragment::new(0.0, 1.0, "  \n").is_blank());
        assert!(!CaptionFragment::new(0.0, 1.0, " a ").is_blank());
    }

    #[test]
    fn test_sentence_fragment_bounds() {
        let sentence = ReconstructedSentence {
            id: 0,
            text: "Hello world.".to_string(),
            source_fragment_indices: FragmentIndices::from_slice(&[2, 3, 5]),
            start: 1.0,
            end: 3.0,
        };

        assert_eq!(sentence.first_fragment(), Some(2));
        assert_eq!(sentence.last_fragment(), Some(5));
    }
}
