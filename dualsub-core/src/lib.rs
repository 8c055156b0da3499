//! Caption processing for dual-language subtitle display
//!
//! Auto-generated video captions arrive as short, time-sliced fragments. This
//! crate turns them into material a bilingual subtitle overlay can use:
//!
//! - **sentence**: rebuild complete sentences from fragments, deciding where
//!   a sentence ends (abbreviations, decimals, ellipses, open quotes)
//! - **timing**: calibrate caption windows, find the caption on screen at a
//!   playback instant, and suggest calibrations for drifting tracks
//! - **transcript**: group captions into paragraphs for batch translation
//!
//! # Example
//!
//! ```rust
//! use dualsub_core::{CaptionFragment, SentenceReconstructor, TimingConfig, SubtitleIndex};
//!
//! let captions = vec![
//!     CaptionFragment::new(0.0, 1.0, "Hello"),
//!     CaptionFragment::new(1.0, 2.0, "world."),
//! ];
//!
//! let sentences = SentenceReconstructor::new().reconstruct_fragments(&captions);
//! assert_eq!(sentences[0].text, "Hello world.");
//!
//! let index = SubtitleIndex::new(&captions, TimingConfig::zero());
//! assert_eq!(index.text_at(1.5), "world.");
//! ```

pub mod error;
pub mod sentence;
pub mod timing;
pub mod transcript;
pub mod types;

pub use error::{CoreError, Result};
pub use sentence::{
    clean_sentence, is_meaningful_sentence, is_sentence_end, reconstruct_sentences,
    BoundaryClassifier, BoundaryDecision, ReconstructionStats, SentenceReconstructor,
    SentenceTables,
};
pub use timing::{
    apply_calibration, detect, find_active, find_active_index, find_subtitle_text, is_visible,
    DriftAnalysis, SubtitleIndex, TimingConfig, BASE_OFFSET,
};
pub use transcript::{build_paragraphs, Paragraph, ParagraphOptions};
pub use types::{CaptionFragment, FragmentIndices, ReconstructedSentence};
