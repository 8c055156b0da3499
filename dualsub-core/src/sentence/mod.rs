//! Sentence boundary classification and caption sentence reconstruction

pub mod boundary;
pub mod clean;
pub mod reconstruct;
pub mod tables;

pub use boundary::{is_sentence_end, BoundaryClassifier, BoundaryDecision};
pub use clean::{clean_sentence, is_meaningful_sentence, is_mostly_cjk};
pub use reconstruct::{reconstruct_sentences, ReconstructionStats, SentenceReconstructor};
pub use tables::{SentenceTables, TerminatorKind};
