//! Transcript assembly for translation

pub mod paragraph;

pub use paragraph::{
    apply_translations, build_paragraphs, estimate_tokens, is_topic_transition,
    translation_batches, Paragraph, ParagraphOptions, DEFAULT_BATCH_SIZE,
};
