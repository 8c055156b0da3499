//! Input handling module

pub mod caption_reader;
pub mod glob_resolver;

pub use caption_reader::{CaptionReader, CaptionTrack};
pub use glob_resolver::resolve_patterns;
