//! Plain text output formatter

use super::{format_timestamp, OutputFormatter};
use anyhow::Result;
use dualsub_core::{Paragraph, ReconstructedSentence};
use std::io::Write;

/// Plain text formatter - outputs one entry per line
pub struct TextFormatter<W: Write> {
    writer: W,
    timestamps: bool,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            timestamps: false,
        }
    }

    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }

    fn write_entry(&mut self, text: &str, start: f64, end: f64) -> Result<()> {
        if self.timestamps {
            writeln!(
                self.writer,
                "[{} - {}] {}",
                format_timestamp(start),
                format_timestamp(end),
                text
            )?;
        } else {
            writeln!(self.writer, "{text}")?;
        }
        Ok(())
    }
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_sentence(&mut self, sentence: &ReconstructedSentence) -> Result<()> {
        self.write_entry(&sentence.text, sentence.start, sentence.end)
    }

    fn format_paragraph(&mut self, paragraph: &Paragraph) -> Result<()> {
        self.write_entry(&paragraph.text, paragraph.start, paragraph.end)?;
        if !paragraph.translation.is_empty() && paragraph.translation != paragraph.text {
            writeln!(self.writer, "    {}", paragraph.translation)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dualsub_core::FragmentIndices;

    fn sentence(text: &str, start: f64, end: f64) -> ReconstructedSentence {
        ReconstructedSentence {
            id: 0,
            text: text.to_string(),
            source_fragment_indices: FragmentIndices::from_slice(&[0]),
            start,
            end,
        }
    }

    #[test]
    fn test_one_sentence_per_line() {
        let mut out = Vec::new();
        {
            let mut formatter = TextFormatter::new(&mut out);
            formatter.format_sentence(&sentence("Hello world.", 0.0, 1.0)).unwrap();
            formatter.format_sentence(&sentence("How are you?", 1.0, 2.0)).unwrap();
            formatter.finish().unwrap();
        }
        assert_eq!(String::from_utf8(out).unwrap(), "Hello world.\nHow are you?\n");
    }

    #[test]
    fn test_timestamps() {
        let mut out = Vec::new();
        {
            let mut formatter = TextFormatter::new(&mut out).with_timestamps(true);
            formatter.format_sentence(&sentence("Hi.", 61.5, 63.0)).unwrap();
        }
        assert_eq!(String::from_utf8(out).unwrap(), "[1:01.50 - 1:03.00] Hi.\n");
    }

    #[test]
    fn test_paragraph_with_translation() {
        let paragraph = Paragraph {
            id: 0,
            text: "Good morning.".to_string(),
            translation: "早安。".to_string(),
            start: 0.0,
            end: 2.0,
            subtitle_indices: vec![0],
        };
        let mut out = Vec::new();
        {
            let mut formatter = TextFormatter::new(&mut out);
            formatter.format_paragraph(&paragraph).unwrap();
        }
        assert_eq!(String::from_utf8(out).unwrap(), "Good morning.\n    早安。\n");
    }
}
