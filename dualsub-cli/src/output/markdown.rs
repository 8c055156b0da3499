//! Markdown output formatter

use super::OutputFormatter;
use anyhow::Result;
use dualsub_core::{Paragraph, ReconstructedSentence};
use std::io::Write;

/// Markdown formatter - outputs entries as a numbered list
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    sentence_count: usize,
    paragraph_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            sentence_count: 0,
            paragraph_count: 0,
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for MarkdownFormatter<W> {
    fn format_sentence(&mut self, sentence: &ReconstructedSentence) -> Result<()> {
        self.sentence_count += 1;
        writeln!(self.writer, "{}. {}", self.sentence_count, sentence.text)?;
        Ok(())
    }

    fn format_paragraph(&mut self, paragraph: &Paragraph) -> Result<()> {
        self.paragraph_count += 1;
        writeln!(self.writer, "{}. {}", self.paragraph_count, paragraph.text)?;
        if !paragraph.translation.is_empty() && paragraph.translation != paragraph.text {
            writeln!(self.writer, "   > {}", paragraph.translation)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "---")?;
        if self.paragraph_count > 0 {
            writeln!(self.writer, "*Total paragraphs: {}*", self.paragraph_count)?;
        } else {
            writeln!(self.writer, "*Total sentences: {}*", self.sentence_count)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
