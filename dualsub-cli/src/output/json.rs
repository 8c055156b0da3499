//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use dualsub_core::{Paragraph, ReconstructedSentence};
use serde_json::Value;
use std::io::Write;

/// JSON formatter - collects entries and writes one JSON array on finish
pub struct JsonFormatter<W: Write> {
    writer: W,
    entries: Vec<Value>,
    pretty: bool,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            entries: Vec::new(),
            pretty: true,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_sentence(&mut self, sentence: &ReconstructedSentence) -> Result<()> {
        self.entries.push(serde_json::to_value(sentence)?);
        Ok(())
    }

    fn format_paragraph(&mut self, paragraph: &Paragraph) -> Result<()> {
        self.entries.push(serde_json::to_value(paragraph)?);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &self.entries)?;
        } else {
            serde_json::to_writer(&mut self.writer, &self.entries)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
