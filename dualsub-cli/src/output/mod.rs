//! Output formatting module

use anyhow::Result;
use dualsub_core::{Paragraph, ReconstructedSentence};
use serde::Serialize;
use std::io::Write;

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format and output a single sentence
    fn format_sentence(&mut self, sentence: &ReconstructedSentence) -> Result<()>;

    /// Format and output a single paragraph
    fn format_paragraph(&mut self, paragraph: &Paragraph) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text with one entry per line
    Text,
    /// JSON array of entries with metadata
    Json,
    /// Markdown numbered list
    Markdown,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [
        OutputFormat::Text,
        OutputFormat::Json,
        OutputFormat::Markdown,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            OutputFormat::Text => "Plain text with one entry per line",
            OutputFormat::Json => "JSON array of entries with indices and timing",
            OutputFormat::Markdown => "Markdown numbered list with a total",
        }
    }
}

/// Options shared by the formatters
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Prefix text entries with their time span
    pub timestamps: bool,
    /// Indent JSON output
    pub pretty_json: bool,
}

/// Build the formatter for `format` writing to `writer`
pub fn create_formatter<W>(
    format: OutputFormat,
    writer: W,
    options: FormatOptions,
) -> Box<dyn OutputFormatter>
where
    W: Write + Send + Sync + 'static,
{
    match format {
        OutputFormat::Text => {
            Box::new(TextFormatter::new(writer).with_timestamps(options.timestamps))
        }
        OutputFormat::Json => Box::new(JsonFormatter::new(writer).pretty(options.pretty_json)),
        OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
    }
}

/// Write a single JSON document followed by a newline
pub fn write_json<W, T>(writer: &mut W, value: &T, pretty: bool) -> Result<()>
where
    W: Write + ?Sized,
    T: Serialize + ?Sized,
{
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, value)?;
    } else {
        serde_json::to_writer(&mut *writer, value)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// `M:SS.ss`, or `H:MM:SS.ss` past the hour
pub fn format_timestamp(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = seconds % 60.0;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:05.2}")
    } else {
        format!("{minutes}:{secs:05.2}")
    }
}
