//! Paragraphs command implementation

use super::{open_output, GlobalArgs};
use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::CaptionReader;
use crate::output::{create_formatter, write_json, FormatOptions, OutputFormat};
use anyhow::Result;
use clap::Args;
use dualsub_core::transcript::{apply_translations, estimate_tokens, translation_batches};
use dualsub_core::{build_paragraphs, Paragraph, ParagraphOptions};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// Arguments for the paragraphs command
#[derive(Debug, Args)]
pub struct ParagraphsArgs {
    /// Caption file (JSON track or one fragment per line)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Entries required before a paragraph may close
    #[arg(long, value_name = "N")]
    pub min_sentences: Option<usize>,

    /// Entries after which a paragraph closes at the next sentence end
    #[arg(long, value_name = "N")]
    pub max_sentences: Option<usize>,

    /// Characters after which a paragraph closes at the next sentence end
    #[arg(long, value_name = "CHARS")]
    pub max_length: Option<usize>,

    /// Translations to attach, as a JSON array of strings or one per line
    #[arg(long, value_name = "FILE")]
    pub translations: Option<PathBuf>,

    /// Print translation request batches of N paragraphs (default 100) instead
    #[arg(
        long,
        value_name = "N",
        num_args = 0..=1,
        default_missing_value = "100"
    )]
    pub batches: Option<usize>,

    /// Prefix each paragraph with its time span (text format)
    #[arg(long)]
    pub timestamps: bool,
}

/// One translation request
#[derive(Debug, Serialize, PartialEq)]
pub struct BatchSummary {
    pub batch: usize,
    pub estimated_tokens: usize,
    pub texts: Vec<String>,
}

impl ParagraphsArgs {
    /// Execute the paragraphs command
    pub fn execute(&self, global: &GlobalArgs) -> Result<()> {
        let config = global.load_config()?;
        let options = self.options(&config)?;

        let track = CaptionReader::read_track(&self.input)?;
        let mut paragraphs = build_paragraphs(&track.fragments, &options);
        log::info!(
            "Built {} paragraph(s) from {} caption(s)",
            paragraphs.len(),
            track.fragments.len()
        );

        if let Some(path) = &self.translations {
            let translations = CaptionReader::read_translations(path)?;
            paragraphs = apply_translations(&paragraphs, &translations);
        }

        let mut writer = open_output(self.output.as_deref())?;

        if let Some(batch_size) = self.batches {
            let batches = summarize_batches(&paragraphs, batch_size);
            return match self.format {
                OutputFormat::Json => write_json(&mut writer, &batches, config.output.pretty_json),
                OutputFormat::Text | OutputFormat::Markdown => {
                    for summary in &batches {
                        writeln!(
                            writer,
                            "Batch {}: {} paragraph(s), ~{} tokens",
                            summary.batch,
                            summary.texts.len(),
                            summary.estimated_tokens
                        )?;
                    }
                    writer.flush()?;
                    Ok(())
                }
            };
        }

        let format_options = FormatOptions {
            timestamps: self.timestamps,
            pretty_json: config.output.pretty_json,
        };
        let mut formatter = create_formatter(self.format, writer, format_options);
        for paragraph in &paragraphs {
            formatter.format_paragraph(paragraph)?;
        }
        formatter.finish()
    }

    /// Config file limits with flag overrides
    fn options(&self, config: &CliConfig) -> Result<ParagraphOptions> {
        let mut options = config.paragraphs;
        if let Some(min) = self.min_sentences {
            options.min_sentences = min;
        }
        if let Some(max) = self.max_sentences {
            options.max_sentences = max;
        }
        if let Some(length) = self.max_length {
            options.max_length = length;
        }

        if options.min_sentences > options.max_sentences {
            return Err(CliError::ConfigError(format!(
                "--min-sentences ({}) exceeds --max-sentences ({})",
                options.min_sentences, options.max_sentences
            ))
            .into());
        }

        Ok(options)
    }
}

pub fn summarize_batches(paragraphs: &[Paragraph], batch_size: usize) -> Vec<BatchSummary> {
    translation_batches(paragraphs, batch_size)
        .into_iter()
        .enumerate()
        .map(|(i, texts)| BatchSummary {
            batch: i + 1,
            estimated_tokens: texts.iter().map(|text| estimate_tokens(text)).sum(),
            texts,
        })
        .collect()
}
