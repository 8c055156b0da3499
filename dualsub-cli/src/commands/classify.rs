//! Classify command implementation

use super::{GlobalArgs, ReportFormat};
use crate::output::write_json;
use anyhow::{Context, Result};
use clap::Args;
use dualsub_core::{BoundaryClassifier, BoundaryDecision};
use serde::Serialize;
use std::io::{self, BufRead, Write};

/// Arguments for the classify command
#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Text buffers to classify; lines from stdin when omitted
    #[arg(value_name = "TEXT")]
    pub texts: Vec<String>,

    /// Extra abbreviation, without the trailing dot (repeatable)
    #[arg(short = 'a', long = "abbreviation", value_name = "ABBR")]
    pub abbreviations: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

/// Decision for one buffer
#[derive(Debug, Serialize, PartialEq)]
pub struct Classification {
    pub text: String,
    pub boundary: bool,
    pub decision: &'static str,
    /// Abbreviation that blocked the boundary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
}

impl Classification {
    fn new(text: String, decision: BoundaryDecision) -> Self {
        let abbreviation = match &decision {
            BoundaryDecision::Abbreviation(token) => Some(token.clone()),
            _ => None,
        };
        Self {
            text,
            boundary: decision.is_boundary(),
            decision: decision.label(),
            abbreviation,
        }
    }
}

impl ClassifyArgs {
    /// Execute the classify command
    pub fn execute(&self, global: &GlobalArgs) -> Result<()> {
        let config = global.load_config()?;

        let extra = config
            .sentence
            .extra_abbreviations
            .iter()
            .chain(&self.abbreviations)
            .map(|abbr| abbr.trim_end_matches('.').to_string());
        let classifier = BoundaryClassifier::new().with_abbreviations(extra);

        let texts = if self.texts.is_empty() {
            io::stdin()
                .lock()
                .lines()
                .collect::<io::Result<Vec<_>>>()
                .context("Failed to read text from stdin")?
        } else {
            self.texts.clone()
        };

        let results = classify_all(&classifier, texts);

        let stdout = io::stdout();
        let mut out = stdout.lock();
        match self.format {
            ReportFormat::Json => write_json(&mut out, &results, config.output.pretty_json)?,
            ReportFormat::Text => {
                for result in &results {
                    match &result.abbreviation {
                        Some(token) => {
                            writeln!(out, "{} ({})\t{}", result.decision, token, result.text)?
                        }
                        None => writeln!(out, "{}\t{}", result.decision, result.text)?,
                    }
                }
                out.flush()?;
            }
        }

        Ok(())
    }
}

pub fn classify_all(classifier: &BoundaryClassifier, texts: Vec<String>) -> Vec<Classification> {
    texts
        .into_iter()
        .map(|text| {
            let decision = classifier.classify(&text);
            Classification::new(text, decision)
        })
        .collect()
}
