//! Configuration file support
//!
//! An optional `dualsub.toml` supplies defaults for the commands; flags given
//! on the command line take precedence.

use crate::error::CliError;
use anyhow::{Context, Result};
use dualsub_core::{ParagraphOptions, TimingConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// CLI configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct CliConfig {
    /// Subtitle timing calibration
    #[serde(default)]
    pub timing: TimingSection,

    /// Sentence boundary rules
    #[serde(default)]
    pub sentence: SentenceSection,

    /// Paragraph building limits
    #[serde(default)]
    pub paragraphs: ParagraphOptions,

    /// Output configuration
    #[serde(default)]
    pub output: OutputSection,
}

/// Timing values as the user sees them
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct TimingSection {
    /// Seconds on top of the built-in correction
    pub relative_offset: f64,
    /// Milliseconds
    pub pre_roll: f64,
    /// Milliseconds
    pub post_roll: f64,
}

impl TimingSection {
    pub fn to_timing_config(&self) -> TimingConfig {
        TimingConfig::from_relative(self.relative_offset, self.pre_roll, self.post_roll)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct SentenceSection {
    /// Abbreviations added to the built-in list, without the trailing dot
    pub extra_abbreviations: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OutputSection {
    /// Pretty print JSON output
    pub pretty_json: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self { pretty_json: true }
    }
}

impl CliConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to load config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: CliConfig =
            toml::from_str(content).map_err(|e| CliError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let timing = &self.timing;
        if !timing.relative_offset.is_finite() {
            return Err(
                CliError::ConfigError("timing.relative_offset must be finite".into()).into(),
            );
        }
        for (name, value) in [
            ("timing.pre_roll", timing.pre_roll),
            ("timing.post_roll", timing.post_roll),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CliError::ConfigError(format!(
                    "{name} must be a non-negative number, got {value}"
                ))
                .into());
            }
        }

        let paragraphs = &self.paragraphs;
        if paragraphs.min_sentences > paragraphs.max_sentences {
            return Err(CliError::ConfigError(format!(
                "paragraphs.min_sentences ({}) exceeds paragraphs.max_sentences ({})",
                paragraphs.min_sentences, paragraphs.max_sentences
            ))
            .into());
        }

        Ok(())
    }
}
