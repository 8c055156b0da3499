//! Caption file reading
//!
//! Two layouts are accepted: a JSON array of `{start, end, text}` entries, or
//! plain text with one fragment per line and no timing.

use crate::error::CliError;
use anyhow::{Context, Result};
use dualsub_core::{CaptionFragment, TimingConfig};
use std::fs;
use std::path::Path;

/// Fragments read from one caption file
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrack {
    pub fragments: Vec<CaptionFragment>,
    /// False for plain-text input, whose fragments all sit at time zero
    pub timed: bool,
}

impl CaptionTrack {
    /// Parse caption file content, detecting the layout
    pub fn parse(content: &str) -> Result<Self> {
        let body = content.trim_start_matches('\u{feff}');

        if body.trim_start().starts_with('[') {
            let fragments: Vec<CaptionFragment> = serde_json::from_str(body)
                .map_err(|e| CliError::InvalidCaptions(e.to_string()))?;
            return Ok(Self {
                fragments,
                timed: true,
            });
        }

        let fragments = body
            .lines()
            .map(|line| CaptionFragment::new(0.0, 0.0, line))
            .collect();
        Ok(Self {
            fragments,
            timed: false,
        })
    }

    pub fn texts(&self) -> Vec<&str> {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }

    /// Fail unless the track carries timing
    pub fn require_timing(&self, path: &Path) -> Result<()> {
        if !self.timed {
            return Err(CliError::InvalidCaptions(format!(
                "{} has no timing; expected a JSON array of {{start, end, text}} entries",
                path.display()
            ))
            .into());
        }
        Ok(())
    }
}

/// File reader for caption tracks and related inputs
pub struct CaptionReader;

impl CaptionReader {
    /// Read a file as UTF-8 text
    pub fn read_text(path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()).into());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(content)
    }

    pub fn read_track(path: &Path) -> Result<CaptionTrack> {
        let content = Self::read_text(path)?;
        let track = CaptionTrack::parse(&content)
            .with_context(|| format!("Failed to parse captions: {}", path.display()))?;

        log::debug!(
            "Read {} fragments from {} ({})",
            track.fragments.len(),
            path.display(),
            if track.timed { "timed" } else { "plain" }
        );

        Ok(track)
    }

    /// Read a stored timing blob; unusable blobs give the default calibration
    pub fn read_timing_blob(path: &Path) -> Result<TimingConfig> {
        let blob = Self::read_text(path)?;
        match TimingConfig::parse_blob(blob.trim()) {
            Ok(config) => Ok(config),
            Err(err) => {
                log::warn!(
                    "Ignoring timing blob {}: {err}; using defaults",
                    path.display()
                );
                Ok(TimingConfig::default())
            }
        }
    }

    /// Translations as a JSON array of strings, or one per line
    pub fn read_translations(path: &Path) -> Result<Vec<String>> {
        let content = Self::read_text(path)?;
        let trimmed = content.trim_start();

        if trimmed.starts_with('[') {
            return serde_json::from_str(trimmed)
                .with_context(|| format!("Failed to parse translations: {}", path.display()));
        }

        Ok(content.lines().map(str::to_string).collect())
    }
}
