//! Lookup command implementation

use super::{GlobalArgs, ReportFormat};
use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::CaptionReader;
use crate::output::{format_timestamp, write_json};
use anyhow::Result;
use clap::Args;
use dualsub_core::{apply_calibration, SubtitleIndex, TimingConfig};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

/// Calibration flags, applied on top of the config file or a timing blob
#[derive(Debug, Args)]
pub struct TimingArgs {
    /// Offset in seconds relative to the built-in correction
    #[arg(long, value_name = "SECONDS", allow_negative_numbers = true)]
    pub offset: Option<f64>,

    /// Show subtitles this many milliseconds early
    #[arg(long, value_name = "MS", allow_negative_numbers = true)]
    pub pre_roll: Option<f64>,

    /// Keep subtitles this many milliseconds longer
    #[arg(long, value_name = "MS", allow_negative_numbers = true)]
    pub post_roll: Option<f64>,

    /// Stored timing blob to start from instead of the config file
    #[arg(long, value_name = "FILE")]
    pub timing_file: Option<PathBuf>,

    /// Use caption times as they are, without any calibration
    #[arg(long, conflicts_with_all = ["offset", "pre_roll", "post_roll", "timing_file"])]
    pub raw: bool,
}

impl TimingArgs {
    /// Defaults, then config file or blob, then flags
    pub fn resolve(&self, config: &CliConfig) -> Result<TimingConfig> {
        if self.raw {
            return Ok(TimingConfig::zero());
        }

        let mut timing = match &self.timing_file {
            Some(path) => CaptionReader::read_timing_blob(path)?,
            None => config.timing.to_timing_config(),
        };

        if let Some(offset) = self.offset {
            timing = timing.with_relative_offset(offset);
        }
        if let Some(pre_roll) = self.pre_roll {
            timing = timing.with_pre_roll(non_negative("--pre-roll", pre_roll)?);
        }
        if let Some(post_roll) = self.post_roll {
            timing = timing.with_post_roll(non_negative("--post-roll", post_roll)?);
        }

        timing
            .validate()
            .map_err(|e| CliError::ConfigError(e.to_string()))?;

        log::debug!(
            "Timing: offset {:.2}s (relative {:+.2}s), pre-roll {}ms, post-roll {}ms",
            timing.offset(),
            timing.relative_offset(),
            timing.pre_roll_ms(),
            timing.post_roll_ms()
        );

        Ok(timing)
    }
}

fn non_negative(flag: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(CliError::ConfigError(format!(
            "{flag} must be a non-negative number, got {value}"
        ))
        .into())
    }
}

/// Arguments for the lookup command
#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Timed caption file (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Playback time in seconds (repeatable)
    #[arg(
        short,
        long = "time",
        value_name = "SECONDS",
        required = true,
        allow_negative_numbers = true
    )]
    pub times: Vec<f64>,

    #[command(flatten)]
    pub timing: TimingArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

/// Subtitle shown at one playback time
#[derive(Debug, Serialize, PartialEq)]
pub struct LookupHit {
    pub time: f64,
    /// Position in the caption track, absent when nothing is visible
    pub index: Option<usize>,
    pub text: String,
    /// Calibrated visibility window of the matched caption
    pub window: Option<(f64, f64)>,
}

impl LookupArgs {
    /// Execute the lookup command
    pub fn execute(&self, global: &GlobalArgs) -> Result<()> {
        let config = global.load_config()?;
        let timing = self.timing.resolve(&config)?;

        let track = CaptionReader::read_track(&self.input)?;
        track.require_timing(&self.input)?;

        let hits = lookup_times(&SubtitleIndex::new(&track.fragments, timing), &self.times);

        let stdout = io::stdout();
        let mut out = stdout.lock();
        match self.format {
            ReportFormat::Json => write_json(&mut out, &hits, config.output.pretty_json)?,
            ReportFormat::Text => {
                for hit in &hits {
                    writeln!(out, "{}\t{}", format_timestamp(hit.time), hit.text)?;
                }
                out.flush()?;
            }
        }

        Ok(())
    }
}

pub fn lookup_times(index: &SubtitleIndex<'_>, times: &[f64]) -> Vec<LookupHit> {
    times
        .iter()
        .map(|&time| match index.active_index(time) {
            Some(position) => {
                let fragment = &index.fragments()[position];
                LookupHit {
                    time,
                    index: Some(position),
                    text: fragment.text.clone(),
                    window: Some(apply_calibration(fragment.start, fragment.end, index.config())),
                }
            }
            None => LookupHit {
                time,
                index: None,
                text: String::new(),
                window: None,
            },
        })
        .collect()
}
