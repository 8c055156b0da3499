//! Detect command implementation

use super::{GlobalArgs, ReportFormat};
use crate::input::CaptionReader;
use crate::output::write_json;
use anyhow::{Context, Result};
use clap::Args;
use dualsub_core::{detect, DriftAnalysis};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// Arguments for the detect command
#[derive(Debug, Args)]
pub struct DetectArgs {
    /// Timed caption file (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Playback position when the analysis is requested, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 0.0)]
    pub at: f64,

    /// Save the recommended calibration as a timing blob when drift is found
    #[arg(long, value_name = "FILE")]
    pub write_blob: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

impl DetectArgs {
    /// Execute the detect command
    pub fn execute(&self, global: &GlobalArgs) -> Result<()> {
        let config = global.load_config()?;
        let track = CaptionReader::read_track(&self.input)?;
        track.require_timing(&self.input)?;

        let analysis = detect(&track.fragments, self.at);
        log::info!(
            "Drift analysis for {}: {}",
            self.input.display(),
            analysis.analysis
        );

        if let Some(path) = &self.write_blob {
            if analysis.detected {
                fs::write(path, analysis.recommendation.to_blob())
                    .with_context(|| format!("Failed to write timing blob: {}", path.display()))?;
                log::info!("Wrote recommended timing to {}", path.display());
            } else {
                log::info!("No drift detected; {} left untouched", path.display());
            }
        }

        let stdout = io::stdout();
        let mut out = stdout.lock();
        match self.format {
            ReportFormat::Json => write_json(&mut out, &analysis, config.output.pretty_json)?,
            ReportFormat::Text => write_report(&mut out, &analysis)?,
        }

        Ok(())
    }
}

fn write_report<W: Write>(out: &mut W, analysis: &DriftAnalysis) -> Result<()> {
    if analysis.detected {
        writeln!(out, "Drift detected (confidence {}%)", analysis.confidence)?;
    } else {
        writeln!(out, "No drift detected")?;
    }
    writeln!(out, "{}", analysis.analysis)?;

    if analysis.detected {
        let recommendation = &analysis.recommendation;
        writeln!(
            out,
            "Recommended: offset {:+.1}s, pre-roll {}ms, post-roll {}ms",
            recommendation.relative_offset(),
            recommendation.pre_roll_ms(),
            recommendation.post_roll_ms()
        )?;
    }

    out.flush()?;
    Ok(())
}
