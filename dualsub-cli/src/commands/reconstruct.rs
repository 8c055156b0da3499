//! Reconstruct command implementation

use super::{open_output, GlobalArgs};
use crate::config::CliConfig;
use crate::input::{resolve_patterns, CaptionReader, CaptionTrack};
use crate::output::{create_formatter, FormatOptions, OutputFormat};
use crate::progress::ProgressReporter;
use anyhow::Result;
use clap::Args;
use dualsub_core::{
    BoundaryClassifier, ReconstructedSentence, ReconstructionStats, SentenceReconstructor,
};
use rayon::prelude::*;
use std::path::PathBuf;

/// Arguments for the reconstruct command
#[derive(Debug, Args)]
pub struct ReconstructArgs {
    /// Caption files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Extra abbreviation, without the trailing dot (repeatable)
    #[arg(short = 'a', long = "abbreviation", value_name = "ABBR")]
    pub abbreviations: Vec<String>,

    /// Prefix each sentence with its time span (text format)
    #[arg(long)]
    pub timestamps: bool,

    /// Print reconstruction statistics to stderr
    #[arg(long)]
    pub stats: bool,
}

/// Sentences rebuilt from one caption file
struct FileResult {
    path: PathBuf,
    track: CaptionTrack,
    sentences: Vec<ReconstructedSentence>,
}

impl FileResult {
    fn stats(&self) -> ReconstructionStats {
        let texts: Vec<&str> = self.sentences.iter().map(|s| s.text.as_str()).collect();
        ReconstructionStats::compute(&self.track.texts(), &texts)
    }
}

impl ReconstructArgs {
    /// Execute the reconstruct command
    pub fn execute(&self, global: &GlobalArgs) -> Result<()> {
        log::info!("Starting caption reconstruction");
        log::debug!("Arguments: {:?}", self);

        let config = global.load_config()?;
        let files = resolve_patterns(&self.input)?;
        log::info!("Found {} caption file(s)", files.len());

        let reconstructor = SentenceReconstructor::with_classifier(self.classifier(&config));

        let mut progress = ProgressReporter::new(global.quiet);
        progress.init_files(files.len() as u64);

        // Files are independent; collect keeps input order
        let results = files
            .par_iter()
            .map(|path| {
                let result = reconstruct_file(&reconstructor, path.clone());
                progress.file_completed(&path.display().to_string());
                result
            })
            .collect::<Result<Vec<_>>>()?;

        progress.finish();

        let writer = open_output(self.output.as_deref())?;
        let options = FormatOptions {
            timestamps: self.timestamps,
            pretty_json: config.output.pretty_json,
        };
        let mut formatter = create_formatter(self.format, writer, options);

        for result in &results {
            for sentence in &result.sentences {
                formatter.format_sentence(sentence)?;
            }

            if self.stats {
                let stats = result.stats();
                eprintln!(
                    "{}: {} fragments -> {} sentences (ratio {:.2}, avg length {:.2} -> {:.2})",
                    result.path.display(),
                    stats.original_count,
                    stats.reconstructed_count,
                    stats.compression_ratio,
                    stats.avg_original_length,
                    stats.avg_reconstructed_length
                );
            }
        }

        formatter.finish()?;

        let total: usize = results.iter().map(|r| r.sentences.len()).sum();
        log::info!("Reconstructed {} sentence(s)", total);

        Ok(())
    }

    /// Built-in rules plus abbreviations from the config file and flags
    fn classifier(&self, config: &CliConfig) -> BoundaryClassifier {
        let extra = config
            .sentence
            .extra_abbreviations
            .iter()
            .chain(&self.abbreviations)
            .map(|abbr| abbr.trim_end_matches('.').to_string());
        BoundaryClassifier::new().with_abbreviations(extra)
    }
}

fn reconstruct_file(reconstructor: &SentenceReconstructor, path: PathBuf) -> Result<FileResult> {
    let track = CaptionReader::read_track(&path)?;

    let sentences = if track.timed {
        reconstructor.reconstruct_fragments(&track.fragments)
    } else {
        reconstructor.reconstruct_texts(&track.texts())
    };

    log::debug!(
        "{}: {} fragments -> {} sentences",
        path.display(),
        track.fragments.len(),
        sentences.len()
    );

    Ok(FileResult {
        path,
        track,
        sentences,
    })
}
