//! CLI command implementations

use crate::config::CliConfig;
use crate::output::OutputFormat;
use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use dualsub_core::sentence::TerminatorKind;
use dualsub_core::SentenceTables;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub mod classify;
pub mod detect;
pub mod lookup;
pub mod paragraphs;
pub mod reconstruct;

/// Flags accepted by every command
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Configuration file
    #[arg(short, long, value_name = "FILE", global = true, env = "DUALSUB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress progress output and logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl GlobalArgs {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
            .init();
    }

    /// The configuration file if one was given, defaults otherwise
    pub fn load_config(&self) -> Result<CliConfig> {
        match &self.config {
            Some(path) => {
                log::debug!("Loading configuration from {}", path.display());
                CliConfig::load(path)
            }
            None => Ok(CliConfig::default()),
        }
    }
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Rebuild complete sentences from caption fragments
    Reconstruct(reconstruct::ReconstructArgs),

    /// Show the subtitle visible at given playback times
    Lookup(lookup::LookupArgs),

    /// Check a caption track for timing drift
    Detect(detect::DetectArgs),

    /// Group captions into paragraphs for translation
    Paragraphs(paragraphs::ParagraphsArgs),

    /// Explain whether text buffers end a sentence
    Classify(classify::ClassifyArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List available output formats
    Formats,

    /// List built-in abbreviations
    Abbreviations,

    /// List sentence terminators and the rule each follows
    Terminators,
}

/// Format for single-document reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable lines
    Text,
    /// One JSON document
    Json,
}

impl Commands {
    pub fn execute(&self, global: &GlobalArgs) -> Result<()> {
        match self {
            Commands::Reconstruct(args) => args.execute(global),
            Commands::Lookup(args) => args.execute(global),
            Commands::Detect(args) => args.execute(global),
            Commands::Paragraphs(args) => args.execute(global),
            Commands::Classify(args) => args.execute(global),
            Commands::List { subcommand } => {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                subcommand.write_to(&mut out)
            }
        }
    }
}

impl ListCommands {
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        let tables = SentenceTables::embedded();
        match self {
            ListCommands::Formats => {
                for format in OutputFormat::ALL {
                    writeln!(out, "{:<10} {}", format.name(), format.description())?;
                }
            }
            ListCommands::Abbreviations => {
                for abbreviation in tables.abbreviations() {
                    writeln!(out, "{abbreviation}.")?;
                }
            }
            ListCommands::Terminators => {
                for (ch, kind) in tables.terminators() {
                    let rule = match kind {
                        TerminatorKind::Period => {
                            "period (ellipsis, decimal, abbreviation, quote checks)"
                        }
                        TerminatorKind::QuoteSensitive => "quote-sensitive",
                        TerminatorKind::Unconditional => "always",
                    };
                    writeln!(out, "{ch}\t{rule}")?;
                }
            }
        }
        out.flush()?;
        Ok(())
    }
}

/// Stdout, or a buffered file when a path is given
pub(crate) fn open_output(path: Option<&Path>) -> Result<Box<dyn Write + Send + Sync>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}
