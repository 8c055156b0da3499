//! dualsub CLI library
//!
//! Command-line front end for the `dualsub-core` caption processing library:
//! sentence reconstruction, subtitle lookup, drift detection and paragraph
//! building over caption files.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
