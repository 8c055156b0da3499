//! Embedded sentence rule tables
//!
//! The rules live in `configs/sentence.toml` and are parsed once on first use.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

static EMBEDDED: OnceLock<SentenceTables> = OnceLock::new();

const EMBEDDED_RULES: &str = include_str!("../../configs/sentence.toml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    pub metadata: MetadataConfig,
    pub terminators: TerminatorConfig,
    pub quotes: QuoteConfig,
    pub abbreviations: AbbreviationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminatorConfig {
    pub period: char,
    #[serde(default)]
    pub quote_sensitive: Vec<char>,
    #[serde(default)]
    pub unconditional: Vec<char>,
    #[serde(default)]
    pub attaching: Vec<char>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    #[serde(default)]
    pub symmetric: Vec<char>,
    #[serde(default)]
    pub pairs: Vec<QuotePair>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuotePair {
    pub open: char,
    pub close: char,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbbreviationConfig {
    #[serde(default)]
    pub single_letter_initials: bool,
    #[serde(default)]
    pub categories: HashMap<String, Vec<String>>,
}

/// Which rule a terminator character falls under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminatorKind {
    /// ASCII period: ellipsis, decimal, abbreviation and quote checks apply
    Period,
    /// Only the quote balance check applies
    QuoteSensitive,
    /// Always a boundary
    Unconditional,
}

/// Lookup tables built from a [`RulesConfig`]
#[derive(Debug, Clone)]
pub struct SentenceTables {
    terminators: HashMap<char, TerminatorKind>,
    attaching: HashSet<char>,
    symmetric_quotes: Vec<char>,
    quote_pairs: Vec<QuotePair>,
    abbreviations: HashSet<String>,
    single_letter_initials: bool,
}

impl SentenceTables {
    /// Tables compiled into the crate
    pub fn embedded() -> &'static SentenceTables {
        EMBEDDED.get_or_init(|| {
            Self::from_toml(EMBEDDED_RULES).expect("Failed to load embedded sentence rules")
        })
    }

    /// Parse tables from TOML source
    pub fn from_toml(source: &str) -> Result<Self, CoreError> {
        let config: RulesConfig = toml::from_str(source).map_err(|e| {
            CoreError::Configuration(format!("Failed to parse sentence rules: {e}"))
        })?;
        Self::from_config(config)
    }

    pub fn from_config(config: RulesConfig) -> Result<Self, CoreError> {
        let mut terminators = HashMap::new();
        terminators.insert(config.terminators.period, TerminatorKind::Period);
        for ch in config.terminators.quote_sensitive {
            if terminators.insert(ch, TerminatorKind::QuoteSensitive).is_some() {
                return Err(CoreError::Configuration(format!(
                    "Terminator '{ch}' is listed more than once"
                )));
            }
        }
        for ch in config.terminators.unconditional {
            if terminators.insert(ch, TerminatorKind::Unconditional).is_some() {
                return Err(CoreError::Configuration(format!(
                    "Terminator '{ch}' is listed more than once"
                )));
            }
        }

        let abbreviations = config
            .abbreviations
            .categories
            .into_values()
            .flatten()
            .filter(|abbr| !abbr.is_empty())
            .collect();

        Ok(Self {
            terminators,
            attaching: config.terminators.attaching.into_iter().collect(),
            symmetric_quotes: config.quotes.symmetric,
            quote_pairs: config.quotes.pairs,
            abbreviations,
            single_letter_initials: config.abbreviations.single_letter_initials,
        })
    }

    #[inline]
    pub fn terminator_kind(&self, ch: char) -> Option<TerminatorKind> {
        self.terminators.get(&ch).copied()
    }

    /// Whether a fragment starting with `ch` attaches without a space
    #[inline]
    pub fn is_attaching(&self, ch: char) -> bool {
        self.attaching.contains(&ch)
    }

    /// Exact, case-sensitive abbreviation lookup
    pub fn is_abbreviation(&self, token: &str) -> bool {
        if self.abbreviations.contains(token) {
            return true;
        }

        // Single initials only; "MIT." is a real sentence end
        if self.single_letter_initials {
            let mut chars = token.chars();
            if let (Some(ch), None) = (chars.next(), chars.next()) {
                return ch.is_ascii_uppercase();
            }
        }

        false
    }

    /// True when some quote is still open in `text`
    pub fn has_open_quote(&self, text: &[char]) -> bool {
        for quote in &self.symmetric_quotes {
            let count = text.iter().filter(|&&ch| ch == *quote).count();
            if count % 2 == 1 {
                return true;
            }
        }

        if self.quote_pairs.is_empty() {
            return false;
        }

        let mut opened = 0usize;
        let mut closed = 0usize;
        for &ch in text {
            for pair in &self.quote_pairs {
                if ch == pair.open {
                    opened += 1;
                } else if ch == pair.close {
                    closed += 1;
                }
            }
        }
        opened > closed
    }

    pub fn abbreviation_count(&self) -> usize {
        self.abbreviations.len()
    }

    /// Known abbreviations, sorted
    pub fn abbreviations(&self) -> Vec<&str> {
        let mut list: Vec<&str> = self.abbreviations.iter().map(String::as_str).collect();
        list.sort_unstable();
        list
    }

    /// Terminator characters with their rule, sorted by character
    pub fn terminators(&self) -> Vec<(char, TerminatorKind)> {
        let mut list: Vec<(char, TerminatorKind)> =
            self.terminators.iter().map(|(&ch, &kind)| (ch, kind)).collect();
        list.sort_unstable_by_key(|(ch, _)| *ch);
        list
    }
}
