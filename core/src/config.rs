//! Pipeline configuration.
//!
//! A `Config` selects the policy of every pipeline stage plus the corpora to
//! process. Two presets reproduce the two pipelines the tables were
//! historically built with:
//!
//! - [`Config::wiki`] (the default): raw markup-laden text, normalized,
//!   whitespace tokenizer, Laplace-smoothed negative log-probabilities,
//!   `{name}_{n}gram_counts.json` / `{name}_{n}gram_logproba.json`.
//! - [`Config::sentences`]: `line-number \t sentence` files, no normalization,
//!   punctuation-aware tokenizer, unsmoothed relative frequencies,
//!   `{name}/{n}gram.json` / `{name}/prob_{n}gram.json` plus vocabulary and
//!   summary files.
//!
//! # Example
//!
//! ```rust
//! use libngram_core::{Config, EstimatorPolicy};
//!
//! let config = Config::from_toml_str(
//!     r#"
//!     estimator = "mle"
//!
//!     [[corpus]]
//!     name = "kabyle"
//!     path = "kabyle_corpus.txt"
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.estimator, EstimatorPolicy::Mle);
//! assert_eq!(config.corpora.len(), 1);
//! ```
use crate::error::ConfigError;
use crate::estimate::EstimatorPolicy;
use crate::normalize::NormalizerConfig;
use crate::tokenize::TokenizerPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Highest gram order the pipeline builds.
pub const MAX_ORDER: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Whole file is free text.
    Raw,
    /// One `line-number \t sentence` pair per line.
    Sentences,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputLayout {
    /// `{out}/{name}_{n}gram_counts.json`, `{out}/{name}_{n}gram_logproba.json`
    Prefixed,
    /// `{out}/{name}/{n}gram.json`, `{out}/{name}/prob_{n}gram.json`
    Directory,
}

/// One input corpus. `name` is the language or output prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusSpec {
    pub name: String,
    pub path: PathBuf,
}

impl CorpusSpec {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Highest order to count (1..=5). Tables are built for 1..=max_order.
    pub max_order: usize,

    pub tokenizer: TokenizerPolicy,
    pub estimator: EstimatorPolicy,
    pub input_format: InputFormat,

    /// Run the markup/character-set normalizer before tokenizing.
    pub normalize: bool,

    pub layout: OutputLayout,
    /// Also write vocab.json, vocab_rev.json and freq.json.
    pub auxiliary: bool,
    /// Pretty-print JSON artifacts with a 2-space indent.
    pub pretty: bool,

    /// Count each order on its own thread. Output is identical either way.
    pub parallel_orders: bool,

    pub normalizer: NormalizerConfig,

    #[serde(rename = "corpus")]
    pub corpora: Vec<CorpusSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self::wiki()
    }
}

impl Config {
    /// Raw wiki dump pipeline: clean, split on whitespace, Laplace log-probabilities.
    pub fn wiki() -> Self {
        Self {
            max_order: MAX_ORDER,
            tokenizer: TokenizerPolicy::Whitespace,
            estimator: EstimatorPolicy::Laplace,
            input_format: InputFormat::Raw,
            normalize: true,
            layout: OutputLayout::Prefixed,
            auxiliary: false,
            pretty: false,
            parallel_orders: false,
            normalizer: NormalizerConfig::default(),
            corpora: vec![],
        }
    }

    /// Sentence-file pipeline: punctuation-aware tokens, plain relative frequencies.
    pub fn sentences() -> Self {
        Self {
            max_order: MAX_ORDER,
            tokenizer: TokenizerPolicy::Punctuation,
            estimator: EstimatorPolicy::Mle,
            input_format: InputFormat::Sentences,
            normalize: false,
            layout: OutputLayout::Directory,
            auxiliary: true,
            pretty: true,
            parallel_orders: false,
            normalizer: NormalizerConfig::default(),
            corpora: vec![],
        }
    }

    /// Add a corpus to process.
    pub fn with_corpus(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.corpora.push(CorpusSpec::new(name, path));
        self
    }

    /// Load configuration from a TOML file and validate it.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Parse configuration from a TOML string and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check order bounds, character ranges and corpus names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_ORDER).contains(&self.max_order) {
            return Err(ConfigError::Invalid(format!(
                "max_order must be in 1..={MAX_ORDER}, got {}",
                self.max_order
            )));
        }

        for range in &self.normalizer.extra_ranges {
            if range.start > range.end {
                return Err(ConfigError::Invalid(format!(
                    "character range U+{:04X}..U+{:04X} is reversed",
                    range.start as u32, range.end as u32
                )));
            }
        }

        // Two corpora with one name would write into the same artifacts.
        let mut seen = HashSet::new();
        for corpus in &self.corpora {
            if corpus.name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "corpus at {} has an empty name",
                    corpus.path.display()
                )));
            }
            // The name becomes a file prefix or a directory under out_dir.
            if corpus.name.contains(['/', '\\']) || corpus.name.chars().all(|c| c == '.') {
                return Err(ConfigError::Invalid(format!(
                    "corpus name '{}' must not contain path separators or be only dots",
                    corpus.name
                )));
            }
            if !seen.insert(corpus.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate corpus name '{}'",
                    corpus.name
                )));
            }
        }

        Ok(())
    }
}
