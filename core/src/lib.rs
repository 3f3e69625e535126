//! libngram-core
//!
//! Offline n-gram table builder for keyboard next-word suggestion data.
//! Raw text is cleaned, tokenized, cut into 1..5-grams, counted, scored and
//! written as flat JSON maps.
//!
//! Public API:
//! - `Normalizer` - markup stripping and character-set restriction
//! - `TokenizerPolicy` - whitespace or punctuation-aware tokenization
//! - `Gram` / `build_grams` - sliding-window gram construction
//! - `FrequencyTable` / `count_orders` - per-order occurrence counts
//! - `EstimatorPolicy` / `estimate` - Laplace log-probabilities or plain MLE
//! - `Vocabulary` / `FrequencySummary` - auxiliary artifacts
//! - `ArtifactWriter` - JSON output in either file layout
//! - `Pipeline` - per-corpus and batch entry points
//! - `Config` - TOML configuration and presets

pub mod config;
pub use config::{Config, CorpusSpec, InputFormat, OutputLayout, MAX_ORDER};

pub mod error;
pub use error::{ConfigError, CorpusError, TableError};

pub mod normalize;
pub use normalize::{CharRange, Normalizer, NormalizerConfig};

pub mod tokenize;
pub use tokenize::TokenizerPolicy;

pub mod gram;
pub use gram::{build_grams, Gram};

pub mod frequency;
pub use frequency::{count_orders, FrequencyTable};

pub mod estimate;
pub use estimate::{estimate, Estimator, EstimatorPolicy, LaplaceLogProb, MaximumLikelihood, ProbabilityTable};

pub mod vocab;
pub use vocab::{FrequencySummary, Vocabulary};

pub mod corpus;
pub use corpus::read_corpus;

pub mod serialize;
pub use serialize::{serialize, write_json, Artifact, ArtifactWriter};

pub mod pipeline;
pub use pipeline::{CorpusOutcome, CorpusReport, NgramTables, Pipeline, RunReport};
