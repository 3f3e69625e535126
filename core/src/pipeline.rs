//! End-to-end corpus processing.
//!
//! `Pipeline` runs normalize -> tokenize -> count -> estimate -> write for
//! each configured corpus. One corpus failing never stops the others: a
//! missing file is skipped with a warning, any other error fails only that
//! corpus. Artifacts are written only after every table of a corpus has been
//! built.
use crate::config::{Config, CorpusSpec};
use crate::corpus::read_corpus;
use crate::error::{CorpusError, TableError};
use crate::estimate::{estimate, ProbabilityTable};
use crate::frequency::{count_orders, FrequencyTable};
use crate::normalize::Normalizer;
use crate::serialize::ArtifactWriter;
use crate::vocab::{FrequencySummary, Vocabulary};
use std::path::{Path, PathBuf};

/// Every table built from one token sequence.
#[derive(Debug, Clone)]
pub struct NgramTables {
    pub total_tokens: usize,
    /// Orders 1..=max_order, ascending.
    pub counts: Vec<FrequencyTable>,
    /// Only the orders the estimator defines, ascending.
    pub scores: Vec<ProbabilityTable>,
    pub vocabulary: Vocabulary,
    pub summary: FrequencySummary,
}

impl NgramTables {
    pub fn counts(&self, order: usize) -> Option<&FrequencyTable> {
        self.counts.iter().find(|t| t.order() == order)
    }

    pub fn scores(&self, order: usize) -> Option<&ProbabilityTable> {
        self.scores.iter().find(|t| t.order() == order)
    }
}

#[derive(Debug, Clone)]
pub struct CorpusReport {
    pub name: String,
    pub summary: FrequencySummary,
    pub artifacts: Vec<PathBuf>,
}

#[derive(Debug)]
pub enum CorpusOutcome {
    Succeeded(CorpusReport),
    Skipped { name: String, path: PathBuf },
    Failed { name: String, error: CorpusError },
}

/// Result of a batch run over several corpora.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<CorpusOutcome>,
}

impl RunReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &CorpusReport> + '_ {
        self.outcomes.iter().filter_map(|o| match o {
            CorpusOutcome::Succeeded(report) => Some(report),
            _ => None,
        })
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, CorpusOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, CorpusOutcome::Failed { .. }))
            .count()
    }

    /// At least one corpus produced its artifacts.
    pub fn is_success(&self) -> bool {
        self.succeeded().next().is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
    normalizer: Normalizer,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        let normalizer = Normalizer::new(&config.normalizer);
        Self { config, normalizer }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Clean (when enabled) and tokenize `text`.
    pub fn tokens_for(&self, text: &str) -> Vec<String> {
        if self.config.normalize {
            let clean = self.normalizer.normalize(text);
            self.config.tokenizer.tokenize(&clean)
        } else {
            self.config.tokenizer.tokenize(text)
        }
    }

    /// Count every order and score every order the estimator defines.
    pub fn build(&self, tokens: &[String]) -> Result<NgramTables, TableError> {
        let counts = count_orders(tokens, self.config.max_order, self.config.parallel_orders);

        let policy = self.config.estimator;
        let mut scores: Vec<ProbabilityTable> = Vec::with_capacity(counts.len());
        for (i, table) in counts.iter().enumerate() {
            let lower = i.checked_sub(1).map(|j| &counts[j]);
            if let Some(probs) = estimate(table, lower, policy)? {
                scores.push(probs);
            }
        }

        let vocabulary = Vocabulary::from_tokens(tokens);
        let summary = FrequencySummary::from_tables(&counts, tokens.len(), &vocabulary);

        Ok(NgramTables {
            total_tokens: tokens.len(),
            counts,
            scores,
            vocabulary,
            summary,
        })
    }

    /// Write every artifact of `tables` for corpus `name`.
    pub fn write(&self, name: &str, tables: &NgramTables, out_dir: &Path) -> Result<Vec<PathBuf>, CorpusError> {
        let writer = ArtifactWriter::new(out_dir, name, self.config.layout, self.config.pretty);

        let mut artifacts = Vec::new();
        for table in &tables.counts {
            artifacts.push(writer.write_counts(table)?);
        }
        for table in &tables.scores {
            artifacts.push(writer.write_scores(table)?);
        }
        if self.config.auxiliary {
            artifacts.extend(writer.write_vocabulary(&tables.vocabulary)?);
            artifacts.push(writer.write_summary(&tables.summary)?);
        }
        Ok(artifacts)
    }

    /// Read, build and write one corpus. `corpus.name` is the output prefix.
    pub fn process_corpus(&self, corpus: &CorpusSpec, out_dir: &Path) -> Result<CorpusReport, CorpusError> {
        tracing::info!(corpus = %corpus.name, path = %corpus.path.display(), "processing corpus");

        let text = read_corpus(&corpus.path, self.config.input_format)?;
        let tokens = self.tokens_for(&text);
        drop(text);
        tracing::info!(corpus = %corpus.name, tokens = tokens.len(), "tokenized");

        let tables = self.build(&tokens)?;
        let artifacts = self.write(&corpus.name, &tables, out_dir)?;

        tracing::info!(
            corpus = %corpus.name,
            vocabulary = tables.summary.vocabulary_size,
            unigrams = tables.summary.unigrams,
            bigrams = tables.summary.bigrams,
            trigrams = tables.summary.trigrams,
            quadrigrams = tables.summary.quadrigrams,
            pentagrams = tables.summary.pentagrams,
            files = artifacts.len(),
            "wrote artifacts"
        );

        Ok(CorpusReport {
            name: corpus.name.clone(),
            summary: tables.summary,
            artifacts,
        })
    }

    /// Process every configured corpus in order.
    pub fn run(&self, out_dir: &Path) -> RunReport {
        let mut report = RunReport::default();

        for corpus in &self.config.corpora {
            let outcome = match self.process_corpus(corpus, out_dir) {
                Ok(done) => CorpusOutcome::Succeeded(done),
                Err(CorpusError::Missing(path)) => {
                    tracing::warn!(corpus = %corpus.name, path = %path.display(), "input file not found, skipping");
                    CorpusOutcome::Skipped {
                        name: corpus.name.clone(),
                        path,
                    }
                }
                Err(error) => {
                    tracing::error!(corpus = %corpus.name, "{error}");
                    CorpusOutcome::Failed {
                        name: corpus.name.clone(),
                        error,
                    }
                }
            };
            report.outcomes.push(outcome);
        }

        tracing::info!(
            succeeded = report.succeeded().count(),
            skipped = report.skipped_count(),
            failed = report.failed_count(),
            "run complete"
        );
        report
    }
}
