//! Rendering tables to string-keyed maps and writing JSON artifacts.
//!
//! Maps are ordered by key so the same corpus always produces byte-identical
//! files. Every file is written to a temporary sibling and renamed into place,
//! so readers never observe a partially written artifact.
use crate::config::OutputLayout;
use crate::error::CorpusError;
use crate::estimate::ProbabilityTable;
use crate::frequency::FrequencyTable;
use crate::gram::Gram;
use crate::vocab::{FrequencySummary, Vocabulary};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A table whose entries can be flattened to `"tok1 tok2 ..." -> value`.
pub trait GramTable {
    type Value: Serialize + Copy;

    fn entries(&self) -> Box<dyn Iterator<Item = (&Gram, Self::Value)> + '_>;
}

impl GramTable for FrequencyTable {
    type Value = u64;

    fn entries(&self) -> Box<dyn Iterator<Item = (&Gram, u64)> + '_> {
        Box::new(self.iter())
    }
}

impl GramTable for ProbabilityTable {
    type Value = f64;

    fn entries(&self) -> Box<dyn Iterator<Item = (&Gram, f64)> + '_> {
        Box::new(self.iter())
    }
}

/// Render `table` with each gram joined by a single space.
pub fn serialize<T: GramTable>(table: &T) -> BTreeMap<String, T::Value> {
    table.entries().map(|(gram, v)| (gram.key(), v)).collect()
}

/// Write `value` as JSON to `path` atomically, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, pretty: bool) -> Result<(), CorpusError> {
    let write_err = |source: std::io::Error| CorpusError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let temp = NamedTempFile::new_in(parent).map_err(write_err)?;
    {
        let mut writer = BufWriter::new(&temp);
        let result = if pretty {
            serde_json::to_writer_pretty(&mut writer, value)
        } else {
            serde_json::to_writer(&mut writer, value)
        };
        result.map_err(|source| CorpusError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
        writer.flush().map_err(write_err)?;
    }
    temp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Kinds of file a corpus produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Counts(usize),
    Scores(usize),
    Vocabulary,
    ReverseVocabulary,
    Summary,
}

/// Writes every artifact of one corpus under `out_dir` following `layout`.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    out_dir: PathBuf,
    name: String,
    layout: OutputLayout,
    pretty: bool,
}

impl ArtifactWriter {
    pub fn new(out_dir: impl Into<PathBuf>, name: impl Into<String>, layout: OutputLayout, pretty: bool) -> Self {
        Self {
            out_dir: out_dir.into(),
            name: name.into(),
            layout,
            pretty,
        }
    }

    /// Location of `artifact` for this corpus.
    pub fn path(&self, artifact: Artifact) -> PathBuf {
        match self.layout {
            OutputLayout::Prefixed => {
                let file = match artifact {
                    Artifact::Counts(n) => format!("{}_{}gram_counts.json", self.name, n),
                    Artifact::Scores(n) => format!("{}_{}gram_logproba.json", self.name, n),
                    Artifact::Vocabulary => format!("{}_vocab.json", self.name),
                    Artifact::ReverseVocabulary => format!("{}_vocab_rev.json", self.name),
                    Artifact::Summary => format!("{}_freq.json", self.name),
                };
                self.out_dir.join(file)
            }
            OutputLayout::Directory => {
                let file = match artifact {
                    Artifact::Counts(n) => format!("{}gram.json", n),
                    Artifact::Scores(n) => format!("prob_{}gram.json", n),
                    Artifact::Vocabulary => "vocab.json".to_string(),
                    Artifact::ReverseVocabulary => "vocab_rev.json".to_string(),
                    Artifact::Summary => "freq.json".to_string(),
                };
                self.out_dir.join(&self.name).join(file)
            }
        }
    }

    pub fn write_counts(&self, table: &FrequencyTable) -> Result<PathBuf, CorpusError> {
        let path = self.path(Artifact::Counts(table.order()));
        write_json(&path, &serialize(table), self.pretty)?;
        Ok(path)
    }

    pub fn write_scores(&self, table: &ProbabilityTable) -> Result<PathBuf, CorpusError> {
        let path = self.path(Artifact::Scores(table.order()));
        write_json(&path, &serialize(table), self.pretty)?;
        Ok(path)
    }

    /// Writes `vocab.json` and `vocab_rev.json`.
    pub fn write_vocabulary(&self, vocab: &Vocabulary) -> Result<Vec<PathBuf>, CorpusError> {
        let forward = self.path(Artifact::Vocabulary);
        write_json(&forward, &vocab.to_index_map(), self.pretty)?;
        let reverse = self.path(Artifact::ReverseVocabulary);
        write_json(&reverse, &vocab.reverse(), self.pretty)?;
        Ok(vec![forward, reverse])
    }

    pub fn write_summary(&self, summary: &FrequencySummary) -> Result<PathBuf, CorpusError> {
        let path = self.path(Artifact::Summary);
        write_json(&path, summary, self.pretty)?;
        Ok(path)
    }
}
