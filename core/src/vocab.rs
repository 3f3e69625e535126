//! Token vocabulary and the per-corpus summary written next to the tables.
use crate::frequency::FrequencyTable;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// Dense, sorted token <-> index mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    // sorted by code point; position is the index
    tokens: Vec<String>,
}

impl Vocabulary {
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let distinct: BTreeSet<&str> = tokens.iter().map(AsRef::as_ref).collect();
        Self {
            tokens: distinct.into_iter().map(str::to_owned).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn index(&self, token: &str) -> Option<usize> {
        self.tokens
            .binary_search_by(|t| t.as_str().cmp(token))
            .ok()
    }

    pub fn token(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    /// `vocab.json` contents: token -> index.
    pub fn to_index_map(&self) -> BTreeMap<&str, usize> {
        self.tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect()
    }

    /// `vocab_rev.json` contents: index -> token.
    pub fn reverse(&self) -> ReverseVocabulary<'_> {
        ReverseVocabulary(self)
    }
}

/// Serializes as an index -> token map in index order. JSON renders the
/// integer keys as decimal strings.
#[derive(Debug, Clone, Copy)]
pub struct ReverseVocabulary<'a>(&'a Vocabulary);

impl Serialize for ReverseVocabulary<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (i, token) in self.0.tokens.iter().enumerate() {
            map.serialize_entry(&i, token)?;
        }
        map.end()
    }
}

/// `freq.json` contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencySummary {
    pub unigrams: usize,
    pub bigrams: usize,
    pub trigrams: usize,
    pub quadrigrams: usize,
    pub pentagrams: usize,
    pub total_tokens: usize,
    pub vocabulary_size: usize,
}

impl FrequencySummary {
    /// Distinct-gram counts are read from `tables` by order; orders that were
    /// not built report 0.
    pub fn from_tables(tables: &[FrequencyTable], total_tokens: usize, vocabulary: &Vocabulary) -> Self {
        let distinct = |order: usize| {
            tables
                .iter()
                .find(|t| t.order() == order)
                .map_or(0, FrequencyTable::len)
        };
        Self {
            unigrams: distinct(1),
            bigrams: distinct(2),
            trigrams: distinct(3),
            quadrigrams: distinct(4),
            pentagrams: distinct(5),
            total_tokens,
            vocabulary_size: vocabulary.len(),
        }
    }
}
