//! Error types for corpus processing and configuration loading.
use std::path::PathBuf;

/// Failure while turning one corpus into artifacts.
///
/// `Missing` is the only variant the batch runner treats as a skip; every
/// other variant fails that corpus alone.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("input file not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("input file {} is not valid UTF-8: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Tables of the wrong order handed to counting or estimation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("gram '{gram}' has order {found}, table expects {expected}")]
    GramOrder {
        gram: String,
        expected: usize,
        found: usize,
    },

    #[error("cannot condition an order-{table} table on an order-{lower} table")]
    OrderMismatch { table: usize, lower: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
