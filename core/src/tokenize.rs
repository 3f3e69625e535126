//! Lowercasing tokenizers.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximal runs of word characters, or of characters that are neither word
/// characters nor whitespace. `\w` is Unicode-aware.
static WORD_OR_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+|[^\w\s]+").expect("valid token regex"));

/// How cleaned text is split into tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerPolicy {
    /// Split on whitespace only; punctuation stays attached to words.
    #[default]
    Whitespace,
    /// Split on whitespace, then separate word runs from punctuation runs.
    Punctuation,
}

impl TokenizerPolicy {
    /// Lowercase and split `text`. Total: never fails, `""` gives `[]`.
    pub fn tokenize(self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        match self {
            TokenizerPolicy::Whitespace => {
                lowered.split_whitespace().map(str::to_owned).collect()
            }
            TokenizerPolicy::Punctuation => {
                let mut tokens = Vec::new();
                for unit in lowered.split_whitespace() {
                    tokens.extend(
                        WORD_OR_PUNCT
                            .find_iter(unit)
                            .map(|m| m.as_str())
                            .filter(|t| !t.trim().is_empty())
                            .map(str::to_owned),
                    );
                }
                tokens
            }
        }
    }
}

impl std::str::FromStr for TokenizerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "whitespace" => Ok(Self::Whitespace),
            "punctuation" => Ok(Self::Punctuation),
            other => Err(format!("unknown tokenizer '{other}' (expected whitespace|punctuation)")),
        }
    }
}
