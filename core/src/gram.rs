//! Gram keys and sliding-window construction.
use std::borrow::Borrow;
use std::fmt;

/// An ordered tuple of tokens.
///
/// Hashing and equality match `[String]`, so a table keyed by `Gram` can be
/// probed with a borrowed slice (e.g. a prefix) without allocating.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Gram(Vec<String>);

impl Gram {
    pub fn new(tokens: Vec<String>) -> Self {
        Self(tokens)
    }

    pub fn from_slice(tokens: &[String]) -> Self {
        Self(tokens.to_vec())
    }

    /// Number of tokens.
    pub fn order(&self) -> usize {
        self.0.len()
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// First `n - 1` tokens; empty for unigrams.
    pub fn prefix(&self) -> &[String] {
        &self.0[..self.0.len().saturating_sub(1)]
    }

    /// Tokens joined by a single space.
    pub fn key(&self) -> String {
        self.0.join(" ")
    }
}

impl Borrow<[String]> for Gram {
    fn borrow(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for Gram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl<S: Into<String>> FromIterator<S> for Gram {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// All order-`n` windows of `tokens`, in order of occurrence.
///
/// Yields `max(0, len - n + 1)` windows; `n == 0` or `n > len` yields none.
pub fn windows(tokens: &[String], n: usize) -> impl Iterator<Item = &[String]> + '_ {
    // slice::windows panics on 0; a size above len yields nothing.
    let size = if n == 0 { tokens.len() + 1 } else { n };
    tokens.windows(size)
}

/// Owned grams of order `n`, in order of occurrence, not deduplicated.
pub fn build_grams(tokens: &[String], n: usize) -> Vec<Gram> {
    windows(tokens, n).map(Gram::from_slice).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_owned).collect()
    }

    #[test]
    fn bigrams_follow_input_order() {
        let grams = build_grams(&toks("a b a b c"), 2);
        let expected: Vec<Gram> = vec![
            ["a", "b"].into_iter().collect(),
            ["b", "a"].into_iter().collect(),
            ["a", "b"].into_iter().collect(),
            ["b", "c"].into_iter().collect(),
        ];
        assert_eq!(grams, expected);
    }

    #[test]
    fn gram_count_is_len_minus_n_plus_one() {
        let t = toks("w1 w2 w3 w4 w5 w6 w7");
        for n in 1..=5 {
            assert_eq!(build_grams(&t, n).len(), t.len() - n + 1);
        }
    }

    #[test]
    fn order_above_length_is_empty() {
        let t = toks("a b c");
        assert!(build_grams(&t, 4).is_empty());
        assert!(build_grams(&t, 5).is_empty());
        assert!(build_grams(&[], 1).is_empty());
        assert_eq!(build_grams(&t, 3).len(), 1);
    }

    #[test]
    fn order_zero_is_empty() {
        assert!(build_grams(&toks("a b"), 0).is_empty());
        assert!(build_grams(&[], 0).is_empty());
    }

    #[test]
    fn prefix_and_key() {
        let g: Gram = ["yemma", "inu", "ay"].into_iter().collect();
        assert_eq!(g.order(), 3);
        assert_eq!(g.prefix(), &toks("yemma inu")[..]);
        assert_eq!(g.key(), "yemma inu ay");
        assert_eq!(g.to_string(), "yemma inu ay");

        let u: Gram = ["a"].into_iter().collect();
        assert!(u.prefix().is_empty());
    }
}
