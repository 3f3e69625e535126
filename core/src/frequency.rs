//! Gram occurrence counting.
use crate::error::TableError;
use crate::gram::{windows, Gram};
use ahash::AHashMap;

/// Occurrence counts of every distinct gram of one order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    order: usize,
    counts: AHashMap<Gram, u64>,
}

impl FrequencyTable {
    pub fn new(order: usize) -> Self {
        Self {
            order,
            counts: AHashMap::new(),
        }
    }

    /// Aggregate a gram sequence. A gram with other than `order` tokens is
    /// rejected.
    pub fn from_grams<I>(order: usize, grams: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = Gram>,
    {
        let mut table = Self::new(order);
        for gram in grams {
            if gram.order() != order {
                return Err(TableError::GramOrder {
                    gram: gram.key(),
                    expected: order,
                    found: gram.order(),
                });
            }
            *table.counts.entry(gram).or_insert(0) += 1;
        }
        Ok(table)
    }

    /// Count the order-`n` windows of `tokens` directly, allocating a key only
    /// the first time a gram is seen.
    pub fn from_tokens(tokens: &[String], n: usize) -> Self {
        let mut table = Self::new(n);
        for window in windows(tokens, n) {
            if let Some(count) = table.counts.get_mut(window) {
                *count += 1;
            } else {
                table.counts.insert(Gram::from_slice(window), 1);
            }
        }
        table
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Occurrences of `gram`, 0 when absent.
    pub fn count(&self, gram: &[String]) -> u64 {
        self.counts.get(gram).copied().unwrap_or(0)
    }

    /// Number of distinct grams.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. the number of windows counted.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Gram, u64)> + '_ {
        self.counts.iter().map(|(g, &c)| (g, c))
    }
}

/// Tables for orders `1..=max_order` over the same tokens; index 0 is order 1.
///
/// With `parallel` set each order is counted on its own scoped thread. The
/// tables are independent, so the result equals the sequential one.
pub fn count_orders(tokens: &[String], max_order: usize, parallel: bool) -> Vec<FrequencyTable> {
    let tables: Vec<FrequencyTable> = if parallel && max_order > 1 {
        std::thread::scope(|scope| {
            let handles: Vec<_> = (1..=max_order)
                .map(|n| scope.spawn(move || FrequencyTable::from_tokens(tokens, n)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        })
    } else {
        (1..=max_order)
            .map(|n| FrequencyTable::from_tokens(tokens, n))
            .collect()
    };

    for table in &tables {
        tracing::debug!(
            order = table.order(),
            distinct = table.len(),
            total = table.total(),
            "counted grams"
        );
    }
    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gram::build_grams;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_owned).collect()
    }

    fn gram(s: &str) -> Vec<String> {
        toks(s)
    }

    #[test]
    fn counts_bigram_example() {
        let table = FrequencyTable::from_tokens(&toks("a b a b c"), 2);
        assert_eq!(table.len(), 3);
        assert_eq!(table.count(&gram("a b")), 2);
        assert_eq!(table.count(&gram("b a")), 1);
        assert_eq!(table.count(&gram("b c")), 1);
        assert_eq!(table.count(&gram("c a")), 0);
        assert_eq!(table.order(), 2);
    }

    #[test]
    fn from_grams_matches_from_tokens() {
        let t = toks("azul a yemma azul a baba azul");
        for n in 1..=5 {
            let a = FrequencyTable::from_grams(n, build_grams(&t, n)).unwrap();
            let b = FrequencyTable::from_tokens(&t, n);
            assert_eq!(a, b, "order {}", n);
        }
    }

    #[test]
    fn from_grams_rejects_mixed_orders() {
        let mut grams = build_grams(&toks("a b c"), 2);
        grams.push(Gram::from_slice(&toks("a b c")));
        let err = FrequencyTable::from_grams(2, grams).unwrap_err();
        assert_eq!(
            err,
            TableError::GramOrder {
                gram: "a b c".to_string(),
                expected: 2,
                found: 3,
            }
        );
    }

    #[test]
    fn totals_equal_window_counts() {
        let t = toks("the cat sat on the mat the cat ran");
        for n in 1..=5 {
            let table = FrequencyTable::from_tokens(&t, n);
            assert_eq!(table.total() as usize, build_grams(&t, n).len());
        }
    }

    #[test]
    fn empty_tokens_give_empty_tables() {
        let tables = count_orders(&[], 5, false);
        assert_eq!(tables.len(), 5);
        assert!(tables.iter().all(|t| t.is_empty() && t.total() == 0));
        assert_eq!(tables[4].order(), 5);
    }

    #[test]
    fn parallel_counting_matches_sequential() {
        let t = toks("a b c a b d a b c a b c d d a");
        let seq = count_orders(&t, 5, false);
        let par = count_orders(&t, 5, true);
        assert_eq!(seq, par);
    }

    #[test]
    fn respects_max_order() {
        let t = toks("a b c");
        let tables = count_orders(&t, 2, false);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].order(), 1);
        assert_eq!(tables[1].order(), 2);
    }
}
