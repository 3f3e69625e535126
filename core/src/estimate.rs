//! Probability estimation from frequency tables.
//!
//! Two policies are kept side by side because downstream consumers read the
//! numbers differently:
//!
//! - [`LaplaceLogProb`]: add-one smoothed conditional probability, stored as
//!   a negative natural log (lower is more likely, always `>= 0`). Defined for
//!   orders `>= 2` only; unigrams get counts but no score.
//! - [`MaximumLikelihood`]: plain relative frequency in `[0, 1]`. A gram
//!   whose prefix was never counted gets an explicit `0.0`. This is a known
//!   limitation of unsmoothed estimates, not something to patch here.
//!
//! Callers pick one through [`EstimatorPolicy`] and go through [`estimate`],
//! so counting code never depends on which policy is active.
use crate::error::TableError;
use crate::frequency::FrequencyTable;
use crate::gram::Gram;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimatorPolicy {
    /// `-ln((c(g) + 1) / (c(prefix) + V))`
    #[default]
    Laplace,
    /// `c(g) / c(prefix)`, or `c(g) / N` for unigrams.
    Mle,
}

impl EstimatorPolicy {
    pub fn estimator(self) -> &'static dyn Estimator {
        match self {
            EstimatorPolicy::Laplace => &LaplaceLogProb,
            EstimatorPolicy::Mle => &MaximumLikelihood,
        }
    }

    /// Whether this policy produces scores for `order`.
    pub fn defines_order(self, order: usize) -> bool {
        self.estimator().defines_order(order)
    }
}

impl std::str::FromStr for EstimatorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "laplace" => Ok(Self::Laplace),
            "mle" => Ok(Self::Mle),
            other => Err(format!("unknown estimator '{other}' (expected laplace|mle)")),
        }
    }
}

/// Per-gram scores of one order, produced by one policy.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityTable {
    order: usize,
    policy: EstimatorPolicy,
    scores: AHashMap<Gram, f64>,
}

impl ProbabilityTable {
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn policy(&self) -> EstimatorPolicy {
        self.policy
    }

    pub fn get(&self, gram: &[String]) -> Option<f64> {
        self.scores.get(gram).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Gram, f64)> + '_ {
        self.scores.iter().map(|(g, &s)| (g, s))
    }
}

/// Table-level quantities shared by every gram of one estimation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimateContext {
    pub order: usize,
    /// Sum of counts in the table being scored.
    pub total: u64,
    /// Distinct grams in the conditioning (order n-1) table.
    pub lower_distinct: u64,
}

pub trait Estimator: Send + Sync {
    fn policy(&self) -> EstimatorPolicy;

    fn defines_order(&self, order: usize) -> bool;

    /// Score of one gram from its count and the count of its prefix in the
    /// conditioning table (0 for unigrams or unseen prefixes).
    fn score(&self, count: u64, prefix_count: u64, ctx: &EstimateContext) -> f64;

    /// Score every gram of `table`, conditioning on `lower` (the order `n-1`
    /// table). A missing `lower` behaves like an empty table. Returns
    /// `Ok(None)` when the policy defines no score for this order.
    ///
    /// `lower` must be exactly one order below `table`; any other pairing is
    /// [`TableError::OrderMismatch`].
    fn estimate(
        &self,
        table: &FrequencyTable,
        lower: Option<&FrequencyTable>,
    ) -> Result<Option<ProbabilityTable>, TableError> {
        if let Some(lower) = lower {
            if lower.order() + 1 != table.order() {
                return Err(TableError::OrderMismatch {
                    table: table.order(),
                    lower: lower.order(),
                });
            }
        }
        if !self.defines_order(table.order()) {
            return Ok(None);
        }

        let empty = FrequencyTable::new(table.order().saturating_sub(1));
        let lower = lower.unwrap_or(&empty);

        let ctx = EstimateContext {
            order: table.order(),
            total: table.total(),
            lower_distinct: lower.len() as u64,
        };

        let mut scores = AHashMap::with_capacity(table.len());
        for (gram, count) in table.iter() {
            let prefix_count = if gram.order() > 1 {
                lower.count(gram.prefix())
            } else {
                0
            };
            scores.insert(gram.clone(), self.score(count, prefix_count, &ctx));
        }

        Ok(Some(ProbabilityTable {
            order: table.order(),
            policy: self.policy(),
            scores,
        }))
    }
}

/// Add-one smoothed negative log-probability.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaplaceLogProb;

impl Estimator for LaplaceLogProb {
    fn policy(&self) -> EstimatorPolicy {
        EstimatorPolicy::Laplace
    }

    fn defines_order(&self, order: usize) -> bool {
        order >= 2
    }

    fn score(&self, count: u64, prefix_count: u64, ctx: &EstimateContext) -> f64 {
        // V is the number of distinct grams at the conditioning order.
        let denominator = prefix_count + ctx.lower_distinct;
        let prob = if denominator == 0 {
            1.0
        } else {
            (count + 1) as f64 / denominator as f64
        };
        // + 0.0 turns -ln(1.0) == -0.0 into 0.0
        -prob.ln() + 0.0
    }
}

/// Unsmoothed relative frequency.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaximumLikelihood;

impl Estimator for MaximumLikelihood {
    fn policy(&self) -> EstimatorPolicy {
        EstimatorPolicy::Mle
    }

    fn defines_order(&self, order: usize) -> bool {
        order >= 1
    }

    fn score(&self, count: u64, prefix_count: u64, ctx: &EstimateContext) -> f64 {
        let denominator = if ctx.order == 1 {
            ctx.total
        } else {
            prefix_count
        };
        if denominator == 0 {
            0.0
        } else {
            count as f64 / denominator as f64
        }
    }
}

/// Score `table` (order n) against `lower` (order n-1) with `policy`.
pub fn estimate(
    table: &FrequencyTable,
    lower: Option<&FrequencyTable>,
    policy: EstimatorPolicy,
) -> Result<Option<ProbabilityTable>, TableError> {
    policy.estimator().estimate(table, lower)
}
