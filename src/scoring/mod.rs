//! Gene scores and ranking.
//!
//! Scoring never mutates the genes: it produces `ScoredGene` records that
//! borrow the gene they describe.

use std::cmp::Ordering;

use rayon::prelude::*;

use crate::{
    err::ArgError,
    model::{Gene, ModeOfInheritance},
};

/// How priority and filter score are combined into the gene's rank score.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// Arithmetic mean of priority and filter score.
    #[default]
    Mean,
    Product,
    /// `w * priority + (1 - w) * filter`.
    Weighted { priority_weight: f32 },
    FilterOnly,
    PriorityOnly,
}

impl ScoringPolicy {
    pub fn validate(&self) -> Result<(), ArgError> {
        match *self {
            ScoringPolicy::Weighted { priority_weight }
                if !(0.0..=1.0).contains(&priority_weight) =>
            {
                Err(ArgError::InvalidWeight(priority_weight))
            }
            _ => Ok(()),
        }
    }

    pub fn combine(&self, priority_score: f32, filter_score: f32) -> f32 {
        match *self {
            ScoringPolicy::Mean => (priority_score + filter_score) / 2.0,
            ScoringPolicy::Product => priority_score * filter_score,
            ScoringPolicy::Weighted { priority_weight } => {
                priority_weight * priority_score + (1.0 - priority_weight) * filter_score
            }
            ScoringPolicy::FilterOnly => filter_score,
            ScoringPolicy::PriorityOnly => priority_score,
        }
    }
}

/// A gene together with its scores.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScoredGene<'a> {
    pub gene: &'a Gene,
    pub priority_score: f32,
    pub filter_score: f32,
    pub combined_score: f32,
}

/// Natural order: best combined score first, then by symbol and id.
impl Ord for ScoredGene<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .combined_score
            .total_cmp(&self.combined_score)
            .then_with(|| self.gene.symbol().cmp(other.gene.symbol()))
            .then_with(|| self.gene.id().cmp(&other.gene.id()))
    }
}

impl PartialOrd for ScoredGene<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScoredGene<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredGene<'_> {}

/// Computes gene scores for one analysis configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, derive_new::new)]
pub struct GeneScorer {
    policy: ScoringPolicy,
    mode: ModeOfInheritance,
}

impl GeneScorer {
    /// Product of all priority scores, `1.0` without any.  NaN scores are skipped.
    pub fn priority_score(gene: &Gene) -> f32 {
        gene.priority_scores()
            .filter(|score| {
                if score.score().is_nan() {
                    tracing::warn!(
                        "ignoring NaN {} score of gene {}",
                        score.priority_type(),
                        gene.symbol()
                    );
                    false
                } else {
                    true
                }
            })
            .map(|score| score.score())
            .product()
    }

    /// Score of the best passing variants, `0.0` if none passed.
    ///
    /// Under autosomal recessive inheritance the two best variants of a
    /// consistent gene are averaged.
    pub fn filter_score(&self, gene: &Gene) -> f32 {
        let mut scores = gene
            .passed_variant_evaluations()
            .iter()
            .map(|evaluation| evaluation.variant_score())
            .collect::<Vec<_>>();
        scores.sort_by(|a, b| b.total_cmp(a));

        match scores.as_slice() {
            [] => 0.0,
            [best, second, ..]
                if self.mode == ModeOfInheritance::AutosomalRecessive
                    && gene.is_consistent_with_recessive() =>
            {
                (best + second) / 2.0
            }
            [best, ..] => *best,
        }
    }

    pub fn score<'a>(&self, gene: &'a Gene) -> ScoredGene<'a> {
        let priority_score = Self::priority_score(gene);
        let filter_score = self.filter_score(gene);
        ScoredGene {
            gene,
            priority_score,
            filter_score,
            combined_score: self.policy.combine(priority_score, filter_score),
        }
    }

    /// Score all genes in parallel and sort by natural order.
    pub fn rank<'a>(&self, genes: &'a [Gene]) -> Vec<ScoredGene<'a>> {
        let mut result = genes
            .par_iter()
            .map(|gene| self.score(gene))
            .collect::<Vec<_>>();
        result.par_sort();
        result
    }
}
