use super::VariantFilter;
use crate::model::{FilterKind, FilterResult, VariantEffect, VariantEvaluation};

/// Variants scoring below this are considered non-pathogenic.
pub const PATHOGENICITY_CUTOFF: f32 = 0.5;

/// Score predicted pathogenicity.
///
/// Missense variants are scored with the most pathogenic of their
/// predictions.  All other variants get the larger of the fixed score for
/// their effect and their most pathogenic prediction, so that non-coding
/// and indel scores (REMM, NCBoost, CADD, DANN) take effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathogenicityFilter {
    /// Pass variants below the cutoff; they keep their low score.
    keep_non_pathogenic: bool,
}

impl PathogenicityFilter {
    pub fn new(keep_non_pathogenic: bool) -> Self {
        Self {
            keep_non_pathogenic,
        }
    }

    /// Pathogenicity score of the variant in `evaluation`.
    pub fn score(evaluation: &VariantEvaluation) -> f32 {
        let effect = evaluation.variant().effect;
        let predicted = evaluation
            .pathogenicity()
            .most_pathogenic_score()
            .map(|score| score.oriented_score());
        match predicted {
            Some(predicted) if effect == VariantEffect::MissenseVariant => predicted,
            Some(predicted) => predicted.max(effect.default_pathogenicity()),
            None => effect.default_pathogenicity(),
        }
    }
}

impl VariantFilter for PathogenicityFilter {
    fn kind(&self) -> FilterKind {
        FilterKind::Pathogenicity
    }

    fn run(&self, evaluation: &VariantEvaluation) -> FilterResult {
        let score = Self::score(evaluation);
        if self.keep_non_pathogenic || score >= PATHOGENICITY_CUTOFF {
            FilterResult::pass(FilterKind::Pathogenicity, score)
        } else {
            tracing::trace!(
                "variant {} fails pathogenicity filter (score={})",
                evaluation.variant(),
                score
            );
            FilterResult::fail(FilterKind::Pathogenicity, score)
        }
    }
}
