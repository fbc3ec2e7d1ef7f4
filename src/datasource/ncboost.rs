//! NCBoost scores for non-coding variants.

use std::sync::Arc;

use super::{
    tabix::{max_score_in_range, TabixQuery},
    PathogenicityDataSource,
};
use crate::model::{PathogenicityScore, PathogenicitySource, Variant, VariantEffect};

/// 0-based column holding the NCBoost score.
const SCORE_COLUMN: usize = 5;

/// Position based lookup, the alleles of the records are not compared.
pub struct NcBoostDataSource {
    tabix: Arc<dyn TabixQuery>,
}

impl NcBoostDataSource {
    pub fn new(tabix: Arc<dyn TabixQuery>) -> Self {
        Self { tabix }
    }

    /// Reference interval `[start, end]` covered by `variant`.
    ///
    /// Insertions cover the two bases flanking the insertion point.
    fn query_range(variant: &Variant) -> (u32, u32) {
        let start = variant.pos;
        let end = if variant.is_deletion() {
            variant.pos + variant.reference.len() as u32 - 1
        } else if variant.is_insertion() {
            variant.pos + 1
        } else {
            variant.pos
        };
        (start, end)
    }
}

impl PathogenicityDataSource for NcBoostDataSource {
    fn source(&self) -> PathogenicitySource {
        PathogenicitySource::NcBoost
    }

    fn lookup(&self, variant: &Variant) -> Option<PathogenicityScore> {
        // not trained on missense variants
        if variant.effect == VariantEffect::MissenseVariant {
            return None;
        }

        let (start, end) = Self::query_range(variant);
        match max_score_in_range(self.tabix.as_ref(), &variant.chrom, start, end, SCORE_COLUMN) {
            Ok(score) => {
                score.map(|score| PathogenicityScore::new(PathogenicitySource::NcBoost, score))
            }
            Err(e) => {
                tracing::error!(
                    "unable to read NCBoost score for {} from {}: {}",
                    variant,
                    self.tabix.source_name(),
                    e
                );
                None
            }
        }
    }
}
