//! REMM scores for regulatory variants.

use std::sync::Arc;

use super::{
    tabix::{max_score_in_range, TabixQuery},
    PathogenicityDataSource,
};
use crate::model::{PathogenicityScore, PathogenicitySource, Variant, VariantEffect};

/// 0-based column holding the REMM score.
const SCORE_COLUMN: usize = 2;

pub struct RemmDataSource {
    tabix: Arc<dyn TabixQuery>,
}

impl RemmDataSource {
    pub fn new(tabix: Arc<dyn TabixQuery>) -> Self {
        Self { tabix }
    }
}

impl PathogenicityDataSource for RemmDataSource {
    fn source(&self) -> PathogenicitySource {
        PathogenicitySource::Remm
    }

    fn lookup(&self, variant: &Variant) -> Option<PathogenicityScore> {
        if variant.effect == VariantEffect::MissenseVariant {
            return None;
        }

        match max_score_in_range(
            self.tabix.as_ref(),
            &variant.chrom,
            variant.pos,
            variant.end(),
            SCORE_COLUMN,
        ) {
            Ok(score) => score.map(|score| PathogenicityScore::new(PathogenicitySource::Remm, score)),
            Err(e) => {
                tracing::error!(
                    "unable to read REMM score for {} from {}: {}",
                    variant,
                    self.tabix.source_name(),
                    e
                );
                None
            }
        }
    }
}
