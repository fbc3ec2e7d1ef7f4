//! DANN scores from two tabix files, one for SNVs and one for indels.

use std::sync::Arc;

use super::{
    tabix::{exact_allele_score, TabixQuery},
    PathogenicityDataSource,
};
use crate::model::{PathogenicityScore, PathogenicitySource, Variant};

/// 0-based column holding the DANN score.
const SCORE_COLUMN: usize = 4;

pub struct DannDataSource {
    snv: Arc<dyn TabixQuery>,
    indel: Arc<dyn TabixQuery>,
}

impl DannDataSource {
    pub fn new(snv: Arc<dyn TabixQuery>, indel: Arc<dyn TabixQuery>) -> Self {
        Self { snv, indel }
    }
}

impl PathogenicityDataSource for DannDataSource {
    fn source(&self) -> PathogenicitySource {
        PathogenicitySource::Dann
    }

    fn lookup(&self, variant: &Variant) -> Option<PathogenicityScore> {
        tracing::trace!("getting DANN data for {}", variant);
        let tabix = if variant.is_snv() {
            &self.snv
        } else {
            &self.indel
        };
        match exact_allele_score(tabix.as_ref(), variant, SCORE_COLUMN) {
            Ok(score) => score.map(|score| PathogenicityScore::new(PathogenicitySource::Dann, score)),
            Err(e) => {
                tracing::error!(
                    "unable to read DANN score for {} from {}: {}",
                    variant,
                    tabix.source_name(),
                    e
                );
                None
            }
        }
    }
}
