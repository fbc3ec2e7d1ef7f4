//! CADD scores, stored as PHRED-scaled values.

use std::sync::Arc;

use super::{
    tabix::{exact_allele_score, TabixQuery},
    PathogenicityDataSource,
};
use crate::model::{PathogenicityScore, PathogenicitySource, Variant};

/// 0-based column holding the PHRED-scaled score.
const PHRED_COLUMN: usize = 5;

/// Map a PHRED-scaled score into `[0, 1)`.
pub fn phred_to_score(phred: f32) -> f32 {
    1.0 - 10f32.powf(-phred / 10.0)
}

pub struct CaddDataSource {
    snv: Arc<dyn TabixQuery>,
    indel: Arc<dyn TabixQuery>,
}

impl CaddDataSource {
    pub fn new(snv: Arc<dyn TabixQuery>, indel: Arc<dyn TabixQuery>) -> Self {
        Self { snv, indel }
    }
}

impl PathogenicityDataSource for CaddDataSource {
    fn source(&self) -> PathogenicitySource {
        PathogenicitySource::Cadd
    }

    fn lookup(&self, variant: &Variant) -> Option<PathogenicityScore> {
        let tabix = if variant.is_snv() {
            &self.snv
        } else {
            &self.indel
        };
        match exact_allele_score(tabix.as_ref(), variant, PHRED_COLUMN) {
            Ok(phred) => phred.map(|phred| {
                PathogenicityScore::new(PathogenicitySource::Cadd, phred_to_score(phred))
            }),
            Err(e) => {
                tracing::error!(
                    "unable to read CADD score for {} from {}: {}",
                    variant,
                    tabix.source_name(),
                    e
                );
                None
            }
        }
    }
}
