use super::VariantFilter;
use crate::model::{FilterKind, FilterResult, VariantEvaluation};

/// Require a minimal variant call quality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityFilter {
    min_quality: f32,
}

impl QualityFilter {
    pub fn new(min_quality: f32) -> Self {
        Self { min_quality }
    }
}

impl VariantFilter for QualityFilter {
    fn kind(&self) -> FilterKind {
        FilterKind::Quality
    }

    fn run(&self, evaluation: &VariantEvaluation) -> FilterResult {
        let quality = evaluation.variant().quality;
        if quality >= self.min_quality {
            FilterResult::pass(FilterKind::Quality, 1.0)
        } else {
            tracing::trace!(
                "variant {} fails quality filter (QUAL={} < {})",
                evaluation.variant(),
                quality,
                self.min_quality
            );
            FilterResult::fail(FilterKind::Quality, 0.0)
        }
    }
}
