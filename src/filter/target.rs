use super::VariantFilter;
use crate::model::{FilterKind, FilterResult, VariantEvaluation};

/// Remove variants outside of the targeted coding and splice regions.
///
/// The filter does not contribute to the score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetFilter;

impl VariantFilter for TargetFilter {
    fn kind(&self) -> FilterKind {
        FilterKind::Target
    }

    fn run(&self, evaluation: &VariantEvaluation) -> FilterResult {
        if evaluation.variant().effect.is_off_target() {
            tracing::trace!(
                "variant {} fails target filter ({})",
                evaluation.variant(),
                evaluation.variant().effect
            );
            FilterResult::fail(FilterKind::Target, 1.0)
        } else {
            FilterResult::pass(FilterKind::Target, 1.0)
        }
    }
}
