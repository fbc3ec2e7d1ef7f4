use super::GeneFilter;
use crate::model::{FilterKind, FilterResult, Gene, ModeOfInheritance};

/// Remove genes whose variants are not consistent with a mode of inheritance.
///
/// Requires the gene's inheritance modes to be computed before.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InheritanceFilter {
    mode: ModeOfInheritance,
}

impl InheritanceFilter {
    pub fn new(mode: ModeOfInheritance) -> Self {
        Self { mode }
    }
}

impl GeneFilter for InheritanceFilter {
    fn kind(&self) -> FilterKind {
        FilterKind::Inheritance
    }

    fn run(&self, gene: &mut Gene) {
        let passes = self.mode == ModeOfInheritance::Unspecified || gene.is_consistent_with(self.mode);
        let result = if passes {
            FilterResult::pass(FilterKind::Inheritance, 1.0)
        } else {
            tracing::trace!(
                "gene {} fails inheritance filter ({} not in {:?})",
                gene,
                self.mode,
                gene.inheritance_modes()
            );
            gene.add_failed_filter(FilterKind::Inheritance);
            FilterResult::fail(FilterKind::Inheritance, 1.0)
        };
        for evaluation in gene.variant_evaluations_mut() {
            evaluation.add_filter_result(result);
        }
    }
}
