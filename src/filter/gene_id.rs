use std::collections::HashSet;

use super::VariantFilter;
use crate::model::{FilterKind, FilterResult, VariantEvaluation};

/// Only keep variants in an allowlist of genes.
///
/// An empty allowlist keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneIdFilter {
    gene_ids: HashSet<u32>,
}

impl GeneIdFilter {
    pub fn new(gene_ids: HashSet<u32>) -> Self {
        Self { gene_ids }
    }
}

impl VariantFilter for GeneIdFilter {
    fn kind(&self) -> FilterKind {
        FilterKind::GeneId
    }

    fn run(&self, evaluation: &VariantEvaluation) -> FilterResult {
        if self.gene_ids.is_empty() || self.gene_ids.contains(&evaluation.gene_id()) {
            FilterResult::pass(FilterKind::GeneId, 1.0)
        } else {
            tracing::trace!(
                "variant {} fails gene id filter ({} not allowed)",
                evaluation.variant(),
                evaluation.gene_id()
            );
            FilterResult::fail(FilterKind::GeneId, 1.0)
        }
    }
}

#[cfg(test)]
mod test {
    use rstest::rstest;

    use super::*;
    use crate::model::Variant;

    #[rstest]
    #[case(&[], 2263, true)]
    #[case(&[2263], 2263, true)]
    #[case(&[1, 2263], 2263, true)]
    #[case(&[1], 2263, false)]
    fn run(#[case] allowlist: &[u32], #[case] gene_id: u32, #[case] expected: bool) {
        let filter = GeneIdFilter::new(allowlist.iter().copied().collect());
        let ve = VariantEvaluation::new(Variant {
            gene_id,
            ..Default::default()
        });

        assert_eq!(filter.run(&ve).passed(), expected);
    }
}
