//! Derive the modes of inheritance a gene's variants are consistent with.

use std::collections::BTreeSet;

use rayon::prelude::*;

use crate::{
    common::{Chrom, Genotype},
    model::{Gene, ModeOfInheritance, VariantEvaluation},
};

/// Genotype counts of passing variants, by chromosome class.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct GenotypeCounts {
    auto_het: usize,
    auto_hom_alt: usize,
    x_het: usize,
    x_hom_alt: usize,
    mt_non_ref: usize,
}

impl GenotypeCounts {
    fn from_evaluations<'a, I>(evaluations: I) -> Self
    where
        I: IntoIterator<Item = &'a VariantEvaluation>,
    {
        let mut result = Self::default();
        for evaluation in evaluations {
            let variant = evaluation.variant();
            match (variant.chrom_class(), variant.genotype) {
                (Chrom::Auto, Genotype::Het) => result.auto_het += 1,
                (Chrom::Auto, Genotype::HomAlt) => result.auto_hom_alt += 1,
                (Chrom::X, Genotype::Het) => result.x_het += 1,
                (Chrom::X, Genotype::HomAlt) => result.x_hom_alt += 1,
                (Chrom::Mt, Genotype::Het | Genotype::HomAlt) => result.mt_non_ref += 1,
                _ => (),
            }
        }
        result
    }

    fn modes(&self) -> BTreeSet<ModeOfInheritance> {
        let mut result = BTreeSet::new();
        if self.auto_het > 0 {
            result.insert(ModeOfInheritance::AutosomalDominant);
        }
        if self.auto_hom_alt > 0 || self.auto_het >= 2 {
            result.insert(ModeOfInheritance::AutosomalRecessive);
        }
        if self.x_hom_alt > 0 || self.x_het >= 2 {
            result.insert(ModeOfInheritance::XRecessive);
        }
        if self.x_het > 0 {
            result.insert(ModeOfInheritance::XDominant);
        }
        if self.mt_non_ref > 0 {
            result.insert(ModeOfInheritance::Mitochondrial);
        }
        result
    }
}

/// Modes of inheritance `gene` is consistent with, from its passing variants.
pub fn compatible_modes(gene: &Gene) -> BTreeSet<ModeOfInheritance> {
    GenotypeCounts::from_evaluations(gene.passed_variant_evaluations()).modes()
}

/// Compute and attach the compatible modes for all `genes`.
pub fn analyze(genes: &mut [Gene]) {
    genes.par_iter_mut().for_each(|gene| {
        let modes = compatible_modes(gene);
        tracing::trace!("gene {} is compatible with {:?}", gene, &modes);
        gene.set_inheritance_modes(modes);
    });
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::model::{FilterKind, FilterResult, ModeOfInheritance::*, Variant};

    fn evaluation(chrom: &str, genotype: Genotype) -> VariantEvaluation {
        VariantEvaluation::new(Variant {
            chrom: chrom.into(),
            pos: 100,
            gene_symbol: "GENE1".into(),
            gene_id: 1,
            genotype,
            ..Default::default()
        })
    }

    fn gene(evaluations: Vec<VariantEvaluation>) -> Gene {
        let mut evaluations = evaluations.into_iter();
        let mut gene = Gene::new(evaluations.next().expect("at least one variant"));
        for evaluation in evaluations {
            gene.add_variant(evaluation);
        }
        gene
    }

    #[rstest]
    #[case(&[("1", Genotype::Het)], &[AutosomalDominant])]
    #[case(&[("1", Genotype::Het), ("1", Genotype::Het)], &[AutosomalDominant, AutosomalRecessive])]
    #[case(&[("1", Genotype::HomAlt)], &[AutosomalRecessive])]
    #[case(&[("1", Genotype::HomRef)], &[])]
    #[case(&[("1", Genotype::WithNoCall)], &[])]
    #[case(&[("X", Genotype::Het)], &[XDominant])]
    #[case(&[("chrX", Genotype::Het), ("X", Genotype::Het)], &[XDominant, XRecessive])]
    #[case(&[("X", Genotype::HomAlt)], &[XRecessive])]
    #[case(&[("MT", Genotype::HomAlt)], &[Mitochondrial])]
    #[case(&[("chrM", Genotype::Het)], &[Mitochondrial])]
    #[case(&[("Y", Genotype::HomAlt)], &[])]
    fn compatible(
        #[case] calls: &[(&str, Genotype)],
        #[case] expected: &[ModeOfInheritance],
    ) {
        let gene = gene(
            calls
                .iter()
                .map(|(chrom, genotype)| evaluation(chrom, *genotype))
                .collect(),
        );

        assert_eq!(
            compatible_modes(&gene),
            expected.iter().copied().collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn failed_variants_are_ignored() {
        let mut failed = evaluation("1", Genotype::Het);
        failed.add_filter_result(FilterResult::fail(FilterKind::Frequency, 0.0));
        let mut genes = vec![gene(vec![evaluation("1", Genotype::Het), failed])];

        analyze(&mut genes);

        assert!(genes[0].is_consistent_with(AutosomalDominant));
        assert!(!genes[0].is_consistent_with(AutosomalRecessive));
    }
}
