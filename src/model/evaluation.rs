//! Accumulation of filter results for one variant.

use std::{cmp::Ordering, collections::BTreeSet};

use indexmap::IndexMap;

use super::{
    filter::{FilterKind, FilterResult},
    frequency::FrequencyData,
    pathogenicity::PathogenicityData,
    variant::Variant,
};

/// A variant together with the results of the filters run on it so far.
///
/// Filters are applied by one writer at a time; evaluations of distinct
/// variants share no state and can be processed in parallel.
#[derive(Debug, Clone, serde::Serialize)]
pub struct VariantEvaluation {
    variant: Variant,
    /// One result per filter kind, in order of first application.
    filter_results: IndexMap<FilterKind, FilterResult>,
    variant_score: f32,
    passed_filters: bool,
    pathogenicity: PathogenicityData,
    frequency: FrequencyData,
}

impl VariantEvaluation {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            filter_results: IndexMap::new(),
            variant_score: 1.0,
            passed_filters: true,
            pathogenicity: PathogenicityData::empty(),
            frequency: FrequencyData::default(),
        }
    }

    pub fn with_frequency(mut self, frequency: FrequencyData) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn gene_symbol(&self) -> &str {
        &self.variant.gene_symbol
    }

    pub fn gene_id(&self) -> u32 {
        self.variant.gene_id
    }

    pub fn pathogenicity(&self) -> &PathogenicityData {
        &self.pathogenicity
    }

    pub fn set_pathogenicity(&mut self, pathogenicity: PathogenicityData) {
        self.pathogenicity = pathogenicity;
    }

    pub fn frequency(&self) -> &FrequencyData {
        &self.frequency
    }

    /// Record `result`, replacing an earlier result of the same kind in place.
    ///
    /// The variant score and pass state are recomputed from all stored
    /// results, so overwriting never leaves a stale factor behind.
    pub fn add_filter_result(&mut self, result: FilterResult) {
        self.filter_results.insert(result.kind(), result);
        self.variant_score = self
            .filter_results
            .values()
            .map(FilterResult::score)
            .product();
        self.passed_filters = self.filter_results.values().all(FilterResult::passed);
    }

    pub fn filter_results(&self) -> impl Iterator<Item = &FilterResult> {
        self.filter_results.values()
    }

    pub fn filter_result(&self, kind: FilterKind) -> Option<&FilterResult> {
        self.filter_results.get(&kind)
    }

    /// Product of all filter scores, `1.0` without any results.
    pub fn variant_score(&self) -> f32 {
        self.variant_score
    }

    /// Whether no filter failed so far.
    pub fn passed_filters(&self) -> bool {
        self.passed_filters
    }

    /// Whether the variant passed the filter of `kind`.
    ///
    /// A filter that was never run does not exclude the variant.
    pub fn passed_filter(&self, kind: FilterKind) -> bool {
        self.filter_results
            .get(&kind)
            .map(FilterResult::passed)
            .unwrap_or(true)
    }

    pub fn failed_filter_kinds(&self) -> BTreeSet<FilterKind> {
        self.filter_results
            .values()
            .filter(|result| !result.passed())
            .map(FilterResult::kind)
            .collect()
    }

    fn coordinate(&self) -> (&str, u32, &str, &str) {
        (
            &self.variant.chrom,
            self.variant.pos,
            &self.variant.reference,
            &self.variant.alternative,
        )
    }
}

/// Natural order: best variant score first, then by coordinate.
impl Ord for VariantEvaluation {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .variant_score
            .total_cmp(&self.variant_score)
            .then_with(|| self.coordinate().cmp(&other.coordinate()))
    }
}

impl PartialOrd for VariantEvaluation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for VariantEvaluation {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VariantEvaluation {}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::model::filter::FilterVerdict;

    fn evaluation() -> VariantEvaluation {
        VariantEvaluation::new(Variant {
            chrom: "1".into(),
            pos: 1,
            reference: "A".into(),
            alternative: "T".into(),
            gene_symbol: ".".into(),
            ..Default::default()
        })
    }

    fn fail_frequency() -> FilterResult {
        FilterResult::fail(FilterKind::Frequency, 0.1)
    }

    fn pass_frequency() -> FilterResult {
        FilterResult::pass(FilterKind::Frequency, 0.1)
    }

    fn pass_quality() -> FilterResult {
        FilterResult::pass(FilterKind::Quality, 0.45)
    }

    #[test]
    fn no_results_pass_with_neutral_score() {
        let ve = evaluation();

        assert_eq!(ve.variant_score(), 1.0);
        assert!(ve.passed_filters());
        assert!(ve.failed_filter_kinds().is_empty());
        assert_eq!(ve.filter_results().count(), 0);
    }

    #[test]
    fn adding_result_updates_score() {
        let mut ve = evaluation();

        ve.add_filter_result(pass_quality());

        assert_eq!(ve.filter_results().count(), 1);
        assert_eq!(ve.variant_score(), pass_quality().score());
    }

    #[test]
    fn adding_two_passed_results_multiplies_scores() {
        let mut ve = evaluation();

        ve.add_filter_result(pass_quality());
        ve.add_filter_result(pass_frequency());

        assert_eq!(ve.filter_results().count(), 2);
        assert_eq!(ve.variant_score(), 1.0 * 0.45 * 0.1);
        assert!(ve.passed_filters());
    }

    #[test]
    fn adding_pass_and_fail_multiplies_scores_and_fails() {
        let mut ve = evaluation();

        ve.add_filter_result(pass_quality());
        ve.add_filter_result(fail_frequency());

        assert_eq!(ve.variant_score(), 0.45 * 0.1);
        assert!(!ve.passed_filters());
    }

    #[rstest]
    #[case(&[0.5, 0.25, 0.8])]
    #[case(&[0.8, 0.5, 0.25])]
    #[case(&[0.25, 0.8, 0.5])]
    fn score_is_order_independent(#[case] scores: &[f32]) {
        let kinds = [
            FilterKind::Quality,
            FilterKind::Frequency,
            FilterKind::Pathogenicity,
        ];
        let mut ve = evaluation();
        for (kind, score) in kinds.iter().zip(scores.iter()) {
            ve.add_filter_result(FilterResult::pass(*kind, *score));
        }

        assert!(float_cmp::approx_eq!(
            f32,
            ve.variant_score(),
            0.5 * 0.25 * 0.8,
            ulps = 2
        ));
    }

    #[test]
    fn failed_filter_kinds() {
        let mut ve = evaluation();

        ve.add_filter_result(fail_frequency());
        ve.add_filter_result(pass_quality());

        assert_eq!(
            ve.failed_filter_kinds(),
            [FilterKind::Frequency].into_iter().collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn passed_filter_defaults_to_true() {
        let ve = evaluation();

        assert!(ve.passed_filter(FilterKind::Pathogenicity));
    }

    #[test]
    fn passed_filter_reflects_verdicts() {
        let mut ve = evaluation();

        ve.add_filter_result(pass_quality());
        ve.add_filter_result(fail_frequency());

        assert!(ve.passed_filter(FilterKind::Quality));
        assert!(!ve.passed_filter(FilterKind::Frequency));
    }

    #[test]
    fn same_kind_overwrites_in_place() {
        let mut ve = evaluation();

        ve.add_filter_result(fail_frequency());
        ve.add_filter_result(pass_quality());
        ve.add_filter_result(FilterResult::pass(FilterKind::Frequency, 0.5));

        assert!(ve.passed_filter(FilterKind::Frequency));
        assert!(ve.passed_filters());
        assert_eq!(ve.variant_score(), 0.5 * 0.45);
        assert_eq!(
            ve.filter_results().map(|r| r.kind()).collect::<Vec<_>>(),
            vec![FilterKind::Frequency, FilterKind::Quality]
        );
        assert_eq!(
            ve.filter_result(FilterKind::Frequency).map(|r| r.verdict()),
            Some(FilterVerdict::Pass)
        );
    }

    #[test]
    fn long_failure_chains_are_not_clamped() {
        let mut ve = evaluation();
        let kinds = [
            FilterKind::Quality,
            FilterKind::Frequency,
            FilterKind::Pathogenicity,
            FilterKind::Target,
        ];
        for kind in kinds {
            ve.add_filter_result(FilterResult::fail(kind, 0.1));
        }

        assert!(float_cmp::approx_eq!(
            f32,
            ve.variant_score(),
            0.0001,
            epsilon = 1e-9
        ));
    }

    #[test]
    fn natural_order_is_by_descending_score() {
        let mut low = evaluation();
        low.add_filter_result(FilterResult::pass(FilterKind::Quality, 0.2));
        let high = evaluation();

        let mut evaluations = vec![low.clone(), high.clone()];
        evaluations.sort();

        assert_eq!(evaluations[0].variant_score(), 1.0);
        assert_eq!(evaluations[1].variant_score(), 0.2);
        assert!(high < low);
    }
}
