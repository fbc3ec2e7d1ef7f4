//! Variant and gene filters and their application.

pub mod frequency;
pub mod gene_id;
pub mod inheritance;
pub mod interval;
pub mod pathogenicity;
pub mod quality;
pub mod target;

use enum_map::EnumMap;
use rayon::prelude::*;

use crate::model::{FilterKind, FilterResult, Gene, VariantEvaluation};

pub use self::{
    frequency::FrequencyFilter, gene_id::GeneIdFilter, inheritance::InheritanceFilter,
    interval::IntervalFilter, pathogenicity::PathogenicityFilter, quality::QualityFilter,
    target::TargetFilter,
};

/// A filter judging single variants.
pub trait VariantFilter: Send + Sync {
    fn kind(&self) -> FilterKind;

    /// Compute the result for `evaluation`; recording it is up to the caller.
    fn run(&self, evaluation: &VariantEvaluation) -> FilterResult;
}

/// A filter judging whole genes, run after variants were grouped.
pub trait GeneFilter: Send + Sync {
    fn kind(&self) -> FilterKind;

    /// Judge `gene` and record the outcome on it and its variants.
    fn run(&self, gene: &mut Gene);
}

/// How filters are applied.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    clap::ValueEnum,
    strum::Display,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FilterRunMode {
    /// Every filter runs on every variant and gene.
    #[default]
    Full,
    /// Filters are skipped for variants and genes that already failed.
    PassOnly,
}

/// Number of passed and failed results of one filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterCounts {
    pub passed: usize,
    pub failed: usize,
}

/// Per-filter result counts over a set of variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub counts: EnumMap<FilterKind, FilterCounts>,
}

impl FilterStats {
    pub fn from_evaluations<'a, I>(evaluations: I) -> Self
    where
        I: IntoIterator<Item = &'a VariantEvaluation>,
    {
        let mut result = Self::default();
        for evaluation in evaluations {
            for filter_result in evaluation.filter_results() {
                let counts = &mut result.counts[filter_result.kind()];
                if filter_result.passed() {
                    counts.passed += 1;
                } else {
                    counts.failed += 1;
                }
            }
        }
        result
    }

    /// Log the counts of all filters that were run.
    pub fn log(&self) {
        for (kind, counts) in &self.counts {
            if counts.passed + counts.failed > 0 {
                tracing::info!(
                    "  {} filter: {} passed, {} failed",
                    kind,
                    thousands::Separable::separate_with_commas(&counts.passed),
                    thousands::Separable::separate_with_commas(&counts.failed),
                );
            }
        }
    }
}

/// Applies the configured filters in order of registration.
#[derive(Default)]
pub struct FilterRunner {
    mode: FilterRunMode,
    variant_filters: Vec<Box<dyn VariantFilter>>,
    gene_filters: Vec<Box<dyn GeneFilter>>,
}

impl FilterRunner {
    pub fn new(mode: FilterRunMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn with_variant_filter<F: VariantFilter + 'static>(mut self, filter: F) -> Self {
        self.variant_filters.push(Box::new(filter));
        self
    }

    pub fn with_gene_filter<F: GeneFilter + 'static>(mut self, filter: F) -> Self {
        self.gene_filters.push(Box::new(filter));
        self
    }

    pub fn mode(&self) -> FilterRunMode {
        self.mode
    }

    pub fn variant_filter_kinds(&self) -> Vec<FilterKind> {
        self.variant_filters.iter().map(|f| f.kind()).collect()
    }

    pub fn gene_filter_kinds(&self) -> Vec<FilterKind> {
        self.gene_filters.iter().map(|f| f.kind()).collect()
    }

    /// Apply the variant filters to one evaluation.
    pub fn run_variant(&self, evaluation: &mut VariantEvaluation) {
        for filter in &self.variant_filters {
            if self.mode == FilterRunMode::PassOnly && !evaluation.passed_filters() {
                break;
            }
            let result = filter.run(evaluation);
            evaluation.add_filter_result(result);
        }
    }

    /// Apply the variant filters to all evaluations in parallel.
    pub fn run_variants(&self, evaluations: &mut [VariantEvaluation]) {
        evaluations
            .par_iter_mut()
            .for_each(|evaluation| self.run_variant(evaluation));
    }

    /// Apply the gene filters to one gene.
    pub fn run_gene(&self, gene: &mut Gene) {
        for filter in &self.gene_filters {
            if self.mode == FilterRunMode::PassOnly && !gene.passed_filters() {
                break;
            }
            filter.run(gene);
        }
    }

    /// Apply the gene filters to all genes in parallel.
    pub fn run_genes(&self, genes: &mut [Gene]) {
        genes.par_iter_mut().for_each(|gene| self.run_gene(gene));
    }
}
