//! Aggregation of the variant evaluations of one gene.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use super::{
    evaluation::VariantEvaluation,
    filter::FilterKind,
    inheritance::ModeOfInheritance,
    priority::{PriorityScore, PriorityType},
};

/// A gene hit by at least one observed variant.
///
/// Identity is `(symbol, id)` only: two `Gene` values with the same identity
/// compare equal even if their variant lists differ.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Gene {
    symbol: String,
    id: u32,
    variants: Vec<VariantEvaluation>,
    failed_filters: BTreeSet<FilterKind>,
    inheritance_modes: BTreeSet<ModeOfInheritance>,
    priority_scores: IndexMap<PriorityType, PriorityScore>,
}

impl Gene {
    /// Construct from the first variant; symbol and id are taken from it.
    pub fn new(variant: VariantEvaluation) -> Self {
        Self {
            symbol: variant.gene_symbol().to_string(),
            id: variant.gene_id(),
            variants: vec![variant],
            failed_filters: BTreeSet::new(),
            inheritance_modes: BTreeSet::new(),
            priority_scores: IndexMap::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Append a variant.  The caller is responsible for it belonging to this gene.
    pub fn add_variant(&mut self, variant: VariantEvaluation) {
        self.variants.push(variant);
    }

    pub fn number_of_variants(&self) -> usize {
        self.variants.len()
    }

    /// The `n`-th variant in current order, `None` if out of range.
    pub fn nth_variant(&self, n: usize) -> Option<&VariantEvaluation> {
        self.variants.get(n)
    }

    pub fn variant_evaluations(&self) -> &[VariantEvaluation] {
        &self.variants
    }

    pub fn variant_evaluations_mut(&mut self) -> &mut [VariantEvaluation] {
        &mut self.variants
    }

    /// Sort the owned variants in place by their natural order and iterate them.
    pub fn variant_evaluations_sorted(&mut self) -> std::slice::Iter<'_, VariantEvaluation> {
        self.variants.sort();
        self.variants.iter()
    }

    /// The variants that passed all their filters, in insertion order.
    pub fn passed_variant_evaluations(&self) -> Vec<&VariantEvaluation> {
        self.variants
            .iter()
            .filter(|variant| variant.passed_filters())
            .collect()
    }

    /// Whether at least one variant passed all its filters.
    pub fn passed_filters(&self) -> bool {
        self.variants.iter().any(VariantEvaluation::passed_filters)
    }

    /// Whether the gene passed the filter of `kind`.
    ///
    /// A gene-level failure vetoes regardless of the variants; otherwise one
    /// passing variant suffices.
    pub fn passed_filter(&self, kind: FilterKind) -> bool {
        if self.failed_filters.contains(&kind) {
            return false;
        }
        self.variants
            .iter()
            .any(|variant| variant.passed_filter(kind))
    }

    /// Mark the gene as a whole as having failed the filter of `kind`.
    pub fn add_failed_filter(&mut self, kind: FilterKind) {
        self.failed_filters.insert(kind);
    }

    pub fn failed_filter_kinds(&self) -> &BTreeSet<FilterKind> {
        &self.failed_filters
    }

    pub fn inheritance_modes(&self) -> &BTreeSet<ModeOfInheritance> {
        &self.inheritance_modes
    }

    pub fn set_inheritance_modes(&mut self, modes: BTreeSet<ModeOfInheritance>) {
        self.inheritance_modes = modes;
    }

    pub fn is_consistent_with(&self, mode: ModeOfInheritance) -> bool {
        self.inheritance_modes.contains(&mode)
    }

    pub fn is_consistent_with_recessive(&self) -> bool {
        self.is_consistent_with(ModeOfInheritance::AutosomalRecessive)
    }

    pub fn is_consistent_with_dominant(&self) -> bool {
        self.is_consistent_with(ModeOfInheritance::AutosomalDominant)
    }

    pub fn is_consistent_with_x(&self) -> bool {
        self.is_consistent_with(ModeOfInheritance::XRecessive)
    }

    /// Judged by the first variant only.
    pub fn is_x_chromosomal(&self) -> bool {
        self.variants
            .first()
            .map(|variant| variant.variant().is_x_chromosomal())
            .unwrap_or(false)
    }

    /// Judged by the first variant only.
    pub fn is_y_chromosomal(&self) -> bool {
        self.variants
            .first()
            .map(|variant| variant.variant().is_y_chromosomal())
            .unwrap_or(false)
    }

    /// Store `score`, replacing an earlier one of the same type.
    pub fn add_priority_score(&mut self, score: PriorityScore) {
        self.priority_scores.insert(score.priority_type(), score);
    }

    /// Score of the given algorithm, `0.0` if it did not score this gene.
    pub fn priority_score(&self, priority_type: PriorityType) -> f32 {
        self.priority_scores
            .get(&priority_type)
            .map(PriorityScore::score)
            .unwrap_or(0.0)
    }

    /// Mutable access for rescoring in place.
    pub fn priority_score_mut(&mut self, priority_type: PriorityType) -> Option<&mut PriorityScore> {
        self.priority_scores.get_mut(&priority_type)
    }

    pub fn priority_scores(&self) -> impl Iterator<Item = &PriorityScore> {
        self.priority_scores.values()
    }
}

impl PartialEq for Gene {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol && self.id == other.id
    }
}

impl Eq for Gene {}

impl std::hash::Hash for Gene {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
        self.id.hash(state);
    }
}

impl std::fmt::Display for Gene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) modes={:?} failed={:?} variants={}",
            self.symbol,
            self.id,
            self.inheritance_modes,
            self.failed_filters,
            self.variants.len()
        )
    }
}
