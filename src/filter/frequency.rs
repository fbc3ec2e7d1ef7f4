use super::VariantFilter;
use crate::model::{FilterKind, FilterResult, VariantEvaluation};

/// Remove variants that are too common in the population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyFilter {
    /// Maximal allowed frequency, in percent.
    max_freq: f32,
}

impl FrequencyFilter {
    pub fn new(max_freq: f32) -> Self {
        Self { max_freq }
    }
}

impl VariantFilter for FrequencyFilter {
    fn kind(&self) -> FilterKind {
        FilterKind::Frequency
    }

    fn run(&self, evaluation: &VariantEvaluation) -> FilterResult {
        let frequency = evaluation.frequency();
        let score = frequency.score();
        match frequency.max_freq() {
            Some(freq) if freq > self.max_freq => {
                tracing::trace!(
                    "variant {} fails frequency filter ({}% > {}%)",
                    evaluation.variant(),
                    freq,
                    self.max_freq
                );
                FilterResult::fail(FilterKind::Frequency, score)
            }
            _ => FilterResult::pass(FilterKind::Frequency, score),
        }
    }
}
