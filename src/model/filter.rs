//! Verdicts of single filters on single variants.

/// The kinds of filters that can be applied.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    enum_map::Enum,
    strum::Display,
    strum::EnumIter,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FilterKind {
    Quality,
    Frequency,
    Pathogenicity,
    Inheritance,
    Target,
    Interval,
    GeneId,
}

/// Outcome of one filter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, serde::Serialize, serde::Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
pub enum FilterVerdict {
    Pass,
    Fail,
}

/// Verdict and score contribution of one filter for one variant.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct FilterResult {
    kind: FilterKind,
    verdict: FilterVerdict,
    score: f32,
}

impl FilterResult {
    /// Construct new result.
    ///
    /// Scores lie in `[0.0, 1.0]`: a NaN `score` is replaced by the neutral
    /// `1.0`, values outside are clamped.
    pub fn new(kind: FilterKind, verdict: FilterVerdict, score: f32) -> Self {
        let score = if score.is_nan() {
            tracing::warn!("NaN score for {} filter, using 1.0 instead", kind);
            1.0
        } else if !(0.0..=1.0).contains(&score) {
            let clamped = score.clamp(0.0, 1.0);
            tracing::warn!(
                "score {} for {} filter out of range, using {} instead",
                score,
                kind,
                clamped
            );
            clamped
        } else {
            score
        };
        Self {
            kind,
            verdict,
            score,
        }
    }

    pub fn pass(kind: FilterKind, score: f32) -> Self {
        Self::new(kind, FilterVerdict::Pass, score)
    }

    pub fn fail(kind: FilterKind, score: f32) -> Self {
        Self::new(kind, FilterVerdict::Fail, score)
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn verdict(&self) -> FilterVerdict {
        self.verdict
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn passed(&self) -> bool {
        self.verdict == FilterVerdict::Pass
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn accessors() {
        let result = FilterResult::fail(FilterKind::Frequency, 0.1);

        assert_eq!(result.kind(), FilterKind::Frequency);
        assert_eq!(result.verdict(), FilterVerdict::Fail);
        assert_eq!(result.score(), 0.1);
        assert!(!result.passed());
    }

    #[tracing_test::traced_test]
    #[test]
    fn nan_score_is_neutralized() {
        let result = FilterResult::pass(FilterKind::Quality, f32::NAN);

        assert_eq!(result.score(), 1.0);
        assert!(logs_contain("NaN score for quality filter"));
    }

    #[tracing_test::traced_test]
    #[rstest::rstest]
    #[case(1.5, 1.0)]
    #[case(-0.2, 0.0)]
    #[case(0.0, 0.0)]
    #[case(1.0, 1.0)]
    fn score_is_clamped(#[case] score: f32, #[case] expected: f32) {
        let result = FilterResult::fail(FilterKind::Frequency, score);

        assert_eq!(result.score(), expected);
        assert_eq!(logs_contain("out of range"), score != expected);
    }

    #[test]
    fn display() {
        assert_eq!(FilterKind::GeneId.to_string(), "gene_id");
        assert_eq!(FilterVerdict::Pass.to_string(), "PASS");
    }
}
