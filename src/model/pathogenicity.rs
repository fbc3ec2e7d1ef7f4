//! Pathogenicity predictions collected for one variant.

use indexmap::IndexMap;

/// Source of a precomputed pathogenicity score.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PathogenicitySource {
    Polyphen,
    MutationTaster,
    Sift,
    Cadd,
    Dann,
    #[strum(serialize = "ncboost")]
    #[serde(rename = "ncboost")]
    NcBoost,
    Remm,
}

/// One score from one source.
#[derive(
    Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize, derive_new::new,
)]
pub struct PathogenicityScore {
    pub source: PathogenicitySource,
    pub score: f32,
}

impl PathogenicityScore {
    /// Score oriented such that larger means more pathogenic.
    ///
    /// SIFT scores small values as damaging and is inverted.
    pub fn oriented_score(&self) -> f32 {
        match self.source {
            PathogenicitySource::Sift => 1.0 - self.score,
            _ => self.score,
        }
    }
}

/// Scores by source, in order of insertion.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct PathogenicityData {
    scores: IndexMap<PathogenicitySource, f32>,
}

impl PathogenicityData {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = PathogenicityScore>,
    {
        let mut result = Self::default();
        for score in scores {
            result.add(score);
        }
        result
    }

    /// Add a score, replacing any score from the same source.  NaN scores are dropped.
    pub fn add(&mut self, score: PathogenicityScore) {
        if score.score.is_nan() {
            tracing::warn!("ignoring NaN score from {}", score.source);
            return;
        }
        self.scores.insert(score.source, score.score);
    }

    pub fn get(&self, source: PathogenicitySource) -> Option<PathogenicityScore> {
        self.scores
            .get(&source)
            .map(|score| PathogenicityScore::new(source, *score))
    }

    pub fn scores(&self) -> impl Iterator<Item = PathogenicityScore> + '_ {
        self.scores
            .iter()
            .map(|(source, score)| PathogenicityScore::new(*source, *score))
    }

    pub fn has_predicted_score(&self) -> bool {
        !self.scores.is_empty()
    }

    /// The score of the source predicting the highest pathogenicity, if any.
    pub fn most_pathogenic_score(&self) -> Option<PathogenicityScore> {
        self.scores()
            .max_by(|a, b| a.oriented_score().total_cmp(&b.oriented_score()))
    }
}
