//! Per-gene results of phenotype-driven prioritization algorithms.

/// The prioritization algorithm that produced a score.
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
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PriorityType {
    Omim,
    Phive,
    HiPhive,
    Phenix,
    ExomeWalker,
}

/// Score of one prioritization algorithm for one gene.
///
/// Kept mutable so that rank-based rescoring can update it in place.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize, derive_new::new)]
pub struct PriorityScore {
    priority_type: PriorityType,
    score: f32,
}

impl PriorityScore {
    pub fn priority_type(&self) -> PriorityType {
        self.priority_type
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn set_score(&mut self, score: f32) {
        self.score = score;
    }
}
