//! Data model of the filtering and ranking pipeline.

pub mod evaluation;
pub mod filter;
pub mod frequency;
pub mod gene;
pub mod inheritance;
pub mod pathogenicity;
pub mod priority;
pub mod variant;

pub use evaluation::VariantEvaluation;
pub use filter::{FilterKind, FilterResult, FilterVerdict};
pub use frequency::FrequencyData;
pub use gene::Gene;
pub use inheritance::ModeOfInheritance;
pub use pathogenicity::{PathogenicityData, PathogenicityScore, PathogenicitySource};
pub use priority::{PriorityScore, PriorityType};
pub use variant::{Variant, VariantEffect};
