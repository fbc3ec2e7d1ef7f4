//! Annotated variant coordinates as handed over by the annotation stage.

use crate::common::{canonicalize, Chrom, GenomeRelease, Genotype};

/// Predicted effect of a variant on its gene, as Sequence Ontology term.
///
/// Only the most severe effect per variant is carried.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
pub enum VariantEffect {
    StopGained,
    FrameshiftVariant,
    StartLost,
    StopLost,
    SpliceAcceptorVariant,
    SpliceDonorVariant,
    MissenseVariant,
    InframeInsertion,
    InframeDeletion,
    SpliceRegionVariant,
    SynonymousVariant,
    FivePrimeUtrVariant,
    ThreePrimeUtrVariant,
    NonCodingTranscriptExonVariant,
    IntronVariant,
    UpstreamGeneVariant,
    DownstreamGeneVariant,
    RegulatoryRegionVariant,
    IntergenicVariant,
    #[default]
    SequenceVariant,
}

impl VariantEffect {
    /// Whether the effect lies outside of the targeted (coding plus splice) region.
    pub fn is_off_target(&self) -> bool {
        matches!(
            self,
            VariantEffect::SynonymousVariant
                | VariantEffect::IntronVariant
                | VariantEffect::UpstreamGeneVariant
                | VariantEffect::DownstreamGeneVariant
                | VariantEffect::IntergenicVariant
        )
    }

    /// Pathogenicity assumed for effects where predictions are not used.
    ///
    /// Missense variants get the value used when no predictions are known.
    pub fn default_pathogenicity(&self) -> f32 {
        match self {
            VariantEffect::StopGained => 1.0,
            VariantEffect::FrameshiftVariant | VariantEffect::StartLost => 0.95,
            VariantEffect::SpliceAcceptorVariant | VariantEffect::SpliceDonorVariant => 0.9,
            VariantEffect::InframeInsertion | VariantEffect::InframeDeletion => 0.85,
            VariantEffect::StopLost => 0.7,
            VariantEffect::MissenseVariant => 0.6,
            VariantEffect::SpliceRegionVariant => 0.2,
            VariantEffect::SynonymousVariant => 0.1,
            VariantEffect::FivePrimeUtrVariant
            | VariantEffect::ThreePrimeUtrVariant
            | VariantEffect::NonCodingTranscriptExonVariant
            | VariantEffect::IntronVariant
            | VariantEffect::UpstreamGeneVariant
            | VariantEffect::DownstreamGeneVariant
            | VariantEffect::RegulatoryRegionVariant
            | VariantEffect::IntergenicVariant
            | VariantEffect::SequenceVariant => 0.0,
        }
    }
}

/// One observed sequence variant.
///
/// Created once by the annotation stage and owned by its `VariantEvaluation`
/// afterwards, which only hands out shared references.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Variant {
    /// Genome release of the coordinates.
    pub genome_release: GenomeRelease,
    /// Chromosome name as given in the input.
    pub chrom: String,
    /// 1-based position.
    pub pos: u32,
    /// Reference allele.
    pub reference: String,
    /// Alternate allele.
    pub alternative: String,
    /// Gene symbol of the affected gene, `"."` if none.
    pub gene_symbol: String,
    /// Numeric gene identifier, e.g., Entrez gene ID.
    pub gene_id: u32,
    /// Most severe predicted effect.
    pub effect: VariantEffect,
    /// Variant call quality (`QUAL`).
    pub quality: f32,
    /// Genotype of the proband.
    pub genotype: Genotype,
}

impl Variant {
    /// Whether this is a single nucleotide variant.
    pub fn is_snv(&self) -> bool {
        self.reference.len() == 1 && self.alternative.len() == 1
    }

    /// Whether more reference than alternate bases.
    pub fn is_deletion(&self) -> bool {
        self.reference.len() > self.alternative.len()
    }

    /// Whether more alternate than reference bases.
    pub fn is_insertion(&self) -> bool {
        self.reference.len() < self.alternative.len()
    }

    /// 1-based, inclusive end position on the reference.
    pub fn end(&self) -> u32 {
        self.pos + (self.reference.len().max(1) as u32) - 1
    }

    /// Chromosome name without `chr` prefix.
    pub fn canonical_chrom(&self) -> String {
        canonicalize(&self.chrom)
    }

    /// Coarse chromosome class.
    pub fn chrom_class(&self) -> Chrom {
        Chrom::from(self.chrom.as_str())
    }

    pub fn is_x_chromosomal(&self) -> bool {
        self.chrom_class() == Chrom::X
    }

    pub fn is_y_chromosomal(&self) -> bool {
        self.chrom_class() == Chrom::Y
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}-{}-{}-{}",
            self.genome_release.name(),
            self.chrom,
            self.pos,
            self.reference,
            self.alternative
        )
    }
}
