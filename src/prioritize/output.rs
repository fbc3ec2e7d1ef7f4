//! Writing of the ranked gene table.

use std::{io::Write, path::Path};

use itertools::Itertools;

use crate::{common::io::open_write_maybe_gz, scoring::ScoredGene};

/// One line of the output TSV file.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, derive_new::new)]
pub struct GeneRecord {
    /// 1-based rank.
    pub rank: usize,
    pub gene_symbol: String,
    pub gene_id: u32,
    pub combined_score: f32,
    pub priority_score: f32,
    pub filter_score: f32,
    /// Whether at least one variant passed all filters.
    pub passes: bool,
    /// Compatible modes of inheritance, comma-separated, `.` if none.
    pub modes: String,
    pub n_variants: usize,
    pub n_passed: usize,
}

impl GeneRecord {
    pub fn from_scored(rank: usize, scored: &ScoredGene<'_>) -> Self {
        let gene = scored.gene;
        let modes = if gene.inheritance_modes().is_empty() {
            ".".to_string()
        } else {
            gene.inheritance_modes().iter().join(",")
        };
        Self::new(
            rank,
            gene.symbol().to_string(),
            gene.id(),
            scored.combined_score,
            scored.priority_score,
            scored.filter_score,
            gene.passed_filters(),
            modes,
            gene.number_of_variants(),
            gene.passed_variant_evaluations().len(),
        )
    }
}

/// Entry of the JSON output, the full scored gene with its rank.
#[derive(Debug, serde::Serialize)]
struct JsonRecord<'a> {
    rank: usize,
    #[serde(flatten)]
    scored: &'a ScoredGene<'a>,
}

/// Write the ranked genes as TSV to `path`, at most `max_results` if given.
pub fn write_tsv<P: AsRef<Path>>(
    path: P,
    ranked: &[ScoredGene<'_>],
    max_results: Option<usize>,
) -> Result<(), anyhow::Error> {
    tracing::debug!("writing {} genes to {:?}", ranked.len(), path.as_ref());
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(open_write_maybe_gz(path.as_ref()).map_err(|e| {
            anyhow::anyhow!("Cannot open {:?} for writing: {:?}", path.as_ref(), e)
        })?);

    for (i, scored) in ranked
        .iter()
        .take(max_results.unwrap_or(usize::MAX))
        .enumerate()
    {
        writer.serialize(GeneRecord::from_scored(i + 1, scored))?;
    }
    writer
        .flush()
        .map_err(|e| anyhow::anyhow!("problem flushing {:?}: {}", path.as_ref(), e))?;

    Ok(())
}

/// Write the ranked genes including their variants as JSON to `path`.
pub fn write_json<P: AsRef<Path>>(
    path: P,
    ranked: &[ScoredGene<'_>],
    max_results: Option<usize>,
) -> Result<(), anyhow::Error> {
    tracing::debug!("writing JSON to {:?}", path.as_ref());
    let records = ranked
        .iter()
        .take(max_results.unwrap_or(usize::MAX))
        .enumerate()
        .map(|(i, scored)| JsonRecord { rank: i + 1, scored })
        .collect::<Vec<_>>();

    let mut writer = open_write_maybe_gz(path.as_ref())
        .map_err(|e| anyhow::anyhow!("Cannot open {:?} for writing: {:?}", path.as_ref(), e))?;
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}
