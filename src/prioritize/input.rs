//! Reading of the annotated variant and gene priority tables.

use std::{
    collections::{BTreeSet, HashMap},
    path::Path,
    time::Instant,
};

use indexmap::IndexMap;
use thousands::Separable;

use crate::{
    common::{io::open_read_maybe_gz, GenomeRelease, Genotype},
    model::{
        FrequencyData, Gene, PriorityScore, PriorityType, Variant, VariantEffect,
        VariantEvaluation,
    },
};

/// One line of the variant TSV file.
#[derive(Debug, Clone, serde::Deserialize)]
struct VariantRecord {
    chrom: String,
    pos: u32,
    reference: String,
    alternative: String,
    gene_symbol: String,
    gene_id: u32,
    effect: VariantEffect,
    quality: f32,
    genotype: Genotype,
    max_freq: Option<f32>,
}

impl VariantRecord {
    fn into_evaluation(self, genome_release: GenomeRelease) -> VariantEvaluation {
        let frequency = FrequencyData::new(self.max_freq);
        VariantEvaluation::new(Variant {
            genome_release,
            chrom: self.chrom,
            pos: self.pos,
            reference: self.reference,
            alternative: self.alternative,
            gene_symbol: self.gene_symbol,
            gene_id: self.gene_id,
            effect: self.effect,
            quality: self.quality,
            genotype: self.genotype,
        })
        .with_frequency(frequency)
    }
}

/// One line of the gene priority TSV file.
#[derive(Debug, Clone, serde::Deserialize)]
struct PriorityRecord {
    gene_symbol: String,
    priority_type: PriorityType,
    score: f32,
}

/// Load the annotated variants from the TSV file at `path`.
#[tracing::instrument(skip(path))]
pub fn load_variants<P: AsRef<Path>>(
    path: P,
    genome_release: GenomeRelease,
) -> Result<Vec<VariantEvaluation>, anyhow::Error> {
    tracing::debug!("loading variants from {:?}...", path.as_ref());
    let before_loading = Instant::now();

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(open_read_maybe_gz(path.as_ref())?);

    let mut result = Vec::new();
    for (i, record) in reader.deserialize().enumerate() {
        let record: VariantRecord =
            record.map_err(|e| anyhow::anyhow!("invalid variant record no. {}: {}", i + 1, e))?;
        result.push(record.into_evaluation(genome_release));
    }

    tracing::debug!(
        "... done loading {} variants in {:?}",
        result.len().separate_with_commas(),
        before_loading.elapsed()
    );
    Ok(result)
}

/// Load the priority scores from the TSV file at `path`, by gene symbol.
#[tracing::instrument(skip(path))]
pub fn load_priorities<P: AsRef<Path>>(
    path: P,
) -> Result<HashMap<String, Vec<PriorityScore>>, anyhow::Error> {
    tracing::debug!("loading gene priorities from {:?}...", path.as_ref());
    let before_loading = Instant::now();

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(open_read_maybe_gz(path.as_ref())?);

    let mut result: HashMap<String, Vec<PriorityScore>> = HashMap::new();
    let mut total_count = 0;
    for (i, record) in reader.deserialize().enumerate() {
        let record: PriorityRecord =
            record.map_err(|e| anyhow::anyhow!("invalid priority record no. {}: {}", i + 1, e))?;
        result
            .entry(record.gene_symbol)
            .or_default()
            .push(PriorityScore::new(record.priority_type, record.score));
        total_count += 1;
    }

    tracing::debug!(
        "... done loading {} priority scores in {:?}",
        total_count.separate_with_commas(),
        before_loading.elapsed()
    );
    Ok(result)
}

/// Group evaluations into genes by `(symbol, id)`, in order of first appearance.
pub fn group_by_gene(evaluations: Vec<VariantEvaluation>) -> Vec<Gene> {
    let mut genes: IndexMap<(String, u32), Gene> = IndexMap::new();
    for evaluation in evaluations {
        let key = (evaluation.gene_symbol().to_string(), evaluation.gene_id());
        match genes.get_mut(&key) {
            Some(gene) => gene.add_variant(evaluation),
            None => {
                genes.insert(key, Gene::new(evaluation));
            }
        }
    }
    genes.into_values().collect()
}

/// Attach the priority scores to the genes with matching symbol.
///
/// Genes missing from the table get `0.0` for each priority type that occurs
/// in it.  Without any priorities, genes keep an empty map.
pub fn assign_priorities(genes: &mut [Gene], priorities: &HashMap<String, Vec<PriorityScore>>) {
    let priority_types = priorities
        .values()
        .flatten()
        .map(PriorityScore::priority_type)
        .collect::<BTreeSet<_>>();
    for gene in genes.iter_mut() {
        for priority_type in &priority_types {
            gene.add_priority_score(PriorityScore::new(*priority_type, 0.0));
        }
        if let Some(scores) = priorities.get(gene.symbol()) {
            for score in scores {
                gene.add_priority_score(*score);
            }
        }
    }
}
