//! Code implementing the "prioritize" sub command.

pub mod input;
pub mod output;
pub mod settings;

use std::{collections::HashMap, sync::Arc, time::Instant};

use clap::Parser;
use rayon::prelude::*;
use thousands::Separable;

use crate::{
    common::{trace_rss_now, GenomeRelease},
    datasource::{
        alleles::{AlleleStore, AlleleStoreDataSource},
        cache::CachingDataSource,
        cadd::CaddDataSource,
        dann::DannDataSource,
        ncboost::NcBoostDataSource,
        remm::RemmDataSource,
        tabix::{TabixQuery, TabixReader},
        PathogenicityAnnotator, PathogenicityDataSource,
    },
    filter::FilterStats,
    inheritance,
    model::{Gene, PathogenicitySource, PriorityScore, VariantEvaluation},
};

use self::settings::PrioritizeSettings;

/// Command line arguments for `prioritize` sub command.
#[derive(Parser, Debug)]
#[command(author, version, about = "Filter variants and rank genes", long_about = None)]
pub struct Args {
    /// Genome release of the input variants.
    #[arg(long, value_enum, default_value_t = GenomeRelease::Grch37)]
    pub genome_release: GenomeRelease,
    /// Path to the annotated variant TSV file.
    #[arg(long, required = true)]
    pub path_input: String,
    /// Path to the gene priority TSV file.
    #[arg(long)]
    pub path_priorities: Option<String>,
    /// Path to the settings JSON file, defaults are used if not given.
    #[arg(long)]
    pub path_settings_json: Option<String>,
    /// Path to the output TSV file.
    #[arg(long, required = true)]
    pub path_output: String,
    /// Path to an optional JSON output file including all variants.
    #[arg(long)]
    pub path_output_json: Option<String>,
    /// Optional maximal number of genes to write out.
    #[arg(long)]
    pub max_results: Option<usize>,

    /// Path to tabix-indexed DANN scores of SNVs.
    #[arg(long, requires = "path_dann_indel")]
    pub path_dann_snv: Option<String>,
    /// Path to tabix-indexed DANN scores of indels.
    #[arg(long, requires = "path_dann_snv")]
    pub path_dann_indel: Option<String>,
    /// Path to tabix-indexed CADD scores of SNVs.
    #[arg(long, requires = "path_cadd_indel")]
    pub path_cadd_snv: Option<String>,
    /// Path to tabix-indexed CADD scores of indels.
    #[arg(long, requires = "path_cadd_snv")]
    pub path_cadd_indel: Option<String>,
    /// Path to tabix-indexed NCBoost scores.
    #[arg(long)]
    pub path_ncboost: Option<String>,
    /// Path to tabix-indexed REMM scores.
    #[arg(long)]
    pub path_remm: Option<String>,
    /// Path to the RocksDB allele store built with `db build-alleles`.
    #[arg(long)]
    pub path_alleles: Option<String>,
    /// Sources to read from the allele store.
    #[arg(long, value_delimiter = ',', default_value = "polyphen,mutation_taster,sift")]
    pub allele_sources: Vec<PathogenicitySource>,
    /// Number of lookups to cache per tabix source.
    #[arg(long, default_value_t = crate::datasource::cache::DEFAULT_CAPACITY)]
    pub cache_capacity: u64,

    /// Number of threads to use, defaults to the number of cores.
    #[arg(long)]
    pub num_threads: Option<usize>,
}

fn open_tabix(path: &str) -> Result<Arc<dyn TabixQuery>, anyhow::Error> {
    tracing::info!("  opening {}", path);
    Ok(Arc::new(TabixReader::with_path(path)?))
}

fn cached<S: PathogenicityDataSource + 'static>(
    source: S,
    capacity: u64,
) -> Box<dyn PathogenicityDataSource> {
    Box::new(CachingDataSource::new(source, capacity))
}

/// Open all pathogenicity sources given on the command line.
pub fn build_annotator(args: &Args) -> Result<PathogenicityAnnotator, anyhow::Error> {
    let mut sources: Vec<Box<dyn PathogenicityDataSource>> = Vec::new();

    if let (Some(snv), Some(indel)) = (&args.path_dann_snv, &args.path_dann_indel) {
        sources.push(cached(
            DannDataSource::new(open_tabix(snv)?, open_tabix(indel)?),
            args.cache_capacity,
        ));
    }
    if let (Some(snv), Some(indel)) = (&args.path_cadd_snv, &args.path_cadd_indel) {
        sources.push(cached(
            CaddDataSource::new(open_tabix(snv)?, open_tabix(indel)?),
            args.cache_capacity,
        ));
    }
    if let Some(path) = &args.path_ncboost {
        sources.push(cached(
            NcBoostDataSource::new(open_tabix(path)?),
            args.cache_capacity,
        ));
    }
    if let Some(path) = &args.path_remm {
        sources.push(cached(
            RemmDataSource::new(open_tabix(path)?),
            args.cache_capacity,
        ));
    }
    if let Some(path) = &args.path_alleles {
        tracing::info!("  opening allele store {}", path);
        let store = Arc::new(AlleleStore::open_read_only(path)?);
        if store.genome_release() != args.genome_release {
            anyhow::bail!(
                "allele store is for {} but input is {}",
                store.genome_release().name(),
                args.genome_release.name()
            );
        }
        for source in &args.allele_sources {
            sources.push(Box::new(AlleleStoreDataSource::new(
                store.clone(),
                &AlleleStoreDataSource::default_property(*source),
                *source,
            )));
        }
    }

    Ok(PathogenicityAnnotator::new(sources))
}

/// Run annotation, filtering, inheritance analysis and gene filtering.
///
/// Returns the genes in order of first appearance; ranking is done
/// separately.
pub fn prioritize(
    mut evaluations: Vec<VariantEvaluation>,
    priorities: &HashMap<String, Vec<PriorityScore>>,
    settings: &PrioritizeSettings,
    annotator: &PathogenicityAnnotator,
) -> Result<Vec<Gene>, anyhow::Error> {
    let runner = settings.filter_runner()?;

    if !annotator.is_empty() {
        tracing::info!("Annotating pathogenicity...");
        let before_annotation = Instant::now();
        evaluations
            .par_iter_mut()
            .for_each(|evaluation| annotator.annotate(evaluation));
        tracing::info!(
            "... done annotating pathogenicity in {:?}",
            before_annotation.elapsed()
        );
    }

    tracing::info!("Running variant filters {:?}...", runner.variant_filter_kinds());
    let before_filtering = Instant::now();
    runner.run_variants(&mut evaluations);
    FilterStats::from_evaluations(&evaluations).log();
    tracing::info!(
        "... done running variant filters in {:?}",
        before_filtering.elapsed()
    );

    let mut genes = input::group_by_gene(evaluations);
    input::assign_priorities(&mut genes, priorities);
    tracing::info!(
        "Grouped variants into {} genes",
        genes.len().separate_with_commas()
    );

    inheritance::analyze(&mut genes);
    runner.run_genes(&mut genes);
    tracing::info!(
        "{} genes pass all filters",
        genes
            .iter()
            .filter(|gene| gene.passed_filters())
            .count()
            .separate_with_commas()
    );

    Ok(genes)
}

/// Main entry point for `prioritize` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    let before_anything = Instant::now();
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    if let Some(num_threads) = args.num_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| anyhow::anyhow!("building global Rayon thread pool failed: {}", e))?;
    }

    let settings = match &args.path_settings_json {
        Some(path) => PrioritizeSettings::load(path)?,
        None => PrioritizeSettings::default(),
    };
    tracing::info!("settings = {}", serde_json::to_string(&settings)?);

    tracing::info!("Opening pathogenicity sources...");
    let annotator = build_annotator(args)?;
    tracing::info!(
        "... done opening sources {:?}",
        annotator.sources().collect::<Vec<_>>()
    );

    tracing::info!("Loading input...");
    let before_loading = Instant::now();
    let evaluations = input::load_variants(&args.path_input, args.genome_release)?;
    let priorities = match &args.path_priorities {
        Some(path) => input::load_priorities(path)?,
        None => HashMap::new(),
    };
    tracing::info!(
        "... done loading {} variants and priorities for {} genes in {:?}",
        evaluations.len().separate_with_commas(),
        priorities.len().separate_with_commas(),
        before_loading.elapsed()
    );

    trace_rss_now();

    let genes = prioritize(evaluations, &priorities, &settings, &annotator)?;

    tracing::info!("Ranking genes...");
    let ranked = settings.gene_scorer().rank(&genes);
    if let Some(top) = ranked.first() {
        tracing::info!(
            "  top gene {} with score {}",
            top.gene.symbol(),
            top.combined_score
        );
    }

    output::write_tsv(&args.path_output, &ranked, args.max_results)?;
    if let Some(path) = &args.path_output_json {
        output::write_json(path, &ranked, args.max_results)?;
    }

    trace_rss_now();

    tracing::info!(
        "All of `prioritize` completed in {:?}",
        before_anything.elapsed()
    );
    Ok(())
}
