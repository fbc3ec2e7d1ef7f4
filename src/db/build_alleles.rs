//! Command line interface for "db build-alleles".
//!
//! Reads a TSV file with the header `chrom pos reference alternative` followed
//! by one column per property (e.g., `SIFT`, `POLYPHEN`) and writes the values
//! into the RocksDB allele store.  Empty values and `.` are skipped.  Rows for
//! an allele that is already present are merged into the stored properties.

use clap::Parser;
use thousands::Separable;

use crate::{
    common::{self, io::open_read_maybe_gz, GenomeRelease},
    datasource::alleles::{AlleleKey, AlleleProperties, AlleleStore},
};

/// Command line arguments for `db build-alleles` sub command.
#[derive(Parser, Debug)]
#[command(about = "Load allele properties into RocksDB", long_about = None)]
pub struct Args {
    /// Genome release of the input coordinates.
    #[arg(long, value_enum, default_value_t = GenomeRelease::Grch37)]
    pub genome_release: GenomeRelease,
    /// Path(s) to input TSV file(s), optionally gzip-compressed.
    #[arg(long, required = true)]
    pub path_input: Vec<String>,
    /// Path to output RocksDB directory.
    #[arg(long)]
    pub path_out_rocksdb: String,
}

/// Number of leading coordinate columns.
const KEY_COLUMNS: usize = 4;

/// Parse the property columns of one row, skipping missing values.
fn parse_properties(
    header: &csv::StringRecord,
    record: &csv::StringRecord,
    line_no: usize,
) -> Result<AlleleProperties, anyhow::Error> {
    let mut result = AlleleProperties::default();
    for (name, value) in header.iter().zip(record.iter()).skip(KEY_COLUMNS) {
        if value.is_empty() || value == "." {
            continue;
        }
        let value: f32 = value.parse().map_err(|e| {
            anyhow::anyhow!("invalid value {:?} for {} in line {}: {}", value, name, line_no, e)
        })?;
        if value.is_nan() {
            continue;
        }
        result.properties.insert(name.to_string(), value);
    }
    Ok(result)
}

fn parse_key(record: &csv::StringRecord, line_no: usize) -> Result<AlleleKey, anyhow::Error> {
    let field = |idx: usize| {
        record
            .get(idx)
            .ok_or_else(|| anyhow::anyhow!("missing column {} in line {}", idx + 1, line_no))
    };
    let pos = field(1)?
        .parse::<u32>()
        .map_err(|e| anyhow::anyhow!("invalid position in line {}: {}", line_no, e))?;
    Ok(AlleleKey::new(field(0)?, pos, field(2)?, field(3)?))
}

/// Import one TSV file into the store, returns the number of rows.
fn import_tsv(store: &AlleleStore, path_input: &str) -> Result<usize, anyhow::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(
            open_read_maybe_gz(path_input).map_err(|e| {
                anyhow::anyhow!("could not open file {} for reading: {}", path_input, e)
            })?,
        );
    let header = reader.headers()?.clone();
    if header.len() <= KEY_COLUMNS {
        anyhow::bail!("{} has no property columns", path_input);
    }

    let mut prev = std::time::Instant::now();
    let mut count = 0;
    for (i, record) in reader.records().enumerate() {
        let line_no = i + 2;
        let record = record.map_err(|e| anyhow::anyhow!("problem in line {}: {}", line_no, e))?;
        let key = parse_key(&record, line_no)?;
        let properties = parse_properties(&header, &record, line_no)?;

        let merged = match store.get(&key)? {
            Some(mut existing) => {
                existing.properties.extend(properties.properties);
                existing
            }
            None => properties,
        };
        store.put(&key, &merged)?;
        count += 1;

        // Write out progress indicator every 60 seconds.
        if prev.elapsed().as_secs() >= 60 {
            tracing::info!("at {:?}", &key);
            prev = std::time::Instant::now();
        }
    }

    Ok(count)
}

/// Main entry point for `db build-alleles` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    let before_anything = std::time::Instant::now();
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    common::trace_rss_now();

    tracing::info!("Opening RocksDB...");
    let store = AlleleStore::create(&args.path_out_rocksdb, args.genome_release)?;
    tracing::info!("... done opening RocksDB");

    tracing::info!("Importing TSV files ...");
    let before_import = std::time::Instant::now();
    let mut total = 0;
    for path_input in &args.path_input {
        let count = import_tsv(&store, path_input)
            .map_err(|e| anyhow::anyhow!("processing TSV file {} failed: {}", path_input, e))?;
        tracing::info!("  imported {} rows from {}", count.separate_with_commas(), path_input);
        total += count;
    }
    tracing::info!(
        "... done importing {} rows in {:?}",
        total.separate_with_commas(),
        before_import.elapsed()
    );

    tracing::info!("Running RocksDB compaction ...");
    let before_compaction = std::time::Instant::now();
    store.compact()?;
    tracing::info!(
        "... done compacting RocksDB in {:?}",
        before_compaction.elapsed()
    );

    common::trace_rss_now();

    tracing::info!(
        "All of `db build-alleles` completed in {:?}",
        before_anything.elapsed()
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        datasource::{alleles::AlleleStoreDataSource, PathogenicityDataSource},
        model::{PathogenicityScore, PathogenicitySource, Variant},
    };

    const ALLELES_TSV: &str = "\
chrom\tpos\treference\talternative\tSIFT\tPOLYPHEN
chr1\t1000\tA\tT\t0.02\t0.9
1\t2000\tG\tC\t.\t0.3
X\t5000\tC\tT\t\t
";

    fn build(tmpdir: &temp_testdir::TempDir, inputs: &[&str]) -> Result<String, anyhow::Error> {
        let mut path_input = Vec::new();
        for (i, contents) in inputs.iter().enumerate() {
            let path = tmpdir.join(format!("alleles-{}.tsv", i));
            std::fs::write(&path, contents)?;
            path_input.push(path.to_string_lossy().to_string());
        }
        let path_out_rocksdb = tmpdir.join("alleles-db").to_string_lossy().to_string();
        let args = Args {
            genome_release: GenomeRelease::Grch37,
            path_input,
            path_out_rocksdb: path_out_rocksdb.clone(),
        };
        run(&crate::common::Args::default(), &args)?;
        Ok(path_out_rocksdb)
    }

    #[test]
    fn build_then_lookup() -> Result<(), anyhow::Error> {
        let tmpdir = temp_testdir::TempDir::default();
        let path_db = build(&tmpdir, &[ALLELES_TSV])?;

        let store = Arc::new(AlleleStore::open_read_only(&path_db)?);
        assert_eq!(store.genome_release(), GenomeRelease::Grch37);

        let first = store
            .get(&AlleleKey::new("1", 1000, "A", "T"))?
            .map(|props| props.properties.len());
        assert_eq!(first, Some(2));
        let second = store.get(&AlleleKey::new("1", 2000, "G", "C"))?;
        assert_eq!(
            second.and_then(|props| props.properties.get("SIFT").copied()),
            None
        );
        let third = store.get(&AlleleKey::new("X", 5000, "C", "T"))?;
        assert_eq!(third.map(|props| props.properties.is_empty()), Some(true));

        let sift = AlleleStoreDataSource::new(store, "SIFT", PathogenicitySource::Sift);
        let variant = Variant {
            chrom: "1".into(),
            pos: 1000,
            reference: "A".into(),
            alternative: "T".into(),
            ..Default::default()
        };
        assert_eq!(
            sift.lookup(&variant),
            Some(PathogenicityScore::new(PathogenicitySource::Sift, 0.02))
        );

        Ok(())
    }

    #[test]
    fn rows_for_same_allele_are_merged() -> Result<(), anyhow::Error> {
        let tmpdir = temp_testdir::TempDir::default();
        let path_db = build(
            &tmpdir,
            &[
                "chrom\tpos\treference\talternative\tSIFT\n1\t1000\tA\tT\t0.02\n",
                "chrom\tpos\treference\talternative\tCADD\n1\t1000\tA\tT\t0.5\n",
            ],
        )?;

        let store = AlleleStore::open_read_only(&path_db)?;
        let mut names = store
            .get(&AlleleKey::new("1", 1000, "A", "T"))?
            .map(|props| props.properties.into_keys().collect::<Vec<_>>())
            .unwrap_or_default();
        names.sort();
        assert_eq!(names, vec!["CADD".to_string(), "SIFT".to_string()]);

        Ok(())
    }

    #[test]
    fn missing_property_columns_fail() -> Result<(), anyhow::Error> {
        let tmpdir = temp_testdir::TempDir::default();

        assert!(build(&tmpdir, &["chrom\tpos\treference\talternative\n1\t1\tA\tT\n"]).is_err());

        Ok(())
    }

    #[test]
    fn invalid_value_fails() -> Result<(), anyhow::Error> {
        let tmpdir = temp_testdir::TempDir::default();

        assert!(build(
            &tmpdir,
            &["chrom\tpos\treference\talternative\tSIFT\n1\t1\tA\tT\tabc\n"]
        )
        .is_err());

        Ok(())
    }
}
