//! Range queries into bgzf-compressed, tabix-indexed TSV files.

use std::{
    collections::HashSet,
    fs::File,
    io::BufRead,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use noodles_bgzf as bgzf;
use noodles_core::{region::Interval, Position};
use noodles_csi::BinningIndex as _;
use noodles_tabix as tabix;

use crate::{common::canonicalize, err::DataSourceError, model::Variant};

/// Range query over tab-delimited records.
pub trait TabixQuery: Send + Sync {
    /// Name of the underlying data, for log messages.
    fn source_name(&self) -> &str;

    /// Return all records on `chrom` with 1-based position in `[start, end]`.
    ///
    /// An unknown `chrom` yields no records.
    fn query(&self, chrom: &str, start: u32, end: u32) -> Result<Vec<String>, DataSourceError>;
}

struct Handle {
    reader: bgzf::Reader<File>,
    index: tabix::Index,
}

/// `TabixQuery` backed by a bgzf file and its `.tbi` index.
///
/// The reader handle cannot be queried concurrently, queries are serialized
/// through a mutex.
pub struct TabixReader {
    name: String,
    handle: Mutex<Handle>,
}

impl TabixReader {
    /// Open the file at `path` and the index at `path` + `.tbi`.
    pub fn with_path<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let mut path_tbi = PathBuf::from(path.as_os_str());
        path_tbi.as_mut_os_string().push(".tbi");

        let reader = File::open(path).map(bgzf::Reader::new).map_err(|e| {
            anyhow::anyhow!("could not open {} for reading: {}", path.display(), e)
        })?;
        let index = tabix::read(&path_tbi).map_err(|e| {
            anyhow::anyhow!("could not read tabix index {}: {}", path_tbi.display(), e)
        })?;

        Ok(Self {
            name: path.display().to_string(),
            handle: Mutex::new(Handle { reader, index }),
        })
    }

    /// Index and name of the reference sequence `chrom` is stored as.
    fn reference_sequence(index: &tabix::Index, chrom: &str) -> Option<(usize, String)> {
        let names = index.header()?.reference_sequence_names();
        let canonical = canonicalize(chrom);
        let candidates = [chrom.to_string(), canonical.clone(), format!("chr{canonical}")];
        candidates.into_iter().find_map(|candidate| {
            names
                .iter()
                .position(|name| *name == *candidate)
                .map(|id| (id, candidate))
        })
    }
}

impl TabixQuery for TabixReader {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn query(&self, chrom: &str, start: u32, end: u32) -> Result<Vec<String>, DataSourceError> {
        let mut guard = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        let Handle { reader, index } = &mut *guard;

        let (reference_sequence_id, name) = match Self::reference_sequence(index, chrom) {
            Some(found) => found,
            None => {
                tracing::trace!("contig {} not in {}", chrom, &self.name);
                return Ok(Vec::new());
            }
        };
        let interval = Interval::from(
            Position::try_from(start as usize)
                .map_err(|_| DataSourceError::InvalidCoordinate(start as usize))?
                ..=Position::try_from(end as usize)
                    .map_err(|_| DataSourceError::InvalidCoordinate(end as usize))?,
        );

        let io_err = |error: std::io::Error| DataSourceError::Io {
            source_name: self.name.clone(),
            error,
        };
        let chunks = index
            .query(reference_sequence_id, interval)
            .map_err(io_err)?;

        let mut seen = HashSet::new();
        let mut result = Vec::new();
        let mut line = String::new();
        for chunk in chunks {
            reader.seek(chunk.start()).map_err(io_err)?;
            while reader.virtual_position() < chunk.end() {
                let line_start = u64::from(reader.virtual_position());
                line.clear();
                if reader.read_line(&mut line).map_err(io_err)? == 0 {
                    break;
                }
                if line.starts_with('#') || !seen.insert(line_start) {
                    continue;
                }
                let record = line.trim_end_matches(['\r', '\n']);
                if record.split('\t').next() == Some(name.as_str())
                    && overlaps(record, start, end)
                {
                    result.push(record.to_string());
                }
            }
        }

        Ok(result)
    }
}

/// Whether the position in column 2 of `record` lies in `[start, end]`.
fn overlaps(record: &str, start: u32, end: u32) -> bool {
    record
        .split('\t')
        .nth(1)
        .and_then(|pos| pos.parse::<u32>().ok())
        .map(|pos| start <= pos && pos <= end)
        .unwrap_or(false)
}

/// Return column `column` (0-based) of the split `record`.
pub(crate) fn column<'a>(
    fields: &[&'a str],
    column: usize,
    record: &str,
) -> Result<&'a str, DataSourceError> {
    fields
        .get(column)
        .copied()
        .ok_or_else(|| DataSourceError::MissingColumn {
            column,
            record: record.to_string(),
        })
}

/// Score of the record at the variant's position matching its alleles.
///
/// Expects reference and alternate allele in columns 3 and 4 (1-based).
pub(crate) fn exact_allele_score(
    tabix: &dyn TabixQuery,
    variant: &Variant,
    score_column: usize,
) -> Result<Option<f32>, DataSourceError> {
    for record in tabix.query(&variant.chrom, variant.pos, variant.pos)? {
        let fields = record.split('\t').collect::<Vec<_>>();
        if column(&fields, 2, &record)? == variant.reference
            && column(&fields, 3, &record)? == variant.alternative
        {
            return Ok(Some(column(&fields, score_column, &record)?.parse()?));
        }
    }
    Ok(None)
}

/// Maximal score over all records in `[start, end]`.
pub(crate) fn max_score_in_range(
    tabix: &dyn TabixQuery,
    chrom: &str,
    start: u32,
    end: u32,
    score_column: usize,
) -> Result<Option<f32>, DataSourceError> {
    let mut result: Option<f32> = None;
    for record in tabix.query(chrom, start, end)? {
        let fields = record.split('\t').collect::<Vec<_>>();
        let score: f32 = column(&fields, score_column, &record)?.parse()?;
        if score.is_nan() {
            continue;
        }
        result = Some(result.map_or(score, |max| max.max(score)));
    }
    Ok(result)
}

/// In-memory `TabixQuery` over a list of records, used in tests.
#[cfg(test)]
pub(crate) mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    pub struct MemoryTabix {
        pub records: Vec<String>,
        pub queries: AtomicUsize,
        pub fail: bool,
    }

    impl MemoryTabix {
        pub fn new<I, S>(records: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                records: records.into_iter().map(Into::into).collect(),
                ..Default::default()
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub fn query_count(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }
    }

    impl TabixQuery for MemoryTabix {
        fn source_name(&self) -> &str {
            "memory"
        }

        fn query(
            &self,
            chrom: &str,
            start: u32,
            end: u32,
        ) -> Result<Vec<String>, DataSourceError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DataSourceError::Io {
                    source_name: "memory".into(),
                    error: std::io::Error::new(std::io::ErrorKind::Other, "broken"),
                });
            }
            Ok(self
                .records
                .iter()
                .filter(|record| {
                    record.split('\t').next().map(canonicalize) == Some(canonicalize(chrom))
                        && overlaps(record, start, end)
                })
                .cloned()
                .collect())
        }
    }
}
