//! RocksDB-backed store of per-allele properties.

use std::{collections::HashMap, path::Path, sync::Arc};

use byteorder::{BigEndian, WriteBytesExt};

use super::PathogenicityDataSource;
use crate::{
    common::{self, canonicalize, GenomeRelease},
    err::DataSourceError,
    model::{PathogenicityScore, PathogenicitySource, Variant},
};

/// Name of the column family holding the allele properties.
pub const CF_ALLELES: &str = "alleles";
/// Name of the column family holding meta information.
pub const CF_META: &str = "meta";

/// Properties of one allele by property name, e.g., `SIFT` or `POLYPHEN`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct AlleleProperties {
    #[prost(map = "string, float", tag = "1")]
    pub properties: HashMap<String, f32>,
}

/// Convert chromosome to key in RocksDB.
///
/// Autosomes are zero-padded and `X`/`Y` space-padded to two characters so
/// that keys sort by chromosome.
pub fn chrom_name_to_key(name: &str) -> String {
    let name = canonicalize(name);
    match name.len() {
        0 => "  ".to_string(),
        1 if name.as_bytes()[0].is_ascii_digit() => format!("0{name}"),
        1 => format!(" {name}"),
        _ => name,
    }
}

/// Allele coordinates used as store key.
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct AlleleKey {
    pub chrom: String,
    pub pos: u32,
    pub reference: String,
    pub alternative: String,
}

impl AlleleKey {
    pub fn new(chrom: &str, pos: u32, reference: &str, alternative: &str) -> Self {
        Self {
            chrom: canonicalize(chrom),
            pos,
            reference: reference.to_string(),
            alternative: alternative.to_string(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::new();

        result.extend_from_slice(chrom_name_to_key(&self.chrom).as_bytes());
        // writing into a `Vec` cannot fail
        let _ = result.write_u32::<BigEndian>(self.pos);
        result.extend_from_slice(self.reference.as_bytes());
        result.push(b'>');
        result.extend_from_slice(self.alternative.as_bytes());

        result
    }
}

impl From<&Variant> for AlleleKey {
    fn from(variant: &Variant) -> Self {
        Self::new(
            &variant.chrom,
            variant.pos,
            &variant.reference,
            &variant.alternative,
        )
    }
}

/// Handle on the allele store database.
pub struct AlleleStore {
    db: Arc<rocksdb::DBWithThreadMode<rocksdb::MultiThreaded>>,
    genome_release: GenomeRelease,
}

impl AlleleStore {
    /// Create a new or open an existing store for writing.
    pub fn create<P: AsRef<Path>>(
        path: P,
        genome_release: GenomeRelease,
    ) -> Result<Self, anyhow::Error> {
        let mut options = rocksdb::Options::default();
        options.create_if_missing(true);
        options.create_missing_column_families(true);
        let cf_descriptors = [CF_META, CF_ALLELES]
            .iter()
            .map(|name| rocksdb::ColumnFamilyDescriptor::new(*name, options.clone()))
            .collect::<Vec<_>>();
        let db = rocksdb::DBWithThreadMode::<rocksdb::MultiThreaded>::open_cf_descriptors(
            &options,
            path.as_ref(),
            cf_descriptors,
        )
        .map_err(|e| anyhow::anyhow!("could not open allele store for writing: {}", e))?;

        let cf_meta = db
            .cf_handle(CF_META)
            .ok_or_else(|| DataSourceError::MissingColumnFamily(CF_META.into()))?;
        db.put_cf(&cf_meta, "varprio-version", common::worker_version())?;
        db.put_cf(&cf_meta, "db-name", "alleles")?;
        db.put_cf(&cf_meta, "genome-release", genome_release.to_string())?;
        drop(cf_meta);

        Ok(Self {
            db: Arc::new(db),
            genome_release,
        })
    }

    /// Open an existing store for reading.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let db = rocksdb::DBWithThreadMode::<rocksdb::MultiThreaded>::open_cf_for_read_only(
            &rocksdb::Options::default(),
            path.as_ref(),
            [CF_META, CF_ALLELES],
            false,
        )
        .map_err(|e| {
            anyhow::anyhow!(
                "could not open allele store {} for reading: {}",
                path.as_ref().display(),
                e
            )
        })?;

        let cf_meta = db
            .cf_handle(CF_META)
            .ok_or_else(|| DataSourceError::MissingColumnFamily(CF_META.into()))?;
        let genome_release = db
            .get_cf(&cf_meta, "genome-release")?
            .ok_or_else(|| anyhow::anyhow!("allele store has no genome release"))
            .and_then(|value| {
                String::from_utf8(value)
                    .map_err(|e| anyhow::anyhow!("invalid genome release: {}", e))?
                    .parse::<GenomeRelease>()
                    .map_err(|e| anyhow::anyhow!("invalid genome release: {}", e))
            })?;
        drop(cf_meta);

        Ok(Self {
            db: Arc::new(db),
            genome_release,
        })
    }

    pub fn genome_release(&self) -> GenomeRelease {
        self.genome_release
    }

    pub fn put(&self, key: &AlleleKey, value: &AlleleProperties) -> Result<(), DataSourceError> {
        let cf = self
            .db
            .cf_handle(CF_ALLELES)
            .ok_or_else(|| DataSourceError::MissingColumnFamily(CF_ALLELES.into()))?;
        self.db
            .put_cf(&cf, key.to_bytes(), prost::Message::encode_to_vec(value))?;
        Ok(())
    }

    pub fn get(&self, key: &AlleleKey) -> Result<Option<AlleleProperties>, DataSourceError> {
        let cf = self
            .db
            .cf_handle(CF_ALLELES)
            .ok_or_else(|| DataSourceError::MissingColumnFamily(CF_ALLELES.into()))?;
        self.db
            .get_cf(&cf, key.to_bytes())?
            .map(|raw| <AlleleProperties as prost::Message>::decode(raw.as_slice()))
            .transpose()
            .map_err(DataSourceError::from)
    }

    /// Compact the allele column family after bulk loading.
    pub fn compact(&self) -> Result<(), DataSourceError> {
        let cf = self
            .db
            .cf_handle(CF_ALLELES)
            .ok_or_else(|| DataSourceError::MissingColumnFamily(CF_ALLELES.into()))?;
        self.db.compact_range_cf(&cf, None::<&[u8]>, None::<&[u8]>);
        Ok(())
    }
}

/// One property of the allele store exposed as pathogenicity source.
pub struct AlleleStoreDataSource {
    store: Arc<AlleleStore>,
    property: String,
    source: PathogenicitySource,
}

impl AlleleStoreDataSource {
    pub fn new(store: Arc<AlleleStore>, property: &str, source: PathogenicitySource) -> Self {
        Self {
            store,
            property: property.to_string(),
            source,
        }
    }

    /// Property name used for `source` when none is configured.
    pub fn default_property(source: PathogenicitySource) -> String {
        source.to_string().to_uppercase()
    }
}

impl PathogenicityDataSource for AlleleStoreDataSource {
    fn source(&self) -> PathogenicitySource {
        self.source
    }

    fn lookup(&self, variant: &Variant) -> Option<PathogenicityScore> {
        if variant.genome_release != self.store.genome_release() {
            tracing::warn!(
                "allele store is for {}, cannot look up {}",
                self.store.genome_release().name(),
                variant
            );
            return None;
        }
        match self.store.get(&AlleleKey::from(variant)) {
            Ok(properties) => properties
                .and_then(|properties| properties.properties.get(&self.property).copied())
                .map(|score| PathogenicityScore::new(self.source, score)),
            Err(e) => {
                tracing::error!("unable to read allele store for {}: {}", variant, e);
                None
            }
        }
    }
}
