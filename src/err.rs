use std::num::{ParseFloatError, ParseIntError};

/// Errors raised when reading from pathogenicity data sources.
///
/// These never leave the data source adapters: they are logged and mapped to
/// an empty result there.
#[derive(thiserror::Error, Debug)]
pub enum DataSourceError {
    #[error("I/O problem reading {source_name}: {error}")]
    Io {
        source_name: String,
        error: std::io::Error,
    },
    #[error("invalid coordinate {0}")]
    InvalidCoordinate(usize),
    #[error("record has too few columns, needed column {column} in {record:?}")]
    MissingColumn { column: usize, record: String },
    #[error("invalid score value: {0}")]
    InvalidScore(#[from] ParseFloatError),
    #[error("RocksDB problem: {0}")]
    RocksDb(#[from] rocksdb::Error),
    #[error("could not decode allele properties: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error("column family {0:?} not found")]
    MissingColumnFamily(String),
}

#[derive(thiserror::Error, Debug, Clone)]
pub enum ArgError {
    #[error("Invalid integer coordinates in interval")]
    IntervalInvalidInts(#[from] ParseIntError),
    #[error("Invalid interval, start {start} is after stop {stop}")]
    IntervalInverted { start: u32, stop: u32 },
    #[error("Invalid weight {0}, must be in [0, 1]")]
    InvalidWeight(f32),
}
