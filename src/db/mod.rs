//! Code supporting the `db *` sub commands.

pub mod build_alleles;
pub mod index_scores;
