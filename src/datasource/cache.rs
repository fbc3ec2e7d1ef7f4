//! Memoizing wrapper around pathogenicity data sources.

use moka::sync::Cache;

use super::PathogenicityDataSource;
use crate::{
    common::{canonicalize, GenomeRelease},
    model::{PathogenicityScore, PathogenicitySource, Variant},
};

/// Default number of cached lookups per source.
pub const DEFAULT_CAPACITY: u64 = 100_000;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    genome_release: GenomeRelease,
    chrom: String,
    pos: u32,
    reference: String,
    alternative: String,
}

impl From<&Variant> for CacheKey {
    fn from(variant: &Variant) -> Self {
        Self {
            genome_release: variant.genome_release,
            chrom: canonicalize(&variant.chrom),
            pos: variant.pos,
            reference: variant.reference.clone(),
            alternative: variant.alternative.clone(),
        }
    }
}

/// Caches the results of `inner`, including "no score" answers.
pub struct CachingDataSource<S> {
    inner: S,
    cache: Cache<CacheKey, Option<PathogenicityScore>>,
}

impl<S: PathogenicityDataSource> CachingDataSource<S> {
    pub fn new(inner: S, max_capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::builder().max_capacity(max_capacity).build(),
        }
    }
}

impl<S: PathogenicityDataSource> PathogenicityDataSource for CachingDataSource<S> {
    fn source(&self) -> PathogenicitySource {
        self.inner.source()
    }

    fn lookup(&self, variant: &Variant) -> Option<PathogenicityScore> {
        self.cache
            .get_with(CacheKey::from(variant), || self.inner.lookup(variant))
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl PathogenicityDataSource for &Counting {
        fn source(&self) -> PathogenicitySource {
            PathogenicitySource::Dann
        }

        fn lookup(&self, variant: &Variant) -> Option<PathogenicityScore> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (variant.alternative == "T")
                .then(|| PathogenicityScore::new(PathogenicitySource::Dann, 0.42))
        }
    }

    fn variant(chrom: &str, alternative: &str) -> Variant {
        Variant {
            chrom: chrom.into(),
            pos: 1000,
            reference: "A".into(),
            alternative: alternative.into(),
            ..Default::default()
        }
    }

    #[test]
    fn second_lookup_is_served_from_cache() {
        let counting = Counting::default();
        let source = CachingDataSource::new(&counting, 10);

        let first = source.lookup(&variant("1", "T"));
        let second = source.lookup(&variant("chr1", "T"));

        assert_eq!(first, second);
        assert_eq!(
            first,
            Some(PathogenicityScore::new(PathogenicitySource::Dann, 0.42))
        );
        assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn misses_are_cached_too() {
        let counting = Counting::default();
        let source = CachingDataSource::new(&counting, 10);

        assert_eq!(source.lookup(&variant("1", "G")), None);
        assert_eq!(source.lookup(&variant("1", "G")), None);
        assert_eq!(source.lookup(&variant("1", "T")).map(|s| s.score), Some(0.42));

        assert_eq!(counting.calls.load(Ordering::SeqCst), 2);
        assert_eq!(source.source(), PathogenicitySource::Dann);
    }
}
