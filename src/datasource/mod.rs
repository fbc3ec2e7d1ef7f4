//! Sources of precomputed pathogenicity scores.
//!
//! Every source answers lookups for a single variant.  Read failures are
//! logged and reported as "no score" so that one broken file does not stop
//! the whole run.

pub mod alleles;
pub mod cache;
pub mod cadd;
pub mod dann;
pub mod ncboost;
pub mod remm;
pub mod tabix;

use crate::model::{PathogenicityScore, PathogenicitySource, Variant, VariantEvaluation};

/// Lookup of a pathogenicity score for one variant.
pub trait PathogenicityDataSource: Send + Sync {
    /// The source the returned scores are attributed to.
    fn source(&self) -> PathogenicitySource;

    /// Score for `variant`, `None` if the source has no data for it.
    fn lookup(&self, variant: &Variant) -> Option<PathogenicityScore>;
}

impl<T: PathogenicityDataSource + ?Sized> PathogenicityDataSource for Box<T> {
    fn source(&self) -> PathogenicitySource {
        (**self).source()
    }

    fn lookup(&self, variant: &Variant) -> Option<PathogenicityScore> {
        (**self).lookup(variant)
    }
}

/// Attach scores from all configured sources to variant evaluations.
#[derive(Default)]
pub struct PathogenicityAnnotator {
    sources: Vec<Box<dyn PathogenicityDataSource>>,
}

impl PathogenicityAnnotator {
    pub fn new(sources: Vec<Box<dyn PathogenicityDataSource>>) -> Self {
        Self { sources }
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn sources(&self) -> impl Iterator<Item = PathogenicitySource> + '_ {
        self.sources.iter().map(|source| source.source())
    }

    /// Merge the scores of all sources into `evaluation`.
    ///
    /// Scores already present on the evaluation are kept unless a source
    /// provides a score for the same source kind.
    pub fn annotate(&self, evaluation: &mut VariantEvaluation) {
        if self.sources.is_empty() {
            return;
        }
        let mut data = evaluation.pathogenicity().clone();
        for source in &self.sources {
            if let Some(score) = source.lookup(evaluation.variant()) {
                data.add(score);
            }
        }
        evaluation.set_pathogenicity(data);
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::PathogenicityData;

    struct Fixed(PathogenicitySource, Option<f32>);

    impl PathogenicityDataSource for Fixed {
        fn source(&self) -> PathogenicitySource {
            self.0
        }

        fn lookup(&self, _variant: &Variant) -> Option<PathogenicityScore> {
            self.1.map(|score| PathogenicityScore::new(self.0, score))
        }
    }

    #[test]
    fn annotate_merges_sources() {
        let annotator = PathogenicityAnnotator::new(vec![
            Box::new(Fixed(PathogenicitySource::Dann, Some(0.42))),
            Box::new(Fixed(PathogenicitySource::Cadd, None)),
            Box::new(Fixed(PathogenicitySource::Remm, Some(0.9))),
        ]);
        let mut ve = VariantEvaluation::new(Variant::default());
        ve.set_pathogenicity(PathogenicityData::of([PathogenicityScore::new(
            PathogenicitySource::Polyphen,
            0.7,
        )]));

        annotator.annotate(&mut ve);

        assert_eq!(
            ve.pathogenicity().scores().collect::<Vec<_>>(),
            vec![
                PathogenicityScore::new(PathogenicitySource::Polyphen, 0.7),
                PathogenicityScore::new(PathogenicitySource::Dann, 0.42),
                PathogenicityScore::new(PathogenicitySource::Remm, 0.9),
            ]
        );
        assert_eq!(
            annotator.sources().collect::<Vec<_>>(),
            vec![
                PathogenicitySource::Dann,
                PathogenicitySource::Cadd,
                PathogenicitySource::Remm
            ]
        );
    }

    #[test]
    fn empty_annotator_keeps_data() {
        let annotator = PathogenicityAnnotator::default();
        let mut ve = VariantEvaluation::new(Variant::default());

        annotator.annotate(&mut ve);

        assert!(annotator.is_empty());
        assert!(!ve.pathogenicity().has_predicted_score());
    }
}
