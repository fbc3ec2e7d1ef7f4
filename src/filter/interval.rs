use super::VariantFilter;
use crate::{
    common::canonicalize,
    err::ArgError,
    model::{FilterKind, FilterResult, VariantEvaluation},
};

/// 1-based, closed range on a chromosome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Range {
    pub start: u32,
    pub stop: u32,
}

/// A chromosome, optionally restricted to a range.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GenomicRegion {
    pub chrom: String,
    pub range: Option<Range>,
}

impl GenomicRegion {
    /// Whether the region overlaps `chrom:start-stop`.
    pub fn overlaps(&self, chrom: &str, start: u32, stop: u32) -> bool {
        if canonicalize(&self.chrom) != canonicalize(chrom) {
            return false;
        }
        match self.range {
            Some(Range {
                start: region_start,
                stop: region_stop,
            }) => region_start <= stop && region_stop >= start,
            None => true,
        }
    }
}

/// Parse `chrom` or `chrom:start-stop`, thousands separators allowed.
impl std::str::FromStr for GenomicRegion {
    type Err = ArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once(':') {
            Some((chrom, range)) => {
                let (start, stop) = range.split_once('-').unwrap_or((range, range));
                let start: u32 = start.replace(',', "").parse()?;
                let stop: u32 = stop.replace(',', "").parse()?;
                if start > stop {
                    return Err(ArgError::IntervalInverted { start, stop });
                }
                Ok(Self {
                    chrom: chrom.to_string(),
                    range: Some(Range { start, stop }),
                })
            }
            None => Ok(Self {
                chrom: s.to_string(),
                range: None,
            }),
        }
    }
}

/// Only keep variants in the given regions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalFilter {
    regions: Vec<GenomicRegion>,
}

impl IntervalFilter {
    pub fn new(regions: Vec<GenomicRegion>) -> Self {
        Self { regions }
    }
}

impl VariantFilter for IntervalFilter {
    fn kind(&self) -> FilterKind {
        FilterKind::Interval
    }

    fn run(&self, evaluation: &VariantEvaluation) -> FilterResult {
        let variant = evaluation.variant();
        if self.regions.is_empty()
            || self
                .regions
                .iter()
                .any(|region| region.overlaps(&variant.chrom, variant.pos, variant.end()))
        {
            FilterResult::pass(FilterKind::Interval, 1.0)
        } else {
            tracing::trace!("variant {} fails interval filter", variant);
            FilterResult::fail(FilterKind::Interval, 1.0)
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::model::Variant;

    #[rstest]
    #[case("1", Some((100, 200)), "1", 100, 200, true)]
    #[case("chr1", Some((100, 200)), "1", 100, 200, true)]
    #[case("chr1", Some((100, 200)), "chr1", 200, 300, true)]
    #[case("chr1", Some((100, 200)), "chr1", 201, 300, false)]
    #[case("chr1", Some((100, 200)), "chr1", 1, 99, false)]
    #[case("chr1", None, "chr1", 1, 99, true)]
    #[case("chr2", None, "chr1", 1, 99, false)]
    fn overlaps(
        #[case] region_chrom: &str,
        #[case] region_range: Option<(u32, u32)>,
        #[case] chrom: &str,
        #[case] start: u32,
        #[case] stop: u32,
        #[case] expected: bool,
    ) {
        let region = GenomicRegion {
            chrom: region_chrom.to_string(),
            range: region_range.map(|(start, stop)| Range { start, stop }),
        };

        assert_eq!(region.overlaps(chrom, start, stop), expected);
    }

    #[rstest]
    #[case("chrX", GenomicRegion { chrom: "chrX".into(), range: None })]
    #[case(
        "1:1,000-2,000",
        GenomicRegion { chrom: "1".into(), range: Some(Range { start: 1000, stop: 2000 }) }
    )]
    #[case(
        "1:1000",
        GenomicRegion { chrom: "1".into(), range: Some(Range { start: 1000, stop: 1000 }) }
    )]
    fn parse(#[case] s: &str, #[case] expected: GenomicRegion) -> Result<(), anyhow::Error> {
        assert_eq!(s.parse::<GenomicRegion>()?, expected);
        Ok(())
    }

    #[test]
    fn parse_invalid() {
        assert!(matches!(
            "1:abc-200".parse::<GenomicRegion>(),
            Err(ArgError::IntervalInvalidInts(_))
        ));
    }

    #[test]
    fn parse_inverted_range() {
        assert!(matches!(
            "1:500-100".parse::<GenomicRegion>(),
            Err(ArgError::IntervalInverted {
                start: 500,
                stop: 100
            })
        ));
    }

    #[rstest]
    #[case(vec![], true)]
    #[case(vec!["1:900-1000"], true)]
    #[case(vec!["2", "1:1001-1100"], true)]
    #[case(vec!["2", "1:1002-1100"], false)]
    fn run(#[case] regions: Vec<&str>, #[case] expected: bool) -> Result<(), anyhow::Error> {
        let filter = IntervalFilter::new(
            regions
                .iter()
                .map(|s| s.parse())
                .collect::<Result<Vec<_>, _>>()?,
        );
        let ve = VariantEvaluation::new(Variant {
            chrom: "1".into(),
            pos: 1000,
            reference: "AC".into(),
            alternative: "A".into(),
            ..Default::default()
        });

        assert_eq!(filter.run(&ve).passed(), expected);
        Ok(())
    }
}
