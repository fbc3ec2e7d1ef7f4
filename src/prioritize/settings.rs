//! Analysis settings, loaded from JSON.

use std::{collections::HashSet, path::Path};

use crate::{
    filter::{
        interval::GenomicRegion, FilterRunMode, FilterRunner, FrequencyFilter, GeneIdFilter,
        InheritanceFilter, IntervalFilter, PathogenicityFilter, QualityFilter, TargetFilter,
    },
    model::ModeOfInheritance,
    scoring::{GeneScorer, ScoringPolicy},
};

/// Settings of one `prioritize` run.
///
/// All fields are optional in the JSON file.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PrioritizeSettings {
    /// Mode of inheritance genes must be consistent with.
    pub mode_of_inheritance: ModeOfInheritance,
    pub run_mode: FilterRunMode,
    pub scoring_policy: ScoringPolicy,
    /// Regions (`chrom` or `chrom:start-stop`) to restrict to, empty for all.
    pub regions: Vec<String>,
    /// Gene IDs to restrict to, empty for all.
    pub gene_ids: Vec<u32>,
    /// Remove variants outside of coding and splice regions.
    pub target_filter: bool,
    /// Minimal QUAL, no quality filter if not set.
    pub min_quality: Option<f32>,
    /// Maximal population frequency in percent, no frequency filter if not set.
    pub max_frequency: Option<f32>,
    pub pathogenicity_filter: bool,
    pub keep_non_pathogenic: bool,
}

impl Default for PrioritizeSettings {
    fn default() -> Self {
        Self {
            mode_of_inheritance: ModeOfInheritance::Unspecified,
            run_mode: FilterRunMode::Full,
            scoring_policy: ScoringPolicy::Mean,
            regions: Vec::new(),
            gene_ids: Vec::new(),
            target_filter: true,
            min_quality: None,
            max_frequency: Some(2.0),
            pathogenicity_filter: true,
            keep_non_pathogenic: false,
        }
    }
}

impl PrioritizeSettings {
    /// Load from the JSON file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let reader = std::fs::File::open(path.as_ref()).map_err(|e| {
            anyhow::anyhow!(
                "could not open settings file {}: {}",
                path.as_ref().display(),
                e
            )
        })?;
        let result: Self = serde_json::from_reader(std::io::BufReader::new(reader))
            .map_err(|e| anyhow::anyhow!("could not parse settings: {}", e))?;
        result.validate()?;
        Ok(result)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.scoring_policy.validate()?;
        self.genomic_regions()?;
        Ok(())
    }

    pub fn genomic_regions(&self) -> Result<Vec<GenomicRegion>, anyhow::Error> {
        self.regions
            .iter()
            .map(|region| {
                region
                    .parse::<GenomicRegion>()
                    .map_err(|e| anyhow::anyhow!("invalid region {:?}: {}", region, e))
            })
            .collect()
    }

    /// Filters in order of application.
    pub fn filter_runner(&self) -> Result<FilterRunner, anyhow::Error> {
        let mut runner = FilterRunner::new(self.run_mode);
        if !self.regions.is_empty() {
            runner = runner.with_variant_filter(IntervalFilter::new(self.genomic_regions()?));
        }
        if !self.gene_ids.is_empty() {
            runner = runner.with_variant_filter(GeneIdFilter::new(
                self.gene_ids.iter().copied().collect::<HashSet<_>>(),
            ));
        }
        if self.target_filter {
            runner = runner.with_variant_filter(TargetFilter);
        }
        if let Some(min_quality) = self.min_quality {
            runner = runner.with_variant_filter(QualityFilter::new(min_quality));
        }
        if let Some(max_frequency) = self.max_frequency {
            runner = runner.with_variant_filter(FrequencyFilter::new(max_frequency));
        }
        if self.pathogenicity_filter {
            runner = runner.with_variant_filter(PathogenicityFilter::new(self.keep_non_pathogenic));
        }
        Ok(runner.with_gene_filter(InheritanceFilter::new(self.mode_of_inheritance)))
    }

    pub fn gene_scorer(&self) -> GeneScorer {
        GeneScorer::new(self.scoring_policy, self.mode_of_inheritance)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::FilterKind;

    #[test]
    fn empty_json_gives_defaults() -> Result<(), anyhow::Error> {
        let settings: PrioritizeSettings = serde_json::from_str("{}")?;

        assert_eq!(settings, PrioritizeSettings::default());

        Ok(())
    }

    #[test]
    fn load_from_file() -> Result<(), anyhow::Error> {
        let tmpdir = temp_testdir::TempDir::default();
        let path = tmpdir.join("settings.json");
        std::fs::write(
            &path,
            r#"{
                "mode_of_inheritance": "autosomal_recessive",
                "run_mode": "pass_only",
                "scoring_policy": {"kind": "weighted", "priority_weight": 0.7},
                "regions": ["chr1:1-1,000,000"],
                "min_quality": 20.0,
                "max_frequency": null
            }"#,
        )?;

        let settings = PrioritizeSettings::load(&path)?;

        assert_eq!(
            settings.mode_of_inheritance,
            ModeOfInheritance::AutosomalRecessive
        );
        assert_eq!(settings.run_mode, FilterRunMode::PassOnly);
        assert_eq!(settings.max_frequency, None);
        assert!(settings.target_filter);

        let runner = settings.filter_runner()?;
        assert_eq!(runner.mode(), FilterRunMode::PassOnly);
        assert_eq!(
            runner.variant_filter_kinds(),
            vec![
                FilterKind::Interval,
                FilterKind::Target,
                FilterKind::Quality,
                FilterKind::Pathogenicity
            ]
        );
        assert_eq!(runner.gene_filter_kinds(), vec![FilterKind::Inheritance]);

        Ok(())
    }

    #[test]
    fn invalid_weight_is_rejected() -> Result<(), anyhow::Error> {
        let tmpdir = temp_testdir::TempDir::default();
        let path = tmpdir.join("settings.json");
        std::fs::write(
            &path,
            r#"{"scoring_policy": {"kind": "weighted", "priority_weight": 2.0}}"#,
        )?;

        assert!(PrioritizeSettings::load(&path).is_err());

        Ok(())
    }

    #[test]
    fn invalid_region_is_rejected() {
        let settings = PrioritizeSettings {
            regions: vec!["1:x-y".into()],
            ..Default::default()
        };

        assert!(settings.validate().is_err());
        assert!(settings.filter_runner().is_err());
    }
}
