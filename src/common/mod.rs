//! Common functionality.

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};

pub mod io;
pub mod noodles;

/// Commonly used command line arguments.
#[derive(Parser, Debug)]
pub struct Args {
    /// Verbosity of the program
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            verbose: Verbosity::new(0, 0),
        }
    }
}

/// Helper to print the current memory resident set size via `tracing`.
pub fn trace_rss_now() {
    let rss = procfs::process::Process::myself()
        .and_then(|me| me.stat())
        .map(|stat| stat.rss * procfs::page_size());
    match rss {
        Ok(rss) => tracing::debug!(
            "RSS now: {:.2}",
            byte_unit::Byte::from_u64(rss).get_appropriate_unit(byte_unit::UnitType::Binary)
        ),
        Err(e) => tracing::debug!("could not determine RSS: {}", e),
    }
}

/// Return the version of the `varprio` crate and `x.y.z` in tests.
pub fn worker_version() -> &'static str {
    if cfg!(test) {
        "x.y.z"
    } else {
        env!("CARGO_PKG_VERSION")
    }
}

/// Canonicalize chromosome name.
///
/// Strips a leading `chr` (in any case), upper-cases `X`/`Y` and maps `M` to
/// `MT`.  Unknown names are returned without the prefix.
pub fn canonicalize(chrom: &str) -> String {
    let stripped = match (chrom.get(..3), chrom.get(3..)) {
        (Some(prefix), Some(rest)) if !rest.is_empty() && prefix.eq_ignore_ascii_case("chr") => {
            rest
        }
        _ => chrom,
    };
    match stripped.to_ascii_uppercase().as_str() {
        "X" => "X".to_string(),
        "Y" => "Y".to_string(),
        "M" | "MT" => "MT".to_string(),
        _ => stripped.to_string(),
    }
}

/// Select the genome release to use.
#[derive(
    clap::ValueEnum,
    Clone,
    Copy,
    Debug,
    Default,
    strum::Display,
    PartialEq,
    Eq,
    enum_map::Enum,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GenomeRelease {
    /// GRCh37 / hg19
    #[default]
    #[strum(serialize = "grch37")]
    Grch37,
    /// GRCh38 / hg38
    #[strum(serialize = "grch38")]
    Grch38,
}

impl GenomeRelease {
    pub fn name(&self) -> String {
        match self {
            GenomeRelease::Grch37 => String::from("GRCh37"),
            GenomeRelease::Grch38 => String::from("GRCh38"),
        }
    }
}

impl std::str::FromStr for GenomeRelease {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_ascii_lowercase();
        if s.starts_with("grch37") || s == "hg19" {
            Ok(GenomeRelease::Grch37)
        } else if s.starts_with("grch38") || s == "hg38" {
            Ok(GenomeRelease::Grch38)
        } else {
            Err(anyhow::anyhow!("Unknown genome release: {}", s))
        }
    }
}

/// Helper type for encoding genotypes in parsing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Genotype {
    /// hom. ref.
    HomRef,
    /// het.
    Het,
    /// hom. alt.
    HomAlt,
    /// other, includes no-call
    #[default]
    WithNoCall,
}

impl std::str::FromStr for Genotype {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "0/0" | "0|0" | "0" => Genotype::HomRef,
            "0/1" | "1/0" | "0|1" | "1|0" => Genotype::Het,
            "1/1" | "1|1" | "1" => Genotype::HomAlt,
            "./." | ".|." | "." | "./0" | "./1" | "0/." | "1/." => Genotype::WithNoCall,
            _ => anyhow::bail!("invalid genotype value: {:?}", s),
        })
    }
}

impl<'de> serde::Deserialize<'de> for Genotype {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Coarse chromosome class used for inheritance computations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Chrom {
    Auto,
    X,
    Y,
    Mt,
}

impl From<&str> for Chrom {
    fn from(s: &str) -> Self {
        match canonicalize(s).as_str() {
            "X" => Chrom::X,
            "Y" => Chrom::Y,
            "MT" => Chrom::Mt,
            _ => Chrom::Auto,
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("1", "1")]
    #[case("chr1", "1")]
    #[case("CHR22", "22")]
    #[case("chrX", "X")]
    #[case("x", "X")]
    #[case("chrY", "Y")]
    #[case("chrM", "MT")]
    #[case("MT", "MT")]
    #[case("GL000192.1", "GL000192.1")]
    fn canonicalize(#[case] chrom: &str, #[case] expected: &str) {
        assert_eq!(super::canonicalize(chrom), expected);
    }

    #[rstest]
    #[case("GRCh37", GenomeRelease::Grch37)]
    #[case("grch37p10", GenomeRelease::Grch37)]
    #[case("hg38", GenomeRelease::Grch38)]
    #[case("GRCh38", GenomeRelease::Grch38)]
    fn genome_release_from_str(
        #[case] s: &str,
        #[case] expected: GenomeRelease,
    ) -> Result<(), anyhow::Error> {
        assert_eq!(s.parse::<GenomeRelease>()?, expected);
        Ok(())
    }

    #[test]
    fn genome_release_from_str_invalid() {
        assert!("hg18".parse::<GenomeRelease>().is_err());
    }

    #[rstest]
    #[case("0/1", Genotype::Het)]
    #[case("1|0", Genotype::Het)]
    #[case("1/1", Genotype::HomAlt)]
    #[case("0/0", Genotype::HomRef)]
    #[case("./.", Genotype::WithNoCall)]
    fn genotype_from_str(
        #[case] s: &str,
        #[case] expected: Genotype,
    ) -> Result<(), anyhow::Error> {
        assert_eq!(s.parse::<Genotype>()?, expected);
        Ok(())
    }

    #[rstest]
    #[case("chrX", Chrom::X)]
    #[case("Y", Chrom::Y)]
    #[case("chrM", Chrom::Mt)]
    #[case("17", Chrom::Auto)]
    fn chrom_from_str(#[case] s: &str, #[case] expected: Chrom) {
        assert_eq!(Chrom::from(s), expected);
    }
}
