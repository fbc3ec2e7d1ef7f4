//! Common utility code for noodles.

use std::io::BufRead;

use noodles_bgzf as bgzf;
use noodles_core::Position;
use noodles_csi::{self as csi, binning_index::index::reference_sequence::bin::Chunk};
use noodles_tabix as tabix;

/// Build TBI for the bgzf-compressed, coordinate-sorted TSV file at `path_src`
/// and write to `path_dst`.
///
/// The first column must be the chromosome and the second column the 1-based
/// position.  Lines starting with `#` are skipped.
pub fn build_tbi<S, D>(path_src: S, path_dst: D) -> Result<(), anyhow::Error>
where
    S: AsRef<std::path::Path>,
    D: AsRef<std::path::Path>,
{
    let mut reader = std::fs::File::open(path_src.as_ref())
        .map(bgzf::Reader::new)
        .map_err(|e| anyhow::anyhow!("error input file for tbi creation: {}", e))?;

    let mut indexer = tabix::index::Indexer::default();
    indexer.set_header(csi::binning_index::index::header::Builder::vcf().build());

    let mut line = String::new();
    let mut start_position = reader.virtual_position();
    let mut line_no = 0usize;
    loop {
        line.clear();
        let bytes = reader
            .read_line(&mut line)
            .map_err(|e| anyhow::anyhow!("problem reading line {}: {}", line_no + 1, e))?;
        if bytes == 0 {
            break;
        }
        line_no += 1;
        let end_position = reader.virtual_position();

        if line.starts_with('#') || line.trim().is_empty() {
            start_position = end_position;
            continue;
        }

        let mut fields = line.trim_end().split('\t');
        let reference_sequence_name = fields
            .next()
            .ok_or_else(|| anyhow::anyhow!("missing chromosome in line {}", line_no))?;
        let pos: usize = fields
            .next()
            .ok_or_else(|| anyhow::anyhow!("missing position in line {}", line_no))?
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid position in line {}: {}", line_no, e))?;
        let start = Position::try_from(pos)
            .map_err(|e| anyhow::anyhow!("error converting start position: {}", e))?;

        let chunk = Chunk::new(start_position, end_position);
        indexer
            .add_record(reference_sequence_name, start, start, chunk)
            .map_err(|e| anyhow::anyhow!("error adding record to tabix index: {}", e))?;

        start_position = end_position;
    }

    let index = indexer.build();
    tabix::write(path_dst.as_ref(), &index)
        .map_err(|e| anyhow::anyhow!("error writing tabix index: {}", e))?;

    tracing::debug!(
        "wrote tabix index for {} lines to {:?}",
        line_no,
        path_dst.as_ref()
    );

    Ok(())
}

/// Write `lines` as a bgzf-compressed file to `path`.
pub fn write_bgzf_lines<P, I, L>(path: P, lines: I) -> Result<(), anyhow::Error>
where
    P: AsRef<std::path::Path>,
    I: IntoIterator<Item = L>,
    L: AsRef<str>,
{
    use std::io::Write;

    let mut writer = std::fs::File::create(path.as_ref())
        .map(bgzf::Writer::new)
        .map_err(|e| anyhow::anyhow!("error creating bgzf file: {}", e))?;
    for line in lines {
        writer.write_all(line.as_ref().as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer
        .finish()
        .map_err(|e| anyhow::anyhow!("error finishing bgzf file: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod test {
    #[test]
    fn build_tbi() -> Result<(), anyhow::Error> {
        let tmpdir = temp_testdir::TempDir::default();
        let path_in = tmpdir.join("scores.tsv.gz");
        let path_out = tmpdir.join("scores.tsv.gz.tbi");

        super::write_bgzf_lines(
            &path_in,
            [
                "#chrom\tpos\tref\talt\tscore",
                "1\t1000\tA\tT\t0.42",
                "1\t1000\tA\tC\t0.13",
                "2\t5000\tG\tA\t0.99",
            ],
        )?;
        super::build_tbi(&path_in, &path_out)?;

        assert!(path_out.exists());
        let index = noodles_tabix::read(&path_out)?;
        assert_eq!(index.reference_sequences().len(), 2);

        Ok(())
    }

    #[test]
    fn build_tbi_fails_on_invalid_position() -> Result<(), anyhow::Error> {
        let tmpdir = temp_testdir::TempDir::default();
        let path_in = tmpdir.join("scores.tsv.gz");
        let path_out = tmpdir.join("scores.tsv.gz.tbi");

        super::write_bgzf_lines(&path_in, ["1\tnot-a-number\tA\tT\t0.42"])?;

        assert!(super::build_tbi(&path_in, &path_out).is_err());

        Ok(())
    }
}
