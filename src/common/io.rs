//! Reading and writing of optionally gzip-compressed files.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use flate2::{bufread::MultiGzDecoder, write::GzEncoder, Compression};

/// Whether `path` is to be treated as gzip-compressed.
fn is_gz(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("gz")
}

/// Open `path` for reading, decompressing if it ends in `.gz`.
///
/// Concatenated gzip members, as written by bgzf, are read as one stream.
pub fn open_read_maybe_gz<P>(path: P) -> Result<Box<dyn BufRead>, anyhow::Error>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .map(BufReader::new)
        .map_err(|e| anyhow::anyhow!("could not open {} for reading: {}", path.display(), e))?;
    if is_gz(path) {
        tracing::trace!("reading {:?} as gzip", path);
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        tracing::trace!("reading {:?} as plain text", path);
        Ok(Box::new(file))
    }
}

/// Open `path` for writing, compressing if it ends in `.gz`.
pub fn open_write_maybe_gz<P>(path: P) -> Result<Box<dyn Write>, anyhow::Error>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::create(path)
        .map(BufWriter::new)
        .map_err(|e| anyhow::anyhow!("could not create {}: {}", path.display(), e))?;
    if is_gz(path) {
        tracing::trace!("writing {:?} as gzip", path);
        Ok(Box::new(GzEncoder::new(file, Compression::default())))
    } else {
        tracing::trace!("writing {:?} as plain text", path);
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod test {
    use std::io::{Read, Write};

    use pretty_assertions::assert_eq;

    #[rstest::rstest]
    #[case("test.txt")]
    #[case("test.txt.gz")]
    fn write_then_read_maybe_gz(#[case] filename: &str) -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();

        {
            let mut f = super::open_write_maybe_gz(tmp_dir.join(filename))?;
            f.write_all(b"chrom\tpos\n1\t1000\n")?;
            f.flush()?;
        }

        let mut f = super::open_read_maybe_gz(tmp_dir.join(filename))?;
        let mut buf = String::new();
        f.read_to_string(&mut buf)?;

        assert_eq!(buf, "chrom\tpos\n1\t1000\n");

        Ok(())
    }

    #[test]
    fn gz_file_is_compressed() -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        {
            let mut f = super::open_write_maybe_gz(tmp_dir.join("x.tsv.gz"))?;
            f.write_all(b"payload")?;
        }

        let mut raw = Vec::new();
        std::fs::File::open(tmp_dir.join("x.tsv.gz"))?.read_to_end(&mut raw)?;
        assert_eq!(&raw[..2], &[0x1f, 0x8b]);

        Ok(())
    }
}
