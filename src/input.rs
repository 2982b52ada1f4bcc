//! Opening plain or gzip-compressed inputs.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::{self};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use tracing::debug;

/// The magic bytes that open every gzip member.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Wraps `reader` in a gzip decoder if it starts with the gzip magic bytes.
///
/// Concatenated (and so also block-compressed) members are decoded as a
/// single stream.
///
/// # Examples
///
/// ```
/// use std::io::Read as _;
///
/// use contigpath::input;
///
/// let mut reader = input::decode(&b"plain text"[..])?;
/// let mut text = String::new();
/// reader.read_to_string(&mut text)?;
///
/// assert_eq!(text, "plain text");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn decode<'a, R>(mut reader: R) -> io::Result<Box<dyn BufRead + 'a>>
where
    R: BufRead + 'a,
{
    let compressed = reader.fill_buf()?.starts_with(&GZIP_MAGIC);

    if compressed {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

/// Opens a file, transparently decompressing gzip.
pub fn open<P>(path: P) -> io::Result<Box<dyn BufRead>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    debug!("opening {}", path.display());

    decode(BufReader::new(File::open(path)?))
}

#[cfg(test)]
mod tests {
    use std::io::Read as _;
    use std::io::Write as _;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::*;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn gzip_is_decoded() -> Result<(), Box<dyn std::error::Error>> {
        let compressed = gzip(b"A\t1000\t0\t60\t61\n");

        let mut text = String::new();
        decode(&compressed[..])?.read_to_string(&mut text)?;

        assert_eq!(text, "A\t1000\t0\t60\t61\n");

        Ok(())
    }

    #[test]
    fn concatenated_members_are_decoded() -> Result<(), Box<dyn std::error::Error>> {
        let mut compressed = gzip(b"first\n");
        compressed.extend(gzip(b"second\n"));

        let lines = decode(&compressed[..])?
            .lines()
            .collect::<io::Result<Vec<_>>>()?;

        assert_eq!(lines, vec!["first", "second"]);

        Ok(())
    }

    #[test]
    fn empty_input() -> Result<(), Box<dyn std::error::Error>> {
        let mut text = String::new();
        decode(&b""[..])?.read_to_string(&mut text)?;

        assert!(text.is_empty());

        Ok(())
    }
}
