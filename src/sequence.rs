//! Random access to reference sequence through a genome index.

use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::{self};

use omics::coordinate::position::Number;
use omics::coordinate::Strand;

use crate::alignment::Alignment;
use crate::index::Index;
use crate::navigation::path::thousands;

/// An error related to fetching sequence.
#[derive(Debug)]
pub enum Error {
    /// The contig is not in the index.
    NotFound(String),

    /// The byte range could not be read.
    Io(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NotFound(name) => write!(f, "contig not found in index: {name}"),
            Error::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// Complements a single base, keeping its case.
fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        b'N' => b'N',
        b'a' => b't',
        b't' => b'a',
        b'c' => b'g',
        b'g' => b'c',
        b'n' => b'n',
        other => other,
    }
}

/// Reverse-complements a sequence.
///
/// Characters other than `A`, `C`, `G`, `T` and `N` pass through unchanged.
///
/// # Examples
///
/// ```
/// use contigpath::sequence::reverse_complement;
///
/// assert_eq!(reverse_complement("ACGTN"), "NACGT");
/// assert_eq!(reverse_complement("aCgX"), "XcGt");
/// ```
pub fn reverse_complement(sequence: &str) -> String {
    let bytes = sequence.bytes().rev().map(complement).collect::<Vec<_>>();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Fetches sequence from an indexed FASTA source.
#[derive(Debug)]
pub struct Fetcher<'a, R> {
    /// The index describing the layout of the source.
    index: &'a Index,

    /// The source.
    reader: R,
}

impl<'a, R> Fetcher<'a, R>
where
    R: Read + Seek,
{
    /// Creates a new fetcher.
    pub fn new(index: &'a Index, reader: R) -> Self {
        Self { index, reader }
    }

    /// Consumes the fetcher and returns the source.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Fetches the 1-based, inclusive interval `[start, end]` of a contig.
    ///
    /// The interval is clamped to the contig. An interval that is empty after
    /// clamping yields an empty sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    ///
    /// use contigpath::index::Index;
    /// use contigpath::sequence::Fetcher;
    ///
    /// let fasta = b">chr1\nACGTA\nCGT\n";
    /// let index = Index::scan_fasta(&fasta[..])?;
    /// let mut fetcher = Fetcher::new(&index, Cursor::new(&fasta[..]));
    ///
    /// assert_eq!(fetcher.fetch("chr1", 4, 7)?, "TACG");
    /// assert_eq!(fetcher.fetch("chr1", 0, 100)?, "ACGTACGT");
    /// assert_eq!(fetcher.fetch("chr1", 9, 12)?, "");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn fetch(&mut self, name: &str, start: Number, end: Number) -> Result<String> {
        let record = self
            .index
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;

        let start = start.max(1);
        let end = end.min(record.length());
        if end < start {
            return Ok(String::new());
        }

        let from = record.byte_offset(start);
        let to = record.byte_offset(end);

        let mut buffer = vec![0u8; (to - from + 1) as usize];
        self.reader.seek(SeekFrom::Start(from)).map_err(Error::Io)?;
        self.reader.read_exact(&mut buffer).map_err(Error::Io)?;

        buffer.retain(|b| *b != b'\n' && *b != b'\r');
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Renders both sides of an alignment as viewer text.
    ///
    /// The text holds an `X-axis:` block for the query and a `Y-axis:` block
    /// for the target, each with 1-based inclusive coordinates. The target
    /// sequence of a `-` alignment is reverse-complemented.
    pub fn segment_view(&mut self, alignment: &Alignment) -> Result<String> {
        let query = self.fetch(
            alignment.q_name(),
            alignment.q_start() + 1,
            alignment.q_end(),
        )?;

        let target = self.fetch(
            alignment.t_name(),
            alignment.t_start() + 1,
            alignment.t_end(),
        )?;

        let target = match alignment.strand() {
            Strand::Positive => target,
            Strand::Negative => reverse_complement(&target),
        };

        Ok(format!(
            ">X-axis: {} [{}-{}] (+)\n{}\n>Y-axis: {} [{}-{}] ({})\n{}\n",
            alignment.q_name(),
            thousands(alignment.q_start() + 1),
            thousands(alignment.q_end()),
            query,
            alignment.t_name(),
            thousands(alignment.t_start() + 1),
            thousands(alignment.t_end()),
            alignment.strand(),
            target
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    /// Two 60-base lines followed by a shorter one.
    fn fasta() -> Vec<u8> {
        let line_one = "ACGTACGTAC".repeat(6);
        let line_two = "TTTTTGGGGG".repeat(6);
        format!("{line_one}\n{line_two}\nCCCC\n").into_bytes()
    }

    fn index() -> Index {
        Index::read(&b"chr1\t124\t0\t60\t61\n"[..]).unwrap()
    }

    #[test]
    fn first_line() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let index = index();
        let mut fetcher = Fetcher::new(&index, Cursor::new(fasta()));

        let sequence = fetcher.fetch("chr1", 1, 60)?;
        assert_eq!(sequence, "ACGTACGTAC".repeat(6));
        assert!(!sequence.contains('\n'));

        Ok(())
    }

    #[test]
    fn across_a_line_break() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let index = index();
        let mut fetcher = Fetcher::new(&index, Cursor::new(fasta()));

        let sequence = fetcher.fetch("chr1", 58, 63)?;
        assert_eq!(sequence.len(), 6);
        assert_eq!(sequence, "TACTTT");

        Ok(())
    }

    #[test]
    fn carriage_returns_are_stripped() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let index = Index::read(&b"chr1\t8\t0\t4\t6\n"[..])?;
        let mut fetcher = Fetcher::new(&index, Cursor::new(b"ACGT\r\nTTGG\r\n".to_vec()));

        assert_eq!(fetcher.fetch("chr1", 3, 6)?, "GTTT");

        Ok(())
    }

    #[test]
    fn clamping() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let index = index();
        let mut fetcher = Fetcher::new(&index, Cursor::new(fasta()));

        assert_eq!(fetcher.fetch("chr1", 0, 3)?, "ACG");
        assert_eq!(fetcher.fetch("chr1", 122, 500)?, "CCC");
        assert_eq!(fetcher.fetch("chr1", 10, 9)?, "");
        assert_eq!(fetcher.fetch("chr1", 200, 300)?, "");

        Ok(())
    }

    #[test]
    fn unknown_contig() {
        let index = index();
        let mut fetcher = Fetcher::new(&index, Cursor::new(fasta()));

        assert!(matches!(
            fetcher.fetch("chr2", 1, 10),
            Err(Error::NotFound(name)) if name == "chr2"
        ));
    }

    #[test]
    fn short_source_is_an_io_error() {
        let index = index();
        let mut fetcher = Fetcher::new(&index, Cursor::new(b"ACGT".to_vec()));

        assert!(matches!(fetcher.fetch("chr1", 1, 60), Err(Error::Io(_))));
    }

    #[test]
    fn reverse_complement_is_an_involution() {
        let sequence = "ACGTNacgtnRYK-";
        assert_eq!(reverse_complement(&reverse_complement(sequence)), sequence);
    }

    #[test]
    fn segment_view() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let fasta = b">q\nAACCGGTT\n>t\nACGTTTTT\n";
        let index = Index::scan_fasta(&fasta[..])?;
        let mut fetcher = Fetcher::new(&index, Cursor::new(&fasta[..]));

        let alignment = "0\tq\t2\t4\t+\t8\tt\t4\t4\t-\t8".parse::<Alignment>()?;
        let text = fetcher.segment_view(&alignment)?;

        assert_eq!(
            text,
            ">X-axis: q [3-6] (+)\nCCGG\n>Y-axis: t [1-4] (-)\nACGT\n"
        );

        Ok(())
    }
}
