//! A fixed-line-width FASTA index.
//!
//! Each row of the index describes where the bases of one contig live within
//! the companion FASTA file: the total number of bases, the byte offset of the
//! first base, and the line layout (bases per line and bytes per line,
//! including the line terminator). The layout is all that is needed to turn a
//! 1-based position into a byte offset without reading anything else.

use std::collections::HashMap;
use std::io::BufRead;
use std::io::{self};
use std::num::ParseIntError;
use std::str::FromStr;

use omics::coordinate::position::Number;
use tracing::debug;
use tracing::warn;

/// The delimiter for an index record.
const DELIMITER: char = '\t';

/// The number of expected fields in an index record.
pub const NUM_INDEX_FIELDS: usize = 5;

/// The prefix for a FASTA header line.
const FASTA_HEADER_PREFIX: u8 = b'>';

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error associated with parsing an index record.
#[derive(Debug)]
pub enum ParseError {
    /// An incorrect number of fields in the index line.
    IncorrectNumberOfFields(usize),

    /// An invalid contig length.
    InvalidLength(ParseIntError),

    /// An invalid byte offset.
    InvalidOffset(ParseIntError),

    /// An invalid number of bases per line.
    InvalidLineBases(ParseIntError),

    /// An invalid number of bytes per line.
    InvalidLineWidth(ParseIntError),

    /// A line layout that cannot address any base.
    InvalidLineLayout(Number, Number),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(n) => write!(
                f,
                "invalid number of fields in index record: expected at least \
                 {NUM_INDEX_FIELDS} fields, found {n} fields"
            ),
            ParseError::InvalidLength(err) => write!(f, "invalid length: {err}"),
            ParseError::InvalidOffset(err) => write!(f, "invalid offset: {err}"),
            ParseError::InvalidLineBases(err) => write!(f, "invalid line bases: {err}"),
            ParseError::InvalidLineWidth(err) => write!(f, "invalid line width: {err}"),
            ParseError::InvalidLineLayout(bases, width) => write!(
                f,
                "invalid line layout: {bases} bases per line in {width} bytes per line"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// An error related to an [`Index`].
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
    Io(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Record
////////////////////////////////////////////////////////////////////////////////////////

/// The byte layout of a single contig within a FASTA file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    /// The contig name.
    name: String,

    /// The total number of bases.
    length: Number,

    /// The byte offset of the first base.
    offset: Number,

    /// The number of bases on each full line.
    line_bases: Number,

    /// The number of bytes on each full line, including the terminator.
    line_width: Number,
}

impl Record {
    /// Creates a new [`Record`].
    ///
    /// # Examples
    ///
    /// ```
    /// use contigpath::index::Record;
    ///
    /// let record = Record::try_new("chr1", 248956422, 6, 60, 61)?;
    /// assert_eq!(record.name(), "chr1");
    /// assert_eq!(record.length(), 248956422);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(
        name: impl Into<String>,
        length: Number,
        offset: Number,
        line_bases: Number,
        line_width: Number,
    ) -> std::result::Result<Self, ParseError> {
        if line_bases == 0 || line_width < line_bases {
            return Err(ParseError::InvalidLineLayout(line_bases, line_width));
        }

        Ok(Self {
            name: name.into(),
            length,
            offset,
            line_bases,
            line_width,
        })
    }

    /// Gets the contig name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the total number of bases.
    pub fn length(&self) -> Number {
        self.length
    }

    /// Gets the byte offset of the first base.
    pub fn offset(&self) -> Number {
        self.offset
    }

    /// Gets the number of bases per line.
    pub fn line_bases(&self) -> Number {
        self.line_bases
    }

    /// Gets the number of bytes per line.
    pub fn line_width(&self) -> Number {
        self.line_width
    }

    /// Computes the byte offset of a 1-based `position` within the FASTA file.
    ///
    /// # Examples
    ///
    /// ```
    /// use contigpath::index::Record;
    ///
    /// let record = Record::try_new("seq0", 130, 6, 60, 61)?;
    ///
    /// assert_eq!(record.byte_offset(1), 6);
    /// assert_eq!(record.byte_offset(60), 65);
    /// // Skips over the newline ending the first line.
    /// assert_eq!(record.byte_offset(61), 67);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn byte_offset(&self, position: Number) -> Number {
        let zero_based = position.saturating_sub(1);
        self.offset
            + (zero_based / self.line_bases) * self.line_width
            + (zero_based % self.line_bases)
    }
}

impl FromStr for Record {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts = s.split(DELIMITER).collect::<Vec<_>>();
        if parts.len() < NUM_INDEX_FIELDS {
            return Err(ParseError::IncorrectNumberOfFields(parts.len()));
        }

        let length = parts[1].trim().parse().map_err(ParseError::InvalidLength)?;
        let offset = parts[2].trim().parse().map_err(ParseError::InvalidOffset)?;
        let line_bases = parts[3]
            .trim()
            .parse()
            .map_err(ParseError::InvalidLineBases)?;
        let line_width = parts[4]
            .trim()
            .parse()
            .map_err(ParseError::InvalidLineWidth)?;

        Record::try_new(parts[0], length, offset, line_bases, line_width)
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
            self.name, self.length, self.offset, self.line_bases, self.line_width
        )
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Index
////////////////////////////////////////////////////////////////////////////////////////

/// A lookup table from contig name to its byte layout.
///
/// Records keep the order in which they were read, which is the order the
/// contigs appear within the FASTA file.
#[derive(Clone, Debug, Default)]
pub struct Index {
    /// The records in file order.
    records: Vec<Record>,

    /// The position of each record by contig name.
    by_name: HashMap<String, usize>,
}

impl Index {
    /// Reads an index from its tab-separated text form.
    ///
    /// Rows that cannot be parsed are skipped; looking their contig up later
    /// behaves exactly as if the contig were absent.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"seq0\t120\t6\t60\t61\nseq1\t10\t135\t60\t61\n";
    /// let index = contigpath::index::Index::read(&data[..])?;
    ///
    /// assert_eq!(index.len(), 2);
    /// assert_eq!(index.get("seq1").unwrap().offset(), 135);
    /// assert!(index.get("seq2").is_none());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn read<T>(mut reader: T) -> Result<Self>
    where
        T: BufRead,
    {
        let mut index = Self::default();
        let mut buffer = Vec::new();
        let mut line_no = 0usize;

        loop {
            buffer.clear();
            if reader
                .read_until(b'\n', &mut buffer)
                .map_err(Error::Io)?
                == 0
            {
                break;
            }

            line_no += 1;
            let Ok(line) = std::str::from_utf8(&buffer) else {
                warn!("skipping index line {line_no}: not valid UTF-8");
                continue;
            };
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                continue;
            }

            match line.parse::<Record>() {
                Ok(record) => index.push(record),
                Err(err) => warn!("skipping index line {line_no}: {err}"),
            }
        }

        debug!("read {} index records", index.len());
        Ok(index)
    }

    /// Builds an index by scanning a FASTA file.
    ///
    /// The line layout of each contig is taken from its first sequence line,
    /// matching the fixed-line-width assumption of the index format.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b">seq0 description\nACGT\nAC\n>seq1\nGG\n";
    /// let index = contigpath::index::Index::scan_fasta(&data[..])?;
    ///
    /// let seq0 = index.get("seq0").unwrap();
    /// assert_eq!(seq0.length(), 6);
    /// assert_eq!(seq0.offset(), 18);
    /// assert_eq!(seq0.line_bases(), 4);
    /// assert_eq!(seq0.line_width(), 5);
    ///
    /// let seq1 = index.get("seq1").unwrap();
    /// assert_eq!(seq1.length(), 2);
    /// assert_eq!(seq1.offset(), 32);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn scan_fasta<T>(mut reader: T) -> Result<Self>
    where
        T: BufRead,
    {
        let mut index = Self::default();
        let mut buffer = Vec::new();
        let mut position: Number = 0;
        let mut current: Option<Scan> = None;

        loop {
            buffer.clear();
            let read = reader
                .read_until(b'\n', &mut buffer)
                .map_err(Error::Io)? as Number;

            if read == 0 {
                break;
            }

            if buffer.first() == Some(&FASTA_HEADER_PREFIX) {
                if let Some(scan) = current.take() {
                    index.push_scan(scan);
                }

                let header = String::from_utf8_lossy(&buffer[1..]);
                let name = header.split_whitespace().next().unwrap_or_default();
                current = Some(Scan::new(name, position + read));
            } else if let Some(scan) = current.as_mut() {
                let bases = buffer
                    .iter()
                    .filter(|b| !b.is_ascii_whitespace())
                    .count() as Number;
                scan.observe_line(bases, read);
            }

            position += read;
        }

        if let Some(scan) = current.take() {
            index.push_scan(scan);
        }

        debug!("scanned {} contigs from FASTA", index.len());
        Ok(index)
    }

    /// Gets the record for a contig, if it exists.
    pub fn get(&self, name: &str) -> Option<&Record> {
        self.by_name.get(name).map(|i| &self.records[*i])
    }

    /// Returns whether the index contains a contig.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Gets the records in file order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Gets the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Adds a record, replacing any earlier record of the same name in place.
    fn push(&mut self, record: Record) {
        match self.by_name.get(record.name()) {
            Some(i) => self.records[*i] = record,
            None => {
                self.by_name
                    .insert(record.name().to_string(), self.records.len());
                self.records.push(record);
            }
        }
    }

    /// Finalizes a FASTA scan into a record.
    fn push_scan(&mut self, scan: Scan) {
        let name = scan.name.clone();
        match scan.into_record() {
            Ok(record) => self.push(record),
            Err(err) => warn!("skipping contig `{name}` from FASTA scan: {err}"),
        }
    }
}

/// The running state for a single contig while scanning a FASTA file.
#[derive(Debug)]
struct Scan {
    /// The contig name.
    name: String,

    /// The byte offset of the first base.
    offset: Number,

    /// The number of bases seen so far.
    length: Number,

    /// The layout of the first sequence line.
    layout: Option<(Number, Number)>,
}

impl Scan {
    /// Starts scanning a contig whose bases begin at `offset`.
    fn new(name: &str, offset: Number) -> Self {
        Self {
            name: name.to_string(),
            offset,
            length: 0,
            layout: None,
        }
    }

    /// Records a sequence line of `bases` bases spanning `bytes` bytes.
    fn observe_line(&mut self, bases: Number, bytes: Number) {
        if self.layout.is_none() && bases > 0 {
            self.layout = Some((bases, bytes));
        }

        self.length += bases;
    }

    /// Converts the finished scan into an index record.
    fn into_record(self) -> std::result::Result<Record, ParseError> {
        // An empty contig has no line layout; give it a one-base layout so
        // that it is still addressable by name.
        let (line_bases, line_width) = self.layout.unwrap_or((1, 1));
        Record::try_new(self.name, self.length, self.offset, line_bases, line_width)
    }
}
