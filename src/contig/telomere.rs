//! Telomere boundary annotations.

use std::num::ParseIntError;
use std::str::FromStr;

use omics::coordinate::position::Number;
use omics::coordinate::Strand;

/// The delimiter for an annotation record.
const DELIMITER: char = '\t';

/// The minimum number of fields in an annotation record.
pub const NUM_ANNOTATION_FIELDS: usize = 6;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error associated with parsing an annotation record.
#[derive(Debug)]
pub enum ParseError {
    /// An incorrect number of fields in the annotation line.
    IncorrectNumberOfFields(usize),

    /// An invalid start position.
    InvalidStart(ParseIntError),

    /// An invalid end position.
    InvalidEnd(ParseIntError),

    /// The end position comes before the start position.
    EndBeforeStart(Number, Number),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(n) => write!(
                f,
                "invalid number of fields in annotation: expected at least \
                 {NUM_ANNOTATION_FIELDS} fields, found {n} fields"
            ),
            ParseError::InvalidStart(err) => write!(f, "invalid start: {err}"),
            ParseError::InvalidEnd(err) => write!(f, "invalid end: {err}"),
            ParseError::EndBeforeStart(start, end) => {
                write!(f, "the end position ({end}) is before the start ({start})")
            }
        }
    }
}

impl std::error::Error for ParseError {}

////////////////////////////////////////////////////////////////////////////////////////
// Telomere
////////////////////////////////////////////////////////////////////////////////////////

/// A half-open `[start, end)` telomere interval on the forward strand of a
/// contig.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Telomere {
    /// The start position (inclusive).
    start: Number,

    /// The end position (exclusive).
    end: Number,

    /// The strand of the call, if the annotation carries one.
    strand: Option<Strand>,
}

impl Telomere {
    /// Attempts to create a new [`Telomere`].
    ///
    /// `strand` is either a [`Strand`] or `None` for an unstranded call.
    ///
    /// # Examples
    ///
    /// ```
    /// use contigpath::contig::Telomere;
    /// use omics::coordinate::Strand;
    ///
    /// let telomere = Telomere::try_new(0, 150, Strand::Positive)?;
    /// assert_eq!(telomere.len(), 150);
    ///
    /// assert_eq!(telomere.strand(), Some(Strand::Positive));
    ///
    /// let unstranded = Telomere::try_new(900, 1000, None)?;
    /// assert_eq!(unstranded.strand(), None);
    ///
    /// assert!(Telomere::try_new(10, 5, Strand::Positive).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(
        start: Number,
        end: Number,
        strand: impl Into<Option<Strand>>,
    ) -> Result<Self, ParseError> {
        if end < start {
            return Err(ParseError::EndBeforeStart(start, end));
        }

        Ok(Self {
            start,
            end,
            strand: strand.into(),
        })
    }

    /// Gets the start position.
    pub fn start(&self) -> Number {
        self.start
    }

    /// Gets the end position.
    pub fn end(&self) -> Number {
        self.end
    }

    /// Gets the strand, if any.
    pub fn strand(&self) -> Option<Strand> {
        self.strand
    }

    /// Gets the length of the interval.
    pub fn len(&self) -> Number {
        self.end - self.start
    }

    /// Returns whether the interval is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Record
////////////////////////////////////////////////////////////////////////////////////////

/// A single telomere annotation line: `contig, start, end, name, score,
/// strand`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    /// The annotated contig.
    contig: String,

    /// The telomere interval.
    telomere: Telomere,
}

impl Record {
    /// Gets the annotated contig name.
    pub fn contig(&self) -> &str {
        &self.contig
    }

    /// Gets the telomere interval.
    pub fn telomere(&self) -> &Telomere {
        &self.telomere
    }

    /// Consumes `self` and returns the contig name and telomere.
    pub fn into_parts(self) -> (String, Telomere) {
        (self.contig, self.telomere)
    }
}

impl FromStr for Record {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.split(DELIMITER).collect::<Vec<_>>();
        if parts.len() < NUM_ANNOTATION_FIELDS {
            return Err(ParseError::IncorrectNumberOfFields(parts.len()));
        }

        let start = parts[1].trim().parse().map_err(ParseError::InvalidStart)?;
        let end = parts[2].trim().parse().map_err(ParseError::InvalidEnd)?;
        // Anything but `+` or `-` (commonly `.`) is an unstranded call.
        let strand = parts[5].trim().parse::<Strand>().ok();

        Ok(Self {
            contig: parts[0].to_string(),
            telomere: Telomere::try_new(start, end, strand)?,
        })
    }
}
