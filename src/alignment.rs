//! Pairwise alignment blocks.
//!
//! Alignments are read from a tab-separated stream with one block per line.
//! The columns used here are (1-based):
//!
//! | Column | Meaning                       |
//! |--------|-------------------------------|
//! | 2      | query contig name             |
//! | 3      | query start (0-based)         |
//! | 4      | query aligned length          |
//! | 7      | target contig name            |
//! | 8      | target start (0-based)        |
//! | 9      | target aligned length         |
//! | 10     | strand (`+` or `-`)           |
//! | 11     | target source length          |
//!
//! For `-` alignments the target start is reported on the reverse strand. The
//! [`Alignment`] type flips it back using the target source length so that
//! every stored target coordinate is relative to the forward strand.

use std::num::ParseIntError;
use std::ops::Range;
use std::str::FromStr;

use omics::coordinate::position::Number;
use omics::coordinate::strand;
use omics::coordinate::Strand;

pub mod loader;

pub use loader::Loader;

/// The delimiter for an alignment line.
const DELIMITER: char = '\t';

/// The prefix for a comment line.
pub const COMMENT_PREFIX: char = '#';

/// The minimum number of fields in an alignment line.
pub const NUM_ALIGNMENT_FIELDS: usize = 11;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error associated with parsing an alignment line.
#[derive(Debug)]
pub enum ParseError {
    /// An incorrect number of fields in the alignment line.
    IncorrectNumberOfFields(usize),

    /// An invalid query start.
    InvalidQueryStart(ParseIntError),

    /// An invalid query aligned length.
    InvalidQueryLength(ParseIntError),

    /// An invalid target start.
    InvalidTargetStart(ParseIntError),

    /// An invalid target aligned length.
    InvalidTargetLength(ParseIntError),

    /// An invalid strand.
    InvalidStrand(strand::Error),

    /// An invalid target source length.
    InvalidTargetSourceLength(ParseIntError),

    /// The alignment has no length.
    EmptyAlignment,

    /// An interval end does not fit in a coordinate.
    CoordinateOverflow {
        /// The interval start.
        start: Number,

        /// The interval length.
        length: Number,
    },

    /// The target interval does not fit within the target source length.
    TargetExceedsSource {
        /// The target start.
        start: Number,

        /// The target aligned length.
        length: Number,

        /// The target source length.
        source_length: Number,
    },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(n) => write!(
                f,
                "invalid number of fields in alignment: expected at least \
                 {NUM_ALIGNMENT_FIELDS} fields, found {n} fields"
            ),
            ParseError::InvalidQueryStart(err) => write!(f, "invalid query start: {err}"),
            ParseError::InvalidQueryLength(err) => write!(f, "invalid query length: {err}"),
            ParseError::InvalidTargetStart(err) => write!(f, "invalid target start: {err}"),
            ParseError::InvalidTargetLength(err) => write!(f, "invalid target length: {err}"),
            ParseError::InvalidStrand(err) => write!(f, "invalid strand: {err}"),
            ParseError::InvalidTargetSourceLength(err) => {
                write!(f, "invalid target source length: {err}")
            }
            ParseError::EmptyAlignment => write!(f, "the alignment has no length"),
            ParseError::CoordinateOverflow { start, length } => {
                write!(f, "the interval end ({start} + {length}) overflows")
            }
            ParseError::TargetExceedsSource {
                start,
                length,
                source_length,
            } => write!(
                f,
                "the target interval ({start} + {length}) exceeds the target source length \
                 ({source_length})"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

////////////////////////////////////////////////////////////////////////////////////////
// Direction
////////////////////////////////////////////////////////////////////////////////////////

/// Whether the query axis runs forward or in reverse relative to the target.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    /// The query runs in the same direction as the target.
    Forward,

    /// The query runs against the target.
    Reverse,
}

impl Direction {
    /// Returns whether this is [`Direction::Reverse`].
    pub fn is_reverse(&self) -> bool {
        matches!(self, Direction::Reverse)
    }

    /// Returns the opposite direction.
    pub fn flip(&self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

impl From<Strand> for Direction {
    fn from(strand: Strand) -> Self {
        match strand {
            Strand::Positive => Direction::Forward,
            Strand::Negative => Direction::Reverse,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Alignment
////////////////////////////////////////////////////////////////////////////////////////

/// A single pairwise alignment block between a query and a target contig.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Alignment {
    /// The query contig name.
    q_name: String,

    /// The query start.
    q_start: Number,

    /// The query end.
    q_end: Number,

    /// The aligned length on the query.
    aln_len: Number,

    /// The target contig name.
    t_name: String,

    /// The forward-strand target start.
    t_start: Number,

    /// The forward-strand target end.
    t_end: Number,

    /// The aligned length on the target, as reported.
    t_aln_len: Number,

    /// The target source length, as reported.
    t_source_length: Number,

    /// The polarity of the alignment.
    strand: Strand,

    /// The direction of the query axis relative to the target.
    direction: Direction,
}

impl Alignment {
    /// Gets the query contig name.
    pub fn q_name(&self) -> &str {
        &self.q_name
    }

    /// Gets the query start.
    pub fn q_start(&self) -> Number {
        self.q_start
    }

    /// Gets the query end.
    pub fn q_end(&self) -> Number {
        self.q_end
    }

    /// Gets the aligned length.
    pub fn aln_len(&self) -> Number {
        self.aln_len
    }

    /// Gets the target contig name.
    pub fn t_name(&self) -> &str {
        &self.t_name
    }

    /// Gets the forward-strand target start.
    pub fn t_start(&self) -> Number {
        self.t_start
    }

    /// Gets the forward-strand target end.
    pub fn t_end(&self) -> Number {
        self.t_end
    }

    /// Gets the strand.
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Gets the direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Gets the query interval.
    pub fn query_range(&self) -> Range<Number> {
        self.q_start..self.q_end()
    }

    /// Gets the forward-strand target interval.
    pub fn target_range(&self) -> Range<Number> {
        self.t_start..self.t_end
    }

    /// Recovers the target start exactly as it was reported in the source
    /// line, undoing the forward-strand normalization of `-` alignments.
    ///
    /// # Examples
    ///
    /// ```
    /// use contigpath::alignment::Alignment;
    ///
    /// let line = "0\tq\t0\t20000\t+\t50000\tt\t100\t20000\t-\t90000\t";
    /// let alignment = line.parse::<Alignment>()?;
    ///
    /// assert_eq!(alignment.t_start(), 69900);
    /// assert_eq!(alignment.t_end(), 89900);
    /// assert_eq!(alignment.reported_t_start(), 100);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn reported_t_start(&self) -> Number {
        match self.strand {
            Strand::Positive => self.t_start,
            Strand::Negative => self.t_source_length - self.t_start - self.t_aln_len,
        }
    }
}

impl FromStr for Alignment {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.trim().split(DELIMITER).collect::<Vec<_>>();
        if parts.len() < NUM_ALIGNMENT_FIELDS {
            return Err(ParseError::IncorrectNumberOfFields(parts.len()));
        }

        let q_name = parts[1].to_string();
        let q_start: Number = parts[2].parse().map_err(ParseError::InvalidQueryStart)?;
        let aln_len: Number = parts[3].parse().map_err(ParseError::InvalidQueryLength)?;
        let t_name = parts[6].to_string();
        let reported_t_start: Number = parts[7].parse().map_err(ParseError::InvalidTargetStart)?;
        let t_aln_len: Number = parts[8].parse().map_err(ParseError::InvalidTargetLength)?;
        let strand = parts[9].parse().map_err(ParseError::InvalidStrand)?;
        let t_source_length: Number = parts[10]
            .parse()
            .map_err(ParseError::InvalidTargetSourceLength)?;

        if aln_len == 0 {
            return Err(ParseError::EmptyAlignment);
        }

        let end_of = |start: Number| {
            start
                .checked_add(aln_len)
                .ok_or(ParseError::CoordinateOverflow {
                    start,
                    length: aln_len,
                })
        };

        let q_end = end_of(q_start)?;

        let (t_start, t_end) = match strand {
            Strand::Positive => (reported_t_start, end_of(reported_t_start)?),
            Strand::Negative => {
                let end = t_source_length.checked_sub(reported_t_start);
                let start = end.and_then(|end| end.checked_sub(t_aln_len));

                match (start, end) {
                    (Some(start), Some(end)) => (start, end),
                    _ => {
                        return Err(ParseError::TargetExceedsSource {
                            start: reported_t_start,
                            length: t_aln_len,
                            source_length: t_source_length,
                        })
                    }
                }
            }
        };

        Ok(Self {
            q_name,
            q_start,
            q_end,
            aln_len,
            t_name,
            t_start,
            t_end,
            t_aln_len,
            t_source_length,
            strand,
            direction: Direction::from(strand),
        })
    }
}
