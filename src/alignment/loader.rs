//! An incremental loader for alignment streams.
//!
//! The loader is fed raw byte chunks of any size. Complete lines are parsed as
//! soon as their terminating newline arrives; a trailing partial line is held
//! back until the next chunk (or [`Loader::finish()`]) completes it. This
//! keeps parsing independent of how the caller happens to chunk its I/O.

use std::borrow::Cow;
use std::io::ErrorKind;
use std::io::Read;
use std::io::{self};

use omics::coordinate::position::Number;
use tracing::debug;
use tracing::info;

use crate::alignment::Alignment;
use crate::alignment::COMMENT_PREFIX;
use crate::alignment::NUM_ALIGNMENT_FIELDS;
use crate::contig::Registry;

/// The new line byte.
const NEW_LINE: u8 = b'\n';

/// The minimum aligned length admitted by default.
pub const DEFAULT_MIN_ALIGNMENT_LENGTH: Number = 10_000;

/// The default number of bytes read per chunk by [`Loader::read_from()`].
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Counts describing how an alignment stream was consumed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    /// Alignments that were kept.
    pub accepted: usize,

    /// Blank lines, comments, and lines with too few fields.
    pub ignored: usize,

    /// Alignments shorter than the minimum length.
    pub too_short: usize,

    /// Alignments referring to a contig outside of the registry.
    pub unknown_contig: usize,

    /// Lines that could not be parsed.
    pub malformed: usize,
}

/// An incremental alignment loader.
#[derive(Debug)]
pub struct Loader<'a> {
    /// The registry used to resolve contig names.
    registry: &'a Registry,

    /// The minimum aligned length.
    min_length: Number,

    /// Bytes of a line whose terminator has not arrived yet.
    leftover: Vec<u8>,

    /// The alignments accepted so far.
    alignments: Vec<Alignment>,

    /// The running summary.
    summary: Summary,
}

impl<'a> Loader<'a> {
    /// Creates a new loader resolving contigs against `registry`.
    pub fn new(registry: &'a Registry, min_length: Number) -> Self {
        Self {
            registry,
            min_length,
            leftover: Vec::new(),
            alignments: Vec::new(),
            summary: Summary::default(),
        }
    }

    /// Feeds the next chunk of the stream.
    ///
    /// # Examples
    ///
    /// ```
    /// use contigpath::alignment::Loader;
    /// use contigpath::contig::Registry;
    ///
    /// let registry = Registry::from_lengths([("A", 50000), ("C", 50000)]);
    /// let mut loader = Loader::new(&registry, 10000);
    ///
    /// loader.feed(b"0\tA\t0\t20000\t+\t50000\tC\t0\t200");
    /// loader.feed(b"00\t+\t50000\n");
    ///
    /// let (alignments, summary) = loader.finish();
    /// assert_eq!(alignments.len(), 1);
    /// assert_eq!(alignments[0].t_end(), 20000);
    /// assert_eq!(summary.accepted, 1);
    /// ```
    pub fn feed(&mut self, chunk: &[u8]) {
        self.leftover.extend_from_slice(chunk);

        let Some(last) = self.leftover.iter().rposition(|b| *b == NEW_LINE) else {
            return;
        };

        let rest = self.leftover.split_off(last + 1);
        let complete = std::mem::replace(&mut self.leftover, rest);

        for line in complete[..last].split(|b| *b == NEW_LINE) {
            self.process_line(line);
        }
    }

    /// Completes the stream, parsing any final unterminated line.
    pub fn finish(mut self) -> (Vec<Alignment>, Summary) {
        if !self.leftover.is_empty() {
            let line = std::mem::take(&mut self.leftover);
            self.process_line(&line);
        }

        info!(
            "loaded {} alignments ({} too short, {} with unknown contigs, {} malformed)",
            self.summary.accepted,
            self.summary.too_short,
            self.summary.unknown_contig,
            self.summary.malformed
        );

        (self.alignments, self.summary)
    }

    /// Reads an entire stream in chunks of `chunk_size` bytes.
    pub fn read_from<T>(
        mut self,
        mut reader: T,
        chunk_size: usize,
    ) -> io::Result<(Vec<Alignment>, Summary)>
    where
        T: Read,
    {
        let mut buffer = vec![0u8; chunk_size.max(1)];

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => self.feed(&buffer[..n]),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }

        Ok(self.finish())
    }

    /// Classifies and, if admissible, stores a single line.
    fn process_line(&mut self, line: &[u8]) {
        let line: Cow<'_, str> = String::from_utf8_lossy(line);
        let line = line.trim();

        if line.starts_with(COMMENT_PREFIX)
            || line.split('\t').count() < NUM_ALIGNMENT_FIELDS
        {
            self.summary.ignored += 1;
            return;
        }

        let alignment = match line.parse::<Alignment>() {
            Ok(alignment) => alignment,
            Err(err) => {
                debug!("skipping alignment line: {err}");
                self.summary.malformed += 1;
                return;
            }
        };

        if alignment.aln_len() < self.min_length {
            self.summary.too_short += 1;
            return;
        }

        if !self.registry.contains(alignment.q_name()) || !self.registry.contains(alignment.t_name())
        {
            debug!(
                "skipping alignment between `{}` and `{}`: unknown contig",
                alignment.q_name(),
                alignment.t_name()
            );
            self.summary.unknown_contig += 1;
            return;
        }

        self.summary.accepted += 1;
        self.alignments.push(alignment);
    }
}
