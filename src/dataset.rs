//! The static, read-only dataset that every view is computed from.
//!
//! A [`Dataset`] bundles the genome index, the contig registry, and the
//! alignments. It is assembled once by a [`Builder`] and never mutated
//! afterwards; alignment loading always completes before a dataset exists, so
//! downstream consumers never observe a partial load.

use std::io::BufRead;
use std::io::Read;
use std::io::{self};

use omics::coordinate::position::Number;
use tracing::info;

use crate::alignment::loader;
use crate::alignment::Alignment;
use crate::alignment::Loader;
use crate::contig::registry;
use crate::contig::registry::AnnotationSummary;
use crate::contig::Contig;
use crate::contig::Registry;
use crate::index::Index;

/// An error related to building a [`Dataset`].
#[derive(Debug)]
pub enum Error {
    /// An error reading the telomere annotations.
    Telomeres(io::Error),

    /// An error reading the alignment stream.
    Alignments(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Telomeres(err) => write!(f, "reading telomere annotations: {err}"),
            Error::Alignments(err) => write!(f, "reading alignments: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Builder
////////////////////////////////////////////////////////////////////////////////////////

/// A builder for a [`Dataset`].
///
/// The defaults admit alignments of at least 10,000 aligned bases and
/// telomere intervals of at least 100 bases.
#[derive(Clone, Debug)]
pub struct Builder {
    /// The minimum aligned length of a loaded alignment.
    min_alignment_length: Number,

    /// The minimum length of an admitted telomere interval.
    min_telomere_length: Number,

    /// The number of bytes read per alignment chunk.
    chunk_size: usize,
}

impl Builder {
    /// Sets the minimum aligned length of a loaded alignment.
    pub fn min_alignment_length(mut self, length: Number) -> Self {
        self.min_alignment_length = length;
        self
    }

    /// Sets the minimum length of an admitted telomere interval.
    pub fn min_telomere_length(mut self, length: Number) -> Self {
        self.min_telomere_length = length;
        self
    }

    /// Sets the number of bytes read per alignment chunk.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Builds a [`Dataset`] from an index, a telomere annotation stream, and an
    /// alignment stream.
    ///
    /// # Examples
    ///
    /// ```
    /// use contigpath::dataset::Builder;
    /// use contigpath::index::Index;
    ///
    /// let index = Index::read(&b"A\t1000\t3\t60\t61\nC\t1500\t1023\t60\t61\n"[..])?;
    /// let telomeres = b"A\t0\t150\ttel\t0\t+\n";
    /// let alignments = b"0\tA\t0\t20000\t+\t1000\tC\t0\t20000\t+\t1500\n";
    ///
    /// let dataset = Builder::default().try_build_from(index, &telomeres[..], &alignments[..])?;
    ///
    /// assert_eq!(dataset.registry().len(), 2);
    /// assert_eq!(dataset.alignments().len(), 1);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build_from<T, A>(&self, index: Index, telomeres: T, alignments: A) -> Result<Dataset>
    where
        T: BufRead,
        A: Read,
    {
        let (registry, telomere_summary) = Registry::from_index(&index)
            .with_telomeres(telomeres, self.min_telomere_length)
            .map_err(Error::Telomeres)?;

        info!(
            "registered {} contigs ({} with telomeres)",
            registry.len(),
            registry.telomere_contigs().count()
        );

        let (alignments, alignment_summary) = Loader::new(&registry, self.min_alignment_length)
            .read_from(alignments, self.chunk_size)
            .map_err(Error::Alignments)?;

        Ok(Dataset {
            index,
            registry,
            alignments,
            telomere_summary,
            alignment_summary,
        })
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            min_alignment_length: loader::DEFAULT_MIN_ALIGNMENT_LENGTH,
            min_telomere_length: registry::DEFAULT_MIN_TELOMERE_LENGTH,
            chunk_size: loader::DEFAULT_CHUNK_SIZE,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Dataset
////////////////////////////////////////////////////////////////////////////////////////

/// The loaded contigs and alignments.
#[derive(Debug)]
pub struct Dataset {
    /// The genome index.
    index: Index,

    /// The contig registry.
    registry: Registry,

    /// The loaded alignments, in stream order.
    alignments: Vec<Alignment>,

    /// How the telomere annotations were consumed.
    telomere_summary: AnnotationSummary,

    /// How the alignment stream was consumed.
    alignment_summary: loader::Summary,
}

impl Dataset {
    /// Gets the genome index.
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Gets the contig registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Gets a contig by name.
    pub fn contig(&self, name: &str) -> Option<&Contig> {
        self.registry.get(name)
    }

    /// Gets every loaded alignment.
    pub fn alignments(&self) -> &[Alignment] {
        &self.alignments
    }

    /// Iterates over the alignments whose target is `contig`.
    pub fn alignments_to<'a>(&'a self, contig: &'a str) -> impl Iterator<Item = &'a Alignment> {
        self.alignments
            .iter()
            .filter(move |alignment| alignment.t_name() == contig)
    }

    /// Gets the summary of the telomere annotation load.
    pub fn telomere_summary(&self) -> &AnnotationSummary {
        &self.telomere_summary
    }

    /// Gets the summary of the alignment load.
    pub fn alignment_summary(&self) -> &loader::Summary {
        &self.alignment_summary
    }
}
