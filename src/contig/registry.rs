//! The ordered set of contigs known to a dataset.

use std::collections::HashMap;
use std::io::BufRead;
use std::io::{self};

use omics::coordinate::position::Number;
use tracing::debug;

use crate::contig::telomere;
use crate::contig::Contig;
use crate::index::Index;

/// The minimum length of a telomere interval that is admitted by default.
pub const DEFAULT_MIN_TELOMERE_LENGTH: Number = 100;

/// Counts describing how a telomere annotation stream was consumed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AnnotationSummary {
    /// Annotations attached to a contig.
    pub accepted: usize,

    /// Annotations shorter than the minimum length.
    pub too_short: usize,

    /// Annotations for contigs that are not in the registry.
    pub unknown_contig: usize,

    /// Lines that could not be parsed.
    pub malformed: usize,
}

/// The ordered set of contigs.
///
/// The order is the order in which contigs first appear in the reference
/// source. It determines the placement of contigs in the global view, so it
/// is never changed after construction.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    /// The contigs in reference order.
    contigs: Vec<Contig>,

    /// The position of each contig by name.
    by_name: HashMap<String, usize>,
}

impl Registry {
    /// Creates a registry from `(name, length)` pairs in reference order.
    ///
    /// A name that appears more than once keeps its first position and its
    /// last length.
    ///
    /// # Examples
    ///
    /// ```
    /// use contigpath::contig::Registry;
    ///
    /// let registry = Registry::from_lengths([("A", 1000), ("B", 2000)]);
    ///
    /// assert_eq!(registry.len(), 2);
    /// assert_eq!(registry.get("B").unwrap().length(), 2000);
    /// ```
    pub fn from_lengths<I, S>(lengths: I) -> Self
    where
        I: IntoIterator<Item = (S, Number)>,
        S: Into<String>,
    {
        let mut registry = Self::default();

        for (name, length) in lengths {
            let name = name.into();
            match registry.by_name.get(&name) {
                Some(i) => registry.contigs[*i] = Contig::new(name, length),
                None => {
                    registry.by_name.insert(name.clone(), registry.contigs.len());
                    registry.contigs.push(Contig::new(name, length));
                }
            }
        }

        registry
    }

    /// Creates a registry from the records of an [`Index`].
    pub fn from_index(index: &Index) -> Self {
        Self::from_lengths(
            index
                .records()
                .iter()
                .map(|record| (record.name(), record.length())),
        )
    }

    /// Attaches telomere annotations read from `reader`.
    ///
    /// Intervals shorter than `min_length` are dropped, as are annotations for
    /// unknown contigs and lines that cannot be parsed.
    ///
    /// # Examples
    ///
    /// ```
    /// use contigpath::contig::Registry;
    ///
    /// let registry = Registry::from_lengths([("A", 1000), ("B", 2000)]);
    /// let data = b"A\t0\t150\ttel\t0\t+\nB\t0\t50\ttel\t0\t+\n";
    ///
    /// let (registry, summary) = registry.with_telomeres(&data[..], 100)?;
    ///
    /// assert!(registry.get("A").unwrap().has_telomere());
    /// assert!(!registry.get("B").unwrap().has_telomere());
    /// assert_eq!(summary.accepted, 1);
    /// assert_eq!(summary.too_short, 1);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn with_telomeres<T>(
        mut self,
        mut reader: T,
        min_length: Number,
    ) -> io::Result<(Self, AnnotationSummary)>
    where
        T: BufRead,
    {
        let mut summary = AnnotationSummary::default();
        let mut buffer = Vec::new();

        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }

            let Ok(line) = std::str::from_utf8(&buffer) else {
                debug!("skipping telomere annotation: not valid UTF-8");
                summary.malformed += 1;
                continue;
            };
            let line = line.trim_end_matches(['\n', '\r']);
            if line.is_empty() {
                continue;
            }

            let record = match line.parse::<telomere::Record>() {
                Ok(record) => record,
                Err(err) => {
                    debug!("skipping telomere annotation: {err}");
                    summary.malformed += 1;
                    continue;
                }
            };

            if record.telomere().len() < min_length {
                summary.too_short += 1;
                continue;
            }

            let (name, telomere) = record.into_parts();
            match self.by_name.get(&name) {
                Some(i) => {
                    self.contigs[*i].push_telomere(telomere);
                    summary.accepted += 1;
                }
                None => {
                    debug!("skipping telomere annotation for unknown contig `{name}`");
                    summary.unknown_contig += 1;
                }
            }
        }

        Ok((self, summary))
    }

    /// Gets a contig by name.
    pub fn get(&self, name: &str) -> Option<&Contig> {
        self.by_name.get(name).map(|i| &self.contigs[*i])
    }

    /// Returns whether the registry contains a contig.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Gets all contigs in reference order.
    pub fn contigs(&self) -> &[Contig] {
        &self.contigs
    }

    /// Iterates over the contigs that carry a telomere, in reference order.
    pub fn telomere_contigs(&self) -> impl Iterator<Item = &Contig> {
        self.contigs.iter().filter(|contig| contig.has_telomere())
    }

    /// Gets the number of contigs.
    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    /// Returns whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }
}
