//! Contigs and their telomere annotations.

use omics::coordinate::position::Number;

pub mod registry;
pub mod telomere;

pub use registry::Registry;
pub use telomere::Telomere;

/// A contiguous reference sequence with a known length.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Contig {
    /// The contig name.
    name: String,

    /// The contig length.
    length: Number,

    /// The telomere intervals, in annotation order.
    telomeres: Vec<Telomere>,
}

impl Contig {
    /// Creates a new [`Contig`] without any telomeres.
    ///
    /// # Examples
    ///
    /// ```
    /// use contigpath::contig::Contig;
    ///
    /// let contig = Contig::new("chr1", 1000);
    ///
    /// assert_eq!(contig.name(), "chr1");
    /// assert_eq!(contig.length(), 1000);
    /// assert!(!contig.has_telomere());
    /// ```
    pub fn new(name: impl Into<String>, length: Number) -> Self {
        Self {
            name: name.into(),
            length,
            telomeres: Vec::new(),
        }
    }

    /// Gets the contig name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the contig length.
    pub fn length(&self) -> Number {
        self.length
    }

    /// Gets the telomere intervals.
    pub fn telomeres(&self) -> &[Telomere] {
        &self.telomeres
    }

    /// Returns whether the contig carries at least one telomere.
    pub fn has_telomere(&self) -> bool {
        !self.telomeres.is_empty()
    }

    /// Returns whether any telomere starts before the midpoint of the contig.
    ///
    /// # Examples
    ///
    /// ```
    /// use contigpath::contig::Contig;
    /// use contigpath::contig::Telomere;
    /// use omics::coordinate::Strand;
    ///
    /// let mut contig = Contig::new("chr1", 1000);
    /// assert!(!contig.has_lower_telomere());
    ///
    /// contig.push_telomere(Telomere::try_new(900, 1000, Strand::Negative)?);
    /// assert!(!contig.has_lower_telomere());
    ///
    /// contig.push_telomere(Telomere::try_new(0, 150, Strand::Positive)?);
    /// assert!(contig.has_lower_telomere());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn has_lower_telomere(&self) -> bool {
        // Compares against `length / 2` without truncating odd lengths.
        self.telomeres
            .iter()
            .any(|telomere| telomere.start() * 2 < self.length)
    }

    /// Adds a telomere interval.
    pub fn push_telomere(&mut self, telomere: Telomere) {
        self.telomeres.push(telomere);
    }
}
