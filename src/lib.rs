//! `contigpath` is a crate for navigating chains of pairwise whole-genome
//! alignments.
//!
//! The crate turns three inputs into an explorable, two-dimensional view of
//! how the contigs of one assembly align to those of another:
//!
//! - A genome index describing each contig's length and FASTA layout (see
//!   [`index::Index`]), which can also be derived by scanning the FASTA itself.
//! - Telomere annotations, which select the contigs shown in the global
//!   overview (see [`contig::Registry`]).
//! - A tab-delimited stream of alignment blocks (see [`alignment::Loader`]).
//!
//! These are assembled once into a read-only [`Dataset`] via
//! [`dataset::Builder`]. From there, three facilities do the work:
//!
//! - A [`projection::Projector`] computes plot geometry for the global
//!   overview or for a detail view pivoted on one contig.
//! - A [`Navigator`] owns the view stack and the path history, and validates
//!   every transition (no revisiting a contig, no moving backwards along the
//!   contig on the y-axis).
//! - A [`sequence::Fetcher`] retrieves reference sequence by coordinate.
//!
//! Below is a representative example of loading a dataset, entering a contig
//! from the global view, following an alignment, and exporting the resulting
//! path.
//!
//! ```
//! use contigpath::dataset::Builder;
//! use contigpath::index::Index;
//! use contigpath::projection::Projector;
//! use contigpath::Navigator;
//!
//! let index = Index::read(&b"A\t1000000\t0\t60\t61\nC\t1500000\t1016675\t60\t61\n"[..])?;
//! let telomeres = b"A\t0\t150\ttel\t0\t+\n";
//! let alignments = b"0\tC\t0\t200000\t+\t1500000\tA\t100\t200000\t+\t1000000\n";
//!
//! let dataset = Builder::default().try_build_from(index, &telomeres[..], &alignments[..])?;
//! let projector = Projector::new(&dataset);
//! let mut navigator = Navigator::new();
//!
//! navigator.enter_from_global(dataset.registry(), "A")?;
//!
//! let projection = projector.project(navigator.current_view(), navigator.y_reversed())?;
//! let segment = projection.nearest_segment(100_000.0, 100_000.0).unwrap();
//! navigator.follow(segment.alignment())?;
//!
//! assert_eq!(navigator.breadcrumb(), "A -> C");
//! println!("{}", navigator.export());
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod alignment;
pub mod contig;
pub mod dataset;
pub mod index;
pub mod input;
pub mod navigation;
pub mod projection;
pub mod sequence;

pub use dataset::Dataset;
pub use navigation::Navigator;
