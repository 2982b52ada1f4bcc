//! Projection of alignments into two-dimensional plot space.
//!
//! A [`Projector`] turns the static [`Dataset`] into a [`Projection`] for
//! either the global overview or a detail view pivoted on one contig. Plot
//! coordinates are signed because axis padding and telomere markers sit
//! below zero.

use omics::coordinate::position::Number;
use omics::coordinate::Strand;

use crate::alignment::Alignment;
use crate::alignment::Direction;
use crate::dataset::Dataset;
use crate::navigation::View;

pub mod detail;
pub mod global;
pub mod layout;

pub use layout::Layout;
pub use layout::Placement;

/// The minimum aligned length of an alignment drawn in the global view.
pub const DEFAULT_GLOBAL_MIN_ALIGNMENT_LENGTH: Number = 100_000;

/// The padding below zero on each axis.
pub const DEFAULT_AXIS_PADDING: Number = 5_000;

/// The plot coordinate on which telomere markers are drawn.
pub const TELOMERE_MARKER_POSITION: i64 = -1_000;

/// Combines a contig's default orientation with the active y-axis flag.
///
/// A contig is drawn reversed when exactly one of the two is set.
///
/// # Examples
///
/// ```
/// use contigpath::projection::effective_reversed;
///
/// assert!(!effective_reversed(false, false));
/// assert!(effective_reversed(true, false));
/// assert!(effective_reversed(false, true));
/// assert!(!effective_reversed(true, true));
/// ```
pub fn effective_reversed(contig_default: bool, y_reversed: bool) -> bool {
    contig_default ^ y_reversed
}

/// Converts a genomic coordinate into a plot coordinate.
pub(crate) fn plot(value: Number) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// An error related to projecting a view.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The pivot contig is not in the dataset.
    UnknownContig(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnknownContig(name) => write!(f, "unknown contig: {name}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Geometry
////////////////////////////////////////////////////////////////////////////////////////

/// A point in plot space.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Point {
    /// The horizontal coordinate.
    pub x: i64,

    /// The vertical coordinate.
    pub y: i64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// An alignment drawn as a line segment.
#[derive(Clone, Debug)]
pub struct Segment<'a> {
    /// The alignment that was projected.
    alignment: &'a Alignment,

    /// The first endpoint.
    start: Point,

    /// The second endpoint.
    end: Point,
}

impl<'a> Segment<'a> {
    /// Gets the projected alignment.
    pub fn alignment(&self) -> &'a Alignment {
        self.alignment
    }

    /// Gets the first endpoint.
    pub fn start(&self) -> Point {
        self.start
    }

    /// Gets the second endpoint.
    pub fn end(&self) -> Point {
        self.end
    }

    /// Gets the direction of the projected alignment.
    pub fn direction(&self) -> Direction {
        self.alignment.direction()
    }

    /// Computes the squared distance from `(x, y)` to this segment.
    pub fn distance_squared(&self, x: f64, y: f64) -> f64 {
        let (x1, y1) = (self.start.x as f64, self.start.y as f64);
        let (x2, y2) = (self.end.x as f64, self.end.y as f64);
        let (dx, dy) = (x2 - x1, y2 - y1);

        let length_squared = dx * dx + dy * dy;
        if length_squared == 0.0 {
            return (x - x1).powi(2) + (y - y1).powi(2);
        }

        let t = (((x - x1) * dx + (y - y1) * dy) / length_squared).clamp(0.0, 1.0);
        (x - (x1 + t * dx)).powi(2) + (y - (y1 + t * dy)).powi(2)
    }
}

/// The axis a contig is placed along.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Axis {
    /// The horizontal (query) axis.
    X,

    /// The vertical (target) axis.
    Y,
}

/// A telomere drawn beside its contig.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Marker {
    /// The contig carrying the telomere.
    contig: String,

    /// The axis the contig is placed along.
    axis: Axis,

    /// The first endpoint.
    start: Point,

    /// The second endpoint.
    end: Point,

    /// The telomere strand, if the call carries one.
    strand: Option<Strand>,
}

impl Marker {
    /// Creates a marker for the placed interval `[from, to)` on `axis`.
    ///
    /// The marker sits on the orthogonal axis at
    /// [`TELOMERE_MARKER_POSITION`].
    pub(crate) fn new(
        contig: &str,
        axis: Axis,
        from: i64,
        to: i64,
        strand: Option<Strand>,
    ) -> Self {
        let (start, end) = match axis {
            Axis::X => (
                Point::new(from, TELOMERE_MARKER_POSITION),
                Point::new(to, TELOMERE_MARKER_POSITION),
            ),
            Axis::Y => (
                Point::new(TELOMERE_MARKER_POSITION, from),
                Point::new(TELOMERE_MARKER_POSITION, to),
            ),
        };

        Self {
            contig: contig.to_string(),
            axis,
            start,
            end,
            strand,
        }
    }

    /// Gets the contig name.
    pub fn contig(&self) -> &str {
        &self.contig
    }

    /// Gets the axis the contig is placed along.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Gets the first endpoint.
    pub fn start(&self) -> Point {
        self.start
    }

    /// Gets the second endpoint.
    pub fn end(&self) -> Point {
        self.end
    }

    /// Gets the telomere strand, if any.
    pub fn strand(&self) -> Option<Strand> {
        self.strand
    }

    /// Returns whether the marker is drawn in the positive-strand colour.
    ///
    /// Negative and unstranded calls share the other colour.
    pub fn is_positive(&self) -> bool {
        self.strand == Some(Strand::Positive)
    }
}

/// The visible range of one axis.
///
/// An inverted range (`start > end`) draws the axis top-down.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AxisRange {
    /// The coordinate drawn at the axis origin.
    pub start: i64,

    /// The coordinate drawn at the far end of the axis.
    pub end: i64,
}

impl AxisRange {
    /// Creates a padded range over `[0, length]`, inverted when `reversed`.
    pub fn padded(length: Number, padding: Number, reversed: bool) -> Self {
        let (low, high) = (-plot(padding), plot(length));

        if reversed {
            Self {
                start: high,
                end: low,
            }
        } else {
            Self {
                start: low,
                end: high,
            }
        }
    }

    /// Returns whether the range is drawn inverted.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Projection
////////////////////////////////////////////////////////////////////////////////////////

/// A fully projected view.
#[derive(Debug)]
pub struct Projection<'a> {
    /// The contigs placed along the horizontal axis.
    x_layout: Layout,

    /// The contigs placed along the vertical axis.
    y_layout: Layout,

    /// The projected alignments.
    segments: Vec<Segment<'a>>,

    /// The telomere markers.
    markers: Vec<Marker>,

    /// The horizontal range.
    x_range: AxisRange,

    /// The vertical range.
    y_range: AxisRange,

    /// The y-axis reversed flag the projection was computed with.
    y_reversed: bool,
}

impl<'a> Projection<'a> {
    /// Gets the horizontal layout.
    pub fn x_layout(&self) -> &Layout {
        &self.x_layout
    }

    /// Gets the vertical layout.
    pub fn y_layout(&self) -> &Layout {
        &self.y_layout
    }

    /// Gets the projected segments.
    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    /// Gets the telomere markers.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Gets the horizontal range.
    pub fn x_range(&self) -> AxisRange {
        self.x_range
    }

    /// Gets the vertical range.
    pub fn y_range(&self) -> AxisRange {
        self.y_range
    }

    /// Gets the y-axis reversed flag the projection was computed with.
    pub fn y_reversed(&self) -> bool {
        self.y_reversed
    }

    /// Returns whether a horizontally placed contig is drawn mirrored.
    pub fn is_mirrored(&self, placement: &Placement) -> bool {
        effective_reversed(placement.reversed(), self.y_reversed)
    }

    /// Finds the segment closest to the plot-space point `(x, y)`.
    ///
    /// Ties resolve to the segment projected first.
    pub fn nearest_segment(&self, x: f64, y: f64) -> Option<&Segment<'a>> {
        let mut best: Option<(&Segment<'a>, f64)> = None;

        for segment in &self.segments {
            let distance = segment.distance_squared(x, y);
            match best {
                Some((_, closest)) if closest <= distance => {}
                _ => best = Some((segment, distance)),
            }
        }

        best.map(|(segment, _)| segment)
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Projector
////////////////////////////////////////////////////////////////////////////////////////

/// Computes projections over a [`Dataset`].
#[derive(Clone, Debug)]
pub struct Projector<'a> {
    /// The dataset being projected.
    dataset: &'a Dataset,

    /// The minimum aligned length of an alignment drawn in the global view.
    global_min_alignment_length: Number,

    /// The padding below zero on each axis.
    axis_padding: Number,
}

impl<'a> Projector<'a> {
    /// Creates a projector with the default settings.
    pub fn new(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            global_min_alignment_length: DEFAULT_GLOBAL_MIN_ALIGNMENT_LENGTH,
            axis_padding: DEFAULT_AXIS_PADDING,
        }
    }

    /// Sets the minimum aligned length of an alignment drawn in the global
    /// view.
    pub fn global_min_alignment_length(mut self, length: Number) -> Self {
        self.global_min_alignment_length = length;
        self
    }

    /// Sets the padding below zero on each axis.
    pub fn axis_padding(mut self, padding: Number) -> Self {
        self.axis_padding = padding;
        self
    }

    /// Projects the global overview.
    pub fn global(&self, y_reversed: bool) -> Projection<'a> {
        global::project(
            self.dataset,
            self.global_min_alignment_length,
            self.axis_padding,
            y_reversed,
        )
    }

    /// Projects the detail view pivoted on `contig`.
    pub fn detail(&self, contig: &str, y_reversed: bool) -> Result<Projection<'a>> {
        detail::project(self.dataset, contig, self.axis_padding, y_reversed)
    }

    /// Projects whichever view is given.
    pub fn project(&self, view: &View, y_reversed: bool) -> Result<Projection<'a>> {
        match view {
            View::Global => Ok(self.global(y_reversed)),
            View::Detail(step) => self.detail(step.contig(), y_reversed),
        }
    }
}
