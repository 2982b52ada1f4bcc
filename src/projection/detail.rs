//! The detail view pivoted on a single contig.
//!
//! The pivot contig sits alone on the y-axis. Every contig aligned to it is
//! placed along the x-axis in order of first appearance, each with a default
//! orientation chosen by the aligned length in either direction.

use std::collections::HashMap;

use omics::coordinate::position::Number;

use crate::alignment::Alignment;
use crate::alignment::Direction;
use crate::dataset::Dataset;
use crate::projection::effective_reversed;
use crate::projection::plot;
use crate::projection::Axis;
use crate::projection::AxisRange;
use crate::projection::Error;
use crate::projection::Layout;
use crate::projection::Marker;
use crate::projection::Placement;
use crate::projection::Point;
use crate::projection::Projection;
use crate::projection::Result;
use crate::projection::Segment;

/// Decides whether a query contig is reversed by default.
///
/// The contig is reversed when more bases align in reverse than forward.
/// Ties are not reversed.
///
/// # Examples
///
/// ```
/// use contigpath::alignment::Direction;
/// use contigpath::projection::detail::default_reversed;
///
/// assert!(default_reversed([(Direction::Reverse, 30), (Direction::Forward, 20)]));
/// assert!(!default_reversed([(Direction::Reverse, 20), (Direction::Forward, 20)]));
/// ```
pub fn default_reversed<I>(pairs: I) -> bool
where
    I: IntoIterator<Item = (Direction, Number)>,
{
    let (mut forward, mut reverse): (Number, Number) = (0, 0);

    for (direction, length) in pairs {
        match direction {
            Direction::Forward => forward = forward.saturating_add(length),
            Direction::Reverse => reverse = reverse.saturating_add(length),
        }
    }

    reverse > forward
}

/// Computes the horizontal endpoints of an alignment within its placement.
fn x_endpoints(alignment: &Alignment, placement: &Placement, mirrored: bool) -> (i64, i64) {
    let offset = plot(placement.offset());
    let length = plot(placement.length());
    let (q_start, q_end) = (plot(alignment.q_start()), plot(alignment.q_end()));

    match (mirrored, alignment.direction()) {
        (false, Direction::Forward) => (
            offset.saturating_add(q_start),
            offset.saturating_add(q_end),
        ),
        (false, Direction::Reverse) => (
            offset.saturating_add(q_end),
            offset.saturating_add(q_start),
        ),
        (true, Direction::Forward) => (
            offset.saturating_add(length - q_start),
            offset.saturating_add(length - q_end),
        ),
        (true, Direction::Reverse) => (
            offset.saturating_add(length - q_end),
            offset.saturating_add(length - q_start),
        ),
    }
}

/// Projects the detail view of `name`.
pub(crate) fn project<'a>(
    dataset: &'a Dataset,
    name: &str,
    padding: Number,
    y_reversed: bool,
) -> Result<Projection<'a>> {
    let pivot = dataset
        .contig(name)
        .ok_or_else(|| Error::UnknownContig(name.to_string()))?;

    let alignments = dataset.alignments_to(pivot.name()).collect::<Vec<_>>();

    let mut order = Vec::new();
    let mut pairs: HashMap<&str, Vec<(Direction, Number)>> = HashMap::new();
    for alignment in alignments.iter().copied() {
        pairs
            .entry(alignment.q_name())
            .or_insert_with(|| {
                order.push(alignment.q_name());
                Vec::new()
            })
            .push((alignment.direction(), alignment.aln_len()));
    }

    let x_layout = Layout::new(order.iter().filter_map(|q_name| {
        let contig = dataset.contig(q_name)?;
        let reversed = default_reversed(pairs.get(q_name)?.iter().copied());
        Some((contig.name(), contig.length(), reversed))
    }));

    let y_layout = Layout::new([(pivot.name(), pivot.length(), false)]);

    let segments = alignments
        .into_iter()
        .filter_map(|alignment| {
            let placement = x_layout.get(alignment.q_name())?;
            let mirrored = effective_reversed(placement.reversed(), y_reversed);
            let (x_start, x_end) = x_endpoints(alignment, placement, mirrored);

            Some(Segment {
                alignment,
                start: Point::new(x_start, plot(alignment.t_start())),
                end: Point::new(x_end, plot(alignment.t_end())),
            })
        })
        .collect::<Vec<_>>();

    let mut markers = pivot
        .telomeres()
        .iter()
        .map(|telomere| {
            Marker::new(
                pivot.name(),
                Axis::Y,
                plot(telomere.start()),
                plot(telomere.end()),
                telomere.strand(),
            )
        })
        .collect::<Vec<_>>();

    for placement in x_layout.placements() {
        let Some(contig) = dataset.contig(placement.name()) else {
            continue;
        };

        let mirrored = effective_reversed(placement.reversed(), y_reversed);
        let offset = plot(placement.offset());
        let length = plot(placement.length());

        for telomere in contig.telomeres() {
            let (start, end) = (plot(telomere.start()), plot(telomere.end()));
            let (from, to) = if mirrored {
                (length - end, length - start)
            } else {
                (start, end)
            };

            markers.push(Marker::new(
                contig.name(),
                Axis::X,
                offset.saturating_add(from),
                offset.saturating_add(to),
                telomere.strand(),
            ));
        }
    }

    let x_range = AxisRange::padded(x_layout.total_length(), padding, false);
    let y_range = AxisRange::padded(pivot.length(), padding, y_reversed);

    Ok(Projection {
        x_layout,
        y_layout,
        segments,
        markers,
        x_range,
        y_range,
        y_reversed,
    })
}

#[cfg(test)]
mod tests {
    use crate::dataset::tests::dataset;
    use crate::projection::Projector;

    use super::*;

    fn flip(pairs: &[(Direction, Number)]) -> Vec<(Direction, Number)> {
        pairs
            .iter()
            .map(|(direction, length)| (direction.flip(), *length))
            .collect()
    }

    #[test]
    fn swapping_directions_flips_the_decision() {
        let cases: &[&[(Direction, Number)]] = &[
            &[(Direction::Forward, 10)],
            &[(Direction::Reverse, 10), (Direction::Forward, 9)],
            &[
                (Direction::Forward, 5),
                (Direction::Reverse, 3),
                (Direction::Reverse, 3),
            ],
            &[(Direction::Forward, 100_000), (Direction::Reverse, 99_999)],
        ];

        for pairs in cases {
            let decision = default_reversed(pairs.iter().copied());
            assert_eq!(default_reversed(flip(pairs)), !decision, "{pairs:?}");
        }
    }

    #[test]
    fn ties_are_never_reversed() {
        let pairs = [(Direction::Forward, 7), (Direction::Reverse, 7)];

        assert!(!default_reversed(pairs));
        assert!(!default_reversed(flip(&pairs)));
    }

    /// Y is the pivot. P aligns mostly in reverse, Q only forward.
    fn fixture() -> std::result::Result<Dataset, Box<dyn std::error::Error>> {
        dataset(
            "Y\t500000\t0\t60\t61\nP\t100000\t0\t60\t61\nQ\t200000\t0\t60\t61\n",
            "P\t0\t500\ttel\t0\t+\nY\t0\t500\ttel\t0\t+\n",
            "0\tP\t10000\t30000\t+\t100000\tY\t0\t30000\t-\t500000\n\
             0\tQ\t0\t20000\t+\t200000\tY\t1000\t20000\t+\t500000\n\
             0\tP\t60000\t10000\t+\t100000\tY\t100000\t10000\t+\t500000\n\
             0\tY\t0\t20000\t+\t500000\tQ\t0\t20000\t+\t200000\n",
        )
    }

    #[test]
    fn query_contigs_are_placed_in_order_of_appearance(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dataset = fixture()?;
        let projection = Projector::new(&dataset).detail("Y", false)?;

        let placements = projection
            .x_layout()
            .placements()
            .iter()
            .map(|p| (p.name(), p.offset(), p.reversed()))
            .collect::<Vec<_>>();
        assert_eq!(placements, vec![("P", 0, true), ("Q", 100000, false)]);

        assert_eq!(projection.segments().len(), 3);
        assert_eq!(projection.y_layout().offset("Y"), Some(0));
        assert_eq!(projection.x_range(), AxisRange { start: -5000, end: 300000 });
        assert_eq!(projection.y_range(), AxisRange { start: -5000, end: 500000 });

        Ok(())
    }

    #[test]
    fn mirrored_contigs_are_drawn_start_before_end(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dataset = fixture()?;
        let projection = Projector::new(&dataset).detail("Y", false)?;
        let segments = projection.segments();

        // P is mirrored: a reverse alignment over 10000..40000.
        assert_eq!(segments[0].start(), Point::new(60000, 470000));
        assert_eq!(segments[0].end(), Point::new(90000, 500000));

        // Q is not mirrored: a forward alignment over 0..20000.
        assert_eq!(segments[1].start(), Point::new(100000, 1000));
        assert_eq!(segments[1].end(), Point::new(120000, 21000));

        // P is mirrored: a forward alignment over 60000..70000.
        assert_eq!(segments[2].start(), Point::new(40000, 100000));
        assert_eq!(segments[2].end(), Point::new(30000, 110000));

        Ok(())
    }

    #[test]
    fn reversing_the_y_axis_cancels_the_default(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dataset = fixture()?;
        let projection = Projector::new(&dataset).detail("Y", true)?;

        let p = projection.x_layout().get("P").unwrap();
        assert!(!projection.is_mirrored(p));
        let q = projection.x_layout().get("Q").unwrap();
        assert!(projection.is_mirrored(q));

        let segments = projection.segments();
        assert_eq!(segments[0].start(), Point::new(40000, 470000));
        assert_eq!(segments[0].end(), Point::new(10000, 500000));
        assert_eq!(segments[1].start(), Point::new(300000, 1000));
        assert_eq!(segments[1].end(), Point::new(280000, 21000));

        // Reversal inverts the range; y coordinates are untouched.
        assert_eq!(projection.y_range(), AxisRange { start: 500000, end: -5000 });

        Ok(())
    }

    #[test]
    fn telomere_markers_follow_the_mirroring() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let dataset = fixture()?;
        let projection = Projector::new(&dataset).detail("Y", false)?;

        let y = projection
            .markers()
            .iter()
            .find(|m| m.axis() == Axis::Y)
            .unwrap();
        assert_eq!(y.contig(), "Y");
        assert_eq!(y.start().y, 0);
        assert_eq!(y.end().y, 500);

        let x = projection
            .markers()
            .iter()
            .find(|m| m.axis() == Axis::X)
            .unwrap();
        assert_eq!(x.contig(), "P");
        assert_eq!(x.start().x, 99500);
        assert_eq!(x.end().x, 100000);

        Ok(())
    }

    #[test]
    fn pivot_without_alignments() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dataset = fixture()?;
        let projection = Projector::new(&dataset).detail("P", false)?;

        assert!(projection.segments().is_empty());
        assert!(projection.x_layout().placements().is_empty());
        assert_eq!(projection.x_range(), AxisRange { start: -5000, end: 0 });

        Ok(())
    }
}
