//! The global overview.
//!
//! Only contigs carrying a telomere are placed, on both axes and in registry
//! order. Alignments are drawn when both of their contigs are placed and
//! they are long enough to be meaningful at genome scale.

use omics::coordinate::position::Number;

use crate::dataset::Dataset;
use crate::projection::plot;
use crate::projection::Axis;
use crate::projection::AxisRange;
use crate::projection::Layout;
use crate::projection::Marker;
use crate::projection::Point;
use crate::projection::Projection;
use crate::projection::Segment;

/// Projects the global overview of `dataset`.
///
/// The x-axis is never reversed in the global view, so telomere markers on
/// it are not mirrored, even when `y_reversed` is set.
pub(crate) fn project(
    dataset: &Dataset,
    min_alignment_length: Number,
    padding: Number,
    y_reversed: bool,
) -> Projection<'_> {
    let layout = || {
        Layout::new(
            dataset
                .registry()
                .telomere_contigs()
                .map(|contig| (contig.name(), contig.length(), false)),
        )
    };

    let x_layout = layout();
    let y_layout = layout();

    let segments = dataset
        .alignments()
        .iter()
        .filter(|alignment| alignment.aln_len() >= min_alignment_length)
        .filter_map(|alignment| {
            let x_offset = plot(x_layout.offset(alignment.q_name())?);
            let y_offset = plot(y_layout.offset(alignment.t_name())?);

            Some(Segment {
                alignment,
                start: Point::new(
                    x_offset.saturating_add(plot(alignment.q_start())),
                    y_offset.saturating_add(plot(alignment.t_start())),
                ),
                end: Point::new(
                    x_offset.saturating_add(plot(alignment.q_end())),
                    y_offset.saturating_add(plot(alignment.t_end())),
                ),
            })
        })
        .collect::<Vec<_>>();

    let mut markers = Vec::new();
    for (axis, layout) in [(Axis::Y, &y_layout), (Axis::X, &x_layout)] {
        for placement in layout.placements() {
            let Some(contig) = dataset.contig(placement.name()) else {
                continue;
            };

            let offset = plot(placement.offset());
            for telomere in contig.telomeres() {
                markers.push(Marker::new(
                    contig.name(),
                    axis,
                    offset.saturating_add(plot(telomere.start())),
                    offset.saturating_add(plot(telomere.end())),
                    telomere.strand(),
                ));
            }
        }
    }

    let x_range = AxisRange::padded(x_layout.total_length(), padding, false);
    let y_range = AxisRange::padded(y_layout.total_length(), padding, y_reversed);

    Projection {
        x_layout,
        y_layout,
        segments,
        markers,
        x_range,
        y_range,
        y_reversed,
    }
}

#[cfg(test)]
mod tests {
    use omics::coordinate::Strand;

    use crate::dataset::tests::dataset;
    use crate::projection::Projector;
    use crate::projection::TELOMERE_MARKER_POSITION;

    use super::*;

    const INDEX: &str = "A\t1000\t0\t60\t61\nB\t2000\t1100\t60\t61\nC\t1500\t3200\t60\t61\n";
    const TELOMERES: &str = "A\t0\t150\ttel\t0\t+\nC\t1400\t1500\ttel\t0\t-\n";

    #[test]
    fn only_telomere_contigs_are_placed() -> Result<(), Box<dyn std::error::Error>> {
        let dataset = dataset(
            INDEX,
            TELOMERES,
            "0\tA\t0\t120000\t+\t1000\tC\t0\t120000\t+\t1500\n\
             0\tA\t0\t50000\t+\t1000\tC\t0\t50000\t+\t1500\n",
        )?;

        // Both alignments pass the load threshold.
        assert_eq!(dataset.alignments().len(), 2);

        let projection = Projector::new(&dataset).global(false);

        let names = projection
            .x_layout()
            .placements()
            .iter()
            .map(|placement| (placement.name(), placement.offset()))
            .collect::<Vec<_>>();
        assert_eq!(names, vec![("A", 0), ("C", 1000)]);
        assert_eq!(projection.y_layout().offset("C"), Some(1000));
        assert!(projection.x_layout().get("B").is_none());

        assert_eq!(projection.segments().len(), 1);
        let segment = &projection.segments()[0];
        assert_eq!(segment.alignment().aln_len(), 120000);
        assert_eq!(segment.start(), Point::new(0, 1000));
        assert_eq!(segment.end(), Point::new(120000, 121000));

        Ok(())
    }

    #[test]
    fn huge_coordinates_saturate() -> Result<(), Box<dyn std::error::Error>> {
        let dataset = dataset(
            INDEX,
            TELOMERES,
            "0\tA\t18446744073709000000\t120000\t+\t1000\tC\t0\t120000\t+\t1500\n",
        )?;

        let projection = Projector::new(&dataset).global(false);

        let segment = &projection.segments()[0];
        assert_eq!(segment.start(), Point::new(i64::MAX, 1000));
        assert_eq!(segment.end(), Point::new(i64::MAX, 121000));

        Ok(())
    }

    #[test]
    fn unstranded_markers_use_the_negative_colour() -> Result<(), Box<dyn std::error::Error>> {
        let dataset = dataset(INDEX, "A\t0\t150\ttel\t0\t.\n", "")?;
        let projection = Projector::new(&dataset).global(false);

        assert_eq!(projection.markers().len(), 2);
        for marker in projection.markers() {
            assert_eq!(marker.contig(), "A");
            assert_eq!(marker.strand(), None);
            assert!(!marker.is_positive());
        }

        Ok(())
    }

    #[test]
    fn alignments_touching_unplaced_contigs_are_dropped() -> Result<(), Box<dyn std::error::Error>>
    {
        let dataset = dataset(
            INDEX,
            TELOMERES,
            "0\tA\t0\t120000\t+\t1000\tB\t0\t120000\t+\t2000\n",
        )?;

        let projection = Projector::new(&dataset).global(false);
        assert!(projection.segments().is_empty());

        Ok(())
    }

    #[test]
    fn markers_sit_beside_both_axes() -> Result<(), Box<dyn std::error::Error>> {
        let dataset = dataset(INDEX, TELOMERES, "")?;
        let projection = Projector::new(&dataset).global(false);

        let c_markers = projection
            .markers()
            .iter()
            .filter(|marker| marker.contig() == "C")
            .collect::<Vec<_>>();
        assert_eq!(c_markers.len(), 2);

        let y = c_markers.iter().find(|m| m.axis() == Axis::Y).unwrap();
        assert_eq!(y.start(), Point::new(TELOMERE_MARKER_POSITION, 2400));
        assert_eq!(y.end(), Point::new(TELOMERE_MARKER_POSITION, 2500));
        assert_eq!(y.strand(), Some(Strand::Negative));
        assert!(!y.is_positive());

        let x = c_markers.iter().find(|m| m.axis() == Axis::X).unwrap();
        assert_eq!(x.start(), Point::new(2400, TELOMERE_MARKER_POSITION));
        assert_eq!(x.end(), Point::new(2500, TELOMERE_MARKER_POSITION));

        Ok(())
    }

    #[test]
    fn reversal_inverts_the_y_range() -> Result<(), Box<dyn std::error::Error>> {
        let dataset = dataset(INDEX, TELOMERES, "")?;
        let projector = Projector::new(&dataset);

        let forward = projector.global(false);
        assert_eq!(forward.x_range(), AxisRange { start: -5000, end: 2500 });
        assert_eq!(forward.y_range(), AxisRange { start: -5000, end: 2500 });

        let reversed = projector.global(true);
        assert_eq!(reversed.x_range(), AxisRange { start: -5000, end: 2500 });
        assert_eq!(reversed.y_range(), AxisRange { start: 2500, end: -5000 });

        Ok(())
    }
}
