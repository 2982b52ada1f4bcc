//! Placement of contigs along a single plot axis.

use std::collections::HashMap;

use omics::coordinate::position::Number;
use rust_lapper as lapper;

/// The inner value of the position lookup data structure.
type Iv = lapper::Interval<Number, usize>;

/// A contig placed on an axis.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Placement {
    /// The contig name.
    name: String,

    /// The cumulative offset of the contig on the axis.
    offset: Number,

    /// The contig length.
    length: Number,

    /// Whether the contig is reversed by default.
    reversed: bool,
}

impl Placement {
    /// Gets the contig name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the offset of the contig on the axis.
    pub fn offset(&self) -> Number {
        self.offset
    }

    /// Gets the contig length.
    pub fn length(&self) -> Number {
        self.length
    }

    /// Gets the end of the contig on the axis.
    pub fn end(&self) -> Number {
        self.offset.saturating_add(self.length)
    }

    /// Returns whether the contig is reversed by default.
    pub fn reversed(&self) -> bool {
        self.reversed
    }
}

/// An ordered, gapless arrangement of contigs along one axis.
///
/// Each contig's offset is the sum of the lengths of the contigs placed
/// before it, so offsets strictly increase whenever lengths are non-zero.
#[derive(Debug)]
pub struct Layout {
    /// The placements in axis order.
    placements: Vec<Placement>,

    /// The position of each placement by contig name.
    by_name: HashMap<String, usize>,

    /// A lookup from axis position to placement.
    lookup: lapper::Lapper<Number, usize>,

    /// The summed length of every placement.
    total_length: Number,
}

impl Layout {
    /// Places `(name, length, reversed)` entries one after another.
    ///
    /// Entries whose name was already placed are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use contigpath::projection::Layout;
    ///
    /// let layout = Layout::new([("A", 1000, false), ("C", 1500, true)]);
    ///
    /// assert_eq!(layout.offset("A"), Some(0));
    /// assert_eq!(layout.offset("C"), Some(1000));
    /// assert_eq!(layout.total_length(), 2500);
    /// assert_eq!(layout.contig_at(1200).map(|p| p.name()), Some("C"));
    /// assert!(layout.contig_at(-1).is_none());
    /// ```
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Number, bool)>,
        S: Into<String>,
    {
        let mut placements = Vec::new();
        let mut by_name = HashMap::new();
        let mut offset: Number = 0;

        for (name, length, reversed) in entries {
            let name = name.into();
            if by_name.contains_key(&name) {
                continue;
            }

            by_name.insert(name.clone(), placements.len());
            placements.push(Placement {
                name,
                offset,
                length,
                reversed,
            });
            offset = offset.saturating_add(length);
        }

        let intervals = placements
            .iter()
            .enumerate()
            .filter(|(_, placement)| placement.length > 0)
            .map(|(i, placement)| Iv {
                start: placement.offset,
                stop: placement.end(),
                val: i,
            })
            .collect::<Vec<_>>();

        Self {
            placements,
            by_name,
            lookup: lapper::Lapper::new(intervals),
            total_length: offset,
        }
    }

    /// Gets a placement by contig name.
    pub fn get(&self, name: &str) -> Option<&Placement> {
        self.by_name.get(name).map(|i| &self.placements[*i])
    }

    /// Gets the offset of a contig, if it is placed.
    pub fn offset(&self, name: &str) -> Option<Number> {
        self.get(name).map(|placement| placement.offset)
    }

    /// Gets the placements in axis order.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Gets the summed length of every placement.
    pub fn total_length(&self) -> Number {
        self.total_length
    }

    /// Finds the placement covering an axis position.
    pub fn contig_at(&self, position: i64) -> Option<&Placement> {
        let position = Number::try_from(position).ok()?;
        self.lookup
            .find(position, position + 1)
            .next()
            .map(|iv| &self.placements[iv.val])
    }
}
