//! Navigation through chained alignments.
//!
//! A [`Navigator`] owns the view stack and the path history. The stack always
//! starts with [`View::Global`]; every view above it is a detail view entered
//! from the one below. Every transition either commits fully or returns an
//! [`Error`] and leaves the navigator untouched.

use std::collections::HashSet;
use std::ops::Range;

use nonempty::NonEmpty;
use omics::coordinate::position::Number;
use omics::coordinate::Strand;
use tracing::debug;

use crate::alignment::Alignment;
use crate::contig::Registry;
use crate::dataset::Dataset;

pub mod path;

pub use path::Path;

/// An error related to a navigation transition.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The contig is not in the dataset.
    UnknownContig(String),

    /// The contig carries no telomere and so is not part of the global view.
    NoTelomere(String),

    /// The contig is already part of the history or the current path.
    AlreadyVisited(String),

    /// The chosen alignment lies behind the one the current view was entered
    /// through.
    BackwardProgression {
        /// The bound set by the entry alignment.
        previous: Number,

        /// The matching coordinate of the chosen alignment.
        candidate: Number,

        /// Whether the y-axis was reversed.
        reversed: bool,
    },

    /// The alignment does not target the contig on the y-axis.
    NotOnCurrentContig {
        /// The contig on the y-axis.
        expected: String,

        /// The target contig of the alignment.
        found: String,
    },

    /// The transition requires the global view.
    NotAtGlobal,

    /// The transition requires a detail view.
    NotInDetail,

    /// No path exists at the given history index.
    InvalidHistoryIndex(usize),

    /// No loaded alignment matches a recorded step.
    AlignmentNotFound(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnknownContig(name) => write!(f, "unknown contig: {name}"),
            Error::NoTelomere(name) => write!(f, "contig {name} has no telomere"),
            Error::AlreadyVisited(name) => write!(f, "contig {name} has already been visited"),
            Error::BackwardProgression {
                previous,
                candidate,
                reversed,
            } => {
                if *reversed {
                    write!(
                        f,
                        "cannot move backwards: alignment starts at {candidate}, after the \
                         previous start at {previous}"
                    )
                } else {
                    write!(
                        f,
                        "cannot move backwards: alignment ends at {candidate}, before the \
                         previous end at {previous}"
                    )
                }
            }
            Error::NotOnCurrentContig { expected, found } => {
                write!(f, "alignment targets {found}, not the current contig {expected}")
            }
            Error::NotAtGlobal => write!(f, "not at the global view"),
            Error::NotInDetail => write!(f, "not in a detail view"),
            Error::InvalidHistoryIndex(index) => write!(f, "no path at history index {index}"),
            Error::AlignmentNotFound(name) => {
                write!(f, "no loaded alignment matches the step into {name}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Views
////////////////////////////////////////////////////////////////////////////////////////

/// A named coordinate interval.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Span {
    /// The contig name.
    name: String,

    /// The start.
    start: Number,

    /// The end.
    end: Number,
}

impl Span {
    /// Creates a new span.
    pub fn new(name: impl Into<String>, start: Number, end: Number) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    /// Gets the contig name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the start.
    pub fn start(&self) -> Number {
        self.start
    }

    /// Gets the end.
    pub fn end(&self) -> Number {
        self.end
    }

    /// Gets the interval.
    pub fn range(&self) -> Range<Number> {
        self.start..self.end
    }
}

/// The alignment a detail view was entered through.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EntryAlignment {
    /// The interval on the contig that was left.
    source: Span,

    /// The interval on the contig that was entered.
    target: Span,

    /// The alignment polarity.
    strand: Strand,
}

impl EntryAlignment {
    /// Creates a new entry alignment.
    pub fn new(source: Span, target: Span, strand: Strand) -> Self {
        Self {
            source,
            target,
            strand,
        }
    }

    /// Gets the interval on the contig that was left.
    pub fn source(&self) -> &Span {
        &self.source
    }

    /// Gets the interval on the contig that was entered.
    pub fn target(&self) -> &Span {
        &self.target
    }

    /// Gets the alignment polarity.
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Returns whether this entry was made through `alignment`.
    pub fn matches(&self, alignment: &Alignment) -> bool {
        self.source.name == alignment.t_name()
            && self.source.range() == alignment.target_range()
            && self.target.name == alignment.q_name()
            && self.target.range() == alignment.query_range()
            && self.strand == alignment.strand()
    }
}

impl From<&Alignment> for EntryAlignment {
    fn from(alignment: &Alignment) -> Self {
        Self {
            source: Span::new(alignment.t_name(), alignment.t_start(), alignment.t_end()),
            target: Span::new(alignment.q_name(), alignment.q_start(), alignment.q_end()),
            strand: alignment.strand(),
        }
    }
}

/// How a detail view was entered.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Entry {
    /// Directly from the global view.
    Global,

    /// By following an alignment from the previous detail view.
    Alignment(EntryAlignment),
}

/// One detail view along a path.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Step {
    /// The contig on the y-axis.
    contig: String,

    /// How the view was entered.
    entry: Entry,

    /// The y-axis orientation saved for this view.
    reversed: bool,
}

impl Step {
    /// Creates a new step.
    pub fn new(contig: impl Into<String>, entry: Entry, reversed: bool) -> Self {
        Self {
            contig: contig.into(),
            entry,
            reversed,
        }
    }

    /// Gets the contig on the y-axis.
    pub fn contig(&self) -> &str {
        &self.contig
    }

    /// Gets how the view was entered.
    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    /// Gets the saved y-axis orientation.
    pub fn reversed(&self) -> bool {
        self.reversed
    }
}

/// A view on the stack.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum View {
    /// The global overview.
    Global,

    /// A detail view.
    Detail(Step),
}

impl View {
    /// Gets the step of a detail view.
    pub fn as_step(&self) -> Option<&Step> {
        match self {
            View::Global => None,
            View::Detail(step) => Some(step),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Navigator
////////////////////////////////////////////////////////////////////////////////////////

/// The outcome of importing exported path text.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ImportOutcome {
    /// The number of paths appended to the history.
    pub imported: usize,

    /// Whether the single imported path can be resumed right away.
    pub resumable: bool,
}

/// The owner of all mutable navigation state.
#[derive(Clone, Debug)]
pub struct Navigator {
    /// The view stack. The head is always [`View::Global`].
    stack: NonEmpty<View>,

    /// The completed and saved paths.
    history: Vec<Path>,

    /// The active y-axis orientation.
    y_reversed: bool,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            stack: NonEmpty::new(View::Global),
            history: Vec::new(),
            y_reversed: false,
        }
    }
}

impl Navigator {
    /// Creates a navigator at the global view with an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the view on top of the stack.
    pub fn current_view(&self) -> &View {
        self.stack.last()
    }

    /// Gets the step on top of the stack, if in a detail view.
    pub fn current_step(&self) -> Option<&Step> {
        self.current_view().as_step()
    }

    /// Returns whether the global view is on top of the stack.
    pub fn is_at_global(&self) -> bool {
        self.stack.len() == 1
    }

    /// Iterates over the steps of the in-progress path.
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.stack.tail.iter().filter_map(View::as_step)
    }

    /// Gets the in-progress path, if any.
    pub fn current_path(&self) -> Option<Path> {
        Path::from_steps(self.steps().cloned().collect())
    }

    /// Gets the path history.
    pub fn history(&self) -> &[Path] {
        &self.history
    }

    /// Gets the active y-axis orientation.
    pub fn y_reversed(&self) -> bool {
        self.y_reversed
    }

    /// Gets every contig in the history or in the in-progress path.
    pub fn visited(&self) -> HashSet<&str> {
        self.history
            .iter()
            .flat_map(|path| path.iter())
            .chain(self.steps())
            .map(|step| step.contig())
            .collect()
    }

    /// Gets the number shown for the in-progress path.
    pub fn path_number(&self) -> usize {
        self.history.len() + 1
    }

    /// Describes the in-progress path.
    ///
    /// # Examples
    ///
    /// ```
    /// use contigpath::contig::Registry;
    /// use contigpath::navigation::Navigator;
    ///
    /// let registry = Registry::from_lengths([("A", 1000)]);
    /// let (registry, _) = registry.with_telomeres(&b"A\t900\t1000\ttel\t0\t+\n"[..], 100)?;
    ///
    /// let mut navigator = Navigator::new();
    /// assert_eq!(navigator.breadcrumb(), "Global");
    ///
    /// navigator.enter_from_global(&registry, "A")?;
    /// assert_eq!(navigator.breadcrumb(), "A(-)");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn breadcrumb(&self) -> String {
        let steps = self.steps().collect::<Vec<_>>();

        let Some((current, before)) = steps.split_last() else {
            return String::from("Global");
        };

        let mut parts = before
            .iter()
            .map(|step| step.contig().to_string())
            .collect::<Vec<_>>();

        if self.y_reversed {
            parts.push(format!("{}(-)", current.contig()));
        } else {
            parts.push(current.contig().to_string());
        }

        parts.join(" -> ")
    }

    /// Enters the detail view of a telomere contig from the global view.
    ///
    /// The y-axis is reversed unless the contig has a telomere in its lower
    /// half.
    pub fn enter_from_global(&mut self, registry: &Registry, name: &str) -> Result<&View> {
        if !self.is_at_global() {
            return Err(Error::NotAtGlobal);
        }

        let contig = registry
            .get(name)
            .ok_or_else(|| Error::UnknownContig(name.to_string()))?;

        if !contig.has_telomere() {
            return Err(Error::NoTelomere(name.to_string()));
        }

        if self.visited().contains(name) {
            return Err(Error::AlreadyVisited(name.to_string()));
        }

        let reversed = !contig.has_lower_telomere();
        debug!("entering {name} from the global view (reversed: {reversed})");

        Ok(self.push(Step::new(contig.name(), Entry::Global, reversed)))
    }

    /// Follows an alignment from the current detail view to its query contig.
    ///
    /// The alignment must target the contig on the y-axis and must not lie
    /// behind the alignment the current view was entered through.
    pub fn follow(&mut self, alignment: &Alignment) -> Result<&View> {
        let current = self.current_step().ok_or(Error::NotInDetail)?;

        if alignment.t_name() != current.contig() {
            return Err(Error::NotOnCurrentContig {
                expected: current.contig().to_string(),
                found: alignment.t_name().to_string(),
            });
        }

        if self.visited().contains(alignment.q_name()) {
            return Err(Error::AlreadyVisited(alignment.q_name().to_string()));
        }

        if let Entry::Alignment(entry) = current.entry() {
            check_progression(entry.target(), alignment, self.y_reversed)?;
        }

        let reversed = self.y_reversed ^ alignment.direction().is_reverse();
        debug!(
            "following alignment {} -> {} (reversed: {reversed})",
            alignment.t_name(),
            alignment.q_name()
        );

        Ok(self.push(Step::new(
            alignment.q_name(),
            Entry::Alignment(EntryAlignment::from(alignment)),
            reversed,
        )))
    }

    /// Pops the current detail view.
    ///
    /// Landing on a detail view restores its saved orientation; landing on
    /// the global view keeps the active one.
    pub fn back(&mut self) -> Result<&View> {
        if self.stack.pop().is_none() {
            return Err(Error::NotInDetail);
        }

        if let View::Detail(step) = self.stack.last() {
            self.y_reversed = step.reversed();
        }

        Ok(self.stack.last())
    }

    /// Archives the in-progress path, if any, and returns to the global view.
    pub fn return_to_global(&mut self) {
        if let Some(path) = self.take_path() {
            debug!("archiving path of {} steps", path.len());
            self.history.push(path);
        }
    }

    /// Resumes the path at `index` in the history.
    ///
    /// The in-progress path, if any, takes the resumed path's place in the
    /// history.
    pub fn resume(&mut self, index: usize) -> Result<&View> {
        if index >= self.history.len() {
            return Err(Error::InvalidHistoryIndex(index));
        }

        let selected = match self.take_path() {
            Some(current) => std::mem::replace(&mut self.history[index], current),
            None => self.history.remove(index),
        };

        self.y_reversed = selected.last().reversed();
        self.stack
            .tail
            .extend(selected.into_iter().map(View::Detail));

        Ok(self.stack.last())
    }

    /// Flips the active y-axis orientation.
    ///
    /// The orientation saved for the current view is left alone.
    pub fn toggle_orientation(&mut self) -> bool {
        self.y_reversed = !self.y_reversed;
        self.y_reversed
    }

    /// Writes the history followed by the in-progress path as text.
    pub fn export(&self) -> String {
        let current = self.current_path();
        path::export(self.history.iter().chain(current.as_ref()))
    }

    /// Appends every path in exported `text` to the history.
    pub fn import(&mut self, text: &str) -> ImportOutcome {
        let paths = path::import(text);
        let imported = paths.len();

        self.history.extend(paths);

        ImportOutcome {
            imported,
            resumable: imported == 1 && self.is_at_global(),
        }
    }

    /// Walks a recorded path against `dataset` from the global view.
    ///
    /// Each step is resolved to a loaded alignment and run through the same
    /// validation as an interactive transition. The orientation is toggled
    /// where needed so that each step lands with its recorded orientation.
    pub fn replay(&mut self, dataset: &Dataset, path: &Path) -> Result<()> {
        if !self.is_at_global() {
            return Err(Error::NotAtGlobal);
        }

        let mut next = self.clone();

        for step in path.iter() {
            match step.entry() {
                Entry::Global => {
                    next.enter_from_global(dataset.registry(), step.contig())?;
                }
                Entry::Alignment(entry) => {
                    let alignment = dataset
                        .alignments_to(entry.source().name())
                        .find(|alignment| entry.matches(alignment))
                        .ok_or_else(|| Error::AlignmentNotFound(step.contig().to_string()))?;

                    if next.y_reversed ^ alignment.direction().is_reverse() != step.reversed() {
                        next.toggle_orientation();
                    }

                    next.follow(alignment)?;
                }
            }
        }

        *self = next;
        Ok(())
    }

    /// Pushes a detail view and makes its orientation active.
    fn push(&mut self, step: Step) -> &View {
        self.y_reversed = step.reversed();
        self.stack.push(View::Detail(step));
        self.stack.last()
    }

    /// Removes the in-progress path, leaving only the global view.
    fn take_path(&mut self) -> Option<Path> {
        let views = std::mem::take(&mut self.stack.tail);
        Path::from_steps(
            views
                .into_iter()
                .filter_map(|view| match view {
                    View::Global => None,
                    View::Detail(step) => Some(step),
                })
                .collect(),
        )
    }
}

/// Rejects an alignment lying behind the entry interval on the current
/// contig.
fn check_progression(previous: &Span, alignment: &Alignment, reversed: bool) -> Result<()> {
    let (bound, candidate, ok) = if reversed {
        let candidate = alignment.t_start();
        (previous.start(), candidate, candidate <= previous.start())
    } else {
        let candidate = alignment.t_end();
        (previous.end(), candidate, candidate >= previous.end())
    };

    if ok {
        Ok(())
    } else {
        Err(Error::BackwardProgression {
            previous: bound,
            candidate,
            reversed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::dataset;

    /// `A` and `C` carry telomeres. `A -> C -> B` can be walked through
    /// alignments targeting `A` then `C`.
    fn fixture() -> std::result::Result<Dataset, Box<dyn std::error::Error>> {
        dataset(
            "A\t1000000\t0\t60\t61\nB\t2000000\t0\t60\t61\nC\t1500000\t0\t60\t61\n",
            "A\t0\t150\ttel\t0\t+\nC\t1400000\t1500000\ttel\t0\t-\n",
            "0\tC\t100000\t50000\t+\t1500000\tA\t200000\t50000\t+\t1000000\n\
             0\tB\t0\t40000\t+\t2000000\tC\t100000\t40000\t+\t1500000\n\
             0\tB\t500000\t40000\t+\t2000000\tC\t500000\t40000\t-\t1500000\n\
             0\tA\t0\t20000\t+\t1000000\tC\t200000\t20000\t+\t1500000\n",
        )
    }

    fn alignment(dataset: &Dataset, q_name: &str, t_name: &str, index: usize) -> Alignment {
        dataset
            .alignments()
            .iter()
            .filter(|a| a.q_name() == q_name && a.t_name() == t_name)
            .nth(index)
            .cloned()
            .unwrap()
    }

    #[test]
    fn initial_state() {
        let navigator = Navigator::new();

        assert_eq!(navigator.current_view(), &View::Global);
        assert!(navigator.history().is_empty());
        assert!(!navigator.y_reversed());
        assert_eq!(navigator.path_number(), 1);
        assert!(navigator.current_path().is_none());
    }

    #[test]
    fn entering_from_global() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dataset = fixture()?;
        let mut navigator = Navigator::new();

        // A has a telomere in its lower half.
        let step = navigator.enter_from_global(dataset.registry(), "A")?.as_step().unwrap();
        assert_eq!(step.entry(), &Entry::Global);
        assert!(!step.reversed());
        assert!(!navigator.y_reversed());

        assert_eq!(
            navigator.enter_from_global(dataset.registry(), "C"),
            Err(Error::NotAtGlobal)
        );

        navigator.return_to_global();

        // C only has a telomere in its upper half.
        let step = navigator.enter_from_global(dataset.registry(), "C")?.as_step().unwrap();
        assert!(step.reversed());
        assert!(navigator.y_reversed());

        Ok(())
    }

    #[test]
    fn entering_from_global_is_validated() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dataset = fixture()?;
        let mut navigator = Navigator::new();

        assert_eq!(
            navigator.enter_from_global(dataset.registry(), "Z"),
            Err(Error::UnknownContig(String::from("Z")))
        );
        assert_eq!(
            navigator.enter_from_global(dataset.registry(), "B"),
            Err(Error::NoTelomere(String::from("B")))
        );

        navigator.enter_from_global(dataset.registry(), "A")?;
        navigator.return_to_global();

        assert_eq!(
            navigator.enter_from_global(dataset.registry(), "A"),
            Err(Error::AlreadyVisited(String::from("A")))
        );
        assert!(navigator.is_at_global());

        Ok(())
    }

    #[test]
    fn following_alignments() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dataset = fixture()?;
        let mut navigator = Navigator::new();
        navigator.enter_from_global(dataset.registry(), "A")?;

        let step = navigator
            .follow(&alignment(&dataset, "C", "A", 0))?
            .as_step()
            .unwrap();
        assert_eq!(step.contig(), "C");
        assert!(!step.reversed());

        let Entry::Alignment(entry) = step.entry() else {
            panic!("expected an alignment entry");
        };
        assert_eq!(entry.source(), &Span::new("A", 200000, 250000));
        assert_eq!(entry.target(), &Span::new("C", 100000, 150000));
        assert_eq!(entry.strand(), Strand::Positive);

        // The reverse alignment flips the orientation.
        let step = navigator
            .follow(&alignment(&dataset, "B", "C", 1))?
            .as_step()
            .unwrap();
        assert_eq!(step.contig(), "B");
        assert!(step.reversed());
        assert_eq!(navigator.breadcrumb(), "A -> C -> B(-)");

        Ok(())
    }

    #[test]
    fn following_requires_the_current_contig() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let dataset = fixture()?;
        let mut navigator = Navigator::new();

        assert_eq!(
            navigator.follow(&alignment(&dataset, "C", "A", 0)).unwrap_err(),
            Error::NotInDetail
        );

        navigator.enter_from_global(dataset.registry(), "A")?;
        assert_eq!(
            navigator.follow(&alignment(&dataset, "B", "C", 0)).unwrap_err(),
            Error::NotOnCurrentContig {
                expected: String::from("A"),
                found: String::from("C"),
            }
        );

        Ok(())
    }

    #[test]
    fn revisiting_is_rejected() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dataset = fixture()?;
        let mut navigator = Navigator::new();
        navigator.enter_from_global(dataset.registry(), "A")?;
        navigator.follow(&alignment(&dataset, "C", "A", 0))?;

        let before = navigator.clone();
        assert_eq!(
            navigator.follow(&alignment(&dataset, "A", "C", 0)).unwrap_err(),
            Error::AlreadyVisited(String::from("A"))
        );
        assert_eq!(navigator.steps().count(), before.steps().count());
        assert_eq!(navigator.y_reversed(), before.y_reversed());

        Ok(())
    }

    #[test]
    fn monotonic_progression() -> std::result::Result<(), Box<dyn std::error::Error>> {
        // The current view on `C` was entered through [100000, 150000).
        let dataset = dataset(
            "A\t1000000\t0\t60\t61\nB\t2000000\t0\t60\t61\nC\t1500000\t0\t60\t61\n",
            "A\t0\t150\ttel\t0\t+\n",
            "0\tC\t100000\t50000\t+\t1500000\tA\t0\t50000\t+\t1000000\n",
        )?;

        let candidate = |t_start: Number, t_len: Number| {
            format!("0\tB\t0\t{t_len}\t+\t2000000\tC\t{t_start}\t{t_len}\t+\t1500000")
                .parse::<Alignment>()
                .unwrap()
        };

        let entered = || -> std::result::Result<Navigator, Box<dyn std::error::Error>> {
            let mut navigator = Navigator::new();
            navigator.enter_from_global(dataset.registry(), "A")?;
            navigator.follow(&dataset.alignments()[0])?;
            Ok(navigator)
        };

        // (t_start, t_len, forward ok, reversed ok)
        let cases = [
            (150000, 10000, true, false),
            (140000, 10000, true, false),
            (139999, 10000, false, false),
            (0, 10000, false, true),
            (100000, 10000, false, true),
            (90000, 100000, true, true),
            (100001, 10000, false, false),
        ];

        for (t_start, t_len, forward_ok, reversed_ok) in cases {
            let b = candidate(t_start, t_len);

            let mut navigator = entered()?;
            assert!(!navigator.y_reversed());
            assert_eq!(navigator.follow(&b).is_ok(), forward_ok, "{t_start} {t_len}");

            let mut navigator = entered()?;
            navigator.toggle_orientation();
            let result = navigator.follow(&b).map(|_| ());
            assert_eq!(result.is_ok(), reversed_ok, "{t_start} {t_len} reversed");

            if let Err(err) = result {
                assert!(matches!(err, Error::BackwardProgression { reversed: true, .. }));
                assert_eq!(navigator.current_step().unwrap().contig(), "C");
            }
        }

        Ok(())
    }

    #[test]
    fn the_first_follow_is_unconstrained() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dataset = fixture()?;
        let mut navigator = Navigator::new();
        navigator.enter_from_global(dataset.registry(), "C")?;

        // Entered from the global view, so any alignment on C may be taken.
        navigator.follow(&alignment(&dataset, "B", "C", 0))?;
        assert_eq!(navigator.current_step().unwrap().contig(), "B");

        Ok(())
    }

    #[test]
    fn back_restores_saved_orientation() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dataset = fixture()?;
        let mut navigator = Navigator::new();

        assert_eq!(navigator.back().unwrap_err(), Error::NotInDetail);

        navigator.enter_from_global(dataset.registry(), "A")?;
        navigator.follow(&alignment(&dataset, "C", "A", 0))?;
        navigator.follow(&alignment(&dataset, "B", "C", 1))?;
        assert!(navigator.y_reversed());

        let view = navigator.back()?;
        assert_eq!(view.as_step().unwrap().contig(), "C");
        assert!(!navigator.y_reversed());

        // Toggling does not rewrite the saved orientation.
        navigator.toggle_orientation();
        navigator.toggle_orientation();
        navigator.toggle_orientation();
        assert!(navigator.y_reversed());
        assert!(!navigator.current_step().unwrap().reversed());

        navigator.back()?;
        navigator.back()?;
        assert!(navigator.is_at_global());
        // The global view keeps whatever was active.
        assert!(!navigator.y_reversed());

        Ok(())
    }

    #[test]
    fn return_to_global_archives_the_path() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let dataset = fixture()?;
        let mut navigator = Navigator::new();

        navigator.return_to_global();
        assert!(navigator.history().is_empty());

        navigator.enter_from_global(dataset.registry(), "A")?;
        navigator.follow(&alignment(&dataset, "C", "A", 0))?;
        navigator.return_to_global();

        assert!(navigator.is_at_global());
        assert_eq!(navigator.history().len(), 1);
        assert_eq!(navigator.path_number(), 2);
        assert_eq!(
            navigator.history()[0].contigs().collect::<Vec<_>>(),
            vec!["A", "C"]
        );
        assert_eq!(
            navigator.visited(),
            HashSet::from(["A", "C"])
        );

        Ok(())
    }

    #[test]
    fn resume_swaps_paths() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dataset = fixture()?;
        let mut navigator = Navigator::new();

        navigator.enter_from_global(dataset.registry(), "A")?;
        navigator.follow(&alignment(&dataset, "C", "A", 0))?;
        navigator.follow(&alignment(&dataset, "B", "C", 1))?;
        navigator.return_to_global();
        assert!(navigator.y_reversed());

        navigator.toggle_orientation();
        assert_eq!(navigator.resume(1).unwrap_err(), Error::InvalidHistoryIndex(1));

        let view = navigator.resume(0)?;
        assert_eq!(view.as_step().unwrap().contig(), "B");
        assert!(navigator.y_reversed());
        assert!(navigator.history().is_empty());
        assert_eq!(navigator.breadcrumb(), "A -> C -> B(-)");

        Ok(())
    }

    #[test]
    fn resume_while_in_progress() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dataset = fixture()?;
        let mut navigator = Navigator::new();

        navigator.enter_from_global(dataset.registry(), "A")?;
        navigator.return_to_global();
        navigator.enter_from_global(dataset.registry(), "C")?;

        navigator.resume(0)?;

        assert_eq!(navigator.steps().map(Step::contig).collect::<Vec<_>>(), vec!["A"]);
        assert_eq!(navigator.history().len(), 1);
        assert_eq!(navigator.history()[0].first().contig(), "C");
        assert!(!navigator.y_reversed());

        Ok(())
    }

    #[test]
    fn import_offers_resume_for_a_single_path() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let dataset = fixture()?;
        let mut source = Navigator::new();
        source.enter_from_global(dataset.registry(), "A")?;
        source.follow(&alignment(&dataset, "C", "A", 0))?;
        let text = source.export();

        let mut navigator = Navigator::new();
        let outcome = navigator.import(&text);
        assert_eq!(
            outcome,
            ImportOutcome {
                imported: 1,
                resumable: true
            }
        );

        navigator.resume(0)?;
        let outcome = navigator.import(&text);
        assert!(!outcome.resumable);
        assert_eq!(navigator.history().len(), 1);

        Ok(())
    }

    #[test]
    fn replay_rebuilds_the_path() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dataset = fixture()?;
        let mut source = Navigator::new();
        source.enter_from_global(dataset.registry(), "A")?;
        source.follow(&alignment(&dataset, "C", "A", 0))?;
        source.toggle_orientation();
        source.follow(&alignment(&dataset, "B", "C", 0))?;
        let recorded = source.current_path().unwrap();

        let mut navigator = Navigator::new();
        navigator.replay(&dataset, &recorded)?;

        assert_eq!(navigator.current_path(), Some(recorded));
        assert_eq!(navigator.y_reversed(), source.y_reversed());

        Ok(())
    }

    #[test]
    fn failed_replay_changes_nothing() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dataset = fixture()?;
        let path = Path::from_steps(vec![
            Step::new("A", Entry::Global, false),
            Step::new(
                "C",
                Entry::Alignment(EntryAlignment::new(
                    Span::new("A", 1, 2),
                    Span::new("C", 3, 4),
                    Strand::Positive,
                )),
                false,
            ),
        ])
        .unwrap();

        let mut navigator = Navigator::new();
        assert_eq!(
            navigator.replay(&dataset, &path),
            Err(Error::AlignmentNotFound(String::from("C")))
        );
        assert!(navigator.is_at_global());
        assert!(navigator.visited().is_empty());

        Ok(())
    }
}
