//! Paths and their text form.
//!
//! Exported text holds one block per path:
//!
//! ```text
//! Path 1:
//!   -> A ( => A [0-1] Contig:+ Alignment:+)
//!   -> C ( A [200,000-250,000] => C [100,000-150,000] Contig:- Alignment:-)
//!
//! ```
//!
//! The first step of a path never carries a source part. A step entered from
//! the global view is written with a one-base range at the start of its own
//! contig.

use std::sync::LazyLock;

use nonempty::NonEmpty;
use omics::coordinate::position::Number;
use omics::coordinate::Strand;
use regex::Captures;
use regex::Regex;
use tracing::debug;

use crate::navigation::Entry;
use crate::navigation::EntryAlignment;
use crate::navigation::Span;
use crate::navigation::Step;

/// The prefix of a step line.
const STEP_PREFIX: &str = "  -> ";

/// A path header line.
static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*Path\s+\d+:\s*$").unwrap());

/// A step line carrying an entry alignment.
static STEP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^\s*->\s*(?P<contig>\S+)\s*\(\s*",
        r"(?:(?P<source>\S+)\s*\[(?P<source_start>[\d,]+)-(?P<source_end>[\d,]+)\]\s*)?",
        r"=>\s*(?P<target>\S+)\s*\[(?P<target_start>[\d,]+)-(?P<target_end>[\d,]+)\]\s*",
        r"Contig:(?P<reversed>[+-])\s*Alignment:(?P<strand>[+-])\s*\)\s*$",
    ))
    .unwrap()
});

/// A step line without an entry alignment.
static BARE_STEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*->\s*(?P<contig>\S+)\s*$").unwrap());

/// A completed or saved sequence of detail views.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Path {
    /// The steps in the order they were taken.
    steps: NonEmpty<Step>,
}

impl Path {
    /// Creates a path from its steps, if there are any.
    pub fn from_steps(steps: Vec<Step>) -> Option<Self> {
        NonEmpty::from_vec(steps).map(|steps| Self { steps })
    }

    /// Gets the first step.
    pub fn first(&self) -> &Step {
        self.steps.first()
    }

    /// Gets the last step.
    pub fn last(&self) -> &Step {
        self.steps.last()
    }

    /// Gets the number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always returns `false`: a path has at least one step.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates over the steps.
    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    /// Iterates over the contigs along the path.
    pub fn contigs(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|step| step.contig())
    }
}

impl IntoIterator for Path {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Step>;

    fn into_iter(self) -> Self::IntoIter {
        Vec::from(self.steps).into_iter()
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Export
////////////////////////////////////////////////////////////////////////////////////////

/// Formats a number with comma thousands separators.
///
/// # Examples
///
/// ```
/// use contigpath::navigation::path::thousands;
///
/// assert_eq!(thousands(0), "0");
/// assert_eq!(thousands(999), "999");
/// assert_eq!(thousands(1000), "1,000");
/// assert_eq!(thousands(12345678), "12,345,678");
/// ```
pub fn thousands(value: Number) -> String {
    let digits = value.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

/// Gets the orientation symbol.
fn symbol(reversed: bool) -> char {
    if reversed {
        '-'
    } else {
        '+'
    }
}

/// Writes a single step line.
fn write_step(out: &mut String, step: &Step, first: bool) {
    out.push_str(STEP_PREFIX);
    out.push_str(step.contig());

    let (source, target, strand) = match step.entry() {
        Entry::Global => (None, Span::new(step.contig(), 0, 1), Strand::Positive),
        Entry::Alignment(entry) => (
            Some(entry.source()),
            entry.target().clone(),
            entry.strand(),
        ),
    };

    out.push_str(" ( ");
    if let Some(source) = source.filter(|_| !first) {
        out.push_str(&format!(
            "{} [{}-{}] ",
            source.name(),
            thousands(source.start()),
            thousands(source.end())
        ));
    }

    out.push_str(&format!(
        "=> {} [{}-{}] Contig:{} Alignment:{})\n",
        target.name(),
        thousands(target.start()),
        thousands(target.end()),
        symbol(step.reversed()),
        strand
    ));
}

/// Writes paths in the exported text form, numbered from one.
pub fn export<'a, I>(paths: I) -> String
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut out = String::new();

    for (i, path) in paths.into_iter().enumerate() {
        out.push_str(&format!("Path {}:\n", i + 1));

        for (j, step) in path.iter().enumerate() {
            write_step(&mut out, step, j == 0);
        }

        out.push('\n');
    }

    out
}

////////////////////////////////////////////////////////////////////////////////////////
// Import
////////////////////////////////////////////////////////////////////////////////////////

/// Parses a number that may carry thousands separators.
fn number(captures: &Captures<'_>, name: &str) -> Option<Number> {
    captures.name(name)?.as_str().replace(',', "").parse().ok()
}

/// Parses one step line.
fn parse_step(line: &str) -> Option<Step> {
    if let Some(captures) = BARE_STEP.captures(line) {
        return Some(Step::new(&captures["contig"], Entry::Global, false));
    }

    let captures = STEP.captures(line)?;
    let reversed = &captures["reversed"] == "-";

    let entry = match captures.name("source") {
        None => Entry::Global,
        Some(source) => {
            let source = Span::new(
                source.as_str(),
                number(&captures, "source_start")?,
                number(&captures, "source_end")?,
            );
            let target = Span::new(
                &captures["target"],
                number(&captures, "target_start")?,
                number(&captures, "target_end")?,
            );
            let strand = captures["strand"].parse::<Strand>().ok()?;

            Entry::Alignment(EntryAlignment::new(source, target, strand))
        }
    };

    Some(Step::new(&captures["contig"], entry, reversed))
}

/// Parses every path from exported text.
///
/// Lines that cannot be parsed are skipped, as are headers followed by no
/// parseable step.
///
/// # Examples
///
/// ```
/// use contigpath::navigation::path;
///
/// let text = "Path 1:\n  -> A ( => A [0-1] Contig:- Alignment:+)\n  garbage\n\n";
/// let paths = path::import(text);
///
/// assert_eq!(paths.len(), 1);
/// assert_eq!(paths[0].first().contig(), "A");
/// assert!(paths[0].first().reversed());
/// ```
pub fn import(text: &str) -> Vec<Path> {
    let mut paths = Vec::new();
    let mut steps = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if HEADER.is_match(line) {
            paths.extend(Path::from_steps(std::mem::take(&mut steps)));
            continue;
        }

        match parse_step(line) {
            Some(step) => steps.push(step),
            None => debug!("skipping unparseable path line: {line}"),
        }
    }

    paths.extend(Path::from_steps(steps));
    paths
}
