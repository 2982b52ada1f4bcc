//! A binary to load a dataset and replay exported navigation paths against it.
//!
//! ```shell
//! cargo run --release --bin=contigpath-replay --features=binaries -- \
//!     --fasta genome.fa telomeres.bed alignments.tsv.gz --paths exported_paths.txt
//! ```
//!
//! It carries out the following:
//!
//! * Loading the genome index (or scanning the FASTA when no index is given),
//!   the telomere annotations, and the alignment blocks.
//! * Printing a table of the loaded contigs and their place in the global
//!   view.
//! * Replaying every path in an exported path file from the global view,
//!   running each step through the same validation as interactive
//!   navigation, and reporting the outcome of each path.

use std::fs::File;
use std::io::BufReader;
use std::io::Read as _;
use std::path::Path;
use std::path::PathBuf;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use contigpath::alignment::loader::DEFAULT_MIN_ALIGNMENT_LENGTH;
use contigpath::contig::registry::DEFAULT_MIN_TELOMERE_LENGTH;
use contigpath::dataset::Builder;
use contigpath::index::Index;
use contigpath::input;
use contigpath::navigation::path;
use contigpath::navigation::Entry;
use contigpath::projection::Projector;
use contigpath::sequence::Fetcher;
use contigpath::Dataset;
use contigpath::Navigator;
use omics::coordinate::position::Number;
use tabled::builder::Builder as TableBuilder;
use tabled::settings::object::Rows;
use tabled::settings::Alignment;
use tabled::settings::Style;
use tracing::info;
use tracing::warn;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Args {
    /// The telomere annotations (at least six tab-separated columns).
    telomeres: PathBuf,

    /// The alignment blocks (at least eleven tab-separated columns).
    alignments: PathBuf,

    /// The genome index. When absent, the index is derived from `--fasta`.
    #[arg(short, long)]
    index: Option<PathBuf>,

    /// The uncompressed reference FASTA.
    #[arg(short, long)]
    fasta: Option<PathBuf>,

    /// A file of exported paths to replay.
    #[arg(short, long)]
    paths: Option<PathBuf>,

    /// Whether to print the sequence of every alignment followed during a
    /// replay. Requires `--fasta`.
    #[arg(short, long, default_value_t = false)]
    sequences: bool,

    /// The minimum aligned length of a loaded alignment.
    #[arg(long, default_value_t = DEFAULT_MIN_ALIGNMENT_LENGTH)]
    min_alignment_length: Number,

    /// The minimum length of a telomere interval.
    #[arg(long, default_value_t = DEFAULT_MIN_TELOMERE_LENGTH)]
    min_telomere_length: Number,

    #[command(flatten)]
    verbose: Verbosity,
}

/// Reads the index, or derives it from the FASTA.
fn load_index(args: &Args) -> Result<Index> {
    match (&args.index, &args.fasta) {
        (Some(path), _) => {
            let reader = input::open(path)
                .with_context(|| format!("opening index: {}", path.display()))?;
            Index::read(reader).with_context(|| format!("reading index: {}", path.display()))
        }
        (None, Some(path)) => {
            info!("no index given; scanning {}", path.display());
            let reader = input::open(path)
                .with_context(|| format!("opening FASTA: {}", path.display()))?;
            Index::scan_fasta(reader)
                .with_context(|| format!("scanning FASTA: {}", path.display()))
        }
        (None, None) => bail!("either `--index` or `--fasta` must be provided"),
    }
}

/// Loads the full dataset.
fn load(args: &Args) -> Result<Dataset> {
    let index = load_index(args)?;

    let telomeres = input::open(&args.telomeres)
        .with_context(|| format!("opening telomeres: {}", args.telomeres.display()))?;
    let alignments = input::open(&args.alignments)
        .with_context(|| format!("opening alignments: {}", args.alignments.display()))?;

    Builder::default()
        .min_alignment_length(args.min_alignment_length)
        .min_telomere_length(args.min_telomere_length)
        .try_build_from(index, telomeres, alignments)
        .context("loading dataset")
}

/// Prints every contig with its place in the global view.
fn print_contigs(dataset: &Dataset) {
    let global = Projector::new(dataset).global(false);

    let mut builder = TableBuilder::default();
    builder.push_record(["Contig", "Length", "Telomeres", "Global offset", "Alignments to"]);

    for contig in dataset.registry().contigs() {
        let offset = global
            .x_layout()
            .offset(contig.name())
            .map(path::thousands)
            .unwrap_or(String::from("--"));

        builder.push_record([
            contig.name(),
            &path::thousands(contig.length()),
            &contig.telomeres().len().to_string(),
            &offset,
            &dataset.alignments_to(contig.name()).count().to_string(),
        ]);
    }

    let table = builder
        .build()
        .with(Style::rounded())
        .modify(Rows::new(1..), Alignment::left())
        .to_string();

    println!("{}", table);
}

/// Prints the sequence of every alignment followed along the current path.
fn print_sequences(args: &Args, dataset: &Dataset, navigator: &Navigator) -> Result<()> {
    let Some(fasta) = &args.fasta else {
        bail!("`--sequences` requires `--fasta`");
    };

    let file = File::open(fasta).with_context(|| format!("opening FASTA: {}", fasta.display()))?;
    let mut fetcher = Fetcher::new(dataset.index(), BufReader::new(file));

    for step in navigator.steps() {
        let Entry::Alignment(entry) = step.entry() else {
            continue;
        };

        let Some(alignment) = dataset
            .alignments_to(entry.source().name())
            .find(|alignment| entry.matches(alignment))
        else {
            continue;
        };

        let view = fetcher
            .segment_view(alignment)
            .with_context(|| format!("fetching sequence for step into {}", step.contig()))?;
        print!("{}", view);
    }

    Ok(())
}

/// Replays every exported path and reports the outcome of each.
fn replay(args: &Args, dataset: &Dataset, file: &Path) -> Result<()> {
    let mut text = String::new();
    input::open(file)
        .and_then(|mut reader| reader.read_to_string(&mut text))
        .with_context(|| format!("reading paths: {}", file.display()))?;

    let paths = path::import(&text);
    info!("imported {} paths from {}", paths.len(), file.display());

    let mut builder = TableBuilder::default();
    builder.push_record(["Path", "Steps", "Outcome"]);

    let mut failures = 0usize;

    for (i, recorded) in paths.iter().enumerate() {
        let mut navigator = Navigator::new();

        let outcome = match navigator.replay(dataset, recorded) {
            Ok(()) => {
                if args.sequences {
                    print_sequences(args, dataset, &navigator)?;
                }

                navigator.breadcrumb()
            }
            Err(err) => {
                warn!("path {} could not be replayed: {err}", i + 1);
                failures += 1;
                format!("failed: {err}")
            }
        };

        builder.push_record([(i + 1).to_string(), recorded.len().to_string(), outcome]);
    }

    let table = builder
        .build()
        .with(Style::rounded())
        .modify(Rows::new(1..), Alignment::left())
        .to_string();

    println!("{}", table);

    if failures > 0 {
        bail!("{failures} of {} paths could not be replayed", paths.len());
    }

    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let dataset = load(args)?;

    let summary = dataset.alignment_summary();
    info!(
        "{} alignments loaded; {} ignored, {} too short, {} unknown contig, {} malformed",
        summary.accepted, summary.ignored, summary.too_short, summary.unknown_contig, summary.malformed
    );

    print_contigs(&dataset);

    if let Some(file) = &args.paths {
        replay(args, &dataset, file)?;
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .init(),
    };

    run(&args)
}
