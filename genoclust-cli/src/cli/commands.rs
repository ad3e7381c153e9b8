//! Command implementations and argument parsing for the `genoclust` CLI.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use genoclust_core::{
    ClusterStatistics, ClusteringError, DEFAULT_THRESHOLD, EdgeCounts, GenomeClustererBuilder,
    SplitError, SplitRatio, split_representatives,
};
use rand::{SeedableRng, rngs::SmallRng};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::membership::{MembershipRowError, read_representatives};
use super::output::{StagedFile, write_cluster_table, write_membership, write_split};

/// Seed used for the split shuffle when none is given.
pub const DEFAULT_SEED: u64 = 42;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "genoclust",
    about = "Cluster genomes by pairwise distance and build leakage-free dataset splits."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Single-linkage clustering of a pairwise distance table.
    Cluster(ClusterCommand),
    /// One representative per cluster, split into train, validation, and test.
    Split(SplitCommand),
}

/// Options accepted by the `cluster` command.
#[derive(Debug, Args, Clone)]
pub struct ClusterCommand {
    /// Tab-separated distance table with `query`, `reference`, and `distance`
    /// columns; extra columns and `#` lines are ignored.
    pub input: PathBuf,

    /// Destination of the `genome\tcluster_id\tcluster_size` membership file.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Largest distance at which two genomes are merged.
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Optional destination of the per-cluster `cluster_id\tsize\trepresentative` table.
    #[arg(long)]
    pub stats: Option<PathBuf>,
}

/// Options accepted by the `split` command.
#[derive(Debug, Args, Clone)]
pub struct SplitCommand {
    /// Membership file written by `cluster`.
    pub membership: PathBuf,

    /// Directory receiving the split files.
    #[arg(short, long = "output-dir")]
    pub output_dir: PathBuf,

    /// Train, validation, and test weights as `a:b:c`.
    #[arg(long = "split-ratio", default_value_t = SplitRatio::default())]
    pub split_ratio: SplitRatio,

    /// Seed for the cluster shuffle.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Opening, reading, or writing a file failed.
    #[error("failed to access `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Clustering failed.
    #[error(transparent)]
    Core(#[from] ClusteringError),
    /// The split could not be configured.
    #[error(transparent)]
    Split(#[from] SplitError),
    /// A membership file row was malformed.
    #[error("malformed membership row at `{path}` line {line}: {reason}")]
    Membership {
        /// File being read.
        path: PathBuf,
        /// One-based line number.
        line: u64,
        /// What was wrong with the row.
        #[source]
        reason: MembershipRowError,
    },
}

impl CliError {
    /// Stable code of the library error behind this failure, if any.
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Core(err) => Some(err.code().as_str()),
            Self::Split(err) => Some(err.code().as_str()),
            Self::Io { .. } | Self::Membership { .. } => None,
        }
    }
}

/// Outcome of the `cluster` command.
#[derive(Debug, Clone)]
pub struct ClusterSummary {
    /// Distance table that was read.
    pub input: PathBuf,
    /// Membership file that was written.
    pub output: PathBuf,
    /// Per-cluster table that was written, if requested.
    pub stats_output: Option<PathBuf>,
    /// Merge threshold in effect.
    pub threshold: f64,
    /// Edge tallies from ingestion.
    pub edges: EdgeCounts,
    /// Number of malformed lines skipped.
    pub skipped_lines: usize,
    /// Cluster-size summary.
    pub statistics: ClusterStatistics,
}

/// Outcome of the `split` command.
#[derive(Debug, Clone)]
pub struct SplitSummary {
    /// Membership file that was read.
    pub membership: PathBuf,
    /// Directory holding the split files.
    pub output_dir: PathBuf,
    /// Ratio the clusters were cut by.
    pub ratio: SplitRatio,
    /// Shuffle seed.
    pub seed: u64,
    /// Clusters, and therefore representatives.
    pub clusters: usize,
    /// Genomes across all clusters.
    pub genomes: u64,
    /// Representatives in the training split.
    pub train: usize,
    /// Representatives in the validation split.
    pub validation: usize,
    /// Representatives in the test split.
    pub test: usize,
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub enum ExecutionSummary {
    /// Result of `cluster`.
    Cluster(ClusterSummary),
    /// Result of `split`.
    Split(SplitSummary),
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when reading, clustering, splitting, or writing fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use genoclust_cli::cli::{Cli, ClusterCommand, Command, ExecutionSummary, run_cli};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// let input = dir.path().join("distances.tsv");
/// std::fs::write(&input, "A\tB\t0.01\nB\tC\t0.2\n")?;
/// let cli = Cli {
///     command: Command::Cluster(ClusterCommand {
///         input,
///         output: dir.path().join("clusters.tsv"),
///         threshold: 0.05,
///         stats: None,
///     }),
/// };
/// let ExecutionSummary::Cluster(summary) = run_cli(cli)? else {
///     unreachable!("cluster command yields a cluster summary");
/// };
/// assert_eq!(summary.statistics.clusters, 2);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Cluster(command) => {
            span.record("command", field::display("cluster"));
            run_cluster(command).map(ExecutionSummary::Cluster)
        }
        Command::Split(command) => {
            span.record("command", field::display("split"));
            run_split(command).map(ExecutionSummary::Split)
        }
    }
}

#[instrument(
    name = "cli.cluster",
    err,
    skip(command),
    fields(input = %command.input.display(), threshold = command.threshold),
)]
pub(super) fn run_cluster(command: ClusterCommand) -> Result<ClusterSummary, CliError> {
    let ClusterCommand {
        input,
        output,
        threshold,
        stats,
    } = command;
    let clusterer = GenomeClustererBuilder::new()
        .with_threshold(threshold)
        .build()?;
    let outcome = clusterer.run(open_reader(&input)?)?;

    // Both outputs are rendered before either replaces its destination.
    let membership = StagedFile::stage(&output, |writer| {
        write_membership(&outcome.assignment, writer)
    })?;
    let table = stats
        .as_deref()
        .map(|path| {
            StagedFile::stage(path, |writer| {
                write_cluster_table(&outcome.assignment, writer)
            })
        })
        .transpose()?;
    membership.commit()?;
    if let Some(table) = table {
        table.commit()?;
    }

    let statistics = outcome.statistics();
    info!(
        genomes = statistics.genomes,
        clusters = statistics.clusters,
        output = %output.display(),
        "command completed"
    );
    Ok(ClusterSummary {
        input,
        output,
        stats_output: stats,
        threshold,
        edges: outcome.edges,
        skipped_lines: outcome.skipped.len(),
        statistics,
    })
}

#[instrument(
    name = "cli.split",
    err,
    skip(command),
    fields(
        membership = %command.membership.display(),
        ratio = %command.split_ratio,
        seed = command.seed,
        clusters = field::Empty,
    ),
)]
pub(super) fn run_split(command: SplitCommand) -> Result<SplitSummary, CliError> {
    let SplitCommand {
        membership,
        output_dir,
        split_ratio,
        seed,
    } = command;
    let representatives = read_representatives(open_reader(&membership)?, &membership)?;
    Span::current().record("clusters", representatives.len());

    let split = split_representatives(
        &representatives,
        split_ratio,
        SmallRng::seed_from_u64(seed),
    );
    let summary = SplitSummary {
        clusters: representatives.len(),
        genomes: representatives
            .iter()
            .map(|rep| u64::from(rep.cluster_size))
            .sum(),
        train: split.train.len(),
        validation: split.validation.len(),
        test: split.test.len(),
        membership,
        output_dir,
        ratio: split_ratio,
        seed,
    };
    write_split(&summary.output_dir, &split, &summary)?;

    info!(
        clusters = summary.clusters,
        output_dir = %summary.output_dir.display(),
        "command completed"
    );
    Ok(summary)
}

#[instrument(name = "cli.open_reader", err)]
pub(super) fn open_reader(path: &Path) -> Result<BufReader<File>, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Cluster(summary) => render_cluster(summary, &mut writer),
        ExecutionSummary::Split(summary) => render_split(summary, &mut writer),
    }
}

fn render_cluster(summary: &ClusterSummary, writer: &mut impl Write) -> io::Result<()> {
    let stats = &summary.statistics;
    writeln!(writer, "input: {}", summary.input.display())?;
    writeln!(writer, "threshold: {}", summary.threshold)?;
    writeln!(writer, "genomes: {}", stats.genomes)?;
    writeln!(writer, "pairwise comparisons: {}", summary.edges.total_edges)?;
    writeln!(
        writer,
        "pairs below threshold: {}",
        summary.edges.edges_below_threshold
    )?;
    writeln!(writer, "skipped lines: {}", summary.skipped_lines)?;
    writeln!(writer, "clusters: {}", stats.clusters)?;
    writeln!(writer, "singletons: {}", stats.singletons)?;
    writeln!(writer, "largest cluster: {}", stats.largest)?;
    writeln!(writer, "mean cluster size: {:.2}", stats.mean_size)?;
    writeln!(writer, "size distribution:")?;
    for (size, count) in stats.size_histogram() {
        writeln!(writer, "  {size}\t{count}")?;
    }
    writeln!(writer, "membership: {}", summary.output.display())?;
    if let Some(path) = &summary.stats_output {
        writeln!(writer, "cluster table: {}", path.display())?;
    }
    Ok(())
}

fn render_split(summary: &SplitSummary, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "membership: {}", summary.membership.display())?;
    writeln!(writer, "representatives: {}", summary.clusters)?;
    writeln!(writer, "split ratio: {}", summary.ratio)?;
    writeln!(writer, "seed: {}", summary.seed)?;
    writeln!(writer, "train: {}", summary.train)?;
    writeln!(writer, "validation: {}", summary.validation)?;
    writeln!(writer, "test: {}", summary.test)?;
    writeln!(writer, "output directory: {}", summary.output_dir.display())?;
    Ok(())
}
