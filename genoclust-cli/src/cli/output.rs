//! Tab-separated writers for cluster memberships and dataset splits.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use genoclust_core::{ClusterAssignment, DatasetSplit, Representative};
use tracing::debug;

use super::CliError;
use super::commands::SplitSummary;

/// Writes one `genome\tcluster_id\tcluster_size` row per genome, ordered by
/// cluster id and then genome.
///
/// # Errors
/// Returns any error raised by `writer`.
///
/// # Examples
/// ```
/// use genoclust_cli::cli::write_membership;
/// use genoclust_core::GenomeClustererBuilder;
///
/// let outcome = GenomeClustererBuilder::new()
///     .build()?
///     .run_lines(["B\tA\t0.01", "C\tC\t0"])?;
/// let mut buffer = Vec::new();
/// write_membership(&outcome.assignment, &mut buffer)?;
/// assert_eq!(
///     String::from_utf8(buffer)?,
///     "genome\tcluster_id\tcluster_size\nA\t0\t2\nB\t0\t2\nC\t1\t1\n",
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn write_membership<W: Write>(assignment: &ClusterAssignment, mut writer: W) -> io::Result<()> {
    writeln!(writer, "genome\tcluster_id\tcluster_size")?;
    for membership in assignment.memberships() {
        writeln!(
            writer,
            "{}\t{}\t{}",
            membership.genome, membership.cluster_id, membership.cluster_size
        )?;
    }
    Ok(())
}

/// Writes one `cluster_id\tsize\trepresentative` row per cluster.
///
/// # Errors
/// Returns any error raised by `writer`.
pub fn write_cluster_table<W: Write>(
    assignment: &ClusterAssignment,
    mut writer: W,
) -> io::Result<()> {
    writeln!(writer, "cluster_id\tsize\trepresentative")?;
    for cluster in assignment.clusters() {
        writeln!(
            writer,
            "{}\t{}\t{}",
            cluster.id(),
            cluster.len(),
            cluster.representative()
        )?;
    }
    Ok(())
}

/// Output rendered next to its destination and not yet moved into place.
///
/// Dropping an uncommitted file removes the staged copy, so a failed command
/// never leaves a partially written or orphaned output behind.
#[derive(Debug)]
pub(super) struct StagedFile {
    staged: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl StagedFile {
    /// Renders into `<path>.partial` through a buffered writer and flushes it.
    pub(super) fn stage<F>(path: &Path, render: F) -> Result<Self, CliError>
    where
        F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
    {
        let mut staged = path.as_os_str().to_owned();
        staged.push(".partial");
        let staged = Self {
            staged: PathBuf::from(staged),
            target: path.to_path_buf(),
            committed: false,
        };
        let io_error = |source| CliError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = File::create(&staged.staged)
            .map(BufWriter::new)
            .map_err(io_error)?;
        render(&mut writer)
            .and_then(|()| writer.flush())
            .map_err(io_error)?;
        Ok(staged)
    }

    /// Moves the staged copy over the destination.
    pub(super) fn commit(mut self) -> Result<(), CliError> {
        fs::rename(&self.staged, &self.target).map_err(|source| CliError::Io {
            path: self.target.clone(),
            source,
        })?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed && fs::remove_file(&self.staged).is_err() {
            debug!(path = %self.staged.display(), "staged output already gone");
        }
    }
}

/// Stages and immediately commits a single output file.
pub(super) fn write_file<F>(path: &Path, render: F) -> Result<(), CliError>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    StagedFile::stage(path, render)?.commit()
}

/// Writes the per-split accession lists, the `accession\tcluster` tables,
/// `all_representatives.txt`, and `summary.txt` into `dir`, creating it when
/// missing.
pub(super) fn write_split(
    dir: &Path,
    split: &DatasetSplit,
    summary: &SplitSummary,
) -> Result<(), CliError> {
    fs::create_dir_all(dir).map_err(|source| CliError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for (name, representatives) in split.named() {
        write_file(&dir.join(format!("{name}_accessions.txt")), |writer| {
            write_accessions(representatives, writer)
        })?;
        write_file(&dir.join(format!("{name}_with_clusters.tsv")), |writer| {
            writeln!(writer, "accession\tcluster")?;
            for rep in representatives {
                writeln!(writer, "{}\t{}", rep.genome, rep.cluster_id)?;
            }
            Ok(())
        })?;
    }

    write_file(&dir.join("all_representatives.txt"), |writer| {
        split
            .named()
            .into_iter()
            .try_for_each(|(_, representatives)| write_accessions(representatives, writer))
    })?;
    write_file(&dir.join("summary.txt"), |writer| {
        write_split_report(summary, writer)
    })
}

fn write_accessions<W: Write>(representatives: &[Representative], writer: &mut W) -> io::Result<()> {
    representatives
        .iter()
        .try_for_each(|rep| writeln!(writer, "{}", rep.genome))
}

fn write_split_report<W: Write>(summary: &SplitSummary, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "Cluster Representatives Dataset")?;
    writeln!(writer, "{}", "=".repeat(40))?;
    writeln!(writer, "Source: {}", summary.membership.display())?;
    writeln!(writer, "Total representatives: {}", summary.clusters)?;
    writeln!(writer, "Genomes covered: {}", summary.genomes)?;
    writeln!(writer, "Split ratio: {}", summary.ratio)?;
    writeln!(writer, "Seed: {}", summary.seed)?;
    writeln!(writer)?;
    writeln!(writer, "Train: {}", summary.train)?;
    writeln!(writer, "Validation: {}", summary.validation)?;
    writeln!(writer, "Test: {}", summary.test)?;
    Ok(())
}
