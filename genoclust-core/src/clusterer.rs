//! Clustering orchestration.
//!
//! Provides the [`GenomeClusterer`] entry point which drives a distance
//! stream through parsing, union-find ingestion and canonical numbering.

use std::{io::BufRead, sync::Arc};

use tracing::{info, instrument};

use crate::{
    Result,
    assignment::ClusterAssignment,
    driver::{ClusteringDriver, EdgeCounts, Ingestion, SkippedLine},
    error::ClusteringError,
    statistics::ClusterStatistics,
};

/// Complete result of one clustering run.
///
/// A run either yields this value in full or fails; there is no partial
/// outcome.
#[derive(Debug, Clone)]
pub struct ClusteringOutcome {
    /// Canonical cluster assignment.
    pub assignment: ClusterAssignment,
    /// Edge tallies gathered during ingestion.
    pub edges: EdgeCounts,
    /// Records skipped as malformed, in stream order.
    pub skipped: Vec<SkippedLine>,
}

impl ClusteringOutcome {
    /// Summary statistics of the assignment.
    #[must_use]
    pub fn statistics(&self) -> ClusterStatistics {
        ClusterStatistics::from_assignment(&self.assignment)
    }
}

/// Entry point for clustering a distance stream.
///
/// # Examples
/// ```
/// use genoclust_core::GenomeClustererBuilder;
///
/// let table = "#query\treference\tdistance\n\
///              a/A.fa\tB.fa\t0.01\n\
///              B.fa\tC.fa\t0.01\n\
///              D.fna\tE.fna\t0.9\n";
/// let outcome = GenomeClustererBuilder::new()
///     .with_threshold(0.05)
///     .build()?
///     .run(table.as_bytes())?;
///
/// assert_eq!(outcome.assignment.cluster_count(), 3);
/// assert_eq!(outcome.edges.total_edges, 3);
/// assert_eq!(outcome.edges.edges_below_threshold, 2);
/// assert!(outcome.skipped.is_empty());
/// # Ok::<(), genoclust_core::ClusteringError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GenomeClusterer {
    threshold: f64,
}

impl GenomeClusterer {
    pub(crate) fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Returns the merge threshold.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Clusters every record readable from `reader`.
    ///
    /// # Errors
    /// Returns [`ClusteringError::Read`] as soon as reading fails (including
    /// invalid UTF-8), and [`ClusteringError::CapacityExceeded`] when the
    /// assignment cannot be numbered with 32-bit identifiers.
    #[instrument(name = "core.run", err, skip(self, reader), fields(threshold = self.threshold))]
    pub fn run<R: BufRead>(&self, mut reader: R) -> Result<ClusteringOutcome> {
        let mut driver = ClusteringDriver::new(self.threshold);
        let mut buffer = String::new();
        loop {
            buffer.clear();
            match reader.read_line(&mut buffer) {
                Ok(0) => break,
                Ok(_) => driver.consume_line(&buffer),
                Err(source) => {
                    return Err(ClusteringError::Read {
                        line: driver.lines_read() + 1,
                        source: Arc::new(source),
                    });
                }
            }
        }
        Self::finalise(driver.finish())
    }

    /// Clusters an in-memory sequence of lines.
    ///
    /// # Errors
    /// Returns [`ClusteringError::CapacityExceeded`] when the assignment
    /// cannot be numbered with 32-bit identifiers.
    #[instrument(name = "core.run_lines", err, skip(self, lines), fields(threshold = self.threshold))]
    pub fn run_lines<I>(&self, lines: I) -> Result<ClusteringOutcome>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut driver = ClusteringDriver::new(self.threshold);
        for line in lines {
            driver.consume_line(line.as_ref());
        }
        Self::finalise(driver.finish())
    }

    fn finalise(ingestion: Ingestion) -> Result<ClusteringOutcome> {
        let Ingestion {
            mut forest,
            edges,
            skipped,
        } = ingestion;
        let assignment = ClusterAssignment::from_forest(&mut forest)?;
        info!(
            genomes = assignment.genome_count(),
            clusters = assignment.cluster_count(),
            skipped_lines = skipped.len(),
            "clustering completed"
        );
        Ok(ClusteringOutcome {
            assignment,
            edges,
            skipped,
        })
    }
}
