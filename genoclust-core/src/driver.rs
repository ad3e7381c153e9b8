//! Streaming ingestion of distance records into a [`DisjointSetForest`].
//!
//! The driver realises single-linkage clustering: every edge whose distance
//! is at most the threshold merges the classes of its endpoints, so two
//! genomes end up together iff a chain of such edges connects them. Edges
//! above the threshold still register both genomes. Malformed records are
//! collected as [`SkippedLine`]s and ingestion carries on.

use tracing::{debug, info, warn};

use crate::{
    error::RecordError,
    forest::DisjointSetForest,
    record::{DistanceEdge, ParsedLine, parse_record},
};

const PROGRESS_INTERVAL: u64 = 1_000_000;

/// Edge tallies accumulated while ingesting a distance stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeCounts {
    /// Well-formed edges read, self-edges included.
    pub total_edges: u64,
    /// Edges between distinct genomes with `distance <= threshold`.
    pub edges_below_threshold: u64,
}

/// A record that was skipped because it could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedLine {
    /// One-based line number within the stream.
    pub line: u64,
    /// Raw line content, without its line terminator.
    pub content: String,
    /// Why the record was rejected.
    pub reason: RecordError,
}

/// Everything the driver learnt from a fully consumed stream.
#[derive(Clone, Debug)]
pub struct Ingestion {
    /// Frozen forest holding every genome that was seen.
    pub forest: DisjointSetForest,
    /// Edge tallies.
    pub edges: EdgeCounts,
    /// Records rejected by the parser, in stream order.
    pub skipped: Vec<SkippedLine>,
}

/// Feeds parsed edges into a forest one line at a time.
///
/// # Examples
/// ```
/// use genoclust_core::ClusteringDriver;
///
/// let mut driver = ClusteringDriver::new(0.05);
/// for line in ["#query\tref\tdist", "A\tB\t0.01", "B\tC\t0.5", "broken"] {
///     driver.consume_line(line);
/// }
/// let ingestion = driver.finish();
/// assert_eq!(ingestion.forest.len(), 3);
/// assert_eq!(ingestion.forest.class_count(), 2);
/// assert_eq!(ingestion.edges.total_edges, 2);
/// assert_eq!(ingestion.edges.edges_below_threshold, 1);
/// assert_eq!(ingestion.skipped.len(), 1);
/// assert_eq!(ingestion.skipped[0].line, 4);
/// ```
#[derive(Debug)]
pub struct ClusteringDriver {
    threshold: f64,
    forest: DisjointSetForest,
    edges: EdgeCounts,
    skipped: Vec<SkippedLine>,
    lines_read: u64,
    progress_interval: u64,
}

impl ClusteringDriver {
    /// Creates a driver merging edges with `distance <= threshold`.
    ///
    /// The threshold is not validated here; use
    /// [`crate::GenomeClustererBuilder`] for a checked entry point.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self::with_progress_interval(threshold, PROGRESS_INTERVAL)
    }

    /// Creates a driver logging progress every `interval` lines.
    ///
    /// An `interval` of zero is treated as one.
    pub(crate) fn with_progress_interval(threshold: f64, interval: u64) -> Self {
        Self {
            threshold,
            forest: DisjointSetForest::new(),
            edges: EdgeCounts::default(),
            skipped: Vec::new(),
            lines_read: 0,
            progress_interval: interval.max(1),
        }
    }

    /// The merge threshold in use.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Number of lines consumed so far, including skipped ones.
    #[must_use]
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Parses and applies the next line of the stream.
    pub fn consume_line(&mut self, line: &str) {
        self.lines_read += 1;
        if self.lines_read % self.progress_interval == 0 {
            info!(
                lines = self.lines_read,
                genomes = self.forest.len(),
                "ingestion progress"
            );
        }

        match parse_record(line) {
            Ok(ParsedLine::Edge(edge)) => self.apply_edge(&edge),
            Ok(ParsedLine::Skip) => {}
            Err(reason) => {
                debug!(line = self.lines_read, %reason, "skipping malformed record");
                self.skipped.push(SkippedLine {
                    line: self.lines_read,
                    content: line.trim_end_matches(['\r', '\n']).to_owned(),
                    reason,
                });
            }
        }
    }

    /// Applies an already parsed edge.
    ///
    /// Both endpoints are registered and the edge is counted before the
    /// threshold is consulted.
    pub fn apply_edge(&mut self, edge: &DistanceEdge) {
        let source = self.forest.ensure(edge.source());
        let target = self.forest.ensure(edge.target());
        self.edges.total_edges += 1;

        if source != target && edge.distance() <= self.threshold {
            self.forest.union(source, target);
            self.edges.edges_below_threshold += 1;
        }
    }

    /// Ends ingestion and hands over the frozen forest.
    #[must_use]
    pub fn finish(self) -> Ingestion {
        info!(
            lines = self.lines_read,
            genomes = self.forest.len(),
            total_edges = self.edges.total_edges,
            edges_below_threshold = self.edges.edges_below_threshold,
            "ingestion completed"
        );
        if !self.skipped.is_empty() {
            warn!(
                skipped_lines = self.skipped.len(),
                "malformed distance records were skipped"
            );
        }
        Ingestion {
            forest: self.forest,
            edges: self.edges,
            skipped: self.skipped,
        }
    }
}
