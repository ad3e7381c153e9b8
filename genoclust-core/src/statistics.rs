//! Summary statistics over a finished [`ClusterAssignment`].

use std::collections::BTreeMap;

use crate::assignment::ClusterAssignment;

/// Cluster-size summary derived from an assignment.
///
/// # Examples
/// ```
/// use genoclust_core::{ClusterAssignment, ClusterStatistics, ClusteringDriver};
///
/// let mut driver = ClusteringDriver::new(0.05);
/// for line in ["A\tB\t0.01", "B\tC\t0.01", "D\tE\t0.9"] {
///     driver.consume_line(line);
/// }
/// let mut ingestion = driver.finish();
/// let assignment = ClusterAssignment::from_forest(&mut ingestion.forest)?;
/// let stats = ClusterStatistics::from_assignment(&assignment);
///
/// assert_eq!(stats.genomes, 5);
/// assert_eq!(stats.clusters, 3);
/// assert_eq!(stats.singletons, 2);
/// assert_eq!(stats.largest, 3);
/// assert!((stats.mean_size - 5.0 / 3.0).abs() < 1e-12);
/// # Ok::<(), genoclust_core::ClusteringError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterStatistics {
    /// Distinct genomes.
    pub genomes: usize,
    /// Clusters.
    pub clusters: usize,
    /// Clusters holding exactly one genome.
    pub singletons: usize,
    /// Size of the largest cluster, `0` when there are no clusters.
    pub largest: usize,
    /// Arithmetic mean of cluster sizes, `0.0` when there are no clusters.
    pub mean_size: f64,
    histogram: BTreeMap<usize, usize>,
}

impl ClusterStatistics {
    /// Computes the summary; the assignment is only read.
    #[must_use]
    pub fn from_assignment(assignment: &ClusterAssignment) -> Self {
        let mut histogram: BTreeMap<usize, usize> = BTreeMap::new();
        for cluster in assignment.clusters() {
            *histogram.entry(cluster.len()).or_default() += 1;
        }

        let genomes = assignment.genome_count();
        let clusters = assignment.cluster_count();
        let mean_size = if clusters == 0 {
            0.0
        } else {
            genomes as f64 / clusters as f64
        };

        Self {
            genomes,
            clusters,
            singletons: histogram.get(&1).copied().unwrap_or(0),
            largest: histogram.keys().next_back().copied().unwrap_or(0),
            mean_size,
            histogram,
        }
    }

    /// Number of clusters per cluster size, ordered by size.
    #[must_use]
    pub fn size_histogram(&self) -> &BTreeMap<usize, usize> {
        &self.histogram
    }
}
