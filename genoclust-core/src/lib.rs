//! Genome clustering core library.
//!
//! Streams an all-vs-all genome distance table through a disjoint-set forest
//! to build single-linkage clusters, numbers the clusters canonically, and
//! derives representatives and leakage-free dataset splits from them.
//!
//! Pipeline: [`parse_record`] turns each line into a [`DistanceEdge`];
//! [`ClusteringDriver`] feeds edges into a [`DisjointSetForest`];
//! [`ClusterAssignment::from_forest`] numbers the resulting classes; and
//! [`ClusterStatistics`] summarises the assignment. [`GenomeClusterer`] runs
//! the whole pipeline over a reader.

mod assignment;
mod builder;
mod clusterer;
mod driver;
mod error;
mod forest;
mod genome_id;
mod record;
mod split;
mod statistics;

#[cfg(test)]
mod test_utils;

pub use crate::{
    assignment::{Cluster, ClusterAssignment, ClusterId, ClusterMembership},
    builder::{DEFAULT_THRESHOLD, GenomeClustererBuilder},
    clusterer::{ClusteringOutcome, GenomeClusterer},
    driver::{ClusteringDriver, EdgeCounts, Ingestion, SkippedLine},
    error::{ClusteringError, ClusteringErrorCode, RecordError, RecordErrorCode, Result},
    forest::{DisjointSetForest, NodeIndex},
    genome_id::{FASTA_EXTENSIONS, GenomeId},
    record::{DistanceEdge, ParsedLine, parse_record},
    split::{
        DatasetSplit, Representative, SplitError, SplitErrorCode, SplitRatio,
        split_representatives,
    },
    statistics::ClusterStatistics,
};
