//! Canonical cluster numbering.
//!
//! Classes of a finished [`DisjointSetForest`] are ordered by descending size,
//! ties broken by each class's lexicographically smallest [`GenomeId`], and
//! numbered densely from zero. The numbering depends only on which genomes
//! share a class, never on forest roots or hash iteration order, so any
//! permutation of the same edge stream yields the same assignment.

use std::{cmp::Reverse, collections::BTreeMap};

use tracing::instrument;

use crate::{
    error::{ClusteringError, Result},
    forest::DisjointSetForest,
    genome_id::GenomeId,
};

/// Identifier assigned to a cluster.
///
/// # Examples
/// ```
/// use genoclust_core::ClusterId;
///
/// let id = ClusterId::new(4);
/// assert_eq!(id.get(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(u32);

impl ClusterId {
    /// Creates a new cluster identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: u32) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u32 { self.0 }
}

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One genome's place in the assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterMembership<'a> {
    /// The genome.
    pub genome: &'a GenomeId,
    /// Cluster the genome belongs to.
    pub cluster_id: ClusterId,
    /// Number of genomes in that cluster.
    pub cluster_size: u32,
}

/// One cluster with its members in ascending [`GenomeId`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    id: ClusterId,
    members: Vec<GenomeId>,
}

impl Cluster {
    /// The cluster's identifier.
    #[must_use]
    pub fn id(&self) -> ClusterId {
        self.id
    }

    /// Members sorted lexicographically.
    #[must_use]
    pub fn members(&self) -> &[GenomeId] {
        &self.members
    }

    /// Number of members; never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`: clusters are built from non-empty classes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The lexicographically smallest member, which also served as the
    /// cluster's tie-break key.
    #[must_use]
    pub fn representative(&self) -> &GenomeId {
        &self.members[0]
    }
}

/// Immutable mapping from genome to `(cluster_id, cluster_size)`.
///
/// Cluster ids form the dense range `0..cluster_count()`, id `0` belongs to
/// the largest cluster, and every genome seen by the forest appears exactly
/// once. The value is read-only once built and can be shared across threads.
///
/// # Examples
/// ```
/// use genoclust_core::{ClusterAssignment, ClusteringDriver};
///
/// let mut driver = ClusteringDriver::new(0.05);
/// for line in ["X\tY\t0.01", "A\tB\t0.01", "B\tC\t0.02"] {
///     driver.consume_line(line);
/// }
/// let mut ingestion = driver.finish();
/// let assignment = ClusterAssignment::from_forest(&mut ingestion.forest)?;
///
/// assert_eq!(assignment.cluster_count(), 2);
/// let a = assignment.get("A").expect("A was seen");
/// assert_eq!((a.cluster_id.get(), a.cluster_size), (0, 3));
/// let y = assignment.get("Y").expect("Y was seen");
/// assert_eq!((y.cluster_id.get(), y.cluster_size), (1, 2));
/// # Ok::<(), genoclust_core::ClusteringError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterAssignment {
    clusters: Vec<Cluster>,
    by_genome: BTreeMap<GenomeId, (ClusterId, u32)>,
}

impl ClusterAssignment {
    /// Numbers the classes of a finished forest.
    ///
    /// # Errors
    /// Returns [`ClusteringError::CapacityExceeded`] when the number of
    /// clusters or a cluster's size exceeds `u32::MAX`.
    #[instrument(name = "core.assign", err, skip(forest), fields(genomes = forest.len()))]
    pub fn from_forest(forest: &mut DisjointSetForest) -> Result<Self> {
        let mut classes: Vec<Vec<GenomeId>> = forest
            .classes()
            .into_values()
            .map(|members| {
                let mut genomes: Vec<GenomeId> = members
                    .into_iter()
                    .map(|node| forest.genome(node).clone())
                    .collect();
                genomes.sort_unstable();
                genomes
            })
            .collect();

        // Members are sorted and non-empty, so `members[0]` is the class key.
        classes.sort_unstable_by(|left, right| {
            Reverse(left.len())
                .cmp(&Reverse(right.len()))
                .then_with(|| left[0].cmp(&right[0]))
        });

        Self::from_sorted_classes(classes)
    }

    fn from_sorted_classes(classes: Vec<Vec<GenomeId>>) -> Result<Self> {
        let mut by_genome = BTreeMap::new();
        let mut clusters = Vec::with_capacity(classes.len());
        for (position, members) in classes.into_iter().enumerate() {
            let id = u32::try_from(position)
                .map(ClusterId::new)
                .map_err(|_| ClusteringError::CapacityExceeded {
                    clusters: position,
                })?;
            let size = u32::try_from(members.len()).map_err(|_| {
                ClusteringError::CapacityExceeded {
                    clusters: members.len(),
                }
            })?;
            for genome in &members {
                by_genome.insert(genome.clone(), (id, size));
            }
            clusters.push(Cluster { id, members });
        }
        Ok(Self {
            clusters,
            by_genome,
        })
    }

    /// Number of clusters.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Number of genomes covered by the assignment.
    #[must_use]
    pub fn genome_count(&self) -> usize {
        self.by_genome.len()
    }

    /// Returns `true` when no genome was seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Clusters in ascending id order (descending size).
    #[must_use]
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Looks up a cluster by id.
    #[must_use]
    pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(usize::try_from(id.get()).ok()?)
    }

    /// Looks up the membership of a canonical genome identifier.
    #[must_use]
    pub fn get(&self, genome: &str) -> Option<ClusterMembership<'_>> {
        self.by_genome
            .get_key_value(genome)
            .map(|(genome, &(cluster_id, cluster_size))| ClusterMembership {
                genome,
                cluster_id,
                cluster_size,
            })
    }

    /// Iterates every genome ordered by cluster id, then genome id.
    pub fn memberships(&self) -> impl Iterator<Item = ClusterMembership<'_>> {
        self.clusters.iter().flat_map(|cluster| {
            let cluster_size = u32::try_from(cluster.len()).unwrap_or(u32::MAX);
            cluster.members.iter().map(move |genome| ClusterMembership {
                genome,
                cluster_id: cluster.id,
                cluster_size,
            })
        })
    }
}
