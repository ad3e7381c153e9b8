//! Disjoint-set forest over lazily discovered genomes.
//!
//! Genomes are interned on first sight into a dense index space; every
//! `find`/`union` afterwards works on [`NodeIndex`] values only. The forest
//! holds one parent slot and one rank slot per distinct genome plus the
//! identifier table, so memory grows with the number of genomes rather than
//! with the number of edges streamed through it (all-vs-all tables carry
//! quadratically many edges).
//!
//! Path compression in [`DisjointSetForest::find`] and union by rank in
//! [`DisjointSetForest::union`] give amortised `O(log* n)` operations and
//! bound every tree height by `O(log n)`. Rank ties are resolved towards the
//! root with the lower index, i.e. the genome discovered first, so repeated
//! runs over the same stream build the same trees.

use std::collections::{BTreeMap, HashMap};

use crate::genome_id::GenomeId;

/// Dense index of a genome within a [`DisjointSetForest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Returns the underlying position in the forest.
    #[rustfmt::skip]
    #[must_use]
    pub fn get(self) -> usize { self.0 }
}

/// Union-find structure keyed by [`GenomeId`].
///
/// # Examples
/// ```
/// use genoclust_core::{DisjointSetForest, GenomeId};
///
/// let mut forest = DisjointSetForest::new();
/// let a = forest.ensure(&GenomeId::canonicalize("A"));
/// let b = forest.ensure(&GenomeId::canonicalize("B"));
/// let c = forest.ensure(&GenomeId::canonicalize("C"));
/// assert!(forest.union(a, b));
/// assert!(!forest.union(b, a));
/// assert_eq!(forest.find(b), forest.find(a));
/// assert_ne!(forest.find(c), forest.find(a));
/// assert_eq!(forest.class_count(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct DisjointSetForest {
    indices: HashMap<GenomeId, NodeIndex>,
    genomes: Vec<GenomeId>,
    parent: Vec<usize>,
    rank: Vec<u8>,
    classes: usize,
}

impl DisjointSetForest {
    /// Creates an empty forest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct genomes registered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns `true` when no genome has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Number of disjoint classes currently held.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes
    }

    /// Returns the index for `id`, registering it as a singleton if unseen.
    ///
    /// Indices are assigned in discovery order and never change.
    pub fn ensure(&mut self, id: &GenomeId) -> NodeIndex {
        if let Some(&index) = self.indices.get(id) {
            return index;
        }
        let index = NodeIndex(self.parent.len());
        self.indices.insert(id.clone(), index);
        self.genomes.push(id.clone());
        self.parent.push(index.0);
        self.rank.push(0);
        self.classes += 1;
        index
    }

    /// Looks up the index of an already registered genome.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.indices.get(id).copied()
    }

    /// Returns the genome stored at `index`.
    ///
    /// # Panics
    /// Panics when `index` was not produced by this forest.
    #[must_use]
    pub fn genome(&self, index: NodeIndex) -> &GenomeId {
        self.check(index);
        &self.genomes[index.0]
    }

    /// Iterates over all registered genomes in discovery order.
    pub fn genomes(&self) -> impl ExactSizeIterator<Item = &GenomeId> {
        self.genomes.iter()
    }

    /// Returns the representative of the class containing `index`.
    ///
    /// Every node on the walk is relinked directly to the root, so an
    /// immediate second call is `O(1)`.
    ///
    /// # Panics
    /// Panics when `index` was not produced by this forest.
    pub fn find(&mut self, index: NodeIndex) -> NodeIndex {
        self.check(index);
        let mut root = index.0;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut node = index.0;
        while self.parent[node] != node {
            let parent = self.parent[node];
            self.parent[node] = root;
            node = parent;
        }

        NodeIndex(root)
    }

    /// Merges the classes containing `left` and `right`.
    ///
    /// The root with the larger rank adopts the other; on a rank tie the root
    /// with the lower index survives and its rank grows by one. Returns
    /// `false` when both already share a class.
    ///
    /// # Panics
    /// Panics when either index was not produced by this forest.
    pub fn union(&mut self, left: NodeIndex, right: NodeIndex) -> bool {
        let left_root = self.find(left).0;
        let right_root = self.find(right).0;
        if left_root == right_root {
            return false;
        }

        let left_rank = self.rank[left_root];
        let right_rank = self.rank[right_root];
        let (parent, child) = choose_parent_child(left_root, right_root, left_rank, right_rank);
        self.parent[child] = parent;
        if left_rank == right_rank {
            self.rank[parent] = left_rank.saturating_add(1);
        }
        self.classes -= 1;
        true
    }

    /// Returns `true` when both indices belong to the same class.
    ///
    /// # Panics
    /// Panics when either index was not produced by this forest.
    pub fn same_class(&mut self, left: NodeIndex, right: NodeIndex) -> bool {
        self.find(left) == self.find(right)
    }

    /// Enumerates every class as `root -> members`, with members in
    /// ascending index order.
    ///
    /// Compresses every path as a side effect.
    pub fn classes(&mut self) -> BTreeMap<NodeIndex, Vec<NodeIndex>> {
        let mut classes: BTreeMap<NodeIndex, Vec<NodeIndex>> = BTreeMap::new();
        for node in 0..self.parent.len() {
            let root = self.find(NodeIndex(node));
            classes.entry(root).or_default().push(NodeIndex(node));
        }
        classes
    }

    #[cfg(test)]
    pub(crate) fn rank_of(&self, index: NodeIndex) -> u8 {
        self.rank[index.0]
    }

    #[cfg(test)]
    pub(crate) fn parent_of(&self, index: NodeIndex) -> NodeIndex {
        NodeIndex(self.parent[index.0])
    }

    fn check(&self, index: NodeIndex) {
        assert!(
            index.0 < self.parent.len(),
            "node index {} is outside the forest ({} genomes registered)",
            index.0,
            self.parent.len(),
        );
    }
}

fn choose_parent_child(
    left_root: usize,
    right_root: usize,
    left_rank: u8,
    right_rank: u8,
) -> (usize, usize) {
    if left_rank > right_rank {
        return (left_root, right_root);
    }
    if right_rank > left_rank {
        return (right_root, left_root);
    }

    if left_root <= right_root {
        (left_root, right_root)
    } else {
        (right_root, left_root)
    }
}

#[cfg(test)]
mod tests;
