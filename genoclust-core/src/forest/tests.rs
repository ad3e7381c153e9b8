//! Unit tests for the disjoint-set forest.

use rstest::{fixture, rstest};

use super::{DisjointSetForest, NodeIndex};
use crate::GenomeId;

fn id(raw: &str) -> GenomeId {
    GenomeId::canonicalize(raw)
}

/// Forest holding genomes `g0..g{n-1}` as singletons.
fn singletons(count: usize) -> (DisjointSetForest, Vec<NodeIndex>) {
    let mut forest = DisjointSetForest::new();
    let nodes = (0..count)
        .map(|n| forest.ensure(&id(&format!("g{n}"))))
        .collect();
    (forest, nodes)
}

#[fixture]
fn four() -> (DisjointSetForest, Vec<NodeIndex>) {
    singletons(4)
}

#[test]
fn ensure_is_idempotent_and_dense() {
    let mut forest = DisjointSetForest::new();
    let a = forest.ensure(&id("A"));
    let b = forest.ensure(&id("dir/B.fna"));
    let a_again = forest.ensure(&id("x/A.fa"));

    assert_eq!(a, a_again);
    assert_eq!((a.get(), b.get()), (0, 1));
    assert_eq!(forest.len(), 2);
    assert_eq!(forest.class_count(), 2);
    assert_eq!(forest.index_of("B"), Some(b));
    assert_eq!(forest.index_of("C"), None);
    assert_eq!(forest.genome(b).as_str(), "B");
}

#[test]
fn fresh_nodes_are_their_own_roots() {
    let (mut forest, nodes) = singletons(3);
    for node in nodes {
        assert_eq!(forest.find(node), node);
        assert_eq!(forest.rank_of(node), 0);
    }
}

#[rstest]
fn union_on_rank_tie_keeps_lower_index(four: (DisjointSetForest, Vec<NodeIndex>)) {
    let (mut forest, nodes) = four;
    assert!(forest.union(nodes[3], nodes[1]));
    assert_eq!(forest.find(nodes[3]), nodes[1]);
    assert_eq!(forest.rank_of(nodes[1]), 1);
}

#[rstest]
fn union_attaches_shallower_tree_under_deeper(four: (DisjointSetForest, Vec<NodeIndex>)) {
    let (mut forest, nodes) = four;
    forest.union(nodes[2], nodes[3]);
    // rank(2) == 1 now; the singleton 0 must hang below it despite its lower index.
    forest.union(nodes[0], nodes[2]);
    assert_eq!(forest.find(nodes[0]), nodes[2]);
    assert_eq!(forest.rank_of(nodes[2]), 1);
}

#[rstest]
fn union_of_same_class_is_noop(four: (DisjointSetForest, Vec<NodeIndex>)) {
    let (mut forest, nodes) = four;
    assert!(forest.union(nodes[0], nodes[1]));
    assert!(!forest.union(nodes[1], nodes[0]));
    assert!(!forest.union(nodes[2], nodes[2]));
    assert_eq!(forest.class_count(), 3);
    assert_eq!(forest.rank_of(nodes[0]), 1);
}

#[test]
fn find_compresses_paths() {
    let (mut forest, nodes) = singletons(4);
    // Build the chain 3 -> 2 -> 0 by merging equal-rank trees.
    forest.union(nodes[0], nodes[1]);
    forest.union(nodes[2], nodes[3]);
    forest.union(nodes[0], nodes[2]);
    assert_eq!(forest.parent_of(nodes[3]), nodes[2]);

    let root = forest.find(nodes[3]);
    assert_eq!(root, nodes[0]);
    assert_eq!(forest.parent_of(nodes[3]), nodes[0]);
    assert_eq!(forest.rank_of(nodes[0]), 2);
}

#[test]
fn classes_group_members_in_index_order() {
    let (mut forest, nodes) = singletons(5);
    forest.union(nodes[4], nodes[1]);
    forest.union(nodes[3], nodes[1]);

    let classes = forest.classes();
    let grouped: Vec<Vec<usize>> = classes
        .values()
        .map(|members| members.iter().map(|node| node.get()).collect())
        .collect();
    assert_eq!(grouped, vec![vec![0], vec![1, 3, 4], vec![2]]);
    assert_eq!(classes.len(), forest.class_count());
}

#[test]
fn ranks_stay_logarithmic_on_balanced_merges() {
    let (mut forest, nodes) = singletons(1024);
    let mut width = 1;
    while width < nodes.len() {
        for start in (0..nodes.len()).step_by(width * 2) {
            forest.union(nodes[start], nodes[start + width]);
        }
        width *= 2;
    }
    assert_eq!(forest.class_count(), 1);
    let root = forest.find(nodes[1023]);
    assert_eq!(root, nodes[0]);
    assert_eq!(forest.rank_of(root), 10);
}

#[test]
fn empty_forest_has_no_classes() {
    let mut forest = DisjointSetForest::new();
    assert!(forest.is_empty());
    assert!(forest.classes().is_empty());
    assert_eq!(forest.class_count(), 0);
}

#[test]
#[should_panic(expected = "outside the forest")]
fn find_rejects_foreign_index() {
    let (_, foreign) = singletons(3);
    let (mut forest, _) = singletons(1);
    forest.find(foreign[2]);
}
