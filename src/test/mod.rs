//! Shared fixtures and whole-tree checks.

mod integration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::{BoundingBox, Line};
use crate::r#type::IndexableNum;
use crate::rtree::{Node, RTree};

/// `n` short random segments in a 1000 x 1000 square.
pub(crate) fn random_lines(n: usize, seed: u64) -> Vec<Line<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let x = rng.gen_range(0.0..1000.0);
            let y = rng.gen_range(0.0..1000.0);
            let dx = rng.gen_range(-20.0..20.0);
            let dy = rng.gen_range(-20.0..20.0);
            Line::new(x, y, x + dx, y + dy)
        })
        .collect()
}

/// Assert every structural invariant of `tree`: tight boxes, fan-out bounds, leaves at a uniform
/// depth equal to the height, and an entry count matching `num_items`.
pub(crate) fn check_invariants<N: IndexableNum, T>(tree: &RTree<N, T>) {
    let params = tree.params();
    let mut entries = 0;
    check_node(
        tree.root(),
        true,
        1,
        tree.height(),
        params.min_children(),
        params.max_children(),
        &mut entries,
    );
    assert_eq!(entries, tree.num_items(), "entry count");
    assert_eq!(tree.iter().count(), tree.num_items());
}

fn check_node<N: IndexableNum, T>(
    node: &Node<N, T>,
    is_root: bool,
    depth: usize,
    height: usize,
    min_children: usize,
    max_children: usize,
    entries: &mut usize,
) {
    assert!(node.len() <= max_children, "node over capacity: {}", node.len());
    if !is_root {
        assert!(node.len() >= min_children, "node under minimum: {}", node.len());
    }

    let mut expected = BoundingBox::empty();
    match node {
        Node::Leaf { entries: items, .. } => {
            assert_eq!(depth, height, "leaf at depth {depth} in tree of height {height}");
            for entry in items {
                assert_eq!(*entry.bounding_box(), entry.geometry().bounding_box());
                expected.expand(entry.bounding_box());
            }
            *entries += items.len();
        }
        Node::Branch { children, .. } => {
            assert!(depth < height, "branch at depth {depth} in tree of height {height}");
            for child in children {
                expected.expand(child.bounding_box());
                check_node(
                    child,
                    false,
                    depth + 1,
                    height,
                    min_children,
                    max_children,
                    entries,
                );
            }
        }
    }
    assert_eq!(*node.bounding_box(), expected, "node box is not tight");
}
