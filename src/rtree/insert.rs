//! Incremental insertion.

use crate::geometry::{BoundingBox, Geometry};
use crate::r#type::IndexableNum;
use crate::rtree::index::{RTree, TreeParams};
use crate::rtree::node::{Entry, Node};
use crate::rtree::split::split;

impl<N: IndexableNum, T> RTree<N, T> {
    /// Insert a single entry, splitting nodes as needed to stay within
    /// [`TreeParams::max_children`].
    ///
    /// This returns the insertion index, which continues the numbering of any entries the tree
    /// was bulk loaded with.
    ///
    /// # Panics
    ///
    /// Panics if the tree already holds `u32::MAX` entries.
    pub fn insert(&mut self, value: T, geometry: impl Into<Geometry<N>>) -> u32 {
        let index = self.next_index;
        self.next_index = index
            .checked_add(1)
            .expect("RTree cannot hold more than u32::MAX entries");

        let entry = Entry::new(index, value, geometry.into());
        if let Some(sibling) = insert_into(&mut self.root, entry, &self.params) {
            let old_root = std::mem::replace(&mut self.root, Node::leaf(Vec::new()));
            self.root = Node::branch(vec![old_root, sibling]);
            self.height += 1;
            tracing::trace!(height = self.height, "grew rtree root");
        }
        self.num_items += 1;
        index
    }
}

/// Insert `entry` below `node`. Returns the new sibling if `node` had to be split.
fn insert_into<N: IndexableNum, T>(
    node: &mut Node<N, T>,
    entry: Entry<N, T>,
    params: &TreeParams,
) -> Option<Node<N, T>> {
    let entry_bbox = *entry.bounding_box();
    match node {
        Node::Leaf { bbox, entries } => {
            bbox.expand(&entry_bbox);
            entries.push(entry);
            if entries.len() <= params.max_children() {
                return None;
            }

            let (kept, moved) = split(std::mem::take(entries), params);
            tracing::trace!(kept = kept.len(), moved = moved.len(), "split leaf");
            *entries = kept;
            node.recompute_bbox();
            Some(Node::leaf(moved))
        }
        Node::Branch { bbox, children } => {
            bbox.expand(&entry_bbox);
            let best = choose_subtree(children.as_slice(), &entry_bbox);
            let sibling = insert_into(&mut children[best], entry, params)?;
            children.push(sibling);
            if children.len() <= params.max_children() {
                return None;
            }

            let (kept, moved) = split(std::mem::take(children), params);
            tracing::trace!(kept = kept.len(), moved = moved.len(), "split branch");
            *children = kept;
            node.recompute_bbox();
            Some(Node::branch(moved))
        }
    }
}

/// The child needing the least area enlargement, then the smallest area, then the least margin
/// growth.
fn choose_subtree<N: IndexableNum, T>(children: &[Node<N, T>], bbox: &BoundingBox<N>) -> usize {
    let cost = |child: &Node<N, T>| {
        let current = child.bounding_box();
        let grown = current.union(bbox);
        (
            grown.area() - current.area(),
            current.area(),
            grown.margin() - current.margin(),
        )
    };

    children
        .iter()
        .map(cost)
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            a.0.total_cmp(&b.0)
                .then_with(|| a.1.total_cmp(&b.1))
                .then_with(|| a.2.total_cmp(&b.2))
        })
        .map_or(0, |(i, _)| i)
}
