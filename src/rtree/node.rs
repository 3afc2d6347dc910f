//! The tree node model: entries, leaves and branches.

use crate::geometry::{BoundingBox, Geometry};
use crate::r#type::IndexableNum;

/// A user value paired with the geometry it is indexed under.
///
/// Entries are deliberately not `PartialEq`: two entries with the same geometry and payload are
/// still distinct. Use [`Entry::insertion_index`] or [`Entry::ptr_eq`] to tell entries apart.
#[derive(Debug, Clone)]
pub struct Entry<N: IndexableNum, T> {
    index: u32,
    value: T,
    geometry: Geometry<N>,
    bbox: BoundingBox<N>,
}

impl<N: IndexableNum, T> Entry<N, T> {
    pub(crate) fn new(index: u32, value: T, geometry: Geometry<N>) -> Self {
        Self {
            index,
            value,
            bbox: geometry.bounding_box(),
            geometry,
        }
    }

    /// The position at which this entry was added, counting from zero per tree.
    pub fn insertion_index(&self) -> u32 {
        self.index
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn geometry(&self) -> &Geometry<N> {
        &self.geometry
    }

    pub fn bounding_box(&self) -> &BoundingBox<N> {
        &self.bbox
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// Returns `true` if both references point at the same stored entry.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        std::ptr::eq(a, b)
    }
}

/// A node in the tree.
///
/// Every node stores the tightest box around everything beneath it, and all leaves sit at the
/// same depth.
#[derive(Debug, Clone)]
pub enum Node<N: IndexableNum, T> {
    /// A bottom-level node holding entries.
    Leaf {
        bbox: BoundingBox<N>,
        entries: Vec<Entry<N, T>>,
    },
    /// An intermediate node holding child nodes.
    Branch {
        bbox: BoundingBox<N>,
        children: Vec<Node<N, T>>,
    },
}

impl<N: IndexableNum, T> Node<N, T> {
    pub(crate) fn leaf(entries: Vec<Entry<N, T>>) -> Self {
        Node::Leaf {
            bbox: envelope(entries.as_slice()),
            entries,
        }
    }

    pub(crate) fn branch(children: Vec<Node<N, T>>) -> Self {
        Node::Branch {
            bbox: envelope(children.as_slice()),
            children,
        }
    }

    pub fn bounding_box(&self) -> &BoundingBox<N> {
        match self {
            Node::Leaf { bbox, .. } | Node::Branch { bbox, .. } => bbox,
        }
    }

    /// Returns `true` if this is a leaf node holding entries.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Returns `true` if this is an intermediate node with children.
    pub fn is_parent(&self) -> bool {
        !self.is_leaf()
    }

    /// The child nodes of a branch. Empty for a leaf.
    pub fn children(&self) -> &[Node<N, T>] {
        match self {
            Node::Branch { children, .. } => children,
            Node::Leaf { .. } => &[],
        }
    }

    /// The entries of a leaf. Empty for a branch.
    pub fn entries(&self) -> &[Entry<N, T>] {
        match self {
            Node::Leaf { entries, .. } => entries,
            Node::Branch { .. } => &[],
        }
    }

    /// Fan-out of this node: entries for a leaf, children for a branch.
    pub fn len(&self) -> usize {
        match self {
            Node::Leaf { entries, .. } => entries.len(),
            Node::Branch { children, .. } => children.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn recompute_bbox(&mut self) {
        match self {
            Node::Leaf { bbox, entries } => *bbox = envelope(entries.as_slice()),
            Node::Branch { bbox, children } => *bbox = envelope(children.as_slice()),
        }
    }
}

/// Anything that the tree can place by its bounding box.
pub(crate) trait HasBoundingBox<N: IndexableNum> {
    fn bbox(&self) -> &BoundingBox<N>;
}

impl<N: IndexableNum, T> HasBoundingBox<N> for Entry<N, T> {
    #[inline]
    fn bbox(&self) -> &BoundingBox<N> {
        &self.bbox
    }
}

impl<N: IndexableNum, T> HasBoundingBox<N> for Node<N, T> {
    #[inline]
    fn bbox(&self) -> &BoundingBox<N> {
        self.bounding_box()
    }
}

/// The tightest box around a set of items.
pub(crate) fn envelope<N: IndexableNum, I: HasBoundingBox<N>>(items: &[I]) -> BoundingBox<N> {
    let mut bbox = BoundingBox::empty();
    for item in items {
        bbox.expand(item.bbox());
    }
    bbox
}
