use crate::error::{Result, SegmentIndexError};
use crate::geometry::Geometry;
use crate::r#type::IndexableNum;
use crate::rtree::builder::{RTreeBuilder, DEFAULT_RTREE_NODE_SIZE};
use crate::rtree::node::{Entry, Node};
use crate::rtree::sort::HilbertSort;
use crate::rtree::traversal::Entries;

/// How an overfull node is divided during incremental insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitStrategy {
    /// Guttman's linear split: seeds chosen by greatest normalised separation along an axis.
    Linear,
    /// Guttman's quadratic split: seeds chosen as the pair that would waste the most area.
    #[default]
    Quadratic,
}

/// Fan-out and split configuration shared by [`RTreeBuilder`] and [`RTree::insert`].
///
/// ```
/// use segment_rtree::rtree::{SplitStrategy, TreeParams};
///
/// let params = TreeParams::new(10)
///     .with_min_children(4)
///     .with_split_strategy(SplitStrategy::Linear);
/// assert!(params.validate().is_ok());
/// assert!(TreeParams::new(10).with_min_children(6).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    max_children: usize,
    min_children: usize,
    split_strategy: SplitStrategy,
}

impl TreeParams {
    /// Parameters with the given maximum fan-out and a minimum of 40% of it.
    pub fn new(max_children: usize) -> Self {
        Self {
            max_children,
            min_children: (max_children * 2 / 5).max(1),
            split_strategy: SplitStrategy::default(),
        }
    }

    pub fn with_max_children(self, max_children: usize) -> Self {
        Self {
            max_children,
            ..self
        }
    }

    pub fn with_min_children(self, min_children: usize) -> Self {
        Self {
            min_children,
            ..self
        }
    }

    pub fn with_split_strategy(self, split_strategy: SplitStrategy) -> Self {
        Self {
            split_strategy,
            ..self
        }
    }

    /// The maximum number of entries or children in each node.
    pub fn max_children(&self) -> usize {
        self.max_children
    }

    /// The minimum number of entries or children in each non-root node.
    pub fn min_children(&self) -> usize {
        self.min_children
    }

    pub fn split_strategy(&self) -> SplitStrategy {
        self.split_strategy
    }

    /// Check that a node can always be split into two halves that both meet the minimum.
    pub fn validate(&self) -> Result<()> {
        if self.max_children < 2 {
            return Err(SegmentIndexError::InvalidArgument(format!(
                "max_children must be at least 2, got {}",
                self.max_children
            )));
        }
        if self.min_children == 0 || self.min_children > self.max_children / 2 {
            return Err(SegmentIndexError::InvalidArgument(format!(
                "min_children must be between 1 and {}, got {}",
                self.max_children / 2,
                self.min_children
            )));
        }
        Ok(())
    }
}

impl Default for TreeParams {
    fn default() -> Self {
        Self::new(DEFAULT_RTREE_NODE_SIZE)
    }
}

/// An R-tree over [`Geometry`] values, each carrying a payload `T`.
///
/// Build one in bulk with [`RTreeBuilder`] or grow one with [`RTree::insert`], then query it
/// through [`RTreeIndex`](crate::rtree::RTreeIndex). Queries only need `&self`, so a finished
/// tree can be shared between threads and searched concurrently.
#[derive(Debug, Clone)]
pub struct RTree<N: IndexableNum, T> {
    pub(crate) root: Node<N, T>,
    pub(crate) num_items: usize,
    pub(crate) height: usize,
    pub(crate) params: TreeParams,
    pub(crate) next_index: u32,
}

impl<N: IndexableNum, T> RTree<N, T> {
    /// An empty tree with default parameters.
    pub fn new() -> Self {
        Self::from_root(Node::leaf(Vec::new()), 0, 1, TreeParams::default(), 0)
    }

    /// An empty tree with the given parameters.
    pub fn with_params(params: TreeParams) -> Result<Self> {
        params.validate()?;
        Ok(Self::from_root(Node::leaf(Vec::new()), 0, 1, params, 0))
    }

    pub(crate) fn from_root(
        root: Node<N, T>,
        num_items: usize,
        height: usize,
        params: TreeParams,
        next_index: u32,
    ) -> Self {
        Self {
            root,
            num_items,
            height,
            params,
            next_index,
        }
    }

    /// Bulk load a tree from `(value, geometry)` pairs using [`HilbertSort`] and default
    /// parameters.
    pub fn bulk_load<G, I>(items: I) -> Self
    where
        G: Into<Geometry<N>>,
        I: IntoIterator<Item = (T, G)>,
    {
        let mut builder = RTreeBuilder::new();
        for (value, geometry) in items {
            builder.add(value, geometry);
        }
        builder.finish::<HilbertSort>()
    }

    /// The root node, for manual traversal.
    pub fn root(&self) -> &Node<N, T> {
        &self.root
    }

    /// The total number of entries.
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    pub fn is_empty(&self) -> bool {
        self.num_items == 0
    }

    /// The number of levels (height) of the tree. A tree whose root is a leaf has height 1.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn params(&self) -> &TreeParams {
        &self.params
    }

    /// Iterate over every entry in tree order.
    pub fn iter(&self) -> Entries<'_, N, T> {
        Entries::new(&self.root)
    }
}

impl<N: IndexableNum, T> Default for RTree<N, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, N: IndexableNum, T> IntoIterator for &'a RTree<N, T> {
    type Item = &'a Entry<N, T>;
    type IntoIter = Entries<'a, N, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::Line;

    #[test]
    fn default_params_are_valid() {
        let params = TreeParams::default();
        assert_eq!(params.max_children(), 16);
        assert_eq!(params.min_children(), 6);
        assert_eq!(params.split_strategy(), SplitStrategy::Quadratic);
        assert!(params.validate().is_ok());
        assert_eq!(TreeParams::new(10).min_children(), 4);
        assert_eq!(TreeParams::new(2).min_children(), 1);
    }

    #[test]
    fn rejects_invalid_params() {
        assert!(matches!(
            RTree::<f64, ()>::with_params(TreeParams::new(1)),
            Err(SegmentIndexError::InvalidArgument(_))
        ));
        assert!(TreeParams::new(8).with_min_children(0).validate().is_err());
        assert!(TreeParams::new(8).with_min_children(5).validate().is_err());
        assert!(TreeParams::new(8).with_min_children(4).validate().is_ok());
    }

    #[test]
    fn empty_tree() {
        let tree = RTree::<f32, u8>::new();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
        assert!(tree.root().is_leaf());
        assert!(tree.root().bounding_box().is_empty());
        assert_eq!(tree.iter().count(), 0);
    }

    #[test]
    fn bulk_load_keeps_every_entry() {
        let tree = RTree::bulk_load((0..100).map(|i| {
            let x = i as f64;
            (i, Line::new(x, 0., x + 1., 1.))
        }));
        assert_eq!(tree.num_items(), 100);
        let mut values: Vec<_> = tree.iter().map(|e| *e.value()).collect();
        values.sort();
        assert_eq!(values, (0..100).collect::<Vec<_>>());
        for entry in &tree {
            assert_eq!(entry.insertion_index(), *entry.value() as u32);
        }
    }
}
