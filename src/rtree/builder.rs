use geo_traits::{LineTrait, RectTrait};

use crate::error::Result;
use crate::geometry::{BoundingBox, Geometry, Line};
use crate::r#type::IndexableNum;
use crate::rtree::index::{RTree, TreeParams};
use crate::rtree::node::{Entry, Node};
use crate::rtree::sort::{Sort, SortParams};
use crate::rtree::util::pack;

/// The default node size used by [`RTreeBuilder::new`]
pub const DEFAULT_RTREE_NODE_SIZE: usize = 16;

/// A builder to create an [`RTree`] in bulk.
///
/// ```
/// use segment_rtree::rtree::RTreeBuilder;
/// use segment_rtree::rtree::sort::HilbertSort;
///
/// let mut builder = RTreeBuilder::<f64, &str>::new();
/// builder.add_line("a", 0., 0., 2., 2.);
/// builder.add_line("b", 1., 1., 3., 3.);
/// builder.add_line("c", 2., 2., 4., 4.);
/// let tree = builder.finish::<HilbertSort>();
/// assert_eq!(tree.num_items(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct RTreeBuilder<N: IndexableNum, T> {
    entries: Vec<Entry<N, T>>,
    params: TreeParams,
    extent: BoundingBox<N>,
}

impl<N: IndexableNum, T> RTreeBuilder<N, T> {
    /// Create a new builder with the default node size.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            params: TreeParams::default(),
            extent: BoundingBox::empty(),
        }
    }

    /// Create a new builder with the provided parameters.
    pub fn with_params(params: TreeParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            ..Self::new()
        })
    }

    /// Reserve room for `additional` more entries.
    pub fn with_capacity(mut self, additional: usize) -> Self {
        self.entries.reserve(additional);
        self
    }

    /// Add a geometry to the RTree.
    ///
    /// This returns the insertion index, which provides a lookup back into the original data.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` entries are added.
    #[inline]
    pub fn add(&mut self, value: T, geometry: impl Into<Geometry<N>>) -> u32 {
        let index: u32 = self
            .entries
            .len()
            .try_into()
            .expect("RTreeBuilder cannot hold more than u32::MAX entries");
        let entry = Entry::new(index, value, geometry.into());
        self.extent.expand(entry.bounding_box());
        self.entries.push(entry);
        index
    }

    /// Add a line segment from its endpoint coordinates.
    #[inline]
    pub fn add_line(&mut self, value: T, x1: N, y1: N, x2: N, y2: N) -> u32 {
        self.add(value, Line::new(x1, y1, x2, y2))
    }

    /// Add a rectangle from any [`RectTrait`] implementation.
    #[inline]
    pub fn add_rect(&mut self, value: T, rect: &impl RectTrait<T = N>) -> u32 {
        self.add(value, BoundingBox::from_rect(rect))
    }

    /// Add a line segment from any [`LineTrait`] implementation.
    #[inline]
    pub fn add_line_trait(&mut self, value: T, line: &impl LineTrait<T = N>) -> u32 {
        self.add(value, Line::from_line_trait(line))
    }

    /// The number of entries added so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn params(&self) -> &TreeParams {
        &self.params
    }

    /// Consume this builder, sorting the entries with `S` and packing them into a balanced
    /// tree.
    pub fn finish<S: Sort<N>>(self) -> RTree<N, T> {
        let Self {
            mut entries,
            params,
            extent,
        } = self;

        let num_items = entries.len();
        // Bounded by `add`
        let next_index = num_items as u32;

        if num_items <= params.max_children() {
            tracing::debug!(num_items, height = 1, "built single-leaf rtree");
            return RTree::from_root(Node::leaf(entries), num_items, 1, params, next_index);
        }

        let sort_params = SortParams {
            num_items,
            node_size: params.max_children(),
            extent,
        };
        S::sort(&sort_params, &mut entries);

        let mut level: Vec<Node<N, T>> =
            pack(entries, params.max_children(), params.min_children())
                .into_iter()
                .map(Node::leaf)
                .collect();
        let mut height = 1;

        // generate nodes at each tree level, bottom-up
        while level.len() > 1 {
            level = pack(level, params.max_children(), params.min_children())
                .into_iter()
                .map(Node::branch)
                .collect();
            height += 1;
        }

        let root = level.pop().unwrap_or_else(|| Node::leaf(Vec::new()));
        tracing::debug!(
            num_items,
            height,
            sort = std::any::type_name::<S>(),
            "built rtree"
        );
        RTree::from_root(root, num_items, height, params, next_index)
    }
}

impl<N: IndexableNum, T> Default for RTreeBuilder<N, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::rtree::sort::{HilbertSort, STRSort};
    use crate::test::{check_invariants, random_lines};

    #[test]
    fn small_input_is_a_single_leaf() {
        let mut builder = RTreeBuilder::<i32, u8>::new();
        builder.add_line(0, 0, 0, 5, 5);
        builder.add_line(1, -3, 2, 1, 1);
        let tree = builder.finish::<HilbertSort>();
        assert_eq!(tree.height(), 1);
        assert!(tree.root().is_leaf());
        assert_eq!(*tree.root().bounding_box(), BoundingBox::new(-3, 0, 5, 5));
    }

    #[test]
    fn empty_builder_gives_empty_tree() {
        let tree = RTreeBuilder::<f64, ()>::new().finish::<STRSort>();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
        assert!(tree.root().bounding_box().is_empty());
    }

    #[test]
    fn insertion_indices_count_up() {
        let mut builder = RTreeBuilder::<f64, &str>::new();
        assert_eq!(builder.add_line("a", 0., 0., 1., 1.), 0);
        assert_eq!(builder.add("b", BoundingBox::new(2., 2., 3., 3.)), 1);
        let rect = geo_0_31::Rect::new(
            geo_0_31::coord! { x: 5., y: 5. },
            geo_0_31::coord! { x: 6., y: 7. },
        );
        assert_eq!(builder.add_rect("c", &rect), 2);
        let line = geo_0_31::Line::new(
            geo_0_31::coord! { x: 8., y: 0. },
            geo_0_31::coord! { x: 9., y: 1. },
        );
        assert_eq!(builder.add_line_trait("d", &line), 3);
        assert_eq!(builder.len(), 4);
    }

    #[test]
    fn packed_trees_keep_invariants() {
        let lines = random_lines(1000, 3);
        for node_size in [2, 4, 9, 16] {
            let params = TreeParams::new(node_size);

            let mut builder = RTreeBuilder::with_params(params).unwrap();
            for (i, line) in lines.iter().enumerate() {
                builder.add(i, *line);
            }
            let hilbert = builder.clone().finish::<HilbertSort>();
            let str = builder.finish::<STRSort>();

            for tree in [hilbert, str] {
                assert_eq!(tree.num_items(), 1000);
                check_invariants(&tree);
            }
        }
    }

    #[test]
    fn last_node_borrows_to_reach_minimum() {
        // 17 entries at node size 16 would leave a lone entry in the last leaf.
        let params = TreeParams::new(16);
        let mut builder = RTreeBuilder::with_params(params).unwrap();
        for i in 0..17 {
            builder.add_line(i, i as f64, 0., i as f64, 1.);
        }
        let tree = builder.finish::<HilbertSort>();
        assert_eq!(tree.height(), 2);
        for leaf in tree.root().children() {
            assert!(leaf.len() >= params.min_children());
        }
        check_invariants(&tree);
    }
}
