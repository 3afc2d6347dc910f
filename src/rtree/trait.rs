use geo_traits::{CoordTrait, RectTrait};
use tinyvec::TinyVec;

use crate::error::Result;
use crate::geometry::{BoundingBox, Geometry, Line};
use crate::r#type::IndexableNum;
use crate::rtree::distance::{DistanceFunction, EuclideanDistance};
use crate::rtree::index::{RTree, TreeParams};
use crate::rtree::node::{Entry, Node};
use crate::rtree::traversal::{NearbyIter, NearbyQuery, Neighbor};

/// A trait for searching and accessing data out of an RTree.
pub trait RTreeIndex<N: IndexableNum, T>: Sized {
    /// Access the root node of the RTree for manual traversal.
    fn root(&self) -> &Node<N, T>;

    /// The parameters this tree was built with.
    fn params(&self) -> &TreeParams;

    /// The total number of items contained in this RTree.
    fn num_items(&self) -> usize;

    /// The number of levels (height) of the tree.
    fn height(&self) -> usize;

    /// The maximum number of elements in each node.
    fn node_size(&self) -> usize {
        self.params().max_children()
    }

    /// Search an RTree given the provided bounding box.
    ///
    /// Results are the entries whose bounding boxes intersect the query box, in tree order.
    fn search(&self, min_x: N, min_y: N, max_x: N, max_y: N) -> Vec<&Entry<N, T>> {
        let query = BoundingBox::new(min_x, min_y, max_x, max_y);
        let mut results = vec![];

        // Use TinyVec to avoid heap allocations
        let mut stack: TinyVec<[&[Node<N, T>]; 32]> = TinyVec::new();
        stack.push(std::slice::from_ref(self.root()));

        while let Some(nodes) = stack.pop() {
            for node in nodes {
                if !node.bounding_box().intersects(&query) {
                    continue;
                }
                match node {
                    Node::Branch { children, .. } => stack.push(children.as_slice()),
                    Node::Leaf { entries, .. } => results.extend(
                        entries
                            .iter()
                            .filter(|entry| entry.bounding_box().intersects(&query)),
                    ),
                }
            }
        }

        results
    }

    /// Search an RTree given the provided bounding box.
    ///
    /// Results are the entries whose bounding boxes intersect the query box, in tree order.
    fn search_rect(&self, rect: &impl RectTrait<T = N>) -> Vec<&Entry<N, T>> {
        self.search(
            rect.min().x(),
            rect.min().y(),
            rect.max().x(),
            rect.max().y(),
        )
    }

    /// Search entries within `max_distance` of `query`, in order of `distance`.
    ///
    /// The search is lazy: nodes are only expanded as results are pulled from the returned
    /// iterator. Fails with [`InvalidArgument`](crate::SegmentIndexError::InvalidArgument) when
    /// `max_distance` is negative or NaN, or when the query has non-finite coordinates.
    ///
    /// ```
    /// use segment_rtree::geometry::Line;
    /// use segment_rtree::rtree::{EuclideanDistance, RTreeBuilder, RTreeIndex};
    /// use segment_rtree::rtree::sort::HilbertSort;
    ///
    /// // Create an RTree
    /// let mut builder = RTreeBuilder::<f64, u32>::new();
    /// builder.add_line(0, 0., 0., 2., 2.);
    /// builder.add_line(1, 1., 1., 3., 3.);
    /// builder.add_line(2, 2., 2., 4., 4.);
    /// let tree = builder.finish::<HilbertSort>();
    ///
    /// let results: Vec<u32> = tree
    ///     .search_nearby(Line::new(5., 5., 6., 6.), 10., EuclideanDistance)
    ///     .unwrap()
    ///     .map(|result| *result.unwrap().value())
    ///     .collect();
    /// assert_eq!(results, vec![2, 1, 0]);
    /// ```
    fn search_nearby<D: DistanceFunction<N>>(
        &self,
        query: impl Into<Geometry<N>>,
        max_distance: f64,
        distance: D,
    ) -> Result<NearbyIter<'_, N, T, D>> {
        Ok(NearbyQuery::new(query, max_distance)?.run(self, distance))
    }

    /// Search entries within `max_distance` of a line segment, in order of `distance`.
    ///
    /// See [`RTreeIndex::search_nearby`].
    fn search_line<D: DistanceFunction<N>>(
        &self,
        line: &Line<N>,
        max_distance: f64,
        distance: D,
    ) -> Result<NearbyIter<'_, N, T, D>> {
        self.search_nearby(*line, max_distance, distance)
    }

    /// Search items in order of Euclidean distance from the given geometry.
    ///
    /// Returns at most `max_results` entries, none further than `max_distance`.
    fn neighbors(
        &self,
        query: impl Into<Geometry<N>>,
        max_results: Option<usize>,
        max_distance: Option<f64>,
    ) -> Result<Vec<Neighbor<'_, N, T>>> {
        let max_distance = max_distance.unwrap_or(f64::INFINITY);
        self.search_nearby(query, max_distance, EuclideanDistance)?
            .take(max_results.unwrap_or(usize::MAX))
            .collect()
    }

    /// Search items in order of Euclidean distance from the given coordinate.
    fn neighbors_coord(
        &self,
        coord: &impl CoordTrait<T = N>,
        max_results: Option<usize>,
        max_distance: Option<f64>,
    ) -> Result<Vec<Neighbor<'_, N, T>>> {
        let point = BoundingBox::from_point(coord.x(), coord.y());
        self.neighbors(point, max_results, max_distance)
    }
}

impl<N: IndexableNum, T> RTreeIndex<N, T> for RTree<N, T> {
    fn root(&self) -> &Node<N, T> {
        &self.root
    }

    fn params(&self) -> &TreeParams {
        &self.params
    }

    fn num_items(&self) -> usize {
        self.num_items
    }

    fn height(&self) -> usize {
        self.height
    }
}
