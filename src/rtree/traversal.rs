//! Utilities to traverse the RTree structure.
//!
//! [`NearbyIter`] is the best-first proximity search behind
//! [`RTreeIndex::search_nearby`](crate::rtree::RTreeIndex::search_nearby), and [`Entries`]
//! walks every entry of a tree.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::iter::FusedIterator;

use crate::error::{Result, SegmentIndexError};
use crate::geometry::{BoundingBox, Geometry};
use crate::r#type::IndexableNum;
use crate::rtree::distance::DistanceFunction;
use crate::rtree::node::{Entry, Node};
use crate::rtree::r#trait::RTreeIndex;

/// An entry found by a proximity search, with its distance to the query.
#[derive(Debug)]
pub struct Neighbor<'a, N: IndexableNum, T> {
    pub entry: &'a Entry<N, T>,
    pub distance: f64,
}

impl<'a, N: IndexableNum, T> Neighbor<'a, N, T> {
    pub fn value(&self) -> &'a T {
        self.entry.value()
    }

    pub fn geometry(&self) -> &'a Geometry<N> {
        self.entry.geometry()
    }

    pub fn insertion_index(&self) -> u32 {
        self.entry.insertion_index()
    }
}

impl<N: IndexableNum, T> Clone for Neighbor<'_, N, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: IndexableNum, T> Copy for Neighbor<'_, N, T> {}

/// Work waiting in the search queue.
enum Item<'a, N: IndexableNum, T> {
    Node(&'a Node<N, T>),
    Entry(&'a Entry<N, T>),
}

/// A queued item keyed by distance: a lower bound for nodes, the exact distance for entries.
struct Pending<'a, N: IndexableNum, T> {
    distance: f64,
    item: Item<'a, N, T>,
}

impl<N: IndexableNum, T> Pending<'_, N, T> {
    /// Entries sort before nodes at equal distance, so a resolved entry is yielded without
    /// expanding nodes that cannot hold anything closer.
    fn rank(&self) -> u8 {
        match self.item {
            Item::Entry(_) => 0,
            Item::Node(_) => 1,
        }
    }
}

impl<N: IndexableNum, T> PartialEq for Pending<'_, N, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N: IndexableNum, T> Eq for Pending<'_, N, T> {}

impl<N: IndexableNum, T> PartialOrd for Pending<'_, N, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N: IndexableNum, T> Ord for Pending<'_, N, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.rank().cmp(&other.rank()))
    }
}

/// A lazy proximity search, yielding entries within a maximum distance of a query in
/// non-decreasing distance order.
///
/// Each call to `next` pops the closest pending item off a priority queue: nodes are expanded
/// and entries are yielded. Work stops as soon as a result is proven to be next, so taking only
/// the first few results expands only the nodes needed to order them. Dropping the iterator
/// cancels the search.
///
/// After yielding an `Err` the iterator is exhausted. Results yielded before the error remain
/// valid.
pub struct NearbyIter<'a, N: IndexableNum, T, D> {
    query: Geometry<N>,
    max_distance: f64,
    distance: D,
    queue: BinaryHeap<Reverse<Pending<'a, N, T>>>,
    expanded: usize,
    done: bool,
}

impl<'a, N: IndexableNum, T, D: DistanceFunction<N>> NearbyIter<'a, N, T, D> {
    pub(crate) fn new(
        root: &'a Node<N, T>,
        query: Geometry<N>,
        max_distance: f64,
        distance: D,
    ) -> Self {
        let mut iter = Self {
            query,
            max_distance,
            distance,
            queue: BinaryHeap::new(),
            expanded: 0,
            done: false,
        };
        if !root.is_empty() {
            let distance = iter.lower_bound(root.bounding_box());
            iter.queue.push(Reverse(Pending {
                distance,
                item: Item::Node(root),
            }));
        }
        iter
    }

    /// The number of nodes expanded so far.
    pub fn expanded_nodes(&self) -> usize {
        self.expanded
    }

    pub fn query(&self) -> &Geometry<N> {
        &self.query
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    fn lower_bound(&self, bbox: &BoundingBox<N>) -> f64 {
        let bound = self.distance.distance_to_box(&self.query, bbox);
        // A NaN bound can prune nothing
        if bound.is_nan() {
            0.
        } else {
            bound
        }
    }

    fn expand(&mut self, node: &'a Node<N, T>) -> Result<()> {
        self.expanded += 1;
        match node {
            Node::Branch { children, .. } => {
                for child in children {
                    let distance = self.lower_bound(child.bounding_box());
                    if distance <= self.max_distance {
                        self.queue.push(Reverse(Pending {
                            distance,
                            item: Item::Node(child),
                        }));
                    }
                }
            }
            Node::Leaf { entries, .. } => {
                for entry in entries {
                    if self.lower_bound(entry.bounding_box()) > self.max_distance {
                        continue;
                    }
                    let distance = self
                        .distance
                        .distance(&self.query, entry.geometry())
                        .map_err(SegmentIndexError::DistanceFunction)?;
                    if distance.is_nan() || distance < 0. {
                        return Err(SegmentIndexError::DistanceFunction(
                            format!(
                                "distance to entry {} was {distance}",
                                entry.insertion_index()
                            )
                            .into(),
                        ));
                    }
                    if distance <= self.max_distance {
                        self.queue.push(Reverse(Pending {
                            distance,
                            item: Item::Entry(entry),
                        }));
                    }
                }
            }
        }
        Ok(())
    }
}

impl<'a, N: IndexableNum, T, D: DistanceFunction<N>> Iterator for NearbyIter<'a, N, T, D> {
    type Item = Result<Neighbor<'a, N, T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        while let Some(Reverse(pending)) = self.queue.pop() {
            // Everything left in the queue is at least this far away
            if pending.distance > self.max_distance {
                break;
            }

            match pending.item {
                Item::Entry(entry) => {
                    return Some(Ok(Neighbor {
                        entry,
                        distance: pending.distance,
                    }))
                }
                Item::Node(node) => {
                    if let Err(err) = self.expand(node) {
                        tracing::debug!(
                            error = %err,
                            expanded_nodes = self.expanded,
                            "proximity search aborted"
                        );
                        self.queue.clear();
                        self.done = true;
                        return Some(Err(err));
                    }
                }
            }
        }

        self.queue.clear();
        self.done = true;
        None
    }
}

impl<'a, N: IndexableNum, T, D: DistanceFunction<N>> FusedIterator for NearbyIter<'a, N, T, D> {}

/// Validated parameters of a proximity search.
///
/// A query can be run any number of times, against any number of trees. Each run starts a
/// fresh, independent [`NearbyIter`].
///
/// ```
/// use segment_rtree::geometry::Line;
/// use segment_rtree::rtree::{EuclideanDistance, NearbyQuery, RTree};
///
/// let tree = RTree::bulk_load([("a", Line::new(0., 0., 1., 0.)), ("b", Line::new(5., 5., 6., 6.))]);
/// let query = NearbyQuery::new(Line::new(0., 0., 1., 0.), 1.).unwrap();
///
/// let first: Vec<_> = query.run(&tree, EuclideanDistance).map(|r| *r.unwrap().value()).collect();
/// let again: Vec<_> = query.run(&tree, EuclideanDistance).map(|r| *r.unwrap().value()).collect();
/// assert_eq!(first, vec!["a"]);
/// assert_eq!(first, again);
///
/// assert!(NearbyQuery::new(Line::new(0., 0., 1., 0.), -1.).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery<N: IndexableNum> {
    query: Geometry<N>,
    max_distance: f64,
}

impl<N: IndexableNum> NearbyQuery<N> {
    /// Check the search parameters.
    ///
    /// `max_distance` must be non-negative (infinity is allowed), and the query geometry must
    /// have finite coordinates.
    pub fn new(query: impl Into<Geometry<N>>, max_distance: f64) -> Result<Self> {
        let query = query.into();
        if max_distance.is_nan() || max_distance < 0. {
            return Err(SegmentIndexError::InvalidArgument(format!(
                "max_distance must be non-negative, got {max_distance}"
            )));
        }
        if !query.is_finite() {
            return Err(SegmentIndexError::InvalidArgument(format!(
                "query geometry must have finite coordinates, got {query:?}"
            )));
        }
        Ok(Self {
            query,
            max_distance,
        })
    }

    pub fn query(&self) -> &Geometry<N> {
        &self.query
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Start a new search over `tree`.
    pub fn run<'a, T, D: DistanceFunction<N>>(
        &self,
        tree: &'a impl RTreeIndex<N, T>,
        distance: D,
    ) -> NearbyIter<'a, N, T, D> {
        NearbyIter::new(tree.root(), self.query, self.max_distance, distance)
    }
}

/// An iterator over every entry of a tree, depth first.
#[derive(Debug, Clone)]
pub struct Entries<'a, N: IndexableNum, T> {
    stack: Vec<&'a Node<N, T>>,
    current: std::slice::Iter<'a, Entry<N, T>>,
}

impl<'a, N: IndexableNum, T> Entries<'a, N, T> {
    pub(crate) fn new(root: &'a Node<N, T>) -> Self {
        Self {
            stack: vec![root],
            current: [].iter(),
        }
    }
}

impl<'a, N: IndexableNum, T> Iterator for Entries<'a, N, T> {
    type Item = &'a Entry<N, T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.current.next() {
                return Some(entry);
            }
            match self.stack.pop()? {
                Node::Leaf { entries, .. } => self.current = entries.iter(),
                Node::Branch { children, .. } => self.stack.extend(children.iter().rev()),
            }
        }
    }
}

impl<N: IndexableNum, T> FusedIterator for Entries<'_, N, T> {}
