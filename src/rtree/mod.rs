//! An R-tree over line segments and boxes, with lazy proximity search.

pub mod builder;
pub mod distance;
pub mod index;
mod insert;
pub mod node;
pub mod sort;
mod split;
pub mod r#trait;
pub mod traversal;
mod util;

pub use builder::{RTreeBuilder, DEFAULT_RTREE_NODE_SIZE};
pub use distance::{distance_fn, DistanceFunction, EuclideanDistance, TryDistanceFn};
pub use index::{RTree, SplitStrategy, TreeParams};
pub use node::{Entry, Node};
pub use r#trait::RTreeIndex;
pub use sort::{HilbertSort, STRSort};
pub use traversal::{Entries, NearbyIter, NearbyQuery, Neighbor};

#[cfg(feature = "use-geo_0_31")]
pub use distance::GeoEuclideanDistance;
