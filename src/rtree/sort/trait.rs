use crate::geometry::BoundingBox;
use crate::r#type::IndexableNum;
use crate::rtree::node::Entry;

/// Inputs shared by every [`Sort`] implementation.
#[derive(Debug, Clone, Copy)]
pub struct SortParams<N: IndexableNum> {
    pub(crate) num_items: usize,
    pub(crate) node_size: usize,
    /// The box around every entry being sorted.
    pub(crate) extent: BoundingBox<N>,
}

/// An ordering of entries that places spatially close entries next to each other, so that
/// packing consecutive runs into nodes gives tight boxes.
///
/// Implementations only need to order entries to `node_size` granularity: the order within each
/// run of `node_size` entries does not matter.
pub trait Sort<N: IndexableNum> {
    fn sort<T>(params: &SortParams<N>, entries: &mut [Entry<N, T>]);
}
