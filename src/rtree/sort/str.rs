#[cfg(feature = "rayon")]
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};

use crate::r#type::IndexableNum;
use crate::rtree::node::Entry;
use crate::rtree::sort::util::{apply_permutation, partial_sort};
use crate::rtree::sort::{Sort, SortParams};

/// An implementation of sort-tile-recursive (STR) sorting.
///
/// The implementation is derived from [this
/// paper](https://ia600900.us.archive.org/27/items/nasa_techdoc_19970016975/19970016975.pdf).
#[derive(Debug, Clone, Copy)]
pub struct STRSort;

impl<N: IndexableNum> Sort<N> for STRSort {
    fn sort<T>(params: &SortParams<N>, entries: &mut [Entry<N, T>]) {
        if params.num_items < 2 {
            return;
        }

        // NaN would stall the partition loops; push it to the end instead.
        let finite = |v: f64| if v.is_nan() { f64::INFINITY } else { v };

        let mut order: Vec<usize> = (0..entries.len()).collect();

        // Sort items by the x value of their centers
        let mut center_values: Vec<f64> = entries
            .iter()
            .map(|entry| finite(entry.bounding_box().center().0))
            .collect();
        partial_sort(
            &mut center_values,
            &mut order,
            0,
            params.num_items - 1,
            params.node_size,
        );

        // Reuse the buffer for the y value of the centers, in the current order
        for (value, source) in center_values.iter_mut().zip(order.iter()) {
            *value = finite(entries[*source].bounding_box().center().1);
        }

        let num_leaf_nodes = params.num_items.div_ceil(params.node_size);
        let num_vertical_slices = (num_leaf_nodes as f64).sqrt().ceil() as usize;
        let num_items_per_slice = num_vertical_slices * params.node_size;

        #[cfg(feature = "rayon")]
        {
            let center_slices = center_values
                .chunks_mut(num_items_per_slice)
                .collect::<Vec<_>>();
            let order_slices = order.chunks_mut(num_items_per_slice).collect::<Vec<_>>();

            center_slices
                .into_par_iter()
                .zip(order_slices)
                .for_each(|(center_chunk, order_chunk)| {
                    // Within each x partition, sort by y values
                    // If the last slice, it won't be a full node
                    let chunk_len = center_chunk.len();
                    partial_sort(
                        center_chunk,
                        order_chunk,
                        0,
                        chunk_len - 1,
                        params.node_size,
                    );
                });
        }

        #[cfg(not(feature = "rayon"))]
        {
            for i in 0..num_vertical_slices {
                let partition_start = i * num_items_per_slice;
                if partition_start >= params.num_items {
                    break;
                }
                let partition_end = ((i + 1) * num_items_per_slice).min(params.num_items);
                // Within each x partition, sort by y values
                partial_sort(
                    &mut center_values,
                    &mut order,
                    partition_start,
                    partition_end - 1,
                    params.node_size,
                );
            }
        }

        apply_permutation(entries, &mut order);
    }
}
