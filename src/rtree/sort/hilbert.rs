use crate::r#type::IndexableNum;
use crate::rtree::node::Entry;
use crate::rtree::sort::util::{apply_permutation, partial_sort};
use crate::rtree::sort::{Sort, SortParams};

/// An implementation of hilbert sorting.
///
/// Entry centres are scaled onto a 16-bit grid spanning the extent of all entries and ordered by
/// their position along a Hilbert curve. The hilbert calculations are originally derived from [a
/// C++ implementation](https://github.com/rawrunprotected/hilbert_curves).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HilbertSort;

impl<N: IndexableNum> Sort<N> for HilbertSort {
    fn sort<T>(params: &SortParams<N>, entries: &mut [Entry<N, T>]) {
        if params.num_items < 2 {
            return;
        }

        let min_x = params.extent.min_x().as_f64();
        let min_y = params.extent.min_y().as_f64();
        let width = params.extent.width();
        let height = params.extent.height();
        let hilbert_max = ((1 << 16) - 1) as f64;

        let scale = |value: f64, min: f64, span: f64| -> u32 {
            if span > 0. {
                (hilbert_max * (value - min) / span).floor() as u32
            } else {
                0
            }
        };

        // map item centers into Hilbert coordinate space and calculate Hilbert values
        let mut hilbert_values: Vec<u32> = entries
            .iter()
            .map(|entry| {
                let (cx, cy) = entry.bounding_box().center();
                hilbert(scale(cx, min_x, width), scale(cy, min_y, height))
            })
            .collect();
        let mut order: Vec<usize> = (0..entries.len()).collect();

        // sort items by their Hilbert value (for packing later)
        partial_sort(
            &mut hilbert_values,
            &mut order,
            0,
            params.num_items - 1,
            params.node_size,
        );
        apply_permutation(entries, &mut order);
    }
}

// Taken from static_aabb2d_index under the mit/apache license
// https://github.com/jbuckmccready/static_aabb2d_index/blob/9e6add59d77b74d4de0ac32159db47fbcb3acc28/src/static_aabb2d_index.rs#L486C1-L544C2
#[inline]
fn hilbert(x: u32, y: u32) -> u32 {
    // Fast Hilbert curve algorithm by http://threadlocalmutex.com/
    // Ported from C++ https://github.com/rawrunprotected/hilbert_curves (public domain)
    let mut a_1 = x ^ y;
    let mut b_1 = 0xFFFF ^ a_1;
    let mut c_1 = 0xFFFF ^ (x | y);
    let mut d_1 = x & (y ^ 0xFFFF);

    let mut a_2 = a_1 | (b_1 >> 1);
    let mut b_2 = (a_1 >> 1) ^ a_1;
    let mut c_2 = ((c_1 >> 1) ^ (b_1 & (d_1 >> 1))) ^ c_1;
    let mut d_2 = ((a_1 & (c_1 >> 1)) ^ (d_1 >> 1)) ^ d_1;

    a_1 = a_2;
    b_1 = b_2;
    c_1 = c_2;
    d_1 = d_2;
    a_2 = (a_1 & (a_1 >> 2)) ^ (b_1 & (b_1 >> 2));
    b_2 = (a_1 & (b_1 >> 2)) ^ (b_1 & ((a_1 ^ b_1) >> 2));
    c_2 ^= (a_1 & (c_1 >> 2)) ^ (b_1 & (d_1 >> 2));
    d_2 ^= (b_1 & (c_1 >> 2)) ^ ((a_1 ^ b_1) & (d_1 >> 2));

    a_1 = a_2;
    b_1 = b_2;
    c_1 = c_2;
    d_1 = d_2;
    a_2 = (a_1 & (a_1 >> 4)) ^ (b_1 & (b_1 >> 4));
    b_2 = (a_1 & (b_1 >> 4)) ^ (b_1 & ((a_1 ^ b_1) >> 4));
    c_2 ^= (a_1 & (c_1 >> 4)) ^ (b_1 & (d_1 >> 4));
    d_2 ^= (b_1 & (c_1 >> 4)) ^ ((a_1 ^ b_1) & (d_1 >> 4));

    a_1 = a_2;
    b_1 = b_2;
    c_1 = c_2;
    d_1 = d_2;
    c_2 ^= (a_1 & (c_1 >> 8)) ^ (b_1 & (d_1 >> 8));
    d_2 ^= (b_1 & (c_1 >> 8)) ^ ((a_1 ^ b_1) & (d_1 >> 8));

    a_1 = c_2 ^ (c_2 >> 1);
    b_1 = d_2 ^ (d_2 >> 1);

    let mut i0 = x ^ y;
    let mut i1 = b_1 | (0xFFFF ^ (i0 | a_1));

    i0 = (i0 | (i0 << 8)) & 0x00FF_00FF;
    i0 = (i0 | (i0 << 4)) & 0x0F0F_0F0F;
    i0 = (i0 | (i0 << 2)) & 0x3333_3333;
    i0 = (i0 | (i0 << 1)) & 0x5555_5555;

    i1 = (i1 | (i1 << 8)) & 0x00FF_00FF;
    i1 = (i1 | (i1 << 4)) & 0x0F0F_0F0F;
    i1 = (i1 | (i1 << 2)) & 0x3333_3333;
    i1 = (i1 | (i1 << 1)) & 0x5555_5555;

    (i1 << 1) | i0
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::{BoundingBox, Line};
    use crate::rtree::node::envelope;

    #[test]
    fn hilbert_values_are_distinct() {
        let mut values: Vec<u32> = (0..16)
            .flat_map(|x| (0..16).map(move |y| hilbert(x, y)))
            .collect();
        values.sort();
        values.dedup();
        assert_eq!(values.len(), 256);
    }

    #[test]
    fn groups_nearby_entries() {
        // Alternate between two far apart clusters so that insertion order is the worst case.
        let mut entries: Vec<Entry<f64, usize>> = (0..8)
            .map(|i| {
                let offset = if i % 2 == 0 { 0. } else { 1000. };
                let x = offset + i as f64;
                Entry::new(i, i as usize, Line::new(x, x, x + 1., x + 1.).into())
            })
            .collect();
        let params = SortParams {
            num_items: 8,
            node_size: 4,
            extent: envelope(entries.as_slice()),
        };
        HilbertSort::sort(&params, &mut entries);

        let first = envelope(&entries[..4]);
        let second = envelope(&entries[4..]);
        assert!(first.area() < 100.);
        assert!(second.area() < 100.);
        assert_eq!(first.union(&second), BoundingBox::new(0., 0., 1008., 1008.));
    }

    #[test]
    fn degenerate_extent_does_not_panic() {
        let mut entries: Vec<Entry<i32, ()>> = (0..20)
            .map(|i| Entry::new(i, (), Line::new(5, 5, 5, 5).into()))
            .collect();
        let params = SortParams {
            num_items: 20,
            node_size: 4,
            extent: BoundingBox::from_point(5, 5),
        };
        HilbertSort::sort(&params, &mut entries);
        assert_eq!(entries.len(), 20);
    }
}
