/// Custom quicksort that partially sorts `values` alongside the permutation in `order`.
///
/// Recursion stops once `left` and `right` fall within the same run of `node_size` positions,
/// since packing does not care about order inside a node.
// Partially taken from static_aabb2d_index under the MIT/Apache license
pub(super) fn partial_sort<V: PartialOrd + Copy>(
    values: &mut [V],
    order: &mut [usize],
    left: usize,
    right: usize,
    node_size: usize,
) {
    debug_assert!(left <= right);

    if left / node_size >= right / node_size {
        return;
    }

    // apply median of three method
    let start = values[left];
    let mid = values[(left + right) >> 1];
    let end = values[right];
    let pivot = median(start, mid, end);

    let mut i = left.wrapping_sub(1);
    let mut j = right.wrapping_add(1);

    loop {
        loop {
            i = i.wrapping_add(1);
            if values[i] >= pivot {
                break;
            }
        }

        loop {
            j = j.wrapping_sub(1);
            if values[j] <= pivot {
                break;
            }
        }

        if i >= j {
            break;
        }

        values.swap(i, j);
        order.swap(i, j);
    }

    partial_sort(values, order, left, j, node_size);
    partial_sort(values, order, j.wrapping_add(1), right, node_size);
}

#[inline]
fn median<V: PartialOrd + Copy>(a: V, b: V, c: V) -> V {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if c <= lo {
        lo
    } else if c >= hi {
        hi
    } else {
        c
    }
}

/// Rearrange `items` so that position `i` holds the item previously at `order[i]`.
///
/// `order` is consumed as scratch space.
pub(super) fn apply_permutation<E>(items: &mut [E], order: &mut [usize]) {
    debug_assert_eq!(items.len(), order.len());
    for start in 0..items.len() {
        if order[start] == start {
            continue;
        }
        let mut current = start;
        loop {
            let source = order[current];
            order[current] = current;
            if source == start {
                break;
            }
            items.swap(current, source);
            current = source;
        }
    }
}
