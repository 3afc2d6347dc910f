//! Utilities for generating RTrees.

/// Split `items` into consecutive groups of `node_size`, in order.
///
/// If the trailing group would hold fewer than `min_children` items, it takes the tail of the
/// group before it. Since `min_children <= node_size / 2`, both groups then meet the minimum.
pub(crate) fn pack<I>(items: Vec<I>, node_size: usize, min_children: usize) -> Vec<Vec<I>> {
    debug_assert!(node_size >= 2);
    debug_assert!(min_children <= node_size / 2);

    let mut groups: Vec<Vec<I>> = Vec::with_capacity(items.len().div_ceil(node_size));
    let mut items = items.into_iter().peekable();
    while items.peek().is_some() {
        groups.push(items.by_ref().take(node_size).collect());
    }

    if let [.., previous, last] = groups.as_mut_slice() {
        if last.len() < min_children {
            let missing = min_children - last.len();
            let moved = previous.split_off(previous.len() - missing);
            last.splice(0..0, moved);
        }
    }

    groups
}

#[cfg(test)]
mod test {
    use super::pack;

    #[test]
    fn full_groups_are_untouched() {
        let groups = pack((0..12).collect(), 4, 2);
        assert_eq!(groups, vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7], vec![8, 9, 10, 11]]);
    }

    #[test]
    fn short_tail_borrows_from_previous() {
        let groups = pack((0..9).collect(), 4, 2);
        assert_eq!(groups, vec![vec![0, 1, 2, 3], vec![4, 5, 6], vec![7, 8]]);

        let groups = pack((0..17).collect(), 16, 6);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 11);
        assert_eq!(groups[1], (11..17).collect::<Vec<_>>());
    }

    #[test]
    fn single_short_group_is_allowed() {
        assert_eq!(pack(vec![1, 2], 8, 3), vec![vec![1, 2]]);
        assert!(pack(Vec::<u8>::new(), 8, 3).is_empty());
    }
}
