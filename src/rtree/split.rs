//! Node splitting for incremental insertion.
//!
//! Both strategies follow Guttman's original R-tree paper. Costs compare area first and fall back
//! to the margin, since axis-parallel segments have zero-area boxes.

use std::cmp::Ordering;

use crate::geometry::BoundingBox;
use crate::r#type::IndexableNum;
use crate::rtree::index::{SplitStrategy, TreeParams};
use crate::rtree::node::HasBoundingBox;

/// Divide an overfull node's members into two groups, each holding at least
/// [`TreeParams::min_children`] members.
pub(crate) fn split<N: IndexableNum, I: HasBoundingBox<N>>(
    items: Vec<I>,
    params: &TreeParams,
) -> (Vec<I>, Vec<I>) {
    debug_assert!(items.len() >= 2);
    let (seed1, seed2) = match params.split_strategy() {
        SplitStrategy::Linear => linear_seeds(&items),
        SplitStrategy::Quadratic => quadratic_seeds(&items),
    };
    distribute(
        items,
        seed1,
        seed2,
        params.min_children(),
        params.split_strategy() == SplitStrategy::Quadratic,
    )
}

/// Area cost with a margin tie-breaker.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cost {
    area: f64,
    margin: f64,
}

impl Cost {
    fn enlargement<N: IndexableNum>(bbox: &BoundingBox<N>, other: &BoundingBox<N>) -> Self {
        let grown = bbox.union(other);
        Self {
            area: grown.area() - bbox.area(),
            margin: grown.margin() - bbox.margin(),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.area
            .total_cmp(&other.area)
            .then_with(|| self.margin.total_cmp(&other.margin))
    }
}

/// The pair whose covering box wastes the most space.
fn quadratic_seeds<N: IndexableNum, I: HasBoundingBox<N>>(items: &[I]) -> (usize, usize) {
    let mut best = (0, 1);
    let mut worst_waste: Option<Cost> = None;

    for i in 0..items.len() {
        for j in i + 1..items.len() {
            let a = items[i].bbox();
            let b = items[j].bbox();
            let union = a.union(b);
            let waste = Cost {
                area: union.area() - a.area() - b.area(),
                margin: union.margin() - a.margin() - b.margin(),
            };
            if worst_waste.map_or(true, |w| waste.compare(&w) == Ordering::Greater) {
                worst_waste = Some(waste);
                best = (i, j);
            }
        }
    }
    best
}

/// The pair with the greatest separation along either axis, normalised by the extent on that
/// axis.
fn linear_seeds<N: IndexableNum, I: HasBoundingBox<N>>(items: &[I]) -> (usize, usize) {
    let axes: [fn(&BoundingBox<N>) -> (f64, f64); 2] = [
        |b| (b.min_x().as_f64(), b.max_x().as_f64()),
        |b| (b.min_y().as_f64(), b.max_y().as_f64()),
    ];

    let mut best = (0, 1);
    let mut best_separation = f64::NEG_INFINITY;
    for axis in axes {
        let mut highest_low = (0, f64::NEG_INFINITY);
        let mut lowest_high = (0, f64::INFINITY);
        let mut extent = (f64::INFINITY, f64::NEG_INFINITY);
        for (i, item) in items.iter().enumerate() {
            let (low, high) = axis(item.bbox());
            if low > highest_low.1 {
                highest_low = (i, low);
            }
            if high < lowest_high.1 {
                lowest_high = (i, high);
            }
            extent = (extent.0.min(low), extent.1.max(high));
        }

        let width = extent.1 - extent.0;
        let separation = if width > 0. {
            (highest_low.1 - lowest_high.1) / width
        } else {
            0.
        };
        if separation > best_separation {
            best_separation = separation;
            best = (lowest_high.0, highest_low.0);
        }
    }

    if best.0 == best.1 {
        best.1 = if best.0 == 0 { 1 } else { 0 };
    }
    best
}

/// Assign every member to one of the two seed groups.
///
/// With `pick_next` the member with the strongest preference is placed first (quadratic);
/// otherwise members are placed in storage order (linear).
fn distribute<N: IndexableNum, I: HasBoundingBox<N>>(
    mut items: Vec<I>,
    seed1: usize,
    seed2: usize,
    min_children: usize,
    pick_next: bool,
) -> (Vec<I>, Vec<I>) {
    debug_assert_ne!(seed1, seed2);
    let (high, low) = if seed1 > seed2 {
        (seed1, seed2)
    } else {
        (seed2, seed1)
    };
    let second = items.swap_remove(high);
    let first = items.swap_remove(low);

    let mut bbox1 = *first.bbox();
    let mut bbox2 = *second.bbox();
    let mut group1 = vec![first];
    let mut group2 = vec![second];

    while !items.is_empty() {
        // One group needs everything that is left to reach the minimum.
        if group1.len() + items.len() <= min_children {
            for item in items.drain(..) {
                bbox1.expand(item.bbox());
                group1.push(item);
            }
            break;
        }
        if group2.len() + items.len() <= min_children {
            for item in items.drain(..) {
                bbox2.expand(item.bbox());
                group2.push(item);
            }
            break;
        }

        let next = if pick_next {
            strongest_preference(&items, &bbox1, &bbox2)
        } else {
            items.len() - 1
        };
        let item = items.swap_remove(next);

        let cost1 = Cost::enlargement(&bbox1, item.bbox());
        let cost2 = Cost::enlargement(&bbox2, item.bbox());
        let to_first = match cost1.compare(&cost2) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => match bbox1.area().total_cmp(&bbox2.area()) {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal => group1.len() <= group2.len(),
            },
        };

        if to_first {
            bbox1.expand(item.bbox());
            group1.push(item);
        } else {
            bbox2.expand(item.bbox());
            group2.push(item);
        }
    }

    (group1, group2)
}

/// Index of the member whose enlargement differs most between the two groups.
fn strongest_preference<N: IndexableNum, I: HasBoundingBox<N>>(
    items: &[I],
    bbox1: &BoundingBox<N>,
    bbox2: &BoundingBox<N>,
) -> usize {
    let preference = |item: &I| {
        let d1 = Cost::enlargement(bbox1, item.bbox());
        let d2 = Cost::enlargement(bbox2, item.bbox());
        Cost {
            area: (d1.area - d2.area).abs(),
            margin: (d1.margin - d2.margin).abs(),
        }
    };

    items
        .iter()
        .map(preference)
        .enumerate()
        .max_by(|(_, a), (_, b)| a.compare(b))
        .map_or(0, |(i, _)| i)
}
