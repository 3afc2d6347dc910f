//! Example demonstrating proximity search over road segments.
//!
//! This example builds a small index of `geo` lines, then finds the segments nearest to a query
//! segment: with the built-in Euclidean distance, with early stopping, and with a custom
//! weighted distance.

use geo_0_31::{coord, Line as GeoLine};
use segment_rtree::geometry::{Geometry, Line};
use segment_rtree::rtree::sort::STRSort;
use segment_rtree::rtree::{distance_fn, EuclideanDistance, RTreeBuilder, RTreeIndex};

#[derive(Debug)]
struct Road {
    name: &'static str,
    /// Multiplier applied to distance; at least 1 so the Euclidean bound stays valid.
    cost: f64,
}

fn main() {
    let roads = [
        (Road { name: "Main St", cost: 1.0 }, (0., 0.), (10., 0.)),
        (Road { name: "Oak Ave", cost: 1.0 }, (0., 3.), (10., 3.)),
        (Road { name: "Toll Rd", cost: 4.0 }, (0., 1.), (10., 1.)),
        (Road { name: "Elm St", cost: 1.0 }, (12., -5.), (12., 5.)),
        (Road { name: "Far Ln", cost: 1.0 }, (50., 50.), (60., 60.)),
    ];

    let mut builder = RTreeBuilder::<f64, Road>::new();
    for (road, start, end) in roads {
        let line = GeoLine::new(
            coord! { x: start.0, y: start.1 },
            coord! { x: end.0, y: end.1 },
        );
        builder.add_line_trait(road, &line);
    }
    let tree = builder.finish::<STRSort>();

    let query = Line::new(2., 2., 8., 2.);

    println!("1. Every road within 5 units, nearest first:");
    for result in tree.search_line(&query, 5., EuclideanDistance).unwrap() {
        let neighbor = result.unwrap();
        println!("    {:<8} {:.2}", neighbor.value().name, neighbor.distance);
    }

    println!("\n2. Only the closest two roads:");
    let closest: Vec<_> = tree
        .search_line(&query, f64::INFINITY, EuclideanDistance)
        .unwrap()
        .take(2)
        .map(|result| result.unwrap().value().name)
        .collect();
    println!("    {:?}", closest);

    println!("\n3. Weighted by road cost:");
    let costs: Vec<(Geometry<f64>, f64)> = tree
        .iter()
        .map(|entry| (*entry.geometry(), entry.value().cost))
        .collect();
    let weighted = distance_fn(|query: &Geometry<f64>, item: &Geometry<f64>| {
        let cost = costs
            .iter()
            .find(|(geometry, _)| geometry == item)
            .map_or(1.0, |(_, cost)| *cost);
        query.distance(item) * cost
    });
    for result in tree.search_line(&query, 5., weighted).unwrap() {
        let neighbor = result.unwrap();
        println!("    {:<8} {:.2}", neighbor.value().name, neighbor.distance);
    }
}
