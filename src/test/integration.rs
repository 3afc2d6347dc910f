use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::AABB;

use crate::geometry::{BoundingBox, Geometry, Line};
use crate::rtree::sort::{HilbertSort, STRSort};
use crate::rtree::{
    EuclideanDistance, NearbyQuery, RTree, RTreeBuilder, RTreeIndex, SplitStrategy, TreeParams,
};
use crate::test::{check_invariants, random_lines};
use crate::SegmentIndexError;

/// Build the same data three ways: hilbert packing, STR packing and one-by-one insertion.
fn trees(lines: &[Line<f64>], params: TreeParams) -> Vec<RTree<f64, usize>> {
    let mut builder = RTreeBuilder::with_params(params).unwrap();
    for (i, line) in lines.iter().enumerate() {
        builder.add(i, *line);
    }
    let hilbert = builder.clone().finish::<HilbertSort>();
    let str = builder.finish::<STRSort>();

    let mut inserted = RTree::with_params(params).unwrap();
    for (i, line) in lines.iter().enumerate() {
        inserted.insert(i, *line);
    }

    vec![hilbert, str, inserted]
}

fn brute_force(lines: &[Line<f64>], query: &Geometry<f64>, max_distance: f64) -> Vec<(usize, f64)> {
    let mut expected: Vec<_> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| (i, query.distance(&Geometry::Line(*line))))
        .filter(|(_, d)| *d <= max_distance)
        .collect();
    expected.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    expected
}

fn search(tree: &RTree<f64, usize>, query: &Geometry<f64>, max_distance: f64) -> Vec<(usize, f64)> {
    tree.search_nearby(*query, max_distance, EuclideanDistance)
        .unwrap()
        .map(|result| {
            let neighbor = result.unwrap();
            (*neighbor.value(), neighbor.distance)
        })
        .collect()
}

#[test]
fn results_match_brute_force() {
    let mut rng = StdRng::seed_from_u64(7);
    for round in 0..20 {
        let n = rng.gen_range(0..300);
        let lines = random_lines(n, round);
        let max_children = rng.gen_range(4..12);
        let params = TreeParams::new(max_children);

        for tree in trees(&lines, params) {
            check_invariants(&tree);
            for _ in 0..5 {
                let query: Geometry<f64> = random_lines(1, rng.gen()).remove(0).into();
                let max_distance = rng.gen_range(0.0..200.0);

                let expected = brute_force(&lines, &query, max_distance);
                let actual = search(&tree, &query, max_distance);

                let mut expected_ids: Vec<_> = expected.iter().map(|(i, _)| *i).collect();
                let mut actual_ids: Vec<_> = actual.iter().map(|(i, _)| *i).collect();
                expected_ids.sort();
                actual_ids.sort();
                assert_eq!(actual_ids, expected_ids);

                // Ties may come in any order, but distances must agree position by position.
                for (a, e) in actual.iter().zip(expected.iter()) {
                    assert_eq!(a.1, e.1);
                }
            }
        }
    }
}

#[test]
fn results_are_in_non_decreasing_order() {
    let lines = random_lines(2000, 42);
    for tree in trees(&lines, TreeParams::default()) {
        let query = Geometry::Line(Line::new(500., 500., 520., 480.));
        let results = search(&tree, &query, f64::INFINITY);
        assert_eq!(results.len(), 2000);
        assert!(results.windows(2).all(|w| w[0].1 <= w[1].1));
    }
}

#[test]
fn raising_the_cutoff_only_adds_results() {
    let lines = random_lines(800, 5);
    let tree = RTree::bulk_load(lines.iter().copied().enumerate());
    let query = Geometry::Line(Line::new(100., 900., 300., 700.));

    let mut previous: Vec<usize> = vec![];
    for max_distance in [0., 1., 10., 50., 120., 400., 2000.] {
        let mut current: Vec<usize> = search(&tree, &query, max_distance)
            .into_iter()
            .map(|(i, _)| i)
            .collect();
        current.sort();
        assert!(previous.iter().all(|i| current.binary_search(i).is_ok()));
        previous = current;
    }
    assert_eq!(previous.len(), 800);
}

#[test]
fn taking_a_few_results_expands_fewer_nodes() {
    let lines = random_lines(10_000, 1);
    let tree = RTree::bulk_load(lines.iter().copied().enumerate());
    let query = NearbyQuery::new(Line::new(500., 500., 501., 501.), f64::INFINITY).unwrap();

    let mut partial = query.run(&tree, EuclideanDistance);
    let first: Vec<_> = partial.by_ref().take(5).collect();
    assert_eq!(first.len(), 5);

    let mut full = query.run(&tree, EuclideanDistance);
    assert_eq!(full.by_ref().count(), 10_000);

    assert!(
        partial.expanded_nodes() < full.expanded_nodes(),
        "{} >= {}",
        partial.expanded_nodes(),
        full.expanded_nodes()
    );
}

#[test]
fn empty_tree_scenario() {
    let tree = RTree::<f64, ()>::new();
    let mut results = tree
        .search_line(&Line::new(0., 0., 1., 1.), 10., EuclideanDistance)
        .unwrap();
    assert!(results.next().is_none());
}

#[test]
fn exact_match_scenario() {
    for params in [
        TreeParams::default(),
        TreeParams::new(2).with_split_strategy(SplitStrategy::Linear),
    ] {
        let mut tree = RTree::with_params(params).unwrap();
        tree.insert("L1", Line::new(0., 0., 1., 0.));
        tree.insert("L2", Line::new(5., 5., 6., 6.));

        let results: Vec<_> = tree
            .search_line(&Line::new(0., 0., 1., 0.), 1., EuclideanDistance)
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(results.len(), 1);
        assert_eq!(*results[0].value(), "L1");
        assert_eq!(results[0].distance, 0.);
    }
}

#[test]
fn negative_cutoff_is_invalid() {
    let tree = RTree::bulk_load([((), Line::new(0., 0., 1., 0.))]);
    let result = tree.search_line(&Line::new(0., 0., 1., 0.), -1., EuclideanDistance);
    assert!(matches!(result, Err(SegmentIndexError::InvalidArgument(_))));
}

#[test]
fn duplicate_geometries_are_all_returned() {
    let line = Line::new(3., 3., 4., 4.);
    let tree = RTree::bulk_load((0..40).map(|i| (i, line)));
    let mut values: Vec<_> = tree
        .search_line(&line, 0., EuclideanDistance)
        .unwrap()
        .map(|r| *r.unwrap().value())
        .collect();
    values.sort();
    assert_eq!(values, (0..40).collect::<Vec<_>>());
}

#[test]
fn rect_search_agrees_with_rstar() {
    let lines = random_lines(3000, 99);
    let tree = RTree::bulk_load(lines.iter().copied().enumerate());
    let to_insert = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let bbox = line.bounding_box();
            let aabb =
                AABB::from_corners([bbox.min_x(), bbox.min_y()], [bbox.max_x(), bbox.max_y()]);
            GeomWithData::new(Rectangle::from_aabb(aabb), i)
        })
        .collect::<Vec<_>>();
    let reference = rstar::RTree::bulk_load(to_insert);

    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..50 {
        let x = rng.gen_range(0.0..1000.0);
        let y = rng.gen_range(0.0..1000.0);
        let query = BoundingBox::new(x, y, x + rng.gen_range(0.0..150.0), y + 40.);

        let mut ours: Vec<usize> = tree
            .search_rect(&query)
            .iter()
            .map(|entry| *entry.value())
            .collect();
        let envelope = AABB::from_corners(
            [query.min_x(), query.min_y()],
            [query.max_x(), query.max_y()],
        );
        let mut theirs: Vec<usize> = reference
            .locate_in_envelope_intersecting(&envelope)
            .map(|rect| rect.data)
            .collect();

        ours.sort();
        theirs.sort();
        assert_eq!(ours, theirs);
    }
}

#[test]
fn rect_entries_and_queries_mix_with_lines() {
    let mut builder = RTreeBuilder::<f64, &str>::new();
    builder.add("box", BoundingBox::new(10., 10., 20., 20.));
    builder.add_line("crossing", 0., 15., 30., 15.);
    builder.add_line("far", 100., 100., 110., 110.);
    let tree = builder.finish::<HilbertSort>();

    // A point-like query inside the box
    let results: Vec<_> = tree
        .search_nearby(BoundingBox::from_point(12., 12.), 5., EuclideanDistance)
        .unwrap()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(*results[0].value(), "box");
    assert_eq!(results[0].distance, 0.);
    assert_eq!(*results[1].value(), "crossing");
    assert_eq!(results[1].distance, 3.);
    assert_eq!(results.len(), 2);
}

#[test]
fn searches_share_a_tree_across_threads() {
    let lines = random_lines(1000, 12);
    let tree = RTree::bulk_load(lines.iter().copied().enumerate());
    let query = Geometry::Line(Line::new(0., 0., 1000., 1000.));
    let expected = search(&tree, &query, 25.);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| search(&tree, &query, 25.)))
            .collect();
        for handle in handles {
            let result = handle.join().unwrap();
            assert_eq!(result.len(), expected.len());
        }
    });
}

#[test]
fn generic_coordinates() {
    let mut builder = RTreeBuilder::<u16, usize>::new();
    for i in 0..100u16 {
        builder.add_line(i as usize, i * 3, 0, i * 3, 10);
    }
    let tree = builder.finish::<STRSort>();
    check_invariants(&tree);
    let results = tree.neighbors(Line::new(31u16, 5, 31, 5), Some(2), None).unwrap();
    let mut values: Vec<_> = results.iter().map(|n| *n.value()).collect();
    values.sort();
    assert_eq!(values, vec![10, 11]);
    assert!(results.iter().all(|n| n.distance <= 2.));
}
