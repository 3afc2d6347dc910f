use geo_traits::{CoordTrait, LineTrait};

use crate::geometry::planar::{
    point_segment_distance, segment_segment_distance, segments_intersect, Point,
};
use crate::geometry::BoundingBox;
use crate::r#type::IndexableNum;

/// A line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line<N: IndexableNum> {
    x1: N,
    y1: N,
    x2: N,
    y2: N,
}

impl<N: IndexableNum> Line<N> {
    pub fn new(x1: N, y1: N, x2: N, y2: N) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Build a segment from anything implementing [`LineTrait`], such as `geo::Line`.
    pub fn from_line_trait(line: &impl LineTrait<T = N>) -> Self {
        let start = line.start();
        let end = line.end();
        Self::new(start.x(), start.y(), end.x(), end.y())
    }

    pub fn start(&self) -> (N, N) {
        (self.x1, self.y1)
    }

    pub fn end(&self) -> (N, N) {
        (self.x2, self.y2)
    }

    #[inline]
    fn points(&self) -> (Point, Point) {
        (
            (self.x1.as_f64(), self.y1.as_f64()),
            (self.x2.as_f64(), self.y2.as_f64()),
        )
    }

    pub fn bounding_box(&self) -> BoundingBox<N> {
        BoundingBox::new(self.x1, self.y1, self.x2, self.y2)
    }

    pub fn length(&self) -> f64 {
        let (a, b) = self.points();
        (b.0 - a.0).hypot(b.1 - a.1)
    }

    pub(crate) fn is_finite(&self) -> bool {
        let (a, b) = self.points();
        a.0.is_finite() && a.1.is_finite() && b.0.is_finite() && b.1.is_finite()
    }

    pub fn distance_to_point(&self, x: f64, y: f64) -> f64 {
        let (a, b) = self.points();
        point_segment_distance((x, y), a, b)
    }

    /// Returns `true` if the segments cross or touch, including collinear overlap.
    pub fn intersects(&self, other: &Line<N>) -> bool {
        let (a1, a2) = self.points();
        let (b1, b2) = other.points();
        segments_intersect(a1, a2, b1, b2)
    }

    /// Minimum Euclidean distance between the two segments.
    pub fn distance(&self, other: &Line<N>) -> f64 {
        let (a1, a2) = self.points();
        let (b1, b2) = other.points();
        segment_segment_distance(a1, a2, b1, b2)
    }

    /// Minimum Euclidean distance between this segment and any point of `bbox`.
    pub fn distance_to_box(&self, bbox: &BoundingBox<N>) -> f64 {
        if bbox.is_empty() {
            return f64::INFINITY;
        }
        let (a, b) = self.points();
        if bbox.contains_point(a.0, a.1) || bbox.contains_point(b.0, b.1) {
            return 0.;
        }

        let corners = bbox.corners();
        for i in 0..4 {
            if segments_intersect(a, b, corners[i], corners[(i + 1) % 4]) {
                return 0.;
            }
        }

        // Disjoint convex shapes: the closest pair involves a vertex of one of them.
        corners
            .iter()
            .map(|corner| point_segment_distance(*corner, a, b))
            .fold(
                bbox.distance_to_point(a.0, a.1)
                    .min(bbox.distance_to_point(b.0, b.1)),
                f64::min,
            )
    }
}
