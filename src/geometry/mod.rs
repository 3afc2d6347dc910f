//! Geometry primitives stored in and queried against the tree.
//!
//! Only two shapes exist: axis-aligned boxes ([`BoundingBox`]) and line segments ([`Line`]).
//! [`Geometry`] is the sum of the two. All distances are Euclidean and computed in `f64`.

mod bbox;
mod line;

pub use bbox::BoundingBox;
pub use line::Line;

use geo_traits::CoordTrait;

use crate::r#type::IndexableNum;

/// A geometry held by an [`Entry`](crate::rtree::Entry), or used as a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry<N: IndexableNum> {
    /// An axis-aligned box.
    Rect(BoundingBox<N>),
    /// A line segment.
    Line(Line<N>),
}

impl<N: IndexableNum> Geometry<N> {
    /// The tightest axis-aligned box around this geometry.
    pub fn bounding_box(&self) -> BoundingBox<N> {
        match self {
            Geometry::Rect(rect) => *rect,
            Geometry::Line(line) => line.bounding_box(),
        }
    }

    /// Minimum Euclidean distance between this geometry and `other`. Zero when they touch.
    pub fn distance(&self, other: &Geometry<N>) -> f64 {
        match (self, other) {
            (Geometry::Rect(a), Geometry::Rect(b)) => a.distance_to(b),
            (Geometry::Rect(rect), Geometry::Line(line))
            | (Geometry::Line(line), Geometry::Rect(rect)) => line.distance_to_box(rect),
            (Geometry::Line(a), Geometry::Line(b)) => a.distance(b),
        }
    }

    /// Minimum Euclidean distance between this geometry and any point of `bbox`.
    ///
    /// This is never larger than [`Geometry::distance`] to any geometry contained in `bbox`,
    /// which makes it a valid pruning bound for Euclidean searches.
    pub fn distance_to_box(&self, bbox: &BoundingBox<N>) -> f64 {
        match self {
            Geometry::Rect(rect) => rect.distance_to(bbox),
            Geometry::Line(line) => line.distance_to_box(bbox),
        }
    }

    /// Returns `true` if every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        match self {
            Geometry::Rect(rect) => !rect.is_empty() && rect.is_finite(),
            Geometry::Line(line) => line.is_finite(),
        }
    }

    /// Returns the line if this is a [`Geometry::Line`].
    pub fn as_line(&self) -> Option<&Line<N>> {
        match self {
            Geometry::Line(line) => Some(line),
            Geometry::Rect(_) => None,
        }
    }
}

impl<N: IndexableNum> From<Line<N>> for Geometry<N> {
    fn from(value: Line<N>) -> Self {
        Geometry::Line(value)
    }
}

impl<N: IndexableNum> From<BoundingBox<N>> for Geometry<N> {
    fn from(value: BoundingBox<N>) -> Self {
        Geometry::Rect(value)
    }
}

/// A single coordinate.
///
/// Used in the implementation of `RectTrait` for [`BoundingBox`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord<N: IndexableNum> {
    pub(crate) x: N,
    pub(crate) y: N,
}

impl<N: IndexableNum> CoordTrait for Coord<N> {
    type T = N;

    fn dim(&self) -> geo_traits::Dimensions {
        geo_traits::Dimensions::Xy
    }

    fn x(&self) -> Self::T {
        self.x
    }

    fn y(&self) -> Self::T {
        self.y
    }

    fn nth_or_panic(&self, n: usize) -> Self::T {
        match n {
            0 => self.x,
            1 => self.y,
            _ => panic!("Invalid index of coord"),
        }
    }
}

/// Planar helpers shared by the box and segment code. Everything here works on `f64` pairs.
pub(crate) mod planar {
    pub(crate) type Point = (f64, f64);

    /// Twice the signed area of the triangle `o, a, b`.
    #[inline]
    fn cross(o: Point, a: Point, b: Point) -> f64 {
        (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
    }

    /// Whether `r`, known to be collinear with `p` and `q`, lies within their extent.
    #[inline]
    fn within_extent(p: Point, q: Point, r: Point) -> bool {
        r.0 >= p.0.min(q.0) && r.0 <= p.0.max(q.0) && r.1 >= p.1.min(q.1) && r.1 <= p.1.max(q.1)
    }

    pub(crate) fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
        let d1 = cross(b1, b2, a1);
        let d2 = cross(b1, b2, a2);
        let d3 = cross(a1, a2, b1);
        let d4 = cross(a1, a2, b2);

        if ((d1 > 0. && d2 < 0.) || (d1 < 0. && d2 > 0.))
            && ((d3 > 0. && d4 < 0.) || (d3 < 0. && d4 > 0.))
        {
            return true;
        }

        (d1 == 0. && within_extent(b1, b2, a1))
            || (d2 == 0. && within_extent(b1, b2, a2))
            || (d3 == 0. && within_extent(a1, a2, b1))
            || (d4 == 0. && within_extent(a1, a2, b2))
    }

    pub(crate) fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
        let dx = b.0 - a.0;
        let dy = b.1 - a.1;
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0. {
            return (p.0 - a.0).hypot(p.1 - a.1);
        }
        let t = (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0., 1.);
        (p.0 - (a.0 + t * dx)).hypot(p.1 - (a.1 + t * dy))
    }

    pub(crate) fn segment_segment_distance(a1: Point, a2: Point, b1: Point, b2: Point) -> f64 {
        if segments_intersect(a1, a2, b1, b2) {
            return 0.;
        }
        point_segment_distance(a1, b1, b2)
            .min(point_segment_distance(a2, b1, b2))
            .min(point_segment_distance(b1, a1, a2))
            .min(point_segment_distance(b2, a1, a2))
    }

    /// 1D distance from a value to a range.
    #[inline]
    pub(crate) fn axis_dist(k: f64, min: f64, max: f64) -> f64 {
        if k < min {
            min - k
        } else if k <= max {
            0.
        } else {
            k - max
        }
    }
}
