use geo_traits::{CoordTrait, RectTrait};

use crate::geometry::planar::{axis_dist, Point};
use crate::geometry::Coord;
use crate::r#type::IndexableNum;

/// An axis-aligned bounding box.
///
/// Both node boxes inside the tree and [`Geometry::Rect`](crate::geometry::Geometry::Rect)
/// entries use this type. A box whose minimum exceeds its maximum on either axis is *empty*; the
/// box of an empty tree is empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox<N: IndexableNum> {
    min_x: N,
    min_y: N,
    max_x: N,
    max_y: N,
}

impl<N: IndexableNum> BoundingBox<N> {
    /// Create a box from two corners. Swapped coordinates are put back in order.
    pub fn new(min_x: N, min_y: N, max_x: N, max_y: N) -> Self {
        let (min_x, max_x) = if max_x < min_x {
            (max_x, min_x)
        } else {
            (min_x, max_x)
        };
        let (min_y, max_y) = if max_y < min_y {
            (max_y, min_y)
        } else {
            (min_y, max_y)
        };
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// A degenerate box covering a single point.
    pub fn from_point(x: N, y: N) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    /// The empty box. Expanding it by any box yields that box.
    pub fn empty() -> Self {
        Self {
            min_x: N::max_value(),
            min_y: N::max_value(),
            max_x: N::min_value(),
            max_y: N::min_value(),
        }
    }

    /// Build a box from anything implementing [`RectTrait`], such as `geo::Rect`.
    pub fn from_rect(rect: &impl RectTrait<T = N>) -> Self {
        Self::new(
            rect.min().x(),
            rect.min().y(),
            rect.max().x(),
            rect.max().y(),
        )
    }

    /// Get the minimum `x` value of this box.
    #[inline]
    pub fn min_x(&self) -> N {
        self.min_x
    }

    /// Get the minimum `y` value of this box.
    #[inline]
    pub fn min_y(&self) -> N {
        self.min_y
    }

    /// Get the maximum `x` value of this box.
    #[inline]
    pub fn max_x(&self) -> N {
        self.max_x
    }

    /// Get the maximum `y` value of this box.
    #[inline]
    pub fn max_y(&self) -> N {
        self.max_y
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub(crate) fn is_finite(&self) -> bool {
        [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.as_f64().is_finite())
    }

    /// Grow this box so that it also covers `other`.
    pub fn expand(&mut self, other: &BoundingBox<N>) {
        if other.min_x < self.min_x {
            self.min_x = other.min_x;
        }
        if other.min_y < self.min_y {
            self.min_y = other.min_y;
        }
        if other.max_x > self.max_x {
            self.max_x = other.max_x;
        }
        if other.max_y > self.max_y {
            self.max_y = other.max_y;
        }
    }

    /// The smallest box covering both `self` and `other`.
    pub fn union(&self, other: &BoundingBox<N>) -> BoundingBox<N> {
        let mut out = *self;
        out.expand(other);
        out
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            return 0.;
        }
        self.max_x.as_f64() - self.min_x.as_f64()
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            return 0.;
        }
        self.max_y.as_f64() - self.min_y.as_f64()
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Half the perimeter. Unlike the area this still separates degenerate boxes, which is
    /// what horizontal and vertical segments produce.
    pub fn margin(&self) -> f64 {
        self.width() + self.height()
    }

    /// How much the area grows when this box is expanded to cover `other`.
    pub fn enlargement(&self, other: &BoundingBox<N>) -> f64 {
        self.union(other).area() - self.area()
    }

    /// Returns `true` if the two boxes share at least one point.
    pub fn intersects(&self, other: &BoundingBox<N>) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        !(self.max_x < other.min_x
            || self.max_y < other.min_y
            || self.min_x > other.max_x
            || self.min_y > other.max_y)
    }

    /// Returns `true` if `other` lies entirely inside this box.
    pub fn contains(&self, other: &BoundingBox<N>) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        !self.is_empty()
            && x >= self.min_x.as_f64()
            && x <= self.max_x.as_f64()
            && y >= self.min_y.as_f64()
            && y <= self.max_y.as_f64()
    }

    /// The centre point, used by the bulk-loading sorts.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x.as_f64() + self.max_x.as_f64()) / 2.,
            (self.min_y.as_f64() + self.max_y.as_f64()) / 2.,
        )
    }

    pub(crate) fn corners(&self) -> [Point; 4] {
        let (x0, y0) = (self.min_x.as_f64(), self.min_y.as_f64());
        let (x1, y1) = (self.max_x.as_f64(), self.max_y.as_f64());
        [(x0, y0), (x1, y0), (x1, y1), (x0, y1)]
    }

    /// Minimum Euclidean distance from the point `(x, y)` to this box. Zero when inside.
    pub fn distance_to_point(&self, x: f64, y: f64) -> f64 {
        if self.is_empty() {
            return f64::INFINITY;
        }
        let dx = axis_dist(x, self.min_x.as_f64(), self.max_x.as_f64());
        let dy = axis_dist(y, self.min_y.as_f64(), self.max_y.as_f64());
        dx.hypot(dy)
    }

    /// Minimum Euclidean distance between any point of this box and any point of `other`.
    /// Zero when they overlap; infinite when either is empty.
    pub fn distance_to(&self, other: &BoundingBox<N>) -> f64 {
        if self.is_empty() || other.is_empty() {
            return f64::INFINITY;
        }
        let dx = (other.min_x.as_f64() - self.max_x.as_f64())
            .max(self.min_x.as_f64() - other.max_x.as_f64())
            .max(0.);
        let dy = (other.min_y.as_f64() - self.max_y.as_f64())
            .max(self.min_y.as_f64() - other.max_y.as_f64())
            .max(0.);
        dx.hypot(dy)
    }
}

impl<N: IndexableNum> geo_traits::GeometryTrait for BoundingBox<N> {
    type T = N;
    type PointType<'a>
        = geo_traits::UnimplementedPoint<N>
    where
        Self: 'a;
    type LineStringType<'a>
        = geo_traits::UnimplementedLineString<N>
    where
        Self: 'a;
    type PolygonType<'a>
        = geo_traits::UnimplementedPolygon<N>
    where
        Self: 'a;
    type MultiPointType<'a>
        = geo_traits::UnimplementedMultiPoint<N>
    where
        Self: 'a;
    type MultiLineStringType<'a>
        = geo_traits::UnimplementedMultiLineString<N>
    where
        Self: 'a;
    type MultiPolygonType<'a>
        = geo_traits::UnimplementedMultiPolygon<N>
    where
        Self: 'a;
    type GeometryCollectionType<'a>
        = geo_traits::UnimplementedGeometryCollection<N>
    where
        Self: 'a;
    type RectType<'a>
        = BoundingBox<N>
    where
        Self: 'a;
    type TriangleType<'a>
        = geo_traits::UnimplementedTriangle<N>
    where
        Self: 'a;
    type LineType<'a>
        = geo_traits::UnimplementedLine<N>
    where
        Self: 'a;

    fn dim(&self) -> geo_traits::Dimensions {
        geo_traits::Dimensions::Xy
    }

    fn as_type(
        &self,
    ) -> geo_traits::GeometryType<
        '_,
        Self::PointType<'_>,
        Self::LineStringType<'_>,
        Self::PolygonType<'_>,
        Self::MultiPointType<'_>,
        Self::MultiLineStringType<'_>,
        Self::MultiPolygonType<'_>,
        Self::GeometryCollectionType<'_>,
        Self::RectType<'_>,
        Self::TriangleType<'_>,
        Self::LineType<'_>,
    > {
        geo_traits::GeometryType::Rect(self)
    }
}

impl<N: IndexableNum> RectTrait for BoundingBox<N> {
    type CoordType<'a>
        = Coord<N>
    where
        Self: 'a;

    fn min(&self) -> Self::CoordType<'_> {
        Coord {
            x: self.min_x,
            y: self.min_y,
        }
    }

    fn max(&self) -> Self::CoordType<'_> {
        Coord {
            x: self.max_x,
            y: self.max_y,
        }
    }
}
