//! Distance functions for proximity searches.
//!
//! A search ranks entries with a [`DistanceFunction`]: any plain closure
//! `Fn(&Geometry<N>, &Geometry<N>) -> f64` works, fallible closures can be wrapped in
//! [`TryDistanceFn`], and [`EuclideanDistance`] is provided for the common case.

use crate::error::BoxError;
use crate::geometry::{BoundingBox, Geometry};
use crate::r#type::IndexableNum;

/// A distance between a query geometry and the geometries stored in a tree.
///
/// The search prunes whole nodes using [`distance_to_box`](DistanceFunction::distance_to_box),
/// so that bound must never exceed [`distance`](DistanceFunction::distance) to any geometry
/// inside the box. The default bound is the Euclidean distance to the box, which is valid for
/// Euclidean distance and anything that never measures shorter than it. Metrics that can
/// measure shorter must override it, or results are unspecified.
///
/// Distances must be non-negative and not NaN. Anything else ends the search with
/// [`SegmentIndexError::DistanceFunction`](crate::SegmentIndexError::DistanceFunction).
pub trait DistanceFunction<N: IndexableNum> {
    /// Distance between the query and a stored geometry.
    fn distance(&self, query: &Geometry<N>, item: &Geometry<N>) -> Result<f64, BoxError>;

    /// A lower bound on [`distance`](DistanceFunction::distance) from the query to anything
    /// contained in `bbox`.
    #[inline]
    fn distance_to_box(&self, query: &Geometry<N>, bbox: &BoundingBox<N>) -> f64 {
        query.distance_to_box(bbox)
    }
}

impl<N, F> DistanceFunction<N> for F
where
    N: IndexableNum,
    F: Fn(&Geometry<N>, &Geometry<N>) -> f64,
{
    #[inline]
    fn distance(&self, query: &Geometry<N>, item: &Geometry<N>) -> Result<f64, BoxError> {
        Ok(self(query, item))
    }
}

/// Pin a closure's argument types so that it is inferred as a [`DistanceFunction`].
///
/// ```
/// use segment_rtree::geometry::Geometry;
/// use segment_rtree::rtree::distance_fn;
///
/// let doubled = distance_fn(|a: &Geometry<f64>, b: &Geometry<f64>| 2. * a.distance(b));
/// ```
pub fn distance_fn<N, F>(f: F) -> F
where
    N: IndexableNum,
    F: Fn(&Geometry<N>, &Geometry<N>) -> f64,
{
    f
}

/// Adapts a fallible closure into a [`DistanceFunction`].
///
/// An `Err` from the closure is surfaced by the search as
/// [`SegmentIndexError::DistanceFunction`](crate::SegmentIndexError::DistanceFunction).
#[derive(Debug, Clone, Copy)]
pub struct TryDistanceFn<F>(pub F);

impl<F> TryDistanceFn<F> {
    pub fn new<N, E>(f: F) -> Self
    where
        N: IndexableNum,
        F: Fn(&Geometry<N>, &Geometry<N>) -> Result<f64, E>,
        E: Into<BoxError>,
    {
        Self(f)
    }
}

impl<N, F, E> DistanceFunction<N> for TryDistanceFn<F>
where
    N: IndexableNum,
    F: Fn(&Geometry<N>, &Geometry<N>) -> Result<f64, E>,
    E: Into<BoxError>,
{
    #[inline]
    fn distance(&self, query: &Geometry<N>, item: &Geometry<N>) -> Result<f64, BoxError> {
        (self.0)(query, item).map_err(Into::into)
    }
}

/// Euclidean distance metric.
///
/// This is the standard straight-line distance calculation suitable for
/// planar coordinate systems. When working with longitude/latitude coordinates,
/// the unit of distance will be degrees.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanDistance;

impl<N: IndexableNum> DistanceFunction<N> for EuclideanDistance {
    #[inline]
    fn distance(&self, query: &Geometry<N>, item: &Geometry<N>) -> Result<f64, BoxError> {
        Ok(query.distance(item))
    }
}

/// Euclidean distance computed by the [`geo`](geo_0_31) crate.
///
/// Gives the same results as [`EuclideanDistance`] up to floating point error.
#[cfg(feature = "use-geo_0_31")]
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoEuclideanDistance;

#[cfg(feature = "use-geo_0_31")]
impl<N: IndexableNum> DistanceFunction<N> for GeoEuclideanDistance {
    fn distance(&self, query: &Geometry<N>, item: &Geometry<N>) -> Result<f64, BoxError> {
        use geo_0_31::algorithm::{Distance, Euclidean};

        Ok(Euclidean.distance(&to_geo(query), &to_geo(item)))
    }
}

#[cfg(feature = "use-geo_0_31")]
fn to_geo<N: IndexableNum>(geometry: &Geometry<N>) -> geo_0_31::Geometry<f64> {
    use geo_0_31::coord;

    match geometry {
        Geometry::Rect(rect) => geo_0_31::Geometry::Rect(geo_0_31::Rect::new(
            coord! { x: rect.min_x().as_f64(), y: rect.min_y().as_f64() },
            coord! { x: rect.max_x().as_f64(), y: rect.max_y().as_f64() },
        )),
        Geometry::Line(line) => {
            let (x1, y1) = line.start();
            let (x2, y2) = line.end();
            geo_0_31::Geometry::Line(geo_0_31::Line::new(
                coord! { x: x1.as_f64(), y: y1.as_f64() },
                coord! { x: x2.as_f64(), y: y2.as_f64() },
            ))
        }
    }
}
