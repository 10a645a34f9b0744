//! Polygons and the boolean operations on them.
//!
//! Points live in `cgmath` space everywhere else in the crate; this module is the
//! only place which converts them to and from `geo` geometry.

use super::Point2d;
use geo::orient::Direction;
use geo::{Area, BooleanOps, Coord, EuclideanDistance, Intersects, LineString, Orient};

/// A simple polygon without holes, closed implicitly.
pub type Polygon = geo::Polygon<f64>;

/// A set of disjoint polygons.
pub type MultiPolygon = geo::MultiPolygon<f64>;

/// Creates a polygon from its outline, which may wind either way.
/// The exterior of the result is anticlockwise.
pub fn polygon(outline: impl IntoIterator<Item = Point2d>) -> Polygon {
    let coords = outline
        .into_iter()
        .map(|p| Coord { x: p.x, y: p.y })
        .collect::<Vec<_>>();
    Polygon::new(LineString::new(coords), vec![]).orient(Direction::Default)
}

/// Wraps a single polygon into a multi-polygon.
pub fn multi(polygon: Polygon) -> MultiPolygon {
    MultiPolygon::new(vec![polygon])
}

/// The vertices of a polygon's outline, without the closing vertex.
pub fn vertices(polygon: &Polygon) -> impl Iterator<Item = Point2d> + '_ {
    let coords = polygon.exterior().0.as_slice();
    let open = match (coords.first(), coords.last()) {
        (Some(first), Some(last)) if coords.len() > 1 && first == last => &coords[..coords.len() - 1],
        _ => coords,
    };
    open.iter().map(|c| Point2d::new(c.x, c.y))
}

/// The area of a polygon.
pub fn area(polygon: &Polygon) -> f64 {
    polygon.unsigned_area()
}

/// The area of a multi-polygon.
pub fn multi_area(polygons: &MultiPolygon) -> f64 {
    polygons.unsigned_area()
}

/// Subtracts `b` from `a`.
pub fn difference(a: &MultiPolygon, b: &MultiPolygon) -> MultiPolygon {
    a.difference(b)
}

/// The part of `a` that lies within `b`.
pub fn intersection(a: &MultiPolygon, b: &MultiPolygon) -> MultiPolygon {
    a.intersection(b)
}

/// Whether two polygons share any point.
pub fn intersects(a: &Polygon, b: &Polygon) -> bool {
    a.intersects(b)
}

/// The distance from a point to the closest point of a polygon,
/// which is zero if the point is inside.
pub fn distance_to(point: Point2d, polygon: &Polygon) -> f64 {
    geo::Point::new(point.x, point.y).euclidean_distance(polygon)
}
