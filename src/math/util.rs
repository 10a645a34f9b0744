use super::{Point2d, Vector2d};
use cgmath::prelude::*;
use std::f64::consts::PI;

/// Projects a point onto a local coordinate system.
///
/// # Parameters
/// * `point` - The point to project
/// * `origin` - The origin of the coordinate system
/// * `x_axis` - The basis vector pointing in the positive x-axis.
/// * `y_axis` - The basis vector pointing in the positive y-axis.
pub fn project_local(
    point: Point2d,
    origin: Point2d,
    x_axis: Vector2d,
    y_axis: Vector2d,
) -> Point2d {
    let point = point - origin;
    Point2d::new(point.dot(x_axis), point.dot(y_axis))
}

/// Rotates a vector 90 degrees anticlockwise.
pub fn rot90(vec: Vector2d) -> Vector2d {
    Vector2d::new(-vec.y, vec.x)
}

/// The unit vector pointing along the given heading in radians.
pub fn heading_vector(angle: f64) -> Vector2d {
    let (sin, cos) = angle.sin_cos();
    Vector2d::new(cos, sin)
}

/// Rotates a vector anticlockwise by `angle` radians.
pub fn rotate(vec: Vector2d, angle: f64) -> Vector2d {
    let x_axis = heading_vector(angle);
    x_axis * vec.x + rot90(x_axis) * vec.y
}

/// Expresses a world space vector in a frame rotated anticlockwise by `angle` radians.
pub fn to_local_frame(vec: Vector2d, angle: f64) -> Vector2d {
    let x_axis = heading_vector(angle);
    Vector2d::new(vec.dot(x_axis), vec.dot(rot90(x_axis)))
}

/// Wraps an angle into the range [-π, π].
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped == -PI && angle > 0.0 {
        PI
    } else {
        wrapped
    }
}
