//! Occlusion: which parts of the detection field are hidden behind objects.
//!
//! The visible part of the field, the bright area, starts as a fan around the
//! sensor. Each object casts a shadow away from the sensor, which is cut out of
//! the bright area. An object's visibility is then the share of its bounding
//! box that remains inside the bright area.

use crate::debug::debug_polygon;
use crate::math::polygon::{self, MultiPolygon, Polygon};
use crate::math::{heading_vector, Point2d, Vector2d};
use cgmath::prelude::*;
use std::f64::consts::PI;

/// Objects with a smaller visible share than this are not visible at all.
pub const MIN_VISIBLE: f64 = 0.0001;

/// Shadow scale factors above this indicate numerically unstable geometry.
pub const WARNING_THRESHOLD_SCALE: f64 = 1e6;

/// The angular step of the bright area's outer arc in rad.
const ARC_STEP: f64 = 0.1;

/// The part of a sensor's field of view which is not in shadow.
pub(crate) struct BrightArea {
    /// The world space position of the sensor.
    origin: Point2d,
    /// The maximum detection distance in m.
    range: f64,
    /// The area not yet in shadow.
    area: MultiPolygon,
}

impl BrightArea {
    /// Creates the bright area of an unobstructed sensor at `origin` facing along `yaw`.
    pub fn new(origin: Point2d, yaw: f64, range: f64, opening_angle: f64) -> Self {
        let arc_point = |angle: f64| origin + range * heading_vector(angle);

        let outline = if opening_angle >= 2.0 * PI {
            let steps = (2.0 * PI / ARC_STEP).ceil() as usize;
            (0..steps)
                .map(|i| arc_point(yaw + 2.0 * PI * i as f64 / steps as f64))
                .collect::<Vec<_>>()
        } else {
            let max_angle = yaw + 0.5 * opening_angle;
            let mut outline = vec![origin];
            let mut angle = yaw - 0.5 * opening_angle;
            while angle < max_angle {
                outline.push(arc_point(angle));
                angle += ARC_STEP;
            }
            outline.push(arc_point(max_angle));
            outline
        };

        Self {
            origin,
            range,
            area: polygon::multi(polygon::polygon(outline)),
        }
    }

    /// The area not yet in shadow.
    pub fn area(&self) -> &MultiPolygon {
        &self.area
    }

    /// Removes the shadow cast by an object from the bright area.
    pub fn cast_shadow(&mut self, bounding_box: &Polygon) {
        if let Some(shadow) = object_shadow(bounding_box, self.origin, self.range) {
            for part in &shadow {
                debug_polygon("shadow", part);
            }
            self.area = polygon::difference(&self.area, &shadow);
        }
    }

    /// The share of a bounding box, in `[0, 1]`, which lies in the bright area.
    pub fn visible_fraction(&self, bounding_box: &Polygon) -> f64 {
        let total = polygon::area(bounding_box);
        if total <= 0.0 {
            return 0.0;
        }
        let visible = polygon::intersection(&polygon::multi(bounding_box.clone()), &self.area);
        polygon::multi_area(&visible) / total
    }
}

/// The shadow an object casts away from a sensor at `origin`,
/// reaching at least `range` from the sensor and excluding the object itself.
///
/// Returns `None` if the geometry is too degenerate to cast a shadow,
/// such as when the sensor lies inside the object.
pub fn object_shadow(bounding_box: &Polygon, origin: Point2d, range: f64) -> Option<MultiPolygon> {
    let mut points = polygon::vertices(bounding_box);
    let reference = points.next()? - origin;

    // The silhouette: the vertices furthest to either side of the reference ray
    let (mut left, mut left_angle) = (reference, 0.0);
    let (mut right, mut right_angle) = (reference, 0.0);
    for point in polygon::vertices(bounding_box) {
        let vec = point - origin;
        let cos = reference.dot(vec) / (reference.magnitude() * vec.magnitude());
        let angle = cos.clamp(-1.0, 1.0).acos();
        if reference.perp_dot(vec) > 0.0 {
            if angle > left_angle {
                (left, left_angle) = (vec, angle);
            }
        } else if angle > right_angle {
            (right, right_angle) = (vec, angle);
        }
    }

    // Extend the silhouette so the shadow covers the rest of the detection range
    let height = left.magnitude().min(right.magnitude()) * (0.5 * (left_angle + right_angle)).cos();
    let scale = range / height;
    if !scale.is_finite() || scale <= 0.0 {
        log::warn!("Cannot cast shadow: object surrounds the sensor or is edge on");
        return None;
    }
    if scale > WARNING_THRESHOLD_SCALE {
        log::warn!(
            "Shadow scale factor {:.3e} exceeds threshold: numeric issues could cause detection to fail",
            scale
        );
    }

    let outline: [Vector2d; 4] = [left, left * scale, right * scale, right];
    let shadow = polygon::polygon(outline.map(|vec| origin + vec));
    Some(polygon::difference(
        &polygon::multi(shadow),
        &polygon::multi(bounding_box.clone()),
    ))
}
