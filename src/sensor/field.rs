use crate::math::polygon::{self, Polygon};
use crate::math::{rotate, Point2d, Vector2d};
use std::f64::consts::PI;

/// The region a sensor can see, ignoring occlusion.
pub(crate) struct DetectionField {
    /// The world space position of the sensor.
    origin: Point2d,
    /// The maximum detection distance in m.
    range: f64,
    /// The field of view, or `None` if the sensor sees all around.
    polygon: Option<Polygon>,
}

impl DetectionField {
    /// Creates the detection field of a sensor at `origin` facing along `yaw`.
    ///
    /// Fields narrower than a half circle are approximated by a kite with a single
    /// forward apex; wider ones by a pentagon with two apices on the range line.
    pub fn new(origin: Point2d, yaw: f64, range: f64, opening_angle: f64) -> Self {
        let half = 0.5 * opening_angle;
        let local = if opening_angle < PI {
            let (sin, cos) = half.sin_cos();
            Some(vec![
                (0.0, 0.0),
                (range * cos, range * sin),
                (range / cos, 0.0),
                (range * cos, -range * sin),
            ])
        } else if opening_angle < 2.0 * PI {
            let (sin, cos) = half.sin_cos();
            let side = range * (0.25 * opening_angle).tan();
            Some(vec![
                (0.0, 0.0),
                (range * cos, range * sin),
                (range, side),
                (range, -side),
                (range * cos, -range * sin),
            ])
        } else {
            None
        };

        let polygon = local.map(|points| {
            polygon::polygon(
                points
                    .into_iter()
                    .map(|(x, y)| origin + rotate(Vector2d::new(x, y), yaw)),
            )
        });

        Self {
            origin,
            range,
            polygon,
        }
    }

    /// The field of view polygon, unless the sensor is omnidirectional.
    pub fn polygon(&self) -> Option<&Polygon> {
        self.polygon.as_ref()
    }

    /// Whether a bounding box is within range and touches the field of view.
    pub fn contains(&self, bounding_box: &Polygon) -> bool {
        polygon::distance_to(self.origin, bounding_box) <= self.range
            && self
                .polygon
                .as_ref()
                .map_or(true, |field| polygon::intersects(field, bounding_box))
    }
}
