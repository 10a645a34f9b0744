use crate::math::{polygon, rotate, Point2d, Polygon, Vector2d};
use crate::position::GlobalRoadPosition;
use crate::ObjectId;
use cgmath::Zero;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// The kind of a world object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ObjectKind {
    /// A traffic participant, such as a vehicle or pedestrian.
    Moving,
    /// Scenery, such as a parked car, barrier or building.
    Stationary,
}

/// A vehicle, pedestrian or piece of scenery in the world.
#[derive(Clone, Debug)]
pub struct WorldObject {
    /// The object ID.
    id: ObjectId,
    /// Whether the object moves.
    kind: ObjectKind,
    /// The world space coordinates of the centre of the bounding box.
    position: Point2d,
    /// The heading of the object in rad.
    yaw: f64,
    /// The rate of change of `yaw` in rad/s.
    yaw_rate: f64,
    /// The length of the bounding box in m.
    length: f64,
    /// The width of the bounding box in m.
    width: f64,
    /// The world space velocity in m/s.
    velocity: Vector2d,
    /// The world space acceleration in m/s^2.
    acceleration: Vector2d,
    /// The road positions of the object's reference point, one per road it touches.
    road_positions: SmallVec<[GlobalRoadPosition; 2]>,
}

/// The attributes of a world object.
#[derive(Clone, Copy, Debug)]
pub struct ObjectAttributes {
    pub kind: ObjectKind,
    /// The world space coordinates of the centre of the bounding box.
    pub position: Point2d,
    /// The heading in rad.
    pub yaw: f64,
    /// The rate of change of heading in rad/s.
    pub yaw_rate: f64,
    /// The length of the bounding box in m.
    pub length: f64,
    /// The width of the bounding box in m.
    pub width: f64,
    /// The world space velocity in m/s.
    pub velocity: Vector2d,
    /// The world space acceleration in m/s^2.
    pub acceleration: Vector2d,
}

impl Default for ObjectAttributes {
    fn default() -> Self {
        Self {
            kind: ObjectKind::Stationary,
            position: Point2d::new(0.0, 0.0),
            yaw: 0.0,
            yaw_rate: 0.0,
            length: 1.0,
            width: 1.0,
            velocity: Vector2d::zero(),
            acceleration: Vector2d::zero(),
        }
    }
}

impl WorldObject {
    /// Creates a new world object.
    pub(crate) fn new(id: ObjectId, attribs: &ObjectAttributes) -> Self {
        Self {
            id,
            kind: attribs.kind,
            position: attribs.position,
            yaw: attribs.yaw,
            yaw_rate: attribs.yaw_rate,
            length: attribs.length,
            width: attribs.width,
            velocity: attribs.velocity,
            acceleration: attribs.acceleration,
            road_positions: SmallVec::new(),
        }
    }

    /// Gets the object's ID.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Gets the kind of object.
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Whether the object is a traffic participant.
    pub fn is_moving(&self) -> bool {
        self.kind == ObjectKind::Moving
    }

    /// The world space coordinates of the centre of the object.
    pub fn position(&self) -> Point2d {
        self.position
    }

    /// The heading of the object in rad.
    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    /// The yaw rate in rad/s.
    pub fn yaw_rate(&self) -> f64 {
        self.yaw_rate
    }

    /// The object's length in m.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// The object's width in m.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// The world space velocity in m/s.
    pub fn velocity(&self) -> Vector2d {
        self.velocity
    }

    /// The world space acceleration in m/s^2.
    pub fn acceleration(&self) -> Vector2d {
        self.acceleration
    }

    /// The road positions of the object's reference point.
    pub fn road_positions(&self) -> &[GlobalRoadPosition] {
        &self.road_positions
    }

    /// The corners of the bounding box in world space, in anticlockwise order.
    pub fn corners(&self) -> [Point2d; 4] {
        let (hl, hw) = (0.5 * self.length, 0.5 * self.width);
        [(-hl, -hw), (hl, -hw), (hl, hw), (-hl, hw)]
            .map(|(x, y)| self.position + rotate(Vector2d::new(x, y), self.yaw))
    }

    /// The bounding box of the object in world space.
    pub fn bounding_box(&self) -> Polygon {
        polygon::polygon(self.corners())
    }

    pub(crate) fn set_pose(&mut self, position: Point2d, yaw: f64) {
        self.position = position;
        self.yaw = yaw;
    }

    pub(crate) fn set_road_position(&mut self, road_position: GlobalRoadPosition) {
        self.road_positions
            .retain(|pos| pos.road_id != road_position.road_id);
        self.road_positions.push(road_position);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::polygon::area;
    use assert_approx_eq::assert_approx_eq;
    use slotmap::KeyData;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn bounding_box_is_rotated() {
        let object = WorldObject::new(
            ObjectId::from(KeyData::from_ffi(1)),
            &ObjectAttributes {
                position: Point2d::new(10.0, 5.0),
                yaw: FRAC_PI_2,
                length: 4.0,
                width: 2.0,
                ..Default::default()
            },
        );
        let corners = object.corners();
        assert_approx_eq!(corners[0].x, 11.0);
        assert_approx_eq!(corners[0].y, 3.0);
        assert_approx_eq!(corners[2].x, 9.0);
        assert_approx_eq!(corners[2].y, 7.0);
        assert_approx_eq!(area(&object.bounding_box()), 8.0);
    }
}
