use crate::math::CubicFn;
use crate::util::Interval;
use crate::{LaneKey, ObjectId, RoadKey};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// The type of a lane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LaneType {
    #[default]
    Undefined,
    Driving,
    Stop,
    Shoulder,
    Biking,
    Sidewalk,
    Border,
    Restricted,
    Parking,
    Median,
    Entry,
    Exit,
    OnRamp,
    OffRamp,
    ConnectingRamp,
}

/// A single lane within one section of a road.
#[derive(Clone, Debug)]
pub struct Lane {
    /// The lane's key.
    key: LaneKey,
    /// The road the lane belongs to.
    road: RoadKey,
    /// The lane ID within its section; negative to the right of the reference line.
    od_id: i32,
    /// The type of the lane.
    lane_type: LaneType,
    /// The range of road `s` coordinates covered by the lane.
    range: Interval<f64>,
    /// The lane width as a function of the distance from the start of the lane.
    width: CubicFn,
    /// The lanes that succeed this one in the road's reference direction.
    next: SmallVec<[LaneKey; 4]>,
    /// The lanes that precede this one in the road's reference direction.
    previous: SmallVec<[LaneKey; 4]>,
    /// The objects on the lane, ordered by the start of their overlap.
    objects: Vec<LaneAssignment>,
}

/// The attributes of a lane.
#[derive(Clone, Copy, Debug)]
pub struct LaneAttributes {
    /// The lane ID; negative to the right of the reference line, positive to the left.
    pub od_id: i32,
    /// The type of the lane.
    pub lane_type: LaneType,
    /// The lane width in m, as a function of the distance from the start of the lane.
    pub width: CubicFn,
}

/// An object's overlap with a lane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaneAssignment {
    /// The range of road `s` coordinates the object covers.
    pub s: Interval<f64>,
    /// The object.
    pub object: ObjectId,
}

impl Lane {
    /// Creates a new lane.
    pub(crate) fn new(
        key: LaneKey,
        road: RoadKey,
        range: Interval<f64>,
        attribs: &LaneAttributes,
    ) -> Self {
        Self {
            key,
            road,
            od_id: attribs.od_id,
            lane_type: attribs.lane_type,
            range,
            width: attribs.width,
            next: SmallVec::new(),
            previous: SmallVec::new(),
            objects: vec![],
        }
    }

    /// Gets the lane's key.
    pub fn key(&self) -> LaneKey {
        self.key
    }

    /// Gets the key of the road the lane belongs to.
    pub fn road(&self) -> RoadKey {
        self.road
    }

    /// Gets the lane's ID within its section.
    pub fn od_id(&self) -> i32 {
        self.od_id
    }

    /// Gets the type of the lane.
    pub fn lane_type(&self) -> LaneType {
        self.lane_type
    }

    /// The road `s` coordinate at which the lane starts.
    pub fn start_s(&self) -> f64 {
        self.range.min
    }

    /// The road `s` coordinate at which the lane ends.
    pub fn end_s(&self) -> f64 {
        self.range.max
    }

    /// The length of the lane in m.
    pub fn length(&self) -> f64 {
        self.range.length()
    }

    /// Whether the lane covers the given road `s` coordinate.
    pub fn covers(&self, s: f64) -> bool {
        self.range.contains(s)
    }

    /// The width of the lane in m at the given road `s` coordinate.
    pub fn width(&self, s: f64) -> f64 {
        self.width.y(s - self.range.min)
    }

    /// The lanes that succeed this one in the road's reference direction.
    pub fn next(&self) -> &[LaneKey] {
        &self.next
    }

    /// The lanes that precede this one in the road's reference direction.
    pub fn previous(&self) -> &[LaneKey] {
        &self.previous
    }

    /// The objects on this lane, ordered by the start of their overlap.
    pub fn objects(&self) -> &[LaneAssignment] {
        &self.objects
    }

    /// Whether a stream traversing the road in the given direction drives along this lane.
    pub(crate) fn is_in_direction(&self, in_road_direction: bool) -> bool {
        if in_road_direction {
            self.od_id < 0
        } else {
            self.od_id > 0
        }
    }

    pub(crate) fn add_next(&mut self, lane: LaneKey) {
        if !self.next.contains(&lane) {
            self.next.push(lane);
        }
    }

    pub(crate) fn add_previous(&mut self, lane: LaneKey) {
        if !self.previous.contains(&lane) {
            self.previous.push(lane);
        }
    }

    /// Inserts an object assignment, keeping the assignments ordered.
    pub(crate) fn insert_object(&mut self, assignment: LaneAssignment) {
        self.remove_object(assignment.object);
        let idx = self
            .objects
            .iter()
            .position(|other| other.s.min > assignment.s.min)
            .unwrap_or(self.objects.len());
        self.objects.insert(idx, assignment);
    }

    /// Removes the object with the given ID from the lane.
    pub(crate) fn remove_object(&mut self, object: ObjectId) {
        self.objects.retain(|other| other.object != object);
    }
}
