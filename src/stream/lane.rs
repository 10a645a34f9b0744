use super::{objects_in_range, LaneStreamElement};
use crate::network::{LaneType, RoadNetwork};
use crate::object::WorldObject;
use crate::position::{GlobalRoadPosition, StreamPosition};
use crate::ObjectId;

/// A connected sequence of lanes, possibly spanning several roads.
#[derive(Clone)]
pub struct LaneStream<'a> {
    /// The network the lanes belong to.
    network: &'a RoadNetwork,
    /// The lanes, in stream order.
    elements: Vec<LaneStreamElement<'a>>,
}

impl<'a> LaneStream<'a> {
    /// Creates a lane stream from contiguous elements.
    pub fn new(network: &'a RoadNetwork, elements: Vec<LaneStreamElement<'a>>) -> Self {
        Self { network, elements }
    }

    /// The lanes of the stream, in stream order.
    pub fn elements(&self) -> &[LaneStreamElement<'a>] {
        &self.elements
    }

    /// The length of the stream in m, which is zero for an empty stream.
    pub fn length(&self) -> f64 {
        self.elements.last().map(|e| e.end_s()).unwrap_or(0.0)
    }

    /// Converts a road position into a stream position.
    ///
    /// Returns [StreamPosition::NOT_ON_STREAM] if the position is not on a lane of the stream.
    pub fn stream_position(&self, position: &GlobalRoadPosition) -> StreamPosition {
        self.elements
            .iter()
            .find(|element| {
                let lane = element.segment;
                lane.od_id() == position.lane_id
                    && lane.covers(position.s)
                    && self.network.get_road(lane.road()).id() == position.road_id
            })
            .map(|element| StreamPosition {
                s: element.stream_position(position.s - element.segment.start_s()),
                t: position.t * element.direction_sign(),
                hdg: element.flip_heading(position.hdg),
            })
            .unwrap_or(StreamPosition::NOT_ON_STREAM)
    }

    /// Converts a stream position into a road position.
    ///
    /// At the boundary between two lanes the earlier lane in the stream is used.
    /// Returns a position with an empty road ID if `s` lies beyond the stream.
    pub fn road_position(&self, position: &StreamPosition) -> GlobalRoadPosition {
        self.elements
            .iter()
            .find(|element| element.covers(position.s))
            .map(|element| {
                let lane = element.segment;
                GlobalRoadPosition {
                    road_id: self.network.get_road(lane.road()).id().to_owned(),
                    lane_id: lane.od_id(),
                    s: lane.start_s() + element.element_position(position.s),
                    t: position.t * element.direction_sign(),
                    hdg: element.flip_heading(position.hdg),
                }
            })
            .unwrap_or_default()
    }

    /// The agents overlapping the range between `start` and `end`; `t` is ignored.
    pub fn agents_in_range(&self, start: &StreamPosition, end: &StreamPosition) -> Vec<&'a WorldObject> {
        objects_in_range(self.network, &self.elements, start.s, end.s, WorldObject::is_moving)
    }

    /// The objects of any kind overlapping the range between `start` and `end`; `t` is ignored.
    pub fn objects_in_range(&self, start: &StreamPosition, end: &StreamPosition) -> Vec<&'a WorldObject> {
        objects_in_range(self.network, &self.elements, start.s, end.s, |_| true)
    }

    /// The stream position of an object's reference point,
    /// if it lies on one of the lanes of the stream.
    pub fn object_position(&self, object: ObjectId) -> Option<StreamPosition> {
        let object = self.network.get_object(object);
        self.elements.iter().find_map(|element| {
            let lane = element.segment;
            let road_id = self.network.get_road(lane.road()).id();
            object
                .road_positions()
                .iter()
                .find(|pos| pos.road_id == road_id && pos.lane_id == lane.od_id() && lane.covers(pos.s))
                .map(|pos| StreamPosition {
                    s: element.stream_position(pos.s - lane.start_s()),
                    t: pos.t * element.direction_sign(),
                    hdg: element.flip_heading(pos.hdg),
                })
        })
    }

    /// Lists where the lane type changes along the stream, as `(start s, lane type)` pairs.
    /// Each type applies until the start of the next pair.
    pub fn lane_types(&self) -> Vec<(f64, LaneType)> {
        let mut last = None;
        let mut lane_types = vec![];
        for element in &self.elements {
            let lane_type = element.segment.lane_type();
            if last != Some(lane_type) {
                lane_types.push((element.start_s(), lane_type));
                last = Some(lane_type);
            }
        }
        lane_types
    }
}
