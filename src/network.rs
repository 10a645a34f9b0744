use crate::math::Point2d;
use crate::object::{ObjectAttributes, WorldObject};
use crate::position::GlobalRoadPosition;
use crate::sensor::SensorView;
use crate::stream::{RoadStream, RoadStreamElement};
use crate::util::Interval;
use crate::{LaneKey, ObjectId, RoadKey};
use itertools::Itertools;
pub use lane::{Lane, LaneAssignment, LaneAttributes, LaneType};
pub use road::{Road, RoadAttributes, Section};
use slotmap::SlotMap;
use std::collections::HashSet;

mod lane;
mod road;

/// A road network along with the objects placed on it.
///
/// The network is built once per scenario and is read-only while streams
/// and sensor views borrow from it.
#[derive(Default)]
pub struct RoadNetwork {
    /// The roads in the network.
    roads: SlotMap<RoadKey, Road>,
    /// The lanes of all the roads.
    lanes: SlotMap<LaneKey, Lane>,
    /// The vehicles, pedestrians and scenery.
    objects: SlotMap<ObjectId, WorldObject>,
}

/// One road of a route, and the direction it is driven in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteElement {
    /// The road.
    pub road: RoadKey,
    /// Whether the road is driven in its reference (increasing `s`) direction.
    pub in_od_direction: bool,
}

impl RoadNetwork {
    /// Creates an empty road network.
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds a road to the network.
    pub fn add_road(&mut self, attributes: &RoadAttributes) -> RoadKey {
        self.roads.insert_with_key(|key| Road::new(key, attributes))
    }

    /// Appends a section covering the given range of `s` to a road,
    /// returning the index of the section.
    ///
    /// Sections must be added in order of increasing `s`.
    pub fn add_section(&mut self, road: RoadKey, range: Interval<f64>) -> usize {
        self.roads[road].add_section(range)
    }

    /// Adds a lane to a section of a road.
    ///
    /// Lanes should be added to a section ordered outwards from the reference line.
    pub fn add_lane(&mut self, road: RoadKey, section: usize, attributes: &LaneAttributes) -> LaneKey {
        let range = self.roads[road].sections()[section].range();
        let lane = self
            .lanes
            .insert_with_key(|key| Lane::new(key, road, range, attributes));
        self.roads[road].section_mut(section).add_lane(lane);
        lane
    }

    /// Specifies that the end of the `from` lane connects to the start of the `to` lane,
    /// where start and end refer to each road's reference direction.
    pub fn add_lane_connection(&mut self, from: LaneKey, to: LaneKey) {
        self.lanes[from].add_next(to);
        self.lanes[to].add_previous(from);
    }

    /// Adds an object to the world.
    pub fn add_object(&mut self, attributes: &ObjectAttributes) -> ObjectId {
        self.objects
            .insert_with_key(|id| WorldObject::new(id, attributes))
    }

    /// Removes an object from the world and from every lane it was assigned to.
    pub fn remove_object(&mut self, id: ObjectId) {
        if self.objects.remove(id).is_some() {
            for lane in self.lanes.values_mut() {
                lane.remove_object(id);
            }
        }
    }

    /// Moves an object.
    pub fn set_object_pose(&mut self, id: ObjectId, position: Point2d, yaw: f64) {
        self.objects[id].set_pose(position, yaw);
    }

    /// Records that an object covers the given range of road `s` coordinates on a lane.
    pub fn assign_object_to_lane(&mut self, object: ObjectId, lane: LaneKey, s: Interval<f64>) {
        assert!(self.objects.contains_key(object), "Unknown object");
        self.lanes[lane].insert_object(LaneAssignment {
            s: Interval::spanning(s.min, s.max),
            object,
        });
    }

    /// Records the road position of an object's reference point,
    /// replacing any earlier position on the same road.
    pub fn set_object_road_position(&mut self, object: ObjectId, position: GlobalRoadPosition) {
        self.objects[object].set_road_position(position);
    }

    /// Gets a reference to the road with the given key.
    pub fn get_road(&self, key: RoadKey) -> &Road {
        &self.roads[key]
    }

    /// Gets a reference to the lane with the given key.
    pub fn get_lane(&self, key: LaneKey) -> &Lane {
        &self.lanes[key]
    }

    /// Gets a reference to the object with the given ID.
    pub fn get_object(&self, id: ObjectId) -> &WorldObject {
        &self.objects[id]
    }

    /// Returns an iterator over all the objects in the world.
    pub fn iter_objects(&self) -> impl Iterator<Item = &WorldObject> {
        self.objects.values()
    }

    /// The lane of a section with the given lane ID.
    pub fn lane_in_section<'a>(&'a self, section: &Section, od_id: i32) -> Option<&'a Lane> {
        section
            .lanes()
            .iter()
            .map(|key| &self.lanes[*key])
            .find(|lane| lane.od_id() == od_id)
    }

    /// The objects overlapping a lane, in the order they are encountered
    /// when driving the lane in the given direction.
    pub fn objects_on_lane(&self, lane: LaneKey, in_stream_direction: bool) -> Vec<LaneAssignment> {
        let mut objects = self.lanes[lane].objects().to_vec();
        if !in_stream_direction {
            Self::reverse_order(&mut objects);
        }
        objects
    }

    /// The objects overlapping any lane of a road, in the order they are encountered
    /// when driving the road in the given direction.
    pub fn objects_on_road(&self, road: RoadKey, in_stream_direction: bool) -> Vec<LaneAssignment> {
        let mut objects = self.roads[road]
            .sections()
            .iter()
            .flat_map(|section| section.lanes())
            .flat_map(|lane| self.lanes[*lane].objects())
            .copied()
            .sorted_by(|a, b| a.s.min.total_cmp(&b.s.min))
            .collect::<Vec<_>>();
        if !in_stream_direction {
            Self::reverse_order(&mut objects);
        }
        objects
    }

    /// Creates a stream along the roads of a route.
    ///
    /// A road may only appear once in a stream, so the route is truncated
    /// before the first road it repeats.
    pub fn road_stream(&self, route: &[RouteElement]) -> RoadStream<'_> {
        let mut seen = HashSet::new();
        let mut current_s = 0.0;
        let elements = route
            .iter()
            .take_while(|element| {
                let first = seen.insert(element.road);
                if !first {
                    log::warn!(
                        "Road {} appears more than once in route, truncating route",
                        self.roads[element.road].id()
                    );
                }
                first
            })
            .map(|element| {
                let road = &self.roads[element.road];
                let s_offset = if element.in_od_direction {
                    current_s
                } else {
                    current_s + road.length()
                };
                current_s += road.length();
                RoadStreamElement::new(road, s_offset, element.in_od_direction)
            })
            .collect();
        RoadStream::new(self, elements)
    }

    /// Takes a snapshot of every object in the world, as seen by a sensor on the `host`.
    pub fn sensor_view(&self, host: ObjectId) -> SensorView<'_> {
        SensorView {
            host_id: host,
            objects: self.iter_objects().collect(),
        }
    }

    /// Orders assignments as encountered when driving against the reference direction.
    fn reverse_order(objects: &mut [LaneAssignment]) {
        objects.sort_by(|a, b| b.s.max.total_cmp(&a.s.max));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::CubicFn;
    use crate::object::ObjectKind;

    fn lane(od_id: i32) -> LaneAttributes {
        LaneAttributes {
            od_id,
            lane_type: LaneType::Driving,
            width: CubicFn::constant(3.5),
        }
    }

    #[test]
    fn objects_are_ordered_by_direction() {
        let mut network = RoadNetwork::new();
        let road = network.add_road(&RoadAttributes {
            id: "R",
            length: 100.0,
        });
        let section = network.add_section(road, Interval::new(0.0, 100.0));
        let lane_key = network.add_lane(road, section, &lane(-1));
        let objects = [(50.0, 55.0), (10.0, 30.0), (20.0, 25.0)].map(|(min, max)| {
            let id = network.add_object(&ObjectAttributes {
                kind: ObjectKind::Moving,
                ..Default::default()
            });
            network.assign_object_to_lane(id, lane_key, Interval::new(min, max));
            id
        });

        let forward = network.objects_on_lane(lane_key, true);
        let forward = forward.iter().map(|a| a.object).collect::<Vec<_>>();
        assert_eq!(forward, vec![objects[1], objects[2], objects[0]]);

        let backward = network.objects_on_lane(lane_key, false);
        let backward = backward.iter().map(|a| a.object).collect::<Vec<_>>();
        assert_eq!(backward, vec![objects[0], objects[1], objects[2]]);

        network.remove_object(objects[1]);
        assert_eq!(network.objects_on_road(road, true).len(), 2);
    }

    #[test]
    fn streams_stop_before_repeated_roads() {
        let mut network = RoadNetwork::new();
        let a = network.add_road(&RoadAttributes { id: "A", length: 30.0 });
        let b = network.add_road(&RoadAttributes { id: "B", length: 20.0 });
        let c = network.add_road(&RoadAttributes { id: "C", length: 40.0 });
        let route = [
            RouteElement { road: a, in_od_direction: true },
            RouteElement { road: b, in_od_direction: false },
            RouteElement { road: a, in_od_direction: true },
            RouteElement { road: c, in_od_direction: true },
        ];
        let stream = network.road_stream(&route);
        let roads = stream.elements().iter().map(|e| e.segment.key()).collect::<Vec<_>>();
        assert_eq!(roads, vec![a, b]);
        assert_eq!(stream.length(), 50.0);

        // Roads after the repeat are never joined onto the stream
        let stream = network.road_stream(&route[1..]);
        assert_eq!(stream.elements().len(), 3);
        assert_eq!(stream.length(), 90.0);
    }
}
