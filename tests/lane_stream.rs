//! Tests of queries along lane streams.

use assert_approx_eq::assert_approx_eq;
use std::f64::consts::PI;
use traffic_perception::math::CubicFn;
use traffic_perception::{
    GlobalRoadPosition, Interval, LaneAttributes, LaneKey, LaneType, ObjectAttributes, ObjectId,
    ObjectKind, RoadAttributes, RoadKey, RoadNetwork, RouteElement, StreamPosition, WorldObject,
};

fn add_road(network: &mut RoadNetwork, id: &str, length: f64) -> (RoadKey, usize) {
    let road = network.add_road(&RoadAttributes { id, length });
    let section = network.add_section(road, Interval::new(0.0, length));
    (road, section)
}

fn add_lane(network: &mut RoadNetwork, road: RoadKey, section: usize, od_id: i32, lane_type: LaneType) -> LaneKey {
    network.add_lane(
        road,
        section,
        &LaneAttributes {
            od_id,
            lane_type,
            width: CubicFn::constant(3.5),
        },
    )
}

fn add_object(network: &mut RoadNetwork, kind: ObjectKind, lanes: &[(LaneKey, f64, f64)]) -> ObjectId {
    let id = network.add_object(&ObjectAttributes {
        kind,
        ..Default::default()
    });
    for &(lane, min, max) in lanes {
        network.assign_object_to_lane(id, lane, Interval::new(min, max));
    }
    id
}

fn ids(objects: &[&WorldObject]) -> Vec<ObjectId> {
    objects.iter().map(|obj| obj.id()).collect()
}

#[test]
fn agents_in_range_in_stream_direction() {
    let mut network = RoadNetwork::new();
    let road = network.add_road(&RoadAttributes {
        id: "Road",
        length: 210.0,
    });
    let section1 = network.add_section(road, Interval::new(0.0, 90.0));
    let section2 = network.add_section(road, Interval::new(90.0, 210.0));
    let lane1 = add_lane(&mut network, road, section1, -1, LaneType::Driving);
    let lane2 = add_lane(&mut network, road, section2, -1, LaneType::Driving);
    network.add_lane_connection(lane1, lane2);

    let _agent1 = add_object(&mut network, ObjectKind::Moving, &[(lane1, 10.0, 15.0)]);
    let agent2 = add_object(
        &mut network,
        ObjectKind::Moving,
        &[(lane1, 40.0, 45.0), (lane2, 100.0, 105.0)],
    );
    let parked = add_object(&mut network, ObjectKind::Stationary, &[(lane1, 60.0, 65.0)]);
    let agent3 = add_object(&mut network, ObjectKind::Moving, &[(lane2, 130.0, 135.0)]);
    let _agent4 = add_object(&mut network, ObjectKind::Moving, &[(lane2, 150.0, 155.0)]);

    let stream = network.road_stream(&[RouteElement {
        road,
        in_od_direction: true,
    }]);
    let lane_stream = stream.lane_stream(&StreamPosition::new(0.0, 0.0), -1);
    assert_eq!(lane_stream.elements().len(), 2);

    let (start, end) = (StreamPosition::new(20.0, 0.0), StreamPosition::new(140.0, 0.0));
    let agents = lane_stream.agents_in_range(&start, &end);
    assert_eq!(ids(&agents), vec![agent2, agent3]);

    let objects = lane_stream.objects_in_range(&start, &end);
    assert_eq!(ids(&objects), vec![agent2, parked, agent3]);
}

#[test]
fn agents_in_range_against_stream_direction() {
    let mut network = RoadNetwork::new();
    let (road_a, section_a) = add_road(&mut network, "RoadA", 90.0);
    let (road_b, section_b) = add_road(&mut network, "RoadB", 120.0);
    let lane_a = add_lane(&mut network, road_a, section_a, 1, LaneType::Driving);
    let lane_b = add_lane(&mut network, road_b, section_b, 1, LaneType::Driving);
    network.add_lane_connection(lane_b, lane_a);

    let _agent1 = add_object(&mut network, ObjectKind::Moving, &[(lane_a, 80.0, 85.0)]);
    add_object(&mut network, ObjectKind::Stationary, &[(lane_a, 60.0, 65.0)]);
    let agent2 = add_object(
        &mut network,
        ObjectKind::Moving,
        &[(lane_a, 10.0, 15.0), (lane_b, 80.0, 85.0)],
    );
    let agent3 = add_object(&mut network, ObjectKind::Moving, &[(lane_b, 40.0, 45.0)]);
    let _agent4 = add_object(&mut network, ObjectKind::Moving, &[(lane_b, 10.0, 15.0)]);

    let stream = network.road_stream(&[
        RouteElement {
            road: road_a,
            in_od_direction: false,
        },
        RouteElement {
            road: road_b,
            in_od_direction: false,
        },
    ]);
    let lane_stream = stream.lane_stream(&StreamPosition::new(0.0, 0.0), 1);
    let elements = lane_stream.elements();
    assert_eq!(elements.len(), 2);
    assert_approx_eq!(elements[0].s_offset, 90.0);
    assert_approx_eq!(elements[1].s_offset, 210.0);

    let agents = lane_stream.agents_in_range(&StreamPosition::new(20.0, 0.0), &StreamPosition::new(190.0, 0.0));
    assert_eq!(ids(&agents), vec![agent2, agent3]);
}

#[test]
fn empty_lane_stream_has_no_agents() {
    let mut network = RoadNetwork::new();
    let (road, section) = add_road(&mut network, "Road", 100.0);
    let lane = add_lane(&mut network, road, section, -1, LaneType::Driving);
    add_object(&mut network, ObjectKind::Moving, &[(lane, 10.0, 15.0)]);

    let stream = network.road_stream(&[RouteElement {
        road,
        in_od_direction: true,
    }]);
    let lane_stream = stream.lane_stream(&StreamPosition::new(0.0, 0.0), -3);
    assert!(lane_stream.elements().is_empty());
    assert!(lane_stream
        .agents_in_range(&StreamPosition::new(0.0, 0.0), &StreamPosition::new(100.0, 0.0))
        .is_empty());
    assert!(lane_stream.lane_types().is_empty());
}

/// Three roads joined by lane -2, with the middle road driven backwards.
struct ThreeRoads {
    network: RoadNetwork,
    roads: [RoadKey; 3],
    lanes: [LaneKey; 3],
}

fn three_roads(last_lane_type: LaneType) -> ThreeRoads {
    let mut network = RoadNetwork::new();
    let (road_a, section_a) = add_road(&mut network, "RoadA", 90.0);
    let (road_b, section_b) = add_road(&mut network, "RoadB", 120.0);
    let (road_c, section_c) = add_road(&mut network, "RoadC", 210.0);

    add_lane(&mut network, road_a, section_a, -1, LaneType::Driving);
    let lane_a = add_lane(&mut network, road_a, section_a, -2, LaneType::Driving);
    add_lane(&mut network, road_b, section_b, -1, LaneType::Driving);
    let lane_b = add_lane(&mut network, road_b, section_b, -2, LaneType::Driving);
    let lane_c = add_lane(&mut network, road_c, section_c, -2, last_lane_type);
    network.add_lane_connection(lane_a, lane_b);
    network.add_lane_connection(lane_c, lane_b);

    ThreeRoads {
        network,
        roads: [road_a, road_b, road_c],
        lanes: [lane_a, lane_b, lane_c],
    }
}

fn route(roads: [RoadKey; 3]) -> [RouteElement; 3] {
    [
        RouteElement {
            road: roads[0],
            in_od_direction: true,
        },
        RouteElement {
            road: roads[1],
            in_od_direction: false,
        },
        RouteElement {
            road: roads[2],
            in_od_direction: true,
        },
    ]
}

#[test]
fn lane_stream_spans_roads() {
    let fixture = three_roads(LaneType::Driving);
    let stream = fixture.network.road_stream(&route(fixture.roads));
    let lane_stream = stream.lane_stream(&StreamPosition::new(0.0, 0.0), -2);

    let elements = lane_stream.elements();
    let lanes = elements.iter().map(|e| e.segment.key()).collect::<Vec<_>>();
    assert_eq!(lanes, fixture.lanes.to_vec());

    // Contiguous and increasing
    assert_approx_eq!(elements[0].start_s(), 0.0);
    for pair in elements.windows(2) {
        assert_approx_eq!(pair[0].end_s(), pair[1].start_s());
        assert!(pair[0].start_s() < pair[1].start_s());
    }
    assert_approx_eq!(lane_stream.length(), 420.0);
}

#[test]
fn object_position_on_backward_road() {
    let mut fixture = three_roads(LaneType::Driving);
    let network = &mut fixture.network;
    let on_b = add_object(network, ObjectKind::Moving, &[]);
    network.set_object_road_position(on_b, GlobalRoadPosition::new("RoadB", -2, 10.0, 1.0, 0.1));
    let on_c = add_object(network, ObjectKind::Moving, &[]);
    network.set_object_road_position(on_c, GlobalRoadPosition::new("RoadC", -2, 5.0, 0.5, 0.0));
    let other_lane = add_object(network, ObjectKind::Moving, &[]);
    network.set_object_road_position(other_lane, GlobalRoadPosition::new("RoadB", -1, 10.0, 0.0, 0.0));
    let nowhere = add_object(network, ObjectKind::Moving, &[]);

    let stream = fixture.network.road_stream(&route(fixture.roads));
    let lane_stream = stream.lane_stream(&StreamPosition::new(0.0, 0.0), -2);

    let position = lane_stream.object_position(on_b).unwrap();
    assert_approx_eq!(position.s, 200.0);
    assert_approx_eq!(position.t, -1.0);
    assert_approx_eq!(position.hdg, 0.1 - PI);

    let position = lane_stream.object_position(on_c).unwrap();
    assert_approx_eq!(position.s, 215.0);
    assert_approx_eq!(position.t, 0.5);

    assert!(lane_stream.object_position(other_lane).is_none());
    assert!(lane_stream.object_position(nowhere).is_none());
}

#[test]
fn lane_positions_round_trip() {
    let fixture = three_roads(LaneType::Driving);
    let stream = fixture.network.road_stream(&route(fixture.roads));
    let lane_stream = stream.lane_stream(&StreamPosition::new(0.0, 0.0), -2);

    let position = GlobalRoadPosition::new("RoadB", -2, 10.0, 1.0, 0.1);
    let stream_position = lane_stream.stream_position(&position);
    assert_approx_eq!(stream_position.s, 200.0);
    assert_eq!(lane_stream.road_position(&stream_position), position);

    let road_position = lane_stream.road_position(&StreamPosition::new(30.0, -0.5));
    assert_eq!(road_position, GlobalRoadPosition::new("RoadA", -2, 30.0, -0.5, 0.0));

    let missing = lane_stream.stream_position(&GlobalRoadPosition::new("RoadB", -1, 10.0, 0.0, 0.0));
    assert!(!missing.is_on_stream());
    assert!(lane_stream
        .road_position(&StreamPosition::new(500.0, 0.0))
        .road_id
        .is_empty());
}

#[test]
fn lane_types_list_changes() {
    let fixture = three_roads(LaneType::Driving);
    let stream = fixture.network.road_stream(&route(fixture.roads));
    let lane_stream = stream.lane_stream(&StreamPosition::new(0.0, 0.0), -2);
    assert_eq!(lane_stream.lane_types(), vec![(0.0, LaneType::Driving)]);

    let fixture = three_roads(LaneType::Shoulder);
    let stream = fixture.network.road_stream(&route(fixture.roads));
    let lane_stream = stream.lane_stream(&StreamPosition::new(0.0, 0.0), -2);
    assert_eq!(
        lane_stream.lane_types(),
        vec![(0.0, LaneType::Driving), (210.0, LaneType::Shoulder)]
    );
}
