use std::time::Instant;

use traffic_perception::cgmath::{Point2, Vector2};
use traffic_perception::math::CubicFn;
use traffic_perception::{
    Interval, LaneAttributes, LaneType, LogPublisher, ObjectAttributes, ObjectDetector, ObjectKind,
    RoadAttributes, RoadNetwork, RouteElement, SensorParameters, StreamPosition,
};

fn main() -> Result<(), traffic_perception::Error> {
    env_logger::init();

    // A straight two lane road with traffic spread along it
    let mut network = RoadNetwork::new();
    let road = network.add_road(&RoadAttributes {
        id: "main",
        length: 500.0,
    });
    let section = network.add_section(road, Interval::new(0.0, 500.0));
    let [inner, outer] = [-1, -2].map(|od_id| {
        network.add_lane(
            road,
            section,
            &LaneAttributes {
                od_id,
                lane_type: LaneType::Driving,
                width: CubicFn::constant(3.5),
            },
        )
    });

    let host = network.add_object(&ObjectAttributes {
        kind: ObjectKind::Moving,
        position: Point2::new(0.0, -1.75),
        velocity: Vector2::new(20.0, 0.0),
        length: 4.5,
        width: 1.8,
        ..Default::default()
    });
    network.assign_object_to_lane(host, inner, Interval::new(0.0, 2.25));
    for i in 1..200 {
        let x = 2.5 * i as f64;
        let (y, lane) = if i % 2 == 0 {
            (-1.75, inner)
        } else {
            (-5.25, outer)
        };
        let id = network.add_object(&ObjectAttributes {
            kind: if i % 5 == 0 {
                ObjectKind::Stationary
            } else {
                ObjectKind::Moving
            },
            position: Point2::new(x, y),
            velocity: Vector2::new(15.0, 0.0),
            length: 4.5,
            width: 1.8,
            ..Default::default()
        });
        network.assign_object_to_lane(id, lane, Interval::new(x - 2.25, x + 2.25));
    }

    let stream = network.road_stream(&[RouteElement {
        road,
        in_od_direction: true,
    }]);
    println!(
        "Road stream of {} m with {} lane streams, {} agents in the first 100 m",
        stream.length(),
        stream.all_lane_streams().len(),
        stream
            .agents_in_range(&StreamPosition::new(0.0, 0.0), &StreamPosition::new(100.0, 0.0))
            .len()
    );

    let mut detector = ObjectDetector::new(SensorParameters {
        id: 0,
        failure_probability: 0.05,
        latency_ms: 100,
        mounting: Default::default(),
        opening_angle_h: 1.0,
        enable_visual_obstruction: true,
        detection_range: 150.0,
        required_visible_percentage: 0.25,
        sort_occluders_by_distance: false,
    })?;

    println!("Sensing...");
    const NUM_TICKS: u32 = 100;
    let start = Instant::now();
    for tick in 0..NUM_TICKS {
        let view = network.sensor_view(host);
        let results = detector.trigger(100 * tick as i64, &view, &mut LogPublisher)?;
        if tick + 1 == NUM_TICKS {
            println!(
                "Last tick: {} visible, {} detected",
                results.visible_moving_objects.len() + results.visible_stationary_objects.len(),
                detector.sensor_data().objects.len()
            );
        }
    }
    println!("Avg. tick: {:?}", start.elapsed() / NUM_TICKS);

    Ok(())
}
