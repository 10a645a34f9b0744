//! A two-dimensional geometric sensor.
//!
//! Each tick the sensor takes a snapshot of the world, finds the objects in its
//! field of view, works out which of them are hidden behind others, randomly
//! misses some, and delivers the results after a fixed latency.

use crate::debug::{debug_circle, debug_polygon};
use crate::error::{Error, Result};
use crate::math::polygon::{self, Polygon};
use crate::math::{heading_vector, project_local, rot90, to_local_frame, Point2d, Vector2d};
use crate::object::{ObjectKind, WorldObject};
use crate::ObjectId;
use field::DetectionField;
use itertools::Itertools;
use latency::LatencyBuffer;
use occlusion::BrightArea;
pub use occlusion::{object_shadow, MIN_VISIBLE, WARNING_THRESHOLD_SCALE};
pub use params::{
    MountingPosition, ParameterMap, SensorParameters, DEFAULT_REQUIRED_VISIBLE_PERCENTAGE,
    MIN_FAILURE_PROBABILITY,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use slotmap::Key;

mod field;
mod latency;
mod occlusion;
mod params;

/// A snapshot of the world, as presented to a sensor on one tick.
#[derive(Clone, Debug)]
pub struct SensorView<'a> {
    /// The object carrying the sensor.
    pub host_id: ObjectId,
    /// Every object in the world, including the host.
    pub objects: Vec<&'a WorldObject>,
}

/// The objects seen by a sensor on one tick.
#[derive(Clone, Debug, Default)]
pub struct DetectionResults {
    /// Moving objects with any part visible.
    pub visible_moving_objects: Vec<WorldObject>,
    /// Stationary objects with any part visible.
    pub visible_stationary_objects: Vec<WorldObject>,
    /// Moving objects sufficiently visible and not missed.
    pub detected_moving_objects: Vec<WorldObject>,
    /// Stationary objects sufficiently visible and not missed.
    pub detected_stationary_objects: Vec<WorldObject>,
}

/// A detected object, expressed in the sensor's frame of reference.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectedObject {
    /// The ID of the object.
    pub id: ObjectId,
    pub kind: ObjectKind,
    /// The position of the object's centre; x is forward and y is left.
    pub position: Point2d,
    /// The heading relative to the sensor in rad.
    pub yaw: f64,
    /// The yaw rate relative to the host in rad/s.
    pub yaw_rate: f64,
    pub length: f64,
    pub width: f64,
    /// The velocity relative to the sensor in m/s.
    pub velocity: Vector2d,
    /// The acceleration relative to the host in m/s^2.
    pub acceleration: Vector2d,
}

/// The detected objects of one tick, in sensor coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorData {
    /// The simulation time at which the data is delivered, in ms.
    pub timestamp_ms: i64,
    pub objects: Vec<DetectedObject>,
}

/// Receives diagnostic output from sensors.
pub trait Publisher {
    /// Publishes a value on a named channel.
    fn publish(&mut self, channel: &str, value: &str);
}

impl Publisher for Vec<(String, String)> {
    fn publish(&mut self, channel: &str, value: &str) {
        self.push((channel.to_owned(), value.to_owned()));
    }
}

/// Writes published values to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogPublisher;

impl Publisher for LogPublisher {
    fn publish(&mut self, channel: &str, value: &str) {
        log::info!("{}: {}", channel, value);
    }
}

/// Everything a sensor delivers for one tick.
#[derive(Clone, Debug, Default)]
struct SensorOutput {
    results: DetectionResults,
    data: SensorData,
}

/// A sensor which detects objects within a sector around its host.
pub struct ObjectDetector<R = StdRng> {
    /// The sensor configuration.
    params: SensorParameters,
    /// The source of randomness for detection failures.
    rng: R,
    /// The outputs not yet delivered.
    buffer: LatencyBuffer<SensorOutput>,
    /// The most recently delivered sensor data.
    sensor_data: SensorData,
}

impl ObjectDetector<StdRng> {
    /// Creates a detector with a randomly seeded random number generator.
    pub fn new(params: SensorParameters) -> Result<Self> {
        Self::with_rng(params, StdRng::from_entropy())
    }
}

impl<R: Rng> ObjectDetector<R> {
    /// Creates a detector which draws detection failures from the given generator.
    pub fn with_rng(params: SensorParameters, rng: R) -> Result<Self> {
        let params = params.normalized();
        params.validate()?;
        Ok(Self {
            params,
            rng,
            buffer: LatencyBuffer::default(),
            sensor_data: SensorData::default(),
        })
    }

    /// The sensor configuration.
    pub fn parameters(&self) -> &SensorParameters {
        &self.params
    }

    /// The sensor data delivered by the most recent tick.
    pub fn sensor_data(&self) -> &SensorData {
        &self.sensor_data
    }

    /// Runs the sensor for one tick.
    ///
    /// Returns the results due at `time_ms`, which were computed `latency_ms` earlier.
    /// Fails if the host is not part of the view.
    pub fn trigger(
        &mut self,
        time_ms: i64,
        view: &SensorView,
        publisher: &mut impl Publisher,
    ) -> Result<DetectionResults> {
        let output = self.detect_objects(time_ms, view)?;
        let output = self.buffer.apply(time_ms, self.params.latency_ms, output);
        log::trace!("Sensor {}: {} outputs pending", self.params.id, self.buffer.len());
        self.publish(&output.results, publisher);
        self.sensor_data = output.data;
        Ok(output.results)
    }

    /// Rolls for a detection failure.
    pub fn has_detection_error(&mut self) -> bool {
        if self.params.failure_probability == 0.0 {
            return false;
        }
        Uniform::new(0.0, 1.0).sample(&mut self.rng) < self.params.failure_probability
    }

    fn detect_objects(&mut self, time_ms: i64, view: &SensorView) -> Result<SensorOutput> {
        let host = view
            .objects
            .iter()
            .copied()
            .find(|obj| obj.id() == view.host_id)
            .ok_or(Error::HostNotFound(view.host_id))?;
        let (origin, yaw) = self.params.mounting.sensor_pose(host);

        let field = DetectionField::new(
            origin,
            yaw,
            self.params.detection_range,
            self.params.opening_angle_h,
        );
        if let Some(outline) = field.polygon() {
            debug_polygon("detection_field", outline);
        }
        debug_circle("detection_range", origin, self.params.detection_range);

        // Candidates, moving objects first, each with its bounding box
        let candidates = view
            .objects
            .iter()
            .copied()
            .filter(|obj| obj.id() != view.host_id)
            .sorted_by_key(|obj| !obj.is_moving())
            .map(|obj| (obj, obj.bounding_box()))
            .filter(|(_, bbox)| field.contains(bbox))
            .collect::<Vec<_>>();

        let mut results = DetectionResults::default();
        let mut detectable = vec![];
        if self.params.enable_visual_obstruction {
            let bright = self.bright_area(origin, yaw, &candidates);
            for (obj, bbox) in &candidates {
                let fraction = bright.visible_fraction(bbox);
                if fraction >= MIN_VISIBLE {
                    results.visible(obj).push((*obj).clone());
                }
                if fraction >= self.params.required_visible_percentage {
                    detectable.push(*obj);
                }
            }
        } else {
            for (obj, _) in &candidates {
                results.visible(obj).push((*obj).clone());
                detectable.push(*obj);
            }
        }

        let mut data = SensorData {
            timestamp_ms: time_ms + self.params.latency_ms,
            objects: vec![],
        };
        for obj in detectable {
            if self.has_detection_error() {
                continue;
            }
            results.detected(obj).push(obj.clone());
            data.objects.push(self.to_sensor_frame(obj, host, origin, yaw));
        }

        log::debug!(
            "Sensor {} at {} ms: {} candidates, {} visible, {} detected",
            self.params.id,
            time_ms,
            candidates.len(),
            results.visible_moving_objects.len() + results.visible_stationary_objects.len(),
            data.objects.len()
        );

        Ok(SensorOutput { results, data })
    }

    /// Casts the shadows of all candidates onto the unobstructed field of view.
    fn bright_area(&self, origin: Point2d, yaw: f64, candidates: &[(&WorldObject, Polygon)]) -> BrightArea {
        let mut bright = BrightArea::new(
            origin,
            yaw,
            self.params.detection_range,
            self.params.opening_angle_h,
        );

        let mut occluders = candidates.iter().map(|(_, bbox)| bbox).collect::<Vec<_>>();
        if self.params.sort_occluders_by_distance {
            occluders.sort_by(|a, b| {
                polygon::distance_to(origin, a).total_cmp(&polygon::distance_to(origin, b))
            });
        }
        for bbox in occluders {
            bright.cast_shadow(bbox);
        }

        for part in bright.area() {
            debug_polygon("bright_area", part);
        }
        bright
    }

    /// Expresses an object's state relative to the sensor.
    fn to_sensor_frame(&self, obj: &WorldObject, host: &WorldObject, origin: Point2d, yaw: f64) -> DetectedObject {
        let x_axis = heading_vector(yaw);
        // Velocity of the mounting point, including the host's rotation
        let lever = origin - host.position();
        let own_velocity = host.velocity() + host.yaw_rate() * rot90(lever);

        DetectedObject {
            id: obj.id(),
            kind: obj.kind(),
            position: project_local(obj.position(), origin, x_axis, rot90(x_axis)),
            yaw: obj.yaw() - yaw,
            yaw_rate: obj.yaw_rate() - host.yaw_rate(),
            length: obj.length(),
            width: obj.width(),
            velocity: to_local_frame(obj.velocity() - own_velocity, yaw),
            acceleration: to_local_frame(obj.acceleration() - host.acceleration(), yaw),
        }
    }

    /// Publishes the IDs of the visible and detected objects.
    fn publish(&self, results: &DetectionResults, publisher: &mut impl Publisher) {
        let visible = id_list(
            results
                .visible_moving_objects
                .iter()
                .chain(&results.visible_stationary_objects),
        );
        let detected = id_list(
            results
                .detected_moving_objects
                .iter()
                .chain(&results.detected_stationary_objects),
        );
        publisher.publish(&format!("Sensor{}_VisibleAgents", self.params.id), &visible);
        publisher.publish(&format!("Sensor{}_DetectedAgents", self.params.id), &detected);
    }
}

impl DetectionResults {
    fn visible(&mut self, obj: &WorldObject) -> &mut Vec<WorldObject> {
        if obj.is_moving() {
            &mut self.visible_moving_objects
        } else {
            &mut self.visible_stationary_objects
        }
    }

    fn detected(&mut self, obj: &WorldObject) -> &mut Vec<WorldObject> {
        if obj.is_moving() {
            &mut self.detected_moving_objects
        } else {
            &mut self.detected_stationary_objects
        }
    }
}

/// Joins the distinct IDs of some objects in ascending order, separated by `;`.
fn id_list<'a>(objects: impl Iterator<Item = &'a WorldObject>) -> String {
    objects
        .map(|obj| obj.id().data().as_ffi())
        .sorted()
        .dedup()
        .join(";")
}
