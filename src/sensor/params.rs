use crate::error::{Error, Result};
use crate::math::{rotate, Point2d, Vector2d};
use crate::object::WorldObject;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f64::consts::PI;

/// Failure probabilities below this are treated as zero.
pub const MIN_FAILURE_PROBABILITY: f64 = 1e-12;

/// The share of an object's bounding box that must be visible
/// for it to be detected, unless configured otherwise.
pub const DEFAULT_REQUIRED_VISIBLE_PERCENTAGE: f64 = 0.001;

/// Where a sensor is mounted on its host, relative to the host's reference point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MountingPosition {
    /// Distance forward of the reference point in m.
    pub longitudinal: f64,
    /// Distance to the left of the reference point in m.
    pub lateral: f64,
    /// Height above the ground in m.
    pub height: f64,
    pub pitch: f64,
    /// Heading relative to the host in rad.
    pub yaw: f64,
    pub roll: f64,
}

impl MountingPosition {
    /// The offset of the sensor from the host's reference point, in the host's frame.
    pub fn offset(&self) -> Vector2d {
        Vector2d::new(self.longitudinal, self.lateral)
    }

    /// The world space position and heading of a sensor mounted on the given host.
    pub fn sensor_pose(&self, host: &WorldObject) -> (Point2d, f64) {
        let position = host.position() + rotate(self.offset(), host.yaw());
        (position, host.yaw() + self.yaw)
    }
}

/// The configuration of an object detector.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorParameters {
    /// The sensor ID, used to name published channels.
    pub id: i64,
    /// The probability that a detectable object is missed, in `[0, 1]`.
    pub failure_probability: f64,
    /// The delay between sensing and delivering results in ms.
    pub latency_ms: i64,
    /// Where the sensor is mounted on its host.
    pub mounting: MountingPosition,
    /// The horizontal field of view in rad. Values of 2π or more see all around.
    pub opening_angle_h: f64,
    /// Whether objects can hide one another.
    pub enable_visual_obstruction: bool,
    /// The maximum detection distance in m.
    pub detection_range: f64,
    /// The share of an object's bounding box that must be visible for it to be detected.
    pub required_visible_percentage: f64,
    /// Whether to subtract shadows nearest first rather than in enumeration order.
    pub sort_occluders_by_distance: bool,
}

/// Sensor parameters as delivered by a configuration importer, grouped by type.
#[derive(Clone, Debug, Default)]
pub struct ParameterMap {
    pub doubles: HashMap<String, f64>,
    pub ints: HashMap<String, i64>,
    pub bools: HashMap<String, bool>,
}

impl ParameterMap {
    /// Creates an empty parameter map.
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_double(mut self, name: &str, value: f64) -> Self {
        self.doubles.insert(name.to_owned(), value);
        self
    }

    pub fn with_int(mut self, name: &str, value: i64) -> Self {
        self.ints.insert(name.to_owned(), value);
        self
    }

    pub fn with_bool(mut self, name: &str, value: bool) -> Self {
        self.bools.insert(name.to_owned(), value);
        self
    }

    fn double(&self, name: &str) -> Result<f64> {
        Self::required(self.doubles.get(name), name)
    }

    fn int(&self, name: &str) -> Result<i64> {
        Self::required(self.ints.get(name), name)
    }

    fn bool(&self, name: &str) -> Result<bool> {
        Self::required(self.bools.get(name), name)
    }

    fn required<T: Copy>(value: Option<&T>, name: &str) -> Result<T> {
        value.copied().ok_or_else(|| {
            let err = Error::MissingParameter(name.to_owned());
            log::error!("{}", err);
            err
        })
    }
}

impl SensorParameters {
    /// Reads and validates the parameters of a sensor.
    ///
    /// `Latency` is given in seconds and rounded to whole milliseconds.
    pub fn from_parameters(parameters: &ParameterMap) -> Result<Self> {
        let required_visible_percentage = parameters
            .doubles
            .get("RequiredPercentageOfVisibleArea")
            .copied()
            .unwrap_or(DEFAULT_REQUIRED_VISIBLE_PERCENTAGE);
        let sort_occluders_by_distance = parameters
            .bools
            .get("SortOccludersByDistance")
            .copied()
            .unwrap_or(false);

        let result = Self {
            id: parameters.int("Id")?,
            failure_probability: parameters.double("FailureProbability")?,
            latency_ms: (parameters.double("Latency")? * 1000.0).round() as i64,
            mounting: MountingPosition {
                longitudinal: parameters.double("Longitudinal")?,
                lateral: parameters.double("Lateral")?,
                height: parameters.double("Height")?,
                pitch: parameters.double("Pitch")?,
                yaw: parameters.double("Yaw")?,
                roll: parameters.double("Roll")?,
            },
            opening_angle_h: parameters.double("OpeningAngleH")?,
            enable_visual_obstruction: parameters.bool("EnableVisualObstruction")?,
            detection_range: parameters.double("DetectionRange")?,
            required_visible_percentage,
            sort_occluders_by_distance,
        }
        .normalized();

        result.validate()?;
        Ok(result)
    }

    /// Checks that every parameter lies within its valid range.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            (
                "DetectionRange",
                self.detection_range,
                self.detection_range > 0.0,
                "must be positive",
            ),
            (
                "OpeningAngleH",
                self.opening_angle_h,
                self.opening_angle_h > 0.0,
                "must be positive",
            ),
            (
                "RequiredPercentageOfVisibleArea",
                self.required_visible_percentage,
                self.required_visible_percentage > 0.0 && self.required_visible_percentage <= 1.0,
                "must lie in (0, 1]",
            ),
            (
                "FailureProbability",
                self.failure_probability,
                (0.0..=1.0).contains(&self.failure_probability),
                "must lie in [0, 1]",
            ),
            (
                "Latency",
                self.latency_ms as f64,
                self.latency_ms >= 0,
                "must not be negative",
            ),
        ];

        for (name, value, valid, reason) in checks {
            if !valid {
                let err = Error::InvalidParameter {
                    name,
                    value,
                    reason,
                };
                log::error!("{}", err);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Whether the sensor sees in every direction.
    pub fn is_omnidirectional(&self) -> bool {
        self.opening_angle_h >= 2.0 * PI
    }

    /// Flushes negligible failure probabilities to zero.
    pub(crate) fn normalized(mut self) -> Self {
        if self.failure_probability < MIN_FAILURE_PROBABILITY && self.failure_probability >= 0.0 {
            self.failure_probability = 0.0;
        }
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::object::ObjectAttributes;
    use crate::ObjectId;
    use assert_approx_eq::assert_approx_eq;
    use slotmap::KeyData;
    use std::f64::consts::FRAC_PI_2;

    fn parameters() -> ParameterMap {
        ParameterMap::new()
            .with_int("Id", 3)
            .with_double("FailureProbability", 1e-15)
            .with_double("Latency", 0.2004)
            .with_double("Longitudinal", 2.0)
            .with_double("Lateral", 0.5)
            .with_double("Height", 1.2)
            .with_double("Pitch", 0.0)
            .with_double("Yaw", 0.1)
            .with_double("Roll", 0.0)
            .with_double("OpeningAngleH", FRAC_PI_2)
            .with_bool("EnableVisualObstruction", true)
            .with_double("DetectionRange", 80.0)
    }

    #[test]
    fn reads_parameters() {
        let params = SensorParameters::from_parameters(&parameters()).unwrap();
        assert_eq!(params.id, 3);
        assert_eq!(params.latency_ms, 200);
        assert_eq!(params.failure_probability, 0.0);
        assert_approx_eq!(params.required_visible_percentage, DEFAULT_REQUIRED_VISIBLE_PERCENTAGE);
        assert!(!params.sort_occluders_by_distance);
        assert!(!params.is_omnidirectional());
    }

    #[test]
    fn missing_and_invalid_parameters() {
        let mut map = parameters();
        map.doubles.remove("DetectionRange");
        assert_eq!(
            SensorParameters::from_parameters(&map),
            Err(Error::MissingParameter("DetectionRange".to_owned()))
        );

        let map = parameters().with_double("RequiredPercentageOfVisibleArea", 1.5);
        assert!(matches!(
            SensorParameters::from_parameters(&map),
            Err(Error::InvalidParameter {
                name: "RequiredPercentageOfVisibleArea",
                ..
            })
        ));
    }

    #[test]
    fn sensor_pose_follows_host() {
        let host = WorldObject::new(
            ObjectId::from(KeyData::from_ffi(1)),
            &ObjectAttributes {
                position: Point2d::new(10.0, 0.0),
                yaw: FRAC_PI_2,
                ..Default::default()
            },
        );
        let mounting = MountingPosition {
            longitudinal: 2.0,
            lateral: 1.0,
            yaw: 0.25,
            ..Default::default()
        };
        let (position, yaw) = mounting.sensor_pose(&host);
        assert_approx_eq!(position.x, 9.0);
        assert_approx_eq!(position.y, 2.0);
        assert_approx_eq!(yaw, FRAC_PI_2 + 0.25);
    }
}
