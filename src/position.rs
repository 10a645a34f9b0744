//! Positions in the road network and along streams.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Absolute tolerance used when comparing positions.
pub const EQUALITY_BOUND: f64 = 1e-3;

/// A position in the one-dimensional coordinate system of a stream.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StreamPosition {
    /// Longitudinal distance from the start of the stream in m.
    pub s: f64,
    /// Lateral offset from the stream's reference line in m, positive to the left.
    pub t: f64,
    /// Heading relative to the stream direction in rad.
    pub hdg: f64,
}

impl StreamPosition {
    /// Returned by position lookups when the position does not lie on the stream.
    pub const NOT_ON_STREAM: Self = Self {
        s: -1.0,
        t: 0.0,
        hdg: 0.0,
    };

    /// Creates a position with zero heading.
    pub const fn new(s: f64, t: f64) -> Self {
        Self { s, t, hdg: 0.0 }
    }

    /// Whether this is a real position rather than [Self::NOT_ON_STREAM].
    pub fn is_on_stream(&self) -> bool {
        self.s >= -EQUALITY_BOUND
    }
}

impl PartialEq for StreamPosition {
    fn eq(&self, other: &Self) -> bool {
        (self.s - other.s).abs() < EQUALITY_BOUND
            && (self.t - other.t).abs() < EQUALITY_BOUND
            && (self.hdg - other.hdg).abs() < EQUALITY_BOUND
    }
}

/// A position in the coordinate system of a single road.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GlobalRoadPosition {
    /// The road's string ID.
    pub road_id: String,
    /// The lane ID; negative to the right of the reference line, positive to the left.
    pub lane_id: i32,
    /// Longitudinal position along the road in m.
    pub s: f64,
    /// Lateral offset from the centre of the lane in m.
    pub t: f64,
    /// Heading relative to the road's reference direction in rad.
    pub hdg: f64,
}

impl GlobalRoadPosition {
    pub fn new(road_id: impl Into<String>, lane_id: i32, s: f64, t: f64, hdg: f64) -> Self {
        Self {
            road_id: road_id.into(),
            lane_id,
            s,
            t,
            hdg,
        }
    }
}

impl PartialEq for GlobalRoadPosition {
    fn eq(&self, other: &Self) -> bool {
        self.road_id == other.road_id
            && self.lane_id == other.lane_id
            && (self.s - other.s).abs() < EQUALITY_BOUND
            && (self.t - other.t).abs() < EQUALITY_BOUND
            && (self.hdg - other.hdg).abs() < EQUALITY_BOUND
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn equality_is_tolerant() {
        let a = StreamPosition { s: 10.0, t: 1.0, hdg: 0.1 };
        let b = StreamPosition { s: 10.0005, t: 0.9995, hdg: 0.1 };
        assert_eq!(a, b);
        assert_ne!(a, StreamPosition { s: 10.01, ..a });
        assert!(!StreamPosition::NOT_ON_STREAM.is_on_stream());
        assert!(StreamPosition::new(0.0, 0.0).is_on_stream());
    }
}
