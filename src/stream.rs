//! Streams: directed, one-dimensional coordinate systems along a path through the network.
//!
//! A stream is an ordered list of elements, each referring to a road or lane
//! of the network. The elements are contiguous: each one starts where the
//! previous one ends, so `s` increases monotonically along the stream.

use crate::math::normalize_angle;
use crate::network::{Lane, LaneAssignment, Road, RoadNetwork};
use crate::object::WorldObject;
pub use lane::LaneStream;
pub use road::RoadStream;
use std::f64::consts::PI;

mod lane;
mod road;

/// A road or lane which can be traversed as part of a stream.
pub trait StreamSegment {
    /// The road `s` coordinate at which the segment starts.
    fn start_s(&self) -> f64;

    /// The length of the segment in m.
    fn length(&self) -> f64;

    /// The objects overlapping the segment, in the order they are encountered
    /// when traversing the segment in the given direction.
    fn world_objects(&self, network: &RoadNetwork, in_stream_direction: bool) -> Vec<LaneAssignment>;
}

impl StreamSegment for Road {
    fn start_s(&self) -> f64 {
        0.0
    }

    fn length(&self) -> f64 {
        Road::length(self)
    }

    fn world_objects(&self, network: &RoadNetwork, in_stream_direction: bool) -> Vec<LaneAssignment> {
        network.objects_on_road(self.key(), in_stream_direction)
    }
}

impl StreamSegment for Lane {
    fn start_s(&self) -> f64 {
        Lane::start_s(self)
    }

    fn length(&self) -> f64 {
        Lane::length(self)
    }

    fn world_objects(&self, network: &RoadNetwork, in_stream_direction: bool) -> Vec<LaneAssignment> {
        network.objects_on_lane(self.key(), in_stream_direction)
    }
}

/// One road or lane of a stream.
#[derive(Debug)]
pub struct StreamElement<'a, T> {
    /// The road or lane.
    pub segment: &'a T,
    /// The stream `s` coordinate of the start of the segment,
    /// where the start is in the segment's own reference direction.
    pub s_offset: f64,
    /// Whether the stream traverses the segment in its reference direction.
    pub in_stream_direction: bool,
}

/// An element of a [RoadStream].
pub type RoadStreamElement<'a> = StreamElement<'a, Road>;

/// An element of a [LaneStream].
pub type LaneStreamElement<'a> = StreamElement<'a, Lane>;

impl<'a, T> Clone for StreamElement<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for StreamElement<'a, T> {}

impl<'a, T: StreamSegment> StreamElement<'a, T> {
    /// Creates a new stream element.
    pub fn new(segment: &'a T, s_offset: f64, in_stream_direction: bool) -> Self {
        Self {
            segment,
            s_offset,
            in_stream_direction,
        }
    }

    /// The stream `s` coordinate at which the element begins.
    pub fn start_s(&self) -> f64 {
        if self.in_stream_direction {
            self.s_offset
        } else {
            self.s_offset - self.segment.length()
        }
    }

    /// The stream `s` coordinate at which the element ends.
    pub fn end_s(&self) -> f64 {
        if self.in_stream_direction {
            self.s_offset + self.segment.length()
        } else {
            self.s_offset
        }
    }

    /// Whether the element covers the given stream `s` coordinate.
    pub fn covers(&self, s: f64) -> bool {
        self.start_s() <= s && s <= self.end_s()
    }

    /// Converts a distance from the start of the segment into a stream `s` coordinate.
    pub fn stream_position(&self, element_position: f64) -> f64 {
        if self.in_stream_direction {
            self.s_offset + element_position
        } else {
            self.s_offset - element_position
        }
    }

    /// Converts a stream `s` coordinate into a distance from the start of the segment.
    pub fn element_position(&self, stream_position: f64) -> f64 {
        if self.in_stream_direction {
            stream_position - self.s_offset
        } else {
            self.s_offset - stream_position
        }
    }

    /// +1 if the stream runs with the segment, -1 otherwise.
    pub(crate) fn direction_sign(&self) -> f64 {
        if self.in_stream_direction {
            1.0
        } else {
            -1.0
        }
    }

    /// Converts a heading between the segment's frame and the stream's frame.
    /// The conversion is its own inverse.
    pub(crate) fn flip_heading(&self, hdg: f64) -> f64 {
        if self.in_stream_direction {
            normalize_angle(hdg)
        } else {
            normalize_angle(hdg + PI)
        }
    }
}

/// Finds the objects which overlap the given range of stream `s` coordinates.
///
/// Objects are returned in the order first encountered, each at most once.
pub(crate) fn objects_in_range<'a, T: StreamSegment>(
    network: &'a RoadNetwork,
    elements: &[StreamElement<'a, T>],
    start: f64,
    end: f64,
    filter: impl Fn(&WorldObject) -> bool,
) -> Vec<&'a WorldObject> {
    let mut found: Vec<&'a WorldObject> = vec![];

    for element in elements {
        // Skip elements ending before the range
        if element.end_s() < start {
            continue;
        }
        // Stop once past the range
        if element.start_s() > end {
            break;
        }

        let origin = element.segment.start_s();
        for assignment in element
            .segment
            .world_objects(network, element.in_stream_direction)
        {
            let local = assignment.s - origin;
            let (first, last) = if element.in_stream_direction {
                (local.min, local.max)
            } else {
                (local.max, local.min)
            };

            let stream_start = element.stream_position(first);
            if stream_start > end {
                break;
            }

            let stream_end = element.stream_position(last);
            if stream_end < start {
                continue;
            }

            let object = network.get_object(assignment.object);
            if filter(object) && !found.iter().any(|other| other.id() == object.id()) {
                found.push(object);
            }
        }
    }

    found
}
