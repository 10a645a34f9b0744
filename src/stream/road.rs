use super::{objects_in_range, LaneStream, LaneStreamElement, RoadStreamElement};
use crate::network::{Lane, RoadNetwork, Section};
use crate::object::WorldObject;
use crate::position::{GlobalRoadPosition, StreamPosition};

/// A sequence of roads, each driven either with or against its reference direction.
#[derive(Clone)]
pub struct RoadStream<'a> {
    /// The network the roads belong to.
    network: &'a RoadNetwork,
    /// The roads, in stream order.
    elements: Vec<RoadStreamElement<'a>>,
}

impl<'a> RoadStream<'a> {
    /// Creates a road stream from contiguous elements.
    pub fn new(network: &'a RoadNetwork, elements: Vec<RoadStreamElement<'a>>) -> Self {
        Self { network, elements }
    }

    /// The roads of the stream, in stream order.
    pub fn elements(&self) -> &[RoadStreamElement<'a>] {
        &self.elements
    }

    /// The length of the stream in m, which is zero for an empty stream.
    pub fn length(&self) -> f64 {
        self.elements.last().map(|e| e.end_s()).unwrap_or(0.0)
    }

    /// Converts a road position into a stream position.
    ///
    /// The stream `t` coordinate is measured from the road's reference line,
    /// so the widths of the lanes between the reference line and the given lane are added.
    /// Returns [StreamPosition::NOT_ON_STREAM] if the road is not part of the stream
    /// or `s` lies beyond the ends of the road.
    pub fn stream_position(&self, position: &GlobalRoadPosition) -> StreamPosition {
        let Some(element) = self.elements.iter().find(|element| {
            element.segment.id() == position.road_id
                && (0.0..=element.segment.length()).contains(&position.s)
        }) else {
            return StreamPosition::NOT_ON_STREAM;
        };

        let section = element.segment.section_at(position.s);
        let width = |lane_id| self.lane_width(section, lane_id, position.s);

        let mut t = position.t;
        if position.lane_id < 0 {
            t -= (position.lane_id + 1..=-1).map(width).sum::<f64>();
            t -= 0.5 * width(position.lane_id);
        } else if position.lane_id > 0 {
            t += (1..position.lane_id).map(width).sum::<f64>();
            t += 0.5 * width(position.lane_id);
        }

        StreamPosition {
            s: element.stream_position(position.s),
            t: t * element.direction_sign(),
            hdg: element.flip_heading(position.hdg),
        }
    }

    /// Converts a stream position into a road position.
    ///
    /// The lane is found by walking outwards from the reference line one lane at a time.
    /// An offset beyond the outermost lane is attributed to that lane.
    /// At the boundary between two roads the earlier road in the stream is used.
    /// Returns a position with an empty road ID if `s` lies beyond the stream.
    pub fn road_position(&self, position: &StreamPosition) -> GlobalRoadPosition {
        let Some(element) = self.elements.iter().find(|element| element.covers(position.s)) else {
            return GlobalRoadPosition::default();
        };

        let s = element.element_position(position.s);
        let section = element.segment.section_at(s);
        let mut remaining = position.t * element.direction_sign();

        // Right of the reference line when the stream's `t` and direction disagree
        let step = if element.in_stream_direction != (position.t > 0.0) {
            -1
        } else {
            1
        };
        let mut lane_id = step;
        let mut width = self.lane_width(section, lane_id, s);
        while remaining.abs() > width {
            let Some(next_width) = self.existing_lane_width(section, lane_id + step, s) else {
                break;
            };
            remaining -= step as f64 * width;
            lane_id += step;
            width = next_width;
        }

        GlobalRoadPosition {
            road_id: element.segment.id().to_owned(),
            lane_id,
            s,
            t: remaining - step as f64 * 0.5 * width,
            hdg: element.flip_heading(position.hdg),
        }
    }

    /// Creates a lane stream starting at the lane with the given ID
    /// at the given stream `s` coordinate; `t` is ignored.
    ///
    /// The result is empty if there is no such lane.
    pub fn lane_stream(&self, start: &StreamPosition, lane_id: i32) -> LaneStream<'a> {
        for (element_idx, element) in self.elements.iter().enumerate() {
            if !element.covers(start.s) {
                continue;
            }
            let s = element.element_position(start.s);
            let sections = Self::ordered_sections(element);
            let found = sections.iter().enumerate().find_map(|(section_idx, section)| {
                if !section.covers(s) {
                    return None;
                }
                self.network
                    .lane_in_section(section, lane_id)
                    .map(|lane| (section_idx, lane))
            });
            if let Some((section_idx, lane)) = found {
                return self.lane_stream_from(element_idx, section_idx, lane);
            }
        }
        LaneStream::new(self.network, vec![])
    }

    /// Creates a lane stream starting at the lane containing the given road position.
    ///
    /// The result is empty if the road is not part of the stream or has no such lane.
    pub fn lane_stream_at(&self, start: &GlobalRoadPosition) -> LaneStream<'a> {
        let found = self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, element)| element.segment.id() == start.road_id)
            .find_map(|(element_idx, element)| {
                Self::ordered_sections(element)
                    .iter()
                    .enumerate()
                    .filter(|(_, section)| section.covers(start.s))
                    .find_map(|(section_idx, section)| {
                        self.network
                            .lane_in_section(section, start.lane_id)
                            .map(|lane| (element_idx, section_idx, lane))
                    })
            });
        match found {
            Some((element_idx, section_idx, lane)) => self.lane_stream_from(element_idx, section_idx, lane),
            None => LaneStream::new(self.network, vec![]),
        }
    }

    /// Creates one lane stream for every lane that is driven in the stream's direction
    /// and is not the continuation of a lane of the preceding section.
    pub fn all_lane_streams(&self) -> Vec<LaneStream<'a>> {
        let mut lane_streams = vec![];
        let mut last_lanes: Option<&[_]> = None;

        for (element_idx, element) in self.elements.iter().enumerate() {
            for (section_idx, section) in Self::ordered_sections(element).into_iter().enumerate() {
                for lane in section.lanes().iter().map(|key| self.network.get_lane(*key)) {
                    if !lane.is_in_direction(element.in_stream_direction) {
                        continue;
                    }
                    let predecessors = if element.in_stream_direction {
                        lane.previous()
                    } else {
                        lane.next()
                    };
                    let continues = last_lanes
                        .map(|last| last.iter().any(|key| predecessors.contains(key)))
                        .unwrap_or(false);
                    if continues {
                        continue;
                    }
                    lane_streams.push(self.lane_stream_from(element_idx, section_idx, lane));
                }
                last_lanes = Some(section.lanes());
            }
        }

        lane_streams
    }

    /// The agents overlapping the range between `start` and `end`; `t` is ignored.
    pub fn agents_in_range(&self, start: &StreamPosition, end: &StreamPosition) -> Vec<&'a WorldObject> {
        objects_in_range(self.network, &self.elements, start.s, end.s, WorldObject::is_moving)
    }

    /// The objects of any kind overlapping the range between `start` and `end`; `t` is ignored.
    pub fn objects_in_range(&self, start: &StreamPosition, end: &StreamPosition) -> Vec<&'a WorldObject> {
        objects_in_range(self.network, &self.elements, start.s, end.s, |_| true)
    }

    /// Follows a lane through the following sections and roads of the stream,
    /// until it reaches a dead end or the end of the stream.
    fn lane_stream_from(&self, mut element_idx: usize, mut section_idx: usize, lane: &'a Lane) -> LaneStream<'a> {
        let mut elements = vec![];
        let mut sections = Self::ordered_sections(&self.elements[element_idx]);
        let mut current = lane;

        loop {
            let element = &self.elements[element_idx];
            elements.push(LaneStreamElement::new(
                current,
                element.stream_position(current.start_s()),
                element.in_stream_direction,
            ));

            let successors = if element.in_stream_direction {
                current.next()
            } else {
                current.previous()
            };

            section_idx += 1;
            if section_idx == sections.len() {
                element_idx += 1;
                if element_idx == self.elements.len() {
                    break;
                }
                sections = Self::ordered_sections(&self.elements[element_idx]);
                section_idx = 0;
            }

            let next = sections.get(section_idx).and_then(|section| {
                section
                    .lanes()
                    .iter()
                    .find(|key| successors.contains(key))
                    .map(|key| self.network.get_lane(*key))
            });
            match next {
                Some(lane) => current = lane,
                None => {
                    log::debug!(
                        "Lane {} of road {} has no successor in the stream",
                        current.od_id(),
                        element.segment.id()
                    );
                    break;
                }
            }
        }

        LaneStream::new(self.network, elements)
    }

    /// The sections of a road in the order the stream traverses them.
    fn ordered_sections(element: &RoadStreamElement<'a>) -> Vec<&'a Section> {
        let mut sections = element.segment.sections().iter().collect::<Vec<_>>();
        if !element.in_stream_direction {
            sections.reverse();
        }
        sections
    }

    /// The width of a lane, or zero if the section has no such lane.
    fn lane_width(&self, section: Option<&Section>, lane_id: i32, s: f64) -> f64 {
        self.existing_lane_width(section, lane_id, s).unwrap_or(0.0)
    }

    fn existing_lane_width(&self, section: Option<&Section>, lane_id: i32, s: f64) -> Option<f64> {
        section
            .and_then(|section| self.network.lane_in_section(section, lane_id))
            .map(|lane| lane.width(s))
    }
}
