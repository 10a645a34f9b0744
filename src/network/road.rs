use crate::util::Interval;
use crate::{LaneKey, RoadKey};
use smallvec::SmallVec;

/// A road, divided along its length into sections of lanes.
#[derive(Clone, Debug)]
pub struct Road {
    /// The road's key.
    key: RoadKey,
    /// The road's string ID.
    id: String,
    /// The length of the reference line in m.
    length: f64,
    /// The sections, ordered by `s`.
    sections: Vec<Section>,
}

/// The attributes of a road.
#[derive(Clone, Debug)]
pub struct RoadAttributes<'a> {
    /// The road's string ID.
    pub id: &'a str,
    /// The length of the reference line in m.
    pub length: f64,
}

/// A stretch of road over which the set of lanes does not change.
#[derive(Clone, Debug)]
pub struct Section {
    /// The range of road `s` coordinates covered by the section.
    range: Interval<f64>,
    /// The lanes of the section.
    lanes: SmallVec<[LaneKey; 8]>,
}

impl Road {
    /// Creates a new road.
    pub(crate) fn new(key: RoadKey, attribs: &RoadAttributes) -> Self {
        Self {
            key,
            id: attribs.id.to_owned(),
            length: attribs.length,
            sections: vec![],
        }
    }

    /// Gets the road's key.
    pub fn key(&self) -> RoadKey {
        self.key
    }

    /// Gets the road's string ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The length of the road in m.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// The sections of the road, ordered by `s`.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// The first section covering the given road `s` coordinate.
    pub fn section_at(&self, s: f64) -> Option<&Section> {
        self.sections.iter().find(|section| section.covers(s))
    }

    /// Appends a section to the road and returns its index.
    pub(crate) fn add_section(&mut self, range: Interval<f64>) -> usize {
        if let Some(last) = self.sections.last() {
            assert!(
                range.min >= last.range.min,
                "Sections must be added in order of increasing s"
            );
        }
        self.sections.push(Section {
            range,
            lanes: SmallVec::new(),
        });
        self.sections.len() - 1
    }

    pub(crate) fn section_mut(&mut self, idx: usize) -> &mut Section {
        &mut self.sections[idx]
    }
}

impl Section {
    /// The range of road `s` coordinates covered by the section.
    pub fn range(&self) -> Interval<f64> {
        self.range
    }

    /// Whether the section covers the given road `s` coordinate.
    pub fn covers(&self, s: f64) -> bool {
        self.range.contains(s)
    }

    /// The lanes of the section.
    pub fn lanes(&self) -> &[LaneKey] {
        &self.lanes
    }

    pub(crate) fn add_lane(&mut self, lane: LaneKey) {
        self.lanes.push(lane);
    }
}
