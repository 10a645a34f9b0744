pub use cgmath;
pub use error::{Error, Result};
pub use network::{
    Lane, LaneAssignment, LaneAttributes, LaneType, Road, RoadAttributes, RoadNetwork, RouteElement,
    Section,
};
pub use object::{ObjectAttributes, ObjectKind, WorldObject};
pub use position::{GlobalRoadPosition, StreamPosition, EQUALITY_BOUND};
pub use sensor::{
    DetectedObject, DetectionResults, LogPublisher, MountingPosition, ObjectDetector, ParameterMap,
    Publisher, SensorData, SensorParameters, SensorView,
};
use slotmap::new_key_type;
pub use slotmap::{Key, KeyData};
pub use stream::{
    LaneStream, LaneStreamElement, RoadStream, RoadStreamElement, StreamElement, StreamSegment,
};
pub use util::Interval;

#[cfg(feature = "debug")]
pub use debug::take_debug_frame;

mod debug;
mod error;
pub mod math;
mod network;
mod object;
mod position;
pub mod sensor;
mod stream;
mod util;

new_key_type! {
    /// Unique ID of a [Road].
    pub struct RoadKey;
    /// Unique ID of a [Lane].
    pub struct LaneKey;
    /// Unique ID of a [WorldObject].
    pub struct ObjectId;
}
