#[cfg(feature = "debug")]
use crate::math::polygon::vertices;
use crate::math::polygon::Polygon;
use crate::math::Point2d;
#[cfg(feature = "debug")]
use serde_json::json;

#[cfg(feature = "debug")]
thread_local!(
    static DEBUG_FRAME: std::cell::RefCell<Vec<serde_json::Value>> = Default::default();
);

#[allow(unused)]
pub fn debug_polygon(name: &str, polygon: &Polygon) {
    #[cfg(feature = "debug")]
    DEBUG_FRAME.with(|frame| {
        let points = vertices(polygon).map(|p| [p.x, p.y]).collect::<Vec<_>>();
        frame.borrow_mut().push(json!({
            "type": "polygon",
            "name": name,
            "points": points,
        }))
    })
}

#[allow(unused)]
pub fn debug_circle(name: &str, centre: Point2d, radius: f64) {
    #[cfg(feature = "debug")]
    DEBUG_FRAME.with(|frame| {
        frame.borrow_mut().push(json!({
            "type": "circle",
            "name": name,
            "centre": [centre.x, centre.y],
            "radius": radius
        }))
    })
}

/// Drains the geometry recorded since the last call.
#[cfg(feature = "debug")]
pub fn take_debug_frame() -> serde_json::Value {
    json!(DEBUG_FRAME.with(|frame| frame.take()))
}
