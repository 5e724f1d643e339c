//! The map widget as seen by the controller.
//!
//! Clicks travel the other way: the host turns a click on its widget into a
//! [`LatLng`] and hands it to `WorkoutController::handle_map_click`.

use std::time::Duration;

use crate::model::geo::LatLng;
use crate::model::workout::Workout;

pub const TILE_URL_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Opaque reference to a marker placed on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub content: String,
    pub class_name: String,
    pub max_width: u16,
    pub min_width: u16,
    pub auto_close: bool,
    pub close_on_click: bool,
}

impl Popup {
    pub fn for_workout(workout: &Workout) -> Self {
        let workout_type = workout.workout_type();
        Self {
            content: format!("{} {}", workout_type.icon(), workout.label()),
            class_name: format!("{}-popup", workout_type.name()),
            max_width: 250,
            min_width: 100,
            auto_close: false,
            close_on_click: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanAnimation {
    pub duration: Duration,
}

pub trait MapAdapter {
    fn init(&mut self, center: LatLng, zoom: u8);
    fn add_tile_layer(&mut self, url_template: &str, attribution: &str);
    /// Places a marker with its popup already open.
    fn add_marker(&mut self, at: LatLng, popup: Popup) -> MarkerHandle;
    fn set_view(&mut self, center: LatLng, zoom: u8, animation: Option<PanAnimation>);
    fn remove_layer(&mut self, marker: MarkerHandle);
}
