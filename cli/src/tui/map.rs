//! A map widget for the terminal: world coastlines on a braille canvas,
//! with workout markers and their popups drawn on top.

use std::time::{Duration, Instant};

use mapty_core::{LatLng, MapAdapter, MarkerHandle, PanAnimation, Popup};
use ratatui::layout::Rect;
use tracing::debug;

const MIN_ZOOM: u8 = 1;
const MAX_ZOOM: u8 = 18;
/// Terminal cells per 256px web-map tile, horizontally.
const CELLS_PER_TILE: f64 = 32.0;

#[derive(Debug, Clone)]
pub struct PlacedMarker {
    pub handle: MarkerHandle,
    pub at: LatLng,
    pub popup: Popup,
}

#[derive(Debug, Clone, Copy)]
struct Pan {
    from: LatLng,
    to: LatLng,
    started: Instant,
    duration: Duration,
}

/// The visible window onto the world, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub lng_span: f64,
    pub lat_span: f64,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: u8, area: Rect) -> Self {
        let deg_per_col = 360.0 / 2f64.powi(zoom as i32) / CELLS_PER_TILE;
        // Cells are roughly twice as tall as they are wide.
        let deg_per_row = deg_per_col * 2.0;
        Self {
            center,
            lng_span: area.width.max(1) as f64 * deg_per_col,
            lat_span: area.height.max(1) as f64 * deg_per_row,
        }
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        [self.center.lng - self.lng_span / 2.0, self.center.lng + self.lng_span / 2.0]
    }

    pub fn y_bounds(&self) -> [f64; 2] {
        [self.center.lat - self.lat_span / 2.0, self.center.lat + self.lat_span / 2.0]
    }

    /// The coordinate under a terminal cell inside `area`.
    pub fn cell_to_latlng(&self, area: Rect, column: u16, row: u16) -> Option<LatLng> {
        if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
            return None;
        }
        let fx = (column - area.x) as f64 + 0.5;
        let fy = (row - area.y) as f64 + 0.5;
        let [x_min, _] = self.x_bounds();
        let [_, y_max] = self.y_bounds();

        let lng = x_min + fx / area.width as f64 * self.lng_span;
        let lat = y_max - fy / area.height as f64 * self.lat_span;
        Some(LatLng::new(lat.clamp(-90.0, 90.0), wrap_lng(lng)))
    }
}

fn wrap_lng(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[derive(Debug, Default)]
pub struct TerminalMap {
    center: Option<LatLng>,
    zoom: u8,
    attribution: String,
    markers: Vec<PlacedMarker>,
    next_handle: u64,
    pan: Option<Pan>,
}

impl TerminalMap {
    /// Centre at `now`, part way along any running pan.
    pub fn center_at(&self, now: Instant) -> Option<LatLng> {
        let target = self.center?;
        let Some(pan) = self.pan else {
            return Some(target);
        };
        let elapsed = now.saturating_duration_since(pan.started);
        if pan.duration.is_zero() || elapsed >= pan.duration {
            return Some(target);
        }
        let t = elapsed.as_secs_f64() / pan.duration.as_secs_f64();
        Some(LatLng::new(lerp(pan.from.lat, pan.to.lat, t), lerp(pan.from.lng, pan.to.lng, t)))
    }

    pub fn viewport(&self, now: Instant, area: Rect) -> Option<Viewport> {
        self.center_at(now).map(|center| Viewport::new(center, self.zoom, area))
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
    }

    pub fn markers(&self) -> &[PlacedMarker] {
        &self.markers
    }

    pub fn attribution(&self) -> &str {
        &self.attribution
    }
}

impl MapAdapter for TerminalMap {
    fn init(&mut self, center: LatLng, zoom: u8) {
        self.center = Some(center);
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    fn add_tile_layer(&mut self, url_template: &str, attribution: &str) {
        // Coastlines are built in; only the credit line is kept.
        debug!(url_template, "tile layer added");
        self.attribution = attribution.to_string();
    }

    fn add_marker(&mut self, at: LatLng, popup: Popup) -> MarkerHandle {
        self.next_handle += 1;
        let handle = MarkerHandle(self.next_handle);
        self.markers.push(PlacedMarker { handle, at, popup });
        handle
    }

    fn set_view(&mut self, center: LatLng, zoom: u8, animation: Option<PanAnimation>) {
        let now = Instant::now();
        self.pan = match (animation, self.center_at(now)) {
            (Some(animation), Some(from)) => Some(Pan {
                from,
                to: center,
                started: now,
                duration: animation.duration,
            }),
            _ => None,
        };
        self.center = Some(center);
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    fn remove_layer(&mut self, marker: MarkerHandle) {
        self.markers.retain(|m| m.handle != marker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapty_core::Workout;

    fn area() -> Rect {
        Rect::new(10, 5, 64, 20)
    }

    #[test]
    fn test_center_cell_maps_near_center() {
        let center = LatLng::new(39.0, -12.0);
        let viewport = Viewport::new(center, 13, area());
        let at = viewport.cell_to_latlng(area(), 10 + 32, 5 + 10).unwrap();
        assert!((at.lat - center.lat).abs() <= viewport.lat_span / 20.0);
        assert!((at.lng - center.lng).abs() <= viewport.lng_span / 64.0);
    }

    #[test]
    fn test_corners_and_outside() {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 2, area());
        let top_left = viewport.cell_to_latlng(area(), 10, 5).unwrap();
        assert!(top_left.lat > 0.0 && top_left.lng < 0.0);
        let bottom_right = viewport.cell_to_latlng(area(), 73, 24).unwrap();
        assert!(bottom_right.lat < 0.0 && bottom_right.lng > 0.0);

        assert!(viewport.cell_to_latlng(area(), 9, 5).is_none());
        assert!(viewport.cell_to_latlng(area(), 74, 5).is_none());
        assert!(viewport.cell_to_latlng(area(), 10, 25).is_none());
    }

    #[test]
    fn test_wrap_lng() {
        assert_eq!(wrap_lng(190.0), -170.0);
        assert_eq!(wrap_lng(-190.0), 170.0);
        assert_eq!(wrap_lng(45.0), 45.0);
    }

    #[test]
    fn test_markers_added_and_removed() {
        let mut map = TerminalMap::default();
        map.init(LatLng::new(0.0, 0.0), 13);
        let w = Workout::running(LatLng::new(1.0, 1.0), 5.0, 25.0, 180.0);
        let a = map.add_marker(w.coords(), Popup::for_workout(&w));
        let b = map.add_marker(w.coords(), Popup::for_workout(&w));
        assert_ne!(a, b);
        map.remove_layer(a);
        assert_eq!(map.markers().len(), 1);
        assert_eq!(map.markers()[0].handle, b);
    }

    #[test]
    fn test_animated_pan_interpolates() {
        let mut map = TerminalMap::default();
        let from = LatLng::new(0.0, 0.0);
        let to = LatLng::new(10.0, 20.0);
        map.init(from, 13);
        map.set_view(to, 13, Some(PanAnimation { duration: Duration::from_secs(1) }));

        let started = map.pan.unwrap().started;
        let mid = map.center_at(started + Duration::from_millis(500)).unwrap();
        assert!((mid.lat - 5.0).abs() < 1e-9);
        assert!((mid.lng - 10.0).abs() < 1e-9);
        assert_eq!(map.center_at(started + Duration::from_secs(2)), Some(to));
    }

    #[test]
    fn test_zoom_limits() {
        let mut map = TerminalMap::default();
        map.init(LatLng::new(0.0, 0.0), 18);
        map.zoom_in();
        assert_eq!(map.zoom(), 18);
        map.init(LatLng::new(0.0, 0.0), 1);
        map.zoom_out();
        assert_eq!(map.zoom(), 1);
    }
}
