//! Mediates between user input, the workout store and the map.

pub mod alert;
pub mod form;
pub mod geolocation;
pub mod list;
pub mod map;


use std::time::Instant;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::config::{DeletePolicy, TrackerConfig};
use crate::error::TrackerError;
use crate::model::geo::LatLng;
use crate::model::workout::{Workout, WorkoutType};
use crate::repository::KeyValueStorage;
use crate::service::{SessionRestart, WorkoutStore};

use alert::Alerter;
use form::{Form, FormField};
use geolocation::GeolocationProvider;
use list::{ListRow, TargetRole};
use map::{MapAdapter, MarkerHandle, PanAnimation, Popup, TILE_ATTRIBUTION, TILE_URL_TEMPLATE};

pub struct WorkoutController<S: KeyValueStorage, M: MapAdapter, A: Alerter> {
    store: WorkoutStore<S>,
    map: M,
    alerter: A,
    config: TrackerConfig,
    map_ready: bool,
    form: Form,
    /// Newest first, like the list on screen.
    rows: Vec<ListRow>,
    /// Marker per workout id, in placement order.
    markers: Vec<(String, MarkerHandle)>,
    reset_visible: bool,
}

impl<S: KeyValueStorage, M: MapAdapter, A: Alerter> WorkoutController<S, M, A> {
    /// Loads persisted workouts and renders their list rows. Markers wait for [`start`](Self::start).
    pub fn new(storage: S, map: M, alerter: A, config: TrackerConfig) -> Self {
        let mut store = WorkoutStore::with_key(storage, config.storage_key.clone());
        store.load_from_persistent();

        let mut controller = Self {
            store,
            map,
            alerter,
            config,
            map_ready: false,
            form: Form::default(),
            rows: Vec::new(),
            markers: Vec::new(),
            reset_visible: false,
        };
        let loaded: Vec<ListRow> = controller.store.workouts().iter().map(ListRow::from).collect();
        for row in loaded {
            controller.render_row(row);
        }
        controller
    }

    /// Asks for the user's position and brings the map up around it.
    pub fn start<G: GeolocationProvider>(&mut self, geolocation: &G) {
        match geolocation.current_position() {
            Ok(position) => self.load_map(position),
            Err(e) => {
                warn!(error = %e, "map not initialised");
                self.alerter.alert(&e.to_string());
            }
        }
    }

    fn load_map(&mut self, position: LatLng) {
        self.map.init(position, self.config.zoom_level);
        self.map.add_tile_layer(TILE_URL_TEMPLATE, TILE_ATTRIBUTION);
        self.map_ready = true;
        info!(%position, "map ready");

        let workouts: Vec<Workout> = self.store.workouts().to_vec();
        for workout in &workouts {
            self.render_marker(workout);
        }
    }

    pub fn handle_map_click(&mut self, at: LatLng) {
        if !self.map_ready {
            return;
        }
        self.form.show(at);
    }

    pub fn select_type(&mut self, workout_type: WorkoutType) {
        self.form.set_type(workout_type);
    }

    pub fn toggle_type(&mut self) {
        self.form.set_type(self.form.workout_type().toggled());
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set_value(field, value);
    }

    /// Text input access for the focused field, for hosts that edit in place.
    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    /// Hides the form without creating anything.
    pub fn cancel_form(&mut self) {
        if self.form.is_shown() {
            self.form.hide(Instant::now(), self.config.form_restore_delay);
        }
    }

    /// Turns the form into a workout at the last clicked position.
    ///
    /// Invalid input raises an alert and leaves everything as it was. A failed
    /// save is alerted too; the workout stays on screen and in memory. Returns
    /// the new workout's id, or `None` when the form was not open.
    pub fn submit(&mut self) -> Result<Option<String>, TrackerError> {
        let Some(at) = self.form.pending() else {
            debug!("submit ignored, form hidden");
            return Ok(None);
        };

        let submission = match self.form.read() {
            Ok(submission) => submission,
            Err(e) => {
                self.alerter.alert(&e.to_string());
                return Err(e);
            }
        };

        let workout = Workout::new(at, submission.distance, submission.duration, submission.measure);
        let id = workout.id().to_string();
        info!(id = %id, kind = %workout.workout_type(), "workout created");

        self.render_marker(&workout);
        self.render_row(ListRow::from(&workout));
        self.store.add(workout);
        self.form.hide(Instant::now(), self.config.form_restore_delay);
        if let Err(e) = self.store.persist() {
            let e = TrackerError::from(e);
            self.alerter.alert(&e.to_string());
            return Err(e);
        }

        Ok(Some(id))
    }

    /// One entry point for clicks inside the workout list.
    pub fn handle_list_click(&mut self, id: &str, role: TargetRole) -> Result<()> {
        match role {
            TargetRole::CloseButton => self.delete_workout(id),
            TargetRole::SettingsIcon => {
                debug!(id, "workout settings not available yet");
                Ok(())
            }
            TargetRole::RowBody => {
                self.move_to_workout(id);
                Ok(())
            }
        }
    }

    fn delete_workout(&mut self, id: &str) -> Result<()> {
        self.rows.retain(|row| row.id != id);
        if self.store.remove(id).is_some() {
            info!(id, "workout deleted");
        }

        if let Some(pos) = self.markers.iter().position(|(marker_id, _)| marker_id == id) {
            let (_, handle) = self.markers.remove(pos);
            self.map.remove_layer(handle);
        }

        match self.config.delete_policy {
            DeletePolicy::Repersist => self.store.persist(),
            DeletePolicy::ClearAll => self.store.discard_persisted(),
        }
    }

    fn move_to_workout(&mut self, id: &str) {
        if !self.map_ready {
            return;
        }
        let Some(coords) = self.store.find(id).map(Workout::coords) else {
            return;
        };
        let animation = PanAnimation {
            duration: self.config.pan_duration,
        };
        self.map.set_view(coords, self.config.zoom_level, Some(animation));
    }

    /// Discards everything persisted; the caller starts a new session.
    pub fn reset(&mut self) -> Result<SessionRestart> {
        self.store.reset()
    }

    /// Runs deferred work that is due at `now`.
    pub fn tick(&mut self, now: Instant) {
        if self.form.restore_layout(now) {
            debug!("form layout restored");
        }
    }

    fn render_marker(&mut self, workout: &Workout) {
        if !self.map_ready {
            return;
        }
        let handle = self.map.add_marker(workout.coords(), Popup::for_workout(workout));
        self.markers.push((workout.id().to_string(), handle));
    }

    fn render_row(&mut self, row: ListRow) {
        self.rows.insert(0, row);
        self.reset_visible = true;
    }

    pub fn workouts(&self) -> &[Workout] {
        self.store.workouts()
    }

    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    pub fn is_map_ready(&self) -> bool {
        self.map_ready
    }

    pub fn is_reset_visible(&self) -> bool {
        self.reset_visible
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn alerter(&self) -> &A {
        &self.alerter
    }

    pub fn alerter_mut(&mut self) -> &mut A {
        &mut self.alerter
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}
