use std::time::{Duration, Instant};

use crate::error::TrackerError;
use crate::input::parse_number;
use crate::model::geo::LatLng;
use crate::model::workout::{pace, speed, Measure, WorkoutType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Type,
    Distance,
    Duration,
    Cadence,
    Elevation,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Type => "Type",
            FormField::Distance => "Distance",
            FormField::Duration => "Duration",
            FormField::Cadence => "Cadence",
            FormField::Elevation => "Elev Gain",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            FormField::Type => "",
            FormField::Distance => "km",
            FormField::Duration => "min",
            FormField::Cadence => "step/min",
            FormField::Elevation => "meters",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormState {
    Hidden,
    /// Waiting for input about a workout at `pending`.
    Shown { pending: LatLng },
}

/// Validated form values, ready to become a workout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Submission {
    pub distance: f64,
    pub duration: f64,
    pub measure: Measure,
}

/// Distance, duration and cadence must be finite and positive; elevation
/// only has to be finite. The derived pace or speed must be finite too, or
/// the entry could not be written back.
pub fn validate(
    workout_type: WorkoutType,
    distance: f64,
    duration: f64,
    type_specific: f64,
) -> Result<Submission, TrackerError> {
    let finite = [distance, duration, type_specific].iter().all(|v| v.is_finite());
    let positive = match workout_type {
        WorkoutType::Running => [distance, duration, type_specific].iter().all(|v| *v > 0.0),
        WorkoutType::Cycling => distance > 0.0 && duration > 0.0,
    };
    let derived = match workout_type {
        WorkoutType::Running => pace(distance, duration),
        WorkoutType::Cycling => speed(distance, duration),
    };
    if !finite || !positive || !derived.is_finite() {
        return Err(TrackerError::InvalidInput);
    }

    let measure = match workout_type {
        WorkoutType::Running => Measure::Cadence(type_specific),
        WorkoutType::Cycling => Measure::ElevationGain(type_specific),
    };
    Ok(Submission { distance, duration, measure })
}

#[derive(Debug, Clone)]
pub struct Form {
    state: FormState,
    workout_type: WorkoutType,
    distance: String,
    duration: String,
    cadence: String,
    elevation: String,
    focus: FormField,
    restore_layout_at: Option<Instant>,
}

impl Default for Form {
    fn default() -> Self {
        Self {
            state: FormState::Hidden,
            workout_type: WorkoutType::default(),
            distance: String::new(),
            duration: String::new(),
            cadence: String::new(),
            elevation: String::new(),
            focus: FormField::Distance,
            restore_layout_at: None,
        }
    }
}

impl Form {
    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_shown(&self) -> bool {
        matches!(self.state, FormState::Shown { .. })
    }

    pub fn pending(&self) -> Option<LatLng> {
        match self.state {
            FormState::Shown { pending } => Some(pending),
            FormState::Hidden => None,
        }
    }

    /// False while the post-hide delay is running; the form must not be drawn then.
    pub fn is_laid_out(&self) -> bool {
        self.restore_layout_at.is_none()
    }

    pub(crate) fn show(&mut self, at: LatLng) {
        self.state = FormState::Shown { pending: at };
        self.focus = FormField::Distance;
    }

    pub(crate) fn hide(&mut self, now: Instant, delay: Duration) {
        self.distance.clear();
        self.duration.clear();
        self.cadence.clear();
        self.elevation.clear();
        self.state = FormState::Hidden;
        self.restore_layout_at = Some(now + delay);
    }

    /// Returns true when the layout came back on this call.
    pub(crate) fn restore_layout(&mut self, now: Instant) -> bool {
        match self.restore_layout_at {
            Some(at) if now >= at => {
                self.restore_layout_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn workout_type(&self) -> WorkoutType {
        self.workout_type
    }

    pub(crate) fn set_type(&mut self, workout_type: WorkoutType) {
        self.workout_type = workout_type;
        if !self.visible_fields().contains(&self.focus) {
            self.focus = self.type_specific_field();
        }
    }

    /// Cadence for running, elevation for cycling; never both.
    pub fn type_specific_field(&self) -> FormField {
        match self.workout_type {
            WorkoutType::Running => FormField::Cadence,
            WorkoutType::Cycling => FormField::Elevation,
        }
    }

    pub fn visible_fields(&self) -> [FormField; 4] {
        [
            FormField::Type,
            FormField::Distance,
            FormField::Duration,
            self.type_specific_field(),
        ]
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Type => self.workout_type.name(),
            FormField::Distance => &self.distance,
            FormField::Duration => &self.duration,
            FormField::Cadence => &self.cadence,
            FormField::Elevation => &self.elevation,
        }
    }

    /// Text of an input field. The type selector is not free text.
    pub fn value_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Type => None,
            FormField::Distance => Some(&mut self.distance),
            FormField::Duration => Some(&mut self.duration),
            FormField::Cadence => Some(&mut self.cadence),
            FormField::Elevation => Some(&mut self.elevation),
        }
    }

    pub fn set_value(&mut self, field: FormField, value: impl Into<String>) {
        if let Some(slot) = self.value_mut(field) {
            *slot = value.into();
        }
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    pub fn focus_next(&mut self) {
        self.move_focus(1);
    }

    pub fn focus_previous(&mut self) {
        self.move_focus(self.visible_fields().len() - 1);
    }

    fn move_focus(&mut self, step: usize) {
        let fields = self.visible_fields();
        let i = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(i + step) % fields.len()];
    }

    pub fn read(&self) -> Result<Submission, TrackerError> {
        validate(
            self.workout_type,
            parse_number(&self.distance),
            parse_number(&self.duration),
            parse_number(self.value(self.type_specific_field())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_running() {
        let ok = validate(WorkoutType::Running, 5.0, 25.0, 180.0).unwrap();
        assert_eq!(ok.measure, Measure::Cadence(180.0));
        assert!(validate(WorkoutType::Running, -1.0, 25.0, 180.0).is_err());
        assert!(validate(WorkoutType::Running, 5.0, 0.0, 180.0).is_err());
        assert!(validate(WorkoutType::Running, 5.0, 25.0, 0.0).is_err());
        assert!(validate(WorkoutType::Running, f64::NAN, 25.0, 180.0).is_err());
    }

    #[test]
    fn test_validate_cycling_allows_any_finite_elevation() {
        let ok = validate(WorkoutType::Cycling, 10.0, 30.0, 0.0).unwrap();
        assert_eq!(ok.measure, Measure::ElevationGain(0.0));
        assert!(validate(WorkoutType::Cycling, 10.0, 30.0, -20.0).is_ok());
        assert!(validate(WorkoutType::Cycling, 10.0, 30.0, f64::INFINITY).is_err());
        assert!(validate(WorkoutType::Cycling, 0.0, 30.0, 150.0).is_err());
    }

    #[test]
    fn test_validate_rejects_overflowing_metric() {
        assert!(validate(WorkoutType::Running, 1e-300, 1e300, 180.0).is_err());
        assert!(validate(WorkoutType::Cycling, 1e300, 1e-300, 0.0).is_err());
    }

    #[test]
    fn test_type_toggle_swaps_fields() {
        let mut form = Form::default();
        assert_eq!(form.visible_fields()[3], FormField::Cadence);
        form.set_type(WorkoutType::Cycling);
        assert_eq!(form.visible_fields()[3], FormField::Elevation);
        assert!(!form.visible_fields().contains(&FormField::Cadence));
    }

    #[test]
    fn test_focus_follows_hidden_field() {
        let mut form = Form::default();
        form.focus_previous();
        assert_eq!(form.focus(), FormField::Type);
        form.focus_previous();
        assert_eq!(form.focus(), FormField::Cadence);
        form.set_type(WorkoutType::Cycling);
        assert_eq!(form.focus(), FormField::Elevation);
        form.focus_next();
        assert_eq!(form.focus(), FormField::Type);
    }

    #[test]
    fn test_read_uses_type_specific_field() {
        let mut form = Form::default();
        form.set_value(FormField::Distance, "10");
        form.set_value(FormField::Duration, "30");
        form.set_value(FormField::Cadence, "");
        form.set_value(FormField::Elevation, "");
        // Running with blank cadence is rejected...
        assert!(form.read().is_err());
        // ...cycling with blank elevation reads as 0 m.
        form.set_type(WorkoutType::Cycling);
        assert_eq!(form.read().unwrap().measure, Measure::ElevationGain(0.0));
    }

    #[test]
    fn test_hide_clears_and_delays_layout() {
        let mut form = Form::default();
        let now = Instant::now();
        form.show(LatLng::new(1.0, 2.0));
        form.set_value(FormField::Distance, "5");
        form.set_type(WorkoutType::Cycling);

        form.hide(now, Duration::from_millis(1000));
        assert!(!form.is_shown());
        assert_eq!(form.value(FormField::Distance), "");
        assert_eq!(form.workout_type(), WorkoutType::Cycling);
        assert!(!form.is_laid_out());

        assert!(!form.restore_layout(now + Duration::from_millis(999)));
        assert!(form.restore_layout(now + Duration::from_millis(1000)));
        assert!(form.is_laid_out());
    }
}
