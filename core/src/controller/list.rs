use crate::model::workout::{Workout, WorkoutKind, WorkoutType};

/// Which part of a list row was clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRole {
    CloseButton,
    SettingsIcon,
    RowBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Detail {
    pub icon: &'static str,
    pub value: String,
    pub unit: &'static str,
}

impl Detail {
    fn new(icon: &'static str, value: String, unit: &'static str) -> Self {
        Self { icon, value, unit }
    }
}

/// One rendered entry of the workout list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub id: String,
    pub workout_type: WorkoutType,
    pub title: String,
    pub details: Vec<Detail>,
}

impl From<&Workout> for ListRow {
    fn from(workout: &Workout) -> Self {
        let workout_type = workout.workout_type();
        let mut details = vec![
            Detail::new(workout_type.icon(), workout.distance_km().to_string(), "km"),
            Detail::new("⏱", workout.duration_min().to_string(), "min"),
        ];

        match workout.kind() {
            WorkoutKind::Running { cadence, pace } => {
                details.push(Detail::new("⚡️", format!("{:.1}", pace), "min/km"));
                details.push(Detail::new("🦶🏼", cadence.to_string(), "spm"));
            }
            WorkoutKind::Cycling { elevation_gain, speed } => {
                details.push(Detail::new("⚡️", format!("{:.1}", speed), "km/h"));
                details.push(Detail::new("⛰", elevation_gain.to_string(), "m"));
            }
        }

        Self {
            id: workout.id().to_string(),
            workout_type,
            title: workout.label().to_string(),
            details,
        }
    }
}

impl ListRow {
    /// Details as `"icon value unit"` strings.
    pub fn detail_texts(&self) -> Vec<String> {
        self.details
            .iter()
            .map(|d| format!("{} {} {}", d.icon, d.value, d.unit))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::geo::LatLng;

    #[test]
    fn test_running_row() {
        let w = Workout::running(LatLng::new(39.0, -12.0), 5.2, 24.0, 178.0);
        let row = ListRow::from(&w);
        assert_eq!(row.id, w.id());
        assert_eq!(row.title, w.label());
        assert_eq!(
            row.detail_texts(),
            vec!["🏃‍♂ 5.2 km", "⏱ 24 min", "⚡️ 4.6 min/km", "🦶🏼 178 spm"]
        );
    }

    #[test]
    fn test_cycling_row() {
        let w = Workout::cycling(LatLng::new(39.0, -12.0), 10.0, 30.0, 150.0);
        let row = ListRow::from(&w);
        assert_eq!(row.workout_type, WorkoutType::Cycling);
        assert_eq!(
            row.detail_texts(),
            vec!["🦶🏼 10 km", "⏱ 30 min", "⚡️ 20.0 km/h", "⛰ 150 m"]
        );
    }
}
