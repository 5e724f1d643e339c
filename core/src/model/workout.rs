use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TrackerError;
use crate::input::expand_key;
use crate::model::geo::LatLng;
use crate::time::{local_month0, month_name};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    #[default]
    Running,
    Cycling,
}

impl WorkoutType {
    pub const ALL: [WorkoutType; 2] = [WorkoutType::Running, WorkoutType::Cycling];

    pub fn name(self) -> &'static str {
        match self {
            WorkoutType::Running => "running",
            WorkoutType::Cycling => "cycling",
        }
    }

    /// Marker and list icon. Cycling really is a foot.
    pub fn icon(self) -> &'static str {
        match self {
            WorkoutType::Running => "🏃‍♂",
            WorkoutType::Cycling => "🦶🏼",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            WorkoutType::Running => WorkoutType::Cycling,
            WorkoutType::Cycling => WorkoutType::Running,
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WorkoutType {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let names: Vec<&str> = WorkoutType::ALL.iter().map(|t| t.name()).collect();
        match expand_key(&s.to_lowercase(), &names) {
            Ok(name) if name == "running" => Ok(WorkoutType::Running),
            Ok(_) => Ok(WorkoutType::Cycling),
            Err(_) => Err(TrackerError::UnknownWorkoutType(s.to_string())),
        }
    }
}

/// The variant-specific measurement entered on the form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measure {
    /// Steps per minute.
    Cadence(f64),
    /// Metres climbed.
    ElevationGain(f64),
}

/// Variant data, tagged by `type` in the persisted record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkoutKind {
    Running {
        cadence: f64,
        /// min/km
        pace: f64,
    },
    Cycling {
        #[serde(rename = "elevationGain")]
        elevation_gain: f64,
        /// km/h
        speed: f64,
    },
}

impl WorkoutKind {
    /// Builds the variant and its derived metric from the raw inputs.
    pub fn derive(distance: f64, duration: f64, measure: Measure) -> Self {
        match measure {
            Measure::Cadence(cadence) => WorkoutKind::Running {
                cadence,
                pace: pace(distance, duration),
            },
            Measure::ElevationGain(elevation_gain) => WorkoutKind::Cycling {
                elevation_gain,
                speed: speed(distance, duration),
            },
        }
    }

    pub fn workout_type(&self) -> WorkoutType {
        match self {
            WorkoutKind::Running { .. } => WorkoutType::Running,
            WorkoutKind::Cycling { .. } => WorkoutType::Cycling,
        }
    }
}

pub fn pace(distance_km: f64, duration_min: f64) -> f64 {
    duration_min / distance_km
}

pub fn speed(distance_km: f64, duration_min: f64) -> f64 {
    distance_km / (duration_min / 60.0)
}

/// "Running on April": title-cased type name plus the month of `created_at`.
pub fn label(workout_type: WorkoutType, created_at: DateTime<Utc>) -> String {
    let name = workout_type.name();
    let mut chars = name.chars();
    let title = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    format!("{} on {}", title, month_name(local_month0(created_at)))
}

/// One logged activity. Immutable once built.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Workout {
    id: String,
    #[serde(rename = "date")]
    created_at: DateTime<Utc>,
    coords: LatLng,
    distance: f64,
    duration: f64,
    #[serde(rename = "description")]
    label: String,
    #[serde(flatten)]
    kind: WorkoutKind,
}

impl Workout {
    pub fn new(coords: LatLng, distance: f64, duration: f64, measure: Measure) -> Self {
        Self::new_at(Utc::now(), coords, distance, duration, measure)
    }

    pub fn new_at(
        created_at: DateTime<Utc>,
        coords: LatLng,
        distance: f64,
        duration: f64,
        measure: Measure,
    ) -> Self {
        let kind = WorkoutKind::derive(distance, duration, measure);
        Self {
            id: Uuid::now_v7().to_string(),
            created_at,
            coords,
            distance,
            duration,
            label: label(kind.workout_type(), created_at),
            kind,
        }
    }

    pub fn running(coords: LatLng, distance: f64, duration: f64, cadence: f64) -> Self {
        Self::new(coords, distance, duration, Measure::Cadence(cadence))
    }

    pub fn cycling(coords: LatLng, distance: f64, duration: f64, elevation_gain: f64) -> Self {
        Self::new(coords, distance, duration, Measure::ElevationGain(elevation_gain))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn coords(&self) -> LatLng {
        self.coords
    }

    pub fn distance_km(&self) -> f64 {
        self.distance
    }

    pub fn duration_min(&self) -> f64 {
        self.duration
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &WorkoutKind {
        &self.kind
    }

    pub fn workout_type(&self) -> WorkoutType {
        self.kind.workout_type()
    }
}
