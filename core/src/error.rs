use thiserror::Error;

/// Errors surfaced by the tracker core.
///
/// The first two variants carry the exact wording shown to the user in an alert.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Inputs have to be positive number")]
    InvalidInput,

    #[error("Could not get your position")]
    GeolocationUnavailable,

    #[error("Persisted workouts are malformed: {0}")]
    MalformedPersistedData(#[from] serde_json::Error),

    #[error("Unknown workout type: '{0}'")]
    UnknownWorkoutType(String),

    #[error("Unknown delete policy: '{0}'")]
    UnknownDeletePolicy(String),

    #[error("Invalid coordinates: '{0}'")]
    InvalidCoordinates(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
