use crate::error::TrackerError;
use crate::model::geo::LatLng;

pub trait GeolocationProvider {
    /// Answers once, with the position or `GeolocationUnavailable`.
    fn current_position(&self) -> Result<LatLng, TrackerError>;
}

/// A position known up front, e.g. from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPosition(pub Option<LatLng>);

impl GeolocationProvider for FixedPosition {
    fn current_position(&self) -> Result<LatLng, TrackerError> {
        self.0.ok_or(TrackerError::GeolocationUnavailable)
    }
}
