use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// A map coordinate in degrees.
///
/// Stored as `[lat, lng]`, the same shape the browser app wrote to `localStorage`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(coords: LatLng) -> Self {
        [coords.lat, coords.lng]
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lng)
    }
}

impl FromStr for LatLng {
    type Err = TrackerError;

    /// Parses `"lat,lng"`, e.g. `"39,-12"` or `"51.5074, -0.1278"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TrackerError::InvalidCoordinates(s.to_string());

        let (lat_str, lng_str) = s.split_once(',').ok_or_else(invalid)?;
        let lat: f64 = lat_str.trim().parse().map_err(|_| invalid())?;
        let lng: f64 = lng_str.trim().parse().map_err(|_| invalid())?;

        if !lat.is_finite() || !lng.is_finite() || lat.abs() > 90.0 || lng.abs() > 180.0 {
            return Err(invalid());
        }
        Ok(LatLng { lat, lng })
    }
}
