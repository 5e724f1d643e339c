use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::TrackerError;

pub const DEFAULT_STORAGE_KEY: &str = "workout";
pub const DEFAULT_ZOOM_LEVEL: u8 = 13;

/// What happens to persisted data when a single workout is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Write the remaining workouts back.
    #[default]
    Repersist,
    /// Drop the whole persisted key, as the browser app did. Remaining
    /// workouts stay on screen but are gone after the next restart.
    ClearAll,
}

impl fmt::Display for DeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeletePolicy::Repersist => f.write_str("repersist"),
            DeletePolicy::ClearAll => f.write_str("clear-all"),
        }
    }
}

impl FromStr for DeletePolicy {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "repersist" => Ok(DeletePolicy::Repersist),
            "clear-all" | "clear_all" | "clearall" => Ok(DeletePolicy::ClearAll),
            _ => Err(TrackerError::UnknownDeletePolicy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub zoom_level: u8,
    /// How long the form stays out of the layout after being hidden.
    pub form_restore_delay: Duration,
    /// Pan animation used when jumping to a workout from the list.
    pub pan_duration: Duration,
    pub delete_policy: DeletePolicy,
    pub storage_key: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            zoom_level: DEFAULT_ZOOM_LEVEL,
            form_restore_delay: Duration::from_millis(1000),
            pan_duration: Duration::from_secs(1),
            delete_policy: DeletePolicy::default(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_policy_from_str() {
        assert_eq!("repersist".parse::<DeletePolicy>().unwrap(), DeletePolicy::Repersist);
        assert_eq!("Clear-All".parse::<DeletePolicy>().unwrap(), DeletePolicy::ClearAll);
        assert!("sometimes".parse::<DeletePolicy>().is_err());
    }

    #[test]
    fn test_defaults_match_browser_app() {
        let config = TrackerConfig::default();
        assert_eq!(config.zoom_level, 13);
        assert_eq!(config.form_restore_delay, Duration::from_millis(1000));
        assert_eq!(config.storage_key, "workout");
        assert_eq!(config.delete_policy, DeletePolicy::Repersist);
    }
}
