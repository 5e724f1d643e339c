pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;

pub use config::{DeletePolicy, TrackerConfig};
pub use controller::WorkoutController;
pub use controller::alert::{Alerter, QueuedAlerts};
pub use controller::form::{validate, Form, FormField, FormState, Submission};
pub use controller::geolocation::{FixedPosition, GeolocationProvider};
pub use controller::list::{Detail, ListRow, TargetRole};
pub use controller::map::{MapAdapter, MarkerHandle, PanAnimation, Popup};
pub use error::TrackerError;
pub use input::{parse_args, expand_key, parse_number, ParsedInput};
pub use model::geo::LatLng;
pub use model::workout::{Measure, Workout, WorkoutKind, WorkoutType};
pub use repository::{FileStorage, KeyValueStorage, MemoryStorage};
pub use service::{SessionRestart, WorkoutStore};
