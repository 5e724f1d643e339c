pub mod workout_store;

pub use workout_store::{SessionRestart, WorkoutStore};
