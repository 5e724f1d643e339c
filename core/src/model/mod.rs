pub mod geo;
pub mod workout;
