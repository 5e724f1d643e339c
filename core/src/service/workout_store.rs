use anyhow::Result;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_STORAGE_KEY;
use crate::error::TrackerError;
use crate::model::workout::Workout;
use crate::repository::KeyValueStorage;

/// Returned by [`WorkoutStore::reset`]; the caller should start a fresh session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct SessionRestart;

/// Ordered workouts in memory, mirrored to one storage key as a JSON array.
pub struct WorkoutStore<S: KeyValueStorage> {
    storage: S,
    key: String,
    workouts: Vec<Workout>,
}

impl<S: KeyValueStorage> WorkoutStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            workouts: Vec::new(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn find(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn add(&mut self, workout: Workout) {
        debug!(id = workout.id(), kind = %workout.workout_type(), "workout added");
        self.workouts.push(workout);
    }

    /// Removes the first workout with `id`. Unknown ids are ignored.
    pub fn remove(&mut self, id: &str) -> Option<Workout> {
        let pos = self.workouts.iter().position(|w| w.id() == id)?;
        let removed = self.workouts.remove(pos);
        debug!(id, "workout removed");
        Some(removed)
    }

    pub fn persist(&self) -> Result<()> {
        let blob = serde_json::to_string(&self.workouts)?;
        self.storage.set_item(&self.key, &blob)?;
        debug!(count = self.workouts.len(), "workouts persisted");
        Ok(())
    }

    /// Replaces the in-memory workouts with the persisted ones.
    ///
    /// Missing, unreadable or malformed data counts as "nothing saved" and
    /// leaves memory untouched. Returns how many workouts were loaded.
    pub fn load_from_persistent(&mut self) -> usize {
        match self.read_persisted() {
            Ok(Some(workouts)) => {
                info!(count = workouts.len(), "workouts loaded");
                self.workouts = workouts;
                self.workouts.len()
            }
            Ok(None) => 0,
            Err(e) => {
                warn!(error = %e, "ignoring persisted workouts");
                0
            }
        }
    }

    fn read_persisted(&self) -> Result<Option<Vec<Workout>>, TrackerError> {
        let Some(blob) = self.storage.get_item(&self.key)? else {
            return Ok(None);
        };
        // The browser app stored `null` after a failed write; treat it as absent.
        let workouts: Option<Vec<Workout>> = serde_json::from_str(&blob)?;
        Ok(workouts)
    }

    /// Drops the persisted key without touching memory.
    pub fn discard_persisted(&self) -> Result<()> {
        self.storage.remove_item(&self.key)?;
        debug!(key = %self.key, "persisted workouts discarded");
        Ok(())
    }

    pub fn reset(&mut self) -> Result<SessionRestart> {
        self.discard_persisted()?;
        self.workouts.clear();
        info!("workouts reset");
        Ok(SessionRestart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::geo::LatLng;
    use crate::repository::MemoryStorage;

    fn run(distance: f64) -> Workout {
        Workout::running(LatLng::new(39.0, -12.0), distance, 25.0, 180.0)
    }

    fn ride(distance: f64) -> Workout {
        Workout::cycling(LatLng::new(40.0, -8.0), distance, 30.0, 150.0)
    }

    #[test]
    fn test_add_keeps_insertion_order_and_duplicates() {
        let mut store = WorkoutStore::new(MemoryStorage::new());
        let a = run(5.0);
        let b = ride(10.0);
        store.add(a.clone());
        store.add(b.clone());
        store.add(a.clone());

        assert_eq!(store.len(), 3);
        assert_eq!(store.workouts()[0], a);
        assert_eq!(store.workouts()[1], b);
        assert_eq!(store.find(b.id()), Some(&b));
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut store = WorkoutStore::new(MemoryStorage::new());
        store.add(run(5.0));
        store.add(ride(10.0));
        let before = store.workouts().to_vec();

        assert!(store.remove("no-such-id").is_none());
        assert_eq!(store.workouts(), before.as_slice());
    }

    #[test]
    fn test_remove_first_match() {
        let mut store = WorkoutStore::new(MemoryStorage::new());
        let a = run(5.0);
        store.add(a.clone());
        store.add(ride(10.0));

        let removed = store.remove(a.id()).unwrap();
        assert_eq!(removed, a);
        assert_eq!(store.len(), 1);
        assert!(store.find(a.id()).is_none());
    }

    #[test]
    fn test_persist_then_load_round_trip() {
        let storage = MemoryStorage::new();
        let mut store = WorkoutStore::new(storage.clone());
        store.add(run(5.0));
        store.add(ride(10.0));
        store.persist().unwrap();

        let mut reloaded = WorkoutStore::new(storage);
        assert_eq!(reloaded.load_from_persistent(), 2);
        assert_eq!(reloaded.workouts(), store.workouts());
    }

    #[test]
    fn test_load_missing_is_empty() {
        let mut store = WorkoutStore::new(MemoryStorage::new());
        assert_eq!(store.load_from_persistent(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_malformed_is_empty() {
        let storage = MemoryStorage::new();
        storage.set_item("workout", "{not json").unwrap();
        let mut store = WorkoutStore::new(storage.clone());
        assert_eq!(store.load_from_persistent(), 0);
        assert!(store.is_empty());

        storage.set_item("workout", r#"[{"type":"swimming"}]"#).unwrap();
        assert_eq!(store.load_from_persistent(), 0);

        storage.set_item("workout", "null").unwrap();
        assert_eq!(store.load_from_persistent(), 0);
    }

    #[test]
    fn test_load_replaces_wholesale() {
        let storage = MemoryStorage::new();
        let mut first = WorkoutStore::new(storage.clone());
        first.add(run(5.0));
        first.persist().unwrap();

        let mut second = WorkoutStore::new(storage);
        second.add(ride(1.0));
        second.add(ride(2.0));
        assert_eq!(second.load_from_persistent(), 1);
        assert_eq!(second.workouts(), first.workouts());
    }

    #[test]
    fn test_custom_key() {
        let storage = MemoryStorage::new();
        let mut store = WorkoutStore::with_key(storage.clone(), "workouts-v2");
        store.add(run(5.0));
        store.persist().unwrap();
        assert!(storage.get_item("workout").unwrap().is_none());
        assert!(storage.get_item("workouts-v2").unwrap().is_some());
    }

    #[test]
    fn test_reset_clears_storage_and_memory() {
        let storage = MemoryStorage::new();
        let mut store = WorkoutStore::new(storage.clone());
        store.add(run(5.0));
        store.persist().unwrap();

        assert_eq!(store.reset().unwrap(), SessionRestart);
        assert!(store.is_empty());
        assert!(storage.is_empty());
    }
}
