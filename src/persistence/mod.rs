//! Session-scoped settings persistence
//!
//! Features:
//! - Key-value backend trait (browser session storage or in-memory)
//! - Single JSON record under `zetamacSettings`
//! - Missing or corrupt data reads as "no saved settings"

pub mod record;

pub use record::{SavedSettings, StoredOperation, StoredRange, TIMES_TABLE_MARKER};

use std::collections::HashMap;

use thiserror::Error;

use crate::consts::SETTINGS_KEY;
use crate::settings::GameConfig;

/// Storage failures; never shown to the user
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("storage unavailable")]
    Unavailable,

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("malformed settings record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Minimal string key-value store
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
    fn remove_item(&mut self, key: &str) -> Result<(), PersistenceError>;
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Load/save the settings record through a key-value backend
#[derive(Debug)]
pub struct SettingsStore<S> {
    backend: S,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    fn try_load(&self) -> Result<Option<SavedSettings>, PersistenceError> {
        match self.backend.get_item(SETTINGS_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Saved settings, if any are present and readable
    pub fn load(&self) -> Option<SavedSettings> {
        match self.try_load() {
            Ok(Some(saved)) => {
                log::info!("Loaded settings from session storage");
                Some(saved)
            }
            Ok(None) => {
                log::debug!("No saved settings found");
                None
            }
            Err(e) => {
                log::debug!("Ignoring saved settings: {}", e);
                None
            }
        }
    }

    /// Saved settings turned back into a validated config
    pub fn load_config(&self) -> Option<GameConfig> {
        self.load().and_then(|saved| saved.to_config())
    }

    fn try_save(&mut self, config: &GameConfig) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(&SavedSettings::from_config(config))?;
        self.backend.set_item(SETTINGS_KEY, &json)
    }

    /// Persist the settings of a started game; failures are only logged
    pub fn save(&mut self, config: &GameConfig) {
        match self.try_save(config) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Error saving settings: {}", e),
        }
    }

    pub fn clear(&mut self) {
        if let Err(e) = self.backend.remove_item(SETTINGS_KEY) {
            log::warn!("Error clearing settings: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::SetupForm;
    use crate::settings::{Direction, OperandRange, OperationKind};

    /// Backend whose every call fails
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>, PersistenceError> {
            Err(PersistenceError::Unavailable)
        }
        fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), PersistenceError> {
            Err(PersistenceError::Backend("quota exceeded".into()))
        }
        fn remove_item(&mut self, _key: &str) -> Result<(), PersistenceError> {
            Err(PersistenceError::Unavailable)
        }
    }

    fn round_trip(form: &SetupForm) {
        let config = form.collect().unwrap();
        let mut store = SettingsStore::new(MemoryStore::new());
        store.save(&config);

        let saved = store.load().unwrap();
        let mut restored = SetupForm::default();
        restored.apply(&saved);
        assert_eq!(restored.collect().unwrap(), config);
        assert_eq!(store.load_config(), Some(config));
    }

    #[test]
    fn test_round_trip_regular() {
        let mut form = SetupForm::default();
        form.duration_secs = 30;
        form.clear_operations();
        form.set_operation(OperationKind::Subtraction, true);
        form.set_operation(OperationKind::Multiplication, true);
        form.addition_range = OperandRange::new(5, 50, 1, 9);
        form.multiplication_range = OperandRange::new(3, 7, 11, 13);
        round_trip(&form);
    }

    #[test]
    fn test_round_trip_times_table() {
        let mut form = SetupForm::default();
        form.set_times_table(true);
        form.times_table_number = 9;
        form.times_table_range = 15;
        form.set_direction(Direction::Reverse, true);
        form.set_direction(Direction::Division, true);
        round_trip(&form);
    }

    #[test]
    fn test_round_trip_defaults() {
        round_trip(&SetupForm::default());
    }

    #[test]
    fn test_absent_and_corrupt() {
        let mut store = SettingsStore::new(MemoryStore::new());
        assert_eq!(store.load(), None);

        store.backend_mut().set_item(SETTINGS_KEY, "{not json").unwrap();
        assert_eq!(store.load(), None);

        store.backend_mut().set_item(SETTINGS_KEY, r#"{"duration":"soon"}"#).unwrap();
        assert_eq!(store.load(), None);
        assert_eq!(store.load_config(), None);
    }

    #[test]
    fn test_broken_backend_degrades() {
        let mut store = SettingsStore::new(BrokenStore);
        assert_eq!(store.load(), None);
        store.save(&SetupForm::default().collect().unwrap());
        store.clear();
    }

    #[test]
    fn test_clear() {
        let mut store = SettingsStore::new(MemoryStore::new());
        store.save(&SetupForm::default().collect().unwrap());
        assert!(store.load().is_some());
        store.clear();
        assert!(store.backend().get_item(SETTINGS_KEY).unwrap().is_none());
    }
}
