//! Arith Drill - A timed mental arithmetic game
//!
//! Core modules:
//! - `sim`: Deterministic game logic (problem generation, session state, transitions)
//! - `settings`: Validated game configuration
//! - `form`: Setup form model (checkbox exclusivity, shared range fields)
//! - `persistence`: Session-scoped settings store
//! - `platform`: Browser timers and storage (wasm32 only)

pub mod form;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use form::SetupForm;
pub use persistence::{KeyValueStore, MemoryStore, SavedSettings, SettingsStore};
pub use settings::{Direction, GameConfig, OperandRange, OperationSpec, TimesTableSpec, ValidationError};

/// Game configuration constants
pub mod consts {
    /// Countdown tick interval
    pub const TICK_MS: i32 = 1000;
    /// Delay between a correct answer and the next problem
    pub const ADVANCE_DELAY_MS: i32 = 50;

    /// Session storage key for saved settings
    pub const SETTINGS_KEY: &str = "zetamacSettings";

    /// Setup form defaults
    pub const DEFAULT_DURATION_SECS: u32 = 120;
    pub const DEFAULT_ADDITION_RANGE: (i64, i64, i64, i64) = (2, 100, 2, 100);
    pub const DEFAULT_MULTIPLICATION_RANGE: (i64, i64, i64, i64) = (2, 12, 2, 100);
    pub const DEFAULT_TIMES_TABLE_NUMBER: i64 = 7;
    pub const DEFAULT_TIMES_TABLE_RANGE: i64 = 12;
}
