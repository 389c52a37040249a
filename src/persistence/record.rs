//! Stored settings record
//!
//! JSON shape: `{"duration": 120, "operations": [...], "timesTable": {...} | null}`.
//! Regular operations are stored as `{type, min1, max1, min2, max2}`; in
//! times-table mode `operations` holds the marker `["timesTable"]`.

use serde::{Deserialize, Serialize};

use crate::form::SetupForm;
use crate::settings::{GameConfig, OperandRange, OperationKind, TimesTableSpec};

/// Marker entry in `operations` for times-table mode
pub const TIMES_TABLE_MARKER: &str = "timesTable";

/// A range-driven operation as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRange {
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub min1: i64,
    pub max1: i64,
    pub min2: i64,
    pub max2: i64,
}

impl StoredRange {
    pub fn range(&self) -> OperandRange {
        OperandRange::new(self.min1, self.max1, self.min2, self.max2)
    }
}

/// One entry of the stored `operations` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredOperation {
    Range(StoredRange),
    Marker(String),
}

/// Settings as written to session storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSettings {
    pub duration: Option<u32>,
    pub operations: Option<Vec<StoredOperation>>,
    #[serde(rename = "timesTable")]
    pub times_table: Option<TimesTableSpec>,
}

impl SavedSettings {
    /// Record for a started game's config
    pub fn from_config(config: &GameConfig) -> Self {
        if let Some(table) = config.times_table_spec() {
            return Self {
                duration: Some(config.duration_secs()),
                operations: Some(vec![StoredOperation::Marker(TIMES_TABLE_MARKER.to_string())]),
                times_table: Some(table.clone()),
            };
        }

        let operations = config
            .operations()
            .iter()
            .filter_map(|op| op.as_arithmetic())
            .map(|(kind, range)| {
                StoredOperation::Range(StoredRange {
                    kind,
                    min1: range.min1,
                    max1: range.max1,
                    min2: range.min2,
                    max2: range.max2,
                })
            })
            .collect();

        Self {
            duration: Some(config.duration_secs()),
            operations: Some(operations),
            times_table: None,
        }
    }

    /// Re-apply to a default form and collect; `None` if that no longer validates
    pub fn to_config(&self) -> Option<GameConfig> {
        let mut form = SetupForm::default();
        form.apply(self);
        form.collect().ok()
    }
}
