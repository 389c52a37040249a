//! Setup form model
//!
//! Mirrors the settings page: one checkbox per operation plus the times-table
//! toggle, two shared range groups and the times-table controls. Addition and
//! subtraction share the addition range; multiplication and division share the
//! multiplication range.

use crate::consts::*;
use crate::persistence::{SavedSettings, StoredOperation};
use crate::settings::{
    Direction, GameConfig, OperandRange, OperationKind, OperationSpec, TimesTableSpec, ValidationError,
};

/// Settings form state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupForm {
    pub duration_secs: u32,
    /// Addition / subtraction bounds
    pub addition_range: OperandRange,
    /// Multiplication / division bounds
    pub multiplication_range: OperandRange,
    pub times_table_number: i64,
    pub times_table_range: i64,
    checked: Vec<OperationKind>,
    times_table: bool,
    directions: Vec<Direction>,
}

impl Default for SetupForm {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            addition_range: DEFAULT_ADDITION_RANGE.into(),
            multiplication_range: DEFAULT_MULTIPLICATION_RANGE.into(),
            times_table_number: DEFAULT_TIMES_TABLE_NUMBER,
            times_table_range: DEFAULT_TIMES_TABLE_RANGE,
            checked: OperationKind::ALL.to_vec(),
            times_table: false,
            directions: vec![Direction::Forward],
        }
    }
}

impl SetupForm {
    pub fn is_checked(&self, kind: OperationKind) -> bool {
        self.checked.contains(&kind)
    }

    pub fn is_times_table(&self) -> bool {
        self.times_table
    }

    pub fn has_direction(&self, direction: Direction) -> bool {
        self.directions.contains(&direction)
    }

    /// Toggle a regular operation; checking one leaves times-table mode
    pub fn set_operation(&mut self, kind: OperationKind, checked: bool) {
        self.checked.retain(|k| *k != kind);
        if checked {
            self.checked.push(kind);
            self.times_table = false;
        }
    }

    /// Toggle times-table mode; turning it on clears the regular operations
    pub fn set_times_table(&mut self, checked: bool) {
        self.times_table = checked;
        if checked {
            self.checked.clear();
        }
    }

    pub fn set_direction(&mut self, direction: Direction, checked: bool) {
        self.directions.retain(|d| *d != direction);
        if checked {
            self.directions.push(direction);
        }
    }

    /// Uncheck every operation checkbox, times table included
    pub fn clear_operations(&mut self) {
        self.checked.clear();
        self.times_table = false;
    }

    /// Bounds field group used by an operation
    pub fn range_for(&self, kind: OperationKind) -> OperandRange {
        match kind {
            OperationKind::Addition | OperationKind::Subtraction => self.addition_range,
            OperationKind::Multiplication | OperationKind::Division => self.multiplication_range,
        }
    }

    fn range_for_mut(&mut self, kind: OperationKind) -> &mut OperandRange {
        match kind {
            OperationKind::Addition | OperationKind::Subtraction => &mut self.addition_range,
            OperationKind::Multiplication | OperationKind::Division => &mut self.multiplication_range,
        }
    }

    /// Build a validated config from the current form contents
    pub fn collect(&self) -> Result<GameConfig, ValidationError> {
        if self.times_table {
            let table = TimesTableSpec::new(
                self.times_table_number,
                self.times_table_range,
                self.directions.iter().copied(),
            );
            return GameConfig::times_table(self.duration_secs, table);
        }

        // Page order, not click order
        let operations = OperationKind::ALL
            .into_iter()
            .filter(|kind| self.is_checked(*kind))
            .map(|kind| OperationSpec::arithmetic(kind, self.range_for(kind)))
            .collect();
        GameConfig::new(self.duration_secs, operations)
    }

    /// Restore previously saved settings into the form
    pub fn apply(&mut self, saved: &SavedSettings) {
        if let Some(duration) = saved.duration.filter(|d| *d > 0) {
            self.duration_secs = duration;
        }

        let Some(operations) = &saved.operations else {
            return;
        };
        self.clear_operations();

        if let Some(table) = &saved.times_table {
            self.set_times_table(true);
            self.times_table_number = table.number;
            self.times_table_range = table.range;
            self.directions = table.directions.clone();
            return;
        }

        for op in operations {
            if let StoredOperation::Range(stored) = op {
                self.set_operation(stored.kind, true);
                *self.range_for_mut(stored.kind) = stored.range();
            }
        }
    }
}
