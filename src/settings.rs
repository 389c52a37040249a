//! Game settings
//!
//! A `GameConfig` can only be built through validation, so a running session
//! never has to re-check its operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest operand bound accepted by validation (keeps products well inside i64)
pub const MAX_OPERAND: i64 = 1_000_000;

/// Errors shown to the user when the setup form cannot start a game
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select at least one operation and ensure all settings are valid.")]
    NoOperationSelected,

    #[error("Please select at least one direction for times table practice.")]
    NoTimesTableDirection,

    #[error("Times table practice cannot be combined with other operations.")]
    TimesTableNotExclusive,

    #[error("Duration must be at least one second.")]
    ZeroDuration,

    #[error("Invalid {operation} range: {reason}")]
    InvalidRange {
        operation: &'static str,
        reason: &'static str,
    },

    #[error("Invalid times table: {0}")]
    InvalidTimesTable(&'static str),
}

/// Phrasing of a times-table problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// `n × k`
    Forward,
    /// `k × n`
    Reverse,
    /// `n·k ÷ n` or `n·k ÷ k`
    Division,
}

impl Direction {
    pub const ALL: [Direction; 3] = [Direction::Forward, Direction::Reverse, Direction::Division];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
            Direction::Division => "division",
        }
    }
}

/// The four range-driven operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl OperationKind {
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Addition,
        OperationKind::Subtraction,
        OperationKind::Multiplication,
        OperationKind::Division,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Addition => "addition",
            OperationKind::Subtraction => "subtraction",
            OperationKind::Multiplication => "multiplication",
            OperationKind::Division => "division",
        }
    }
}

/// Inclusive operand bounds for a range-driven operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperandRange {
    pub min1: i64,
    pub max1: i64,
    pub min2: i64,
    pub max2: i64,
}

impl OperandRange {
    pub fn new(min1: i64, max1: i64, min2: i64, max2: i64) -> Self {
        Self { min1, max1, min2, max2 }
    }

    fn validate(&self, kind: OperationKind) -> Result<(), ValidationError> {
        let invalid = |reason| ValidationError::InvalidRange {
            operation: kind.as_str(),
            reason,
        };

        if self.min1 > self.max1 || self.min2 > self.max2 {
            return Err(invalid("minimum is greater than maximum"));
        }
        if self.min1 < 0 || self.min2 < 0 {
            return Err(invalid("operands must not be negative"));
        }
        if self.max1 > MAX_OPERAND || self.max2 > MAX_OPERAND {
            return Err(invalid("operands are too large"));
        }
        // The first operand is the divisor
        if kind == OperationKind::Division && self.min1 < 1 {
            return Err(invalid("divisor range must not include zero"));
        }
        Ok(())
    }
}

impl From<(i64, i64, i64, i64)> for OperandRange {
    fn from((min1, max1, min2, max2): (i64, i64, i64, i64)) -> Self {
        Self::new(min1, max1, min2, max2)
    }
}

/// Times-table drill: one fixed factor, the other drawn from `1..=range`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimesTableSpec {
    pub number: i64,
    pub range: i64,
    pub directions: Vec<Direction>,
}

impl TimesTableSpec {
    pub fn new(number: i64, range: i64, directions: impl IntoIterator<Item = Direction>) -> Self {
        Self {
            number,
            range,
            directions: directions.into_iter().collect(),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.directions.is_empty() {
            return Err(ValidationError::NoTimesTableDirection);
        }
        if self.range < 1 {
            return Err(ValidationError::InvalidTimesTable("range must be at least 1"));
        }
        if self.number < 0 {
            return Err(ValidationError::InvalidTimesTable("number must not be negative"));
        }
        // Division problems divide by the number itself
        if self.number == 0 && self.directions.contains(&Direction::Division) {
            return Err(ValidationError::InvalidTimesTable("number must be at least 1 for division"));
        }
        if self.number > MAX_OPERAND || self.range > MAX_OPERAND {
            return Err(ValidationError::InvalidTimesTable("values are too large"));
        }
        Ok(())
    }

    /// Directions form a set: sort into canonical order and drop repeats
    fn normalize(&mut self) {
        self.directions.sort();
        self.directions.dedup();
    }
}

/// One selectable problem family
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationSpec {
    Addition(OperandRange),
    Subtraction(OperandRange),
    Multiplication(OperandRange),
    Division(OperandRange),
    TimesTable(TimesTableSpec),
}

impl OperationSpec {
    /// Build a range-driven operation of the given kind
    pub fn arithmetic(kind: OperationKind, range: OperandRange) -> Self {
        match kind {
            OperationKind::Addition => OperationSpec::Addition(range),
            OperationKind::Subtraction => OperationSpec::Subtraction(range),
            OperationKind::Multiplication => OperationSpec::Multiplication(range),
            OperationKind::Division => OperationSpec::Division(range),
        }
    }

    /// Kind and bounds, or `None` for the times table
    pub fn as_arithmetic(&self) -> Option<(OperationKind, &OperandRange)> {
        match self {
            OperationSpec::Addition(r) => Some((OperationKind::Addition, r)),
            OperationSpec::Subtraction(r) => Some((OperationKind::Subtraction, r)),
            OperationSpec::Multiplication(r) => Some((OperationKind::Multiplication, r)),
            OperationSpec::Division(r) => Some((OperationKind::Division, r)),
            OperationSpec::TimesTable(_) => None,
        }
    }

    pub fn is_times_table(&self) -> bool {
        matches!(self, OperationSpec::TimesTable(_))
    }
}

/// Validated settings for one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    duration_secs: u32,
    operations: Vec<OperationSpec>,
}

impl GameConfig {
    /// Validate and build a configuration
    pub fn new(duration_secs: u32, mut operations: Vec<OperationSpec>) -> Result<Self, ValidationError> {
        if operations.is_empty() {
            return Err(ValidationError::NoOperationSelected);
        }
        if operations.len() > 1 && operations.iter().any(OperationSpec::is_times_table) {
            return Err(ValidationError::TimesTableNotExclusive);
        }

        for op in &mut operations {
            match op {
                OperationSpec::TimesTable(table) => {
                    table.validate()?;
                    table.normalize();
                }
                other => {
                    if let Some((kind, range)) = other.as_arithmetic() {
                        range.validate(kind)?;
                    }
                }
            }
        }

        if duration_secs == 0 {
            return Err(ValidationError::ZeroDuration);
        }

        Ok(Self {
            duration_secs,
            operations,
        })
    }

    /// Times-table configuration shortcut
    pub fn times_table(duration_secs: u32, table: TimesTableSpec) -> Result<Self, ValidationError> {
        Self::new(duration_secs, vec![OperationSpec::TimesTable(table)])
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn operations(&self) -> &[OperationSpec] {
        &self.operations
    }

    /// Times-table settings when this config is in times-table mode
    pub fn times_table_spec(&self) -> Option<&TimesTableSpec> {
        match self.operations.as_slice() {
            [OperationSpec::TimesTable(table)] => Some(table),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addition() -> OperationSpec {
        OperationSpec::Addition(OperandRange::new(1, 5, 1, 5))
    }

    #[test]
    fn test_empty_operations_rejected() {
        assert_eq!(GameConfig::new(60, vec![]), Err(ValidationError::NoOperationSelected));
    }

    #[test]
    fn test_times_table_requires_direction() {
        let table = TimesTableSpec::new(7, 12, Vec::<Direction>::new());
        assert_eq!(
            GameConfig::times_table(60, table),
            Err(ValidationError::NoTimesTableDirection)
        );
    }

    #[test]
    fn test_times_table_is_exclusive() {
        let table = TimesTableSpec::new(7, 12, [Direction::Forward]);
        let result = GameConfig::new(60, vec![addition(), OperationSpec::TimesTable(table)]);
        assert_eq!(result, Err(ValidationError::TimesTableNotExclusive));
    }

    #[test]
    fn test_range_checks() {
        let inverted = OperationSpec::Addition(OperandRange::new(5, 1, 1, 5));
        assert!(matches!(
            GameConfig::new(60, vec![inverted]),
            Err(ValidationError::InvalidRange { operation: "addition", .. })
        ));

        let zero_divisor = OperationSpec::Division(OperandRange::new(0, 12, 1, 12));
        assert!(matches!(
            GameConfig::new(60, vec![zero_divisor]),
            Err(ValidationError::InvalidRange { operation: "division", .. })
        ));

        // Zero is fine as a multiplication operand
        let mul = OperationSpec::Multiplication(OperandRange::new(0, 12, 0, 12));
        assert!(GameConfig::new(60, vec![mul]).is_ok());
    }

    #[test]
    fn test_zero_duration_rejected() {
        assert_eq!(GameConfig::new(0, vec![addition()]), Err(ValidationError::ZeroDuration));
    }

    #[test]
    fn test_directions_normalized() {
        let table = TimesTableSpec::new(
            3,
            10,
            [Direction::Division, Direction::Forward, Direction::Division],
        );
        let config = GameConfig::times_table(30, table).unwrap();
        let spec = config.times_table_spec().unwrap();
        assert_eq!(spec.directions, vec![Direction::Forward, Direction::Division]);
    }

    #[test]
    fn test_zero_times_table_number() {
        let division = TimesTableSpec::new(0, 12, [Direction::Forward, Direction::Division]);
        assert!(matches!(
            GameConfig::times_table(60, division),
            Err(ValidationError::InvalidTimesTable(_))
        ));

        // 0 × k is still a fair question
        let forward = TimesTableSpec::new(0, 12, [Direction::Forward, Direction::Reverse]);
        assert!(GameConfig::times_table(60, forward).is_ok());
    }

    #[test]
    fn test_names_match_stored_form() {
        for dir in Direction::ALL {
            assert_eq!(serde_json::to_string(&dir).unwrap(), format!("\"{}\"", dir.as_str()));
        }
        for kind in OperationKind::ALL {
            assert_eq!(serde_json::to_string(&kind).unwrap(), format!("\"{}\"", kind.as_str()));
        }
    }
}
