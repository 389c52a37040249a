//! Problem generation
//!
//! Every draw goes through an injected unit source (`FnMut() -> f64` in [0, 1)),
//! so a fixed sequence reproduces the exact same problem.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::settings::{Direction, GameConfig, OperandRange, OperationSpec, TimesTableSpec};

/// A single question and its answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Display text without the trailing `=`
    pub text: String,
    pub answer: i64,
}

impl Problem {
    fn new(text: String, answer: i64) -> Self {
        Self { text, answer }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} =", self.text)
    }
}

/// Uniform index in `0..len` from one unit draw
#[inline]
fn pick_index(unit: &mut impl FnMut() -> f64, len: usize) -> usize {
    let idx = (unit() * len as f64).floor() as usize;
    idx.min(len.saturating_sub(1))
}

/// Uniform integer in `min..=max` from one unit draw.
///
/// An empty or inverted range yields `min` and still consumes its draw.
#[inline]
fn draw_between(unit: &mut impl FnMut() -> f64, min: i64, max: i64) -> i64 {
    if max <= min {
        let _ = unit();
        return min;
    }
    let span = (max - min + 1) as f64;
    let offset = (unit() * span).floor() as i64;
    min + offset.clamp(0, max - min)
}

/// Generate the next problem for a configuration
pub fn generate(config: &GameConfig, unit: &mut impl FnMut() -> f64) -> Problem {
    match config.times_table_spec() {
        Some(table) => times_table_problem(table, unit),
        None => {
            let ops = config.operations();
            let op = &ops[pick_index(unit, ops.len())];
            arithmetic_problem(op, unit)
        }
    }
}

/// Generate a times-table problem
pub fn times_table_problem(table: &TimesTableSpec, unit: &mut impl FnMut() -> f64) -> Problem {
    let direction = table.directions[pick_index(unit, table.directions.len())];
    let number = table.number;
    let other = draw_between(unit, 1, table.range);

    match direction {
        Direction::Forward => Problem::new(format!("{number} × {other}"), number * other),
        Direction::Reverse => Problem::new(format!("{other} × {number}"), other * number),
        Direction::Division => {
            let product = number * other;
            if unit() < 0.5 {
                Problem::new(format!("{product} ÷ {number}"), other)
            } else {
                Problem::new(format!("{product} ÷ {other}"), number)
            }
        }
    }
}

fn draw_operands(range: &OperandRange, unit: &mut impl FnMut() -> f64) -> (i64, i64) {
    let x = draw_between(unit, range.min1, range.max1);
    let y = draw_between(unit, range.min2, range.max2);
    (x, y)
}

/// Generate a range-driven problem; the times table falls through to its own generator
pub fn arithmetic_problem(op: &OperationSpec, unit: &mut impl FnMut() -> f64) -> Problem {
    match op {
        OperationSpec::Addition(range) => {
            let (x, y) = draw_operands(range, unit);
            Problem::new(format!("{x} + {y}"), x + y)
        }
        OperationSpec::Subtraction(range) => {
            let (x, y) = draw_operands(range, unit);
            // Larger first so the result is never negative
            let (hi, lo) = (x.max(y), x.min(y));
            Problem::new(format!("{hi} - {lo}"), hi - lo)
        }
        OperationSpec::Multiplication(range) => {
            let (x, y) = draw_operands(range, unit);
            Problem::new(format!("{x} × {y}"), x * y)
        }
        OperationSpec::Division(range) => {
            // Built from a product so the quotient is always whole
            let (x, y) = draw_operands(range, unit);
            let dividend = x * y;
            Problem::new(format!("{dividend} ÷ {x}"), y)
        }
        OperationSpec::TimesTable(table) => times_table_problem(table, unit),
    }
}
