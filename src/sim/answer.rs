//! Live answer checking

use super::problem::Problem;
use super::state::GameSession;

/// Parse the leading integer of the answer field.
///
/// Leading whitespace and a sign are accepted; anything after the digits is
/// ignored, so `"7.0"` and `"7 "` both read as 7.
pub fn parse_answer(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let sign = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    s[..sign + digits].parse().ok()
}

/// Whether `raw` is exactly the answer to `problem`
pub fn matches_problem(raw: &str, problem: &Problem) -> bool {
    parse_answer(raw) == Some(problem.answer)
}

/// Check live input against the session's current problem.
///
/// Inactive sessions, missing problems, unparsable input and a correct answer
/// already waiting on its advance all report no match.
pub fn evaluate(raw: &str, session: &GameSession) -> bool {
    if !session.active || session.pending_advance {
        return false;
    }
    session
        .problem
        .as_ref()
        .is_some_and(|problem| matches_problem(raw, problem))
}
