//! Game transitions
//!
//! `step` is the only place the phase changes. It returns the side effects
//! (timers, storage) the platform layer has to carry out.

use super::answer::evaluate;
use super::state::{GamePhase, GameState};
use crate::consts::ADVANCE_DELAY_MS;
use crate::form::SetupForm;
use crate::settings::{GameConfig, ValidationError};

/// Everything that can happen to the game, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillEvent {
    /// Start a game with a validated config
    Start(GameConfig),
    /// Answer field changed
    Input(String),
    /// Enter pressed in the answer field
    Submit,
    /// One second elapsed
    Tick,
    /// Deferred advance after a correct answer
    Advance { round: u64 },
    /// Exit button (after confirmation)
    Exit,
    /// "Try again" on the game-over panel
    Retry,
    /// "Change settings" on the game-over panel
    ChangeSettings,
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Persist the settings of the game being started
    SaveSettings(GameConfig),
    /// Start the one-second countdown
    StartTicker,
    /// Stop the countdown
    StopTicker,
    /// Fire `DrillEvent::Advance { round }` after `delay_ms`
    ScheduleAdvance { round: u64, delay_ms: i32 },
}

/// Advance the game state by one event
pub fn step(state: &mut GameState, event: DrillEvent) -> Vec<Effect> {
    match event {
        DrillEvent::Start(config) => start(state, config),
        DrillEvent::Input(raw) => input(state, Some(raw)),
        DrillEvent::Submit => input(state, None),
        DrillEvent::Tick => tick(state),
        DrillEvent::Advance { round } => advance(state, round),
        DrillEvent::Exit => match state.phase {
            GamePhase::Playing | GamePhase::Ended => {
                log::info!("Exited to menu");
                state.return_to_setup();
                vec![Effect::StopTicker]
            }
            GamePhase::Setup => ignored("exit", state),
        },
        DrillEvent::Retry => match (state.phase, state.last_config.clone()) {
            (GamePhase::Ended, Some(config)) => start(state, config),
            _ => ignored("retry", state),
        },
        DrillEvent::ChangeSettings => match state.phase {
            GamePhase::Ended => {
                state.return_to_setup();
                Vec::new()
            }
            _ => ignored("change settings", state),
        },
    }
}

/// Collect the setup form and start a game.
///
/// Validation failures leave the state untouched.
pub fn request_start(state: &mut GameState, form: &SetupForm) -> Result<Vec<Effect>, ValidationError> {
    let config = form.collect()?;
    Ok(step(state, DrillEvent::Start(config)))
}

fn ignored(what: &str, state: &GameState) -> Vec<Effect> {
    log::debug!("Ignoring {} in {:?}", what, state.phase);
    Vec::new()
}

fn start(state: &mut GameState, config: GameConfig) -> Vec<Effect> {
    if state.phase == GamePhase::Playing {
        return ignored("start", state);
    }

    log::info!(
        "Game started: {}s, {} operation(s)",
        config.duration_secs(),
        config.operations().len()
    );
    state.begin_session(config.clone());
    vec![Effect::SaveSettings(config), Effect::StartTicker]
}

/// Countdown tick; ends the game when time runs out
pub fn tick(state: &mut GameState) -> Vec<Effect> {
    // A stray timer outside play shuts itself off
    if state.phase != GamePhase::Playing {
        return vec![Effect::StopTicker];
    }
    let Some(session) = state.session.as_mut() else {
        return vec![Effect::StopTicker];
    };

    session.time_left = session.time_left.saturating_sub(1);
    if session.time_left > 0 {
        return Vec::new();
    }

    session.deactivate();
    state.phase = GamePhase::Ended;
    log::info!("Time's up! Final score: {}", session.score);
    vec![Effect::StopTicker]
}

fn input(state: &mut GameState, raw: Option<String>) -> Vec<Effect> {
    if state.phase != GamePhase::Playing {
        return ignored("input", state);
    }
    let Some(session) = state.session.as_mut() else {
        return Vec::new();
    };
    if let Some(raw) = raw {
        session.input = raw;
    }

    if !evaluate(&session.input, session) {
        return Vec::new();
    }

    session.score += 1;
    session.pending_advance = true;
    log::debug!("Correct answer, score {}", session.score);
    vec![Effect::ScheduleAdvance {
        round: session.round,
        delay_ms: ADVANCE_DELAY_MS,
    }]
}

fn advance(state: &mut GameState, round: u64) -> Vec<Effect> {
    if state.phase != GamePhase::Playing {
        return ignored("advance", state);
    }
    let Some(session) = state.session.as_mut() else {
        return Vec::new();
    };
    if !session.active || !session.pending_advance || session.round != round {
        log::debug!("Dropping stale advance for round {}", round);
        return Vec::new();
    }

    session.next_problem(&mut state.rng);
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Direction, OperandRange, OperationSpec, TimesTableSpec};

    fn addition_config(duration: u32) -> GameConfig {
        GameConfig::new(
            duration,
            vec![OperationSpec::Addition(OperandRange::new(1, 5, 1, 5))],
        )
        .unwrap()
    }

    fn playing(duration: u32) -> GameState {
        let mut state = GameState::new(12345);
        let effects = step(&mut state, DrillEvent::Start(addition_config(duration)));
        assert_eq!(
            effects,
            vec![Effect::SaveSettings(addition_config(duration)), Effect::StartTicker]
        );
        state
    }

    fn answer(state: &GameState) -> String {
        state.session.as_ref().unwrap().problem.as_ref().unwrap().answer.to_string()
    }

    #[test]
    fn test_countdown_to_end() {
        let mut state = playing(5);
        for expected in (1..5).rev() {
            assert!(tick(&mut state).is_empty());
            assert_eq!(state.snapshot().time_left, expected);
            assert_eq!(state.phase, GamePhase::Playing);
        }

        assert_eq!(tick(&mut state), vec![Effect::StopTicker]);
        assert_eq!(state.phase, GamePhase::Ended);

        let snap = state.snapshot();
        assert_eq!(snap.time_left, 0);
        assert!(snap.game_over);
        assert_eq!(snap.final_score, Some(0));
    }

    #[test]
    fn test_score_frozen_after_end() {
        let mut state = playing(2);
        let correct = answer(&state);
        step(&mut state, DrillEvent::Input(correct));
        let round = state.session.as_ref().unwrap().round;
        step(&mut state, DrillEvent::Advance { round });

        tick(&mut state);
        tick(&mut state);
        assert_eq!(state.phase, GamePhase::Ended);

        let correct = answer(&state);
        assert!(step(&mut state, DrillEvent::Input(correct)).is_empty());
        // Late ticks change nothing
        assert_eq!(tick(&mut state), vec![Effect::StopTicker]);
        let snap = state.snapshot();
        assert_eq!(snap.final_score, Some(1));
        assert_eq!(snap.time_left, 0);
    }

    #[test]
    fn test_correct_answer_scores_and_advances() {
        let mut state = playing(60);
        let first_round = state.session.as_ref().unwrap().round;

        assert!(step(&mut state, DrillEvent::Input("nope".into())).is_empty());

        let correct = answer(&state);
        let effects = step(&mut state, DrillEvent::Input(correct));
        assert_eq!(
            effects,
            vec![Effect::ScheduleAdvance {
                round: first_round,
                delay_ms: ADVANCE_DELAY_MS
            }]
        );
        assert_eq!(state.snapshot().score, 1);

        step(&mut state, DrillEvent::Advance { round: first_round });
        let session = state.session.as_ref().unwrap();
        assert_eq!(session.round, first_round + 1);
        assert!(session.input.is_empty());
        assert!(!session.pending_advance);
    }

    #[test]
    fn test_double_match_scores_once() {
        let mut state = playing(60);
        let correct = answer(&state);
        step(&mut state, DrillEvent::Input(correct.clone()));
        assert!(step(&mut state, DrillEvent::Input(correct)).is_empty());
        assert!(step(&mut state, DrillEvent::Submit).is_empty());
        assert_eq!(state.snapshot().score, 1);
    }

    #[test]
    fn test_submit_rechecks_buffer() {
        let mut state = playing(60);
        let correct = answer(&state);
        state.session.as_mut().unwrap().input = correct;
        let effects = step(&mut state, DrillEvent::Submit);
        assert_eq!(effects.len(), 1);
        assert_eq!(state.snapshot().score, 1);
    }

    #[test]
    fn test_stale_advance_after_exit_is_noop() {
        let mut state = playing(60);
        let correct = answer(&state);
        step(&mut state, DrillEvent::Input(correct));
        let round = state.session.as_ref().unwrap().round;

        assert_eq!(step(&mut state, DrillEvent::Exit), vec![Effect::StopTicker]);
        assert_eq!(state.phase, GamePhase::Setup);

        assert!(step(&mut state, DrillEvent::Advance { round }).is_empty());
        assert_eq!(state.phase, GamePhase::Setup);
        assert!(state.session.is_none());
    }

    #[test]
    fn test_stale_advance_after_end_is_noop() {
        let mut state = playing(1);
        let correct = answer(&state);
        step(&mut state, DrillEvent::Input(correct));
        let session = state.session.as_ref().unwrap();
        let (round, text) = (session.round, session.problem.clone());

        tick(&mut state);
        assert_eq!(state.phase, GamePhase::Ended);

        step(&mut state, DrillEvent::Advance { round });
        let session = state.session.as_ref().unwrap();
        assert_eq!(session.round, round);
        assert_eq!(session.problem, text);
    }

    #[test]
    fn test_advance_for_old_round_is_dropped() {
        let mut state = playing(60);
        let correct = answer(&state);
        step(&mut state, DrillEvent::Input(correct));
        let round = state.session.as_ref().unwrap().round;
        step(&mut state, DrillEvent::Advance { round: round - 1 });
        assert_eq!(state.session.as_ref().unwrap().round, round);
    }

    #[test]
    fn test_retry_and_change_settings() {
        let mut state = playing(1);
        tick(&mut state);
        assert_eq!(state.phase, GamePhase::Ended);

        let effects = step(&mut state, DrillEvent::Retry);
        assert!(effects.contains(&Effect::StartTicker));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.snapshot().time_left, 1);
        assert_eq!(state.snapshot().score, 0);

        tick(&mut state);
        assert!(step(&mut state, DrillEvent::ChangeSettings).is_empty());
        assert_eq!(state.phase, GamePhase::Setup);
        assert!(state.session.is_none());
    }

    #[test]
    fn test_events_outside_phase_ignored() {
        let mut state = GameState::new(1);
        assert!(step(&mut state, DrillEvent::Retry).is_empty());
        assert!(step(&mut state, DrillEvent::Exit).is_empty());
        assert!(step(&mut state, DrillEvent::Input("3".into())).is_empty());
        assert_eq!(tick(&mut state), vec![Effect::StopTicker]);
        assert_eq!(state.phase, GamePhase::Setup);

        let mut state = playing(60);
        assert!(step(&mut state, DrillEvent::Start(addition_config(10))).is_empty());
        assert!(step(&mut state, DrillEvent::ChangeSettings).is_empty());
        assert_eq!(state.snapshot().time_left, 60);
    }

    #[test]
    fn test_request_start_validation() {
        let mut state = GameState::new(1);
        let mut form = SetupForm::default();
        form.clear_operations();

        assert_eq!(
            request_start(&mut state, &form),
            Err(ValidationError::NoOperationSelected)
        );
        assert_eq!(state.phase, GamePhase::Setup);
        assert!(state.session.is_none());
        assert!(state.last_config.is_none());
    }

    #[test]
    fn test_times_table_session() {
        let mut state = GameState::new(42);
        let config =
            GameConfig::times_table(60, TimesTableSpec::new(7, 12, [Direction::Forward])).unwrap();
        step(&mut state, DrillEvent::Start(config));

        for _ in 0..20 {
            let text = state.snapshot().problem_text;
            assert!(text.starts_with("7 × "), "{text}");
            let correct = answer(&state);
            step(&mut state, DrillEvent::Input(correct));
            let round = state.session.as_ref().unwrap().round;
            step(&mut state, DrillEvent::Advance { round });
        }
        assert_eq!(state.snapshot().score, 20);
    }
}
