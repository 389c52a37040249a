//! Game state and session types
//!
//! Everything the front end renders is read from here through `Snapshot`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::problem::{Problem, generate};
use crate::settings::GameConfig;

/// Current screen of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Settings form is shown
    Setup,
    /// Timer running, answers accepted
    Playing,
    /// Time is up, score frozen
    Ended,
}

/// One play-through from start to end or exit
#[derive(Debug, Clone)]
pub struct GameSession {
    pub config: GameConfig,
    pub score: u32,
    pub time_left: u32,
    pub problem: Option<Problem>,
    /// Raw contents of the answer field
    pub input: String,
    pub active: bool,
    /// Problems shown so far; tags deferred advances
    pub round: u64,
    /// A correct answer is waiting for its deferred advance
    pub pending_advance: bool,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Self {
        Self {
            time_left: config.duration_secs(),
            config,
            score: 0,
            problem: None,
            input: String::new(),
            active: true,
            round: 0,
            pending_advance: false,
        }
    }

    /// Replace the current problem and clear the answer field
    pub fn next_problem(&mut self, rng: &mut Pcg32) {
        self.problem = Some(generate(&self.config, &mut || rng.random::<f64>()));
        self.round += 1;
        self.input.clear();
        self.pending_advance = false;
    }

    /// Stop accepting input (time up or exit)
    pub fn deactivate(&mut self) {
        self.active = false;
        self.pending_advance = false;
    }
}

/// Read-only view of the state for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u32,
    pub time_left: u32,
    /// Problem text with trailing `=`, empty when there is none
    pub problem_text: String,
    pub input: String,
    pub game_over: bool,
    pub final_score: Option<u32>,
}

/// Complete game state owned by the front end
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub session: Option<GameSession>,
    /// Config of the most recent start, reused by retry
    pub last_config: Option<GameConfig>,
}

impl GameState {
    /// Create a new game state on the setup screen
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Setup,
            session: None,
            last_config: None,
        }
    }

    /// Begin a fresh session with the first problem installed
    pub fn begin_session(&mut self, config: GameConfig) {
        let mut session = GameSession::new(config.clone());
        session.next_problem(&mut self.rng);
        self.session = Some(session);
        self.last_config = Some(config);
        self.phase = GamePhase::Playing;
    }

    /// Drop any session and return to the settings form
    pub fn return_to_setup(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.deactivate();
        }
        self.session = None;
        self.phase = GamePhase::Setup;
    }

    pub fn snapshot(&self) -> Snapshot {
        let game_over = self.phase == GamePhase::Ended;
        match &self.session {
            Some(session) => Snapshot {
                phase: self.phase,
                score: session.score,
                time_left: session.time_left,
                problem_text: session
                    .problem
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                input: session.input.clone(),
                game_over,
                final_score: game_over.then_some(session.score),
            },
            None => Snapshot {
                phase: self.phase,
                score: 0,
                time_left: 0,
                problem_text: String::new(),
                input: String::new(),
                game_over,
                final_score: None,
            },
        }
    }
}
