//! Fixed-timestep frame driver
//!
//! Converts wall-clock frame deltas into whole simulation ticks, feeds the
//! held input (or the autopilot) into each tick, and owns the restart loop:
//! a finished arena is replaced by a fresh one, never re-entered.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::highscores::HighScores;
use crate::sim::{Arena, Snapshot, TickInput, autopilot_input, step};
use crate::tuning::Tuning;

/// Largest frame delta accepted (seconds); longer stalls are dropped
const MAX_FRAME_DT: f32 = 0.1;

/// Drives one arena at a time at a fixed rate
pub struct FrameDriver {
    pub arena: Arena,
    /// Held input, sampled by the platform layer between frames
    pub input: TickInput,
    /// Idle/demo mode - autopilot replaces `input`
    pub autopilot: bool,
    pub high_scores: HighScores,
    tuning: Tuning,
    accumulator: f32,
    /// Rank achieved by the last finished session (if it placed)
    last_rank: Option<usize>,
    /// Whether the current arena's result is already on the board
    recorded: bool,
    sessions: u32,
}

impl FrameDriver {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        log::info!("Session 1 starting with seed: {}", seed);
        Self {
            arena: Arena::with_tuning(seed, tuning.clone()),
            input: TickInput::default(),
            autopilot: false,
            high_scores: HighScores::new(),
            tuning,
            accumulator: 0.0,
            last_rank: None,
            recorded: false,
            sessions: 1,
        }
    }

    /// Run as many whole ticks as `dt` seconds cover; returns how many ran
    pub fn advance(&mut self, dt: f32) -> u32 {
        if self.arena.is_terminal() {
            self.accumulator = 0.0;
            return 0;
        }

        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = if self.autopilot {
                autopilot_input(&self.arena)
            } else {
                self.input.clone()
            };
            let report = step(&mut self.arena, &input);
            self.accumulator -= SIM_DT;
            substeps += 1;

            if report.ended {
                self.record_result();
                self.accumulator = 0.0;
                break;
            }
        }
        log::trace!("advanced {} ticks", substeps);

        substeps
    }

    /// Put the current arena's result on the board; later calls are no-ops
    pub fn record_result(&mut self) {
        if self.recorded {
            return;
        }
        self.recorded = true;
        let arena = &self.arena;
        self.last_rank = self
            .high_scores
            .add_score(arena.score, arena.time_ticks, arena.seed);
        match self.last_rank {
            Some(rank) => log::info!(
                "Game over: score {} after {} ticks (rank #{})",
                arena.score,
                arena.time_ticks,
                rank
            ),
            None => log::info!(
                "Game over: score {} after {} ticks",
                arena.score,
                arena.time_ticks
            ),
        }
    }

    /// Replace the arena with a fresh session
    pub fn restart(&mut self, seed: u64) {
        if !self.recorded && self.arena.time_ticks > 0 {
            // Abandoned mid-run still counts
            self.record_result();
        }
        self.arena = Arena::with_tuning(seed, self.tuning.clone());
        self.accumulator = 0.0;
        self.input.fire = false;
        self.recorded = false;
        self.last_rank = None;
        self.sessions += 1;
        log::info!("Session {} starting with seed: {}", self.sessions, seed);
    }

    pub fn toggle_autopilot(&mut self) -> bool {
        self.autopilot = !self.autopilot;
        log::info!("Autopilot: {}", self.autopilot);
        self.autopilot
    }

    pub fn snapshot(&self) -> Snapshot {
        self.arena.snapshot()
    }

    pub fn is_game_over(&self) -> bool {
        self.arena.is_terminal()
    }

    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    /// Sessions started so far, including the current one
    pub fn sessions(&self) -> u32 {
        self.sessions
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }
}
