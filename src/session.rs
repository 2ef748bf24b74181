//! Session driver
//!
//! Owns one game and feeds it fixed ticks from variable-rate frames. Hosts
//! call `frame` from their animation callback with the real elapsed time,
//! or `step` to advance exactly one tick.

use crate::consts::{MAX_FRAME_TIME, MAX_SUBSTEPS, SIM_DT};
use crate::platform::CommandBuffer;
use crate::settings::Settings;
use crate::sim::{Command, FrameView, GameEvent, GameState, SessionStatus, TickInput, tick};

/// A game session with its frame accumulator and pending input
#[derive(Debug, Clone)]
pub struct Session {
    state: GameState,
    settings: Settings,
    input: CommandBuffer,
    autopilot: bool,
    /// Unsimulated time carried between frames
    accumulator: f32,
    /// Simulation clock (seconds), advanced by exactly one `SIM_DT` per tick
    sim_time: f64,
    running: bool,
    /// Best score seen during this process (never persisted)
    best_score: u64,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let settings = settings.sanitized();
        log::info!(
            "{} session created (seed {}, base speed {})",
            settings.scenario.as_str(),
            settings.seed,
            settings.base_speed
        );
        Self {
            state: GameState::new(&settings),
            settings,
            input: CommandBuffer::new(),
            autopilot: false,
            accumulator: 0.0,
            sim_time: 0.0,
            running: true,
            best_score: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for hosts and tests that stage the world directly
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status()
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }

    // === Lifecycle ===

    pub fn start_game(&mut self) -> bool {
        self.input.clear();
        self.state.session.start_game()
    }

    pub fn end_game(&mut self) -> bool {
        self.state.session.end_game()
    }

    pub fn reset_game(&mut self) -> bool {
        self.input.clear();
        self.state.session.reset_game()
    }

    /// Stop ticking for good (host teardown)
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Session stopped at t={:.3}", self.sim_time);
        }
        self.running = false;
        self.input.clear();
        self.accumulator = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // === Input ===

    /// Record a raw key press. Ignored unless a run is in progress.
    pub fn press_key(&mut self, key: &str) -> Option<Command> {
        if self.state.status() != SessionStatus::Playing {
            return None;
        }
        self.input.press_key(key)
    }

    /// Record a command. Ignored unless a run is in progress.
    pub fn push_command(&mut self, command: Command) {
        if self.state.status() == SessionStatus::Playing {
            self.input.push(command);
        }
    }

    // === Driving ===

    /// Advance by a real frame time. Returns the number of ticks run.
    pub fn frame(&mut self, elapsed: f32) -> u32 {
        if !self.running {
            return 0;
        }
        let elapsed = if elapsed.is_finite() {
            elapsed.clamp(0.0, MAX_FRAME_TIME)
        } else {
            0.0
        };
        self.accumulator += elapsed;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.run_tick();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::warn!("Dropping {:.3}s of simulation time", self.accumulator);
            self.accumulator %= SIM_DT;
        }
        substeps
    }

    /// Advance exactly one fixed tick
    pub fn step(&mut self) {
        if self.running {
            self.run_tick();
        }
    }

    fn run_tick(&mut self) {
        let input = TickInput {
            commands: self.input.drain(),
            autopilot: self.autopilot,
        };
        tick(&mut self.state, &input, SIM_DT, self.sim_time);
        self.sim_time += SIM_DT as f64;
        self.best_score = self.best_score.max(self.state.session.score);
    }

    // === Output ===

    pub fn view(&self) -> FrameView {
        FrameView::capture(&self.state)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}
