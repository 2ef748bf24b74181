//! Game state and core simulation types
//!
//! Everything that decides what is true about the world lives here; nothing
//! in this module knows how it is drawn.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::CollisionMargins;
use super::obstacle::{ObstacleKind, ObstaclePool};
use super::player::{Player, PlayerTuning};
use crate::consts::*;
use crate::settings::Settings;

/// Session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Waiting for the player to start
    #[default]
    Menu,
    /// Active run
    Playing,
    /// Run ended by a crash or an explicit end
    GameOver,
}

/// Status, score and speed of the current session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub status: SessionStatus,
    pub score: u64,
    /// Speed multiplier, always within [MIN_SPEED, MAX_SPEED]
    speed: f32,
    /// Number of runs started, so a restart between ticks is still seen
    run: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            status: SessionStatus::Menu,
            score: 0,
            speed: MIN_SPEED,
            run: 0,
        }
    }
}

impl SessionState {
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn run(&self) -> u64 {
        self.run
    }

    /// Set the speed multiplier, clamped into its valid range
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = if speed.is_nan() {
            MIN_SPEED
        } else {
            speed.clamp(MIN_SPEED, MAX_SPEED)
        };
    }

    /// Award an obstacle pass: fixed reward plus a small speed bump
    pub fn award_pass(&mut self) {
        self.score += PASS_REWARD;
        self.set_speed(self.speed + SPEED_INCREMENT);
    }

    /// Clear score and speed for a fresh run
    pub fn reset_run(&mut self) {
        self.score = 0;
        self.set_speed(MIN_SPEED);
    }

    /// Menu or GameOver -> Playing. Returns false if already playing.
    pub fn start_game(&mut self) -> bool {
        if self.status == SessionStatus::Playing {
            return false;
        }
        self.reset_run();
        self.status = SessionStatus::Playing;
        self.run += 1;
        log::info!("Session started (run {})", self.run);
        true
    }

    /// Playing -> GameOver. Returns false if not playing.
    pub fn end_game(&mut self) -> bool {
        if self.status != SessionStatus::Playing {
            return false;
        }
        self.status = SessionStatus::GameOver;
        log::info!("Session over with score {}", self.score);
        true
    }

    /// Any state -> Menu, clearing the score
    pub fn reset_game(&mut self) -> bool {
        let changed = self.status != SessionStatus::Menu || self.score != 0;
        self.status = SessionStatus::Menu;
        self.reset_run();
        if changed {
            log::info!("Session reset to menu");
        }
        changed
    }
}

/// Things that happened during a tick, for presentation and audio consumers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Session state was reset on entry to Playing
    Started,
    LaneChanged { lane: i8 },
    Jumped,
    Landed,
    ObstacleSpawned { id: u32, lane: i8, kind: ObstacleKind },
    ObstaclePassed { id: u32, score: u64 },
    Crashed { id: u32 },
}

/// Per-run statistics (reset on entry to Playing)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Ticks spent in Playing
    pub ticks: u64,
    pub obstacles_spawned: u32,
    pub obstacles_passed: u32,
    pub jumps: u32,
    pub lane_changes: u32,
    /// Total approach distance covered
    pub distance: f32,
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    pub session: SessionState,
    pub player: Player,
    pub obstacles: ObstaclePool,
    pub stats: RunStats,
    /// Obstacle approach speed at multiplier 1.0 (units/second)
    pub base_speed: f32,
    pub lane_width: f32,
    pub margins: CollisionMargins,
    /// Lanes obstacles may spawn in
    pub spawn_lanes: Vec<i8>,
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Status and run seen by the previous tick, for edge detection
    pub(crate) previous_status: SessionStatus,
    pub(crate) previous_run: u64,
    /// Id of the obstacle that ended the run, if any
    pub crashed_into: Option<u32>,
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(settings: &Settings) -> Self {
        let settings = settings.clone().sanitized();
        Self {
            session: SessionState::default(),
            player: Player::new(PlayerTuning::from(&settings)),
            obstacles: ObstaclePool::new(
                settings.spawn_interval_base,
                settings.spawn_distance,
                settings.despawn_depth,
            ),
            stats: RunStats::default(),
            base_speed: settings.base_speed,
            lane_width: settings.lane_width,
            margins: CollisionMargins {
                player: settings.player_margin,
                obstacle: settings.obstacle_margin,
            },
            spawn_lanes: settings.spawn_lanes.clone(),
            seed: settings.seed,
            rng: Pcg32::seed_from_u64(settings.seed),
            previous_status: SessionStatus::Menu,
            previous_run: 0,
            crashed_into: None,
            events: Vec::new(),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status
    }

    /// Clear everything scoped to a single run
    pub(crate) fn reset_run(&mut self, now: f64) {
        self.obstacles.clear();
        self.obstacles.last_spawn_time = now;
        self.player.reset();
        self.session.reset_run();
        self.stats = RunStats::default();
        self.crashed_into = None;
        self.events.clear();
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            let overflow = self.events.len() + 1 - MAX_PENDING_EVENTS;
            log::trace!("Event queue full, dropping {} oldest", overflow);
            self.events.drain(..overflow);
        }
        self.events.push(event);
    }

    /// Pending events since the last drain (at most `MAX_PENDING_EVENTS`)
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all pending events. Hosts should drain once per frame; a queue
    /// nobody reads keeps only the newest `MAX_PENDING_EVENTS`.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_is_clamped_at_every_write() {
        let mut session = SessionState::default();
        session.set_speed(0.0);
        assert_eq!(session.speed(), MIN_SPEED);
        session.set_speed(9.0);
        assert_eq!(session.speed(), MAX_SPEED);
        session.set_speed(f32::NAN);
        assert_eq!(session.speed(), MIN_SPEED);
    }

    #[test]
    fn test_award_pass_caps_speed() {
        let mut session = SessionState::default();
        session.award_pass();
        assert_eq!(session.score, 50);
        assert!((session.speed() - 1.001).abs() < 1e-6);

        session.set_speed(2.4995);
        session.award_pass();
        assert_eq!(session.speed(), MAX_SPEED);
        session.award_pass();
        assert_eq!(session.speed(), MAX_SPEED);
        assert_eq!(session.score, 150);
    }

    #[test]
    fn test_lifecycle_edges() {
        let mut session = SessionState::default();
        assert!(!session.end_game());

        assert!(session.start_game());
        assert!(!session.start_game());
        session.award_pass();

        assert!(session.end_game());
        assert_eq!(session.status, SessionStatus::GameOver);
        assert_eq!(session.score, 50);

        // Restart from GameOver clears the run
        assert!(session.start_game());
        assert_eq!(session.score, 0);
        assert_eq!(session.speed(), MIN_SPEED);
        assert_eq!(session.run(), 2);

        session.award_pass();
        assert!(session.end_game());
        assert!(session.reset_game());
        assert_eq!(session.status, SessionStatus::Menu);
        assert_eq!(session.score, 0);
        assert!(!session.reset_game());
    }

    #[test]
    fn test_new_state_uses_sanitized_settings() {
        let settings = Settings {
            spawn_lanes: vec![7],
            ..Settings::default()
        };
        let state = GameState::new(&settings);
        assert_eq!(state.spawn_lanes, vec![-1, 0, 1]);
        assert_eq!(state.status(), SessionStatus::Menu);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_event_queue_keeps_newest_when_full() {
        let mut state = GameState::new(&Settings::default());
        for id in 0..(MAX_PENDING_EVENTS as u32 + 10) {
            state.push_event(GameEvent::Crashed { id });
        }
        let events = state.events();
        assert_eq!(events.len(), MAX_PENDING_EVENTS);
        assert_eq!(events[0], GameEvent::Crashed { id: 10 });
        assert_eq!(
            events.last(),
            Some(&GameEvent::Crashed { id: MAX_PENDING_EVENTS as u32 + 9 })
        );
    }

    #[test]
    fn test_reset_run_discards_stale_events() {
        let mut state = GameState::new(&Settings::default());
        state.push_event(GameEvent::Jumped);
        state.push_event(GameEvent::Crashed { id: 3 });
        state.reset_run(1.0);
        assert!(state.events().is_empty());
    }
}
