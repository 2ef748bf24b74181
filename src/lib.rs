//! Lane Runner - simulation core for a three-lane endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player, obstacles, collisions, game state)
//! - `session`: Frame driver with fixed-timestep accumulator and lifecycle commands
//! - `platform`: Boundary adapters (raw key names to commands)
//! - `settings`: Data-driven tuning and scenario presets

pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::Session;
pub use settings::{Scenario, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (seconds per tick)
    pub const SIM_DT: f32 = 0.016;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the driver will try to catch up on (seconds)
    pub const MAX_FRAME_TIME: f32 = 0.25;

    /// Leftmost and rightmost lane indices
    pub const MIN_LANE: i8 = -1;
    pub const MAX_LANE: i8 = 1;
    /// Every lane, left to right
    pub const LANES: [i8; 3] = [-1, 0, 1];

    /// Score awarded for each obstacle that passes the player
    pub const PASS_REWARD: u64 = 50;
    /// Speed multiplier bounds
    pub const MIN_SPEED: f32 = 1.0;
    pub const MAX_SPEED: f32 = 2.5;
    /// Speed gained per passed obstacle
    pub const SPEED_INCREMENT: f32 = 0.001;

    /// Depth of the player along the approach axis
    pub const PLAYER_DEPTH: f32 = 0.0;

    /// Undrained events kept before the oldest are dropped
    pub const MAX_PENDING_EVENTS: usize = 1024;
}

use consts::{MAX_LANE, MIN_LANE};

/// Clamp any integer lane request into the valid lane range
#[inline]
pub fn clamp_lane(lane: i32) -> i8 {
    lane.clamp(MIN_LANE as i32, MAX_LANE as i32) as i8
}

/// Lateral world offset of a lane's centerline
#[inline]
pub fn lane_offset(lane: i8, lane_width: f32) -> f32 {
    lane as f32 * lane_width
}

/// Exponential approach factor for one step, never overshooting
#[inline]
pub fn approach_factor(rate: f32, dt: f32) -> f32 {
    (rate * dt).clamp(0.0, 1.0)
}
