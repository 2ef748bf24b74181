//! Player kinematics: lane changes, lateral smoothing, jumping
//!
//! Lateral motion is time-based (exponential approach scaled by `dt`), while
//! the jump arc integrates in per-tick units so its shape does not depend on
//! the tick length.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::PLAYER_DEPTH;
use crate::settings::Settings;
use crate::{approach_factor, clamp_lane, lane_offset};

/// The closed command set the simulation accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    MoveLeft,
    MoveRight,
    Jump,
}

/// Kinematic constants for the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerTuning {
    pub lane_width: f32,
    pub lerp_rate: f32,
    pub jump_force: f32,
    pub gravity: f32,
    pub max_bank: f32,
    pub bank_factor: f32,
    pub max_pitch: f32,
    pub pitch_factor: f32,
    pub bob_amplitude: f32,
    pub bob_frequency: f32,
    pub half_extents: Vec3,
}

impl From<&Settings> for PlayerTuning {
    fn from(settings: &Settings) -> Self {
        Self {
            lane_width: settings.lane_width,
            lerp_rate: settings.lerp_rate,
            jump_force: settings.jump_force,
            gravity: settings.gravity,
            max_bank: settings.max_bank,
            bank_factor: settings.bank_factor,
            max_pitch: settings.max_pitch,
            pitch_factor: settings.pitch_factor,
            bob_amplitude: settings.bob_amplitude,
            bob_frequency: settings.bob_frequency,
            half_extents: Vec3::from_array(settings.player_half_extents),
        }
    }
}

/// Symmetric clamp bound for a tilt limit. Tuning built by hand may carry a
/// negative or NaN limit, which `f32::clamp` rejects.
fn angle_limit(limit: f32) -> f32 {
    if limit.is_nan() { 0.0 } else { limit.abs() }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

/// What happened to the player during one advance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStep {
    pub landed: bool,
}

/// The player actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Current lane in {-1, 0, 1}
    pub lane: i8,
    /// Lateral offset of the current lane's centerline
    pub target_lateral: f32,
    /// Smoothed lateral position
    pub lateral: f32,
    /// Height above ground (never negative)
    pub vertical: f32,
    /// Vertical velocity in units per tick
    pub vertical_velocity: f32,
    pub airborne: bool,
    /// Roll angle (radians), presentation only
    pub bank: f32,
    /// Nose up/down angle (radians), presentation only
    pub pitch: f32,
    /// Idle bob offset while grounded, presentation only
    pub idle_bob: f32,
    pub tuning: PlayerTuning,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(PlayerTuning::default())
    }
}

impl Player {
    pub fn new(tuning: PlayerTuning) -> Self {
        Self {
            lane: 0,
            target_lateral: 0.0,
            lateral: 0.0,
            vertical: 0.0,
            vertical_velocity: 0.0,
            airborne: false,
            bank: 0.0,
            pitch: 0.0,
            idle_bob: 0.0,
            tuning,
        }
    }

    /// Back to the center lane on the ground, keeping tuning
    pub fn reset(&mut self) {
        *self = Self::new(self.tuning);
    }

    /// Apply one command. Returns false if it had no effect.
    pub fn apply_command(&mut self, command: Command) -> bool {
        match command {
            Command::MoveLeft => self.change_lane(-1),
            Command::MoveRight => self.change_lane(1),
            Command::Jump => self.jump(),
        }
    }

    fn change_lane(&mut self, direction: i32) -> bool {
        let lane = clamp_lane(self.lane as i32 + direction);
        if lane == self.lane {
            return false;
        }
        self.lane = lane;
        self.target_lateral = lane_offset(lane, self.tuning.lane_width);
        true
    }

    fn jump(&mut self) -> bool {
        if self.airborne {
            return false;
        }
        self.airborne = true;
        self.vertical_velocity = self.tuning.jump_force;
        true
    }

    /// Advance one tick
    pub fn advance(&mut self, dt: f32, now: f64) -> PlayerStep {
        let t = self.tuning;
        let blend = approach_factor(t.lerp_rate, dt);

        let lateral_error = self.target_lateral - self.lateral;
        self.lateral += lateral_error * blend;

        // Lean into the turn
        let max_bank = angle_limit(t.max_bank);
        let target_bank = (-lateral_error * t.bank_factor).clamp(-max_bank, max_bank);
        self.bank = (self.bank + (target_bank - self.bank) * blend).clamp(-max_bank, max_bank);

        let mut step = PlayerStep::default();
        if self.airborne {
            self.idle_bob = 0.0;
            self.vertical += self.vertical_velocity;
            self.vertical_velocity += t.gravity;
            let max_pitch = angle_limit(t.max_pitch);
            self.pitch = (self.vertical_velocity * t.pitch_factor).clamp(-max_pitch, max_pitch);

            if self.vertical <= 0.0 {
                self.vertical = 0.0;
                self.vertical_velocity = 0.0;
                self.airborne = false;
                step.landed = true;
            }
        } else {
            self.pitch += (0.0 - self.pitch) * blend;
            self.idle_bob = (now as f32 * t.bob_frequency).sin() * t.bob_amplitude;
        }
        step
    }

    /// World-space bounding box (idle bob excluded)
    pub fn world_box(&self) -> Aabb {
        let half = self.tuning.half_extents;
        let center = Vec3::new(self.lateral, self.vertical + half.y, PLAYER_DEPTH);
        Aabb::from_center(center, half)
    }
}
