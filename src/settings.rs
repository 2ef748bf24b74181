//! Tuning and scenario settings
//!
//! Everything the simulation needs to know about the world's scale and feel.
//! Loaded from JSON on native builds, falling back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::LANES;

/// Scenario presets (the runner and flyer skins share logic, not tuning)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Scenario {
    #[default]
    Runner,
    Flyer,
}

impl Scenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Runner => "Runner",
            Scenario::Flyer => "Flyer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "runner" | "run" => Some(Scenario::Runner),
            "flyer" | "fly" | "flight" => Some(Scenario::Flyer),
            _ => None,
        }
    }

    /// Obstacle approach speed at speed multiplier 1.0 (units/second)
    pub fn base_speed(&self) -> f32 {
        match self {
            Scenario::Runner => 30.0,
            Scenario::Flyer => 40.0,
        }
    }

    /// Seconds between spawns at speed multiplier 1.0
    pub fn spawn_interval_base(&self) -> f32 {
        match self {
            Scenario::Runner => 1.5,
            Scenario::Flyer => 1.2,
        }
    }

    /// Distance from the player at which obstacles appear
    pub fn spawn_distance(&self) -> f32 {
        match self {
            Scenario::Runner => 100.0,
            Scenario::Flyer => 150.0,
        }
    }
}

/// Simulation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Preset the remaining values were derived from
    pub scenario: Scenario,
    /// RNG seed for obstacle lanes and kinds
    pub seed: u64,

    // === World ===
    pub base_speed: f32,
    pub lane_width: f32,
    pub spawn_distance: f32,
    /// Obstacles past this depth have cleared the player
    pub despawn_depth: f32,
    pub spawn_interval_base: f32,
    /// Lanes obstacles may spawn in (empty means all lanes)
    pub spawn_lanes: Vec<i8>,

    // === Player ===
    /// Lateral smoothing rate (1/s)
    pub lerp_rate: f32,
    /// Initial upward velocity of a jump (units per tick)
    pub jump_force: f32,
    /// Vertical velocity change per tick while airborne
    pub gravity: f32,
    /// Maximum bank (roll) angle in radians
    pub max_bank: f32,
    /// Bank radians per unit of lateral error
    pub bank_factor: f32,
    /// Maximum pitch angle in radians
    pub max_pitch: f32,
    /// Pitch radians per unit of vertical velocity
    pub pitch_factor: f32,
    pub bob_amplitude: f32,
    pub bob_frequency: f32,
    /// Player bounding box half extents
    pub player_half_extents: [f32; 3],

    // === Collision forgiveness ===
    /// Inward shrink applied to every axis of the player box
    pub player_margin: f32,
    /// Inward shrink applied to the lateral and depth axes of obstacle boxes
    pub obstacle_margin: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_scenario(Scenario::Runner)
    }
}

impl Settings {
    /// Create settings from a scenario preset
    pub fn from_scenario(scenario: Scenario) -> Self {
        Self {
            scenario,
            seed: 0x5EED,

            base_speed: scenario.base_speed(),
            lane_width: 4.0,
            spawn_distance: scenario.spawn_distance(),
            despawn_depth: 15.0,
            spawn_interval_base: scenario.spawn_interval_base(),
            spawn_lanes: LANES.to_vec(),

            lerp_rate: 10.0,
            jump_force: 0.4,
            gravity: -0.02,
            max_bank: 0.5,
            bank_factor: 0.15,
            max_pitch: 0.4,
            pitch_factor: 1.0,
            bob_amplitude: 0.05,
            bob_frequency: 4.0,
            player_half_extents: [0.75, 1.0, 0.75],

            player_margin: 0.3,
            obstacle_margin: 0.2,
        }
    }

    /// Parse settings from JSON. Missing fields take the defaults of the
    /// file's `scenario` (Runner when absent).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let fields = match serde_json::from_str::<serde_json::Value>(json)? {
            serde_json::Value::Object(fields) => fields,
            // Let serde report the type mismatch
            other => return serde_json::from_value::<Settings>(other).map(Settings::sanitized),
        };

        let scenario = match fields.get("scenario") {
            Some(name) => serde_json::from_value::<Scenario>(name.clone())?,
            None => Scenario::default(),
        };
        let mut merged = serde_json::to_value(Self::from_scenario(scenario))?;
        if let serde_json::Value::Object(base) = &mut merged {
            base.extend(fields);
        }
        serde_json::from_value::<Settings>(merged).map(Settings::sanitized)
    }

    /// Clamp values that would break simulation invariants
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::from_scenario(self.scenario);

        if !(self.base_speed.is_finite() && self.base_speed > 0.0) {
            self.base_speed = defaults.base_speed;
        }
        if !(self.spawn_interval_base.is_finite() && self.spawn_interval_base > 0.0) {
            self.spawn_interval_base = defaults.spawn_interval_base;
        }
        if !(self.lane_width.is_finite() && self.lane_width > 0.0) {
            self.lane_width = defaults.lane_width;
        }
        if !(self.lerp_rate.is_finite() && self.lerp_rate > 0.0) {
            self.lerp_rate = defaults.lerp_rate;
        }
        if !(self.jump_force.is_finite() && self.jump_force > 0.0) {
            self.jump_force = defaults.jump_force;
        }
        // Gravity must pull down or the player never lands
        if !(self.gravity.is_finite() && self.gravity < 0.0) {
            self.gravity = defaults.gravity;
        }
        if !(self.despawn_depth.is_finite() && self.despawn_depth > crate::consts::PLAYER_DEPTH) {
            self.despawn_depth = defaults.despawn_depth;
        }
        if !self.spawn_distance.is_finite() {
            self.spawn_distance = defaults.spawn_distance;
        }
        self.spawn_distance = self.spawn_distance.abs();
        self.max_bank = finite_abs(self.max_bank, defaults.max_bank);
        self.max_pitch = finite_abs(self.max_pitch, defaults.max_pitch);
        self.player_margin = finite_abs(self.player_margin.max(0.0), defaults.player_margin);
        self.obstacle_margin = finite_abs(self.obstacle_margin.max(0.0), defaults.obstacle_margin);
        for (extent, fallback) in self
            .player_half_extents
            .iter_mut()
            .zip(defaults.player_half_extents)
        {
            *extent = finite_abs(*extent, fallback);
        }

        self.spawn_lanes.retain(|lane| LANES.contains(lane));
        self.spawn_lanes.sort_unstable();
        self.spawn_lanes.dedup();
        if self.spawn_lanes.is_empty() {
            self.spawn_lanes = LANES.to_vec();
        }

        self
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Magnitude of `value`, or `fallback` when it is NaN or infinite
fn finite_abs(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.abs()
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_presets() {
        assert_eq!(Settings::from_scenario(Scenario::Runner).base_speed, 30.0);
        assert_eq!(Settings::from_scenario(Scenario::Flyer).base_speed, 40.0);
        assert_eq!(Scenario::from_str("FLY"), Some(Scenario::Flyer));
        assert_eq!(Scenario::from_str("swim"), None);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "lane_width": 5.0, "seed": 7 }"#).unwrap();
        assert_eq!(settings.lane_width, 5.0);
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.base_speed, 30.0);
        assert_eq!(settings.spawn_lanes, vec![-1, 0, 1]);
    }

    #[test]
    fn test_sanitize_rejects_broken_values() {
        let settings = Settings::from_json(
            r#"{ "spawn_interval_base": 0.0, "gravity": 0.5, "spawn_lanes": [3, 1, 1, -1], "player_margin": -1.0 }"#,
        )
        .unwrap();
        assert_eq!(settings.spawn_interval_base, 1.5);
        assert_eq!(settings.gravity, -0.02);
        assert_eq!(settings.spawn_lanes, vec![-1, 1]);
        assert_eq!(settings.player_margin, 0.0);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Settings::from_json("{ not json").is_err());
    }

    #[test]
    fn test_json_roundtrip_preserves_scenario() {
        let settings = Settings::from_scenario(Scenario::Flyer);
        let parsed = Settings::from_json(&settings.to_json()).unwrap();
        assert_eq!(parsed.scenario, Scenario::Flyer);
        assert_eq!(parsed.spawn_distance, 150.0);
    }

    #[test]
    fn test_scenario_file_takes_its_own_defaults() {
        let settings = Settings::from_json(r#"{ "scenario": "Flyer" }"#).unwrap();
        assert_eq!(settings.scenario, Scenario::Flyer);
        assert_eq!(settings.base_speed, 40.0);
        assert_eq!(settings.spawn_interval_base, 1.2);
        assert_eq!(settings.spawn_distance, 150.0);

        // Explicit fields still win over the scenario preset
        let settings =
            Settings::from_json(r#"{ "spawn_distance": 90.0, "scenario": "Flyer" }"#).unwrap();
        assert_eq!(settings.base_speed, 40.0);
        assert_eq!(settings.spawn_distance, 90.0);

        assert!(Settings::from_json(r#"{ "scenario": "Swimmer" }"#).is_err());
        assert!(Settings::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_sanitize_replaces_non_finite_limits() {
        let settings = Settings {
            despawn_depth: f32::NAN,
            spawn_distance: f32::INFINITY,
            max_bank: f32::NAN,
            max_pitch: -0.3,
            obstacle_margin: f32::NAN,
            player_half_extents: [f32::NAN, -1.0, 0.5],
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(settings.despawn_depth, 15.0);
        assert_eq!(settings.spawn_distance, 100.0);
        assert_eq!(settings.max_bank, 0.5);
        assert_eq!(settings.max_pitch, 0.3);
        assert_eq!(settings.obstacle_margin, 0.0);
        assert_eq!(settings.player_half_extents, [0.75, 1.0, 0.5]);
    }
}
