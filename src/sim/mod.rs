//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod obstacle;
pub mod player;
pub mod state;
pub mod tick;
pub mod view;

pub use collision::{Aabb, CollisionMargins, first_collision};
pub use obstacle::{Obstacle, ObstacleKind, ObstaclePool};
pub use player::{Command, Player, PlayerStep, PlayerTuning};
pub use state::{GameEvent, GameState, RunStats, SessionState, SessionStatus};
pub use tick::{TickInput, tick};
pub use view::{FrameView, ObstacleView, PlayerView};
