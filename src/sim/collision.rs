//! Collision detection between the player and obstacles
//!
//! Axis-aligned boxes in world space. Visual meshes are larger than the
//! volumes that should count as a hit, so both sides are shrunk before
//! testing: the player on every axis, obstacles on the lateral (x) and
//! depth (z) axes only.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::obstacle::Obstacle;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }

    /// Box centered on a point with the given half extents
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Shrink inward by a per-axis margin. A margin larger than the
    /// half extent collapses that axis to the center instead of inverting it.
    pub fn shrink(&self, margin: Vec3) -> Self {
        let center = self.center();
        let half = (self.half_extents() - margin.max(Vec3::ZERO)).max(Vec3::ZERO);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Closed-interval overlap on all three axes
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }
}

/// Forgiveness margins applied before every test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionMargins {
    /// Shrink applied to every axis of the player box
    pub player: f32,
    /// Shrink applied to the lateral and depth axes of obstacle boxes
    pub obstacle: f32,
}

impl CollisionMargins {
    pub const NONE: Self = Self {
        player: 0.0,
        obstacle: 0.0,
    };

    pub fn player_box(&self, player_box: &Aabb) -> Aabb {
        player_box.shrink(Vec3::splat(self.player))
    }

    pub fn obstacle_box(&self, obstacle_box: &Aabb) -> Aabb {
        obstacle_box.shrink(Vec3::new(self.obstacle, 0.0, self.obstacle))
    }
}

/// Check the player box against every obstacle in pool order
///
/// Returns the first obstacle whose shrunk box overlaps the shrunk player box.
pub fn first_collision<'a>(
    player_box: &Aabb,
    obstacles: &'a [Obstacle],
    lane_width: f32,
    margins: CollisionMargins,
) -> Option<&'a Obstacle> {
    let player = margins.player_box(player_box);
    obstacles
        .iter()
        .find(|obstacle| player.intersects(&margins.obstacle_box(&obstacle.world_box(lane_width))))
}
