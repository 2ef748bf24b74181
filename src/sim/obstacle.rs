//! Obstacles and the pool that spawns, advances and retires them

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::lane_offset;

/// Obstacle types. Cosmetic except for their bounding extents; the renderer
/// picks meshes by this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Cube that fills most of a lane
    Crate,
    /// Low, wide bar that can be jumped
    Barrier,
    /// Narrow and tall, cannot be jumped
    Pillar,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [
        ObstacleKind::Crate,
        ObstacleKind::Barrier,
        ObstacleKind::Pillar,
    ];

    /// Relative spawn weight
    pub fn weight(&self) -> u32 {
        match self {
            ObstacleKind::Crate => 5,
            ObstacleKind::Barrier => 3,
            ObstacleKind::Pillar => 2,
        }
    }

    /// Half extents of the local bounding box (lateral, vertical, depth)
    pub fn half_extents(&self) -> Vec3 {
        match self {
            ObstacleKind::Crate => Vec3::new(1.0, 1.0, 1.0),
            ObstacleKind::Barrier => Vec3::new(1.6, 0.5, 0.4),
            ObstacleKind::Pillar => Vec3::new(0.8, 2.5, 0.8),
        }
    }

    /// Weighted random draw over all kinds
    pub fn pick(rng: &mut Pcg32) -> Self {
        let total: u32 = Self::ALL.iter().map(ObstacleKind::weight).sum();
        let mut roll = rng.random_range(0..total);
        for kind in Self::ALL {
            if roll < kind.weight() {
                return kind;
            }
            roll -= kind.weight();
        }
        ObstacleKind::Crate
    }
}

/// An obstacle entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub lane: i8,
    /// Position along the approach axis (negative = far, player at 0)
    pub depth: f32,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn new(id: u32, lane: i8, depth: f32, kind: ObstacleKind) -> Self {
        Self {
            id,
            lane: crate::clamp_lane(lane as i32),
            depth,
            kind,
        }
    }

    /// Bounding box in local space (origin at the base center)
    pub fn local_box(&self) -> Aabb {
        let half = self.kind.half_extents();
        Aabb::from_center(Vec3::new(0.0, half.y, 0.0), half)
    }

    /// Bounding box in world space, resting on the ground
    pub fn world_box(&self, lane_width: f32) -> Aabb {
        let local = self.local_box();
        let offset = Vec3::new(lane_offset(self.lane, lane_width), 0.0, self.depth);
        Aabb::new(local.min + offset, local.max + offset)
    }
}

/// Active obstacles in spawn order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstaclePool {
    obstacles: Vec<Obstacle>,
    /// Obstacles that crossed the despawn depth, waiting to be collected
    despawned: Vec<Obstacle>,
    /// Simulation time of the last spawn (seconds)
    pub last_spawn_time: f64,
    /// Seconds between spawns at speed multiplier 1.0
    pub spawn_interval_base: f32,
    pub spawn_distance: f32,
    pub despawn_depth: f32,
    next_id: u32,
}

impl ObstaclePool {
    pub fn new(spawn_interval_base: f32, spawn_distance: f32, despawn_depth: f32) -> Self {
        Self {
            obstacles: Vec::new(),
            despawned: Vec::new(),
            last_spawn_time: 0.0,
            spawn_interval_base,
            spawn_distance,
            despawn_depth,
            next_id: 1,
        }
    }

    /// Read-only view for collision and rendering
    pub fn active(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Drop every obstacle. Ids keep increasing across runs.
    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.despawned.clear();
    }

    /// Spawn an obstacle at the far end of a lane with a random kind
    pub fn spawn(&mut self, lane: i8, rng: &mut Pcg32) -> &Obstacle {
        let kind = ObstacleKind::pick(rng);
        self.spawn_kind(lane, kind)
    }

    /// Spawn an obstacle of a given kind at the far end of a lane
    pub fn spawn_kind(&mut self, lane: i8, kind: ObstacleKind) -> &Obstacle {
        self.insert(lane, -self.spawn_distance, kind)
    }

    /// Place an obstacle at an arbitrary depth
    pub fn insert(&mut self, lane: i8, depth: f32, kind: ObstacleKind) -> &Obstacle {
        let id = self.next_id;
        self.next_id += 1;
        let index = self.obstacles.len();
        self.obstacles.push(Obstacle::new(id, lane, depth, kind));
        &self.obstacles[index]
    }

    /// Seconds between spawns at the given speed multiplier
    pub fn spawn_delay(&self, speed: f32) -> f32 {
        self.spawn_interval_base / speed.max(crate::consts::MIN_SPEED)
    }

    /// Whether enough time has passed since the last spawn
    pub fn spawn_due(&self, now: f64, speed: f32) -> bool {
        now - self.last_spawn_time > self.spawn_delay(speed) as f64
    }

    /// Move every obstacle toward the player and set aside the ones that
    /// passed the despawn depth
    pub fn advance_all(&mut self, frame_move: f32) {
        let despawn_depth = self.despawn_depth;
        let mut kept = Vec::with_capacity(self.obstacles.len());
        for mut obstacle in self.obstacles.drain(..) {
            obstacle.depth += frame_move;
            if obstacle.depth > despawn_depth {
                self.despawned.push(obstacle);
            } else {
                kept.push(obstacle);
            }
        }
        self.obstacles = kept;
    }

    /// Take the obstacles retired by the last advance
    pub fn collect_despawned(&mut self) -> Vec<Obstacle> {
        std::mem::take(&mut self.despawned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn pool() -> ObstaclePool {
        ObstaclePool::new(1.5, 100.0, 15.0)
    }

    #[test]
    fn test_spawn_assigns_unique_ids() {
        let mut pool = pool();
        let mut rng = Pcg32::seed_from_u64(1);
        let ids: Vec<u32> = (0..20).map(|i| pool.spawn((i % 3) as i8 - 1, &mut rng).id).collect();

        let mut unique = ids.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
        assert!(pool.active().iter().all(|o| o.depth == -100.0));
    }

    #[test]
    fn test_ids_stay_unique_after_clear() {
        let mut pool = pool();
        let first = pool.spawn_kind(0, ObstacleKind::Crate).id;
        pool.clear();
        let second = pool.spawn_kind(0, ObstacleKind::Crate).id;
        assert!(second > first);
    }

    #[test]
    fn test_advance_retires_past_threshold() {
        let mut pool = pool();
        pool.insert(0, 14.0, ObstacleKind::Crate);
        pool.insert(1, 0.0, ObstacleKind::Pillar);
        pool.insert(-1, 14.5, ObstacleKind::Barrier);

        pool.advance_all(0.6);
        let gone = pool.collect_despawned();
        assert_eq!(gone.len(), 1);
        assert_eq!(gone[0].lane, -1);
        assert_eq!(pool.len(), 2);

        // Collecting consumes
        assert!(pool.collect_despawned().is_empty());

        // Approaching the threshold without crossing it stays
        pool.advance_all(0.3);
        assert_eq!(pool.len(), 2);
        assert!(pool.collect_despawned().is_empty());
    }

    #[test]
    fn test_spawn_order_is_preserved() {
        let mut pool = pool();
        for lane in [1, -1, 0] {
            pool.spawn_kind(lane, ObstacleKind::Crate);
        }
        pool.advance_all(5.0);
        let lanes: Vec<i8> = pool.active().iter().map(|o| o.lane).collect();
        assert_eq!(lanes, vec![1, -1, 0]);
    }

    #[test]
    fn test_spawn_delay_shrinks_with_speed() {
        let pool = pool();
        let mut previous = f32::INFINITY;
        for step in 0..=15 {
            let delay = pool.spawn_delay(1.0 + step as f32 * 0.1);
            assert!(delay < previous);
            previous = delay;
        }
        // Below-floor speeds never blow up the delay
        assert_eq!(pool.spawn_delay(0.0), 1.5);
    }

    #[test]
    fn test_weighted_pick_covers_all_kinds() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut counts = [0u32; 3];
        for _ in 0..1000 {
            let kind = ObstacleKind::pick(&mut rng);
            let index = ObstacleKind::ALL.iter().position(|k| *k == kind).unwrap();
            counts[index] += 1;
        }
        assert!(counts.iter().all(|&c| c > 0));
        // Crate is the heaviest weight
        assert!(counts[0] > counts[2]);
    }

    #[test]
    fn test_world_box_rests_on_ground() {
        let obstacle = Obstacle::new(1, 1, -10.0, ObstacleKind::Pillar);
        let bounds = obstacle.world_box(4.0);
        assert_eq!(bounds.min.y, 0.0);
        assert_eq!(bounds.center(), Vec3::new(4.0, 2.5, -10.0));
    }
}
