//! Fixed timestep simulation tick
//!
//! Advances the world by one step. Order within a tick is fixed:
//! reset detection, obstacle advance and scoring, spawn check, player
//! advance, collision check.

use rand::Rng;

use super::collision::first_collision;
use super::obstacle::ObstacleKind;
use super::player::Command;
use super::state::{GameEvent, GameState, SessionStatus};
use crate::clamp_lane;
use crate::consts::LANES;

/// Seconds of approach the autopilot looks ahead
const AUTOPILOT_LOOKAHEAD_SECS: f32 = 0.6;
/// Depth distance at which the autopilot jumps a barrier
const AUTOPILOT_JUMP_DISTANCE: f32 = 6.0;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Commands received since the previous tick, in arrival order
    pub commands: Vec<Command>,
    /// Demo mode - the simulation steers the player itself
    pub autopilot: bool,
}

impl TickInput {
    pub fn with_commands(commands: impl IntoIterator<Item = Command>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
            autopilot: false,
        }
    }
}

/// Advance the game state by one fixed timestep
///
/// `now` is the simulation clock in seconds and drives spawn cadence.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, now: f64) {
    let status = state.session.status;
    let run = state.session.run();

    // Entering Playing: clear stale world state before any physics
    let entered = status == SessionStatus::Playing
        && (state.previous_status != SessionStatus::Playing || state.previous_run != run);
    if entered {
        state.reset_run(now);
        state.push_event(GameEvent::Started);
        log::debug!("Run {} reset at t={:.3}", run, now);
    }
    state.previous_status = status;
    state.previous_run = run;

    // Menu and GameOver: no obstacle, player or collision work
    if status != SessionStatus::Playing {
        return;
    }

    state.stats.ticks += 1;

    // Obstacles approach and retire
    let frame_move = state.base_speed * state.session.speed() * dt;
    state.stats.distance += frame_move;
    state.obstacles.advance_all(frame_move);
    for obstacle in state.obstacles.collect_despawned() {
        state.session.award_pass();
        state.stats.obstacles_passed += 1;
        let score = state.session.score;
        state.push_event(GameEvent::ObstaclePassed {
            id: obstacle.id,
            score,
        });
        log::debug!("Obstacle {} passed, score {}", obstacle.id, score);
    }

    // Spawn on a speed-scaled timer
    if state.obstacles.spawn_due(now, state.session.speed()) {
        let lane = pick_spawn_lane(state);
        let spawned = state.obstacles.spawn(lane, &mut state.rng);
        let (id, kind) = (spawned.id, spawned.kind);
        state.obstacles.last_spawn_time = now;
        state.stats.obstacles_spawned += 1;
        state.push_event(GameEvent::ObstacleSpawned { id, lane, kind });
        log::debug!("Spawned {:?} {} in lane {}", kind, id, lane);
    }

    // Player
    let mut commands = input.commands.clone();
    if input.autopilot {
        commands.extend(autopilot_commands(state));
    }
    for command in commands {
        if !state.player.apply_command(command) {
            continue;
        }
        match command {
            Command::Jump => {
                state.stats.jumps += 1;
                state.push_event(GameEvent::Jumped);
            }
            Command::MoveLeft | Command::MoveRight => {
                state.stats.lane_changes += 1;
                let lane = state.player.lane;
                state.push_event(GameEvent::LaneChanged { lane });
            }
        }
    }
    let step = state.player.advance(dt, now);
    if step.landed {
        state.push_event(GameEvent::Landed);
    }

    // Collision against the player's position for this tick
    let hit = first_collision(
        &state.player.world_box(),
        state.obstacles.active(),
        state.lane_width,
        state.margins,
    )
    .map(|obstacle| obstacle.id);

    if let Some(id) = hit {
        state.crashed_into = Some(id);
        state.session.end_game();
        state.push_event(GameEvent::Crashed { id });
        log::debug!("Crashed into obstacle {} at t={:.3}", id, now);
    }
}

/// Uniform draw over the eligible spawn lanes
fn pick_spawn_lane(state: &mut GameState) -> i8 {
    let lanes: &[i8] = if state.spawn_lanes.is_empty() {
        &LANES
    } else {
        &state.spawn_lanes
    };
    let index = state.rng.random_range(0..lanes.len());
    clamp_lane(lanes[index] as i32)
}

/// Steer around the nearest obstacle in the player's lane
fn autopilot_commands(state: &GameState) -> Vec<Command> {
    let lookahead = state.base_speed * state.session.speed() * AUTOPILOT_LOOKAHEAD_SECS;
    let obstacles = state.obstacles.active();

    // Obstacles that have not fully cleared the player yet
    let nearest_in = |lane: i8| {
        obstacles
            .iter()
            .filter(|o| o.lane == lane && o.depth > -lookahead && o.depth < 2.0)
            .max_by(|a, b| a.depth.total_cmp(&b.depth))
    };

    let lane = state.player.lane;
    let Some(threat) = nearest_in(lane) else {
        return Vec::new();
    };

    // Prefer stepping toward the center, then outward
    let mut candidates = [lane - lane.signum(), lane + 1, lane - 1];
    if lane == 0 {
        candidates = [-1, 1, 0];
    }
    for candidate in candidates {
        let candidate = clamp_lane(candidate as i32);
        if candidate != lane && nearest_in(candidate).is_none() {
            return vec![if candidate < lane {
                Command::MoveLeft
            } else {
                Command::MoveRight
            }];
        }
    }

    if threat.kind == ObstacleKind::Barrier && threat.depth > -AUTOPILOT_JUMP_DISTANCE {
        return vec![Command::Jump];
    }
    Vec::new()
}
