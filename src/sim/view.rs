//! Read-only snapshot of the world for the renderer and UI

use serde::{Deserialize, Serialize};

use super::obstacle::ObstacleKind;
use super::state::{GameState, SessionStatus};

/// Player transform scalars
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub lane: i8,
    pub lateral: f32,
    /// Height including the cosmetic idle bob
    pub vertical: f32,
    pub bank: f32,
    pub pitch: f32,
    pub airborne: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: u32,
    pub lane: i8,
    pub depth: f32,
    pub kind: ObstacleKind,
}

/// Everything a frame needs to draw, in one serializable value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameView {
    pub status: SessionStatus,
    pub score: u64,
    pub speed: f32,
    pub player: PlayerView,
    /// Active obstacles in spawn order
    pub obstacles: Vec<ObstacleView>,
    pub crashed_into: Option<u32>,
}

impl FrameView {
    pub fn capture(state: &GameState) -> Self {
        let player = &state.player;
        Self {
            status: state.session.status,
            score: state.session.score,
            speed: state.session.speed(),
            player: PlayerView {
                lane: player.lane,
                lateral: player.lateral,
                vertical: player.vertical + player.idle_bob,
                bank: player.bank,
                pitch: player.pitch,
                airborne: player.airborne,
            },
            obstacles: state
                .obstacles
                .active()
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    lane: o.lane,
                    depth: o.depth,
                    kind: o.kind,
                })
                .collect(),
            crashed_into: state.crashed_into,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn test_capture_mirrors_state() {
        let mut state = GameState::new(&Settings::default());
        state.obstacles.insert(1, -42.0, ObstacleKind::Barrier);
        state.session.score = 250;

        let view = FrameView::capture(&state);
        assert_eq!(view.status, SessionStatus::Menu);
        assert_eq!(view.score, 250);
        assert_eq!(view.speed, 1.0);
        assert_eq!(view.obstacles.len(), 1);
        assert_eq!(view.obstacles[0].lane, 1);
        assert_eq!(view.obstacles[0].kind, ObstacleKind::Barrier);

        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"Menu\""));
    }
}
