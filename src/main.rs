//! Lane Runner entry point
//!
//! Headless demo: runs an autopilot session for a fixed stretch of simulated
//! time and prints the final frame as JSON.
//!
//! Usage: `lane-runner [settings.json] [seconds]`
//! (`LANE_RUNNER_SETTINGS` is used when no path is given)

use lane_runner::Session;
use lane_runner::Settings;
use lane_runner::consts::SIM_DT;
use lane_runner::sim::{GameEvent, SessionStatus};

/// Simulated seconds to run when none are given
const DEFAULT_DEMO_SECONDS: f32 = 60.0;
/// Pretend display refresh for the demo loop
const DEMO_FRAME_TIME: f32 = 1.0 / 60.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Lane Runner (native demo) starting...");

    let mut args = std::env::args().skip(1);
    let settings_path = args
        .next()
        .or_else(|| std::env::var("LANE_RUNNER_SETTINGS").ok());
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(DEFAULT_DEMO_SECONDS);

    let settings = match settings_path {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };

    let mut session = Session::new(settings);
    session.set_autopilot(true);
    session.start_game();

    let frames = (seconds / DEMO_FRAME_TIME).ceil() as u32;
    let mut ticks = 0u32;
    for _ in 0..frames {
        ticks += session.frame(DEMO_FRAME_TIME);
        for event in session.drain_events() {
            match event {
                GameEvent::Crashed { id } => log::info!("Crashed into obstacle {}", id),
                GameEvent::ObstaclePassed { score, .. } if score % 1000 == 0 => {
                    log::info!("Score {}", score)
                }
                _ => log::trace!("{:?}", event),
            }
        }
        if session.status() != SessionStatus::Playing {
            break;
        }
    }
    session.stop();

    let stats = &session.state().stats;
    log::info!(
        "Ran {} ticks ({:.1}s simulated at {}s/tick): passed {}, jumps {}, lane changes {}",
        ticks,
        session.sim_time(),
        SIM_DT,
        stats.obstacles_passed,
        stats.jumps,
        stats.lane_changes
    );

    match serde_json::to_string_pretty(&session.view()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not serialize final frame: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly on the web
}
