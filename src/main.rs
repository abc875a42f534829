//! Headless scenario harness.
//!
//! Loads a scenario, runs the sim at a fixed 60 Hz with a tiny autopilot on
//! the player, and stops on the first scene transition (victory, game over)
//! or at the tick cap. Useful as a soak test and as a worked example of
//! embedding `sim_core`.
//!
//! Usage: `hollowvale [scenario.toml] [max_ticks]`

use anyhow::{Context, Result};
use collision_core::Region;
use glam::Vec2;
use sim_core::{
    step, EntityKind, PlayerInput, SimConfig, SimState, SCENE_GAME_OVER, SCENE_VICTORY,
};

const DT: f32 = 1.0 / 60.0;
const DEFAULT_TICKS: u64 = 3600;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let scenario_name = args.next().unwrap_or_else(|| "arena.toml".to_string());
    let max_ticks: u64 = match args.next() {
        Some(s) => s.parse().context("max_ticks must be an integer")?,
        None => DEFAULT_TICKS,
    };

    let cfg = SimConfig::load().context("load config")?;
    let scenario =
        data_runtime::scenario::load_scenario(&scenario_name).context("load scenario")?;
    let mut state = SimState::new(&scenario, &cfg);

    let mut outcome = "tick cap reached";
    for _ in 0..max_ticks {
        let input = autopilot(&state);
        step(&mut state, &input, DT);
        for fx in state.drain_fx() {
            log::debug!("fx: {fx:?}");
        }
        let requests = state.drain_scene_requests();
        if let Some(req) = requests.first() {
            outcome = match req.target {
                t if t == SCENE_VICTORY => "victory",
                t if t == SCENE_GAME_OVER => "game over",
                _ => "scene transition",
            };
            break;
        }
    }

    let player_hp = state
        .player
        .and_then(|id| state.entities.get(id))
        .map(|p| p.hp.hp)
        .unwrap_or(0);
    let enemies_left = state
        .entities
        .iter()
        .filter(|e| e.kind == EntityKind::Enemy && !e.dead)
        .count();
    log::info!(
        "'{}' finished: {} after {} ticks ({:.1} s); player hp {}, {} enemies left",
        scenario.name,
        outcome,
        state.tick,
        state.time_s,
        player_hp,
        enemies_left
    );
    Ok(())
}

/// Walks toward the goal, swinging at any enemy that gets close. Just enough
/// brain to exercise every system from the command line.
fn autopilot(state: &SimState) -> PlayerInput {
    let Some(p) = state.player.and_then(|id| state.entities.get(id)) else {
        return PlayerInput::idle();
    };
    let nearest = state
        .entities
        .iter()
        .filter(|e| e.kind == EntityKind::Enemy && !e.dead)
        .min_by(|a, b| {
            a.pos
                .distance_squared(p.pos)
                .total_cmp(&b.pos.distance_squared(p.pos))
        });
    if let Some(e) = nearest {
        let d = e.pos - p.pos;
        if d.length() < 2.0 {
            return PlayerInput {
                move_dir: Vec2::new(d.x, d.z),
                attack: true,
                dash: false,
            };
        }
    }
    let target = match state.goal {
        Some(Region::Box { center, .. }) | Some(Region::Sphere { center, .. }) => center,
        None => p.pos,
    };
    let d = target - p.pos;
    if d.length() < 0.5 {
        PlayerInput::idle()
    } else {
        PlayerInput::walk(Vec2::new(d.x, d.z))
    }
}
