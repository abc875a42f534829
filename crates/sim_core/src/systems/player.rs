//! Player controller: dash, combo attacks with buffering, movement.

use crate::combat::{AttackMoveTask, SweepTask};
use crate::dash::DashTask;
use crate::events::FxEvent;
use crate::movement;
use crate::state::{MotionTask, SimState};
use collision_core::{Collider, LayerMask, SceneView};
use glam::{Vec2, Vec3};

/// One tick of player intent, already mapped from whatever input device the
/// embedder has onto a world-space move direction and action flags.
#[derive(Copy, Clone, Debug, Default)]
pub struct PlayerInput {
    /// World-space XZ direction; not necessarily normalized.
    pub move_dir: Vec2,
    pub attack: bool,
    pub dash: bool,
}

impl PlayerInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn walk(dir: Vec2) -> Self {
        Self { move_dir: dir, ..Self::default() }
    }

    pub fn attack() -> Self {
        Self { attack: true, ..Self::default() }
    }

    pub fn dash(dir: Vec2) -> Self {
        Self { move_dir: dir, dash: true, ..Self::default() }
    }
}

pub fn control(state: &mut SimState, proxies: &[Collider], input: &PlayerInput, dt: f32) {
    let Some(pid) = state.player else {
        return;
    };
    let Some(p) = state.entities.get(pid) else {
        return;
    };
    if p.dead {
        return;
    }
    let wish = Vec3::new(input.move_dir.x, 0.0, input.move_dir.y).normalize_or_zero();

    // Dash preempts everything else this tick.
    if input.dash && p.ordinary_movement && p.dash_cooldown.ready() {
        let view = SceneView { statics: &state.scene, dynamics: proxies };
        let started = DashTask::begin(&view, p, &state.dash_cfg, wish);
        if let Some(task) = started {
            if let Some(e) = state.entities.get_mut(pid) {
                e.ordinary_movement = false;
                // Invulnerable for the whole dash.
                e.damageable = false;
                if wish != Vec3::ZERO {
                    e.yaw = wish.x.atan2(wish.z);
                }
            }
            state.motion.insert(pid, MotionTask::Dash(task));
            state.fx.push(FxEvent::DashStarted { entity: pid });
            return;
        }
    }

    // Attack, either pressed now or buffered during the previous swing.
    if input.attack || state.attack_buffer {
        let ready = state
            .entities
            .get(pid)
            .is_some_and(|e| e.ordinary_movement && e.attack_cooldown.ready());
        if ready {
            state.attack_buffer = false;
            let idx = state.combo.advance(&state.attacks.player, state.time_s);
            let spec = state.attacks.player[idx].clone();
            if let Some(e) = state.entities.get_mut(pid) {
                e.attack_cooldown.reset(spec.cooldown_s);
                e.ordinary_movement = false;
                // The swing faces the stick direction, instantly.
                if wish != Vec3::ZERO {
                    e.yaw = wish.x.atan2(wish.z);
                }
            }
            state
                .sweeps
                .push(SweepTask::new(pid, spec.clone(), LayerMask::ENEMY));
            state
                .motion
                .insert(pid, MotionTask::AttackMove(AttackMoveTask::new(&spec)));
            state.fx.push(FxEvent::AttackStarted { entity: pid, combo_index: idx });
            return;
        } else if input.attack {
            state.attack_buffer = true;
        }
    }

    let view = SceneView { statics: &state.scene, dynamics: proxies };
    if let Some(e) = state.entities.get_mut(pid) {
        // Gated internally while a motion task owns movement.
        movement::apply(&view, e, wish, dt);
    }
}
