//! Enemy controller: vision polling, pursuit, single-target attacks.

use crate::combat::{self, AttackMoveTask};
use crate::entity::EntityId;
use crate::events::{DamageEvent, FxEvent};
use crate::movement;
use crate::state::{MotionTask, SimState};
use collision_core::{Collider, LayerMask, SceneView};
use glam::Vec3;

/// Seconds between vision checks while the player is undiscovered.
pub const VISION_POLL_INTERVAL_S: f32 = 1.0;

/// One decision tick for every living enemy. Discovery is sticky: once the
/// player has been seen, the enemy pursues until one of them dies.
pub fn enemy_think(state: &mut SimState, proxies: &[Collider], dmg: &mut Vec<DamageEvent>, dt: f32) {
    let Some(pid) = state.player else {
        return;
    };
    let player_pos = match state.entities.get(pid) {
        Some(p) if !p.dead => p.pos,
        _ => return,
    };

    let ids: Vec<EntityId> = state
        .entities
        .iter()
        .filter(|e| e.brain.is_some() && !e.dead)
        .map(|e| e.id)
        .collect();

    for id in ids {
        let in_task = state.motion.contains_key(&id);
        let mut swing = None;
        {
            let Some(e) = state.entities.get_mut(id) else {
                continue;
            };
            let Some(brain) = e.brain.as_mut() else {
                continue;
            };
            if !brain.found_player {
                if brain.vision_poll.ready() {
                    brain.vision_poll.reset(VISION_POLL_INTERVAL_S);
                    if e.pos.distance(player_pos) <= brain.vision_range {
                        brain.found_player = true;
                        log::debug!("enemy {} spotted the player", id.0);
                    }
                } else {
                    brain.vision_poll.tick(dt);
                }
                if !brain.found_player {
                    continue;
                }
            }
            let dist = e.pos.distance(player_pos);
            if dist <= brain.attack_range {
                // In striking range: stop walking, swing when off cooldown.
                let attack = brain.attack.clone();
                e.ordinary_movement = false;
                if e.attack_cooldown.ready() && !in_task {
                    e.attack_cooldown.reset(attack.cooldown_s);
                    let to_player = player_pos - e.pos;
                    e.yaw = to_player.x.atan2(to_player.z);
                    swing = Some(attack);
                }
            } else if !in_task {
                e.ordinary_movement = true;
            }
        }

        if let Some(attack) = swing {
            let view = SceneView { statics: &state.scene, dynamics: proxies };
            if let Some(hit) = combat::resolve_single_target(
                &view,
                &state.entities,
                id,
                &attack,
                LayerMask::PLAYER,
            ) {
                dmg.push(DamageEvent {
                    src: Some(hit.attacker),
                    dst: hit.target,
                    amount: hit.damage,
                    knockback: hit.knockback,
                    knockback_duration_s: hit.knockback_duration_s,
                });
            }
            state.fx.push(FxEvent::AttackStarted { entity: id, combo_index: 0 });
            state
                .motion
                .insert(id, MotionTask::AttackMove(AttackMoveTask::new(&attack)));
        } else if !in_task {
            // Pursue on foot.
            let view = SceneView { statics: &state.scene, dynamics: proxies };
            if let Some(e) = state.entities.get_mut(id) {
                let seek = Vec3::new(player_pos.x - e.pos.x, 0.0, player_pos.z - e.pos.z);
                movement::apply(&view, e, seek, dt);
            }
        }
    }
}
