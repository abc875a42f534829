//! The fixed-tick schedule: phase functions in a fixed order.
//!
//! Resolution phases read the pre-tick proxy snapshot and queue damage;
//! the apply phase runs after every resolver so ordering between attackers
//! within a tick never changes the outcome.

use crate::entity::{EntityId, EntityKind};
use crate::events::{DamageEvent, FxEvent, SceneRequest, SCENE_GAME_OVER, SCENE_VICTORY};
use crate::knockback::KnockbackTask;
use crate::state::{MotionTask, SimState};
use crate::systems;
use crate::systems::player::PlayerInput;
use collision_core::{BodyRef, Collider, LayerMask, QueryWorld, SceneView};

/// Advances the simulation by one fixed step.
pub fn step(state: &mut SimState, input: &PlayerInput, dt: f32) {
    let start = std::time::Instant::now();
    let proxies = state.entities.proxies();
    let mut dmg: Vec<DamageEvent> = Vec::new();

    tick_cooldowns(state, dt);
    systems::ai::enemy_think(state, &proxies, &mut dmg, dt);
    systems::player::control(state, &proxies, input, dt);
    advance_motion(state, &proxies, dt);
    advance_sweeps(state, &proxies, &mut dmg, dt);
    tick_hazards(state, &proxies, &mut dmg, dt);
    tick_checkpoints(state, &proxies, dt);
    apply_damage(state, &mut dmg);
    check_goal(state, &proxies);
    cleanup(state);

    state.tick += 1;
    state.time_s += dt;
    metrics::histogram!("tick.ms").record(start.elapsed().as_secs_f64() * 1000.0);
}

fn tick_cooldowns(state: &mut SimState, dt: f32) {
    for id in state.entities.ids() {
        let dashing = matches!(state.motion.get(&id), Some(MotionTask::Dash(_)));
        let Some(e) = state.entities.get_mut(id) else {
            continue;
        };
        e.attack_cooldown.tick(dt);
        e.dash_cooldown.tick(dt);
        // The post-hit window reopens unless dash invulnerability holds it.
        if e.damage_cooldown.tick(dt) && !dashing && !e.dead {
            e.damageable = true;
        }
    }
}

fn advance_motion(state: &mut SimState, proxies: &[Collider], dt: f32) {
    let mut ids: Vec<EntityId> = state.motion.keys().copied().collect();
    ids.sort();
    for id in ids {
        let Some(mut task) = state.motion.remove(&id) else {
            continue;
        };
        let view = SceneView { statics: &state.scene, dynamics: proxies };
        let Some(e) = state.entities.get_mut(id) else {
            continue;
        };
        let done = match &mut task {
            MotionTask::Knockback(t) => t.tick(&view, e, dt),
            MotionTask::Dash(t) => t.tick(&view, e, dt),
            MotionTask::AttackMove(t) => t.tick(&view, e, dt),
        };
        if !done {
            state.motion.insert(id, task);
            continue;
        }
        e.ordinary_movement = !e.dead;
        if matches!(task, MotionTask::Dash(_)) {
            e.damageable = e.damage_cooldown.ready() && !e.dead;
            e.dash_cooldown.reset(state.dash_cfg.cooldown_s);
        }
    }
}

fn advance_sweeps(state: &mut SimState, proxies: &[Collider], dmg: &mut Vec<DamageEvent>, dt: f32) {
    let view = SceneView { statics: &state.scene, dynamics: proxies };
    let entities = &state.entities;
    let mut hits = Vec::new();
    state.sweeps.retain_mut(|s| !s.tick(&view, entities, dt, &mut hits));
    for h in hits {
        dmg.push(DamageEvent {
            src: Some(h.attacker),
            dst: h.target,
            amount: h.damage,
            knockback: h.knockback,
            knockback_duration_s: h.knockback_duration_s,
        });
    }
}

fn tick_hazards(state: &mut SimState, proxies: &[Collider], dmg: &mut Vec<DamageEvent>, dt: f32) {
    let view = SceneView { statics: &state.scene, dynamics: proxies };
    for hz in &mut state.hazards {
        hz.tick(&view, &state.entities, dt, dmg, &mut state.fx);
    }
    state.hazards.retain(|h| !h.despawned);
}

fn tick_checkpoints(state: &mut SimState, proxies: &[Collider], dt: f32) {
    let view = SceneView { statics: &state.scene, dynamics: proxies };
    for cp in &mut state.checkpoints {
        cp.tick(&view, &mut state.registry, dt, &mut state.fx);
    }
}

fn apply_damage(state: &mut SimState, dmg: &mut Vec<DamageEvent>) {
    use crate::entity::DamageOutcome;
    for ev in dmg.drain(..) {
        let Some(e) = state.entities.get_mut(ev.dst) else {
            continue;
        };
        match e.apply_damage(ev.amount) {
            DamageOutcome::Ignored => {}
            DamageOutcome::Applied { hp_after } => {
                state.fx.push(FxEvent::DamageTaken {
                    entity: ev.dst,
                    amount: ev.amount.max(0),
                    hp_after,
                });
                if let Some(task) = KnockbackTask::new(ev.knockback, ev.knockback_duration_s) {
                    e.ordinary_movement = false;
                    // Replaces whatever motion was running.
                    state.motion.insert(ev.dst, MotionTask::Knockback(task));
                }
                metrics::counter!("combat.hits_total").increment(1);
            }
            DamageOutcome::Died => {
                let pos = e.pos;
                state.fx.push(FxEvent::DamageTaken {
                    entity: ev.dst,
                    amount: ev.amount.max(0),
                    hp_after: 0,
                });
                state.fx.push(FxEvent::Died { entity: ev.dst, pos });
                state.motion.remove(&ev.dst);
                match e.kind {
                    EntityKind::Player => {
                        log::info!("player died");
                        state.scene_requests.push(SceneRequest { target: SCENE_GAME_OVER });
                    }
                    EntityKind::Enemy => {
                        log::info!("enemy {} died", ev.dst.0);
                        state.fx.push(FxEvent::ItemDropped { pos });
                    }
                }
                metrics::counter!("combat.deaths_total").increment(1);
            }
        }
    }
}

fn check_goal(state: &mut SimState, proxies: &[Collider]) {
    if state.goal_reached {
        return;
    }
    let (Some(goal), Some(pid)) = (state.goal, state.player) else {
        return;
    };
    let view = SceneView { statics: &state.scene, dynamics: proxies };
    let reached = view
        .overlap_region(&goal, LayerMask::PLAYER)
        .iter()
        .any(|b| *b == BodyRef::Entity(pid.0));
    if reached {
        state.goal_reached = true;
        log::info!("goal reached at tick {}", state.tick);
        state.scene_requests.push(SceneRequest { target: SCENE_VICTORY });
    }
}

fn cleanup(state: &mut SimState) {
    let dead: Vec<EntityId> = state
        .entities
        .iter()
        .filter(|e| e.dead && e.kind == EntityKind::Enemy)
        .map(|e| e.id)
        .collect();
    for id in &dead {
        state.motion.remove(id);
    }
    state.entities.remove_dead(|e| e.kind == EntityKind::Enemy);
}
