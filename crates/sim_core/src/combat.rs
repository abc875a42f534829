//! Melee resolution: ray fans, sweep windows, combo chains, attack drift.
//!
//! Both attacker kinds fire a fan of rays across the attack's spread, five
//! degrees apart, from chest height. Enemies resolve a single target and
//! stop. The player's sweep stays open for the swing duration, rescanning on
//! a fixed cadence and never hitting the same target twice per swing.

use crate::entity::{EntityId, EntityStore};
use crate::movement::{self, rotate_y};
use collision_core::{BodyRef, LayerMask, QueryWorld};
use data_runtime::attack::AttackSpec;
use glam::Vec3;
use std::collections::HashSet;

/// Degrees between adjacent rays in the fan.
pub const FAN_STEP_DEG: i32 = 5;
/// Seconds between rescans while a sweep window is open.
pub const SWEEP_STEP_S: f32 = 0.05;

/// A resolved hit, not yet applied. Damage application happens in its own
/// phase so every resolver this tick sees the same pre-tick world.
#[derive(Clone, Debug)]
pub struct HitRecord {
    pub attacker: EntityId,
    pub target: EntityId,
    pub damage: i32,
    pub knockback: Vec3,
    pub knockback_duration_s: f32,
}

fn fan_scan(
    world: &impl QueryWorld,
    entities: &EntityStore,
    attacker: EntityId,
    attack: &AttackSpec,
    mask: LayerMask,
    mut on_target: impl FnMut(&EntityStore, EntityId) -> bool,
) {
    let Some(a) = entities.get(attacker) else {
        return;
    };
    if a.dead {
        return;
    }
    let origin = a.pos + Vec3::Y * a.half_height;
    let forward = a.forward();
    let mut angle = -attack.spread_deg;
    while angle <= attack.spread_deg {
        let dir = rotate_y(forward, angle as f32);
        for hit in world.raycast_all(origin, dir, attack.range, mask) {
            let BodyRef::Entity(raw) = hit.body else {
                continue;
            };
            let target = EntityId(raw);
            if target == attacker {
                continue;
            }
            if on_target(entities, target) {
                return;
            }
        }
        angle += FAN_STEP_DEG;
    }
}

fn hit_record(
    entities: &EntityStore,
    attacker: EntityId,
    target: EntityId,
    attack: &AttackSpec,
) -> Option<HitRecord> {
    let a = entities.get(attacker)?;
    let t = entities.get(target)?;
    if t.dead || !t.damageable {
        return None;
    }
    let away = (t.pos - a.pos).normalize_or_zero();
    Some(HitRecord {
        attacker,
        target,
        damage: attack.damage.max(0),
        knockback: away * attack.knockback_force,
        knockback_duration_s: attack.knockback_duration_s,
    })
}

/// Single-target resolution: the first valid target found in the fan, or
/// nothing. This is the enemy attack path.
pub fn resolve_single_target(
    world: &impl QueryWorld,
    entities: &EntityStore,
    attacker: EntityId,
    attack: &AttackSpec,
    mask: LayerMask,
) -> Option<HitRecord> {
    let mut found = None;
    fan_scan(world, entities, attacker, attack, mask, |store, target| {
        found = hit_record(store, attacker, target, attack);
        found.is_some()
    });
    found
}

/// Tracks where the player is in the combo chain.
#[derive(Clone, Debug, Default)]
pub struct ComboState {
    pub index: usize,
    pub last_attack_time_s: Option<f32>,
}

impl ComboState {
    /// Advances to the next combo link if the previous swing started within
    /// its chain window; otherwise restarts at the first. Returns the index
    /// of the attack to use now.
    pub fn advance(&mut self, attacks: &[AttackSpec], now_s: f32) -> usize {
        let chained = match (self.last_attack_time_s, attacks.get(self.index)) {
            (Some(last), Some(spec)) => spec
                .chain_time_s
                .is_some_and(|w| now_s - last < w && self.index + 1 < attacks.len()),
            _ => false,
        };
        self.index = if chained { self.index + 1 } else { 0 };
        self.last_attack_time_s = Some(now_s);
        self.index
    }
}

/// An open sweep window (player attack path). Rescans the fan every
/// `SWEEP_STEP_S` of accumulated sim time; targets already hit this swing
/// are skipped for the rest of the window.
#[derive(Clone, Debug)]
pub struct SweepTask {
    pub attacker: EntityId,
    attack: AttackSpec,
    mask: LayerMask,
    remaining_s: f32,
    accum_s: f32,
    hit: HashSet<EntityId>,
}

impl SweepTask {
    pub fn new(attacker: EntityId, attack: AttackSpec, mask: LayerMask) -> Self {
        Self {
            attacker,
            remaining_s: attack.move_duration_s,
            // Primed so the first tick scans immediately.
            accum_s: SWEEP_STEP_S,
            attack,
            mask,
            hit: HashSet::new(),
        }
    }

    /// Advances the window, appending resolved hits. Returns true when the
    /// window has closed.
    pub fn tick(
        &mut self,
        world: &impl QueryWorld,
        entities: &EntityStore,
        dt: f32,
        out: &mut Vec<HitRecord>,
    ) -> bool {
        self.accum_s += dt;
        while self.accum_s >= SWEEP_STEP_S {
            self.accum_s -= SWEEP_STEP_S;
            self.scan(world, entities, out);
        }
        self.remaining_s -= dt;
        self.remaining_s <= 0.0
    }

    fn scan(&mut self, world: &impl QueryWorld, entities: &EntityStore, out: &mut Vec<HitRecord>) {
        let attacker = self.attacker;
        let attack = &self.attack;
        let hit = &mut self.hit;
        fan_scan(world, entities, attacker, attack, self.mask, |store, target| {
            if hit.contains(&target) {
                return false;
            }
            if let Some(rec) = hit_record(store, attacker, target, attack) {
                hit.insert(target);
                out.push(rec);
            }
            false
        });
    }
}

/// Forward drift while a swing is active. No gravity; the settle pass keeps
/// the attacker on the ground.
#[derive(Clone, Debug)]
pub struct AttackMoveTask {
    pub remaining_s: f32,
    pub speed_mps: f32,
}

impl AttackMoveTask {
    pub fn new(attack: &AttackSpec) -> Self {
        Self {
            remaining_s: attack.move_duration_s,
            speed_mps: attack.move_speed_mps,
        }
    }

    pub fn tick(
        &mut self,
        world: &impl QueryWorld,
        e: &mut crate::entity::Entity,
        dt: f32,
    ) -> bool {
        let res = movement::resolve_grounded(world, &e.ground, e.pos, e.forward());
        e.pos += res.direction() * self.speed_mps * dt;
        movement::settle(world, e);
        self.remaining_s -= dt;
        self.remaining_s <= 0.0
    }
}
