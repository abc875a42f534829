//! Placed hazards: spike platforms and explosive barrels.
//!
//! Hazards damage through the same event bus as attacks, with no attacker
//! and radial knockback. A damage pass collects overlapping entities once
//! each; per-entity damage windows handle repeat exposure across ticks.

use crate::entity::{EntityId, EntityStore};
use crate::events::{DamageEvent, FxEvent};
use crate::timer::Countdown;
use collision_core::{BodyRef, LayerMask, QueryWorld, Region};
use data_runtime::hazard::{ExplosiveBarrelCfg, SpikePlatformCfg};
use glam::Vec3;
use std::collections::HashSet;

#[derive(Clone, Debug)]
pub enum HazardPhase {
    /// Cycles between inactive and active; damages every tick while active.
    Spike {
        active: bool,
        cycle: Countdown,
        active_s: f32,
        inactive_s: f32,
        area_offset: Vec3,
        half_extents: Vec3,
    },
    /// Arms on contact, charges, bursts once, despawns.
    Barrel {
        armed: bool,
        charge: Countdown,
        charge_s: f32,
        trigger_radius: f32,
        burst_radius: f32,
    },
}

#[derive(Clone, Debug)]
pub struct Hazard {
    pub pos: Vec3,
    pub damage: i32,
    pub knockback_force: f32,
    pub knockback_duration_s: f32,
    pub phase: HazardPhase,
    pub despawned: bool,
}

const TARGET_MASK: LayerMask = LayerMask(LayerMask::PLAYER.0 | LayerMask::ENEMY.0);

impl Hazard {
    /// `phase_offset` (0..1) staggers neighboring platforms: the first
    /// activation is delayed by that fraction of the active duration.
    pub fn spike(cfg: &SpikePlatformCfg, pos: Vec3, phase_offset: f32) -> Self {
        let mut cycle = Countdown::default();
        cycle.reset(cfg.active_duration_s * phase_offset.clamp(0.0, 1.0));
        Self {
            pos,
            damage: cfg.damage.damage,
            knockback_force: cfg.damage.knockback_force,
            knockback_duration_s: cfg.damage.knockback_duration_s,
            phase: HazardPhase::Spike {
                active: false,
                cycle,
                active_s: cfg.active_duration_s,
                inactive_s: cfg.inactive_duration_s,
                area_offset: Vec3::from_array(cfg.area_offset),
                half_extents: Vec3::from_array(cfg.area_size) * 0.5,
            },
            despawned: false,
        }
    }

    pub fn barrel(cfg: &ExplosiveBarrelCfg, pos: Vec3) -> Self {
        Self {
            pos,
            damage: cfg.damage.damage,
            knockback_force: cfg.damage.knockback_force,
            knockback_duration_s: cfg.damage.knockback_duration_s,
            phase: HazardPhase::Barrel {
                armed: false,
                charge: Countdown::default(),
                charge_s: cfg.charge_time_s,
                trigger_radius: cfg.trigger_radius,
                burst_radius: cfg.burst_radius,
            },
            despawned: false,
        }
    }

    pub fn tick(
        &mut self,
        world: &impl QueryWorld,
        entities: &EntityStore,
        dt: f32,
        dmg: &mut Vec<DamageEvent>,
        fx: &mut Vec<FxEvent>,
    ) {
        if self.despawned {
            return;
        }
        let pos = self.pos;
        let damage = (self.pos, self.damage, self.knockback_force, self.knockback_duration_s);
        match &mut self.phase {
            HazardPhase::Spike {
                active,
                cycle,
                active_s,
                inactive_s,
                area_offset,
                half_extents,
            } => {
                if cycle.ready() || cycle.tick(dt) {
                    *active = !*active;
                    cycle.reset(if *active { *active_s } else { *inactive_s });
                    if *active {
                        fx.push(FxEvent::HazardArmed { pos });
                    }
                }
                if *active {
                    let region = Region::Box {
                        center: pos + *area_offset,
                        half_extents: *half_extents,
                    };
                    damage_pass(world, entities, &region, damage, dmg);
                }
            }
            HazardPhase::Barrel {
                armed,
                charge,
                charge_s,
                trigger_radius,
                burst_radius,
            } => {
                if !*armed {
                    let trigger = Region::Sphere { center: pos, radius: *trigger_radius };
                    if !world.overlap_region(&trigger, TARGET_MASK).is_empty() {
                        *armed = true;
                        charge.reset(*charge_s);
                        fx.push(FxEvent::HazardArmed { pos });
                    }
                } else if charge.tick(dt) {
                    let burst = Region::Sphere { center: pos, radius: *burst_radius };
                    damage_pass(world, entities, &burst, damage, dmg);
                    fx.push(FxEvent::HazardBurst { pos });
                    self.despawned = true;
                    log::debug!("barrel at {pos} burst");
                }
            }
        }
    }
}

/// One damage pass over a region: each overlapping entity is queued once,
/// knocked radially away from the hazard on the ground plane.
fn damage_pass(
    world: &impl QueryWorld,
    entities: &EntityStore,
    region: &Region,
    (pos, damage, force, duration_s): (Vec3, i32, f32, f32),
    dmg: &mut Vec<DamageEvent>,
) {
    let mut seen: HashSet<EntityId> = HashSet::new();
    for body in world.overlap_region(region, TARGET_MASK) {
        let BodyRef::Entity(raw) = body else {
            continue;
        };
        let id = EntityId(raw);
        if !seen.insert(id) {
            continue;
        }
        let Some(t) = entities.get(id) else {
            continue;
        };
        let away = Vec3::new(t.pos.x - pos.x, 0.0, t.pos.z - pos.z).normalize_or_zero();
        dmg.push(DamageEvent {
            src: None,
            dst: id,
            amount: damage,
            knockback: away * force,
            knockback_duration_s: duration_s,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, EntityKind};
    use collision_core::{SceneView, StaticScene};
    use glam::Vec2;
    use data_runtime::hazard::HazardDamageCfg;

    fn spike_cfg() -> SpikePlatformCfg {
        SpikePlatformCfg {
            damage: HazardDamageCfg { damage: 50, knockback_force: 10.0, knockback_duration_s: 0.2 },
            area_size: [2.0, 1.0, 2.0],
            area_offset: [0.0, 0.5, 0.0],
            active_duration_s: 1.0,
            inactive_duration_s: 1.0,
        }
    }

    fn barrel_cfg() -> ExplosiveBarrelCfg {
        ExplosiveBarrelCfg {
            damage: HazardDamageCfg { damage: 50, knockback_force: 18.0, knockback_duration_s: 0.3 },
            burst_radius: 3.0,
            charge_time_s: 1.0,
            trigger_radius: 0.8,
        }
    }

    fn world(spawns: &[Vec3]) -> (StaticScene, EntityStore) {
        let mut s = StaticScene::new();
        s.add_ground_slab(Vec2::splat(-20.0), Vec2::splat(20.0), 0.0);
        let mut entities = EntityStore::default();
        for pos in spawns {
            entities.spawn(|id| Entity::stub(id.0, EntityKind::Player, *pos));
        }
        (s, entities)
    }

    #[test]
    fn spike_cycle_toggles_and_damages_only_while_active() {
        let (s, entities) = world(&[Vec3::new(0.1, 0.0, 0.1)]);
        let proxies = entities.proxies();
        let view = SceneView { statics: &s, dynamics: &proxies };
        let mut spike = Hazard::spike(&spike_cfg(), Vec3::ZERO, 0.0);
        let (mut dmg, mut fx) = (Vec::new(), Vec::new());

        // Offset 0: activates on the first tick and damages immediately.
        spike.tick(&view, &entities, 0.016, &mut dmg, &mut fx);
        assert_eq!(dmg.len(), 1);
        assert_eq!(dmg[0].dst, EntityId(1));
        assert!(matches!(fx[0], FxEvent::HazardArmed { .. }));

        // Run out the active second; it flips inactive and goes quiet.
        for _ in 0..63 {
            spike.tick(&view, &entities, 0.016, &mut dmg, &mut fx);
        }
        let during_active = dmg.len();
        for _ in 0..30 {
            spike.tick(&view, &entities, 0.016, &mut dmg, &mut fx);
        }
        assert_eq!(dmg.len(), during_active, "damaged while inactive");
    }

    #[test]
    fn spike_phase_offset_delays_first_activation() {
        let (s, entities) = world(&[Vec3::new(0.1, 0.0, 0.1)]);
        let proxies = entities.proxies();
        let view = SceneView { statics: &s, dynamics: &proxies };
        let mut spike = Hazard::spike(&spike_cfg(), Vec3::ZERO, 0.5);
        let (mut dmg, mut fx) = (Vec::new(), Vec::new());
        for _ in 0..25 {
            spike.tick(&view, &entities, 0.016, &mut dmg, &mut fx);
        }
        assert!(dmg.is_empty(), "activated before the phase offset elapsed");
        for _ in 0..10 {
            spike.tick(&view, &entities, 0.016, &mut dmg, &mut fx);
        }
        assert!(!dmg.is_empty());
    }

    #[test]
    fn spike_pass_queues_each_entity_once() {
        let (s, entities) = world(&[Vec3::new(0.3, 0.0, 0.0), Vec3::new(-0.3, 0.0, 0.0)]);
        let proxies = entities.proxies();
        let view = SceneView { statics: &s, dynamics: &proxies };
        let mut spike = Hazard::spike(&spike_cfg(), Vec3::ZERO, 0.0);
        let (mut dmg, mut fx) = (Vec::new(), Vec::new());
        spike.tick(&view, &entities, 0.016, &mut dmg, &mut fx);
        let mut dsts: Vec<_> = dmg.iter().map(|d| d.dst).collect();
        dsts.sort();
        assert_eq!(dsts, vec![EntityId(1), EntityId(2)]);
    }

    #[test]
    fn barrel_arms_charges_bursts_once_and_despawns() {
        let (s, entities) = world(&[Vec3::new(0.5, 0.0, 0.0)]);
        let proxies = entities.proxies();
        let view = SceneView { statics: &s, dynamics: &proxies };
        let mut barrel = Hazard::barrel(&barrel_cfg(), Vec3::ZERO);
        let (mut dmg, mut fx) = (Vec::new(), Vec::new());

        // Contact arms it; nothing detonates yet.
        barrel.tick(&view, &entities, 0.016, &mut dmg, &mut fx);
        assert!(dmg.is_empty());
        assert!(matches!(fx[0], FxEvent::HazardArmed { .. }));

        // Charge runs even if the trigger empties out.
        let mut ticks = 0;
        while !barrel.despawned {
            barrel.tick(&view, &entities, 0.016, &mut dmg, &mut fx);
            ticks += 1;
            assert!(ticks < 100, "barrel never burst");
        }
        assert_eq!(dmg.len(), 1);
        assert_eq!(dmg[0].amount, 50);
        assert!(dmg[0].knockback.x > 0.0, "knockback points away from the barrel");

        // Despawned: further ticks are inert.
        barrel.tick(&view, &entities, 0.016, &mut dmg, &mut fx);
        assert_eq!(dmg.len(), 1);
    }
}
