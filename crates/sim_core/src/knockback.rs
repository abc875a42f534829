//! Knockback: decaying forced displacement with re-grounding each step.

use crate::entity::Entity;
use crate::movement::{self, resolve_grounded};
use collision_core::QueryWorld;
use glam::Vec3;

/// A running knockback. The direction is re-resolved against the terrain
/// every step; the magnitude decays multiplicatively and reaches exactly
/// zero when the duration elapses.
#[derive(Clone, Debug)]
pub struct KnockbackTask {
    dir: Vec3,
    force: f32,
    duration_s: f32,
    elapsed_s: f32,
}

impl KnockbackTask {
    /// `impulse` is direction times force. Zero impulse or non-positive
    /// duration produces no task at all.
    pub fn new(impulse: Vec3, duration_s: f32) -> Option<Self> {
        let force = impulse.length();
        if force <= 1e-6 || duration_s <= 0.0 {
            return None;
        }
        Some(Self {
            dir: impulse / force,
            force,
            duration_s,
            elapsed_s: 0.0,
        })
    }

    pub fn force(&self) -> f32 {
        self.force
    }

    /// Advances one step. Returns true when the knockback has run its course.
    pub fn tick(&mut self, world: &impl QueryWorld, e: &mut Entity, dt: f32) -> bool {
        // Re-ground the push direction. Once it collapses to zero it stays
        // zero; the decay clock keeps running regardless.
        if self.dir != Vec3::ZERO {
            self.dir = resolve_grounded(world, &e.ground, e.pos, self.dir).direction();
        }
        e.pos += self.dir * self.force * dt;
        movement::settle(world, e);
        self.elapsed_s = (self.elapsed_s + dt).min(self.duration_s);
        self.force *= (1.0 - self.elapsed_s / self.duration_s).max(0.0);
        self.elapsed_s >= self.duration_s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use collision_core::StaticScene;
    use glam::Vec2;

    fn open_field() -> StaticScene {
        let mut s = StaticScene::new();
        s.add_ground_slab(Vec2::splat(-50.0), Vec2::splat(50.0), 0.0);
        s
    }

    fn target(pos: Vec3) -> Entity {
        let mut e = Entity::stub(1, EntityKind::Enemy, pos);
        e.ordinary_movement = false;
        e
    }

    #[test]
    fn zero_impulse_spawns_nothing() {
        assert!(KnockbackTask::new(Vec3::ZERO, 0.2).is_none());
        assert!(KnockbackTask::new(Vec3::Z * 8.0, 0.0).is_none());
    }

    #[test]
    fn force_decays_monotonically_to_exact_zero() {
        let s = open_field();
        let mut e = target(Vec3::ZERO);
        let mut kb = KnockbackTask::new(Vec3::Z * 10.0, 0.2).expect("task");
        let dt = 0.05;
        let mut prev = kb.force();
        let mut done = false;
        for _ in 0..4 {
            done = kb.tick(&s, &mut e, dt);
            assert!(kb.force() < prev || kb.force() == 0.0);
            prev = kb.force();
        }
        assert!(done);
        assert_eq!(kb.force(), 0.0);
        assert!(e.pos.z > 0.0);
    }

    #[test]
    fn displacement_shrinks_each_step() {
        let s = open_field();
        let mut e = target(Vec3::ZERO);
        let mut kb = KnockbackTask::new(Vec3::Z * 10.0, 0.4).expect("task");
        let dt = 0.1;
        let mut last = f32::MAX;
        for _ in 0..4 {
            let z0 = e.pos.z;
            kb.tick(&s, &mut e, dt);
            let step = e.pos.z - z0;
            assert!(step < last);
            last = step;
        }
    }

    #[test]
    fn blocked_direction_collapses_and_never_recovers() {
        // Tiny island: the push direction cannot be grounded anywhere, so the
        // entity must not move even though the timer keeps running.
        let mut s = StaticScene::new();
        s.add_ground_slab(Vec2::splat(-0.4), Vec2::splat(0.4), 0.0);
        let mut e = target(Vec3::ZERO);
        let mut kb = KnockbackTask::new(Vec3::Z * 20.0, 0.3).expect("task");
        let mut done = false;
        for _ in 0..6 {
            done = kb.tick(&s, &mut e, 0.05);
        }
        assert!(done);
        assert_eq!(e.pos.x, 0.0);
        assert_eq!(e.pos.z, 0.0);
    }
}
