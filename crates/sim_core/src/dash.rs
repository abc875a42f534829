//! Dash: a short invulnerable burst with its length pre-clamped to terrain.

use crate::entity::Entity;
use crate::movement;
use collision_core::QueryWorld;
use data_runtime::archetype::DashCfg;
use glam::Vec3;

/// How far past the nominal dash distance the clamp search begins.
const REACH_MARGIN: f32 = 1.2;
/// Depth of the landing-spot ground check.
const LANDING_PROBE_DEPTH: f32 = 2.0;

/// A running dash. Velocity is fixed at start; the duration was already
/// clamped so the far end lands on ground with a clear path to it.
#[derive(Clone, Debug)]
pub struct DashTask {
    vel: Vec3,
    remaining_s: f32,
}

impl DashTask {
    /// Resolves the dash length before the first step. Samples the extended
    /// reach from the far end inward; the first sample that is over ground
    /// and reachable without an obstacle sets the length, pulled in by two
    /// sample steps. Returns nothing when no sample qualifies.
    pub fn begin(
        world: &impl QueryWorld,
        e: &Entity,
        cfg: &DashCfg,
        input_dir: Vec3,
    ) -> Option<Self> {
        let dir = Vec3::new(input_dir.x, 0.0, input_dir.z).normalize_or_zero();
        let dir = if dir == Vec3::ZERO { e.forward() } else { dir };
        let vel = dir * cfg.speed_mps;
        let reach = vel * cfg.duration_s * REACH_MARGIN;
        let multiplier = length_multiplier(world, e, reach, cfg.ground_check_resolution);
        if multiplier <= 0.0 {
            log::debug!("dash refused: no landing spot along {dir}");
            return None;
        }
        Some(Self {
            vel,
            remaining_s: cfg.duration_s * REACH_MARGIN * multiplier,
        })
    }

    pub fn tick(&mut self, world: &impl QueryWorld, e: &mut Entity, dt: f32) -> bool {
        e.pos += self.vel * dt;
        movement::settle(world, e);
        self.remaining_s -= dt;
        self.remaining_s <= 0.0
    }
}

fn length_multiplier(world: &impl QueryWorld, e: &Entity, reach: Vec3, res: u32) -> f32 {
    let res = res.max(1);
    let step = 1.0 / res as f32;
    let reach_len = reach.length();
    let reach_dir = reach.normalize_or_zero();
    let origin = e.pos + Vec3::Y * e.half_height;
    let mut i = 1.0_f32;
    while i > 0.0 {
        let sample = e.pos + reach * i + Vec3::Y * 0.1;
        let grounded = world
            .raycast(sample, Vec3::NEG_Y, LANDING_PROBE_DEPTH, e.ground.ground_mask)
            .is_some();
        if grounded
            && world
                .raycast(origin, reach_dir, reach_len * i, e.ground.obstacle_mask)
                .is_none()
        {
            return (i - step * 2.0).max(0.0);
        }
        i -= step;
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use collision_core::{Aabb, LayerMask, Shape, StaticScene};
    use glam::Vec2;

    fn cfg() -> DashCfg {
        DashCfg {
            speed_mps: 20.0,
            duration_s: 0.25,
            cooldown_s: 0.2,
            ground_check_resolution: 5,
        }
    }

    fn dasher(pos: Vec3) -> Entity {
        Entity::stub(1, EntityKind::Player, pos)
    }

    #[test]
    fn open_ground_gives_nearly_full_length() {
        let mut s = StaticScene::new();
        s.add_ground_slab(Vec2::splat(-50.0), Vec2::splat(50.0), 0.0);
        let e = dasher(Vec3::ZERO);
        let mut dash = DashTask::begin(&s, &e, &cfg(), Vec3::Z).expect("dash");
        let mut e = e;
        let mut done = false;
        for _ in 0..40 {
            done = dash.tick(&s, &mut e, 0.016);
            if done {
                break;
            }
        }
        assert!(done);
        // Full reach is 6 m; the clamp pulls in two samples (2.4 m here).
        assert!(e.pos.z > 3.0, "dash covered {}", e.pos.z);
        assert!(e.pos.z < 6.5);
    }

    #[test]
    fn cliff_shortens_the_dash() {
        // Ground ends at z=2; a 6 m reach must be clamped hard.
        let mut s = StaticScene::new();
        s.add_ground_slab(Vec2::new(-10.0, -10.0), Vec2::new(10.0, 2.0), 0.0);
        let e = dasher(Vec3::ZERO);
        let fine = DashCfg { ground_check_resolution: 10, ..cfg() };
        let mut dash = DashTask::begin(&s, &e, &fine, Vec3::Z).expect("short dash");
        let mut e = e;
        for _ in 0..40 {
            if dash.tick(&s, &mut e, 0.016) {
                break;
            }
        }
        assert!(e.pos.z < 2.0, "overshot the cliff: {}", e.pos.z);
    }

    #[test]
    fn wall_refuses_or_stops_short() {
        // Wall right in front: every landing sample past it is unreachable.
        let mut s = StaticScene::new();
        s.add_ground_slab(Vec2::splat(-10.0), Vec2::splat(10.0), 0.0);
        s.add(
            Shape::Aabb(Aabb {
                min: Vec3::new(-2.0, 0.0, 0.8),
                max: Vec3::new(2.0, 3.0, 1.2),
            }),
            LayerMask::OBSTACLE,
        );
        let e = dasher(Vec3::ZERO);
        match DashTask::begin(&s, &e, &cfg(), Vec3::Z) {
            None => {}
            Some(mut dash) => {
                let mut e = e;
                for _ in 0..40 {
                    if dash.tick(&s, &mut e, 0.016) {
                        break;
                    }
                }
                assert!(e.pos.z < 0.9, "dashed into the wall: {}", e.pos.z);
            }
        }
    }

    #[test]
    fn zero_input_dashes_along_facing() {
        let mut s = StaticScene::new();
        s.add_ground_slab(Vec2::splat(-50.0), Vec2::splat(50.0), 0.0);
        let mut e = dasher(Vec3::ZERO);
        e.yaw = std::f32::consts::FRAC_PI_2; // facing +X
        let mut dash = DashTask::begin(&s, &e, &cfg(), Vec3::ZERO).expect("dash");
        for _ in 0..40 {
            if dash.tick(&s, &mut e, 0.016) {
                break;
            }
        }
        assert!(e.pos.x > 1.0);
        assert!(e.pos.z.abs() < 1e-3);
    }
}
