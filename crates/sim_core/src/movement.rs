//! Ground-adaptive movement: redirect search, facing blend, integration.

use crate::entity::Entity;
use crate::probe::{self, GroundCheck};
use collision_core::QueryWorld;
use glam::{Quat, Vec3};

/// Movement parameters, seeded from config at spawn.
#[derive(Copy, Clone, Debug)]
pub struct MoveParams {
    pub speed_mps: f32,
    /// Blend rate toward the target facing, per second.
    pub rotation_rate: f32,
    /// Constant downward component added after redirection.
    pub gravity: f32,
}

/// Outcome of resolving a desired direction against the terrain.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MoveResult {
    /// The desired direction itself is walkable.
    Forward(Vec3),
    /// A rotated direction is walkable; `angle_deg` is the rotation applied
    /// (negative = clockwise seen from above).
    Redirected { dir: Vec3, angle_deg: i32 },
    Blocked,
}

impl MoveResult {
    /// The direction actually walked; zero when blocked.
    pub fn direction(&self) -> Vec3 {
        match *self {
            MoveResult::Forward(d) => d,
            MoveResult::Redirected { dir, .. } => dir,
            MoveResult::Blocked => Vec3::ZERO,
        }
    }
}

pub(crate) fn rotate_y(v: Vec3, deg: f32) -> Vec3 {
    Quat::from_rotation_y(deg.to_radians()) * v
}

fn wrap_angle(a: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    (a + PI).rem_euclid(TAU) - PI
}

/// Resolves `desired` against the terrain. If the straight path fails, tests
/// rotated candidates in steps of a tenth of the search arc, clockwise before
/// counter-clockwise at each step, up to (exclusive) the arc limit. A safe
/// desired direction is always returned unchanged.
pub fn resolve_grounded(
    world: &impl QueryWorld,
    gc: &GroundCheck,
    pos: Vec3,
    desired: Vec3,
) -> MoveResult {
    let desired = desired.normalize_or_zero();
    if desired == Vec3::ZERO {
        return MoveResult::Blocked;
    }
    if probe::assess(world, gc, pos, desired).is_clear() {
        return MoveResult::Forward(desired);
    }
    let step = (gc.redirect_max_deg / 10).max(1);
    let mut angle = step;
    while angle < gc.redirect_max_deg {
        let cw = rotate_y(desired, -(angle as f32));
        if probe::assess(world, gc, pos, cw).is_clear() {
            return MoveResult::Redirected { dir: cw, angle_deg: -angle };
        }
        let ccw = rotate_y(desired, angle as f32);
        if probe::assess(world, gc, pos, ccw).is_clear() {
            return MoveResult::Redirected { dir: ccw, angle_deg: angle };
        }
        angle += step;
    }
    MoveResult::Blocked
}

/// Blends yaw toward `dir` at the entity's rotation rate. No-op for zero.
pub fn face_toward(e: &mut Entity, dir: Vec3, dt: f32) {
    let dir = dir.normalize_or_zero();
    if dir == Vec3::ZERO {
        return;
    }
    let target = dir.x.atan2(dir.z);
    let t = (e.move_params.rotation_rate * dt).min(1.0);
    let delta = wrap_angle(target - e.yaw);
    e.yaw = wrap_angle(e.yaw + delta * t);
}

/// Clamps the entity back onto the ground surface directly beneath it.
/// Gravity in `apply` is what pulls entities down; this is what stops them.
pub fn settle(world: &impl QueryWorld, e: &mut Entity) {
    let origin = e.pos + Vec3::Y * 0.5;
    if let Some(hit) = world.raycast(
        origin,
        Vec3::NEG_Y,
        e.ground.probe_depth + 0.5,
        e.ground.ground_mask,
    ) {
        e.pos.y = hit.point.y;
    }
}

/// One ordinary-movement tick: resolve, rotate, integrate with gravity,
/// settle. Gated on the entity's `ordinary_movement` flag so motion tasks
/// can take over cleanly. Returns what the resolver decided.
pub fn apply(world: &impl QueryWorld, e: &mut Entity, desired: Vec3, dt: f32) -> MoveResult {
    if !e.ordinary_movement || e.dead {
        return MoveResult::Blocked;
    }
    let desired = Vec3::new(desired.x, 0.0, desired.z).normalize_or_zero();
    let res = if desired == Vec3::ZERO {
        MoveResult::Blocked
    } else {
        resolve_grounded(world, &e.ground, e.pos, desired)
    };
    let dir = res.direction();
    if dir != Vec3::ZERO {
        face_toward(e, dir, dt);
    }
    let vel = dir * e.move_params.speed_mps + Vec3::NEG_Y * e.move_params.gravity;
    e.pos += vel * dt;
    settle(world, e);
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use approx::assert_abs_diff_eq;
    use collision_core::StaticScene;
    use glam::Vec2;

    fn slab(min: Vec2, max: Vec2) -> StaticScene {
        let mut s = StaticScene::new();
        s.add_ground_slab(min, max, 0.0);
        s
    }

    fn walker(pos: Vec3) -> Entity {
        Entity::stub(1, EntityKind::Player, pos)
    }

    #[test]
    fn safe_direction_passes_through_unchanged() {
        let s = slab(Vec2::splat(-10.0), Vec2::splat(10.0));
        let res = resolve_grounded(&s, &GroundCheck::default(), Vec3::ZERO, Vec3::Z);
        assert_eq!(res, MoveResult::Forward(Vec3::Z));
    }

    #[test]
    fn edge_redirects_along_boundary() {
        // Slab ends at x=5; pushing +X near the edge should be bent, not stopped.
        let s = slab(Vec2::new(-5.0, -20.0), Vec2::new(5.0, 20.0));
        let res = resolve_grounded(
            &s,
            &GroundCheck::default(),
            Vec3::new(4.2, 0.0, 0.0),
            Vec3::X,
        );
        match res {
            MoveResult::Redirected { dir, angle_deg } => {
                assert_ne!(angle_deg, 0);
                assert!(angle_deg.abs() < 50);
                // The redirected direction must actually stay on the slab.
                assert!(dir.x < 1.0);
                assert_abs_diff_eq!(dir.length(), 1.0, epsilon = 1e-5);
            }
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[test]
    fn clockwise_candidate_wins_at_equal_angle() {
        // Both 40-degree candidates stay on the slab here; the clockwise one
        // is tested first and must be the one returned.
        let s = slab(Vec2::new(-5.0, -20.0), Vec2::new(5.0, 20.0));
        let gc = GroundCheck::default();
        match resolve_grounded(&s, &gc, Vec3::new(4.2, 0.0, 0.0), Vec3::X) {
            MoveResult::Redirected { angle_deg, .. } => assert_eq!(angle_deg, -40),
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[test]
    fn blocked_when_all_candidates_fail() {
        // A 1x1 island: every direction off it loses the ground.
        let s = slab(Vec2::new(-0.4, -0.4), Vec2::new(0.4, 0.4));
        let res = resolve_grounded(&s, &GroundCheck::default(), Vec3::ZERO, Vec3::Z);
        assert_eq!(res, MoveResult::Blocked);
    }

    #[test]
    fn wall_arc_blocks_every_candidate() {
        // A wide wall directly ahead covers the whole redirect arc.
        let mut s = slab(Vec2::splat(-10.0), Vec2::splat(10.0));
        s.add(
            collision_core::Shape::Aabb(collision_core::Aabb {
                min: Vec3::new(-3.0, 0.0, 0.2),
                max: Vec3::new(3.0, 2.0, 0.4),
            }),
            collision_core::LayerMask::OBSTACLE,
        );
        let mut e = walker(Vec3::new(0.0, 0.5, 0.0));
        let res = apply(&s, &mut e, Vec3::Z, 0.016);
        assert_eq!(res, MoveResult::Blocked);
        assert_eq!(e.pos.x, 0.0);
        assert_eq!(e.pos.z, 0.0);
    }

    #[test]
    fn blocked_input_leaves_yaw_alone() {
        let s = slab(Vec2::new(-0.4, -0.4), Vec2::new(0.4, 0.4));
        let mut e = walker(Vec3::ZERO);
        e.yaw = 1.0;
        let res = apply(&s, &mut e, Vec3::Z, 0.016);
        assert_eq!(res, MoveResult::Blocked);
        assert_abs_diff_eq!(e.yaw, 1.0);
        // Settled back on the island despite gravity.
        assert_abs_diff_eq!(e.pos.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn dead_entity_never_moves() {
        let s = slab(Vec2::splat(-20.0), Vec2::splat(20.0));
        let mut e = walker(Vec3::ZERO);
        e.dead = true;
        e.yaw = 1.0;
        let res = apply(&s, &mut e, Vec3::Z, 0.016);
        assert_eq!(res, MoveResult::Blocked);
        assert_eq!(e.pos, Vec3::ZERO);
        assert_abs_diff_eq!(e.yaw, 1.0);
    }

    #[test]
    fn walking_advances_and_turns() {
        let s = slab(Vec2::splat(-20.0), Vec2::splat(20.0));
        let mut e = walker(Vec3::ZERO);
        for _ in 0..10 {
            apply(&s, &mut e, Vec3::X, 0.016);
        }
        assert!(e.pos.x > 1.0);
        assert_abs_diff_eq!(e.pos.y, 0.0, epsilon = 1e-4);
        // Facing has blended toward +X.
        assert!(e.yaw > 0.5);
    }
}
