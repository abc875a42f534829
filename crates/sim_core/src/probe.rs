//! Terrain probing: is a path walkable?
//!
//! A path is probed with `resolution` equally spaced downward rays along it
//! (no ground under any sample fails the probe) plus one forward ray for
//! obstacles. Movement, knockback, and dashes all route through this.

use collision_core::{LayerMask, QueryWorld};
use data_runtime::archetype::GroundCheckCfg;
use glam::Vec3;

/// Probe parameters, seeded from config at spawn.
#[derive(Copy, Clone, Debug)]
pub struct GroundCheck {
    /// Forward length of the probed path.
    pub distance: f32,
    /// Number of downward samples along the path.
    pub resolution: u32,
    /// Length of each downward ray.
    pub probe_depth: f32,
    /// Redirect search tests rotations up to (exclusive) this many degrees.
    pub redirect_max_deg: i32,
    pub ground_mask: LayerMask,
    pub obstacle_mask: LayerMask,
}

impl Default for GroundCheck {
    fn default() -> Self {
        Self {
            distance: 1.0,
            resolution: 2,
            probe_depth: 1.0,
            redirect_max_deg: 50,
            ground_mask: LayerMask::GROUND,
            obstacle_mask: LayerMask::OBSTACLE,
        }
    }
}

impl GroundCheck {
    pub fn from_cfg(cfg: &GroundCheckCfg) -> Self {
        Self {
            distance: cfg.distance,
            resolution: cfg.resolution.max(1),
            probe_depth: cfg.probe_depth,
            redirect_max_deg: cfg.redirect_max_deg,
            ..Self::default()
        }
    }
}

/// Why a probed path failed, if it did.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ProbeResult {
    Clear,
    /// The first path sample with nothing beneath it.
    NoGround { sample: Vec3 },
    /// A forward obstacle, with the entry distance along the path.
    Blocked { distance: f32 },
}

impl ProbeResult {
    pub fn is_clear(&self) -> bool {
        matches!(self, ProbeResult::Clear)
    }
}

/// Probes the path from `pos` along `dir` (normalized internally).
/// Downward samples run first, nearest to farthest, then the obstacle ray.
pub fn assess(world: &impl QueryWorld, gc: &GroundCheck, pos: Vec3, dir: Vec3) -> ProbeResult {
    let dir = dir.normalize_or_zero();
    if dir == Vec3::ZERO {
        return ProbeResult::Clear;
    }
    let n = gc.resolution.max(1);
    for i in 1..=n {
        let frac = i as f32 / n as f32;
        let sample = pos + dir * (gc.distance * frac);
        if world
            .raycast(sample, Vec3::NEG_Y, gc.probe_depth, gc.ground_mask)
            .is_none()
        {
            return ProbeResult::NoGround { sample };
        }
    }
    if let Some(hit) = world.raycast(pos, dir, gc.distance, gc.obstacle_mask) {
        return ProbeResult::Blocked { distance: hit.distance };
    }
    ProbeResult::Clear
}

pub fn is_safe(world: &impl QueryWorld, gc: &GroundCheck, pos: Vec3, dir: Vec3) -> bool {
    assess(world, gc, pos, dir).is_clear()
}

#[cfg(test)]
mod tests {
    use super::*;
    use collision_core::{Aabb, Shape, StaticScene};
    use glam::Vec2;

    fn slab() -> StaticScene {
        let mut s = StaticScene::new();
        s.add_ground_slab(Vec2::new(-5.0, -5.0), Vec2::new(5.0, 5.0), 0.0);
        s
    }

    #[test]
    fn clear_path_over_slab() {
        let s = slab();
        let gc = GroundCheck::default();
        assert!(is_safe(&s, &gc, Vec3::new(0.0, 0.0, 0.0), Vec3::Z));
    }

    #[test]
    fn edge_reports_no_ground_at_first_failing_sample() {
        let s = slab();
        let gc = GroundCheck::default();
        // Standing 0.3 from the edge: the first sample (0.5 out) is already off.
        match assess(&s, &gc, Vec3::new(4.7, 0.0, 0.0), Vec3::X) {
            ProbeResult::NoGround { sample } => {
                assert!(sample.x > 5.0);
            }
            other => panic!("expected NoGround, got {other:?}"),
        }
    }

    #[test]
    fn wall_reports_blocked_with_distance() {
        let mut s = slab();
        s.add(
            Shape::Aabb(Aabb {
                min: Vec3::new(-1.0, -0.5, 0.6),
                max: Vec3::new(1.0, 2.0, 1.0),
            }),
            LayerMask::OBSTACLE,
        );
        match assess(&s, &GroundCheck::default(), Vec3::new(0.0, 0.5, 0.0), Vec3::Z) {
            ProbeResult::Blocked { distance } => {
                assert!((distance - 0.6).abs() < 1e-4);
            }
            other => panic!("expected Blocked, got {other:?}"),
        }
    }

    #[test]
    fn missing_ground_wins_over_farther_obstacle() {
        // Wall sits past the slab edge; the edge fails first.
        let mut s = slab();
        s.add(
            Shape::Aabb(Aabb {
                min: Vec3::new(5.5, -0.5, -1.0),
                max: Vec3::new(6.0, 2.0, 1.0),
            }),
            LayerMask::OBSTACLE,
        );
        let gc = GroundCheck { distance: 2.0, ..GroundCheck::default() };
        assert!(matches!(
            assess(&s, &gc, Vec3::new(4.5, 0.5, 0.0), Vec3::X),
            ProbeResult::NoGround { .. }
        ));
    }
}
