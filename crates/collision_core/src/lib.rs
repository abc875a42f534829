//! collision_core: read-only collision queries for the simulation.
//!
//! The sim consumes this surface as an interface: downward/forward rays for
//! terrain probing, ray fans for melee resolution, and overlap regions for
//! hazards and checkpoint activation. `StaticScene` holds level geometry;
//! `SceneView` layers per-tick entity proxies on top without copying the
//! statics.

use glam::Vec3;
use smallvec::SmallVec;

pub mod shapes;

pub use shapes::{Aabb, Region, Shape};

/// Bit mask selecting which collider layers a query may hit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const GROUND: LayerMask = LayerMask(1 << 0);
    pub const OBSTACLE: LayerMask = LayerMask(1 << 1);
    pub const PLAYER: LayerMask = LayerMask(1 << 2);
    pub const ENEMY: LayerMask = LayerMask(1 << 3);

    #[inline]
    pub const fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
    #[inline]
    pub const fn union(self, other: LayerMask) -> LayerMask {
        LayerMask(self.0 | other.0)
    }
}

impl std::ops::BitOr for LayerMask {
    type Output = LayerMask;
    fn bitor(self, rhs: LayerMask) -> LayerMask {
        self.union(rhs)
    }
}

/// What a query hit: a piece of level geometry or a registered entity proxy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BodyRef {
    Level,
    Entity(u32),
}

#[derive(Copy, Clone, Debug)]
pub struct Collider {
    pub shape: Shape,
    pub layers: LayerMask,
    pub body: BodyRef,
}

#[derive(Copy, Clone, Debug)]
pub struct RayHit {
    pub body: BodyRef,
    pub distance: f32,
    pub point: Vec3,
}

/// Read-only query surface over the collision world.
pub trait QueryWorld {
    /// Nearest hit along `dir` within `max_dist`, restricted to `mask`.
    fn raycast(&self, origin: Vec3, dir: Vec3, max_dist: f32, mask: LayerMask) -> Option<RayHit>;
    /// All hits along the ray, nearest first.
    fn raycast_all(
        &self,
        origin: Vec3,
        dir: Vec3,
        max_dist: f32,
        mask: LayerMask,
    ) -> SmallVec<[RayHit; 4]>;
    /// Bodies whose colliders overlap `region`, restricted to `mask`.
    fn overlap_region(&self, region: &Region, mask: LayerMask) -> Vec<BodyRef>;
}

/// Immutable level geometry (ground slabs, walls, obstacles).
#[derive(Clone, Debug, Default)]
pub struct StaticScene {
    pub colliders: Vec<Collider>,
}

impl StaticScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, shape: Shape, layers: LayerMask) {
        self.colliders.push(Collider {
            shape,
            layers,
            body: BodyRef::Level,
        });
    }

    /// Axis-aligned ground slab whose top face is at `top_y`.
    pub fn add_ground_slab(&mut self, min_xz: glam::Vec2, max_xz: glam::Vec2, top_y: f32) {
        self.add(
            Shape::Aabb(Aabb {
                min: Vec3::new(min_xz.x, top_y - 1.0, min_xz.y),
                max: Vec3::new(max_xz.x, top_y, max_xz.y),
            }),
            LayerMask::GROUND,
        );
    }
}

fn cast_into<'a>(
    colliders: impl Iterator<Item = &'a Collider>,
    origin: Vec3,
    dir: Vec3,
    max_dist: f32,
    mask: LayerMask,
    out: &mut SmallVec<[RayHit; 4]>,
) {
    let dir = dir.normalize_or_zero();
    if dir == Vec3::ZERO || max_dist <= 0.0 {
        return;
    }
    for c in colliders {
        if !c.layers.intersects(mask) {
            continue;
        }
        if let Some(t) = shapes::ray_shape(origin, dir, max_dist, &c.shape) {
            out.push(RayHit {
                body: c.body,
                distance: t,
                point: origin + dir * t,
            });
        }
    }
    out.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}

fn overlap_into<'a>(
    colliders: impl Iterator<Item = &'a Collider>,
    region: &Region,
    mask: LayerMask,
    out: &mut Vec<BodyRef>,
) {
    for c in colliders {
        if !c.layers.intersects(mask) {
            continue;
        }
        if shapes::region_overlaps_shape(region, &c.shape) {
            out.push(c.body);
        }
    }
}

impl QueryWorld for StaticScene {
    fn raycast(&self, origin: Vec3, dir: Vec3, max_dist: f32, mask: LayerMask) -> Option<RayHit> {
        let mut hits: SmallVec<[RayHit; 4]> = SmallVec::new();
        cast_into(self.colliders.iter(), origin, dir, max_dist, mask, &mut hits);
        hits.first().copied()
    }

    fn raycast_all(
        &self,
        origin: Vec3,
        dir: Vec3,
        max_dist: f32,
        mask: LayerMask,
    ) -> SmallVec<[RayHit; 4]> {
        let mut hits: SmallVec<[RayHit; 4]> = SmallVec::new();
        cast_into(self.colliders.iter(), origin, dir, max_dist, mask, &mut hits);
        hits
    }

    fn overlap_region(&self, region: &Region, mask: LayerMask) -> Vec<BodyRef> {
        let mut out = Vec::new();
        overlap_into(self.colliders.iter(), region, mask, &mut out);
        out
    }
}

/// Statics plus a per-tick snapshot of entity proxies (vertical cylinders).
/// Rebuilt once per simulation step; queries during the step see positions
/// as they were when the step began.
pub struct SceneView<'a> {
    pub statics: &'a StaticScene,
    pub dynamics: &'a [Collider],
}

impl QueryWorld for SceneView<'_> {
    fn raycast(&self, origin: Vec3, dir: Vec3, max_dist: f32, mask: LayerMask) -> Option<RayHit> {
        let mut hits: SmallVec<[RayHit; 4]> = SmallVec::new();
        cast_into(
            self.statics.colliders.iter().chain(self.dynamics.iter()),
            origin,
            dir,
            max_dist,
            mask,
            &mut hits,
        );
        hits.first().copied()
    }

    fn raycast_all(
        &self,
        origin: Vec3,
        dir: Vec3,
        max_dist: f32,
        mask: LayerMask,
    ) -> SmallVec<[RayHit; 4]> {
        let mut hits: SmallVec<[RayHit; 4]> = SmallVec::new();
        cast_into(
            self.statics.colliders.iter().chain(self.dynamics.iter()),
            origin,
            dir,
            max_dist,
            mask,
            &mut hits,
        );
        hits
    }

    fn overlap_region(&self, region: &Region, mask: LayerMask) -> Vec<BodyRef> {
        let mut out = Vec::new();
        overlap_into(
            self.statics.colliders.iter().chain(self.dynamics.iter()),
            region,
            mask,
            &mut out,
        );
        out
    }
}
