//! Checkpoints and the respawn-point registry.
//!
//! The registry is a plain service owned by the state; checkpoints poll
//! their activation area on a one-second cadence and overwrite the respawn
//! point when the player stands inside.

use crate::events::FxEvent;
use collision_core::{LayerMask, QueryWorld, Region};
use glam::Vec3;

use crate::timer::Countdown;

pub const POLL_INTERVAL_S: f32 = 1.0;

/// Where the player comes back. Seeded with the scenario spawn; a fresh run
/// constructs a fresh registry.
#[derive(Clone, Debug)]
pub struct CheckpointRegistry {
    spawn_point: Vec3,
}

impl CheckpointRegistry {
    pub fn new(initial: Vec3) -> Self {
        Self { spawn_point: initial }
    }

    pub fn spawn_point(&self) -> Vec3 {
        self.spawn_point
    }

    pub fn set_spawn_point(&mut self, p: Vec3) {
        self.spawn_point = p;
    }
}

#[derive(Clone, Debug)]
pub struct Checkpoint {
    pub pos: Vec3,
    pub spawn_offset: Vec3,
    pub radius: f32,
    poll: Countdown,
}

impl Checkpoint {
    pub fn new(pos: Vec3, spawn_offset: Vec3, radius: f32) -> Self {
        if spawn_offset == Vec3::ZERO {
            log::warn!("checkpoint at {pos} has no spawn offset; respawning on the marker itself");
        }
        Self { pos, spawn_offset, radius, poll: Countdown::default() }
    }

    pub fn spawn_point(&self) -> Vec3 {
        self.pos + self.spawn_offset
    }

    /// Polls for the player at most once per interval. Sets the registry
    /// point on overlap; emits an event only when the point actually moved.
    pub fn tick(
        &mut self,
        world: &impl QueryWorld,
        registry: &mut CheckpointRegistry,
        dt: f32,
        fx: &mut Vec<FxEvent>,
    ) {
        if !self.poll.ready() {
            self.poll.tick(dt);
            return;
        }
        self.poll.reset(POLL_INTERVAL_S);
        let area = Region::Sphere { center: self.pos, radius: self.radius };
        if world.overlap_region(&area, LayerMask::PLAYER).is_empty() {
            return;
        }
        let point = self.spawn_point();
        if registry.spawn_point() != point {
            registry.set_spawn_point(point);
            log::info!("checkpoint activated; respawn moved to {point}");
            fx.push(FxEvent::CheckpointActivated { spawn_point: point });
        }
    }
}
