//! Outbound event buses.
//!
//! The sim never talks to audio, VFX, UI, or a scene loader directly. It
//! pushes events here each tick; the embedder drains them after `step` and
//! maps them onto whatever presentation layer it has.

use crate::entity::EntityId;
use glam::Vec3;

/// Scene index in the embedder's scene table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SceneId(pub u32);

pub const SCENE_MAIN_MENU: SceneId = SceneId(1);
pub const SCENE_GAME_OVER: SceneId = SceneId(2);
pub const SCENE_VICTORY: SceneId = SceneId(3);

/// Request to leave the current run. Drained by the embedder; the sim itself
/// keeps stepping until it is torn down.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SceneRequest {
    pub target: SceneId,
}

/// Pending damage, resolved this tick and applied in the damage phase.
/// Resolvers never mutate health directly.
#[derive(Clone, Debug)]
pub struct DamageEvent {
    /// Attacking entity; hazards have none.
    pub src: Option<EntityId>,
    pub dst: EntityId,
    pub amount: i32,
    /// Direction times force; zero means no knockback.
    pub knockback: Vec3,
    pub knockback_duration_s: f32,
}

/// Presentation-side notifications (feedback flashes, sounds, pickups).
#[derive(Clone, Debug)]
pub enum FxEvent {
    AttackStarted {
        entity: EntityId,
        combo_index: usize,
    },
    DashStarted {
        entity: EntityId,
    },
    DamageTaken {
        entity: EntityId,
        amount: i32,
        hp_after: i32,
    },
    Died {
        entity: EntityId,
        pos: Vec3,
    },
    /// Enemies drop a pickup where they fell.
    ItemDropped {
        pos: Vec3,
    },
    /// A spike platform raised its spikes or a barrel started charging.
    HazardArmed {
        pos: Vec3,
    },
    HazardBurst {
        pos: Vec3,
    },
    CheckpointActivated {
        spawn_point: Vec3,
    },
}
