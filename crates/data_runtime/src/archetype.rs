//! Entity archetype configuration (player and enemy parameter blocks).
//!
//! Parses `data/config/archetypes.toml` into the movement, ground-check, and
//! health parameters the sim seeds entities with on spawn.

use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MovementCfg {
    pub speed_mps: f32,
    /// Blend rate toward the target facing, per second.
    pub rotation_rate: f32,
    /// Constant downward component applied after ground redirection.
    pub gravity: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GroundCheckCfg {
    /// Forward length of the probed path.
    pub distance: f32,
    /// Number of equally spaced downward samples along the path.
    pub resolution: u32,
    /// Length of each downward probe.
    pub probe_depth: f32,
    /// Redirect search tests rotations up to (exclusive) this many degrees.
    pub redirect_max_deg: i32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DashCfg {
    pub speed_mps: f32,
    pub duration_s: f32,
    pub cooldown_s: f32,
    /// Samples used when pre-clamping the dash length.
    pub ground_check_resolution: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerCfg {
    pub max_hp: i32,
    pub damage_cooldown_s: f32,
    pub radius: f32,
    pub half_height: f32,
    pub movement: MovementCfg,
    pub ground_check: GroundCheckCfg,
    pub dash: DashCfg,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnemyCfg {
    pub max_hp: i32,
    pub damage_cooldown_s: f32,
    pub radius: f32,
    pub half_height: f32,
    pub movement: MovementCfg,
    pub ground_check: GroundCheckCfg,
    /// The enemy starts tracking the player inside this range.
    pub vision_range: f32,
    /// The enemy swings once the player is inside this range.
    pub attack_range: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArchetypesCfg {
    pub player: PlayerCfg,
    pub enemy: EnemyCfg,
}

/// Load archetypes from `data/config/archetypes.toml`.
pub fn load_archetypes() -> Result<ArchetypesCfg> {
    crate::load_toml("config/archetypes.toml")
}
