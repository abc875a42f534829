//! Scenario files: level geometry, spawns, hazards, checkpoints, goal.
//!
//! A scenario is everything the harness needs to build a `SimState` without
//! an editor or asset pipeline. Positions are plain arrays here; the sim
//! converts to `glam` vectors at build time.

use anyhow::Result;
use glam::Vec3;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SlabDef {
    /// XZ rectangle of the walkable slab.
    pub min: [f32; 2],
    pub max: [f32; 2],
    /// Height of the walkable top face.
    #[serde(default)]
    pub top_y: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BoxDef {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardKind {
    SpikePlatform,
    ExplosiveBarrel,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HazardDef {
    pub kind: HazardKind,
    pub pos: [f32; 3],
    /// Phase offset into the active/inactive cycle, 0..1 (spike platforms).
    #[serde(default)]
    pub activation_offset: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CheckpointDef {
    pub pos: [f32; 3],
    /// Respawn point relative to the checkpoint; zero means "use the
    /// checkpoint position itself" (warned about at build time).
    #[serde(default)]
    pub spawn_offset: [f32; 3],
    pub activation_radius: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub player_pos: [f32; 3],
    #[serde(default)]
    pub enemy_pos: Vec<[f32; 3]>,
    pub ground: Vec<SlabDef>,
    #[serde(default)]
    pub obstacles: Vec<BoxDef>,
    #[serde(default)]
    pub hazards: Vec<HazardDef>,
    #[serde(default)]
    pub checkpoints: Vec<CheckpointDef>,
    /// Reaching this region ends the run with a victory transition.
    #[serde(default)]
    pub goal: Option<BoxDef>,
}

pub fn vec3(a: [f32; 3]) -> Vec3 {
    Vec3::from_array(a)
}

/// Load a scenario TOML from `data/scenarios/` or an absolute path.
pub fn load_scenario(rel: impl AsRef<Path>) -> Result<Scenario> {
    let rel = rel.as_ref();
    if rel.is_absolute() {
        let txt = std::fs::read_to_string(rel)
            .map_err(|e| anyhow::anyhow!("read scenario {}: {e}", rel.display()))?;
        return Ok(toml::from_str(&txt)?);
    }
    crate::load_toml(Path::new("scenarios").join(rel))
}
