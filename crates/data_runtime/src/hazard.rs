//! Hazard configuration (spike platforms, explosive barrels).

use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HazardDamageCfg {
    pub damage: i32,
    pub knockback_force: f32,
    pub knockback_duration_s: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpikePlatformCfg {
    #[serde(flatten)]
    pub damage: HazardDamageCfg,
    /// Box damage area, full extents, centered on the hazard plus offset.
    pub area_size: [f32; 3],
    #[serde(default)]
    pub area_offset: [f32; 3],
    pub active_duration_s: f32,
    pub inactive_duration_s: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExplosiveBarrelCfg {
    #[serde(flatten)]
    pub damage: HazardDamageCfg,
    /// Spherical burst radius.
    pub burst_radius: f32,
    /// Delay between being triggered and detonating.
    pub charge_time_s: f32,
    /// Contact region radius that arms the barrel.
    pub trigger_radius: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HazardsCfg {
    pub spike_platform: SpikePlatformCfg,
    pub explosive_barrel: ExplosiveBarrelCfg,
}

/// Load hazard definitions from `data/config/hazards.toml`.
/// Damage is clamped to >= 0, as for attacks.
pub fn load_hazards() -> Result<HazardsCfg> {
    let mut cfg: HazardsCfg = crate::load_toml("config/hazards.toml")?;
    cfg.spike_platform.damage.damage = cfg.spike_platform.damage.damage.max(0);
    cfg.explosive_barrel.damage.damage = cfg.explosive_barrel.damage.damage.max(0);
    Ok(cfg)
}
