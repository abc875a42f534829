//! Melee attack definitions.
//!
//! Parses `data/config/attacks.toml`. An attack is immutable configuration;
//! entities reference these specs, they never mutate them.

use anyhow::Result;
use serde::Deserialize;

/// One melee attack: damage, reach, knockback, and the movement profile the
/// attacker follows while the swing is active.
#[derive(Debug, Clone, Deserialize)]
pub struct AttackSpec {
    pub name: String,
    pub damage: i32,
    pub knockback_force: f32,
    pub knockback_duration_s: f32,
    /// Half-angle of the ray fan, degrees each side of facing.
    pub spread_deg: i32,
    pub range: f32,
    pub cooldown_s: f32,
    /// Starting the next attack within this window after the previous one
    /// advances the combo instead of resetting it.
    #[serde(default)]
    pub chain_time_s: Option<f32>,
    /// Forward drift while the swing is active.
    pub move_speed_mps: f32,
    pub move_duration_s: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttacksCfg {
    /// Player combo chain, in order.
    pub player: Vec<AttackSpec>,
    pub enemy: AttackSpec,
}

/// Load attack definitions from `data/config/attacks.toml`.
/// Damage is clamped to >= 0 so a bad file can never heal on hit.
pub fn load_attacks() -> Result<AttacksCfg> {
    let mut cfg: AttacksCfg = crate::load_toml("config/attacks.toml")?;
    for a in cfg.player.iter_mut().chain(std::iter::once(&mut cfg.enemy)) {
        a.damage = a.damage.max(0);
    }
    anyhow::ensure!(!cfg.player.is_empty(), "player combo must have at least one attack");
    Ok(cfg)
}
