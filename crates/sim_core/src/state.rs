//! The simulation state container and its builders.

use crate::checkpoint::{Checkpoint, CheckpointRegistry};
use crate::combat::{AttackMoveTask, ComboState, SweepTask};
use crate::dash::DashTask;
use crate::entity::{Entity, EntityId, EntityKind, EntityStore, EnemyBrain, Health};
use crate::events::{FxEvent, SceneRequest};
use crate::hazard::Hazard;
use crate::knockback::KnockbackTask;
use crate::movement::MoveParams;
use crate::probe::GroundCheck;
use crate::timer::Countdown;
use anyhow::Result;
use collision_core::{Aabb, LayerMask, Region, Shape, StaticScene};
use data_runtime::archetype::{ArchetypesCfg, DashCfg, EnemyCfg, MovementCfg, PlayerCfg};
use data_runtime::attack::{AttackSpec, AttacksCfg};
use data_runtime::hazard::HazardsCfg;
use data_runtime::scenario::{vec3, HazardKind, Scenario};
use glam::{Vec2, Vec3};
use std::collections::HashMap;

/// Everything loaded from `data/config/`.
#[derive(Clone, Debug)]
pub struct SimConfig {
    pub archetypes: ArchetypesCfg,
    pub attacks: AttacksCfg,
    pub hazards: HazardsCfg,
}

impl SimConfig {
    pub fn load() -> Result<Self> {
        Ok(Self {
            archetypes: data_runtime::archetype::load_archetypes()?,
            attacks: data_runtime::attack::load_attacks()?,
            hazards: data_runtime::hazard::load_hazards()?,
        })
    }
}

/// A motion task owns an entity's movement while it runs; at most one per
/// entity. A new knockback replaces whatever is running.
#[derive(Clone, Debug)]
pub enum MotionTask {
    Knockback(KnockbackTask),
    Dash(DashTask),
    AttackMove(AttackMoveTask),
}

pub struct SimState {
    pub tick: u64,
    pub time_s: f32,
    pub scene: StaticScene,
    pub goal: Option<Region>,
    pub goal_reached: bool,
    pub entities: EntityStore,
    pub player: Option<EntityId>,
    pub hazards: Vec<Hazard>,
    pub checkpoints: Vec<Checkpoint>,
    pub registry: CheckpointRegistry,
    pub motion: HashMap<EntityId, MotionTask>,
    pub sweeps: Vec<SweepTask>,
    pub combo: ComboState,
    pub attack_buffer: bool,
    pub attacks: AttacksCfg,
    pub dash_cfg: DashCfg,
    pub fx: Vec<FxEvent>,
    pub scene_requests: Vec<SceneRequest>,
}

fn move_params(cfg: &MovementCfg) -> MoveParams {
    MoveParams {
        speed_mps: cfg.speed_mps,
        rotation_rate: cfg.rotation_rate,
        gravity: cfg.gravity,
    }
}

impl SimState {
    /// Builds a fresh run from a scenario. The respawn registry starts at
    /// the scenario spawn.
    pub fn new(scenario: &Scenario, cfg: &SimConfig) -> Self {
        Self::with_registry(
            scenario,
            cfg,
            CheckpointRegistry::new(vec3(scenario.player_pos)),
        )
    }

    /// Builds a run that keeps an earlier registry, so the player comes back
    /// at the last checkpoint instead of the scenario spawn.
    pub fn with_registry(
        scenario: &Scenario,
        cfg: &SimConfig,
        registry: CheckpointRegistry,
    ) -> Self {
        let mut scene = StaticScene::new();
        for slab in &scenario.ground {
            scene.add_ground_slab(
                Vec2::from_array(slab.min),
                Vec2::from_array(slab.max),
                slab.top_y,
            );
        }
        for b in &scenario.obstacles {
            scene.add(
                Shape::Aabb(Aabb { min: vec3(b.min), max: vec3(b.max) }),
                LayerMask::OBSTACLE,
            );
        }
        let goal = scenario.goal.map(|g| {
            let min = vec3(g.min);
            let max = vec3(g.max);
            Region::Box { center: (min + max) * 0.5, half_extents: (max - min) * 0.5 }
        });

        let mut state = Self {
            tick: 0,
            time_s: 0.0,
            scene,
            goal,
            goal_reached: false,
            entities: EntityStore::default(),
            player: None,
            hazards: Vec::new(),
            checkpoints: Vec::new(),
            registry,
            motion: HashMap::new(),
            sweeps: Vec::new(),
            combo: ComboState::default(),
            attack_buffer: false,
            attacks: cfg.attacks.clone(),
            dash_cfg: cfg.archetypes.player.dash,
            fx: Vec::new(),
            scene_requests: Vec::new(),
        };

        let spawn = state.registry.spawn_point();
        state.spawn_player(&cfg.archetypes.player, spawn);
        for pos in &scenario.enemy_pos {
            state.spawn_enemy(&cfg.archetypes.enemy, cfg.attacks.enemy.clone(), vec3(*pos));
        }
        for def in &scenario.hazards {
            let pos = vec3(def.pos);
            state.hazards.push(match def.kind {
                HazardKind::SpikePlatform => {
                    Hazard::spike(&cfg.hazards.spike_platform, pos, def.activation_offset)
                }
                HazardKind::ExplosiveBarrel => Hazard::barrel(&cfg.hazards.explosive_barrel, pos),
            });
        }
        for def in &scenario.checkpoints {
            state.checkpoints.push(Checkpoint::new(
                vec3(def.pos),
                vec3(def.spawn_offset),
                def.activation_radius,
            ));
        }
        log::info!(
            "scenario '{}': {} enemies, {} hazards, {} checkpoints",
            scenario.name,
            scenario.enemy_pos.len(),
            scenario.hazards.len(),
            scenario.checkpoints.len()
        );
        state
    }

    pub fn spawn_player(&mut self, cfg: &PlayerCfg, pos: Vec3) -> EntityId {
        let mp = move_params(&cfg.movement);
        let ground = GroundCheck::from_cfg(&cfg.ground_check);
        let id = self.entities.spawn(|id| Entity {
            id,
            kind: EntityKind::Player,
            pos,
            yaw: 0.0,
            radius: cfg.radius,
            half_height: cfg.half_height,
            hp: Health::full(cfg.max_hp),
            damageable: true,
            ordinary_movement: true,
            dead: false,
            move_params: mp,
            ground,
            damage_cooldown_s: cfg.damage_cooldown_s,
            damage_cooldown: Countdown::default(),
            attack_cooldown: Countdown::default(),
            dash_cooldown: Countdown::default(),
            brain: None,
        });
        self.player = Some(id);
        id
    }

    pub fn spawn_enemy(&mut self, cfg: &EnemyCfg, attack: AttackSpec, pos: Vec3) -> EntityId {
        let mp = move_params(&cfg.movement);
        let ground = GroundCheck::from_cfg(&cfg.ground_check);
        let brain = EnemyBrain {
            found_player: false,
            vision_poll: Countdown::default(),
            vision_range: cfg.vision_range,
            attack_range: cfg.attack_range,
            attack,
        };
        self.entities.spawn(|id| Entity {
            id,
            kind: EntityKind::Enemy,
            pos,
            yaw: 0.0,
            radius: cfg.radius,
            half_height: cfg.half_height,
            hp: Health::full(cfg.max_hp),
            damageable: true,
            ordinary_movement: true,
            dead: false,
            move_params: mp,
            ground,
            damage_cooldown_s: cfg.damage_cooldown_s,
            damage_cooldown: Countdown::default(),
            attack_cooldown: Countdown::default(),
            dash_cooldown: Countdown::default(),
            brain: Some(brain),
        })
    }

    /// Drains this tick's presentation events.
    pub fn drain_fx(&mut self) -> Vec<FxEvent> {
        std::mem::take(&mut self.fx)
    }

    /// Drains pending scene transitions (game over, victory).
    pub fn drain_scene_requests(&mut self) -> Vec<SceneRequest> {
        std::mem::take(&mut self.scene_requests)
    }
}
