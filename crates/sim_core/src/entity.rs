//! Entities and the damage/death state machine.
//!
//! An entity is a flat component bundle: transform, health, movement
//! parameters, and per-kind extras (`brain` for enemies). Systems mutate
//! entities through `EntityStore`, collecting ids first and fetching
//! mutably after, so no system holds two borrows into the store at once.

use crate::movement::MoveParams;
use crate::probe::GroundCheck;
use crate::timer::Countdown;
use collision_core::{BodyRef, Collider, LayerMask, Shape};
use data_runtime::attack::AttackSpec;
use glam::Vec3;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Enemy,
}

#[derive(Copy, Clone, Debug)]
pub struct Health {
    pub hp: i32,
    pub max: i32,
}

impl Health {
    pub fn full(max: i32) -> Self {
        Self { hp: max, max }
    }
    pub fn alive(&self) -> bool {
        self.hp > 0
    }
}

/// What `apply_damage` did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target was dead or inside its damage window; nothing changed.
    Ignored,
    Applied { hp_after: i32 },
    /// Health reached zero on this application. Fires at most once.
    Died,
}

/// Per-enemy combat state: vision polling and the attack it swings with.
#[derive(Clone, Debug)]
pub struct EnemyBrain {
    pub found_player: bool,
    pub vision_poll: Countdown,
    pub vision_range: f32,
    pub attack_range: f32,
    pub attack: AttackSpec,
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Feet position; the proxy cylinder is centered `half_height` above.
    pub pos: Vec3,
    /// Facing, radians; zero faces +Z.
    pub yaw: f32,
    pub radius: f32,
    pub half_height: f32,
    pub hp: Health,
    /// False while the post-hit window or dash invulnerability runs.
    pub damageable: bool,
    /// False while a motion task (knockback, dash, attack drift) owns movement.
    pub ordinary_movement: bool,
    pub dead: bool,
    pub move_params: MoveParams,
    pub ground: GroundCheck,
    pub damage_cooldown_s: f32,
    pub damage_cooldown: Countdown,
    pub attack_cooldown: Countdown,
    pub dash_cooldown: Countdown,
    pub brain: Option<EnemyBrain>,
}

impl Entity {
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    pub fn layer(&self) -> LayerMask {
        match self.kind {
            EntityKind::Player => LayerMask::PLAYER,
            EntityKind::Enemy => LayerMask::ENEMY,
        }
    }

    pub fn proxy(&self) -> Collider {
        Collider {
            shape: Shape::CylinderY {
                center: self.pos + Vec3::Y * self.half_height,
                radius: self.radius,
                half_height: self.half_height,
            },
            layers: self.layer(),
            body: BodyRef::Entity(self.id.0),
        }
    }

    /// Runs the intake side of the damage state machine. Negative amounts
    /// are treated as zero. Death is terminal: once `dead` is set, every
    /// later call is `Ignored`.
    pub fn apply_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.dead || !self.damageable {
            return DamageOutcome::Ignored;
        }
        let amount = amount.max(0);
        self.hp.hp = (self.hp.hp - amount).max(0);
        if !self.hp.alive() {
            self.dead = true;
            self.damageable = false;
            return DamageOutcome::Died;
        }
        self.damageable = false;
        self.damage_cooldown.reset(self.damage_cooldown_s);
        DamageOutcome::Applied { hp_after: self.hp.hp }
    }
}

#[cfg(test)]
impl Entity {
    /// Bare entity for unit tests; tweak fields per case.
    pub(crate) fn stub(id: u32, kind: EntityKind, pos: Vec3) -> Self {
        Entity {
            id: EntityId(id),
            kind,
            pos,
            yaw: 0.0,
            radius: 0.5,
            half_height: 1.0,
            hp: Health::full(100),
            damageable: true,
            ordinary_movement: true,
            dead: false,
            move_params: MoveParams { speed_mps: 10.0, rotation_rate: 10.0, gravity: 9.0 },
            ground: GroundCheck::default(),
            damage_cooldown_s: 0.2,
            damage_cooldown: Countdown::default(),
            attack_cooldown: Countdown::default(),
            dash_cooldown: Countdown::default(),
            brain: None,
        }
    }
}

#[derive(Default)]
pub struct EntityStore {
    next_id: u32,
    entities: Vec<Entity>,
}

impl EntityStore {
    pub fn spawn(&mut self, mk: impl FnOnce(EntityId) -> Entity) -> EntityId {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        self.entities.push(mk(id));
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id).collect()
    }

    /// Drops dead entities matching `pred` (the player corpse is kept so the
    /// embedder can still read its state after a game-over request).
    pub fn remove_dead(&mut self, pred: impl Fn(&Entity) -> bool) {
        self.entities.retain(|e| !(e.dead && pred(e)));
    }

    /// Proxy colliders for every living entity; rebuilt once per tick.
    pub fn proxies(&self) -> Vec<Collider> {
        self.entities.iter().filter(|e| !e.dead).map(|e| e.proxy()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy(id: EntityId) -> Entity {
        let mut e = Entity::stub(id.0, EntityKind::Enemy, Vec3::ZERO);
        e.hp = Health::full(50);
        e
    }

    #[test]
    fn damage_window_swallows_repeat_hits() {
        let mut e = dummy(EntityId(1));
        assert_eq!(e.apply_damage(10), DamageOutcome::Applied { hp_after: 40 });
        // Inside the window: the second hit is dropped entirely.
        assert_eq!(e.apply_damage(10), DamageOutcome::Ignored);
        assert_eq!(e.hp.hp, 40);
        // Window expires, hits land again.
        e.damage_cooldown.tick(0.2);
        e.damageable = true;
        assert_eq!(e.apply_damage(10), DamageOutcome::Applied { hp_after: 30 });
    }

    #[test]
    fn death_is_terminal_and_fires_once() {
        let mut e = dummy(EntityId(1));
        assert_eq!(e.apply_damage(50), DamageOutcome::Died);
        assert!(e.dead);
        assert_eq!(e.hp.hp, 0);
        e.damageable = true; // even forced back on, dead stays dead
        assert_eq!(e.apply_damage(10), DamageOutcome::Ignored);
        assert_eq!(e.hp.hp, 0);
    }

    #[test]
    fn negative_damage_never_heals() {
        let mut e = dummy(EntityId(1));
        assert_eq!(e.apply_damage(-30), DamageOutcome::Applied { hp_after: 50 });
        assert_eq!(e.hp.hp, 50);
    }

    #[test]
    fn overkill_clamps_to_zero() {
        let mut e = dummy(EntityId(1));
        assert_eq!(e.apply_damage(999), DamageOutcome::Died);
        assert_eq!(e.hp.hp, 0);
    }
}
