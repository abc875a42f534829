//! sim_core: fixed-tick action simulation.
//!
//! Deterministic, presentation-free: all input arrives as `PlayerInput`,
//! all output leaves as state plus drained event buses. A tick runs the
//! phase functions in `schedule` in a fixed order over a pre-tick snapshot
//! of entity collision proxies, so nothing observes a half-updated world.

pub mod checkpoint;
pub mod combat;
pub mod dash;
pub mod entity;
pub mod events;
pub mod hazard;
pub mod knockback;
pub mod movement;
pub mod probe;
pub mod schedule;
pub mod state;
pub mod systems;
pub mod timer;

pub use entity::{DamageOutcome, Entity, EntityId, EntityKind, EntityStore, Health};
pub use events::{
    DamageEvent, FxEvent, SceneId, SceneRequest, SCENE_GAME_OVER, SCENE_MAIN_MENU, SCENE_VICTORY,
};
pub use movement::MoveResult;
pub use probe::ProbeResult;
pub use schedule::step;
pub use state::{MotionTask, SimConfig, SimState};
pub use systems::player::PlayerInput;
