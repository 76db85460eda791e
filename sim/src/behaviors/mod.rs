//! Per-entity behavior state machines.
//!
//! Each behavior keeps its private state inside the `BehaviorController`
//! component of the entity it drives. `behavior_controller_system` advances
//! every controller once per frame and `behavior_on_killed` forwards kill
//! notifications to the controller of the killed entity.

pub mod napalm_bomb;

pub use napalm_bomb::{NapalmBomb, NapalmBombState};

use crate::audio::AudioService;
use crate::collision::CollisionService;
use crate::components::{DestructionEffects, Position, Sprite};
use bevy_ecs::prelude::*;

/// Services a behavior may use while it runs.
pub struct GlobalDependencies<'a, 'w, 's> {
    pub commands: &'a mut Commands<'w, 's>,
    pub audio: &'a mut AudioService,
    pub collision: &'a CollisionService,
}

/// The controlled entity and the components behaviors work with.
pub struct ControlledEntity<'a> {
    pub entity: Entity,
    pub position: Position,
    pub sprite: &'a mut Sprite,
    pub destruction_effects: Option<&'a mut DestructionEffects>,
}

/// Behavior attached to an entity.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub enum BehaviorController {
    NapalmBomb(NapalmBomb),
}

impl BehaviorController {
    pub fn napalm_bomb() -> Self {
        Self::NapalmBomb(NapalmBomb::default())
    }

    /// Advance the behavior by one frame.
    pub fn update(&mut self, d: &mut GlobalDependencies, this: &mut ControlledEntity) {
        match self {
            Self::NapalmBomb(bomb) => bomb.update(d, this),
        }
    }

    /// The controlled entity was killed.
    pub fn on_killed(&mut self, d: &mut GlobalDependencies, this: &mut ControlledEntity) {
        match self {
            Self::NapalmBomb(bomb) => bomb.on_killed(d, this),
        }
    }
}
