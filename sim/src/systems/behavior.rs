//! Behavior controller systems - drive per-entity state machines.

use crate::audio::AudioService;
use crate::behaviors::{BehaviorController, ControlledEntity, GlobalDependencies};
use crate::collision::CollisionService;
use crate::components::*;
use crate::events::ShootableKilled;
use bevy_ecs::prelude::*;

/// System that advances every active behavior by one frame.
///
/// Controlled entities must have a `Position` and a `Sprite`; a controller
/// on an entity without them is a setup bug and panics.
pub fn behavior_controller_system(
    mut commands: Commands,
    mut audio: ResMut<AudioService>,
    collision: Res<CollisionService>,
    mut query: Query<
        (
            Entity,
            &mut BehaviorController,
            Option<&Position>,
            Option<&mut Sprite>,
            Option<&mut DestructionEffects>,
        ),
        With<Active>,
    >,
) {
    let mut d = GlobalDependencies {
        commands: &mut commands,
        audio: &mut *audio,
        collision: &*collision,
    };

    for (entity, mut controller, position, sprite, mut effects) in query.iter_mut() {
        let position = *required(position, entity, "Position");
        let mut sprite = required(sprite, entity, "Sprite");
        let mut this = ControlledEntity {
            entity,
            position,
            sprite: &mut *sprite,
            destruction_effects: effects.as_deref_mut(),
        };
        controller.update(&mut d, &mut this);
    }
}

/// Kill subscriber: tells the killed entity's behavior, if it has one.
pub fn behavior_on_killed(
    In(event): In<ShootableKilled>,
    mut commands: Commands,
    mut audio: ResMut<AudioService>,
    collision: Res<CollisionService>,
    mut query: Query<(
        &mut BehaviorController,
        Option<&Position>,
        Option<&mut Sprite>,
        Option<&mut DestructionEffects>,
    )>,
) {
    let Ok((mut controller, position, sprite, mut effects)) = query.get_mut(event.entity) else {
        return;
    };

    let position = *required(position, event.entity, "Position");
    let mut sprite = required(sprite, event.entity, "Sprite");
    let mut d = GlobalDependencies {
        commands: &mut commands,
        audio: &mut *audio,
        collision: &*collision,
    };
    let mut this = ControlledEntity {
        entity: event.entity,
        position,
        sprite: &mut *sprite,
        destruction_effects: effects.as_deref_mut(),
    };
    controller.on_killed(&mut d, &mut this);
}
