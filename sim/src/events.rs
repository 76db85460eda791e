//! Kill notifications and their subscribers.
//!
//! `ShootableKilled` is published by the damage infliction system once per
//! kill. Subscribers are one-shot systems registered with the world and run
//! in subscription order. Each subscriber sees the killed entity with all of
//! its components; the entity is destroyed afterwards only if its
//! `Shootable::destroy_when_killed` flag survived every subscriber.
//!
//! Delivery happens through `Commands`, so subscribers always run after the
//! damage pass has finished with the current frame.

use crate::components::{DestructionEffects, Shootable, Velocity};
use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemId;
use bevy_ecs::world::Command;
use tracing::trace;

/// A shootable's health dropped to zero or below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShootableKilled {
    pub entity: Entity,
    /// Velocity of whatever landed the killing hit, if it was moving.
    pub inflictor_velocity: Option<Velocity>,
}

/// Handle of a registered kill subscriber.
pub type KillSubscriber = SystemId<In<ShootableKilled>>;

/// Ordered list of kill subscribers.
#[derive(Resource, Debug, Default)]
pub struct KillNotifier {
    subscribers: Vec<KillSubscriber>,
}

impl KillNotifier {
    pub fn subscribe(&mut self, subscriber: KillSubscriber) {
        self.subscribers.push(subscriber);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Queue delivery of `event` to every subscriber, followed by the
    /// destroy-when-killed check for the killed entity.
    pub fn publish(&self, commands: &mut Commands, event: ShootableKilled) {
        trace!(entity = ?event.entity, subscribers = self.subscribers.len(), "publishing kill");
        for &subscriber in &self.subscribers {
            commands.run_system_with_input(subscriber, event);
        }
        commands.queue(DestroyKilledShootable {
            entity: event.entity,
        });
    }
}

/// Register `system` as a kill subscriber, after all existing ones.
pub fn subscribe_to_kills<M>(
    world: &mut World,
    system: impl IntoSystem<In<ShootableKilled>, (), M> + 'static,
) -> KillSubscriber {
    let id = world.register_system(system);
    world
        .get_resource_or_insert_with(KillNotifier::default)
        .subscribe(id);
    id
}

/// Destroys a killed shootable unless a subscriber claimed it.
struct DestroyKilledShootable {
    entity: Entity,
}

impl Command for DestroyKilledShootable {
    fn apply(self, world: &mut World) {
        let destroy = world
            .get::<Shootable>(self.entity)
            .is_some_and(|shootable| shootable.destroy_when_killed);
        if destroy {
            trace!(entity = ?self.entity, "destroying killed shootable");
            world.despawn(self.entity);
        }
    }
}

/// Kill subscriber that hands destroyed entities to their destruction effects.
pub fn activate_destruction_effects(
    In(event): In<ShootableKilled>,
    mut query: Query<&mut DestructionEffects>,
) {
    if let Ok(mut effects) = query.get_mut(event.entity) {
        effects.activated = true;
    }
}
