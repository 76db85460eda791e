//! Type-erased component descriptors.
//!
//! An item container stores the components of its future contents without
//! knowing their concrete types. Each `ComponentHolder` captures one component
//! value and can insert a copy of it onto any entity.

use bevy_ecs::prelude::*;
use bevy_ecs::system::EntityCommands;
use std::fmt;

trait ApplyComponent: Send + Sync + 'static {
    fn apply_to(&self, target: &mut EntityCommands);
    fn apply_to_world(&self, target: &mut EntityWorldMut);
}

impl<C: Component + Clone> ApplyComponent for C {
    fn apply_to(&self, target: &mut EntityCommands) {
        target.insert(self.clone());
    }

    fn apply_to_world(&self, target: &mut EntityWorldMut) {
        target.insert(self.clone());
    }
}

/// One stored component, ready to be attached to an entity that doesn't
/// exist yet.
pub struct ComponentHolder {
    component: Box<dyn ApplyComponent>,
    type_name: &'static str,
}

impl ComponentHolder {
    pub fn new<C: Component + Clone>(component: C) -> Self {
        Self {
            component: Box::new(component),
            type_name: std::any::type_name::<C>(),
        }
    }

    /// Insert a copy of the stored component through deferred commands.
    pub fn assign_to_entity(&self, target: &mut EntityCommands) {
        self.component.apply_to(target);
    }

    /// Insert a copy of the stored component directly into the world.
    pub fn assign_to_world_entity(&self, target: &mut EntityWorldMut) {
        self.component.apply_to_world(target);
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for ComponentHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComponentHolder").field(&self.type_name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{BoundingBox, Shootable};

    #[test]
    fn test_holder_inserts_copy_of_component() {
        let mut world = World::new();
        let holder = ComponentHolder::new(Shootable::with_score(5, 50));

        let first = world.spawn_empty().id();
        let second = world.spawn_empty().id();
        holder.assign_to_world_entity(&mut world.entity_mut(first));
        holder.assign_to_world_entity(&mut world.entity_mut(second));

        assert_eq!(world.get::<Shootable>(first).unwrap().health, 5);
        assert_eq!(world.get::<Shootable>(second).unwrap().given_score, 50);
    }

    #[test]
    fn test_holder_through_commands() {
        let mut world = World::new();
        let holders = vec![
            ComponentHolder::new(BoundingBox::sized(1, 2)),
            ComponentHolder::new(Shootable::new(1)),
        ];

        let mut schedule = Schedule::default();
        schedule.add_systems(move |mut commands: Commands| {
            let mut contents = commands.spawn_empty();
            for holder in &holders {
                holder.assign_to_entity(&mut contents);
            }
        });
        schedule.run(&mut world);

        let mut query = world.query::<(&BoundingBox, &Shootable)>();
        let (bbox, _) = query.single(&world);
        assert_eq!(bbox.height, 2);
    }

    #[test]
    fn test_holder_debug_names_type() {
        let holder = ComponentHolder::new(Shootable::new(1));
        assert!(format!("{holder:?}").contains("Shootable"));
    }
}
