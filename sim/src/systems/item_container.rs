//! Item container system - opens shot containers in stages.
//!
//! A container isn't opened when it is killed. Its contents might be
//! shootable themselves, and spawning them during damage infliction would let
//! the projectile that opened the container hit them in the same frame.
//! Instead the kill subscriber only marks the container as pending, and
//! `item_container_system`, which runs after damage infliction, opens it
//! starting with the same frame:
//!
//! | style              | frame 1     | frame 2     | frame 3     | frame 4 |
//! |--------------------|-------------|-------------|-------------|---------|
//! | Default            | release     |             |             |         |
//! | ItemBox            | flash white | release     |             |         |
//! | NuclearWasteBarrel | flash white | bulge       | hide sprite | release |

use crate::component_holder::ComponentHolder;
use crate::components::*;
use crate::events::ShootableKilled;
use bevy_ecs::entity::Entities;
use bevy_ecs::prelude::*;
use tracing::debug;

/// Containers that were shot and haven't released their contents yet.
#[derive(Resource, Debug, Default)]
pub struct ShotContainerQueue {
    entities: Vec<Entity>,
}

impl ShotContainerQueue {
    /// Add a container. Returns false if it was already queued.
    pub fn enqueue(&mut self, entity: Entity) -> bool {
        if self.entities.contains(&entity) {
            return false;
        }
        self.entities.push(entity);
        true
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter().copied()
    }

    /// Drop every handle for which `keep` returns false. Running it twice
    /// with the same predicate changes nothing.
    pub fn compact(&mut self, mut keep: impl FnMut(Entity) -> bool) {
        self.entities.retain(|&entity| keep(entity));
    }
}

/// Kill subscriber: keeps shot containers alive and queues them for opening.
pub fn queue_shot_container(
    In(event): In<ShootableKilled>,
    mut queue: ResMut<ShotContainerQueue>,
    mut containers: Query<&mut Shootable, With<ItemContainer>>,
) {
    let Ok(mut shootable) = containers.get_mut(event.entity) else {
        return;
    };
    shootable.destroy_when_killed = false;
    if queue.enqueue(event.entity) {
        debug!(container = ?event.entity, "item container queued");
    }
}

/// Spawn the contents at the container's position and destroy the container.
fn release_contents(
    commands: &mut Commands,
    container_entity: Entity,
    contained_components: &[ComponentHolder],
    position: Position,
) -> Entity {
    let mut contents = commands.spawn_empty();
    for holder in contained_components {
        holder.assign_to_entity(&mut contents);
    }
    contents.insert((position, Active));
    let contents = contents.id();

    commands.entity(container_entity).despawn();
    debug!(container = ?container_entity, ?contents, "item container released");
    contents
}

/// System that advances every queued container by one frame.
///
/// Released containers are despawned through commands, so they stay valid
/// until the end of this system. The queue is compacted once after the pass,
/// dropping released containers and handles that became invalid elsewhere.
pub fn item_container_system(
    mut commands: Commands,
    mut queue: ResMut<ShotContainerQueue>,
    entities: &Entities,
    mut containers: Query<(&mut ItemContainer, &Position, Option<&mut Sprite>)>,
) {
    let mut released = Vec::new();

    for entity in queue.iter() {
        if !entities.contains(entity) {
            continue;
        }
        let Ok((mut container, position, sprite)) = containers.get_mut(entity) else {
            panic!("queued item container {entity:?} has no ItemContainer or Position");
        };

        container.frames_elapsed += 1;
        let frame = container.frames_elapsed;

        let release = match container.style {
            ReleaseStyle::Default => true,

            ReleaseStyle::ItemBox => match frame {
                1 => {
                    required(sprite, entity, "Sprite").flash_white();
                    false
                }
                2 => true,
                _ => false,
            },

            ReleaseStyle::NuclearWasteBarrel => match frame {
                1 => {
                    required(sprite, entity, "Sprite").flash_white();
                    false
                }
                2 => {
                    // Bulging barrel frame
                    required(sprite, entity, "Sprite").advance_frame();
                    false
                }
                3 => {
                    // Destruction effects take over from here
                    required(sprite, entity, "Sprite").show = false;
                    false
                }
                4 => true,
                _ => false,
            },
        };

        if release {
            release_contents(
                &mut commands,
                entity,
                &container.contained_components,
                *position,
            );
            released.push(entity);
        }
    }

    queue.compact(|entity| entities.contains(entity) && !released.contains(&entity));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{subscribe_to_kills, KillNotifier};

    #[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
    struct Loot(u32);

    fn setup() -> (World, Schedule) {
        let mut world = World::new();
        world.init_resource::<ShotContainerQueue>();
        let mut schedule = Schedule::default();
        schedule.add_systems(item_container_system);
        (world, schedule)
    }

    fn spawn_container(world: &mut World, style: ReleaseStyle, x: i32, y: i32) -> Entity {
        let container = ItemContainer::new(style, vec![ComponentHolder::new(Loot(7))]);
        let entity = world
            .spawn(ItemContainerBundle::new(
                x,
                y,
                crate::entity_factory::ITEM_BOX_SPRITE,
                1,
                container,
            ))
            .id();
        world.resource_mut::<ShotContainerQueue>().enqueue(entity);
        entity
    }

    fn loot(world: &mut World) -> Vec<(Loot, Position)> {
        let mut query = world.query_filtered::<(&Loot, &Position), With<Active>>();
        query.iter(world).map(|(l, p)| (*l, *p)).collect()
    }

    #[test]
    fn test_default_releases_on_first_update() {
        let (mut world, mut schedule) = setup();
        let container = spawn_container(&mut world, ReleaseStyle::Default, 3, 4);

        schedule.run(&mut world);

        assert!(!world.entities().contains(container));
        assert_eq!(loot(&mut world), vec![(Loot(7), Position::new(3, 4))]);
        assert!(world.resource::<ShotContainerQueue>().is_empty());
    }

    #[test]
    fn test_item_box_flashes_then_releases() {
        let (mut world, mut schedule) = setup();
        let container = spawn_container(&mut world, ReleaseStyle::ItemBox, 0, 0);

        schedule.run(&mut world);
        assert!(world.get::<Sprite>(container).unwrap().flashing_white);
        assert!(loot(&mut world).is_empty());

        schedule.run(&mut world);
        assert!(!world.entities().contains(container));
        assert_eq!(loot(&mut world).len(), 1);

        schedule.run(&mut world);
        assert_eq!(loot(&mut world).len(), 1);
    }

    #[test]
    fn test_barrel_hides_before_release() {
        let (mut world, mut schedule) = setup();
        let container = spawn_container(&mut world, ReleaseStyle::NuclearWasteBarrel, 0, 0);

        schedule.run(&mut world);
        assert!(world.get::<Sprite>(container).unwrap().flashing_white);

        schedule.run(&mut world);
        assert_eq!(world.get::<Sprite>(container).unwrap().frame(), 1);

        schedule.run(&mut world);
        assert!(!world.get::<Sprite>(container).unwrap().show);
        assert!(loot(&mut world).is_empty());

        schedule.run(&mut world);
        assert!(!world.entities().contains(container));
        assert_eq!(loot(&mut world).len(), 1);
    }

    #[test]
    fn test_frames_elapsed_advances_once_per_update() {
        let (mut world, mut schedule) = setup();
        let container = spawn_container(&mut world, ReleaseStyle::NuclearWasteBarrel, 0, 0);

        for expected in 1..=3 {
            schedule.run(&mut world);
            assert_eq!(world.get::<ItemContainer>(container).unwrap().frames_elapsed, expected);
        }
    }

    #[test]
    fn test_queued_twice_releases_once() {
        let (mut world, mut schedule) = setup();
        let container = spawn_container(&mut world, ReleaseStyle::Default, 0, 0);
        assert!(!world.resource_mut::<ShotContainerQueue>().enqueue(container));

        schedule.run(&mut world);
        schedule.run(&mut world);

        assert_eq!(loot(&mut world).len(), 1);
    }

    #[test]
    fn test_invalid_handle_dropped_from_queue() {
        let (mut world, mut schedule) = setup();
        let container = spawn_container(&mut world, ReleaseStyle::ItemBox, 0, 0);
        world.despawn(container);

        schedule.run(&mut world);

        assert!(world.resource::<ShotContainerQueue>().is_empty());
        assert!(loot(&mut world).is_empty());
    }

    #[test]
    #[should_panic(expected = "missing required component Sprite")]
    fn test_item_box_without_sprite_panics() {
        let (mut world, mut schedule) = setup();
        let container = world
            .spawn((
                Position::new(0, 0),
                ItemContainer::new(ReleaseStyle::ItemBox, Vec::new()),
            ))
            .id();
        world.resource_mut::<ShotContainerQueue>().enqueue(container);

        schedule.run(&mut world);
    }

    #[test]
    fn test_kill_subscriber_keeps_container_alive_and_queues_it() {
        let (mut world, _) = setup();
        subscribe_to_kills(&mut world, queue_shot_container);
        let container = world
            .spawn((
                Position::new(0, 0),
                Shootable::new(0),
                ItemContainer::default(),
            ))
            .id();
        let plain = world.spawn((Position::new(5, 0), Shootable::new(0))).id();

        let mut publish = Schedule::default();
        publish.add_systems(move |mut commands: Commands, notifier: Res<KillNotifier>| {
            for entity in [container, plain] {
                notifier.publish(
                    &mut commands,
                    ShootableKilled {
                        entity,
                        inflictor_velocity: None,
                    },
                );
            }
        });
        publish.run(&mut world);

        assert!(world.entities().contains(container));
        assert!(!world.entities().contains(plain));
        let queue = world.resource::<ShotContainerQueue>();
        assert!(queue.contains(container));
        assert_eq!(queue.len(), 1);
    }
}
