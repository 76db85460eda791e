//! Damage infliction system - resolves contact between damage dealers and
//! shootables.
//!
//! ## Phases
//!
//! 1. **Gather Phase** - O(n × k) where n = inflictors, k = shootables per
//!    grid query
//!    - Rebuild the spatial grid from live, vulnerable shootables
//!    - For each inflictor, collect the shootables its box overlaps
//!    - Read-only, parallelizable with `--features parallel`
//!
//! 2. **Apply Phase** - sequential, in inflictor order
//!    - Apply damage, award score, publish kills
//!    - Consume `destroy_on_contact` inflictors after their first hit
//!
//! Kills are published through the `KillNotifier`. Subscribers and the
//! destroy-when-killed check run from this system's commands, i.e. after the
//! whole pass. A shootable killed earlier in the pass is skipped by later
//! inflictors, so it can't be killed twice while it waits for its subscribers.

use crate::audio::{AudioService, SoundId};
use crate::components::*;
use crate::events::{KillNotifier, ShootableKilled};
use crate::spatial::SpatialGrid;
use bevy_ecs::prelude::*;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Score collected by the player.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerScore(pub u32);

/// Shootables hit during one frame.
#[derive(Debug, Clone, Default)]
pub struct DamageEvents {
    pub killed: Vec<(Entity, Position)>,
    pub damaged: Vec<(Entity, Position)>,
}

/// Resource to track damage events for snapshots. Cleared every frame.
#[derive(Resource, Default)]
pub struct DamageEventBuffer {
    pub events: DamageEvents,
}

impl DamageEventBuffer {
    pub fn clear(&mut self) {
        self.events.killed.clear();
        self.events.damaged.clear();
    }
}

/// System that clears last frame's damage events.
pub fn clear_damage_events_system(mut buffer: ResMut<DamageEventBuffer>) {
    buffer.clear();
}

/// Inflictor data extracted for the gather phase.
#[derive(Clone)]
struct InflictorData {
    entity: Entity,
    rect: Rect,
    damage: Damage,
    destroy_on_contact: bool,
    velocity: Option<Velocity>,
}

/// Shootables overlapped by one inflictor, in grid insertion order.
fn gather_contacts(inflictor: &InflictorData, grid: &SpatialGrid) -> Vec<Entity> {
    grid.query_rect(&inflictor.rect)
        .into_iter()
        .map(|entry| entry.entity)
        .filter(|&entity| entity != inflictor.entity)
        .collect()
}

/// System that applies contact damage to shootables.
///
/// ## Data Access
/// - Reads: KillNotifier, DamageInflicting, Position, BoundingBox, MovingBody
/// - Writes: SpatialGrid, AudioService, PlayerScore, DamageEventBuffer, Shootable
pub fn damage_infliction_system(
    mut commands: Commands,
    notifier: Res<KillNotifier>,
    mut grid: ResMut<SpatialGrid>,
    mut audio: ResMut<AudioService>,
    mut score: ResMut<PlayerScore>,
    mut buffer: ResMut<DamageEventBuffer>,
    inflictors: Query<(
        Entity,
        &DamageInflicting,
        &Position,
        &BoundingBox,
        Option<&MovingBody>,
    )>,
    mut shootables: Query<(Entity, &mut Shootable, &Position, &BoundingBox), With<Active>>,
) {
    // GATHER PHASE
    grid.clear();
    for (entity, shootable, pos, bbox) in shootables.iter() {
        if shootable.invincible || shootable.is_dead() {
            continue;
        }
        grid.insert(entity, bbox.to_world(*pos));
    }
    let grid = &*grid;

    let attackers: Vec<InflictorData> = inflictors
        .iter()
        .map(|(entity, inflicting, pos, bbox, body)| InflictorData {
            entity,
            rect: bbox.to_world(*pos),
            damage: inflicting.damage,
            destroy_on_contact: inflicting.destroy_on_contact,
            velocity: body.map(|b| b.velocity),
        })
        .collect();

    #[cfg(feature = "parallel")]
    let contacts: Vec<Vec<Entity>> = attackers
        .par_iter()
        .map(|attacker| gather_contacts(attacker, grid))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let contacts: Vec<Vec<Entity>> = attackers
        .iter()
        .map(|attacker| gather_contacts(attacker, grid))
        .collect();

    // APPLY PHASE
    for (attacker, targets) in attackers.iter().zip(contacts) {
        for target in targets {
            let Ok((_, mut shootable, pos, _)) = shootables.get_mut(target) else {
                continue;
            };
            if shootable.is_dead() {
                continue;
            }

            if shootable.take_damage(attacker.damage.amount) {
                score.0 += shootable.given_score;
                buffer.events.killed.push((target, *pos));
                debug!(?target, inflictor = ?attacker.entity, "shootable killed");
                notifier.publish(
                    &mut commands,
                    ShootableKilled {
                        entity: target,
                        inflictor_velocity: attacker.velocity,
                    },
                );
            } else {
                buffer.events.damaged.push((target, *pos));
                audio.play_sound(SoundId::EnemyHit);
            }

            if attacker.destroy_on_contact {
                commands.entity(attacker.entity).despawn();
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::subscribe_to_kills;

    #[derive(Resource, Default)]
    struct Kills(Vec<Entity>);

    fn record_kill(In(event): In<ShootableKilled>, mut kills: ResMut<Kills>) {
        kills.0.push(event.entity);
    }

    fn setup() -> (World, Schedule) {
        let mut world = World::new();
        world.init_resource::<KillNotifier>();
        world.init_resource::<SpatialGrid>();
        world.init_resource::<AudioService>();
        world.init_resource::<PlayerScore>();
        world.init_resource::<DamageEventBuffer>();
        world.init_resource::<Kills>();
        subscribe_to_kills(&mut world, record_kill);

        let mut schedule = Schedule::default();
        schedule.add_systems(damage_infliction_system);
        (world, schedule)
    }

    fn spawn_target(world: &mut World, x: i32, health: i32) -> Entity {
        world
            .spawn((
                Position::new(x, 0),
                BoundingBox::sized(2, 2),
                Shootable::with_score(health, 10),
                Active,
            ))
            .id()
    }

    #[test]
    fn test_lethal_hit_publishes_kill_and_destroys() {
        let (mut world, mut schedule) = setup();
        let target = spawn_target(&mut world, 0, 3);
        world.spawn((
            Position::new(1, 0),
            BoundingBox::sized(1, 1),
            DamageInflicting::new(3, false),
        ));

        schedule.run(&mut world);

        assert_eq!(world.resource::<Kills>().0, vec![target]);
        assert!(!world.entities().contains(target));
        assert_eq!(world.resource::<PlayerScore>().0, 10);
    }

    #[test]
    fn test_non_lethal_hit_plays_sound() {
        let (mut world, mut schedule) = setup();
        let target = spawn_target(&mut world, 0, 5);
        world.spawn((
            Position::new(0, 0),
            BoundingBox::sized(1, 1),
            DamageInflicting::new(2, false),
        ));

        schedule.run(&mut world);

        assert_eq!(world.get::<Shootable>(target).unwrap().health, 3);
        assert_eq!(world.resource::<AudioService>().pending(), &[SoundId::EnemyHit]);
        assert!(world.resource::<Kills>().0.is_empty());
    }

    #[test]
    fn test_projectile_consumed_after_first_hit() {
        let (mut world, mut schedule) = setup();
        let first = spawn_target(&mut world, 0, 5);
        let second = spawn_target(&mut world, 1, 5);
        let projectile = world
            .spawn(ProjectileBundle::new(1, 0, 0, 1))
            .id();

        schedule.run(&mut world);

        assert!(!world.entities().contains(projectile));
        let hits = [first, second]
            .iter()
            .filter(|&&e| world.get::<Shootable>(e).unwrap().health < 5)
            .count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_hazard_hits_every_overlapping_target() {
        let (mut world, mut schedule) = setup();
        let first = spawn_target(&mut world, 0, 5);
        let second = spawn_target(&mut world, 1, 5);
        let hazard = world
            .spawn((
                Position::new(1, 0),
                BoundingBox::sized(1, 1),
                DamageInflicting::new(1, false),
            ))
            .id();

        schedule.run(&mut world);
        schedule.run(&mut world);

        assert!(world.entities().contains(hazard));
        assert_eq!(world.get::<Shootable>(first).unwrap().health, 3);
        assert_eq!(world.get::<Shootable>(second).unwrap().health, 3);
    }

    #[test]
    fn test_inactive_and_invincible_targets_ignored() {
        let (mut world, mut schedule) = setup();
        let inactive = world
            .spawn((Position::new(0, 0), BoundingBox::sized(2, 2), Shootable::new(1)))
            .id();
        let invincible = world
            .spawn((
                Position::new(0, 0),
                BoundingBox::sized(2, 2),
                Shootable {
                    invincible: true,
                    ..Shootable::new(1)
                },
                Active,
            ))
            .id();
        world.spawn((
            Position::new(0, 0),
            BoundingBox::sized(1, 1),
            DamageInflicting::new(5, false),
        ));

        schedule.run(&mut world);

        assert_eq!(world.get::<Shootable>(inactive).unwrap().health, 1);
        assert_eq!(world.get::<Shootable>(invincible).unwrap().health, 1);
    }

    #[test]
    fn test_killed_target_not_hit_again_while_kept_alive() {
        let (mut world, mut schedule) = setup();
        let target = world
            .spawn((
                Position::new(0, 0),
                BoundingBox::sized(2, 2),
                Shootable {
                    destroy_when_killed: false,
                    ..Shootable::new(2)
                },
                Active,
            ))
            .id();
        for _ in 0..3 {
            world.spawn((
                Position::new(0, 0),
                BoundingBox::sized(1, 1),
                DamageInflicting::new(2, false),
            ));
        }

        schedule.run(&mut world);
        schedule.run(&mut world);

        assert_eq!(world.resource::<Kills>().0, vec![target]);
        assert_eq!(world.get::<Shootable>(target).unwrap().health, 0);
    }
}
