//! Player damage system - hurts the player on contact with hazards.
//!
//! After a hit the player is invulnerable for `SimConfig::mercy_frames`
//! frames. When several hazards overlap the player in one frame, only the
//! strongest counts.

use crate::audio::{AudioService, SoundId};
use crate::components::*;
use crate::config::SimConfig;
use bevy_ecs::prelude::*;
use tracing::debug;

/// System that applies `PlayerDamaging` contact damage to the player.
pub fn player_damage_system(
    config: Res<SimConfig>,
    mut audio: ResMut<AudioService>,
    hazards: Query<(&PlayerDamaging, &Position, &BoundingBox)>,
    mut players: Query<(&mut Player, &Position, &BoundingBox)>,
) {
    for (mut player, pos, bbox) in players.iter_mut() {
        if player.is_dead() {
            continue;
        }
        if player.is_in_mercy_frames() {
            player.mercy_frames_remaining -= 1;
            continue;
        }

        let player_rect = bbox.to_world(*pos);
        let damage = hazards
            .iter()
            .filter(|(_, hazard_pos, hazard_bbox)| {
                hazard_bbox.to_world(**hazard_pos).intersects(&player_rect)
            })
            .map(|(hazard, _, _)| hazard.damage.amount)
            .max();

        let Some(amount) = damage else {
            continue;
        };
        player.health = (player.health - amount).max(0);
        player.mercy_frames_remaining = config.mercy_frames;
        audio.play_sound(SoundId::PlayerHit);
        debug!(amount, health = player.health, "player hurt");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (World, Schedule, Entity) {
        let mut world = World::new();
        world.insert_resource(SimConfig {
            mercy_frames: 2,
            ..SimConfig::default()
        });
        world.init_resource::<AudioService>();
        let player = world
            .spawn((Player::new(5), Position::new(0, 0), BoundingBox::sized(2, 2)))
            .id();

        let mut schedule = Schedule::default();
        schedule.add_systems(player_damage_system);
        (world, schedule, player)
    }

    fn health(world: &World, player: Entity) -> i32 {
        world.get::<Player>(player).unwrap().health
    }

    #[test]
    fn test_strongest_hazard_counts_once() {
        let (mut world, mut schedule, player) = setup();
        world.spawn((PlayerDamaging::new(1), Position::new(0, 0), BoundingBox::sized(1, 1)));
        world.spawn((PlayerDamaging::new(3), Position::new(1, 0), BoundingBox::sized(1, 1)));

        schedule.run(&mut world);

        assert_eq!(health(&world, player), 2);
        assert_eq!(world.resource::<AudioService>().pending(), &[SoundId::PlayerHit]);
    }

    #[test]
    fn test_mercy_frames_protect_player() {
        let (mut world, mut schedule, player) = setup();
        world.spawn((PlayerDamaging::new(1), Position::new(0, 0), BoundingBox::sized(1, 1)));

        // Hit, two protected frames, hit again
        schedule.run(&mut world);
        schedule.run(&mut world);
        schedule.run(&mut world);
        assert_eq!(health(&world, player), 4);

        schedule.run(&mut world);
        assert_eq!(health(&world, player), 3);
    }

    #[test]
    fn test_health_does_not_go_negative() {
        let (mut world, mut schedule, player) = setup();
        world.spawn((PlayerDamaging::new(9), Position::new(0, 0), BoundingBox::sized(1, 1)));

        schedule.run(&mut world);

        assert_eq!(health(&world, player), 0);
        assert!(world.get::<Player>(player).unwrap().is_dead());
    }

    #[test]
    fn test_distant_hazard_ignored() {
        let (mut world, mut schedule, player) = setup();
        world.spawn((PlayerDamaging::new(1), Position::new(10, 0), BoundingBox::sized(1, 1)));

        schedule.run(&mut world);

        assert_eq!(health(&world, player), 5);
    }
}
