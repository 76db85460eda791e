//! Sprite systems - white flash reset and one-shot animations.

use crate::components::*;
use bevy_ecs::prelude::*;

/// System that clears last frame's white flash.
///
/// Runs first in the frame, so a flash set during an update is visible for
/// exactly that frame.
pub fn sprite_flash_reset_system(mut query: Query<&mut Sprite>) {
    for mut sprite in query.iter_mut() {
        // Avoid flagging every sprite as changed
        if sprite.flashing_white {
            sprite.flashing_white = false;
        }
    }
}

/// System that plays one-shot animations and despawns them after their last
/// frame.
pub fn one_shot_animation_system(
    mut commands: Commands,
    mut query: Query<(Entity, &mut Sprite, &OneShotAnimation), With<Active>>,
) {
    for (entity, mut sprite, animation) in query.iter_mut() {
        if sprite.frame() + 1 >= animation.frame_count {
            commands.entity(entity).despawn();
        } else {
            sprite.advance_frame();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_lasts_one_frame() {
        let mut world = World::new();
        let entity = world.spawn(Sprite::new(SpriteId(1))).id();
        world.get_mut::<Sprite>(entity).unwrap().flash_white();

        let mut schedule = Schedule::default();
        schedule.add_systems(sprite_flash_reset_system);
        schedule.run(&mut world);

        assert!(!world.get::<Sprite>(entity).unwrap().flashing_white);
    }

    #[test]
    fn test_one_shot_despawns_after_last_frame() {
        let mut world = World::new();
        let entity = world
            .spawn((
                Sprite::new(SpriteId(1)),
                OneShotAnimation { frame_count: 3 },
                Active,
            ))
            .id();

        let mut schedule = Schedule::default();
        schedule.add_systems(one_shot_animation_system);

        schedule.run(&mut world);
        assert_eq!(world.get::<Sprite>(entity).unwrap().frame(), 1);
        schedule.run(&mut world);
        assert_eq!(world.get::<Sprite>(entity).unwrap().frame(), 2);
        schedule.run(&mut world);
        assert!(!world.entities().contains(entity));
    }
}
