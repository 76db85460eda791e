//! Entity creation helpers shared by systems and behaviors.

use crate::components::*;
use bevy_ecs::prelude::*;

pub const NAPALM_BOMB_SPRITE: SpriteId = SpriteId(64);
pub const NAPALM_FIRE_SPRITE: SpriteId = SpriteId(65);
pub const ITEM_BOX_SPRITE: SpriteId = SpriteId(162);
pub const NUCLEAR_WASTE_BARREL_SPRITE: SpriteId = SpriteId(170);

/// Size in tiles and number of animation frames of a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteInfo {
    pub width: i32,
    pub height: i32,
    pub frame_count: u32,
}

/// Dimensions of the sprites the simulation spawns by itself.
pub fn sprite_info(sprite_id: SpriteId) -> SpriteInfo {
    match sprite_id {
        NAPALM_FIRE_SPRITE => SpriteInfo {
            width: 2,
            height: 2,
            frame_count: 6,
        },
        NAPALM_BOMB_SPRITE => SpriteInfo {
            width: 2,
            height: 1,
            frame_count: 1,
        },
        ITEM_BOX_SPRITE | NUCLEAR_WASTE_BARREL_SPRITE => SpriteInfo {
            width: 2,
            height: 2,
            frame_count: 2,
        },
        _ => SpriteInfo {
            width: 1,
            height: 1,
            frame_count: 1,
        },
    }
}

/// Spawn a sprite that plays its animation once and then disappears.
pub fn create_one_shot_sprite(
    commands: &mut Commands,
    sprite_id: SpriteId,
    position: Position,
) -> Entity {
    let info = sprite_info(sprite_id);
    commands
        .spawn((
            Sprite::new(sprite_id),
            position,
            BoundingBox::sized(info.width, info.height),
            OneShotAnimation {
                frame_count: info.frame_count,
            },
            Active,
        ))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_sprite_components() {
        let mut world = World::new();
        let mut schedule = Schedule::default();
        schedule.add_systems(|mut commands: Commands| {
            create_one_shot_sprite(&mut commands, NAPALM_FIRE_SPRITE, Position::new(4, 7));
        });
        schedule.run(&mut world);

        let mut query = world.query::<(&Sprite, &Position, &BoundingBox, &OneShotAnimation)>();
        let (sprite, pos, bbox, anim) = query.single(&world);
        assert_eq!(sprite.sprite_id, NAPALM_FIRE_SPRITE);
        assert_eq!(*pos, Position::new(4, 7));
        assert_eq!(bbox.width, 2);
        assert_eq!(anim.frame_count, 6);
    }
}
