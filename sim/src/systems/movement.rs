//! Movement system - applies moving body velocity to position.

use crate::components::*;
use bevy_ecs::prelude::*;

/// System that moves every active body by its velocity, in tiles per frame.
pub fn movement_system(mut query: Query<(&mut Position, &MovingBody), With<Active>>) {
    for (mut pos, body) in query.iter_mut() {
        if body.velocity == Velocity::default() {
            continue;
        }
        pos.x += body.velocity.vx;
        pos.y += body.velocity.vy;
    }
}
