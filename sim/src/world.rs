//! Snapshot types.
//!
//! The `Snapshot` struct provides a serializable view of the simulation state
//! that a renderer or a test harness can consume.

use crate::audio::{AudioService, SoundId};
use crate::components::*;
use crate::systems::{DamageEventBuffer, PlayerScore, ShotContainerQueue};
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Snapshot of the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub x: i32,
    pub y: i32,
    pub health: i32,
    pub mercy_frames_remaining: u32,
}

/// Snapshot of an unopened item container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerSnapshot {
    pub id: u64,
    pub x: i32,
    pub y: i32,
    pub style: ReleaseStyle,
    pub health: i32,
    /// Shot and waiting to release its contents.
    pub queued: bool,
    pub frames_elapsed: u32,
    pub contents: Vec<String>,
}

/// Snapshot of a visible or hidden sprite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteSnapshot {
    pub id: u64,
    pub sprite_id: u16,
    pub x: i32,
    pub y: i32,
    pub frame: u32,
    pub show: bool,
    pub flashing_white: bool,
}

/// Snapshot of a shootable hit this tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitSnapshot {
    pub id: u64,
    pub x: i32,
    pub y: i32,
}

/// Complete simulation state snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Current simulation tick.
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub time: f32,
    pub score: u32,
    pub player: Option<PlayerSnapshot>,
    pub containers: Vec<ContainerSnapshot>,
    pub sprites: Vec<SpriteSnapshot>,
    /// Shootables killed during the last tick.
    pub killed: Vec<HitSnapshot>,
    /// Shootables hurt but not killed during the last tick.
    pub damaged: Vec<HitSnapshot>,
    /// Sounds requested and not yet drained by the host.
    pub sounds: Vec<SoundId>,
}

fn hits(events: &[(Entity, Position)]) -> Vec<HitSnapshot> {
    events
        .iter()
        .map(|(entity, pos)| HitSnapshot {
            id: entity.to_bits(),
            x: pos.x,
            y: pos.y,
        })
        .collect()
}

impl Snapshot {
    /// Create a snapshot from the ECS world.
    pub fn from_world(world: &mut World, tick: u64, time: f32) -> Self {
        let mut player_query = world.query::<(&Player, &Position)>();
        let player = player_query
            .iter(world)
            .next()
            .map(|(player, pos)| PlayerSnapshot {
                x: pos.x,
                y: pos.y,
                health: player.health,
                mercy_frames_remaining: player.mercy_frames_remaining,
            });

        let mut containers = Vec::new();
        let mut container_query =
            world.query::<(Entity, &ItemContainer, &Position, Option<&Shootable>)>();
        let queue = world.get_resource::<ShotContainerQueue>();
        for (entity, container, pos, shootable) in container_query.iter(world) {
            containers.push(ContainerSnapshot {
                id: entity.to_bits(),
                x: pos.x,
                y: pos.y,
                style: container.style,
                health: shootable.map_or(0, |s| s.health),
                queued: queue.is_some_and(|q| q.contains(entity)),
                frames_elapsed: container.frames_elapsed,
                contents: container
                    .contained_components
                    .iter()
                    .map(|holder| holder.type_name().to_string())
                    .collect(),
            });
        }

        let mut sprites = Vec::new();
        let mut sprite_query = world.query::<(Entity, &Sprite, &Position)>();
        for (entity, sprite, pos) in sprite_query.iter(world) {
            sprites.push(SpriteSnapshot {
                id: entity.to_bits(),
                sprite_id: sprite.sprite_id.0,
                x: pos.x,
                y: pos.y,
                frame: sprite.frame(),
                show: sprite.show,
                flashing_white: sprite.flashing_white,
            });
        }

        let (killed, damaged) = world
            .get_resource::<DamageEventBuffer>()
            .map(|buffer| (hits(&buffer.events.killed), hits(&buffer.events.damaged)))
            .unwrap_or_default();

        Self {
            tick,
            time,
            score: world.get_resource::<PlayerScore>().map_or(0, |s| s.0),
            player,
            containers,
            sprites,
            killed,
            damaged,
            sounds: world
                .get_resource::<AudioService>()
                .map(|audio| audio.pending().to_vec())
                .unwrap_or_default(),
        }
    }

    /// Serialize snapshot to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize snapshot to pretty JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
