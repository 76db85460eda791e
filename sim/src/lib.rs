//! Cinder - Simulation Core
//!
//! Deferred-event entity behaviors for a tile-based 2D action game: contact
//! damage, item containers that open over several frames, and napalm bombs.
//! Uses `bevy_ecs` for the entity-component-system architecture.

pub mod api;
pub mod audio;
pub mod behaviors;
pub mod collision;
pub mod component_holder;
pub mod components;
pub mod config;
pub mod entity_factory;
pub mod error;
pub mod events;
pub mod spatial;
pub mod systems;
pub mod world;

pub use api::SimWorld;
pub use audio::{AudioService, SoundId};
pub use behaviors::{BehaviorController, NapalmBomb, NapalmBombState};
pub use collision::{CollisionChecker, CollisionService, SolidGroundMap, TileType};
pub use component_holder::ComponentHolder;
pub use components::*;
pub use config::SimConfig;
pub use error::{ConfigError, ConfigResult};
pub use events::{
    activate_destruction_effects, subscribe_to_kills, KillNotifier, KillSubscriber,
    ShootableKilled,
};
pub use spatial::{SpatialEntry, SpatialGrid};
pub use systems::*;
pub use world::Snapshot;
