//! Public API for the simulation.
//!
//! This module provides the main interface for a host (renderer, level
//! loader, test harness) to drive the simulation.
//!
//! ## Fixed Timestep
//!
//! The game logic runs at a fixed rate (default 15 Hz). When `step(dt)` is
//! called, the simulation accumulates time and runs as many frames as fit.
//! `advance_frame()` runs exactly one frame regardless of time.
//!
//! ## Kill Subscribers
//!
//! The built-in subscribers are registered in this order:
//! 1. `queue_shot_container` - claims killed containers
//! 2. `activate_destruction_effects`
//! 3. `behavior_on_killed` - napalm bombs explode
//!
//! Host subscribers added with `subscribe_to_kills` run after them.

use crate::audio::{AudioService, SoundId};
use crate::collision::{CollisionChecker, CollisionService};
use crate::component_holder::ComponentHolder;
use crate::components::*;
use crate::config::SimConfig;
use crate::entity_factory::{ITEM_BOX_SPRITE, NUCLEAR_WASTE_BARREL_SPRITE};
use crate::events::{
    activate_destruction_effects, subscribe_to_kills, KillNotifier, KillSubscriber,
    ShootableKilled,
};
use crate::spatial::SpatialGrid;
use crate::systems::*;
use crate::world::Snapshot;
use bevy_ecs::prelude::*;
use tracing::{info, warn};

const PLAYER_WIDTH: i32 = 3;
const PLAYER_HEIGHT: i32 = 5;

/// The main simulation world container.
///
/// Holds the ECS world and schedule, providing a clean API for:
/// - Initializing the simulation
/// - Stepping the simulation forward
/// - Spawning game objects
/// - Extracting state snapshots
pub struct SimWorld {
    world: World,
    schedule: Schedule,
    tick: u64,
    time: f32,
    fixed_timestep: f32,
    /// Accumulated time for fixed timestep.
    time_accumulator: f32,
}

impl SimWorld {
    /// Create a new empty simulation world.
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    /// Create a new simulation world with custom configuration. Nothing is
    /// solid ground until a collision checker is set.
    pub fn with_config(config: SimConfig) -> Self {
        Self::with_collision(config, CollisionService::default())
    }

    /// Create a new simulation world that answers ground queries with
    /// `collision`.
    pub fn with_collision(config: SimConfig, collision: CollisionService) -> Self {
        let mut world = World::new();
        let fixed_timestep = config.fixed_timestep;
        if let Err(err) = config.validate() {
            warn!(%err, "simulation config is invalid");
        }

        // Core resources
        world.insert_resource(SpatialGrid::new(config.grid_cell_size));
        world.insert_resource(collision);
        world.insert_resource(config);
        world.init_resource::<AudioService>();
        world.init_resource::<PlayerScore>();
        world.init_resource::<DamageEventBuffer>();
        world.init_resource::<ShotContainerQueue>();
        world.init_resource::<KillNotifier>();

        // Subscription order is delivery order
        subscribe_to_kills(&mut world, queue_shot_container);
        subscribe_to_kills(&mut world, activate_destruction_effects);
        subscribe_to_kills(&mut world, behavior_on_killed);

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                (clear_damage_events_system, sprite_flash_reset_system),
                movement_system,
                damage_infliction_system,
                item_container_system,
                behavior_controller_system,
                one_shot_animation_system,
                player_damage_system,
            )
                .chain(),
        );

        info!(fixed_timestep, "simulation world created");

        Self {
            world,
            schedule,
            tick: 0,
            time: 0.0,
            fixed_timestep,
            time_accumulator: 0.0,
        }
    }

    /// Step the simulation forward by `dt` seconds.
    ///
    /// Uses fixed timestep internally - accumulates time and runs fixed updates
    /// as needed. Returns the number of frames that ran. A timestep that is
    /// not positive never runs a frame here; use `advance_frame` instead.
    pub fn step(&mut self, dt: f32) -> u32 {
        if self.fixed_timestep.is_nan() || self.fixed_timestep <= 0.0 {
            return 0;
        }
        self.time_accumulator += dt;

        let mut frames = 0;
        while self.time_accumulator >= self.fixed_timestep {
            self.advance_frame();
            self.time_accumulator -= self.fixed_timestep;
            frames += 1;
        }
        frames
    }

    /// Run exactly one frame.
    pub fn advance_frame(&mut self) {
        self.schedule.run(&mut self.world);
        self.tick += 1;
        self.time += self.fixed_timestep;
    }

    /// Replace the ground query used by behaviors.
    pub fn set_collision(&mut self, checker: impl CollisionChecker + 'static) {
        self.world.insert_resource(CollisionService::new(checker));
    }

    /// Register a kill subscriber. It runs after the built-in ones.
    pub fn subscribe_to_kills<M>(
        &mut self,
        system: impl IntoSystem<In<ShootableKilled>, (), M> + 'static,
    ) -> KillSubscriber {
        subscribe_to_kills(&mut self.world, system)
    }

    /// Spawn the player with full health.
    pub fn spawn_player(&mut self, x: i32, y: i32) -> Entity {
        let health = self.config().player_health;
        self.world
            .spawn((
                Player::new(health),
                Position::new(x, y),
                BoundingBox::sized(PLAYER_WIDTH, PLAYER_HEIGHT),
                Active,
            ))
            .id()
    }

    /// Spawn a player shot moving horizontally by `vx` tiles per frame.
    pub fn spawn_projectile(&mut self, x: i32, y: i32, vx: i32, damage: i32) -> Entity {
        self.world.spawn(ProjectileBundle::new(x, y, vx, damage)).id()
    }

    /// Spawn a container holding `contents`, released when it is shot.
    pub fn spawn_item_container(
        &mut self,
        x: i32,
        y: i32,
        style: ReleaseStyle,
        contents: Vec<ComponentHolder>,
        health: i32,
    ) -> Entity {
        let sprite_id = match style {
            ReleaseStyle::NuclearWasteBarrel => NUCLEAR_WASTE_BARREL_SPRITE,
            ReleaseStyle::Default | ReleaseStyle::ItemBox => ITEM_BOX_SPRITE,
        };
        let container = ItemContainer::new(style, contents);
        self.world
            .spawn(ItemContainerBundle::new(x, y, sprite_id, health, container))
            .id()
    }

    /// Spawn a napalm bomb. It starts ticking right away.
    pub fn spawn_napalm_bomb(&mut self, x: i32, y: i32) -> Entity {
        self.world.spawn(NapalmBombBundle::new(x, y)).id()
    }

    /// Whether `entity` still exists.
    pub fn is_valid(&self, entity: Entity) -> bool {
        self.world.entities().contains(entity)
    }

    /// Score collected so far.
    pub fn score(&self) -> u32 {
        self.world.resource::<PlayerScore>().0
    }

    /// Containers that were shot and haven't opened yet.
    pub fn pending_containers(&self) -> Vec<Entity> {
        self.world.resource::<ShotContainerQueue>().iter().collect()
    }

    /// Take the sounds requested since the last call.
    pub fn drain_sounds(&mut self) -> Vec<SoundId> {
        self.world.resource_mut::<AudioService>().drain()
    }

    pub fn config(&self) -> &SimConfig {
        self.world.resource::<SimConfig>()
    }

    /// Get a snapshot of the current simulation state.
    pub fn snapshot(&mut self) -> Snapshot {
        Snapshot::from_world(&mut self.world, self.tick, self.time)
    }

    /// Get the snapshot as a JSON string.
    pub fn snapshot_json(&mut self) -> String {
        self.snapshot().to_json().unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the current tick number.
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Get the elapsed simulation time.
    pub fn current_time(&self) -> f32 {
        self.time
    }

    /// Get the spatial grid reference (for debugging/visualization).
    pub fn spatial_grid(&self) -> Option<&SpatialGrid> {
        self.world.get_resource::<SpatialGrid>()
    }

    /// Get direct access to the ECS world (for advanced usage).
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the ECS world (for advanced usage).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}
