//! ECS systems for the cinder simulation.
//!
//! Systems contain the game logic that operates on components.
//!
//! ## Frame Order
//!
//! Every frame runs these systems in order, chained. Commands issued by one
//! system are applied before the next one starts.
//!
//! 1. `clear_damage_events_system`, `sprite_flash_reset_system` - frame reset
//! 2. `movement_system` - applies moving body velocity
//! 3. `damage_infliction_system` - contact damage, kill notifications
//! 4. `item_container_system` - advances queued containers, starting in the
//!    frame they were killed (`Default` ones release in that same frame)
//! 5. `behavior_controller_system` - napalm bombs and other behaviors
//! 6. `one_shot_animation_system` - plays and retires one-shot sprites
//! 7. `player_damage_system` - hazards hurting the player
//!
//! Kill subscribers (`queue_shot_container`, `activate_destruction_effects`,
//! `behavior_on_killed`) are not part of the schedule. They run from the
//! commands of `damage_infliction_system`, i.e. between steps 3 and 4.

pub mod behavior;
pub mod damage_infliction;
pub mod item_container;
pub mod movement;
pub mod player_damage;
pub mod serialization;
pub mod sprite;

pub use behavior::*;
pub use damage_infliction::*;
pub use item_container::*;
pub use movement::*;
pub use player_damage::*;
pub use serialization::*;
pub use sprite::*;
