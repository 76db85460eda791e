//! ECS Components for the Cinder simulation.
//!
//! Components are pure data containers attached to entities.
//! All game logic lives in systems that query these components.

use crate::behaviors::BehaviorController;
use crate::component_holder::ComponentHolder;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Unwrap a component the entity's role requires. A missing one means the
/// entity was assembled wrong.
pub(crate) fn required<T>(component: Option<T>, entity: Entity, name: &str) -> T {
    component.unwrap_or_else(|| panic!("entity {entity:?} is missing required component {name}"))
}

// ============================================================================
// SPATIAL COMPONENTS
// ============================================================================

/// World position in tiles. The position marks the bottom-left corner of an
/// entity; y grows downward.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Velocity in tiles per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: i32,
    pub vy: i32,
}

impl Velocity {
    pub fn new(vx: i32, vy: i32) -> Self {
        Self { vx, vy }
    }
}

/// Axis-aligned rectangle in world space (tiles).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn right(&self) -> i32 {
        self.left + self.width - 1
    }

    pub fn bottom(&self) -> i32 {
        self.top + self.height - 1
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left <= other.right()
            && other.left <= self.right()
            && self.top <= other.bottom()
            && other.top <= self.bottom()
    }
}

/// Collision box relative to the owning entity's position.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Box of the given size anchored at the entity position.
    pub fn sized(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Convert to world space. The box's bottom row sits on `position.y`.
    pub fn to_world(&self, position: Position) -> Rect {
        Rect {
            left: position.x + self.x,
            top: position.y + self.y - (self.height - 1),
            width: self.width,
            height: self.height,
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::sized(1, 1)
    }
}

/// Physics body. Entities without it don't move.
#[derive(Component, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MovingBody {
    pub velocity: Velocity,
}

impl MovingBody {
    pub fn new(vx: i32, vy: i32) -> Self {
        Self { velocity: Velocity::new(vx, vy) }
    }
}

/// Marker for entities that take part in the simulation this frame.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Active;

// ============================================================================
// VISUAL COMPONENTS
// ============================================================================

/// Identifier of a sprite sheet known to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteId(pub u16);

/// Renderer contract: which frame to draw, whether to draw at all and whether
/// to draw it flashing white this frame.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Sprite {
    pub sprite_id: SpriteId,
    pub frames_to_render: Vec<u32>,
    pub show: bool,
    /// Cleared at the start of every frame.
    pub flashing_white: bool,
}

impl Sprite {
    pub fn new(sprite_id: SpriteId) -> Self {
        Self {
            sprite_id,
            frames_to_render: vec![0],
            show: true,
            flashing_white: false,
        }
    }

    pub fn flash_white(&mut self) {
        self.flashing_white = true;
    }

    /// Frame index of the first render slot.
    pub fn frame(&self) -> u32 {
        self.frames_to_render.first().copied().unwrap_or(0)
    }

    pub fn advance_frame(&mut self) {
        if let Some(frame) = self.frames_to_render.first_mut() {
            *frame += 1;
        }
    }
}

/// Plays the sprite's frames once, one per tick, then despawns the entity.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OneShotAnimation {
    pub frame_count: u32,
}

/// Debris, particles and sounds played when the entity is destroyed.
/// The renderer takes over once `activated` is set.
#[derive(Component, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DestructionEffects {
    pub activated: bool,
}

// ============================================================================
// DAMAGE COMPONENTS
// ============================================================================

/// Amount of damage dealt by one contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Damage {
    pub amount: i32,
}

impl Damage {
    pub fn new(amount: i32) -> Self {
        Self { amount }
    }
}

/// Deals damage to overlapping shootables.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DamageInflicting {
    pub damage: Damage,
    /// Projectiles vanish on their first hit, hazards don't.
    pub destroy_on_contact: bool,
}

impl DamageInflicting {
    pub fn new(amount: i32, destroy_on_contact: bool) -> Self {
        Self {
            damage: Damage::new(amount),
            destroy_on_contact,
        }
    }
}

/// Hurts the player on contact.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerDamaging {
    pub damage: Damage,
}

impl PlayerDamaging {
    pub fn new(amount: i32) -> Self {
        Self { damage: Damage::new(amount) }
    }
}

/// Something that can be shot.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Shootable {
    pub health: i32,
    /// Score awarded to the player on kill.
    pub given_score: u32,
    /// Cleared by kill subscribers that need the entity past its kill.
    pub destroy_when_killed: bool,
    pub invincible: bool,
}

impl Shootable {
    pub fn new(health: i32) -> Self {
        Self {
            health,
            given_score: 0,
            destroy_when_killed: true,
            invincible: false,
        }
    }

    pub fn with_score(health: i32, given_score: u32) -> Self {
        Self {
            given_score,
            ..Self::new(health)
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Apply damage, returning true if this hit killed the shootable.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        let was_alive = !self.is_dead();
        self.health -= amount;
        was_alive && self.is_dead()
    }
}

/// The player. Only one is expected.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player {
    pub health: i32,
    pub mercy_frames_remaining: u32,
}

impl Player {
    pub fn new(health: i32) -> Self {
        Self {
            health,
            mercy_frames_remaining: 0,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn is_in_mercy_frames(&self) -> bool {
        self.mercy_frames_remaining > 0
    }
}

// ============================================================================
// ITEM CONTAINER COMPONENTS
// ============================================================================

/// Timing and visual sequence used when a container opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReleaseStyle {
    /// Release on the first update after the kill.
    #[default]
    Default,
    /// Flash, then release.
    ItemBox,
    /// Flash, bulge, hide, then release.
    NuclearWasteBarrel,
}

/// Holds the components of the entity spawned when this one is shot open.
#[derive(Component, Debug, Default)]
pub struct ItemContainer {
    pub style: ReleaseStyle,
    pub frames_elapsed: u32,
    pub contained_components: Vec<ComponentHolder>,
}

impl ItemContainer {
    pub fn new(style: ReleaseStyle, contained_components: Vec<ComponentHolder>) -> Self {
        Self {
            style,
            frames_elapsed: 0,
            contained_components,
        }
    }
}

// ============================================================================
// BUNDLE HELPERS
// ============================================================================

/// Bundle for a projectile that is consumed on its first hit.
#[derive(Bundle)]
pub struct ProjectileBundle {
    pub position: Position,
    pub bbox: BoundingBox,
    pub body: MovingBody,
    pub damage: DamageInflicting,
    pub active: Active,
}

impl ProjectileBundle {
    pub fn new(x: i32, y: i32, vx: i32, damage: i32) -> Self {
        Self {
            position: Position::new(x, y),
            bbox: BoundingBox::sized(1, 1),
            body: MovingBody::new(vx, 0),
            damage: DamageInflicting::new(damage, true),
            active: Active,
        }
    }
}

/// Bundle for a shootable container.
#[derive(Bundle)]
pub struct ItemContainerBundle {
    pub position: Position,
    pub bbox: BoundingBox,
    pub sprite: Sprite,
    pub shootable: Shootable,
    pub container: ItemContainer,
    pub effects: DestructionEffects,
    pub active: Active,
}

impl ItemContainerBundle {
    pub fn new(
        x: i32,
        y: i32,
        sprite_id: SpriteId,
        health: i32,
        container: ItemContainer,
    ) -> Self {
        Self {
            position: Position::new(x, y),
            bbox: BoundingBox::sized(2, 2),
            sprite: Sprite::new(sprite_id),
            shootable: Shootable::with_score(health, 100),
            container,
            effects: DestructionEffects::default(),
            active: Active,
        }
    }
}

/// Bundle for a napalm bomb. It survives its own kill so it can burn out.
#[derive(Bundle)]
pub struct NapalmBombBundle {
    pub position: Position,
    pub bbox: BoundingBox,
    pub sprite: Sprite,
    pub body: MovingBody,
    pub shootable: Shootable,
    pub effects: DestructionEffects,
    pub behavior: BehaviorController,
    pub active: Active,
}

impl NapalmBombBundle {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            position: Position::new(x, y),
            bbox: BoundingBox::sized(2, 1),
            sprite: Sprite::new(crate::entity_factory::NAPALM_BOMB_SPRITE),
            body: MovingBody::default(),
            shootable: Shootable {
                destroy_when_killed: false,
                ..Shootable::with_score(1, 200)
            },
            effects: DestructionEffects::default(),
            behavior: BehaviorController::napalm_bomb(),
            active: Active,
        }
    }
}
