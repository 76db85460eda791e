//! Napalm bomb - ticks, explodes, then spreads fire along the ground.
//!
//! While ticking the bomb flashes as a warning and detonates on its own after
//! a fixed number of frames. Shooting it detonates it early. Once exploded it
//! disappears and spawns one fire per side every second frame, walking
//! outward. A side stops for good as soon as a fire position has no ground
//! beneath it.

use super::{ControlledEntity, GlobalDependencies};
use crate::audio::SoundId;
use crate::components::*;
use crate::entity_factory::{create_one_shot_sprite, NAPALM_FIRE_SPRITE};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// First ticking frame on which the bomb flashes.
const WARNING_FRAME: u32 = 25;
/// Ticking frame on which the bomb detonates by itself.
const DETONATION_FRAME: u32 = 31;
/// Frames of fire spreading before the bomb entity goes away.
const BURN_FRAMES: u32 = 10;
/// Horizontal distance between two fire steps.
const FIRE_SPACING: i32 = 2;
const FIRE_DAMAGE: i32 = 1;
const FIRE_GROUND_BOX: BoundingBox = BoundingBox {
    x: 0,
    y: 0,
    width: 2,
    height: 1,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NapalmBombState {
    #[default]
    Ticking,
    SpawningFires,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NapalmBomb {
    pub state: NapalmBombState,
    pub frames_elapsed: u32,
    pub can_spawn_left: bool,
    pub can_spawn_right: bool,
}

impl Default for NapalmBomb {
    fn default() -> Self {
        Self {
            state: NapalmBombState::Ticking,
            frames_elapsed: 0,
            can_spawn_left: true,
            can_spawn_right: true,
        }
    }
}

impl NapalmBomb {
    pub fn update(&mut self, d: &mut GlobalDependencies, this: &mut ControlledEntity) {
        self.frames_elapsed += 1;

        match self.state {
            NapalmBombState::Ticking => {
                if self.frames_elapsed >= WARNING_FRAME && self.frames_elapsed % 2 == 1 {
                    this.sprite.flash_white();
                }

                if self.frames_elapsed >= DETONATION_FRAME {
                    if let Some(effects) = this.destruction_effects.as_mut() {
                        effects.activated = true;
                    }
                    self.explode(d, this);
                }
            }

            NapalmBombState::SpawningFires => {
                if self.frames_elapsed > BURN_FRAMES {
                    debug!(bomb = ?this.entity, "napalm burned out");
                    d.commands.entity(this.entity).despawn();
                    return;
                }

                if self.frames_elapsed % 2 == 0 {
                    let step = self.frames_elapsed / 2;
                    self.spawn_fires(d, this.position, step);
                }
            }
        }
    }

    pub fn on_killed(&mut self, d: &mut GlobalDependencies, this: &mut ControlledEntity) {
        self.explode(d, this);
    }

    /// Only a ticking bomb can explode. A kill arriving on the detonation
    /// frame, or fire hitting the exploded bomb, is ignored.
    fn explode(&mut self, d: &mut GlobalDependencies, this: &mut ControlledEntity) {
        if self.state != NapalmBombState::Ticking {
            trace!(bomb = ?this.entity, "napalm already exploded");
            return;
        }
        debug!(bomb = ?this.entity, frame = self.frames_elapsed, "napalm exploded");

        d.audio.play_sound(SoundId::Explosion);
        self.spawn_fires(d, this.position, 0);

        self.state = NapalmBombState::SpawningFires;
        self.frames_elapsed = 0;
        this.sprite.show = false;
        d.commands.entity(this.entity).remove::<MovingBody>();
    }

    fn spawn_fires(&mut self, d: &mut GlobalDependencies, origin: Position, step: u32) {
        let distance = (step as i32 + 1) * FIRE_SPACING;

        if self.can_spawn_left {
            self.can_spawn_left = spawn_one_fire(d, origin.offset(-distance, 0));
            if !self.can_spawn_left {
                trace!(step, "napalm left side blocked");
            }
        }

        if self.can_spawn_right {
            self.can_spawn_right = spawn_one_fire(d, origin.offset(distance, 0));
            if !self.can_spawn_right {
                trace!(step, "napalm right side blocked");
            }
        }
    }
}

/// Spawn a fire if there is ground to burn on. Returns whether it spawned.
fn spawn_one_fire(d: &mut GlobalDependencies, position: Position) -> bool {
    let can_spawn = d.collision.is_on_solid_ground(position, &FIRE_GROUND_BOX);
    if can_spawn {
        let fire = create_one_shot_sprite(d.commands, NAPALM_FIRE_SPRITE, position);
        d.commands.entity(fire).insert((
            PlayerDamaging::new(FIRE_DAMAGE),
            DamageInflicting::new(FIRE_DAMAGE, false),
        ));
    }
    can_spawn
}
