//! Sound requests.
//!
//! The simulation doesn't play audio itself. Systems call `play_sound` and
//! the host drains the pending requests once per frame.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Sounds the simulation can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundId {
    Explosion,
    EnemyHit,
    PlayerHit,
}

/// Pending sound requests for the host.
#[derive(Resource, Debug, Default)]
pub struct AudioService {
    pending: Vec<SoundId>,
}

impl AudioService {
    pub fn play_sound(&mut self, id: SoundId) {
        trace!(?id, "play sound");
        self.pending.push(id);
    }

    /// Requests made since the last drain, oldest first.
    pub fn pending(&self) -> &[SoundId] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<SoundId> {
        std::mem::take(&mut self.pending)
    }
}
