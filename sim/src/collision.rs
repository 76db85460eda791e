//! Ground queries.
//!
//! Behaviors ask whether a box placed at some position would rest on solid
//! ground. The query is a trait so the host can answer it from its own level
//! data; `SolidGroundMap` is a tile grid implementation used by the demo and
//! by tests.

use crate::components::{BoundingBox, Position};
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Answers ground-support queries.
pub trait CollisionChecker: Send + Sync {
    /// True if the box, placed at `position`, has solid ground directly
    /// beneath its bottom row.
    fn is_on_solid_ground(&self, position: Position, bbox: &BoundingBox) -> bool;
}

impl<F> CollisionChecker for F
where
    F: Fn(Position, &BoundingBox) -> bool + Send + Sync,
{
    fn is_on_solid_ground(&self, position: Position, bbox: &BoundingBox) -> bool {
        self(position, bbox)
    }
}

/// Resource wrapper for the collision checker, shared with the host.
#[derive(Resource, Clone)]
pub struct CollisionService(pub Arc<dyn CollisionChecker>);

impl CollisionService {
    pub fn new(checker: impl CollisionChecker + 'static) -> Self {
        Self(Arc::new(checker))
    }

    pub fn is_on_solid_ground(&self, position: Position, bbox: &BoundingBox) -> bool {
        self.0.is_on_solid_ground(position, bbox)
    }
}

impl Default for CollisionService {
    /// An empty level: nothing is solid.
    fn default() -> Self {
        Self::new(SolidGroundMap::new(0, 0))
    }
}

/// Type of a level tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileType {
    #[default]
    Empty,
    Solid,
}

/// Grid of level tiles. Tile (0, 0) is the top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolidGroundMap {
    pub width: usize,
    pub height: usize,
    /// Tiles in row-major order.
    pub tiles: Vec<TileType>,
}

impl SolidGroundMap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![TileType::Empty; width * height],
        }
    }

    /// Build a map from text rows, `#` marking solid tiles.
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.iter().map(|row| row.len()).max().unwrap_or(0);
        let mut map = Self::new(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    map.set_tile(x as i32, y as i32, TileType::Solid);
                }
            }
        }
        map
    }

    fn tile_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    /// Tile at the given coordinates; outside the map everything is empty.
    pub fn tile_at(&self, x: i32, y: i32) -> TileType {
        self.tile_index(x, y)
            .map(|i| self.tiles[i])
            .unwrap_or_default()
    }

    pub fn set_tile(&mut self, x: i32, y: i32, tile: TileType) {
        if let Some(i) = self.tile_index(x, y) {
            self.tiles[i] = tile;
        }
    }

    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.tile_at(x, y) == TileType::Solid
    }

    /// Fill a horizontal run of tiles on row `y`.
    pub fn fill_row(&mut self, y: i32, from_x: i32, to_x: i32) {
        for x in from_x..=to_x {
            self.set_tile(x, y, TileType::Solid);
        }
    }
}

impl CollisionChecker for SolidGroundMap {
    fn is_on_solid_ground(&self, position: Position, bbox: &BoundingBox) -> bool {
        let rect = bbox.to_world(position);
        let below = rect.bottom() + 1;
        (rect.left..=rect.right()).any(|x| self.is_solid(x, below))
    }
}
