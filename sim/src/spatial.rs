//! Spatial partitioning for overlap queries.
//!
//! Provides O(1) cell lookup and O(k) overlap queries where k is the number
//! of boxes in the cells a query rectangle touches, rather than O(n) for
//! brute force.

use crate::components::Rect;
use bevy_ecs::prelude::*;
use std::collections::HashMap;

/// Grid-based spatial partitioning structure.
///
/// Divides the world into square cells and records which boxes touch each
/// cell. A box spanning several cells is listed in each of them.
#[derive(Resource, Debug)]
pub struct SpatialGrid {
    /// Cell size in tiles.
    pub cell_size: i32,
    /// Map from cell coordinates to entries touching that cell.
    cells: HashMap<(i32, i32), Vec<usize>>,
    /// Entries in insertion order.
    entries: Vec<SpatialEntry>,
}

/// Entry in the grid.
#[derive(Debug, Clone, Copy)]
pub struct SpatialEntry {
    pub entity: Entity,
    pub rect: Rect,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(8)
    }
}

impl SpatialGrid {
    /// Create a new spatial grid with the given cell size.
    pub fn new(cell_size: i32) -> Self {
        Self {
            cell_size: cell_size.max(1),
            cells: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Convert world coordinates to cell coordinates.
    #[inline]
    pub fn world_to_cell(&self, x: i32, y: i32) -> (i32, i32) {
        (x.div_euclid(self.cell_size), y.div_euclid(self.cell_size))
    }

    /// Clear all entries (call at start of each frame before rebuilding).
    pub fn clear(&mut self) {
        self.cells.clear();
        self.entries.clear();
    }

    /// Insert a box.
    pub fn insert(&mut self, entity: Entity, rect: Rect) {
        let index = self.entries.len();
        self.entries.push(SpatialEntry { entity, rect });

        let (min_x, min_y) = self.world_to_cell(rect.left, rect.top);
        let (max_x, max_y) = self.world_to_cell(rect.right(), rect.bottom());
        for cy in min_y..=max_y {
            for cx in min_x..=max_x {
                self.cells.entry((cx, cy)).or_default().push(index);
            }
        }
    }

    /// All boxes intersecting `rect`, in insertion order.
    pub fn query_rect(&self, rect: &Rect) -> Vec<SpatialEntry> {
        let (min_x, min_y) = self.world_to_cell(rect.left, rect.top);
        let (max_x, max_y) = self.world_to_cell(rect.right(), rect.bottom());

        let mut hits = Vec::new();
        for cy in min_y..=max_y {
            for cx in min_x..=max_x {
                if let Some(indices) = self.cells.get(&(cx, cy)) {
                    hits.extend(
                        indices
                            .iter()
                            .copied()
                            .filter(|&i| self.entries[i].rect.intersects(rect)),
                    );
                }
            }
        }

        // Cell iteration order isn't stable; insertion order is.
        hits.sort_unstable();
        hits.dedup();
        hits.into_iter().map(|i| self.entries[i]).collect()
    }

    /// Get count of entries touching a cell.
    pub fn cell_count(&self, cell: (i32, i32)) -> usize {
        self.cells.get(&cell).map(|v| v.len()).unwrap_or(0)
    }

    /// Get total entry count.
    pub fn total_count(&self) -> usize {
        self.entries.len()
    }
}
