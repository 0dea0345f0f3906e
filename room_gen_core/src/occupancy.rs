use std::collections::HashSet;

use crate::{GridPosition, placer::InteriorBounds};

/// Tracks every cell claimed during one generation run.
///
/// There is no removal: a run never un-places an entity.
#[derive(Debug, Clone, Default)]
pub struct OccupancySet {
    cells: HashSet<GridPosition>,
}

impl OccupancySet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, position: GridPosition) -> bool {
        self.cells.contains(&position)
    }

    /// Marks a cell as occupied. Returns `true` if it was free before.
    ///
    /// Inserting an already occupied cell is a no-op.
    #[inline]
    pub fn insert(&mut self, position: GridPosition) -> bool {
        self.cells.insert(position)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of occupied cells that fall inside `bounds`.
    pub fn count_within(&self, bounds: &InteriorBounds) -> usize {
        self.cells.iter().filter(|p| bounds.contains(**p)).count()
    }
}
