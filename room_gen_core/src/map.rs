use serde::{Deserialize, Serialize};

use crate::{Category, GridPosition, placement::PlacementSink};

/// Represents errors that can occur within the grid operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("Coordinates ({x}, {y}) are out of bounds for grid size ({width}, {height})")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
}

/// A generic 2D grid structure.
///
/// Stores elements of type `T` in a flat vector using row-major order, row `0` first.
/// Hosts use it to rasterize emitted placements for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Creates a new grid with the specified dimensions, filled with default values.
    ///
    /// Negative dimensions give an empty grid.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`.
    pub fn new(width: i32, height: i32) -> Self
    where
        T: Default + Clone,
    {
        let width = width.max(0) as usize;
        let height = height.max(0) as usize;
        let size = width.checked_mul(height).expect("Grid size overflow");
        Grid {
            width,
            height,
            cells: vec![T::default(); size],
        }
    }

    /// Returns the width of the grid.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height of the grid.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Converts a position to a flat vector index.
    ///
    /// Returns `None` if the position is out of bounds.
    #[inline]
    pub fn position_to_index(&self, position: GridPosition) -> Option<usize> {
        let x = usize::try_from(position.x).ok()?;
        let y = usize::try_from(position.y).ok()?;
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    /// Checks if the given position is within the grid boundaries.
    #[inline]
    pub fn is_valid(&self, position: GridPosition) -> bool {
        self.position_to_index(position).is_some()
    }

    /// Gets an immutable reference to the cell at the given position.
    pub fn get(&self, position: GridPosition) -> Option<&T> {
        self.cells.get(self.position_to_index(position)?)
    }

    /// Sets the value of the cell at the given position.
    pub fn set(&mut self, position: GridPosition, value: T) -> Result<(), GridError> {
        let index = self
            .position_to_index(position)
            .ok_or(GridError::OutOfBounds {
                x: position.x,
                y: position.y,
                width: self.width,
                height: self.height,
            })?;
        self.cells[index] = value;
        Ok(())
    }

    /// Returns an iterator over the rows, from the top of the room (`y = height - 1`) down.
    pub fn rows_top_down(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.width.max(1)).rev()
    }

    /// Returns an iterator that yields `(position, &T)` for each cell.
    pub fn enumerate(&self) -> impl Iterator<Item = (GridPosition, &T)> {
        let width = self.width;
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let position = GridPosition::new((index % width) as i32, (index / width) as i32);
            (position, cell)
        })
    }
}

/// Rasterizing sink: later placements on the same cell replace earlier ones.
impl<P: Clone> PlacementSink<P> for Grid<Option<P>> {
    fn emit(&mut self, category: Category, prototype: &P, position: GridPosition) {
        if let Err(err) = self.set(position, Some(prototype.clone())) {
            log::warn!("Dropping {category} placement: {err}");
        }
    }
}
